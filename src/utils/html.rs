//! HTML utility functions.
//!
//! Provides the escaping and filtering used by every renderer:
//! - `escape()`, `escape_attr()`, `escape_textarea()` - HTML entity escaping
//! - `escape_url()` - cleaned URL ready for an `href`/`src` attribute
//! - `escape_js()` - text inside a single-quoted inline script string
//! - `strip_all_tags()` - drop markup, keep text
//! - `filter_allowed()` - keep an allow-listed subset of inline markup
//! - `parse_attributes()` - HTML attribute string parsing

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::utils::url::clean_url;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape HTML attribute values.
///
/// Identical to `escape()` but semantically indicates attribute context.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape the body of a `<textarea>`.
#[inline]
pub fn escape_textarea(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Internal: escape with specified character set.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Clean a URL and escape it for an attribute.
///
/// Rejected URLs come back empty.
pub fn escape_url(s: &str) -> String {
    escape_attr(&clean_url(s)).into_owned()
}

/// Escape text for a single-quoted JavaScript string inside `<script>`.
///
/// `<` and `>` are hex-escaped so the text can never close the script
/// element, while markup assigned through `innerHTML` still works.
pub fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '<' => out.push_str("\\x3C"),
            '>' => out.push_str("\\x3E"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }

        // Collect entity
        let mut entity = String::new();
        let mut terminated = false;
        for c in chars.by_ref() {
            if c == ';' {
                terminated = true;
                break;
            }
            entity.push(c);
            if entity.len() > 10 {
                break;
            }
        }

        if !terminated {
            result.push('&');
            result.push_str(&entity);
            continue;
        }

        match entity.as_str() {
            "lt" => result.push('<'),
            "gt" => result.push('>'),
            "amp" => result.push('&'),
            "quot" => result.push('"'),
            "apos" => result.push('\''),
            "nbsp" => result.push('\u{00A0}'),
            s if s.starts_with('#') => {
                let code = if s.starts_with("#x") || s.starts_with("#X") {
                    u32::from_str_radix(&s[2..], 16).ok()
                } else {
                    s[1..].parse().ok()
                };
                if let Some(c) = code.and_then(char::from_u32) {
                    result.push(c);
                } else {
                    result.push('&');
                    result.push_str(&entity);
                    result.push(';');
                }
            }
            _ => {
                result.push('&');
                result.push_str(&entity);
                result.push(';');
            }
        }
    }

    Cow::Owned(result)
}

// =============================================================================
// Tag Stripping
// =============================================================================

/// `<script>`/`<style>` elements including their content.
static RAW_TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</\s*(?:script|style)\s*>").unwrap()
});

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Any start or end tag.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(/?)([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").unwrap());

/// Leftover tag-like fragments (`<!doctype>`, `<?php`, unterminated tags).
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>?").unwrap());

/// Remove every tag, dropping `<script>`/`<style>` content entirely.
///
/// Line breaks are kept; the result is trimmed.
pub fn strip_all_tags(s: &str) -> String {
    let without_raw = RAW_TEXT_ELEMENT.replace_all(s, "");
    let without_comments = COMMENT.replace_all(&without_raw, "");
    let without_tags = ANY_TAG.replace_all(&without_comments, "");
    without_tags.trim().to_string()
}

// =============================================================================
// Allow-list Filtering
// =============================================================================

/// Tags kept by `filter_allowed`, with the attributes each may carry.
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target", "rel", "class"]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("code", &[]),
    ("em", &[]),
    ("i", &[]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &["class"]),
    ("s", &[]),
    ("small", &[]),
    ("span", &["class"]),
    ("strong", &[]),
    ("u", &[]),
    ("ul", &[]),
];

/// Attributes whose value is a URL and must pass `clean_url`.
const URL_ATTRIBUTES: &[&str] = &["href", "cite"];

fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    ALLOWED_TAGS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attrs)| *attrs)
}

/// Keep only allow-listed inline markup.
///
/// Disallowed tags are removed but their text survives. `<script>` and
/// `<style>` are removed together with their content. URL attributes are
/// cleaned and dropped when rejected. Text between tags is escaped.
pub fn filter_allowed(s: &str) -> String {
    let without_raw = RAW_TEXT_ELEMENT.replace_all(s, "");
    let input = COMMENT.replace_all(&without_raw, "");

    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in TAG.captures_iter(&input) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut out, &input[last..whole.start()]);
        last = whole.end();

        let closing = !caps[1].is_empty();
        let tag = caps[2].to_ascii_lowercase();
        let Some(allowed) = allowed_attributes(&tag) else {
            continue;
        };

        if closing {
            if tag != "br" {
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
            continue;
        }

        out.push('<');
        out.push_str(&tag);
        let raw_attrs = caps[3].trim().trim_end_matches('/');
        for (name, value) in parse_attributes(raw_attrs) {
            let name = name.to_ascii_lowercase();
            if !allowed.contains(&name.as_str()) {
                continue;
            }
            let value = if URL_ATTRIBUTES.contains(&name.as_str()) {
                let cleaned = clean_url(&unescape(&value));
                if cleaned.is_empty() {
                    continue;
                }
                cleaned
            } else {
                unescape(&value).into_owned()
            };
            out.push(' ');
            out.push_str(&name);
            out.push_str("=\"");
            out.push_str(&escape_attr(&value));
            out.push('"');
        }
        out.push_str(if tag == "br" { " />" } else { ">" });
    }
    push_text(&mut out, &input[last..]);

    out.trim().to_string()
}

/// Append text content, escaping stray angle brackets.
fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// Parse HTML-style attributes from a string.
///
/// Input: `href="/about" class="foo" disabled`
/// Output: `vec![("href", "/about"), ("class", "foo"), ("disabled", "")]`
pub fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        // Read attribute name
        let mut name = String::new();
        name.push(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next.is_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        if chars.peek() != Some(&'=') {
            // Boolean attribute (no value)
            attrs.push((name, String::new()));
            continue;
        }
        chars.next();

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        let value = match chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                chars.next();
                let mut val = String::new();
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    val.push(c);
                }
                val
            }
            _ => {
                // Unquoted value (read until whitespace)
                let mut val = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    val.push(c);
                    chars.next();
                }
                val
            }
        };

        attrs.push((name, value));
    }

    attrs
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a &amp; b &lt;c&gt; &#169; &#x41;"), "a & b <c> © A");
        assert_eq!(unescape("fish & chips"), "fish & chips");
        assert_eq!(unescape("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_escape_js() {
        assert_eq!(escape_js("it's"), "it\\'s");
        assert_eq!(escape_js("a\r\nb"), "a\\nb");
        assert_eq!(escape_js("</script>"), "\\x3C/script\\x3E");
        assert_eq!(escape_js(r"back\slash"), r"back\\slash");
    }

    #[test]
    fn test_escape_url() {
        assert_eq!(escape_url("https://a.test/?x=1&y=2"), "https://a.test/?x=1&amp;y=2");
        assert_eq!(escape_url("javascript:alert(1)"), "");
    }

    #[test]
    fn test_strip_all_tags() {
        assert_eq!(strip_all_tags("  <p>Hello <b>world</b></p>  "), "Hello world");
        assert_eq!(strip_all_tags("a<script>alert(1)</script>b"), "ab");
        assert_eq!(strip_all_tags("x<style>p{}</style>\ny"), "x\ny");
        assert_eq!(strip_all_tags("a<!-- note -->b"), "ab");
    }

    #[test]
    fn test_filter_allowed_keeps_safe_markup() {
        let html = r#"We use cookies. <a href="/privacy" onclick="x()">Learn more</a>."#;
        assert_eq!(
            filter_allowed(html),
            r#"We use cookies. <a href="/privacy">Learn more</a>."#
        );
    }

    #[test]
    fn test_filter_allowed_drops_disallowed() {
        assert_eq!(filter_allowed("<div>text</div>"), "text");
        assert_eq!(filter_allowed("a<script>alert(1)</script>b"), "ab");
        assert_eq!(filter_allowed("<img src=x onerror=alert(1)>"), "");
        assert_eq!(filter_allowed("line<br/>next"), "line<br />next");
    }

    #[test]
    fn test_filter_allowed_rejects_bad_href() {
        assert_eq!(
            filter_allowed(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
    }

    #[test]
    fn test_filter_allowed_escapes_stray_brackets() {
        assert_eq!(filter_allowed("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"href="/a b" class='x' disabled data-n=3"#);
        assert_eq!(
            attrs,
            vec![
                ("href".to_string(), "/a b".to_string()),
                ("class".to_string(), "x".to_string()),
                ("disabled".to_string(), String::new()),
                ("data-n".to_string(), "3".to_string()),
            ]
        );
    }
}
