//! Field sanitizers.
//!
//! Every rule is total: invalid input degrades to a default or an empty
//! string and, where the value was visibly altered, a `Warning`.
//!
//! | Rule         | Invalid input becomes     |
//! |--------------|---------------------------|
//! | hex color    | the field default         |
//! | URL          | `""`                      |
//! | plain text   | tags and breaks removed   |
//! | CSS block    | tags removed              |
//! | rich text    | allow-listed markup only  |
//! | flag         | `false`                   |
//! | choice       | the designated default    |

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::{Sanitized, Warning, WarningKind};
use crate::store::Document;
use crate::utils::{html, url::clean_url};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// Pure rules
// ============================================================================

/// Normalize a hex color, adding a missing `#`.
///
/// Returns `None` for empty or malformed input.
pub fn hex_color(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let color = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };
    HEX_COLOR.is_match(&color).then_some(color)
}

/// Single-line text: no tags, no line breaks, collapsed whitespace.
pub fn plain_text(input: &str) -> String {
    let stripped = html::strip_all_tags(input);
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Multi-line CSS-like text: `<style>` wrappers and other tags removed.
pub fn css_block(input: &str) -> String {
    let unwrapped = input.replace("<style>", "").replace("</style>", "");
    html::strip_all_tags(unwrapped.trim())
}

/// Rich text with only allow-listed inline markup.
pub fn rich_text(input: &str) -> String {
    html::filter_allowed(input.trim())
}

/// Truthiness of a raw form value.
///
/// Missing, null, `false`, `0`, `""` and `"0"` are false.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !(s.is_empty() || s == "0"),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Scalar form value as text. Arrays and objects are not text.
pub fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// Field sanitizer
// ============================================================================

/// Applies the rules to fields of a raw submission, collecting warnings.
pub struct FieldSanitizer<'a> {
    raw: &'a Document,
    warnings: Vec<Warning>,
}

impl<'a> FieldSanitizer<'a> {
    pub fn new(raw: &'a Document) -> Self {
        Self {
            raw,
            warnings: Vec::new(),
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        self.raw.get(key).and_then(raw_text)
    }

    fn warn(&mut self, field: &'static str, kind: WarningKind) {
        self.warnings.push(Warning { field, kind });
    }

    /// Hex color; missing or blank keeps `default` silently.
    pub fn hex_color(&mut self, key: &'static str, default: &str) -> String {
        let Some(input) = self.text(key) else {
            return default.to_string();
        };
        if input.trim().is_empty() {
            return default.to_string();
        }
        match hex_color(&input) {
            Some(color) => color,
            None => {
                self.warn(
                    key,
                    WarningKind::InvalidColor {
                        input,
                        fallback: default.to_string(),
                    },
                );
                default.to_string()
            }
        }
    }

    /// URL; missing or blank is `""`.
    pub fn url(&mut self, key: &'static str) -> String {
        let Some(input) = self.text(key) else {
            return String::new();
        };
        if input.trim().is_empty() {
            return String::new();
        }
        let cleaned = clean_url(&input);
        if cleaned.is_empty() {
            self.warn(key, WarningKind::RejectedUrl { input });
        }
        cleaned
    }

    /// Single-line text, or `default` when the field is absent.
    pub fn plain_text(&mut self, key: &'static str, default: &str) -> String {
        match self.text(key) {
            Some(input) => plain_text(&input),
            None => default.to_string(),
        }
    }

    /// CSS block, `""` when absent.
    pub fn css_block(&mut self, key: &'static str) -> String {
        self.text(key).map(|input| css_block(&input)).unwrap_or_default()
    }

    /// Rich text, or `default` when the field is absent.
    pub fn rich_text(&mut self, key: &'static str, default: &str) -> String {
        match self.text(key) {
            Some(input) => rich_text(&input),
            None => default.to_string(),
        }
    }

    /// Trusted raw text, only trimmed.
    pub fn trusted(&mut self, key: &'static str) -> String {
        self.text(key).map(|s| s.trim().to_string()).unwrap_or_default()
    }

    pub fn flag(&mut self, key: &'static str) -> bool {
        is_truthy(self.raw.get(key))
    }

    /// One of a fixed set of tags; anything else becomes `default`.
    pub fn choice<T: Copy>(
        &mut self,
        key: &'static str,
        parse: impl Fn(&str) -> Option<T>,
        default: T,
        default_tag: &'static str,
    ) -> T {
        let Some(input) = self.text(key) else {
            return default;
        };
        match parse(input.trim()) {
            Some(value) => value,
            None => {
                self.warn(
                    key,
                    WarningKind::InvalidChoice {
                        input,
                        fallback: default_tag,
                    },
                );
                default
            }
        }
    }

    /// Record a warning produced outside the field rules.
    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn finish<T>(self, value: T) -> Sanitized<T> {
        Sanitized {
            value,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_hex_color_accepts() {
        assert_eq!(hex_color("aabbcc").as_deref(), Some("#aabbcc"));
        assert_eq!(hex_color("#aabbcc").as_deref(), Some("#aabbcc"));
        assert_eq!(hex_color("ABC").as_deref(), Some("#ABC"));
        assert_eq!(hex_color("  #AbC123 ").as_deref(), Some("#AbC123"));
    }

    #[test]
    fn test_hex_color_rejects() {
        for bad in ["red", "#abcd", "#gggggg", "##abc", "#aabbccdd", "", "   "] {
            assert_eq!(hex_color(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text("  <b>Accept</b>\n all  "), "Accept all");
        assert_eq!(plain_text("a\tb"), "a b");
    }

    #[test]
    fn test_css_block_keeps_style_content() {
        assert_eq!(css_block("<style>body{color:red}</style>"), "body{color:red}");
        assert_eq!(css_block("a{}\n<script>x()</script>\nb{}"), "a{}\n\nb{}");
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!("0"))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("1"))));
        assert!(is_truthy(Some(&json!("on"))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!(true))));
    }

    #[test]
    fn test_field_hex_color_fallback_warns() {
        let raw = doc(json!({"button_color": "red", "text_color": ""}));
        let mut fs = FieldSanitizer::new(&raw);
        assert_eq!(fs.hex_color("button_color", "#32373c"), "#32373c");
        assert_eq!(fs.hex_color("text_color", "#000000"), "#000000");
        assert_eq!(fs.hex_color("link_color", "#1e73be"), "#1e73be");

        let out = fs.finish(());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].field, "button_color");
    }

    #[test]
    fn test_field_url() {
        let raw = doc(json!({"logo": " https://embo.test/logo.png ", "bad": "javascript:x", "blank": ""}));
        let mut fs = FieldSanitizer::new(&raw);
        assert_eq!(fs.url("logo"), "https://embo.test/logo.png");
        assert_eq!(fs.url("bad"), "");
        assert_eq!(fs.url("blank"), "");
        assert_eq!(fs.url("missing"), "");
        assert_eq!(fs.finish(()).warnings.len(), 1);
    }

    #[test]
    fn test_field_choice() {
        let parse = |s: &str| match s {
            "a" => Some(1),
            "b" => Some(2),
            _ => None,
        };
        let raw = doc(json!({"ok": "b", "bad": "zzz"}));
        let mut fs = FieldSanitizer::new(&raw);
        assert_eq!(fs.choice("ok", parse, 1, "a"), 2);
        assert_eq!(fs.choice("bad", parse, 1, "a"), 1);
        assert_eq!(fs.choice("missing", parse, 1, "a"), 1);
        assert_eq!(fs.finish(()).warnings.len(), 1);
    }

    #[test]
    fn test_field_text_defaults_only_when_absent() {
        let raw = doc(json!({"given": ""}));
        let mut fs = FieldSanitizer::new(&raw);
        assert_eq!(fs.plain_text("given", "Accept"), "");
        assert_eq!(fs.plain_text("absent", "Accept"), "Accept");
    }
}
