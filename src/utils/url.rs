//! URL cleaning for user-supplied links.
//!
//! `clean_url` is total: anything it cannot make safe comes back as an
//! empty string.
//!
//! ```ignore
//! clean_url("example.com/a b")      -> "http://example.com/a%20b"
//! clean_url("/relative?x=1")        -> "/relative?x=1"
//! clean_url("javascript:alert(1)")  -> ""
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Schemes a stored URL may use.
pub const ALLOWED_PROTOCOLS: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "irc6", "ircs", "gopher", "nntp",
    "feed", "telnet", "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Characters outside the URL-safe set.
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\-~+_.?#=!&;,/:%@$|*'()\[\]\x{80}-\x{10FFFF}]").unwrap()
});

/// Encoded CR/LF/NUL that could split headers.
static ENCODED_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%0*(?:0d|0a|00)").unwrap());

/// Bare `something.php` links are kept relative.
static PHP_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9-]+?\.php").unwrap());

/// Clean a URL for storage or output.
///
/// Whitespace is trimmed, inner spaces become `%20`, characters outside the
/// URL-safe set are removed. Values without a scheme get `http://` unless
/// they are relative (`/`, `#`, `?`). The scheme must be allow-listed and
/// absolute URLs must parse.
pub fn clean_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let spaced = trimmed.replace(' ', "%20");
    let mut url = DISALLOWED.replace_all(&spaced, "").into_owned();
    while ENCODED_BREAKS.is_match(&url) {
        url = ENCODED_BREAKS.replace_all(&url, "").into_owned();
    }
    if url.is_empty() {
        return String::new();
    }

    let relative = url.starts_with(['/', '#', '?']);
    if !url.contains(':') && !relative && !PHP_FILE.is_match(&url) {
        url.insert_str(0, "http://");
    }

    if relative || !has_scheme(&url) {
        return url;
    }

    match scheme_of(&url) {
        Some(scheme) if ALLOWED_PROTOCOLS.contains(&scheme.to_ascii_lowercase().as_str()) => {}
        _ => return String::new(),
    }

    match url::Url::parse(&url) {
        Ok(_) => url,
        Err(_) => String::new(),
    }
}

/// Whether the colon (if any) appears before the first path/query/fragment.
fn has_scheme(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return false;
    };
    match url.find(['/', '?', '#']) {
        Some(stop) => colon < stop,
        None => true,
    }
}

fn scheme_of(url: &str) -> Option<&str> {
    url.split_once(':').map(|(scheme, _)| scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_url_absolute() {
        assert_eq!(clean_url(" https://example.com/logo.png "), "https://example.com/logo.png");
        assert_eq!(clean_url("mailto:me@example.com"), "mailto:me@example.com");
    }

    #[test]
    fn test_clean_url_adds_scheme() {
        assert_eq!(clean_url("example.com/a b"), "http://example.com/a%20b");
    }

    #[test]
    fn test_clean_url_relative() {
        assert_eq!(clean_url("/uploads/logo.png"), "/uploads/logo.png");
        assert_eq!(clean_url("#top"), "#top");
        assert_eq!(clean_url("?page=2"), "?page=2");
        assert_eq!(clean_url("admin.php?x=1"), "admin.php?x=1");
    }

    #[test]
    fn test_clean_url_rejects_bad_scheme() {
        assert_eq!(clean_url("javascript:alert(1)"), "");
        assert_eq!(clean_url("data:text/html;base64,AAAA"), "");
    }

    #[test]
    fn test_clean_url_strips_characters() {
        assert_eq!(clean_url("https://example.com/<x>\"y\""), "https://example.com/xy");
        assert_eq!(clean_url("https://example.com/a%0d%0aSet-Cookie"), "https://example.com/aSet-Cookie");
    }

    #[test]
    fn test_clean_url_empty() {
        assert_eq!(clean_url(""), "");
        assert_eq!(clean_url("   "), "");
        assert_eq!(clean_url("<>"), "");
    }
}
