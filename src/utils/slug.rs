//! Heading and title slugs.

use deunicode::deunicode;

/// Turn a title into a URL/anchor-safe slug.
///
/// Transliterates to ASCII, lowercases, keeps `[a-z0-9_]`, and joins
/// everything else into single dashes.
///
/// ```ignore
/// slugify("Привіт, світ!") -> "privit-svit"
/// slugify("  Hello   World ") -> "hello-world"
/// ```
pub fn slugify(title: &str) -> String {
    let ascii = deunicode(title).to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Привіт світ"), "privit-svit");
        assert_eq!(slugify("Café déjà vu"), "cafe-deja-vu");
    }

    #[test]
    fn test_slugify_punctuation_only() {
        assert_eq!(slugify("?!"), "");
        assert_eq!(slugify("1. Intro"), "1-intro");
    }
}
