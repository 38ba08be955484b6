//! Dynamic blocks, shortcodes and pagination links.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::html::escape_url;

/// Server-rendered blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// Footer note or copyright fallback.
    FooterNote,
    /// Pagination or "load more" button.
    LoadToggle,
}

impl Block {
    pub const ALL: [Block; 2] = [Block::FooterNote, Block::LoadToggle];

    /// Registered block type name.
    pub const fn name(self) -> &'static str {
        match self {
            Block::FooterNote => "myblocktheme/footer-note",
            Block::LoadToggle => "embo/load-toggle",
        }
    }

    /// Shortcode tag, when the block also has one.
    pub const fn shortcode(self) -> Option<&'static str> {
        match self {
            Block::FooterNote => Some("embo_footer_note"),
            Block::LoadToggle => None,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Block {
    type Err = String;

    /// Accepts the block name, or its short form (`footer-note`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Block::ALL
            .into_iter()
            .find(|block| {
                let name = block.name();
                name == s || name.rsplit('/').next() == Some(s)
            })
            .ok_or_else(|| format!("unknown block `{s}`"))
    }
}

// ============================================================================
// Shortcodes
// ============================================================================

/// `[tag]`, `[tag /]` or `[tag attr="x"]`; attributes are ignored.
static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([a-z0-9_]+)(?:\s[^\]]*)?/?\]").unwrap());

/// Replace self-closing shortcodes by `resolve(tag)`. Unknown tags stay.
pub fn expand_shortcodes<F>(content: &str, resolve: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    SHORTCODE
        .replace_all(content, |caps: &Captures<'_>| {
            resolve(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ============================================================================
// Pagination
// ============================================================================

/// Position in a paginated archive.
///
/// `base` holds a `%#%` placeholder for the page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
    pub base: String,
}

const END_SIZE: u32 = 1;
const MID_SIZE: u32 = 2;

impl Pagination {
    pub fn new(current: u32, total: u32, base: impl Into<String>) -> Self {
        Self {
            current: current.clamp(1, total.max(1)),
            total,
            base: base.into(),
        }
    }

    fn url(&self, page: u32) -> String {
        escape_url(&self.base.replace("%#%", &page.to_string()))
    }

    /// `<ul class='page-numbers'>` list with previous/next arrows.
    ///
    /// Shows the first and last page, two pages around the current one and
    /// `…` for the gaps. A single page renders nothing.
    pub fn render_links(&self) -> String {
        if self.total < 2 {
            return String::new();
        }

        let mut items = Vec::new();
        if self.current > 1 {
            items.push(format!(
                "<a class=\"prev page-numbers\" href=\"{}\">&laquo;</a>",
                self.url(self.current - 1)
            ));
        }

        let mut gap = false;
        for page in 1..=self.total {
            if page == self.current {
                items.push(format!(
                    "<span aria-current=\"page\" class=\"page-numbers current\">{page}</span>"
                ));
                gap = true;
                continue;
            }
            let near_edge = page <= END_SIZE || page > self.total - END_SIZE;
            let near_current = page.abs_diff(self.current) <= MID_SIZE;
            if near_edge || near_current {
                items.push(format!(
                    "<a class=\"page-numbers\" href=\"{}\">{page}</a>",
                    self.url(page)
                ));
                gap = true;
            } else if gap {
                items.push("<span class=\"page-numbers dots\">&hellip;</span>".to_string());
                gap = false;
            }
        }

        if self.current < self.total {
            items.push(format!(
                "<a class=\"next page-numbers\" href=\"{}\">&raquo;</a>",
                self.url(self.current + 1)
            ));
        }

        let mut html = String::from("<ul class='page-numbers'>\n");
        for item in items {
            html.push_str("\t<li>");
            html.push_str(&item);
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names() {
        assert_eq!("footer-note".parse::<Block>().unwrap(), Block::FooterNote);
        assert_eq!("embo/load-toggle".parse::<Block>().unwrap(), Block::LoadToggle);
        assert!("nav".parse::<Block>().is_err());
    }

    #[test]
    fn test_expand_shortcodes() {
        let out = expand_shortcodes("a [embo_footer_note] b [embo_footer_note /] [other]", |tag| {
            (tag == "embo_footer_note").then(|| "NOTE".to_string())
        });
        assert_eq!(out, "a NOTE b NOTE [other]");
    }

    #[test]
    fn test_single_page_has_no_links() {
        assert_eq!(Pagination::new(1, 1, "/page/%#%/").render_links(), "");
    }

    #[test]
    fn test_links_first_page() {
        let html = Pagination::new(1, 3, "/page/%#%/").render_links();
        assert!(!html.contains("prev"));
        assert!(html.contains("<span aria-current=\"page\" class=\"page-numbers current\">1</span>"));
        assert!(html.contains("<a class=\"page-numbers\" href=\"/page/3/\">3</a>"));
        assert!(html.contains("<a class=\"next page-numbers\" href=\"/page/2/\">&raquo;</a>"));
        assert!(!html.contains("dots"));
    }

    #[test]
    fn test_links_collapse_gaps() {
        let html = Pagination::new(6, 12, "/page/%#%/").render_links();
        assert!(html.contains("href=\"/page/1/\">1</a>"));
        assert!(!html.contains(">2</a>"));
        assert!(html.contains(">4</a>"));
        assert!(html.contains(">8</a>"));
        assert!(!html.contains(">9</a>"));
        assert!(html.contains(">12</a>"));
        assert_eq!(html.matches("dots").count(), 2);
        assert!(html.starts_with("<ul class='page-numbers'>"));
    }

    #[test]
    fn test_current_is_clamped() {
        assert_eq!(Pagination::new(9, 3, "?p=%#%").current, 3);
        assert_eq!(Pagination::new(0, 3, "?p=%#%").current, 1);
    }
}
