//! Heading anchors and table-of-contents lists.
//!
//! Works on post content fragments, not whole documents. Headings are
//! `h2`–`h6`; `h1` belongs to the page title.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rustc_hash::FxHashSet;

use crate::utils::html::{escape, escape_attr, parse_attributes, strip_all_tags, unescape};
use crate::utils::slug::slugify;

/// `<hN attrs>inner</hM>`; N and M are compared by the caller.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([2-6])(\s[^>]*)?>(.*?)</h([2-6])\s*>").unwrap());

/// A heading found in content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

fn heading_text(inner: &str) -> String {
    unescape(&strip_all_tags(inner)).trim().to_string()
}

fn id_of(attrs: &str) -> Option<String> {
    parse_attributes(attrs.trim().trim_end_matches('/'))
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("id"))
        .map(|(_, value)| value)
}

/// Matched opening and closing levels, or `None` for a malformed pair.
fn level(caps: &Captures<'_>) -> Option<u8> {
    (caps[1] == caps[4]).then(|| caps[1].as_bytes()[0] - b'0')
}

/// Give every `h2`–`h6` without an `id` one derived from its text.
///
/// Repeated slugs get `-2`, `-3`, … suffixes. Headings whose text yields
/// no slug are left alone.
pub fn add_heading_ids(content: &str) -> Cow<'_, str> {
    let mut used: FxHashSet<String> = HEADING
        .captures_iter(content)
        .filter_map(|caps| caps.get(2).and_then(|attrs| id_of(attrs.as_str())))
        .collect();

    HEADING.replace_all(content, |caps: &Captures<'_>| {
        let Some(level) = level(caps) else {
            return caps[0].to_string();
        };
        let attrs = caps.get(2).map_or("", |m| m.as_str());
        if id_of(attrs).is_some() {
            return caps[0].to_string();
        }

        let inner = &caps[3];
        let base = slugify(&heading_text(inner));
        if base.is_empty() {
            return caps[0].to_string();
        }
        let mut id = base.clone();
        let mut n = 2;
        while used.contains(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        used.insert(id.clone());

        format!("<h{level}{attrs} id=\"{}\">{inner}</h{level}>", escape_attr(&id))
    })
}

/// Headings that carry an `id`, in document order.
pub fn headings(content: &str) -> Vec<Heading> {
    HEADING
        .captures_iter(content)
        .filter_map(|caps| {
            let level = level(&caps)?;
            let id = caps.get(2).and_then(|attrs| id_of(attrs.as_str()))?;
            Some(Heading {
                level,
                id,
                text: heading_text(&caps[3]),
            })
        })
        .collect()
}

/// `<ul class="toc-list">` linking to each heading. Empty input gives `""`.
pub fn render_toc_list(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"toc-list\">");
    for heading in headings {
        html.push_str(&format!(
            "<li class=\"toc-h{}\"><a href=\"#{}\">{}</a></li>",
            heading.level,
            escape_attr(&heading.id),
            escape(&heading.text)
        ));
    }
    html.push_str("</ul>");
    html
}
