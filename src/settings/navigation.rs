//! Per-category page navigation (table of contents).
//!
//! A category flag turns on the TOC tab for single posts in that category.
//! Flags live under one option key as `{ "<category id>": 0 | 1 }`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::sanitize::is_truthy;
use crate::render::{RenderContext, Stage, toc};
use crate::store::{Document, OptionStore, StoreResult};
use crate::utils::html::escape_url;

pub const OPTION_NAME: &str = "embo_category_toc";

/// TOC script, relative to the plugin asset directory.
pub const TOC_SCRIPT: &str = "js/embo-toc.js";

const TOC_CSS: &str = ".tab-panel{ display:none; }
.tab-panel.active{ display:block; }
.toc-list{ list-style:none; padding-left:0; }
.toc-list li{ margin-bottom:.5em; }
.toc-list li.toc-h3{ padding-left:1em; }
";

const FIELD_LABEL: &str = "Heading navigation";
const FIELD_HELP: &str = "Show the \u{ab}Page navigation\u{bb} tab in the sidebar for posts in this category.";

pub struct CategoryToc {
    script_url: String,
    version: String,
}

impl CategoryToc {
    /// `assets_base` is the public URL of the plugin asset directory and
    /// `version` the cache-busting value of the TOC script.
    pub fn new(assets_base: &str, version: impl Into<String>) -> Self {
        Self {
            script_url: format!("{}/{}", assets_base.trim_end_matches('/'), TOC_SCRIPT),
            version: version.into(),
        }
    }

    // ========================================================================
    // Category flags
    // ========================================================================

    /// All stored flags by category id.
    pub fn flags(store: &dyn OptionStore) -> StoreResult<BTreeMap<String, bool>> {
        let stored = store.get_or(OPTION_NAME, Document::new())?;
        Ok(stored
            .iter()
            .map(|(id, value)| (id.clone(), is_truthy(Some(value))))
            .collect())
    }

    pub fn is_enabled(store: &dyn OptionStore, category: &str) -> StoreResult<bool> {
        let stored = store.get_or(OPTION_NAME, Document::new())?;
        Ok(is_truthy(stored.get(category)))
    }

    pub fn set_enabled(store: &dyn OptionStore, category: &str, enabled: bool) -> StoreResult<()> {
        let mut stored = store.get_or(OPTION_NAME, Document::new())?;
        stored.insert(category.to_string(), Value::from(u8::from(enabled)));
        store.set(OPTION_NAME, stored)
    }

    /// Handle a submitted category form: the flag is on iff `enable_toc`
    /// was posted at all.
    pub fn save_category_field(
        store: &dyn OptionStore,
        category: &str,
        submitted: &Document,
    ) -> StoreResult<bool> {
        let enabled = submitted.contains_key("enable_toc");
        Self::set_enabled(store, category, enabled)?;
        Ok(enabled)
    }

    /// Whether TOC assets belong on the page being rendered.
    pub fn should_load(store: &dyn OptionStore, ctx: &RenderContext) -> StoreResult<bool> {
        if !ctx.is_single_post() || ctx.categories.is_empty() {
            return Ok(false);
        }
        let flags = Self::flags(store)?;
        Ok(ctx.categories.iter().any(|id| flags.get(id).copied().unwrap_or(false)))
    }

    // ========================================================================
    // Category forms
    // ========================================================================

    /// Checkbox for the "add category" form.
    pub fn render_add_field() -> String {
        format!(
            "<div class=\"form-field term-group\">\n\
             <label for=\"enable_toc\">{FIELD_LABEL}</label>\n\
             <input type=\"checkbox\" name=\"enable_toc\" id=\"enable_toc\" value=\"1\" />\n\
             <p class=\"description\">{FIELD_HELP}</p>\n\
             </div>\n"
        )
    }

    /// Checkbox row for the "edit category" form.
    pub fn render_edit_field(enabled: bool) -> String {
        format!(
            "<tr class=\"form-field term-group-wrap\">\n\
             <th scope=\"row\"><label for=\"enable_toc\">{FIELD_LABEL}</label></th>\n\
             <td>\n\
             <input type=\"checkbox\" name=\"enable_toc\" id=\"enable_toc\" value=\"1\"{} />\n\
             <p class=\"description\">{FIELD_HELP}</p>\n\
             </td>\n\
             </tr>\n",
            if enabled { " checked=\"checked\"" } else { "" }
        )
    }

    // ========================================================================
    // Front end
    // ========================================================================

    /// Post content with heading anchors on singular pages.
    pub fn prepare_content<'c>(content: &'c str, ctx: &RenderContext) -> Cow<'c, str> {
        if ctx.singular {
            toc::add_heading_ids(content)
        } else {
            Cow::Borrowed(content)
        }
    }

    /// Tab CSS and the script tags. Call only when `should_load` holds.
    pub fn render_assets(&self, stage: Stage) -> Option<String> {
        match stage {
            Stage::InlineStyles => Some(TOC_CSS.to_string()),
            Stage::Footer => {
                let i18n = json!({ "tabPosts": "Timeline", "tabToc": "Page navigation" });
                let src = escape_url(&format!("{}?ver={}", self.script_url, self.version));
                Some(format!(
                    "<script id=\"embo-toc-js-extra\">\nvar EmboSettingsI18n = {};\n</script>\n\
                     <script src=\"{}\" id=\"embo-toc-js\"></script>\n",
                    i18n, src
                ))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn post_ctx(categories: &[&str]) -> RenderContext {
        RenderContext {
            singular: true,
            post_type: Some("post".into()),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..RenderContext::new("Embo", 2024)
        }
    }

    #[test]
    fn test_flags_default_off() {
        let store = MemoryStore::new();
        assert!(!CategoryToc::is_enabled(&store, "3").unwrap());
        assert!(CategoryToc::flags(&store).unwrap().is_empty());
    }

    #[test]
    fn test_save_category_field_by_presence() {
        let store = MemoryStore::new();
        let mut submitted = Document::new();
        submitted.insert("enable_toc".into(), Value::from("1"));
        assert!(CategoryToc::save_category_field(&store, "3", &submitted).unwrap());
        assert!(CategoryToc::is_enabled(&store, "3").unwrap());

        assert!(!CategoryToc::save_category_field(&store, "3", &Document::new()).unwrap());
        assert!(!CategoryToc::is_enabled(&store, "3").unwrap());
        assert_eq!(store.get(OPTION_NAME).unwrap().unwrap()["3"], 0);
    }

    #[test]
    fn test_should_load_needs_single_post_in_enabled_category() {
        let store = MemoryStore::new();
        CategoryToc::set_enabled(&store, "7", true).unwrap();
        CategoryToc::set_enabled(&store, "8", false).unwrap();

        assert!(CategoryToc::should_load(&store, &post_ctx(&["8", "7"])).unwrap());
        assert!(!CategoryToc::should_load(&store, &post_ctx(&["8"])).unwrap());
        assert!(!CategoryToc::should_load(&store, &post_ctx(&[])).unwrap());

        let mut page = post_ctx(&["7"]);
        page.post_type = Some("page".into());
        assert!(!CategoryToc::should_load(&store, &page).unwrap());

        let mut archive = post_ctx(&["7"]);
        archive.singular = false;
        assert!(!CategoryToc::should_load(&store, &archive).unwrap());
    }

    #[test]
    fn test_assets() {
        let toc = CategoryToc::new("/wp-content/plugins/embo-settings/", "abc12345");
        let css = toc.render_assets(Stage::InlineStyles).unwrap();
        assert!(css.contains(".toc-list li.toc-h3{ padding-left:1em; }"));

        let scripts = toc.render_assets(Stage::Footer).unwrap();
        assert!(scripts.contains(r#"var EmboSettingsI18n = {"tabPosts":"Timeline","tabToc":"Page navigation"};"#));
        assert!(scripts.contains("src=\"/wp-content/plugins/embo-settings/js/embo-toc.js?ver=abc12345\""));
        assert_eq!(toc.render_assets(Stage::HeadMain), None);
    }

    #[test]
    fn test_prepare_content_only_when_singular() {
        let content = "<h2>Intro</h2>";
        let mut ctx = post_ctx(&[]);
        assert_eq!(CategoryToc::prepare_content(content, &ctx), "<h2 id=\"intro\">Intro</h2>");
        ctx.singular = false;
        assert_eq!(CategoryToc::prepare_content(content, &ctx), content);
    }

    #[test]
    fn test_edit_field_checked() {
        assert!(CategoryToc::render_edit_field(true).contains("value=\"1\" checked=\"checked\""));
        assert!(!CategoryToc::render_edit_field(false).contains("checked"));
        assert!(CategoryToc::render_add_field().contains("name=\"enable_toc\""));
    }
}
