//! Custom CSS, `@import` lines and the post loading mode.
//!
//! Import lines are printed first in `<head>`, the main CSS last, so user
//! rules win over everything the theme and other modules emit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::FormBuilder;
use super::sanitize::{self, FieldSanitizer};
use super::{Sanitized, SettingsModule};
use crate::render::blocks::Pagination;
use crate::render::{RenderContext, Stage};
use crate::store::Document;

/// How archive pages load older posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadType {
    /// "Load more" button.
    #[default]
    Ajax,
    /// Classic page links.
    Pagination,
}

impl LoadType {
    pub const ALL: [LoadType; 2] = [LoadType::Ajax, LoadType::Pagination];

    pub const fn as_str(self) -> &'static str {
        match self {
            LoadType::Ajax => "ajax",
            LoadType::Pagination => "pagination",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoadType::Ajax => "Lazy loading (Load more)",
            LoadType::Pagination => "Page navigation",
        }
    }

    pub fn parse(s: &str) -> Option<LoadType> {
        LoadType::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// `embo_custom_css_options`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomCssOptions {
    pub load_type: LoadType,
    pub import: String,
    pub css: String,
}

impl CustomCssOptions {
    /// `<style>` block of import lines, each terminated by `; `.
    pub fn import_block(&self) -> Option<String> {
        let block: String = self
            .import
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("{}; ", line.trim_end_matches(';')))
            .collect();
        if block.is_empty() {
            return None;
        }
        Some(format!("<style id=\"custom-css-import-inline-css\">{block}</style>"))
    }

    pub fn main_block(&self) -> Option<String> {
        let css = self.css.trim();
        if css.is_empty() {
            return None;
        }
        Some(format!("<style id=\"custom-css-css-inline-css\">{css}</style>"))
    }
}

pub struct CustomCss;

impl CustomCss {
    /// Load-toggle block: page links or a "load more" button.
    ///
    /// Without a `pagination` position the link list is empty.
    pub fn render_load_toggle(current: &CustomCssOptions, pagination: Option<&Pagination>) -> String {
        match current.load_type {
            LoadType::Pagination => format!(
                "<div class=\"fallback-pagination\">{}</div>",
                pagination.map(Pagination::render_links).unwrap_or_default()
            ),
            LoadType::Ajax => "<div class=\"load-more\"><button id=\"loadMoreButton\" \
                               class=\"button is-primary\">Load older posts</button></div>"
                .to_string(),
        }
    }
}

impl SettingsModule for CustomCss {
    type Options = CustomCssOptions;

    const OPTION_NAME: &'static str = "embo_custom_css_options";
    const STAGES: &'static [Stage] = &[Stage::HeadImport, Stage::HeadMain];

    fn sanitize(&self, raw: &Document) -> Sanitized<CustomCssOptions> {
        let mut fields = FieldSanitizer::new(raw);
        let options = CustomCssOptions {
            load_type: fields.choice("load_type", LoadType::parse, LoadType::Ajax, "ajax"),
            import: fields.css_block("import"),
            css: fields.css_block("css"),
        };
        fields.finish(options)
    }

    fn clean_stored(key: &str, value: &Value) -> Option<Value> {
        let text = value.as_str()?;
        let clean = match key {
            "load_type" => LoadType::parse(text.trim())?.as_str().to_string(),
            _ => sanitize::css_block(text),
        };
        Some(Value::String(clean))
    }

    fn render_admin_form(&self, current: &CustomCssOptions) -> String {
        let choices: Vec<(&str, &str)> = LoadType::ALL
            .iter()
            .map(|t| (t.as_str(), t.label()))
            .collect();
        FormBuilder::new(Self::OPTION_NAME)
            .radio("load_type", "Post loading type", &choices, current.load_type.as_str())
            .textarea("import", "Import (e.g. for fonts)", &current.import, 3)
            .textarea("css", "Custom CSS", &current.css, 10)
            .finish()
    }

    fn render_output(&self, current: &CustomCssOptions, stage: Stage, _: &RenderContext) -> Option<String> {
        match stage {
            Stage::HeadImport => current.import_block(),
            Stage::HeadMain => current.main_block(),
            _ => None,
        }
    }
}
