//! Logo, favicon and footer note.
//!
//! The favicon is derived when the options are saved: either generated from
//! the logo by a `FaviconSource` or taken from the custom favicon URL.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::FormBuilder;
use super::sanitize::{self, FieldSanitizer};
use super::{Sanitized, SettingsModule, Warning, WarningKind, flag};
use crate::media::FaviconSource;
use crate::render::{RenderContext, Stage};
use crate::store::Document;
use crate::utils::html::{escape, escape_url, filter_allowed};
use crate::utils::url::clean_url;

/// `embo_branding_options`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingOptions {
    pub logo: String,
    #[serde(with = "flag")]
    pub favicon_from_logo: bool,
    pub favicon_custom: String,
    /// Derived; never edited directly.
    pub favicon: String,
    pub footer_note: String,
}

pub struct Branding {
    favicons: Box<dyn FaviconSource>,
}

impl Branding {
    pub fn new(favicons: Box<dyn FaviconSource>) -> Self {
        Self { favicons }
    }

    /// Branding that can never derive a favicon from the logo.
    #[cfg(test)]
    pub fn without_favicons() -> Self {
        Self::new(Box::new(crate::media::NoFavicons))
    }

    /// `<head>` favicon links, or `None` without a favicon.
    pub fn favicon_tags(&self, current: &BrandingOptions) -> Option<String> {
        if current.favicon.is_empty() {
            return None;
        }
        let url = escape_url(&current.favicon);
        if url.is_empty() {
            return None;
        }
        Some(format!(
            "<link rel=\"icon\" href=\"{url}\" sizes=\"32x32\" />\n\
             <link rel=\"shortcut icon\" href=\"{url}\" />\n"
        ))
    }

    /// Footer note block, or a copyright line when no note is set.
    pub fn render_footer_note(&self, current: &BrandingOptions, ctx: &RenderContext) -> String {
        if !current.footer_note.trim().is_empty() {
            return format!(
                "<div class=\"embo-footer-note\">{}</div>",
                filter_allowed(&current.footer_note)
            );
        }
        format!("<p>&copy; {} {}</p>", ctx.year, escape(&ctx.site_name))
    }
}

impl SettingsModule for Branding {
    type Options = BrandingOptions;

    const OPTION_NAME: &'static str = "embo_branding_options";
    const STAGES: &'static [Stage] = &[Stage::HeadMeta];

    fn sanitize(&self, raw: &Document) -> Sanitized<BrandingOptions> {
        let mut fields = FieldSanitizer::new(raw);
        let logo = fields.url("logo");
        let favicon_from_logo = fields.flag("favicon_from_logo");
        let favicon_custom = fields.url("favicon_custom");
        let footer_note = fields.rich_text("footer_note", "");

        let favicon = if favicon_from_logo && !logo.is_empty() {
            self.favicons.favicon_for(&logo).unwrap_or_else(|| {
                fields.push(Warning {
                    field: "favicon",
                    kind: WarningKind::FaviconUnavailable { logo: logo.clone() },
                });
                String::new()
            })
        } else {
            favicon_custom.clone()
        };

        fields.finish(BrandingOptions {
            logo,
            favicon_from_logo,
            favicon_custom,
            favicon,
            footer_note,
        })
    }

    fn clean_stored(key: &str, value: &Value) -> Option<Value> {
        match key {
            "favicon_from_logo" => Some(value.clone()),
            "footer_note" => value.as_str().map(|note| Value::String(sanitize::rich_text(note))),
            _ => value.as_str().map(|url| Value::String(clean_url(url))),
        }
    }

    fn render_admin_form(&self, current: &BrandingOptions) -> String {
        let mut previews = String::new();
        if !current.logo.is_empty() {
            previews.push_str(&format!(
                "<p><img src=\"{}\" alt=\"Logo\" style=\"max-width:150px; height:auto;\" /></p>\n",
                escape_url(&current.logo)
            ));
        }
        if !current.favicon.is_empty() {
            previews.push_str(&format!(
                "<p><img src=\"{}\" alt=\"Favicon preview\" style=\"width:32px; height:32px;\" /></p>\n",
                escape_url(&current.favicon)
            ));
        }

        FormBuilder::new(Self::OPTION_NAME)
            .url("logo", "Logo", &current.logo)
            .checkbox("favicon_from_logo", "Generate favicon from logo", current.favicon_from_logo)
            .url("favicon_custom", "Custom favicon (32\u{d7}32 png)", &current.favicon_custom)
            .textarea("footer_note", "Footer note", &current.footer_note, 4)
            .finish_with(&previews)
    }

    fn render_output(&self, current: &BrandingOptions, stage: Stage, _: &RenderContext) -> Option<String> {
        match stage {
            Stage::HeadMeta => self.favicon_tags(current),
            _ => None,
        }
    }
}
