//! Cookie consent banner and analytics snippet.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::FormBuilder;
use super::sanitize::{self, FieldSanitizer};
use super::{Sanitized, SettingsModule};
use crate::render::{RenderContext, Stage};
use crate::store::Document;
use crate::utils::html::{escape, escape_js};

pub const DEFAULT_MESSAGE: &str =
    "This site uses cookies to improve your experience. <a href=\"#\">Learn more</a>.";
pub const DEFAULT_BUTTON_TEXT: &str = "Accept";

const BANNER_CSS: &str = "#cookie-banner {
    position: fixed;
    bottom: 0;
    left: 0;
    right: 0;
    padding: 1em;
    background: rgba(0,0,0,0.8);
    color: #fff;
    text-align: center;
    z-index: 9999;
}
#cookie-banner a { color: #ffd; text-decoration: underline; }
#cookie-accept-btn {
    margin-left: 1em;
    background: #3273dc;
    color: #fff;
    border: none;
    padding: .5em 1em;
    cursor: pointer;
    border-radius: 4px;
}
";

/// `embo_cookie_analytics_options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieOptions {
    /// Rich text shown in the banner.
    pub embo_cookie_message: String,
    pub cookie_button_text: String,
    /// Trusted snippet printed verbatim in `<head>`.
    pub ga_code: String,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            embo_cookie_message: DEFAULT_MESSAGE.to_string(),
            cookie_button_text: DEFAULT_BUTTON_TEXT.to_string(),
            ga_code: String::new(),
        }
    }
}

pub struct CookieAnalytics;

impl CookieAnalytics {
    /// Inline script that shows the banner until consent is stored.
    pub fn banner_script(current: &CookieOptions) -> String {
        let message = escape_js(&current.embo_cookie_message);
        let button = escape_js(&escape(&current.cookie_button_text));
        format!(
            r#"<script>
(function(){{
    if ( ! localStorage.getItem('cookieAccepted') ) {{
        var banner = document.createElement('div');
        banner.id = 'cookie-banner';
        banner.innerHTML = '{message}'
                         + ' <button id="cookie-accept-btn">{button}</button>';
        document.body.appendChild(banner);
        document.getElementById('cookie-accept-btn').addEventListener('click', function(){{
            localStorage.setItem('cookieAccepted', '1');
            banner.style.display = 'none';
        }});
    }}
}})();
</script>
"#
        )
    }
}

impl SettingsModule for CookieAnalytics {
    type Options = CookieOptions;

    const OPTION_NAME: &'static str = "embo_cookie_analytics_options";
    const STAGES: &'static [Stage] = &[Stage::HeadAnalytics, Stage::InlineStyles, Stage::Footer];

    fn sanitize(&self, raw: &Document) -> Sanitized<CookieOptions> {
        let mut fields = FieldSanitizer::new(raw);
        let options = CookieOptions {
            embo_cookie_message: fields.rich_text("embo_cookie_message", DEFAULT_MESSAGE),
            cookie_button_text: fields.plain_text("cookie_button_text", DEFAULT_BUTTON_TEXT),
            ga_code: fields.trusted("ga_code"),
        };
        fields.finish(options)
    }

    fn clean_stored(key: &str, value: &Value) -> Option<Value> {
        let text = value.as_str()?;
        let clean = match key {
            "embo_cookie_message" => sanitize::rich_text(text),
            "cookie_button_text" => sanitize::plain_text(text),
            _ => text.trim().to_string(),
        };
        Some(Value::String(clean))
    }

    fn render_admin_form(&self, current: &CookieOptions) -> String {
        FormBuilder::new(Self::OPTION_NAME)
            .textarea("embo_cookie_message", "Cookie banner message", &current.embo_cookie_message, 4)
            .text("cookie_button_text", "Accept button text", &current.cookie_button_text, "regular-text")
            .textarea("ga_code", "Google Analytics code", &current.ga_code, 6)
            .finish()
    }

    fn render_output(&self, current: &CookieOptions, stage: Stage, _: &RenderContext) -> Option<String> {
        match stage {
            Stage::HeadAnalytics => Some(current.ga_code.clone()).filter(|code| !code.is_empty()),
            Stage::InlineStyles => Some(BANNER_CSS.to_string()),
            Stage::Footer => Some(Self::banner_script(current)),
            _ => None,
        }
    }
}
