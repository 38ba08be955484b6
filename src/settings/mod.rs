//! Settings modules.
//!
//! Each module owns one option key, its defaults, its sanitizer and its
//! renderers:
//!
//! | Module        | Option key                        | Admin tab    |
//! |---------------|-----------------------------------|--------------|
//! | `colors`      | `embo_colors_options`             | `colors`     |
//! | `branding`    | `embo_branding_options`           | `branding`   |
//! | `cookie`      | `embo_cookie_analytics_options`   | `cookies`    |
//! | `custom_css`  | `embo_custom_css_options`         | `custom-css` |
//! | `navigation`  | `embo_category_toc`               | (term forms) |
//!
//! Data flow: raw submission → `sanitize` → persisted whole. Reads go
//! through `load`, which merges the stored document over the defaults.

pub mod branding;
pub mod colors;
pub mod cookie;
pub mod custom_css;
pub mod form;
pub mod merge;
pub mod navigation;
pub mod page;
pub mod sanitize;

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::log;
use crate::render::{RenderContext, Stage};
use crate::store::{Document, OptionStore, StoreError};

// ============================================================================
// Sanitized results
// ============================================================================

/// A field value that was replaced during sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub field: &'static str,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    InvalidColor { input: String, fallback: String },
    RejectedUrl { input: String },
    InvalidChoice { input: String, fallback: &'static str },
    FaviconUnavailable { logo: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::InvalidColor { input, fallback } => write!(
                f,
                "`{}`: `{}` is not a hex color, using `{}`",
                self.field, input, fallback
            ),
            WarningKind::RejectedUrl { input } => {
                write!(f, "`{}`: `{}` is not an allowed URL, cleared", self.field, input)
            }
            WarningKind::InvalidChoice { input, fallback } => write!(
                f,
                "`{}`: `{}` is not a valid choice, using `{}`",
                self.field, input, fallback
            ),
            WarningKind::FaviconUnavailable { logo } => write!(
                f,
                "`{}`: no favicon could be derived from `{}`",
                self.field, logo
            ),
        }
    }
}

/// Sanitizer output: the clean value plus what was replaced on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

// ============================================================================
// Module trait
// ============================================================================

/// One feature area of the settings surface.
pub trait SettingsModule {
    /// Typed record; `Default` is the canonical defaults document.
    type Options: Serialize + DeserializeOwned + Default + Clone;

    /// Option store key.
    const OPTION_NAME: &'static str;

    /// Render stages this module writes to.
    const STAGES: &'static [Stage];

    fn sanitize(&self, raw: &Document) -> Sanitized<Self::Options>;

    /// Re-check one stored value on read. `None` falls back to the default.
    ///
    /// Only called for values of the default's JSON kind.
    fn clean_stored(_key: &str, value: &Value) -> Option<Value> {
        Some(value.clone())
    }

    fn render_admin_form(&self, current: &Self::Options) -> String;

    /// Output for one stage. `None` when the module has nothing to emit.
    fn render_output(
        &self,
        current: &Self::Options,
        stage: Stage,
        ctx: &RenderContext,
    ) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not encode option `{0}`")]
    Encode(&'static str, #[source] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Serialize a typed record into a document.
pub fn to_document<T: Serialize>(value: &T) -> serde_json::Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom("options must serialize to an object")),
    }
}

/// The defaults of `M` as a document.
pub fn defaults_document<M: SettingsModule>() -> SettingsResult<Document> {
    to_document(&M::Options::default()).map_err(|err| SettingsError::Encode(M::OPTION_NAME, err))
}

/// Read the options of `M`, merged over defaults.
///
/// Every stored key goes through [`SettingsModule::clean_stored`]; a key
/// that fails keeps its default while the others keep their stored values.
/// A document that still fails to decode is logged and replaced by the
/// defaults.
pub fn load<M: SettingsModule>(store: &dyn OptionStore) -> SettingsResult<M::Options> {
    let Some(stored) = store.get(M::OPTION_NAME)? else {
        return Ok(M::Options::default());
    };
    let merged = merge::merge_with(&stored, &defaults_document::<M>()?, |key, value, default| {
        if !merge::same_kind(value, default) {
            return None;
        }
        M::clean_stored(key, value)
    });
    match serde_json::from_value(Value::Object(merged)) {
        Ok(options) => Ok(options),
        Err(err) => {
            log!("warning"; "stored `{}` is unreadable ({}), using defaults", M::OPTION_NAME, err);
            Ok(M::Options::default())
        }
    }
}

/// Sanitize `raw` and persist the result under the module's key.
pub fn save<M: SettingsModule>(
    module: &M,
    store: &dyn OptionStore,
    raw: &Document,
) -> SettingsResult<Sanitized<M::Options>> {
    let sanitized = module.sanitize(raw);
    persist::<M>(store, &sanitized.value)?;
    Ok(sanitized)
}

/// Overwrite the module's key with its defaults.
pub fn reset<M: SettingsModule>(store: &dyn OptionStore) -> SettingsResult<M::Options> {
    let defaults = M::Options::default();
    persist::<M>(store, &defaults)?;
    Ok(defaults)
}

/// Write an already clean record, merged over the defaults.
pub fn persist<M: SettingsModule>(store: &dyn OptionStore, options: &M::Options) -> SettingsResult<()> {
    let document = to_document(options).map_err(|err| SettingsError::Encode(M::OPTION_NAME, err))?;
    store.set(M::OPTION_NAME, merge::merge(&document, &defaults_document::<M>()?))?;
    Ok(())
}

// ============================================================================
// Serde helpers
// ============================================================================

/// Booleans persisted as `0`/`1`, read back from any truthy value.
pub mod flag {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(super::sanitize::is_truthy(Some(&value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::branding::Branding;
    use crate::settings::colors::{Colors, ColorsOptions};
    use crate::settings::cookie::CookieAnalytics;
    use crate::settings::custom_css::{CustomCss, LoadType};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_load_absent_is_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load::<Colors>(&store).unwrap(), ColorsOptions::default());
    }

    #[test]
    fn test_save_then_load_has_every_default_key() {
        let store = MemoryStore::new();
        save(&Colors, &store, &doc(json!({"text_color": "#123456"}))).unwrap();

        let stored = store.get(Colors::OPTION_NAME).unwrap().unwrap();
        let defaults = defaults_document::<Colors>().unwrap();
        for key in defaults.keys() {
            assert!(stored.contains_key(key), "missing `{key}`");
        }
        assert_eq!(load::<Colors>(&store).unwrap().text_color, "#123456");
    }

    #[test]
    fn test_load_merges_partial_document() {
        let store = MemoryStore::new();
        store
            .set(Colors::OPTION_NAME, doc(json!({"link_color": "#abcdef", "stale": 1})))
            .unwrap();
        let options = load::<Colors>(&store).unwrap();
        assert_eq!(options.link_color, "#abcdef");
        assert_eq!(options.background_color, "#b22222");
    }

    #[test]
    fn test_load_invalid_choice_keeps_other_keys() {
        let store = MemoryStore::new();
        store
            .set(
                CustomCss::OPTION_NAME,
                doc(json!({
                    "load_type": "sideways",
                    "css": "body{margin:0}",
                    "import": "@import url(a.css)",
                })),
            )
            .unwrap();
        let options = load::<CustomCss>(&store).unwrap();
        assert_eq!(options.load_type, LoadType::Ajax);
        assert_eq!(options.css, "body{margin:0}");
        assert_eq!(options.import, "@import url(a.css)");
    }

    #[test]
    fn test_load_rejects_invalid_stored_color() {
        let store = MemoryStore::new();
        store
            .set(
                Colors::OPTION_NAME,
                doc(json!({
                    "background_color": "red; } body { display:none",
                    "text_color": "abc",
                })),
            )
            .unwrap();
        let options = load::<Colors>(&store).unwrap();
        assert_eq!(options.background_color, "#b22222");
        assert_eq!(options.text_color, "#abc");

        let css = options.inline_css();
        assert!(css.contains("body { background-color: #b22222; }"));
        assert!(!css.contains("display:none"));
    }

    #[test]
    fn test_load_cleans_stored_markup() {
        let store = MemoryStore::new();
        store
            .set(
                CookieAnalytics::OPTION_NAME,
                doc(json!({
                    "embo_cookie_message": "Hi <b>there</b><script>evil()</script>",
                    "cookie_button_text": "<i>OK</i>",
                })),
            )
            .unwrap();
        let options = load::<CookieAnalytics>(&store).unwrap();
        assert_eq!(options.embo_cookie_message, "Hi <b>there</b>");
        assert_eq!(options.cookie_button_text, "OK");
    }

    #[test]
    fn test_load_rejects_stored_script_url() {
        let store = MemoryStore::new();
        store
            .set(
                Branding::OPTION_NAME,
                doc(json!({
                    "logo": "https://embo.test/logo.png",
                    "favicon": "javascript:alert(1)",
                    "favicon_from_logo": 1,
                })),
            )
            .unwrap();
        let options = load::<Branding>(&store).unwrap();
        assert_eq!(options.logo, "https://embo.test/logo.png");
        assert_eq!(options.favicon, "");
        assert!(options.favicon_from_logo);
    }

    #[test]
    fn test_reset_overwrites() {
        let store = MemoryStore::new();
        save(&Colors, &store, &doc(json!({"text_color": "#123456"}))).unwrap();
        reset::<Colors>(&store).unwrap();
        assert_eq!(load::<Colors>(&store).unwrap(), ColorsOptions::default());
    }

    #[test]
    fn test_flag_roundtrip_as_integer() {
        #[derive(Serialize, serde::Deserialize)]
        struct Toggle {
            #[serde(with = "flag")]
            on: bool,
        }
        assert_eq!(serde_json::to_value(Toggle { on: true }).unwrap(), json!({"on": 1}));
        let toggle: Toggle = serde_json::from_value(json!({"on": "0"})).unwrap();
        assert!(!toggle.on);
        let toggle: Toggle = serde_json::from_value(json!({"on": "1"})).unwrap();
        assert!(toggle.on);
    }

    #[test]
    fn test_warning_display_names_field() {
        let warning = Warning {
            field: "button_color",
            kind: WarningKind::InvalidColor {
                input: "red".into(),
                fallback: "#32373c".into(),
            },
        };
        let text = warning.to_string();
        assert!(text.contains("button_color"));
        assert!(text.contains("#32373c"));
    }
}
