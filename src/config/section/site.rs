//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Embo Studio"                 # Footer copyright fallback
//! url = "https://embo-studio.example"  # Public site URL
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Site identity used by renderers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name, shown in the default footer note.
    pub name: String,

    /// Public site URL.
    pub url: Option<String>,
}

/// Field paths of `[site]`.
pub struct SiteFields {
    pub name: FieldPath,
    pub url: FieldPath,
}

impl SiteConfig {
    pub const FIELDS: SiteFields = SiteFields {
        name: FieldPath::new("site.name"),
        url: FieldPath::new("site.url"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url_str) = &self.url else {
            return;
        };

        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error(Self::FIELDS.url, "URL has no host");
                }
            }
            Err(err) => {
                diag.error_with_hint(
                    Self::FIELDS.url,
                    format!("invalid URL '{url_str}': {err}"),
                    "use format like https://example.com",
                );
            }
        }
    }
}
