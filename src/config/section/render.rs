//! `[render]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [render]
//! style_handle = "myblocktheme-style"   # Inline styles attach to this handle
//! assets_url = "/wp-content/plugins/embo-settings"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Public output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Stylesheet handle the inline style block belongs to.
    pub style_handle: String,

    /// Public URL of the plugin asset directory.
    pub assets_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style_handle: "myblocktheme-style".into(),
            assets_url: "/wp-content/plugins/embo-settings".into(),
        }
    }
}

/// Field paths of `[render]`.
pub struct RenderFields {
    pub style_handle: FieldPath,
    pub assets_url: FieldPath,
}

impl RenderConfig {
    pub const FIELDS: RenderFields = RenderFields {
        style_handle: FieldPath::new("render.style_handle"),
        assets_url: FieldPath::new("render.assets_url"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let valid_handle = !self.style_handle.is_empty()
            && self
                .style_handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_handle {
            diag.error_with_hint(
                Self::FIELDS.style_handle,
                format!("invalid handle '{}'", self.style_handle),
                "use letters, digits, '-' and '_' only",
            );
        }
    }

    /// Asset URL without a trailing slash.
    pub fn assets_base(&self) -> &str {
        self.assets_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_render_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.render.style_handle, "myblocktheme-style");
    }

    #[test]
    fn test_render_invalid_handle() {
        let config = test_parse_config("[render]\nstyle_handle = \"bad handle\"");
        let mut diag = ConfigDiagnostics::new();
        config.render.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_assets_base_trims_slash() {
        let config = test_parse_config("[render]\nassets_url = \"/plugins/embo/\"");
        assert_eq!(config.render.assets_base(), "/plugins/embo");
    }
}
