//! `[paths]` section configuration.
//!
//! All paths are relative to the directory holding `embo.toml`.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! store = "options.json"               # Option store (one JSON document)
//! theme_config = "theme/theme.json"    # Live theme configuration
//! backup = "config/theme.json"         # One-time backup of theme_config
//! assets = "assets"                    # Plugin assets (js/embo-toc.js)
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Filesystem locations used by the store and the config manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JSON file backing the option store.
    pub store: PathBuf,

    /// The theme's `theme.json`.
    pub theme_config: PathBuf,

    /// Where the untouched copy of `theme_config` is kept.
    pub backup: PathBuf,

    /// Directory containing the plugin's own assets.
    pub assets: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            store: "options.json".into(),
            theme_config: "theme/theme.json".into(),
            backup: "config/theme.json".into(),
            assets: "assets".into(),
        }
    }
}

/// Field paths of `[paths]`.
pub struct PathsFields {
    pub store: FieldPath,
    pub theme_config: FieldPath,
    pub backup: FieldPath,
    pub assets: FieldPath,
}

impl PathsConfig {
    pub const FIELDS: PathsFields = PathsFields {
        store: FieldPath::new("paths.store"),
        theme_config: FieldPath::new("paths.theme_config"),
        backup: FieldPath::new("paths.backup"),
        assets: FieldPath::new("paths.assets"),
    };

    /// Resolve every path against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for path in [
            &mut self.store,
            &mut self.theme_config,
            &mut self.backup,
            &mut self.assets,
        ] {
            *path = crate::config::util::normalize_path(&root.join(&*path));
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.theme_config == self.backup {
            diag.error_with_hint(
                Self::FIELDS.backup,
                format!("{} must differ from {}", Self::FIELDS.backup, Self::FIELDS.theme_config),
                "keep the backup outside the theme, e.g. \"config/theme.json\"",
            );
        }
        if self.store.as_os_str().is_empty() {
            diag.error(Self::FIELDS.store, "store path is empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_paths_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.store, PathBuf::from("options.json"));
        assert_eq!(config.paths.theme_config, PathBuf::from("theme/theme.json"));
        assert_eq!(config.paths.backup, PathBuf::from("config/theme.json"));
    }

    #[test]
    fn test_paths_normalize() {
        let mut paths = PathsConfig::default();
        paths.normalize(Path::new("/srv/site"));
        assert_eq!(paths.theme_config, PathBuf::from("/srv/site/theme/theme.json"));
        assert_eq!(paths.store, PathBuf::from("/srv/site/options.json"));
    }

    #[test]
    fn test_paths_backup_must_differ() {
        let config = test_parse_config(
            "[paths]\ntheme_config = \"theme.json\"\nbackup = \"theme.json\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.paths.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
