//! `[media]` section configuration.
//!
//! Tells the favicon generator where uploaded files live on disk and under
//! which URL they are served. Without both, favicons cannot be generated
//! from the logo and the derived favicon stays empty.
//!
//! # Example
//!
//! ```toml
//! [media]
//! uploads_dir = "uploads"
//! uploads_url = "https://embo.test/wp-content/uploads"
//! favicon_size = 32
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Upload locations for favicon generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory that uploaded files are stored in.
    pub uploads_dir: Option<PathBuf>,

    /// Public URL prefix of `uploads_dir`.
    pub uploads_url: Option<String>,

    /// Edge length of the square favicon, in pixels.
    pub favicon_size: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            uploads_dir: None,
            uploads_url: None,
            favicon_size: 32,
        }
    }
}

/// Field paths of `[media]`.
pub struct MediaFields {
    pub uploads_dir: FieldPath,
    pub uploads_url: FieldPath,
    pub favicon_size: FieldPath,
}

impl MediaConfig {
    pub const FIELDS: MediaFields = MediaFields {
        uploads_dir: FieldPath::new("media.uploads_dir"),
        uploads_url: FieldPath::new("media.uploads_url"),
        favicon_size: FieldPath::new("media.favicon_size"),
    };

    /// Whether favicons can be generated at all.
    pub fn has_uploads(&self) -> bool {
        self.uploads_dir.is_some() && self.uploads_url.is_some()
    }

    pub fn normalize(&mut self, root: &Path) {
        if let Some(dir) = self.uploads_dir.take() {
            self.uploads_dir = Some(crate::config::util::normalize_path(&root.join(dir)));
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match (&self.uploads_dir, &self.uploads_url) {
            (Some(_), None) => diag.error_with_hint(
                Self::FIELDS.uploads_url,
                format!("{} is set but {} is missing", Self::FIELDS.uploads_dir, Self::FIELDS.uploads_url),
                "set both or neither",
            ),
            (None, Some(_)) => diag.error_with_hint(
                Self::FIELDS.uploads_dir,
                format!("{} is set but {} is missing", Self::FIELDS.uploads_url, Self::FIELDS.uploads_dir),
                "set both or neither",
            ),
            _ => {}
        }

        if let Some(url_str) = &self.uploads_url
            && url::Url::parse(url_str).is_err()
        {
            diag.error_with_hint(
                Self::FIELDS.uploads_url,
                format!("invalid URL '{url_str}'"),
                "use an absolute URL like https://example.com/uploads",
            );
        }

        if !(16..=512).contains(&self.favicon_size) {
            diag.error(
                Self::FIELDS.favicon_size,
                format!("{} must be between 16 and 512", self.favicon_size),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_media_defaults() {
        let config = test_parse_config("");
        assert!(!config.media.has_uploads());
        assert_eq!(config.media.favicon_size, 32);
    }

    #[test]
    fn test_media_requires_both() {
        let config = test_parse_config("[media]\nuploads_dir = \"uploads\"");
        let mut diag = ConfigDiagnostics::new();
        config.media.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_media_valid_pair() {
        let config = test_parse_config(
            "[media]\nuploads_dir = \"uploads\"\nuploads_url = \"https://embo.test/uploads\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.media.validate(&mut diag);
        assert!(diag.is_empty());
        assert!(config.media.has_uploads());
    }

    #[test]
    fn test_media_favicon_size_range() {
        let config = test_parse_config("[media]\nfavicon_size = 4");
        let mut diag = ConfigDiagnostics::new();
        config.media.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
