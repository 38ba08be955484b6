//! Favicon derivation from uploaded logos.
//!
//! A logo URL under the uploads URL maps to a file under the uploads
//! directory. The favicon is a center-cropped square written next to it:
//!
//! ```text
//! https://embo.test/wp-content/uploads/2024/05/logo.png
//!   -> <uploads>/2024/05/logo.png
//!   -> <uploads>/2024/05/logo-32x32.png
//!   -> https://embo.test/wp-content/uploads/2024/05/logo-32x32.png
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use image::imageops::FilterType;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::config::PluginConfig;
use crate::debug;

/// Characters escaped in a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Produces a favicon URL for a logo URL.
pub trait FaviconSource {
    /// `None` when no favicon can be produced for this logo.
    fn favicon_for(&self, logo_url: &str) -> Option<String>;
}

/// Never produces a favicon.
pub struct NoFavicons;

impl FaviconSource for NoFavicons {
    fn favicon_for(&self, _: &str) -> Option<String> {
        None
    }
}

/// Generates favicons from images in an uploads directory.
#[derive(Debug, Clone)]
pub struct UploadsFavicons {
    dir: PathBuf,
    base_url: String,
    size: u32,
}

impl UploadsFavicons {
    pub fn new(dir: impl Into<PathBuf>, base_url: &str, size: u32) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            size,
        }
    }

    /// Uploads-backed source when `[media]` is configured, otherwise none.
    pub fn from_config(config: &PluginConfig) -> Box<dyn FaviconSource> {
        match (&config.media.uploads_dir, &config.media.uploads_url) {
            (Some(dir), Some(url)) => Box::new(Self::new(dir, url, config.media.favicon_size)),
            _ => Box::new(NoFavicons),
        }
    }

    /// Path below the uploads directory for a logo URL.
    fn relative_path(&self, logo_url: &str) -> Option<PathBuf> {
        let rest = logo_url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(rest).decode_utf8().ok()?;
        let relative = PathBuf::from(decoded.as_ref());

        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        (safe && relative.file_name().is_some()).then_some(relative)
    }

    /// `logo.png` -> `logo-32x32.png`.
    fn favicon_name(&self, source: &Path) -> Option<String> {
        let stem = source.file_stem()?.to_str()?;
        let ext = source.extension()?.to_str()?;
        Some(format!("{stem}-{size}x{size}.{ext}", size = self.size))
    }

    fn url_for(&self, relative: &Path) -> Option<String> {
        let segments: Option<Vec<String>> = relative
            .components()
            .map(|component| {
                component
                    .as_os_str()
                    .to_str()
                    .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
            })
            .collect();
        Some(format!("{}/{}", self.base_url, segments?.join("/")))
    }

    /// Write the square favicon unless an up-to-date one exists.
    fn generate(&self, source: &Path, target: &Path) -> image::ImageResult<()> {
        if is_fresh(source, target) {
            debug!("favicon"; "{} is up to date", target.display());
            return Ok(());
        }
        let logo = image::open(source)?;
        let favicon = logo.resize_to_fill(self.size, self.size, FilterType::Lanczos3);
        favicon.save(target)?;
        debug!("favicon"; "wrote {}", target.display());
        Ok(())
    }
}

/// Target exists and is not older than the source.
fn is_fresh(source: &Path, target: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified()).ok();
    match (modified(source), modified(target)) {
        (Some(source), Some(target)) => target >= source,
        _ => false,
    }
}

impl FaviconSource for UploadsFavicons {
    fn favicon_for(&self, logo_url: &str) -> Option<String> {
        let relative = self.relative_path(logo_url)?;
        let source = self.dir.join(&relative);
        if !source.is_file() {
            debug!("favicon"; "logo {} is not an uploaded file", source.display());
            return None;
        }

        let name = self.favicon_name(&relative)?;
        let relative_target = relative.with_file_name(name);
        let target = self.dir.join(&relative_target);
        if let Err(err) = self.generate(&source, &target) {
            debug!("favicon"; "could not generate from {}: {}", source.display(), err);
            return None;
        }
        self.url_for(&relative_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    const BASE: &str = "https://embo.test/wp-content/uploads";

    fn uploads_with_logo(name: &str) -> (TempDir, UploadsFavicons) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2024/05").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(120, 60, Rgb([200, 10, 10])).save(&path).unwrap();
        let source = UploadsFavicons::new(dir.path(), &format!("{BASE}/"), 32);
        (dir, source)
    }

    #[test]
    fn test_generates_square_favicon() {
        let (dir, source) = uploads_with_logo("logo.png");
        let url = source.favicon_for(&format!("{BASE}/2024/05/logo.png")).unwrap();
        assert_eq!(url, format!("{BASE}/2024/05/logo-32x32.png"));

        let favicon = image::open(dir.path().join("2024/05/logo-32x32.png")).unwrap();
        assert_eq!((favicon.width(), favicon.height()), (32, 32));
    }

    #[test]
    fn test_encoded_file_names() {
        let (dir, source) = uploads_with_logo("my logo.png");
        let url = source.favicon_for(&format!("{BASE}/2024/05/my%20logo.png?v=2")).unwrap();
        assert_eq!(url, format!("{BASE}/2024/05/my%20logo-32x32.png"));
        assert!(dir.path().join("2024/05/my logo-32x32.png").is_file());
    }

    #[test]
    fn test_foreign_or_missing_logo() {
        let (_dir, source) = uploads_with_logo("logo.png");
        assert_eq!(source.favicon_for("https://other.test/logo.png"), None);
        assert_eq!(source.favicon_for(&format!("{BASE}/2024/05/missing.png")), None);
        assert_eq!(source.favicon_for(&format!("{BASE}/../secret.png")), None);
        assert_eq!(source.favicon_for(BASE), None);
    }

    #[test]
    fn test_not_an_image() {
        let (dir, source) = uploads_with_logo("logo.png");
        fs::write(dir.path().join("2024/05/notes.png"), "plain text").unwrap();
        assert_eq!(source.favicon_for(&format!("{BASE}/2024/05/notes.png")), None);
    }

    #[test]
    fn test_no_favicons() {
        assert_eq!(NoFavicons.favicon_for("https://embo.test/logo.png"), None);
    }
}
