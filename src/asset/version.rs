//! Asset versions for cache busting.
//!
//! The version of a shipped file is a fingerprint of its content, so the
//! `?ver=` query changes exactly when the file does. Files that are not
//! present on disk fall back to the package version.

use std::fs;
use std::path::Path;

use crate::utils::hash;

/// Version string of `relative` under `assets_dir`.
pub fn asset_version(assets_dir: &Path, relative: &str) -> String {
    match fs::read(assets_dir.join(relative)) {
        Ok(content) => hash::fingerprint(&content),
        Err(_) => env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_version_follows_content() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        let file = dir.path().join("js/embo-toc.js");
        fs::write(&file, "console.log(1)").unwrap();

        let v1 = asset_version(dir.path(), "js/embo-toc.js");
        assert_eq!(v1.len(), 8);
        assert_eq!(v1, asset_version(dir.path(), "js/embo-toc.js"));

        fs::write(&file, "console.log(2)").unwrap();
        assert_ne!(v1, asset_version(dir.path(), "js/embo-toc.js"));
    }

    #[test]
    fn test_missing_asset_uses_package_version() {
        let dir = TempDir::new().unwrap();
        assert_eq!(asset_version(dir.path(), "js/missing.js"), env!("CARGO_PKG_VERSION"));
    }
}
