//! theme.json palette synchronization.
//!
//! Two files are involved:
//!
//! | File          | Role                                              |
//! |---------------|---------------------------------------------------|
//! | theme config  | live theme.json, palette rewritten on sync        |
//! | backup        | byte copy of the first theme.json seen, restore source |
//!
//! The backup is created at most once and never overwritten.
//!
//! There is no locking. Two syncs running at the same time both read,
//! patch and write the whole file; the last writer wins. Writes are rare
//! admin actions, so this is accepted.

mod palette;
#[cfg(test)]
mod tests;

pub use palette::PaletteEntry;

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::debug;
use crate::settings::colors::ColorsOptions;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("could not encode `{0}`")]
    Encode(PathBuf, #[source] serde_json::Error),
}

pub type ThemeResult<T> = Result<T, ThemeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStatus {
    Created,
    /// A backup was already there and was left untouched.
    Exists,
    /// No theme config to copy.
    NoSource,
}

/// Why a sync did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFile,
    Malformed(String),
    NoPalette,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFile => f.write_str("theme config not found"),
            SkipReason::Malformed(err) => write!(f, "theme config is not valid JSON ({err})"),
            SkipReason::NoPalette => f.write_str("theme config has no `settings.color.palette` entries"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `updated` records matched a known slug; `changed` is false when the
    /// file already had these colors.
    Written { updated: usize, changed: bool },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    NoBackup,
}

/// Snapshot for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeStatus {
    pub theme_config: PathBuf,
    pub backup: PathBuf,
    pub theme_exists: bool,
    pub backup_exists: bool,
    /// Palette records, `None` when the file has no usable palette.
    pub palette_len: Option<usize>,
}

/// Reads and patches theme.json, keeping the one-time backup.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    theme_config: PathBuf,
    backup: PathBuf,
}

impl ConfigManager {
    /// Create the manager and make sure the backup exists.
    pub fn new(theme_config: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> ThemeResult<Self> {
        let manager = Self {
            theme_config: theme_config.into(),
            backup: backup.into(),
        };
        let status = manager.ensure_backup()?;
        debug!("theme"; "backup {:?} at {}", status, manager.backup.display());
        Ok(manager)
    }

    pub fn theme_config(&self) -> &Path {
        &self.theme_config
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Copy theme.json to the backup path unless a backup already exists.
    pub fn ensure_backup(&self) -> ThemeResult<BackupStatus> {
        if self.backup.exists() {
            return Ok(BackupStatus::Exists);
        }
        if !self.theme_config.is_file() {
            return Ok(BackupStatus::NoSource);
        }
        if let Some(parent) = self.backup.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| ThemeError::Io(parent.to_path_buf(), err))?;
        }
        fs::copy(&self.theme_config, &self.backup)
            .map_err(|err| ThemeError::Io(self.backup.clone(), err))?;
        Ok(BackupStatus::Created)
    }

    /// Parse theme.json, or say why it cannot be used.
    fn read_document(&self) -> ThemeResult<Result<(String, Value), SkipReason>> {
        let content = match fs::read_to_string(&self.theme_config) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Err(SkipReason::MissingFile));
            }
            Err(err) => return Err(ThemeError::Io(self.theme_config.clone(), err)),
        };
        Ok(match serde_json::from_str(&content) {
            Ok(doc) => Ok((content, doc)),
            Err(err) => Err(SkipReason::Malformed(err.to_string())),
        })
    }

    /// Write `colors` into the palette records with known slugs.
    pub fn sync_palette(&self, colors: &ColorsOptions) -> ThemeResult<SyncOutcome> {
        let (original, mut doc) = match self.read_document()? {
            Ok(parsed) => parsed,
            Err(reason) => return Ok(SyncOutcome::Skipped(reason)),
        };
        let Some(items) = palette::palette_mut(&mut doc) else {
            return Ok(SyncOutcome::Skipped(SkipReason::NoPalette));
        };
        let updated = palette::apply(items, colors);

        let encoded = palette::to_theme_json(&doc)
            .map_err(|err| ThemeError::Encode(self.theme_config.clone(), err))?;
        // Skip write if content unchanged
        let changed = original.as_bytes() != encoded.as_slice();
        if changed {
            fs::write(&self.theme_config, &encoded)
                .map_err(|err| ThemeError::Io(self.theme_config.clone(), err))?;
        }
        Ok(SyncOutcome::Written { updated, changed })
    }

    /// Copy the backup over theme.json.
    pub fn restore(&self) -> ThemeResult<RestoreOutcome> {
        if !self.backup.is_file() {
            return Ok(RestoreOutcome::NoBackup);
        }
        fs::copy(&self.backup, &self.theme_config)
            .map_err(|err| ThemeError::Io(self.theme_config.clone(), err))?;
        Ok(RestoreOutcome::Restored)
    }

    /// Current palette records, `None` when theme.json has none.
    pub fn read_palette(&self) -> ThemeResult<Option<Vec<PaletteEntry>>> {
        Ok(match self.read_document()? {
            Ok((_, doc)) => palette::palette(&doc).map(|items| palette::entries(items)),
            Err(_) => None,
        })
    }

    pub fn status(&self) -> ThemeResult<ThemeStatus> {
        Ok(ThemeStatus {
            theme_config: self.theme_config.clone(),
            backup: self.backup.clone(),
            theme_exists: self.theme_config.is_file(),
            backup_exists: self.backup.is_file(),
            palette_len: self.read_palette()?.map(|entries| entries.len()),
        })
    }
}
