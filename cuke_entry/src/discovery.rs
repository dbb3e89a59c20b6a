//! Feature directory resolution.
//!
//! The framework walks the feature directory itself; resolution here exists
//! so that a malformed path surfaces as a configuration failure before the
//! run starts rather than as a silent empty run.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{EntryError, EntryResult};

/// Resolved feature directory with a count of discovered feature files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeatureSet {
    /// Directory the framework is pointed at.
    pub root: Utf8PathBuf,
    /// Number of `.feature` files found beneath `root`.
    pub feature_files: usize,
}

/// Resolves `path` as the feature directory for a run.
///
/// An empty directory resolves successfully with a warning; the framework
/// then reports a run of zero scenarios.
///
/// # Errors
///
/// Returns [`EntryError::Features`] if `path` cannot be read and
/// [`EntryError::NotADirectory`] if it resolves to anything other than a
/// directory.
pub fn resolve_features(path: &Utf8Path) -> EntryResult<FeatureSet> {
    let metadata = fs::metadata(path).map_err(|e| EntryError::features(path, e))?;
    if !metadata.is_dir() {
        return Err(EntryError::NotADirectory {
            path: path.to_owned(),
        });
    }
    let feature_files = count_feature_files(path)?;
    if feature_files == 0 {
        tracing::warn!(path = %path, "feature directory contains no .feature files");
    }
    Ok(FeatureSet {
        root: path.to_owned(),
        feature_files,
    })
}

fn count_feature_files(dir: &Utf8Path) -> EntryResult<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir).map_err(|e| EntryError::features(dir, e))? {
        let dirent = entry.map_err(|e| EntryError::features(dir, e))?;
        let path = Utf8PathBuf::from_path_buf(dirent.path()).map_err(|raw| {
            EntryError::features(
                dir,
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("non UTF-8 path: {}", raw.display()),
                ),
            )
        })?;
        let file_type = dirent
            .file_type()
            .map_err(|e| EntryError::features(&path, e))?;
        if file_type.is_dir() {
            count += count_feature_files(&path)?;
        } else if path.extension() == Some("feature") {
            count += 1;
        }
    }
    Ok(count)
}
