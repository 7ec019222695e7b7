// src/storage/mod.rs
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::releases::models::VersionList;
use crate::utils::error::StorageError;

const VERSION_LIST_FILE: &str = "versions.json";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Records a release by creating `<base_dir>/<tag>`.
    /// Returns `true` if the release was not tracked before.
    pub fn track_release(&self, tag: &str) -> Result<bool, StorageError> {
        validate_tag(tag)?;
        let release_dir = self.base_dir.join(tag);

        match fs::create_dir(&release_dir) {
            Ok(()) => {
                tracing::info!("Found new release! --> {}", tag);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && release_dir.is_dir() => {
                tracing::info!("Already tracking release {}", tag);
                Ok(false)
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// Writes the scraped version list as `versions.json` in the base directory.
    pub fn save_version_list(&self, versions: &VersionList, source_url: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(VERSION_LIST_FILE);

        let document = serde_json::json!({
            "source_url": source_url,
            "release_count": versions.len(),
            "fetched_at": chrono::Utc::now().to_rfc3339(),
            "releases": versions,
        });

        let document_str = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, document_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} releases to {}", versions.len(), file_path.display());

        Ok(file_path)
    }
}

/// Tags become directory names, so they must be a single plain path component.
fn validate_tag(tag: &str) -> Result<(), StorageError> {
    let bad = tag.is_empty()
        || tag == "."
        || tag == ".."
        || tag.contains(['/', '\\'])
        || tag.contains('\0');
    if bad {
        return Err(StorageError::InvalidTag(tag.to_string()));
    }
    Ok(())
}
