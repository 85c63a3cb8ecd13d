//! File-backed storage backend.
//!
//! Each key maps to one file in the profile directory. Keys are
//! percent-encoded so namespaced keys like `gbones:cart:v1` become portable
//! file names (`gbones%3Acart%3Av1`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStorage, StorageError, check_quota};

/// Key-value storage persisted to a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: None,
        }
    }

    /// Reject values larger than `limit` bytes.
    #[must_use]
    pub const fn with_quota(mut self, limit: Option<usize>) -> Self {
        self.quota = limit;
        self
    }

    /// The profile directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(escape_key(key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(key, value, self.quota)?;

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage entry");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn escape_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}
