// src/storage/file.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;
use crate::storage::ProfileStore;

/// File-backed store: one `<key>.json` file per key under a data directory.
/// The directory is created on first write if it does not exist.
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory this store writes into.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl ProfileStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = std::fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("reading {}: {e}", path.display())))?;
        Ok(Some(value))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Error> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .map_err(|e| Error::Storage(format!("creating {}: {e}", self.data_dir.display())))?;
        }
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| Error::Storage(format!("writing {}: {e}", path.display())))?;
        debug!("wrote {} byte(s) to {}", value.len(), path.display());
        Ok(())
    }
}
