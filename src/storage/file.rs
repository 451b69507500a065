use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{validate_key, Persistence, PersistenceError};

/// Stores each key as `<root>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        validate_key(key).map_err(PersistenceError::Unavailable)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl Persistence for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!("Read {} bytes from {}", raw.len(), path.display());
                Ok(Some(raw))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored value at {}", path.display());
                Ok(None)
            }
            Err(source) => Err(PersistenceError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, raw: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let write_err = |source: std::io::Error| PersistenceError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(write_err)?;

        // Write next to the target and rename so a crash never leaves a torn file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;

        debug!("Wrote {} bytes to {}", raw.len(), path.display());
        Ok(())
    }
}
