use super::backend::{BackendError, StorageBackend};
use camino::Utf8PathBuf;
use std::fs;
use std::io::ErrorKind;

/// Native backing store: one JSON document per key inside a data directory.
///
/// The mobile shells hand the crate their app-private documents directory;
/// each key becomes `<dir>/<key>.json`. Writes replace the file wholesale,
/// which matches the adapter's full-collection rewrite model.
pub struct FileBackend {
    dir: Utf8PathBuf,
}

impl FileBackend {
    /// Opens a file backend rooted at `dir`, creating the directory if
    /// needed.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Result<Self, BackendError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileBackend { dir })
    }

    fn path_for(&self, key: &str) -> Utf8PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
