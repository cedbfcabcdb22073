use super::backend::{BackendError, StorageBackend};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory backing store.
///
/// Used on the web, where the browser shell owns real persistence and
/// hydrates/flushes through the adapter's full-collection operations, and in
/// tests. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, BackendError> {
        self.entries
            .lock()
            .map_err(|_| BackendError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
