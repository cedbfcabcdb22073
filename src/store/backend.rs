use thiserror::Error;

/// Errors surfaced by a storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to access backing store: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Backing store unavailable: {0}")]
    Unavailable(String),
}

/// The seam between the [`RecipeStore`](super::RecipeStore) adapter and the
/// platform key-value store.
///
/// Exactly one implementation is selected when the store is constructed
/// (see [`StoreConfig`](super::StoreConfig)); there is no dynamic
/// re-selection at runtime. Values are opaque strings; the adapter owns the
/// JSON encoding.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored value for `key`, or `Ok(None)` if the key has
    /// never been written (a missing key is not an error).
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Removes `key` entirely. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<(), BackendError>;
}
