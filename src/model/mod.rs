//! Domain entities shared by the storage adapter, the export pipeline and
//! the UI shells.

mod category;
mod recipe;

pub use category::Category;
pub use recipe::{format_prep_time, Recipe};

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of everything the app persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub recipes: Vec<Recipe>,
    pub categories: Vec<Category>,
}

/// Generates an opaque entity id.
///
/// Ids are timestamp-derived strings, the form screens have always produced
/// ids of this shape. A process-local counter suffix keeps ids unique when
/// two entities are created within the same millisecond.
pub(crate) fn generate_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let millis = chrono::Utc::now().timestamp_millis();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{millis}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }
}
