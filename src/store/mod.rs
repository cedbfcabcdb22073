//! Platform-adaptive persistence for recipes and categories.
//!
//! All state lives in two key-value entries, one holding the full recipe
//! array and one the full category array. Every mutation is a sequential
//! read-modify-write of a whole collection: fine for a single-user catalog,
//! and explicitly not safe under concurrent writers (last write wins).
//!
//! Reads fail soft (logged, empty collection); writes fail loud.

use crate::model::{AppState, Category, Recipe};
use camino::Utf8PathBuf;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

mod backend;
mod file;
mod memory;

pub use backend::{BackendError, StorageBackend};
pub use file::FileBackend;
pub use memory::MemoryBackend;

const RECIPES_KEY: &str = "chefbook_recipes";
const CATEGORIES_KEY: &str = "chefbook_categories";

/// Errors from the write paths of the store.
///
/// Read paths never return errors; see [`RecipeStore::get_recipes`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Selects the backing store when a [`RecipeStore`] is opened.
///
/// The choice is made exactly once, at construction, from configuration the
/// embedding shell injects. There is no global platform probe.
pub enum StoreConfig {
    /// Native platforms: JSON files inside the app's data directory.
    Native { data_dir: Utf8PathBuf },
    /// Web shell and tests: volatile in-memory map. The browser side owns
    /// durable persistence and syncs through the full-collection operations.
    InMemory,
}

/// Uniform CRUD interface over whichever backing store the platform uses.
pub struct RecipeStore {
    backend: Box<dyn StorageBackend>,
}

impl RecipeStore {
    /// Opens a store for the given platform configuration.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let backend: Box<dyn StorageBackend> = match config {
            StoreConfig::Native { data_dir } => Box::new(FileBackend::new(data_dir)?),
            StoreConfig::InMemory => Box::new(MemoryBackend::new()),
        };
        Ok(RecipeStore { backend })
    }

    /// Wraps a caller-provided backend. This is the seam a wasm shell uses
    /// to plug browser storage in directly.
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        RecipeStore { backend }
    }

    // Recipes

    /// Returns all stored recipes.
    ///
    /// Never fails: a missing key yields an empty list, and a backend or
    /// deserialization failure is logged and also yields an empty list. The
    /// app then behaves as if no data exists, which is the accepted recovery
    /// for this offline-first, single-user tool.
    pub fn get_recipes(&self) -> Vec<Recipe> {
        self.read_collection(RECIPES_KEY)
    }

    /// Replaces the entire stored recipe collection.
    ///
    /// Write failures propagate to the caller.
    pub fn save_recipes(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        self.write_collection(RECIPES_KEY, recipes)
    }

    /// Appends one recipe (read-all, append, write-all).
    pub fn add_recipe(&self, recipe: Recipe) -> Result<(), StoreError> {
        let mut recipes = self.get_recipes();
        recipes.push(recipe);
        self.save_recipes(&recipes)
    }

    /// Replaces the stored recipe with the same id.
    ///
    /// A missing id is a silent no-op: nothing is written and no error is
    /// returned. Callers that need to distinguish should check `get_recipes`
    /// first.
    pub fn update_recipe(&self, updated: &Recipe) -> Result<(), StoreError> {
        let mut recipes = self.get_recipes();
        if let Some(slot) = recipes.iter_mut().find(|r| r.id == updated.id) {
            *slot = updated.clone();
            self.save_recipes(&recipes)?;
        }
        Ok(())
    }

    /// Removes the recipe with the given id, if present.
    pub fn delete_recipe(&self, recipe_id: &str) -> Result<(), StoreError> {
        let mut recipes = self.get_recipes();
        recipes.retain(|r| r.id != recipe_id);
        self.save_recipes(&recipes)
    }

    // Categories

    /// Returns all stored categories, sorted ascending by `order`.
    ///
    /// The sort is stable, so equal ranks keep insertion order. Records
    /// persisted without an `order` field sort as rank 0. Same fail-soft
    /// behavior as [`get_recipes`](Self::get_recipes).
    pub fn get_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.read_collection(CATEGORIES_KEY);
        categories.sort_by_key(|c| c.order);
        categories
    }

    /// Replaces the entire stored category collection.
    pub fn save_categories(&self, categories: &[Category]) -> Result<(), StoreError> {
        self.write_collection(CATEGORIES_KEY, categories)
    }

    /// Appends one category.
    pub fn add_category(&self, category: Category) -> Result<(), StoreError> {
        let mut categories = self.get_categories();
        categories.push(category);
        self.save_categories(&categories)
    }

    /// Replaces the stored category with the same id; silent no-op when the
    /// id is absent.
    pub fn update_category(&self, updated: &Category) -> Result<(), StoreError> {
        let mut categories = self.get_categories();
        if let Some(slot) = categories.iter_mut().find(|c| c.id == updated.id) {
            *slot = updated.clone();
            self.save_categories(&categories)?;
        }
        Ok(())
    }

    /// Removes the category with the given id, if present.
    ///
    /// Recipes referencing it are left untouched and render as
    /// uncategorized.
    pub fn delete_category(&self, category_id: &str) -> Result<(), StoreError> {
        let mut categories = self.get_categories();
        categories.retain(|c| c.id != category_id);
        self.save_categories(&categories)
    }

    /// Re-ranks categories to match the given id sequence.
    ///
    /// Listed ids get sequential `order` values starting at 0, in the given
    /// sequence; ids not found in storage are ignored. Stored categories not
    /// listed are appended after the reordered ones, preserving their
    /// existing relative order.
    pub fn reorder_categories(&self, ids_in_order: &[String]) -> Result<(), StoreError> {
        let categories = self.get_categories();

        let mut merged: Vec<Category> = ids_in_order
            .iter()
            .filter_map(|id| categories.iter().find(|c| &c.id == id).cloned())
            .enumerate()
            .map(|(rank, mut category)| {
                category.order = rank as i32;
                category
            })
            .collect();

        let mut next_rank = merged.len() as i32;
        for category in &categories {
            if !ids_in_order.contains(&category.id) {
                let mut category = category.clone();
                category.order = next_rank;
                next_rank += 1;
                merged.push(category);
            }
        }

        self.save_categories(&merged)
    }

    // App state

    /// Returns both collections in one snapshot.
    pub fn get_app_state(&self) -> AppState {
        AppState {
            recipes: self.get_recipes(),
            categories: self.get_categories(),
        }
    }

    /// Removes both collections entirely.
    pub fn clear_all_data(&self) -> Result<(), StoreError> {
        self.backend.remove(RECIPES_KEY)?;
        self.backend.remove(CATEGORIES_KEY)?;
        Ok(())
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("failed to read {key}: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("discarding undecodable {key} collection: {e}");
                Vec::new()
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(key, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Recipe};

    fn memory_store() -> RecipeStore {
        RecipeStore::open(StoreConfig::InMemory).unwrap()
    }

    fn recipe(title: &str) -> Recipe {
        Recipe::new(
            title,
            None,
            30,
            vec!["farine".to_string()],
            vec!["mélanger".to_string()],
        )
    }

    fn category(name: &str, order: i32) -> Category {
        Category::new(name, "#FF6B35", order)
    }

    #[test]
    fn test_get_recipes_empty_store() {
        let store = memory_store();
        assert!(store.get_recipes().is_empty());
    }

    #[test]
    fn test_add_then_get_preserves_all_fields() {
        let store = memory_store();
        let mut r = recipe("Crêpes");
        r.image = Some("data:image/jpeg;base64,AAAA".to_string());
        r.category = Some("cat-1".to_string());
        store.add_recipe(r.clone()).unwrap();

        let stored = store.get_recipes();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], r);
    }

    #[test]
    fn test_add_appends_to_existing() {
        let store = memory_store();
        store.add_recipe(recipe("a")).unwrap();
        store.add_recipe(recipe("b")).unwrap();
        let titles: Vec<_> = store.get_recipes().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_update_recipe_replaces_in_place() {
        let store = memory_store();
        let mut r = recipe("Crêpes");
        store.add_recipe(recipe("other")).unwrap();
        store.add_recipe(r.clone()).unwrap();

        r.title = "Crêpes Suzette".to_string();
        r.touch();
        store.update_recipe(&r).unwrap();

        let stored = store.get_recipes();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].title, "Crêpes Suzette");
        assert_eq!(stored[0].title, "other");
    }

    #[test]
    fn test_update_missing_recipe_is_noop() {
        let store = memory_store();
        store.add_recipe(recipe("a")).unwrap();
        let before = store.get_recipes();

        store.update_recipe(&recipe("ghost")).unwrap();

        assert_eq!(store.get_recipes(), before);
    }

    #[test]
    fn test_delete_recipe() {
        let store = memory_store();
        let r = recipe("a");
        let id = r.id.clone();
        store.add_recipe(r).unwrap();
        store.add_recipe(recipe("b")).unwrap();

        store.delete_recipe(&id).unwrap();

        let stored = store.get_recipes();
        assert_eq!(stored.len(), 1);
        assert!(stored.iter().all(|r| r.id != id));
    }

    #[test]
    fn test_delete_missing_recipe_is_noop() {
        let store = memory_store();
        store.add_recipe(recipe("a")).unwrap();
        store.delete_recipe("nope").unwrap();
        assert_eq!(store.get_recipes().len(), 1);
    }

    #[test]
    fn test_categories_sorted_by_order() {
        let store = memory_store();
        store.add_category(category("z", 2)).unwrap();
        store.add_category(category("a", 0)).unwrap();
        store.add_category(category("m", 1)).unwrap();

        let names: Vec<_> = store
            .get_categories()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_missing_order_sorts_as_zero() {
        let store = memory_store();
        // Persist one record without an order field, as older versions did.
        let raw = r##"[{"id":"old","name":"Anciennes","color":"#888888","createdAt":"2023-01-01T00:00:00Z"},
                {"id":"new","name":"Plats","color":"#4ECDC4","order":-1,"createdAt":"2024-01-01T00:00:00Z"}]"##;
        store.backend.set(CATEGORIES_KEY, raw).unwrap();

        let categories = store.get_categories();
        assert_eq!(categories[0].id, "new"); // order -1 sorts first
        assert_eq!(categories[1].id, "old");
        assert_eq!(categories[1].order, 0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let store = memory_store();
        store.add_category(category("first", 1)).unwrap();
        store.add_category(category("second", 1)).unwrap();
        let names: Vec<_> = store
            .get_categories()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_reorder_categories() {
        let store = memory_store();
        let c1 = category("c1", 0);
        let c2 = category("c2", 1);
        store.add_category(c1.clone()).unwrap();
        store.add_category(c2.clone()).unwrap();

        store
            .reorder_categories(&[c2.id.clone(), c1.id.clone()])
            .unwrap();

        let categories = store.get_categories();
        assert_eq!(categories[0].id, c2.id);
        assert_eq!(categories[0].order, 0);
        assert_eq!(categories[1].id, c1.id);
        assert_eq!(categories[1].order, 1);
    }

    #[test]
    fn test_reorder_appends_unlisted_categories() {
        let store = memory_store();
        let c1 = category("c1", 0);
        let c2 = category("c2", 1);
        let c3 = category("c3", 2);
        let c4 = category("c4", 3);
        for c in [&c1, &c2, &c3, &c4] {
            store.add_category(c.clone()).unwrap();
        }

        store
            .reorder_categories(&[c2.id.clone(), c1.id.clone()])
            .unwrap();

        let ids: Vec<_> = store.get_categories().into_iter().map(|c| c.id).collect();
        // Unlisted c3 and c4 follow the reordered pair, keeping their
        // previous relative order.
        assert_eq!(ids, vec![c2.id, c1.id, c3.id, c4.id]);
    }

    #[test]
    fn test_reorder_ignores_unknown_ids() {
        let store = memory_store();
        let c1 = category("c1", 0);
        store.add_category(c1.clone()).unwrap();

        store
            .reorder_categories(&["ghost".to_string(), c1.id.clone()])
            .unwrap();

        let categories = store.get_categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].order, 0);
    }

    #[test]
    fn test_update_missing_category_is_noop() {
        let store = memory_store();
        store.add_category(category("a", 0)).unwrap();
        let before = store.get_categories();
        store.update_category(&category("ghost", 9)).unwrap();
        assert_eq!(store.get_categories(), before);
    }

    #[test]
    fn test_delete_category_keeps_recipes() {
        let store = memory_store();
        let c = category("Desserts", 0);
        let mut r = recipe("Tarte");
        r.category = Some(c.id.clone());
        store.add_category(c.clone()).unwrap();
        store.add_recipe(r).unwrap();

        store.delete_category(&c.id).unwrap();

        assert!(store.get_categories().is_empty());
        // The recipe keeps its dangling reference; it renders uncategorized.
        assert_eq!(store.get_recipes()[0].category.as_deref(), Some(c.id.as_str()));
    }

    #[test]
    fn test_corrupted_recipes_read_as_empty() {
        let store = memory_store();
        store.backend.set(RECIPES_KEY, "{not json").unwrap();
        assert!(store.get_recipes().is_empty());
    }

    #[test]
    fn test_corrupted_categories_read_as_empty() {
        let store = memory_store();
        store.backend.set(CATEGORIES_KEY, "42").unwrap();
        assert!(store.get_categories().is_empty());
    }

    #[test]
    fn test_get_app_state() {
        let store = memory_store();
        store.add_recipe(recipe("a")).unwrap();
        store.add_category(category("c", 0)).unwrap();

        let state = store.get_app_state();
        assert_eq!(state.recipes.len(), 1);
        assert_eq!(state.categories.len(), 1);
    }

    #[test]
    fn test_clear_all_data() {
        let store = memory_store();
        store.add_recipe(recipe("a")).unwrap();
        store.add_category(category("c", 0)).unwrap();

        store.clear_all_data().unwrap();

        let state = store.get_app_state();
        assert!(state.recipes.is_empty());
        assert!(state.categories.is_empty());
    }

    #[test]
    fn test_native_store_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let store = RecipeStore::open(StoreConfig::Native {
            data_dir: data_dir.clone(),
        })
        .unwrap();
        let r = recipe("Gratin");
        store.add_recipe(r.clone()).unwrap();
        drop(store);

        let reopened = RecipeStore::open(StoreConfig::Native { data_dir }).unwrap();
        assert_eq!(reopened.get_recipes(), vec![r]);
    }

    #[test]
    fn test_native_store_corrupted_file_reads_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::write(dir.path().join("chefbook_recipes.json"), "][").unwrap();

        let store = RecipeStore::open(StoreConfig::Native { data_dir }).unwrap();
        assert!(store.get_recipes().is_empty());
    }
}
