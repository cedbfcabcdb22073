//! UniFFI bindings for cross-platform support (iOS, Android).
//!
//! This module provides FFI-safe types and functions for use with UniFFI.
//! Entities cross the boundary as flat records with RFC 3339 date strings;
//! the store is exposed as an object constructed once per process with the
//! platform's storage configuration.

use crate::export::{self, ShareArtifact, ShareFormat};
use crate::model::{AppState, Category, Recipe};
use crate::store::{MemoryBackend, RecipeStore, StoreConfig, StoreError};
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum ChefbookError {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    #[error("Export error: {message}")]
    Export { message: String },
}

impl From<StoreError> for ChefbookError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Serialize(e) => ChefbookError::InvalidData {
                message: e.to_string(),
            },
            e => ChefbookError::Storage {
                message: e.to_string(),
            },
        }
    }
}

impl From<export::ExportError> for ChefbookError {
    fn from(e: export::ExportError) -> Self {
        ChefbookError::Export {
            message: e.to_string(),
        }
    }
}

impl From<chrono::ParseError> for ChefbookError {
    fn from(e: chrono::ParseError) -> Self {
        ChefbookError::InvalidData {
            message: format!("invalid date: {e}"),
        }
    }
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, ChefbookError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// FFI-safe representation of a recipe. Dates cross as RFC 3339 strings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecipe {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub prep_time: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Recipe> for FfiRecipe {
    fn from(r: &Recipe) -> Self {
        FfiRecipe {
            id: r.id.clone(),
            title: r.title.clone(),
            image: r.image.clone(),
            category: r.category.clone(),
            prep_time: r.prep_time,
            ingredients: r.ingredients.clone(),
            instructions: r.instructions.clone(),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<FfiRecipe> for Recipe {
    type Error = ChefbookError;

    fn try_from(r: FfiRecipe) -> Result<Self, ChefbookError> {
        Ok(Recipe {
            id: r.id,
            title: r.title,
            image: r.image,
            category: r.category,
            prep_time: r.prep_time,
            ingredients: r.ingredients,
            instructions: r.instructions,
            created_at: parse_date(&r.created_at)?,
            updated_at: parse_date(&r.updated_at)?,
        })
    }
}

/// FFI-safe representation of a category.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCategory {
    pub id: String,
    pub name: String,
    pub color: String,
    pub order: i32,
    pub created_at: String,
}

impl From<&Category> for FfiCategory {
    fn from(c: &Category) -> Self {
        FfiCategory {
            id: c.id.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            order: c.order,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<FfiCategory> for Category {
    type Error = ChefbookError;

    fn try_from(c: FfiCategory) -> Result<Self, ChefbookError> {
        Ok(Category {
            id: c.id,
            name: c.name,
            color: c.color,
            order: c.order,
            created_at: parse_date(&c.created_at)?,
        })
    }
}

/// Both collections in one snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppState {
    pub recipes: Vec<FfiRecipe>,
    pub categories: Vec<FfiCategory>,
}

impl From<AppState> for FfiAppState {
    fn from(state: AppState) -> Self {
        FfiAppState {
            recipes: state.recipes.iter().map(FfiRecipe::from).collect(),
            categories: state.categories.iter().map(FfiCategory::from).collect(),
        }
    }
}

/// A produced export, ready for the platform share sheet.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiShareArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl From<ShareArtifact> for FfiShareArtifact {
    fn from(a: ShareArtifact) -> Self {
        FfiShareArtifact {
            file_name: a.file_name,
            mime_type: a.mime_type,
            data: a.bytes,
        }
    }
}

/// Export output modes.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiShareFormat {
    Document,
    Markup,
    Text,
}

impl From<FfiShareFormat> for ShareFormat {
    fn from(f: FfiShareFormat) -> Self {
        match f {
            FfiShareFormat::Document => ShareFormat::Document,
            FfiShareFormat::Markup => ShareFormat::Markup,
            FfiShareFormat::Text => ShareFormat::Text,
        }
    }
}

/// The recipe catalog store, opened once per process.
#[derive(uniffi::Object)]
pub struct FfiRecipeStore {
    inner: RecipeStore,
}

#[uniffi::export]
impl FfiRecipeStore {
    /// Opens the native store rooted at the app's data directory.
    #[uniffi::constructor]
    pub fn new(data_dir: String) -> Result<Arc<Self>, ChefbookError> {
        let inner = RecipeStore::open(StoreConfig::Native {
            data_dir: Utf8PathBuf::from(data_dir),
        })?;
        Ok(Arc::new(FfiRecipeStore { inner }))
    }

    /// Opens a volatile in-memory store (web shell, previews, tests).
    #[uniffi::constructor]
    pub fn in_memory() -> Arc<Self> {
        Arc::new(FfiRecipeStore {
            inner: RecipeStore::with_backend(Box::new(MemoryBackend::new())),
        })
    }

    /// Returns all stored recipes. Read failures yield an empty list.
    pub fn get_recipes(&self) -> Vec<FfiRecipe> {
        self.inner.get_recipes().iter().map(FfiRecipe::from).collect()
    }

    /// Replaces the entire recipe collection.
    pub fn save_recipes(&self, recipes: Vec<FfiRecipe>) -> Result<(), ChefbookError> {
        let recipes: Vec<Recipe> = convert(recipes)?;
        self.inner.save_recipes(&recipes)?;
        Ok(())
    }

    pub fn add_recipe(&self, recipe: FfiRecipe) -> Result<(), ChefbookError> {
        self.inner.add_recipe(recipe.try_into()?)?;
        Ok(())
    }

    /// Replaces the stored recipe with the same id; silently does nothing
    /// when the id is unknown.
    pub fn update_recipe(&self, recipe: FfiRecipe) -> Result<(), ChefbookError> {
        let recipe: Recipe = recipe.try_into()?;
        self.inner.update_recipe(&recipe)?;
        Ok(())
    }

    pub fn delete_recipe(&self, recipe_id: String) -> Result<(), ChefbookError> {
        self.inner.delete_recipe(&recipe_id)?;
        Ok(())
    }

    /// Returns all categories, sorted ascending by display order.
    pub fn get_categories(&self) -> Vec<FfiCategory> {
        self.inner
            .get_categories()
            .iter()
            .map(FfiCategory::from)
            .collect()
    }

    /// Replaces the entire category collection.
    pub fn save_categories(&self, categories: Vec<FfiCategory>) -> Result<(), ChefbookError> {
        let categories: Vec<Category> = convert(categories)?;
        self.inner.save_categories(&categories)?;
        Ok(())
    }

    pub fn add_category(&self, category: FfiCategory) -> Result<(), ChefbookError> {
        self.inner.add_category(category.try_into()?)?;
        Ok(())
    }

    /// Replaces the stored category with the same id; silently does nothing
    /// when the id is unknown.
    pub fn update_category(&self, category: FfiCategory) -> Result<(), ChefbookError> {
        let category: Category = category.try_into()?;
        self.inner.update_category(&category)?;
        Ok(())
    }

    pub fn delete_category(&self, category_id: String) -> Result<(), ChefbookError> {
        self.inner.delete_category(&category_id)?;
        Ok(())
    }

    /// Re-ranks categories to match the given id sequence; unlisted ones are
    /// appended after, keeping their relative order.
    pub fn reorder_categories(&self, ids_in_order: Vec<String>) -> Result<(), ChefbookError> {
        self.inner.reorder_categories(&ids_in_order)?;
        Ok(())
    }

    /// Returns both collections in one snapshot.
    pub fn get_app_state(&self) -> FfiAppState {
        self.inner.get_app_state().into()
    }

    /// Removes both collections entirely.
    pub fn clear_all_data(&self) -> Result<(), ChefbookError> {
        self.inner.clear_all_data()?;
        Ok(())
    }
}

fn convert<F, T>(items: Vec<F>) -> Result<Vec<T>, ChefbookError>
where
    T: TryFrom<F, Error = ChefbookError>,
{
    items.into_iter().map(T::try_from).collect()
}

/// Builds the primary share artifact for a recipe: the paginated document,
/// or the plain-text card when document generation fails.
#[uniffi::export]
pub fn share_recipe(
    recipe: FfiRecipe,
    category: Option<FfiCategory>,
) -> Result<FfiShareArtifact, ChefbookError> {
    let recipe: Recipe = recipe.try_into()?;
    let category: Option<Category> = category.map(Category::try_from).transpose()?;
    Ok(export::build_share_artifact(&recipe, category.as_ref()).into())
}

/// Renders a recipe in one explicit export format.
#[uniffi::export]
pub fn export_recipe(
    recipe: FfiRecipe,
    category: Option<FfiCategory>,
    format: FfiShareFormat,
) -> Result<FfiShareArtifact, ChefbookError> {
    let recipe: Recipe = recipe.try_into()?;
    let category: Option<Category> = category.map(Category::try_from).transpose()?;
    let artifact = export::export(&recipe, category.as_ref(), format.into())?;
    Ok(artifact.into())
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_recipe() -> FfiRecipe {
        FfiRecipe {
            id: "r1".to_string(),
            title: "Quiche".to_string(),
            image: None,
            category: None,
            prep_time: 40,
            ingredients: vec!["pâte brisée".to_string()],
            instructions: vec!["Étaler la pâte.".to_string()],
            created_at: "2024-03-01T10:00:00Z".to_string(),
            updated_at: "2024-03-02T09:30:00Z".to_string(),
        }
    }

    #[test]
    fn test_recipe_record_roundtrip() {
        let recipe: Recipe = ffi_recipe().try_into().unwrap();
        assert_eq!(recipe.id, "r1");
        let back = FfiRecipe::from(&recipe);
        assert_eq!(back.created_at, "2024-03-01T10:00:00+00:00");
        assert_eq!(back.prep_time, 40);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let mut record = ffi_recipe();
        record.created_at = "yesterday".to_string();
        let result: Result<Recipe, _> = record.try_into();
        assert!(matches!(result, Err(ChefbookError::InvalidData { .. })));
    }

    #[test]
    fn test_store_object_crud() {
        let store = FfiRecipeStore::in_memory();
        store.add_recipe(ffi_recipe()).unwrap();
        assert_eq!(store.get_recipes().len(), 1);
        store.delete_recipe("r1".to_string()).unwrap();
        assert!(store.get_recipes().is_empty());
    }

    #[test]
    fn test_share_recipe_produces_document() {
        let artifact = share_recipe(ffi_recipe(), None).unwrap();
        assert_eq!(artifact.mime_type, "application/pdf");
        assert!(artifact.data.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_recipe_markup() {
        let artifact = export_recipe(ffi_recipe(), None, FfiShareFormat::Markup).unwrap();
        assert_eq!(artifact.mime_type, "image/svg+xml");
    }

    #[test]
    fn test_library_version() {
        assert_eq!(library_version(), env!("CARGO_PKG_VERSION"));
    }
}
