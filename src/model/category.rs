use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-defined grouping for recipes.
///
/// Categories carry a display color and an `order` rank. The storage layer
/// always returns categories sorted ascending by `order`; ranks may have gaps
/// and duplicates are tolerated (ties keep insertion order). Records persisted
/// before ranks existed have no `order` field and deserialize as rank 0.
///
/// Deleting a category does not cascade to its recipes: they keep the dangling
/// id and render as uncategorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Display color token, e.g. `#FF6B35`.
    pub color: String,
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category with a generated id and the current timestamp.
    pub fn new(name: impl Into<String>, color: impl Into<String>, order: i32) -> Self {
        Category {
            id: super::generate_id(),
            name: name.into(),
            color: color.into(),
            order,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Desserts", "#FF6B35", 2);
        assert!(!category.id.is_empty());
        assert_eq!(category.name, "Desserts");
        assert_eq!(category.order, 2);
    }

    #[test]
    fn test_missing_order_defaults_to_zero() {
        let json = r##"{
            "id": "c1",
            "name": "Entrées",
            "color": "#4ECDC4",
            "createdAt": "2024-01-01T00:00:00Z"
        }"##;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.order, 0);
    }
}
