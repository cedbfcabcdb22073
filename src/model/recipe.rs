use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-authored dish entry.
///
/// Recipes are created from form submissions with a client-generated id and
/// mutated by full replacement: the storage layer rewrites the whole
/// collection on every save, so a `Recipe` value is always the complete
/// record.
///
/// Invariants:
/// - `id` is immutable once created
/// - `updated_at >= created_at`
///
/// Field names serialize in camelCase (`prepTime`, `createdAt`, ...) to match
/// the persisted collection layout shared with the mobile and web shells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Opaque identifier, typically a timestamp-derived string.
    pub id: String,
    pub title: String,
    /// Image reference: a URL, a platform path, or an embedded
    /// `data:image/jpeg;base64,` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Referenced [`Category`](super::Category) id, by value. Absent means
    /// uncategorized; a dangling reference also renders as uncategorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Preparation time in minutes. Zero is treated as "not specified".
    pub prep_time: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a new recipe with a generated id and current timestamps.
    pub fn new(
        title: impl Into<String>,
        category: Option<String>,
        prep_time: u32,
        ingredients: Vec<String>,
        instructions: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Recipe {
            id: super::generate_id(),
            title: title.into(),
            image: None,
            category,
            prep_time,
            ingredients,
            instructions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bumps `updated_at` to now. Call before saving an edited recipe.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Returns the prep time formatted for display, or `None` when the
    /// recipe has no prep time set.
    pub fn formatted_prep_time(&self) -> Option<String> {
        format_prep_time(self.prep_time)
    }
}

/// Formats a duration in minutes for display.
///
/// The rule is shared by every surface that shows a prep time (detail screen,
/// text card, SVG, document):
/// - `0` → `None` (the duration is considered absent)
/// - under an hour → `"5 min"`
/// - exact hours → `"1h"`
/// - otherwise → `"1h05"` (minutes zero-padded to two digits)
pub fn format_prep_time(minutes: u32) -> Option<String> {
    if minutes == 0 {
        return None;
    }
    let hours = minutes / 60;
    let remaining = minutes % 60;
    Some(match (hours, remaining) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m:02}"),
    })
}
