//! Plain-text share card: the universal fallback every platform can show.

use crate::model::{format_prep_time, Category, Recipe};

/// Renders the recipe as a UTF-8 text card, dated today.
pub fn render_text(recipe: &Recipe, category: Option<&Category>) -> String {
    render_text_on(recipe, category, &super::share_date())
}

pub(crate) fn render_text_on(recipe: &Recipe, category: Option<&Category>, date: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("🍽️ {}\n", recipe.title));

    // Metadata line: omitted entirely when there is neither a category nor
    // a prep time, so no stray separator ever appears.
    let mut parts = Vec::new();
    if let Some(category) = category {
        parts.push(format!("📂 {}", category.name));
    }
    if let Some(prep) = format_prep_time(recipe.prep_time) {
        parts.push(format!("⏱️ {prep}"));
    }
    if !parts.is_empty() {
        out.push_str(&parts.join(" • "));
        out.push('\n');
    }

    out.push_str("\n📋 INGRÉDIENTS:\n");
    for ingredient in &recipe.ingredients {
        out.push_str(&format!("• {ingredient}\n"));
    }

    out.push_str("\n👨‍🍳 INSTRUCTIONS:\n");
    for (index, instruction) in recipe.instructions.iter().enumerate() {
        out.push_str(&format!("{}. {instruction}\n", index + 1));
    }

    out.push_str(&format!("\n---\nCréé avec {}\n{date}", super::BRAND));
    out
}
