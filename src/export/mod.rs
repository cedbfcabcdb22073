//! Recipe share/export pipeline.
//!
//! Converts one in-memory recipe (plus its category, when it has one) into a
//! shareable artifact. Three modes exist: a paginated document (PDF), a
//! markup image (SVG) and a plain-text card. The pipeline never touches the
//! storage layer, and handing the produced artifact to the platform share
//! sheet is the embedding shell's job.

use crate::model::{format_prep_time, Category, Recipe};
use thiserror::Error;

pub mod image;
pub mod layout;
mod pdf;
mod svg;
mod text;

pub use image::ImageError;
pub use pdf::render_pdf;
pub use svg::{escape_markup, render_svg};
pub use text::render_text;

/// Brand stamped on every export's signature line.
pub(crate) const BRAND: &str = "ChefBook";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to decode embedded image: {0}")]
    Image(#[from] ImageError),
}

/// The three available output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareFormat {
    /// Paginated PDF document.
    Document,
    /// Self-contained SVG markup.
    Markup,
    /// UTF-8 text card.
    Text,
}

/// A produced export, ready to hand to the platform share facility.
#[derive(Debug, Clone)]
pub struct ShareArtifact {
    /// Suggested file name, `recipe_<id>_<millis>.<ext>`.
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Renders the recipe in one explicit format.
pub fn export(
    recipe: &Recipe,
    category: Option<&Category>,
    format: ShareFormat,
) -> Result<ShareArtifact, ExportError> {
    match format {
        ShareFormat::Document => {
            let bytes = render_pdf(recipe, category)?;
            Ok(artifact(recipe, "pdf", "application/pdf", bytes))
        }
        ShareFormat::Markup => {
            let markup = render_svg(recipe, category);
            Ok(artifact(recipe, "svg", "image/svg+xml", markup.into_bytes()))
        }
        ShareFormat::Text => {
            let card = render_text(recipe, category);
            Ok(artifact(recipe, "txt", "text/plain", card.into_bytes()))
        }
    }
}

/// Primary share path: document first, plain text on any failure.
///
/// The markup mode is deliberately not part of this chain; it stays
/// reachable through [`export`] only (see DESIGN.md). The text card cannot
/// fail, so this function always produces something shareable.
pub fn build_share_artifact(recipe: &Recipe, category: Option<&Category>) -> ShareArtifact {
    match export(recipe, category, ShareFormat::Document) {
        Ok(artifact) => artifact,
        Err(e) => {
            log::warn!("document export failed, falling back to text: {e}");
            let card = render_text(recipe, category);
            artifact(recipe, "txt", "text/plain", card.into_bytes())
        }
    }
}

/// Metadata line shared by the document and markup modes:
/// `"<category> • <prep time>"`, each part optional, `None` when both are
/// absent.
pub(crate) fn metadata_line(recipe: &Recipe, category: Option<&Category>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(category) = category {
        parts.push(category.name.clone());
    }
    if let Some(prep) = format_prep_time(recipe.prep_time) {
        parts.push(prep);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" • "))
    }
}

/// Today's date as rendered on the share cards.
pub(crate) fn share_date() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}

fn artifact(recipe: &Recipe, ext: &str, mime_type: &str, bytes: Vec<u8>) -> ShareArtifact {
    ShareArtifact {
        file_name: format!(
            "recipe_{}_{}.{ext}",
            recipe.id,
            chrono::Utc::now().timestamp_millis()
        ),
        mime_type: mime_type.to_string(),
        bytes,
    }
}
