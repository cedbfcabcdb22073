//! Markup (SVG) share card.
//!
//! Self-contained document on a fixed-width canvas whose height grows with
//! the wrapped content. Kept as an explicit export mode even though the
//! primary share path goes document → text (see DESIGN.md).

use super::layout::wrap_text;
use crate::model::{format_prep_time, Category, Recipe};

const SVG_WIDTH: f32 = 400.0;
const PADDING: f32 = 20.0;
const HEADER_HEIGHT: f32 = 100.0;
const IMAGE_HEIGHT: f32 = 200.0;
const LINE_HEIGHT: f32 = 18.0;
const BODY_FONT: f32 = 13.0;
const FOOTER_HEIGHT: f32 = 40.0;

const BACKGROUND: &str = "#0F0F0F";
const SURFACE: &str = "#1A1A1A";
const TEXT: &str = "#FFFFFF";
const TEXT_SECONDARY: &str = "#A0A0A0";
const FALLBACK_ACCENT: &str = "#FF6B35";

/// Escapes the markup's reserved characters in user-supplied text.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders the recipe as an SVG document, dated today.
pub fn render_svg(recipe: &Recipe, category: Option<&Category>) -> String {
    render_svg_on(recipe, category, &super::share_date())
}

pub(crate) fn render_svg_on(recipe: &Recipe, category: Option<&Category>, date: &str) -> String {
    let content_width = SVG_WIDTH - 2.0 * PADDING;
    let wrap_width = content_width - 20.0;
    let accent = category.map(|c| c.color.as_str()).unwrap_or(FALLBACK_ACCENT);

    let ingredient_lines: Vec<(f32, String)> = recipe
        .ingredients
        .iter()
        .flat_map(|ingredient| {
            wrap_text(ingredient, BODY_FONT, wrap_width)
                .into_iter()
                .enumerate()
                .map(|(i, line)| {
                    if i == 0 {
                        (0.0, format!("• {line}"))
                    } else {
                        (12.0, line)
                    }
                })
        })
        .collect();

    let instruction_lines: Vec<(f32, String)> = recipe
        .instructions
        .iter()
        .enumerate()
        .flat_map(|(index, instruction)| {
            wrap_text(instruction, BODY_FONT, wrap_width)
                .into_iter()
                .enumerate()
                .map(move |(i, line)| {
                    if i == 0 {
                        (0.0, format!("{}. {line}", index + 1))
                    } else {
                        (14.0, line)
                    }
                })
        })
        .collect();

    let mut body = String::new();
    let mut y = HEADER_HEIGHT;

    // Header
    body.push_str(&format!(
        r##"  <rect x="0" y="0" width="100%" height="{HEADER_HEIGHT}" fill="{SURFACE}"/>
  <rect x="0" y="{}" width="100%" height="3" fill="{}"/>
  <text x="{PADDING}" y="35" font-family="Arial, sans-serif" font-size="22" font-weight="bold" fill="{TEXT}">{}</text>
"##,
        HEADER_HEIGHT - 3.0,
        escape_markup(accent),
        escape_markup(&recipe.title),
    ));
    let mut meta_parts = Vec::new();
    if let Some(category) = category {
        meta_parts.push(category.name.clone());
    }
    if let Some(prep) = format_prep_time(recipe.prep_time) {
        meta_parts.push(prep);
    }
    if !meta_parts.is_empty() {
        body.push_str(&format!(
            r#"  <text x="{PADDING}" y="65" font-family="Arial, sans-serif" font-size="13" fill="{TEXT_SECONDARY}">{}</text>
"#,
            escape_markup(&meta_parts.join(" • ")),
        ));
    }

    // Image block, always the same height so layouts stay comparable
    y += PADDING;
    match &recipe.image {
        Some(image) => body.push_str(&format!(
            r#"  <image x="{PADDING}" y="{y}" width="{content_width}" height="{IMAGE_HEIGHT}" href="{}" preserveAspectRatio="xMidYMid slice"/>
"#,
            escape_markup(image),
        )),
        None => body.push_str(&format!(
            r#"  <rect x="{PADDING}" y="{y}" width="{content_width}" height="{IMAGE_HEIGHT}" fill="{SURFACE}" stroke="{TEXT_SECONDARY}" stroke-width="2" stroke-dasharray="5,5"/>
  <text x="{}" y="{}" text-anchor="middle" font-family="Arial, sans-serif" font-size="16" fill="{TEXT_SECONDARY}">Aucune image</text>
"#,
            SVG_WIDTH / 2.0,
            y + IMAGE_HEIGHT / 2.0,
        )),
    }
    y += IMAGE_HEIGHT + 2.0 * PADDING;

    // Ingredients
    body.push_str(&section_title(y, "Ingrédients"));
    y += 26.0;
    for (indent, line) in &ingredient_lines {
        body.push_str(&body_line(PADDING + 10.0 + indent, y, line));
        y += LINE_HEIGHT;
    }

    // Instructions
    y += 24.0;
    body.push_str(&section_title(y, "Instructions"));
    y += 26.0;
    for (indent, line) in &instruction_lines {
        body.push_str(&body_line(PADDING + 10.0 + indent, y, line));
        y += LINE_HEIGHT;
    }

    let height = y + PADDING + FOOTER_HEIGHT;

    // Footer
    body.push_str(&format!(
        r#"  <rect x="0" y="{}" width="100%" height="{FOOTER_HEIGHT}" fill="{SURFACE}"/>
  <text x="{PADDING}" y="{}" font-family="Arial, sans-serif" font-size="12" fill="{TEXT_SECONDARY}">Créé avec {}</text>
  <text x="{}" y="{}" text-anchor="end" font-family="Arial, sans-serif" font-size="12" fill="{TEXT_SECONDARY}">{}</text>
"#,
        height - FOOTER_HEIGHT,
        height - 15.0,
        super::BRAND,
        SVG_WIDTH - PADDING,
        height - 15.0,
        escape_markup(date),
    ));

    format!(
        "<svg width=\"{SVG_WIDTH}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n  \
         <rect width=\"100%\" height=\"100%\" fill=\"{BACKGROUND}\"/>\n{body}</svg>\n"
    )
}

fn section_title(y: f32, title: &str) -> String {
    format!(
        r#"  <text x="{PADDING}" y="{y}" font-family="Arial, sans-serif" font-size="18" font-weight="bold" fill="{TEXT}">{title}</text>
"#
    )
}

fn body_line(x: f32, y: f32, line: &str) -> String {
    format!(
        r#"  <text x="{x}" y="{y}" font-family="Arial, sans-serif" font-size="{BODY_FONT}" fill="{TEXT}">{}</text>
"#,
        escape_markup(line),
    )
}
