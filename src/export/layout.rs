//! Platform-independent layout for the document export mode.
//!
//! Wrapping and pagination are computed here as plain placed boxes; the PDF
//! serializer only translates them to bytes. That keeps the pagination rules
//! testable without parsing PDF output.

use crate::model::{Category, Recipe};

/// Page geometry, in PDF layout units (1/72 inch). A4-ish portrait.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 40.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Embedded images are scaled into this box, never up.
pub const IMAGE_MAX_HEIGHT: f32 = 200.0;

pub const TITLE_SIZE: f32 = 20.0;
pub const META_SIZE: f32 = 11.0;
pub const SECTION_SIZE: f32 = 14.0;
pub const BODY_SIZE: f32 = 11.0;
pub const FOOTER_SIZE: f32 = 9.0;

const LINE_SPACING: f32 = 1.4;
const SECTION_GAP: f32 = 14.0;
const IMAGE_GAP: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// A line of text placed on a page. `y` is the baseline, measured from the
/// page top.
#[derive(Debug, Clone)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub font: Font,
    pub text: String,
}

/// An image box placed on a page. `y` is the top edge, from the page top.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Default)]
pub struct PageLayout {
    pub texts: Vec<PlacedText>,
    pub image: Option<PlacedImage>,
}

/// Approximate Helvetica advance width for one character, in 1/1000 em.
///
/// Close enough for wrapping decisions; exact AFM metrics are not worth
/// carrying for a share card.
fn char_width_units(c: char) -> u32 {
    match c {
        'i' | 'j' | 'l' => 222,
        '\'' | '`' => 191,
        ' ' | 'f' | 't' | 'I' | '.' | ',' | ':' | ';' | '!' | '/' | '\\' | '(' | ')' | '['
        | ']' => 278,
        'r' | '-' => 333,
        '"' => 355,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500,
        'm' | 'M' => 889,
        'w' => 722,
        'W' => 944,
        'A'..='Z' => 700,
        _ => 556,
    }
}

/// Rendered width of `text` at the given font size, in layout units.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(char_width_units).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap: words are packed onto a line while its rendered width
/// stays within `max_width`; the overflowing word flushes the line and starts
/// the next one. A single word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{current} {word}");
        if text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Scales `width`×`height` to fit inside the given box, preserving aspect
/// ratio. Images smaller than the box are left alone (never upscaled).
pub fn fit_image(width: u32, height: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    let (w, h) = (width as f32, height as f32);
    let scale = (max_width / w).min(max_height / h).min(1.0);
    (w * scale, h * scale)
}

struct LayoutBuilder {
    pages: Vec<PageLayout>,
    current: PageLayout,
    /// Top edge of the next placed line, from the page top.
    cursor: f32,
}

impl LayoutBuilder {
    fn new() -> Self {
        LayoutBuilder {
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: MARGIN,
        }
    }

    /// Starts a new page if `needed` layout units would cross the bottom
    /// margin.
    fn ensure_space(&mut self, needed: f32) {
        if self.cursor + needed > PAGE_HEIGHT - MARGIN {
            self.pages.push(std::mem::take(&mut self.current));
            self.cursor = MARGIN;
        }
    }

    fn line(&mut self, x: f32, text: impl Into<String>, size: f32, font: Font) {
        let advance = size * LINE_SPACING;
        self.ensure_space(advance);
        self.current.texts.push(PlacedText {
            x,
            y: self.cursor + size,
            size,
            font,
            text: text.into(),
        });
        self.cursor += advance;
    }

    fn gap(&mut self, dy: f32) {
        self.cursor += dy;
    }

    fn image(&mut self, width: f32, height: f32) {
        self.ensure_space(height + IMAGE_GAP);
        self.current.image = Some(PlacedImage {
            x: MARGIN,
            y: self.cursor,
            width,
            height,
        });
        self.cursor += height + IMAGE_GAP;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Lays the recipe out onto as many pages as it needs.
///
/// `image` is the pixel size of the embedded image, when one was decoded.
/// The footer (brand + date) lands on the last page, baseline on the bottom
/// margin line, after a final space check.
pub fn paginate(
    recipe: &Recipe,
    category: Option<&Category>,
    image: Option<(u32, u32)>,
    date: &str,
) -> Vec<PageLayout> {
    let mut doc = LayoutBuilder::new();

    for line in wrap_text(&recipe.title, TITLE_SIZE, CONTENT_WIDTH) {
        doc.line(MARGIN, line, TITLE_SIZE, Font::Bold);
    }
    if let Some(meta) = super::metadata_line(recipe, category) {
        doc.line(MARGIN, meta, META_SIZE, Font::Regular);
    }
    doc.gap(SECTION_GAP);

    if let Some((w, h)) = image {
        let (width, height) = fit_image(w, h, CONTENT_WIDTH, IMAGE_MAX_HEIGHT);
        doc.image(width, height);
    }

    doc.line(MARGIN, "Ingrédients", SECTION_SIZE, Font::Bold);
    doc.gap(4.0);
    let bullet_indent = text_width("• ", BODY_SIZE);
    for ingredient in &recipe.ingredients {
        let wrapped = wrap_text(ingredient, BODY_SIZE, CONTENT_WIDTH - bullet_indent);
        for (i, line) in wrapped.into_iter().enumerate() {
            if i == 0 {
                doc.line(MARGIN, format!("• {line}"), BODY_SIZE, Font::Regular);
            } else {
                doc.line(MARGIN + bullet_indent, line, BODY_SIZE, Font::Regular);
            }
        }
    }

    doc.gap(SECTION_GAP);
    doc.line(MARGIN, "Instructions", SECTION_SIZE, Font::Bold);
    doc.gap(4.0);
    for (index, instruction) in recipe.instructions.iter().enumerate() {
        let label = format!("{}. ", index + 1);
        // Continuation lines align under the text column, past the number.
        let indent = text_width(&label, BODY_SIZE);
        let wrapped = wrap_text(instruction, BODY_SIZE, CONTENT_WIDTH - indent);
        for (i, line) in wrapped.into_iter().enumerate() {
            if i == 0 {
                doc.line(MARGIN, format!("{label}{line}"), BODY_SIZE, Font::Regular);
            } else {
                doc.line(MARGIN + indent, line, BODY_SIZE, Font::Regular);
            }
        }
    }

    doc.ensure_space(FOOTER_SIZE * LINE_SPACING);
    let footer_y = PAGE_HEIGHT - MARGIN;
    doc.current.texts.push(PlacedText {
        x: MARGIN,
        y: footer_y,
        size: FOOTER_SIZE,
        font: Font::Regular,
        text: format!("Créé avec {}", super::BRAND),
    });
    doc.current.texts.push(PlacedText {
        x: PAGE_WIDTH - MARGIN - text_width(date, FOOTER_SIZE),
        y: footer_y,
        size: FOOTER_SIZE,
        font: Font::Regular,
        text: date.to_string(),
    });

    doc.finish()
}
