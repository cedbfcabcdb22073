//! Document (PDF) share output.
//!
//! Serializes the pages produced by [`layout::paginate`] into a minimal,
//! self-contained PDF 1.4 file: standard Helvetica fonts with WinAnsi
//! encoding, one content stream per page, and embedded JPEGs passed through
//! as DCTDecode image XObjects. No PDF library involved; the writer below is
//! all this crate needs.

use super::image::{self, JpegImage};
use super::layout::{self, Font, PageLayout, PAGE_HEIGHT, PAGE_WIDTH};
use super::ExportError;
use crate::model::{Category, Recipe};
use std::fmt::Write as _;

/// Renders the recipe as PDF bytes, dated today.
///
/// Fails when the recipe carries an embedded image that cannot be decoded;
/// the share entry point falls back to the text card in that case.
pub fn render_pdf(recipe: &Recipe, category: Option<&Category>) -> Result<Vec<u8>, ExportError> {
    render_pdf_on(recipe, category, &super::share_date())
}

pub(crate) fn render_pdf_on(
    recipe: &Recipe,
    category: Option<&Category>,
    date: &str,
) -> Result<Vec<u8>, ExportError> {
    let jpeg = match &recipe.image {
        Some(source) => image::decode_embedded(source)?,
        None => None,
    };
    let pages = layout::paginate(
        recipe,
        category,
        jpeg.as_ref().map(|j| (j.width, j.height)),
        date,
    );
    Ok(serialize(&pages, jpeg.as_ref()))
}

// Fixed object ids; page and content objects follow these.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_BOLD_ID: usize = 3;
const FONT_REGULAR_ID: usize = 4;

fn serialize(pages: &[PageLayout], jpeg: Option<&JpegImage>) -> Vec<u8> {
    let image_id = jpeg.map(|_| 5);
    let first_page_id = if image_id.is_some() { 6 } else { 5 };
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page_id + 2 * i).collect();

    let mut writer = PdfWriter::new();

    writer.object(
        CATALOG_ID,
        format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").into_bytes(),
    );

    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    writer.object(
        PAGES_ID,
        format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} >>",
            pages.len()
        )
        .into_bytes(),
    );

    writer.object(FONT_BOLD_ID, font_dict("Helvetica-Bold"));
    writer.object(FONT_REGULAR_ID, font_dict("Helvetica"));

    if let (Some(id), Some(jpeg)) = (image_id, jpeg) {
        writer.stream_object(
            id,
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode",
                jpeg.width, jpeg.height
            ),
            &jpeg.data,
        );
    }

    for (page, &page_id) in pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        let xobject = match (image_id, &page.image) {
            (Some(id), Some(_)) => format!(" /XObject << /Im1 {id} 0 R >>"),
            _ => String::new(),
        };
        writer.object(
            page_id,
            format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R \
                 /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 {FONT_BOLD_ID} 0 R /F2 {FONT_REGULAR_ID} 0 R >>{xobject} >> \
                 /Contents {content_id} 0 R >>"
            )
            .into_bytes(),
        );
        writer.stream_object(content_id, "", &content_stream(page));
    }

    writer.finish(CATALOG_ID)
}

fn font_dict(base_font: &str) -> Vec<u8> {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>"
    )
    .into_bytes()
}

fn content_stream(page: &PageLayout) -> Vec<u8> {
    let mut ops = String::new();

    if let Some(img) = &page.image {
        // PDF y-axis points up; cm places the image's lower-left corner
        let y = PAGE_HEIGHT - (img.y + img.height);
        let _ = writeln!(
            ops,
            "q {} 0 0 {} {} {} cm /Im1 Do Q",
            img.width, img.height, img.x, y
        );
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(ops.as_bytes());
    for text in &page.texts {
        let font = match text.font {
            Font::Bold => "F1",
            Font::Regular => "F2",
        };
        let y = PAGE_HEIGHT - text.y;
        out.extend_from_slice(format!("BT /{font} {} Tf {} {y} Td (", text.size, text.x).as_bytes());
        out.extend_from_slice(&pdf_string(&text.text));
        out.extend_from_slice(b") Tj ET\n");
    }
    out
}

/// Encodes text as a WinAnsi PDF string body, escaping the delimiters.
///
/// Latin-1 covers every UI string this app produces; anything outside it
/// degrades to `?` in the document mode only. The bullet maps to its WinAnsi
/// slot.
fn pdf_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match c {
            '•' => 0x95,
            '€' => 0x80,
            '’' => 0x92,
            'œ' => 0x9C,
            c if (c as u32) < 0x100 => c as u8,
            _ => b'?',
        };
        if byte == b'(' || byte == b')' || byte == b'\\' {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

/// Accumulates numbered objects and emits the xref table and trailer.
struct PdfWriter {
    buf: Vec<u8>,
    // (id, byte offset) of every written object
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        PdfWriter {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: Vec<u8>) {
        self.offsets.push((id, self.buf.len()));
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buf.extend_from_slice(&body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream_object(&mut self, id: usize, dict_entries: &str, data: &[u8]) {
        let mut body = format!("<< {dict_entries} /Length {} >>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(id, body);
    }

    fn finish(mut self, root_id: usize) -> Vec<u8> {
        let count = self.offsets.len();
        self.offsets.sort_by_key(|&(id, _)| id);
        let xref_offset = self.buf.len();

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", count + 1);
        for &(_, offset) in &self.offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {root_id} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                count + 1
            )
            .as_bytes(),
        );
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    fn recipe(instructions: usize) -> Recipe {
        Recipe::new(
            "Bœuf bourguignon",
            None,
            150,
            vec!["800g de bœuf".to_string(), "2 oignons".to_string()],
            (0..instructions)
                .map(|i| format!("Étape {i} de la préparation, avec quelques détails."))
                .collect(),
        )
    }

    fn as_latin1_lossy(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }

    #[test]
    fn test_pdf_structure() {
        let bytes = render_pdf_on(&recipe(3), None, "01/01/2024").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = as_latin1_lossy(&bytes);
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("startxref"));
    }

    #[test]
    fn test_long_recipe_produces_second_page() {
        let bytes = render_pdf_on(&recipe(60), None, "01/01/2024").unwrap();
        let text = as_latin1_lossy(&bytes);
        assert!(text.contains("/Count 2") || text.contains("/Count 3"));
    }

    #[test]
    fn test_embedded_jpeg_becomes_xobject() {
        let mut r = recipe(2);
        r.image = Some(format!(
            "data:image/jpeg;base64,{}",
            BASE64.encode(image::minimal_jpeg(320, 240))
        ));
        let bytes = render_pdf_on(&r, None, "01/01/2024").unwrap();
        let text = as_latin1_lossy(&bytes);
        assert!(text.contains("/Filter /DCTDecode"));
        assert!(text.contains("/Width 320"));
        assert!(text.contains("/Im1 Do"));
    }

    #[test]
    fn test_malformed_embedded_image_errors() {
        let mut r = recipe(2);
        r.image = Some("data:image/jpeg;base64,@@@".to_string());
        assert!(render_pdf_on(&r, None, "01/01/2024").is_err());
    }

    #[test]
    fn test_reference_image_is_skipped_not_fatal() {
        let mut r = recipe(2);
        r.image = Some("https://example.com/photo.jpg".to_string());
        let bytes = render_pdf_on(&r, None, "01/01/2024").unwrap();
        assert!(!as_latin1_lossy(&bytes).contains("/Im1"));
    }

    #[test]
    fn test_pdf_string_escapes_delimiters() {
        assert_eq!(pdf_string(r"a(b)c\d"), b"a\\(b\\)c\\\\d".to_vec());
    }

    #[test]
    fn test_pdf_string_winansi_mapping() {
        assert_eq!(pdf_string("é"), vec![0xE9]);
        assert_eq!(pdf_string("•"), vec![0x95]);
        assert_eq!(pdf_string("日"), vec![b'?']);
    }
}
