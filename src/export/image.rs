//! Embedded recipe image decoding for the document export mode.
//!
//! The pipeline works on in-memory objects only, so the only images it can
//! draw are the ones carried inside the recipe itself as
//! `data:image/jpeg;base64,` URIs. Path and URL references are skipped by the
//! caller.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Embedded image is not a valid JPEG")]
    InvalidJpeg,
}

/// A decoded embedded JPEG: raw file bytes plus pixel dimensions read from
/// its SOF marker.
pub struct JpegImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

const DATA_URI_PREFIXES: [&str; 2] = ["data:image/jpeg;base64,", "data:image/jpg;base64,"];

/// Decodes an embedded JPEG data URI.
///
/// Returns `Ok(None)` when `source` is not an embedded JPEG (a path or URL
/// reference), and an error when it claims to be one but the payload is
/// undecodable.
pub fn decode_embedded(source: &str) -> Result<Option<JpegImage>, ImageError> {
    let Some(payload) = DATA_URI_PREFIXES
        .iter()
        .find_map(|p| source.strip_prefix(p))
    else {
        return Ok(None);
    };
    let data = BASE64.decode(payload.trim())?;
    let (width, height) = jpeg_dimensions(&data).ok_or(ImageError::InvalidJpeg)?;
    Ok(Some(JpegImage {
        width,
        height,
        data,
    }))
}

/// Reads pixel dimensions from a JPEG's start-of-frame marker.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        // Fill bytes before a marker
        if marker == 0xFF {
            i += 1;
            continue;
        }
        // Standalone markers (RSTn, TEM) carry no length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            return None;
        }
        // SOF0-SOF15, excluding DHT (C4), JPG (C8) and DAC (CC)
        if matches!(marker, 0xC0..=0xCF if marker != 0xC4 && marker != 0xC8 && marker != 0xCC) {
            if i + 9 > data.len() {
                return None;
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }
        i += 2 + length;
    }
    None
}

#[cfg(test)]
pub(crate) fn minimal_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    // SOF0 with one component
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0x01, 0x11, 0x00]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}
