use crate::{error::GifError, reader::ascii_string, reader::ByteReader};

use super::GifBlockKind;

const SIGNATURE: &[u8] = b"GIF";
const VERSIONS: [&[u8]; 2] = [b"87a", b"89a"];

/// The first block of every GIF.
#[derive(Debug, Clone, PartialEq)]
pub struct GifHeader {
    /// Always `GIF`.
    pub signature: String,
    /// `87a` or `89a`.
    pub version: String,
    pub logical_screen_descriptor: GifLogicalScreenDescriptor,
}

impl GifHeader {
    pub(crate) fn read(reader: &mut ByteReader) -> Result<Self, GifError> {
        let signature = read_tag(reader)?;
        if signature != SIGNATURE {
            return Err(GifError::InvalidSignature(ascii_string(signature)));
        }

        let version = read_tag(reader)?;
        if !VERSIONS.contains(&version) {
            return Err(GifError::UnsupportedVersion(ascii_string(version)));
        }

        Ok(Self {
            signature: ascii_string(signature),
            version: ascii_string(version),
            logical_screen_descriptor: GifLogicalScreenDescriptor::read(reader)?,
        })
    }

    pub fn kind(&self) -> GifBlockKind {
        GifBlockKind::Other
    }
}

/// Reads up to three bytes. A short tag is still handed back, so that it fails the
/// signature or version check rather than looking truncated.
fn read_tag<'a>(reader: &mut ByteReader<'a>) -> Result<&'a [u8], GifError> {
    let mut length = 3;
    loop {
        match reader.read_bytes(length) {
            Ok(tag) => return Ok(tag),
            Err(_) if length > 0 => length -= 1,
            Err(error) => return Err(error),
        }
    }
}

/// Canvas size and global color table description.
#[derive(Debug, Clone, PartialEq)]
pub struct GifLogicalScreenDescriptor {
    pub width: u16,
    pub height: u16,
    pub has_global_color_table: bool,
    /// Bits per primary color in the original image, 1 to 8.
    pub color_resolution: u8,
    pub is_global_color_table_sorted: bool,
    /// Number of entries, a power of two from 2 to 256.
    pub global_color_table_size: usize,
    pub background_color_index: u8,
    /// Width over height of a pixel, or 0.0 when unspecified.
    pub pixel_aspect_ratio: f64,
}

impl GifLogicalScreenDescriptor {
    fn read(reader: &mut ByteReader) -> Result<Self, GifError> {
        let width = reader.read_u16()?;
        let height = reader.read_u16()?;
        let packed_fields = reader.read_byte()?;
        let background_color_index = reader.read_byte()?;
        let raw_aspect_ratio = reader.read_byte()?;

        Ok(Self {
            width,
            height,
            has_global_color_table: (packed_fields & 0x80) != 0,
            color_resolution: ((packed_fields & 0x70) >> 4) + 1,
            is_global_color_table_sorted: (packed_fields & 0x08) != 0,
            global_color_table_size: 1 << ((packed_fields & 0x07) + 1),
            background_color_index,
            pixel_aspect_ratio: pixel_aspect_ratio(raw_aspect_ratio),
        })
    }
}

fn pixel_aspect_ratio(raw: u8) -> f64 {
    if raw == 0 {
        0.0
    } else {
        (15.0 + raw as f64) / 64.0
    }
}
