//! The blocks a GIF data stream is made of, and their decoders.
//!
//! A GIF file is laid out like this:
//!
//! * Header - `GIF87a` or `GIF89a`
//! * Logical screen descriptor - canvas size and global color table flags
//! * Global color table *(optional)*
//! * Any number of:
//!   - Extensions: graphic control, comment, plain text or application
//!   - Frames: image descriptor, local color table *(optional)*, image data
//! * Trailer
//!
//! Every block but the header starts with a one byte tag, and extensions have a second
//! byte, their label, right after it.

mod extension;
mod frame;
mod header;

pub use extension::{
    GifApplicationExtension, GifCommentExtension, GifExtension, GifFrameDisposalMethod,
    GifGraphicControlExtension, GifPlainTextExtension,
};
pub use frame::{GifFrame, GifImageData, GifImageDescriptor};
pub use header::{GifHeader, GifLogicalScreenDescriptor};

use crate::{error::GifError, reader::ByteReader};

pub(crate) const EXTENSION_INTRODUCER: u8 = 0x21;
pub(crate) const IMAGE_SEPARATOR: u8 = 0x2C;
pub(crate) const TRAILER: u8 = 0x3B;

/// A color table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GifColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl GifColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How a block takes part in rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifBlockKind {
    /// Affects the next rendering block, renders nothing itself.
    Control,
    /// Renders something, and consumes the control blocks read before it.
    GraphicRendering,
    /// Metadata, unrelated to rendering.
    SpecialPurpose,
    /// Header and trailer.
    Other,
}

/// A block read after the header.
#[derive(Debug, Clone, PartialEq)]
pub enum GifBlock {
    Frame(GifFrame),
    Extension(GifExtension),
    Trailer,
}

impl GifBlock {
    /// Reads the next block. `control_extensions` are the control extensions read since the
    /// last rendering block, a rendering block keeps a copy of them.
    pub(crate) fn read(
        reader: &mut ByteReader,
        control_extensions: &[GifExtension],
    ) -> Result<Self, GifError> {
        match reader.read_byte()? {
            EXTENSION_INTRODUCER => {
                GifExtension::read(reader, control_extensions).map(GifBlock::Extension)
            }
            IMAGE_SEPARATOR => GifFrame::read(reader, control_extensions).map(GifBlock::Frame),
            TRAILER => Ok(GifBlock::Trailer),
            block_id => Err(GifError::UnknownBlockType(block_id)),
        }
    }

    pub fn kind(&self) -> GifBlockKind {
        match self {
            GifBlock::Frame(_) => GifBlockKind::GraphicRendering,
            GifBlock::Extension(extension) => extension.kind(),
            GifBlock::Trailer => GifBlockKind::Other,
        }
    }
}
