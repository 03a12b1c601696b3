use crate::{error::GifError, reader::ByteReader};

use super::GifBlockKind;

const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
const COMMENT_LABEL: u8 = 0xFE;
const PLAIN_TEXT_LABEL: u8 = 0x01;
const APPLICATION_LABEL: u8 = 0xFF;

const NETSCAPE_IDENTIFIER: &str = "NETSCAPE";
const NETSCAPE_AUTHENTICATION_CODE: [u8; 3] = *b"2.0";

/// An extension block, introduced by `0x21` and told apart by its label.
#[derive(Debug, Clone, PartialEq)]
pub enum GifExtension {
    GraphicControl(GifGraphicControlExtension),
    Comment(GifCommentExtension),
    PlainText(GifPlainTextExtension),
    Application(GifApplicationExtension),
}

impl GifExtension {
    /// Reads an extension, the introducer being already consumed.
    pub(crate) fn read(
        reader: &mut ByteReader,
        control_extensions: &[GifExtension],
    ) -> Result<Self, GifError> {
        match reader.read_byte()? {
            GRAPHIC_CONTROL_LABEL => {
                GifGraphicControlExtension::read(reader).map(GifExtension::GraphicControl)
            }
            COMMENT_LABEL => GifCommentExtension::read(reader).map(GifExtension::Comment),
            PLAIN_TEXT_LABEL => GifPlainTextExtension::read(reader, control_extensions)
                .map(GifExtension::PlainText),
            APPLICATION_LABEL => {
                GifApplicationExtension::read(reader).map(GifExtension::Application)
            }
            label => Err(GifError::UnknownExtensionType(label)),
        }
    }

    pub fn kind(&self) -> GifBlockKind {
        match self {
            GifExtension::GraphicControl(_) => GifBlockKind::Control,
            GifExtension::PlainText(_) => GifBlockKind::GraphicRendering,
            GifExtension::Comment(_) | GifExtension::Application(_) => {
                GifBlockKind::SpecialPurpose
            }
        }
    }
}

fn read_block_size(
    reader: &mut ByteReader,
    block: &'static str,
    expected: u8,
) -> Result<(), GifError> {
    let actual = reader.read_byte()?;
    if actual != expected {
        return Err(GifError::InvalidBlockSize {
            block,
            expected,
            actual,
        });
    }
    Ok(())
}

/// What to do with a frame's area before drawing the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GifFrameDisposalMethod {
    /// Not specified.
    #[default]
    None,
    /// Leave the frame in place.
    DoNotDispose,
    /// Clear the frame's area to the background.
    RestoreBackground,
    /// Restore the frame's area to what it was before the frame was drawn.
    RestorePrevious,
    /// Values 4 to 7, undefined by the format.
    Reserved(u8),
}

impl From<u8> for GifFrameDisposalMethod {
    fn from(value: u8) -> Self {
        match value & 0b0111 {
            0 => GifFrameDisposalMethod::None,
            1 => GifFrameDisposalMethod::DoNotDispose,
            2 => GifFrameDisposalMethod::RestoreBackground,
            3 => GifFrameDisposalMethod::RestorePrevious,
            value => GifFrameDisposalMethod::Reserved(value),
        }
    }
}

/// Timing, transparency and disposal of the next rendering block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifGraphicControlExtension {
    pub disposal_method: GifFrameDisposalMethod,
    pub user_input: bool,
    pub has_transparency: bool,
    /// In milliseconds.
    pub delay: u32,
    pub transparency_index: u8,
}

impl GifGraphicControlExtension {
    const BLOCK_SIZE: u8 = 4;

    fn read(reader: &mut ByteReader) -> Result<Self, GifError> {
        read_block_size(reader, "Graphic Control Extension", Self::BLOCK_SIZE)?;

        let packed_fields = reader.read_byte()?;
        // Stored in hundredths of a second.
        let delay = reader.read_u16()? as u32 * 10;
        let transparency_index = reader.read_byte()?;
        // Block terminator.
        reader.read_byte()?;

        Ok(Self {
            disposal_method: ((packed_fields & 0x1C) >> 2).into(),
            user_input: (packed_fields & 0x02) != 0,
            has_transparency: (packed_fields & 0x01) != 0,
            delay,
            transparency_index,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifCommentExtension {
    pub text: String,
}

impl GifCommentExtension {
    fn read(reader: &mut ByteReader) -> Result<Self, GifError> {
        let text = reader.read_string_from_data_blocks()?;
        Ok(Self { text })
    }
}

/// Text drawn on a grid of cells. Parsed, but not rendered by anything here.
#[derive(Debug, Clone, PartialEq)]
pub struct GifPlainTextExtension {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub cell_width: u8,
    pub cell_height: u8,
    pub foreground_color_index: u8,
    pub background_color_index: u8,
    pub text: String,
    /// Control extensions read since the previous rendering block.
    pub extensions: Vec<GifExtension>,
}

impl GifPlainTextExtension {
    const BLOCK_SIZE: u8 = 12;

    fn read(reader: &mut ByteReader, control_extensions: &[GifExtension]) -> Result<Self, GifError> {
        read_block_size(reader, "Plain Text Extension", Self::BLOCK_SIZE)?;

        Ok(Self {
            left: reader.read_u16()?,
            top: reader.read_u16()?,
            width: reader.read_u16()?,
            height: reader.read_u16()?,
            cell_width: reader.read_byte()?,
            cell_height: reader.read_byte()?,
            foreground_color_index: reader.read_byte()?,
            background_color_index: reader.read_byte()?,
            text: reader.read_string_from_data_blocks()?,
            extensions: control_extensions.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifApplicationExtension {
    /// Eight characters.
    pub application_identifier: String,
    pub authentication_code: [u8; 3],
    /// Every data sub-block, concatenated.
    pub data: Vec<u8>,
}

impl GifApplicationExtension {
    const BLOCK_SIZE: u8 = 11;

    fn read(reader: &mut ByteReader) -> Result<Self, GifError> {
        read_block_size(reader, "Application Extension", Self::BLOCK_SIZE)?;

        let application_identifier = reader.read_string(8)?;
        let code = reader.read_bytes(3)?;
        let data = reader.read_data_blocks()?;

        Ok(Self {
            application_identifier,
            authentication_code: [code[0], code[1], code[2]],
            data,
        })
    }

    /// Whether this is the NETSCAPE2.0 looping extension.
    pub fn is_netscape(&self) -> bool {
        self.application_identifier == NETSCAPE_IDENTIFIER
            && self.authentication_code == NETSCAPE_AUTHENTICATION_CODE
    }

    /// The loop count of a NETSCAPE2.0 extension, 0 meaning forever. `None` if this is
    /// another extension, or if the data is too short to hold a count.
    pub fn repeat_count(&self) -> Option<u16> {
        if !self.is_netscape() || self.data.len() < 3 {
            return None;
        }
        Some(u16::from_le_bytes([self.data[1], self.data[2]]))
    }
}
