use crate::{error::GifError, reader::ByteReader};

use super::{GifBlockKind, GifColor, GifExtension, GifGraphicControlExtension};

/// One image of the stream, and everything needed to decode its pixels later.
#[derive(Debug, Clone, PartialEq)]
pub struct GifFrame {
    pub image_descriptor: GifImageDescriptor,
    pub local_color_table: Option<Vec<GifColor>>,
    pub image_data: GifImageData,
    /// Control extensions read since the previous rendering block, in stream order.
    pub extensions: Vec<GifExtension>,
    /// The last graphic control extension of `extensions`.
    pub graphic_control: Option<GifGraphicControlExtension>,
}

impl GifFrame {
    /// Reads a frame, the image separator being already consumed.
    pub(crate) fn read(
        reader: &mut ByteReader,
        control_extensions: &[GifExtension],
    ) -> Result<Self, GifError> {
        let image_descriptor = GifImageDescriptor::read(reader)?;
        let local_color_table = if image_descriptor.has_local_color_table {
            Some(reader.read_color_table(image_descriptor.local_color_table_size)?)
        } else {
            None
        };
        let image_data = GifImageData::read(reader)?;

        let graphic_control = control_extensions
            .iter()
            .rev()
            .find_map(|extension| match extension {
                GifExtension::GraphicControl(control) => Some(*control),
                _ => None,
            });

        Ok(Self {
            image_descriptor,
            local_color_table,
            image_data,
            extensions: control_extensions.to_vec(),
            graphic_control,
        })
    }

    pub fn kind(&self) -> GifBlockKind {
        GifBlockKind::GraphicRendering
    }

    /// Number of pixels, which is also the length of the decoded index buffer.
    pub fn pixel_count(&self) -> usize {
        self.image_descriptor.width as usize * self.image_descriptor.height as usize
    }
}

/// Position and layout of a frame on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifImageDescriptor {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub has_local_color_table: bool,
    pub interlace: bool,
    pub is_local_color_table_sorted: bool,
    /// Number of entries, a power of two from 2 to 256.
    pub local_color_table_size: usize,
}

impl GifImageDescriptor {
    fn read(reader: &mut ByteReader) -> Result<Self, GifError> {
        let left = reader.read_u16()?;
        let top = reader.read_u16()?;
        let width = reader.read_u16()?;
        let height = reader.read_u16()?;
        let packed_fields = reader.read_byte()?;

        Ok(Self {
            left,
            top,
            width,
            height,
            has_local_color_table: (packed_fields & 0x80) != 0,
            interlace: (packed_fields & 0x40) != 0,
            is_local_color_table_sorted: (packed_fields & 0x20) != 0,
            local_color_table_size: 1 << ((packed_fields & 0x07) + 1),
        })
    }
}

/// Where a frame's compressed data lives in the source buffer. The data itself isn't
/// copied, it's read again when the frame is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifImageData {
    pub lzw_minimum_code_size: u8,
    /// Offset of the first sub-block, right after the code size byte.
    pub compressed_data_start_offset: usize,
    /// Bytes spanned by the sub-blocks, length prefixes and terminator included.
    pub length: usize,
}

impl GifImageData {
    fn read(reader: &mut ByteReader) -> Result<Self, GifError> {
        let lzw_minimum_code_size = reader.read_byte()?;
        let compressed_data_start_offset = reader.position();
        reader.skip_data_blocks()?;

        Ok(Self {
            lzw_minimum_code_size,
            compressed_data_start_offset,
            length: reader.position() - compressed_data_start_offset,
        })
    }

    /// End of the sub-blocks in the source buffer, exclusive.
    pub fn end_offset(&self) -> usize {
        self.compressed_data_start_offset + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::GifFrameDisposalMethod;

    fn control(delay: u32) -> GifGraphicControlExtension {
        GifGraphicControlExtension {
            disposal_method: GifFrameDisposalMethod::DoNotDispose,
            user_input: false,
            has_transparency: false,
            delay,
            transparency_index: 0,
        }
    }

    #[test]
    fn read_frame() -> Result<(), GifError> {
        #[rustfmt::skip]
        let data = [
            0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04, 0x00, 0b1110_0000,
            0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF,
            0x02, 0x03, 0xAA, 0xBB, 0xCC, 0x01, 0xDD, 0x00,
            0x3B,
        ];
        let mut reader = ByteReader::new(&data);

        let frame = GifFrame::read(&mut reader, &[])?;

        assert_eq!(
            frame.image_descriptor,
            GifImageDescriptor {
                left: 1,
                top: 2,
                width: 3,
                height: 4,
                has_local_color_table: true,
                interlace: true,
                is_local_color_table_sorted: true,
                local_color_table_size: 2,
            }
        );
        assert_eq!(
            frame.local_color_table,
            Some(vec![GifColor::new(0, 0, 0), GifColor::new(255, 255, 255)])
        );
        assert_eq!(
            frame.image_data,
            GifImageData {
                lzw_minimum_code_size: 2,
                compressed_data_start_offset: 16,
                length: 7,
            }
        );
        assert_eq!(frame.image_data.end_offset(), 23);
        assert_eq!(reader.position(), 23);
        assert_eq!(frame.pixel_count(), 12);
        assert_eq!(frame.graphic_control, None);
        Ok(())
    }

    #[test]
    fn last_graphic_control_wins() -> Result<(), GifError> {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
            0x02, 0x02, 0x4C, 0x01, 0x00,
        ];
        let extensions = [
            GifExtension::GraphicControl(control(10)),
            GifExtension::GraphicControl(control(20)),
        ];

        let frame = GifFrame::read(&mut ByteReader::new(&data), &extensions)?;

        assert_eq!(frame.extensions, extensions);
        assert_eq!(frame.graphic_control, Some(control(20)));
        assert!(frame.local_color_table.is_none());
        Ok(())
    }

    #[test]
    fn truncated_color_table() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x87, 0x00, 0x00];

        let result = GifFrame::read(&mut ByteReader::new(&data), &[]);

        assert!(matches!(
            result,
            Err(GifError::TruncatedBuffer {
                offset: 9,
                requested: 768,
                available: 2
            })
        ));
    }

    #[test]
    fn unterminated_image_data() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
            0x02, 0x02, 0x4C, 0x01,
        ];

        let result = GifFrame::read(&mut ByteReader::new(&data), &[]);

        assert!(result.err().unwrap().is_truncated());
    }
}
