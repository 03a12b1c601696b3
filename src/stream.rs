use std::io::Read;

use log::{debug, trace};

use crate::{
    blocks::{GifBlock, GifBlockKind, GifColor, GifExtension, GifFrame, GifHeader},
    error::GifError,
    reader::ByteReader,
};

/// A parsed GIF: header, color table, frames and metadata extensions.
///
/// Frames only locate their compressed pixels in the source buffer. Decode them with a
/// [FrameDecoder](crate::FrameDecoder), handing it the same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct GifDataStream {
    header: GifHeader,
    global_color_table: Option<Vec<GifColor>>,
    frames: Vec<GifFrame>,
    extensions: Vec<GifExtension>,
    repeat_count: u16,
}

impl GifDataStream {
    /// Parses a complete GIF held in memory.
    ///
    /// Data that isn't a known block, found after at least one frame, is taken as the end of
    /// the stream. Before the first frame, it's an error.
    ///
    /// # Examples
    /// ```
    /// use gif_datastream::{GifDataStream, GifError};
    ///
    /// fn main() -> Result<(), GifError> {
    ///     let data = [
    ///         b'G', b'I', b'F', b'8', b'9', b'a',
    ///         0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
    ///         0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF,
    ///         0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
    ///         0x02, 0x02, 0x4C, 0x01, 0x00,
    ///         0x3B,
    ///     ];
    ///
    ///     let stream = GifDataStream::parse(&data)?;
    ///
    ///     assert_eq!(stream.frames().len(), 1);
    ///     assert_eq!(stream.repeat_count(), 1);
    ///     Ok(())
    /// }
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self, GifError> {
        let mut reader = ByteReader::new(data);

        let header = GifHeader::read(&mut reader)?;
        let descriptor = &header.logical_screen_descriptor;
        let global_color_table = if descriptor.has_global_color_table {
            Some(reader.read_color_table(descriptor.global_color_table_size)?)
        } else {
            None
        };

        let mut control_extensions: Vec<GifExtension> = vec![];
        let mut extensions: Vec<GifExtension> = vec![];
        let mut frames: Vec<GifFrame> = vec![];

        loop {
            let offset = reader.position();
            let block = match GifBlock::read(&mut reader, &control_extensions) {
                Ok(block) => block,
                Err(error) if error.is_unknown_block() && !frames.is_empty() => {
                    debug!(
                        "{} at offset {}, ending the stream after {} frame(s)",
                        error,
                        offset,
                        frames.len()
                    );
                    break;
                }
                Err(error) => return Err(error),
            };
            trace!("{:?} block at offset {}", block.kind(), offset);

            if block.kind() == GifBlockKind::GraphicRendering {
                control_extensions.clear();
            }

            match block {
                GifBlock::Trailer => break,
                GifBlock::Frame(frame) => frames.push(frame),
                GifBlock::Extension(GifExtension::PlainText(_)) => {
                    debug!("Discarding plain text extension at offset {}", offset);
                }
                GifBlock::Extension(extension) => match extension.kind() {
                    GifBlockKind::Control => control_extensions.push(extension),
                    _ => extensions.push(extension),
                },
            }
        }

        let repeat_count = extensions
            .iter()
            .find_map(|extension| match extension {
                GifExtension::Application(application) => application.repeat_count(),
                _ => None,
            })
            .unwrap_or(1);

        Ok(Self {
            header,
            global_color_table,
            frames,
            extensions,
            repeat_count,
        })
    }

    /// Reads `source` to its end, then parses it. The bytes are handed back along with the
    /// stream, since decoding frames needs them.
    pub fn read_to_end<R: Read>(mut source: R) -> Result<(Vec<u8>, Self), GifError> {
        let mut data = vec![];
        source.read_to_end(&mut data)?;
        let stream = Self::parse(&data)?;
        Ok((data, stream))
    }

    pub fn header(&self) -> &GifHeader {
        &self.header
    }

    /// Present when the logical screen descriptor flags it.
    pub fn global_color_table(&self) -> Option<&[GifColor]> {
        self.global_color_table.as_deref()
    }

    pub fn frames(&self) -> &[GifFrame] {
        &self.frames
    }

    /// Comment and application extensions, in stream order.
    pub fn extensions(&self) -> &[GifExtension] {
        &self.extensions
    }

    /// How many times the animation plays, from the NETSCAPE2.0 extension. 0 means forever,
    /// and 1 is assumed without the extension.
    pub fn repeat_count(&self) -> u16 {
        self.repeat_count
    }

    pub fn loops_forever(&self) -> bool {
        self.repeat_count == 0
    }

    /// The colors a frame's indices refer to: its local table, or else the global one.
    pub fn color_table_for<'a>(&'a self, frame: &'a GifFrame) -> Option<&'a [GifColor]> {
        frame
            .local_color_table
            .as_deref()
            .or(self.global_color_table.as_deref())
    }
}
