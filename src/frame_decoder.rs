use gif_lzw::{
    decoder::GifStyleDecoder,
    pool::{Pool, TablePool},
};
use log::debug;

use crate::{blocks::GifFrame, error::GifError, reader::ByteReader, stream::GifDataStream};

/// Start row and row step of each interlacing pass.
const INTERLACE_PASSES: [(usize, usize); 4] = [(0, 8), (4, 8), (2, 4), (1, 2)];

/// Turns a frame's compressed data into color indices, one byte per pixel, row by row.
///
/// The LZW code tables and the buffers holding the concatenated sub-blocks are pooled, and
/// reused from one frame to the next. A decoder can be shared between threads, each frame
/// being decoded independently of the others.
///
/// # Examples
/// ```
/// use gif_datastream::{FrameDecoder, GifDataStream, GifError};
///
/// fn main() -> Result<(), GifError> {
///     let data = [
///         b'G', b'I', b'F', b'8', b'7', b'a',
///         0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
///         0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF,
///         0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
///         0x02, 0x02, 0x4C, 0x01, 0x00,
///         0x3B,
///     ];
///     let stream = GifDataStream::parse(&data)?;
///
///     let decoder = FrameDecoder::new();
///     let pixels = decoder.decode(&data, &stream.frames()[0])?;
///
///     assert_eq!(pixels, [1]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    tables: TablePool,
    staging: Pool<Vec<u8>>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder using the given pools, to bound how many idle buffers are kept around.
    pub fn with_pools(tables: TablePool, staging: Pool<Vec<u8>>) -> Self {
        Self { tables, staging }
    }

    /// Decodes the pixels of `frame`. `source` is the buffer the frame was parsed from.
    ///
    /// The result always holds `width * height` indices. Decoding stops once they are all
    /// out, and the rest of the code stream is not read. A stream ending with its stop code
    /// before that leaves the missing indices at 0. Interlaced frames are put back in top to
    /// bottom row order.
    ///
    /// # Errors
    ///
    /// A [GifError::TruncatedBuffer] if the sub-blocks or the code stream end early, and a
    /// [GifError::Lzw] if the code stream is corrupt.
    pub fn decode(&self, source: &[u8], frame: &GifFrame) -> Result<Vec<u8>, GifError> {
        let image_data = &frame.image_data;
        let end = image_data.end_offset();
        let pixel_count = frame.pixel_count();

        let mut staging = self.staging.acquire();
        staging.clear();
        let bounded = source.get(..end).unwrap_or(source);
        ByteReader::at(bounded, image_data.compressed_data_start_offset)
            .read_data_blocks_into(&mut staging)?;

        let mut pixels = vec![0u8; pixel_count];
        let written = GifStyleDecoder::decode_to_slice_with_pool(
            &staging,
            &mut pixels,
            image_data.lzw_minimum_code_size,
            &self.tables,
        )
        .map_err(|error| GifError::from_lzw(error, end))?;

        if written < pixel_count {
            debug!(
                "Frame at offset {} decoded to {} pixels, expected {}",
                image_data.compressed_data_start_offset, written, pixel_count
            );
        }

        if frame.image_descriptor.interlace {
            pixels = deinterlace(
                &pixels,
                frame.image_descriptor.width as usize,
                frame.image_descriptor.height as usize,
            );
        }

        Ok(pixels)
    }

    /// Decodes every frame of `stream`, in order.
    pub fn decode_all(
        &self,
        source: &[u8],
        stream: &GifDataStream,
    ) -> Result<Vec<Vec<u8>>, GifError> {
        stream
            .frames()
            .iter()
            .map(|frame| self.decode(source, frame))
            .collect()
    }
}

/// Rows of an interlaced frame come pass after pass. Puts them back in display order.
fn deinterlace(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
    if width == 0 || height == 0 {
        return pixels.to_vec();
    }

    let mut output = vec![0; pixels.len()];
    let rows = INTERLACE_PASSES
        .iter()
        .flat_map(|&(start, step)| (start..height).step_by(step));
    for (source_row, target_row) in pixels.chunks_exact(width).zip(rows) {
        output[target_row * width..][..width].copy_from_slice(source_row);
    }
    output
}
