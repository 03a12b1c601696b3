//! Decoding of GIF87a and GIF89a files.
//!
//! Parsing and pixel decoding are two separate steps. [GifDataStream::parse] reads the
//! structure of the file: header, color tables, frames and extensions. Frames only record
//! where their compressed data is, and [FrameDecoder] turns that data into color indices
//! when asked, one frame at a time.
//!
//! ```
//! use gif_datastream::{FrameDecoder, GifDataStream, GifError};
//!
//! fn main() -> Result<(), GifError> {
//!     let data = [
//!         b'G', b'I', b'F', b'8', b'9', b'a',
//!         0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
//!         0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF,
//!         0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
//!         0x02, 0x02, 0x4C, 0x01, 0x00,
//!         0x3B,
//!     ];
//!
//!     let stream = GifDataStream::parse(&data)?;
//!     let frame = &stream.frames()[0];
//!     let pixels = FrameDecoder::new().decode(&data, frame)?;
//!
//!     let colors = stream.color_table_for(frame).unwrap_or_default();
//!     assert_eq!(colors[pixels[0] as usize].r, 0xFF);
//!     Ok(())
//! }
//! ```

pub mod blocks;
mod error;
mod frame_decoder;
mod reader;
mod stream;

pub use error::GifError;
pub use frame_decoder::FrameDecoder;
pub use stream::GifDataStream;

pub use gif_lzw::pool::{Pool, TablePool};
