//! GIF flavoured LZW decoder.
//!
//! This crate decompresses the LZW code streams found in the image data of GIF frames:
//! variable code size starting at `minimum code size + 1` bits, least significant bit first,
//! a clear code at `2.pow(code_size)` and a stop code right after it, and a code table capped
//! at 4096 entries.
//!
//! The code table stores every word as a `(start, end)` range into a single growing byte
//! buffer, so adding a word costs at most one copy of its prefix, and nothing when the prefix
//! is the word added just before. The table buffers can be recycled between calls through a
//! [pool::TablePool].
//!
//! # Examples
//!
//! ```
//! use gif_lzw::decoder::{DecodingError, GifStyleDecoder};
//!
//! fn main() -> Result<(), DecodingError> {
//!     // Clear code, 1, stop code, with a code size of 2.
//!     let compressed = [0x4C, 0x01];
//!
//!     let decompressed = GifStyleDecoder::decode_to_vec(&compressed[..], 2)?;
//!
//!     assert_eq!(decompressed, [1]);
//!     Ok(())
//! }
//! ```

pub mod decoder;
mod io;
pub mod pool;

/// Largest code width, in bits, a GIF code stream can use.
pub const MAX_CODE_SIZE: u8 = 12;

/// Maximum number of entries in the code table, clear and stop codes included.
pub const MAX_TABLE_SIZE: usize = 1 << MAX_CODE_SIZE;
