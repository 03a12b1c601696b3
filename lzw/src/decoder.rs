//! Contains the implementation of the GIF style variable code size decoder.

use std::io::Write;

use log::trace;
use thiserror::Error;

use crate::{
    io::{BitReader, LittleEndianReader},
    pool::{TableBuffers, TablePool},
    MAX_CODE_SIZE, MAX_TABLE_SIZE,
};

/// The error type for decoding operations.
#[derive(Debug, Error)]
pub enum DecodingError {
    /// An I/O error happened when writing decoded data.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Code size out of bounds. It should be between 1 and 8 included.
    #[error("Code size must be between 1 and 8, was {0}.")]
    CodeSize(u8),
    /// A code that the table can't resolve.
    ///
    /// Either it points past the next entry to be added, or it is the next entry to be
    /// added but no previous code exists to build it from.
    #[error("Invalid code {code}, the next available code was {next}.")]
    InvalidCode { code: u16, next: u16 },
    /// The compressed data ended before a stop code was read.
    #[error("Compressed data ended before the stop code.")]
    UnexpectedEndOfData,
}

/// Range of a word in the table's string buffer.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Word {
    start: usize,
    end: usize,
}

impl Word {
    #[inline(always)]
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// LZW code table. Idea: have one big vec of u8 holding the strings, and keep a vec of
/// `[start, end)` ranges for each word.
struct CodeTable<'a> {
    code_size: u8,
    read_size: u8,
    strings: &'a mut Vec<u8>,
    words: &'a mut Vec<Word>,
}

impl<'a> CodeTable<'a> {
    fn new(code_size: u8, buffers: &'a mut TableBuffers) -> Self {
        let mut table = Self {
            code_size,
            read_size: code_size + 1,
            strings: &mut buffers.strings,
            words: &mut buffers.words,
        };
        table.reset();
        table
    }

    #[inline(always)]
    fn clear_code(&self) -> u16 {
        1 << self.code_size
    }

    #[inline(always)]
    fn stop_code(&self) -> u16 {
        (1 << self.code_size) + 1
    }

    /// Back to the single byte words, plus the clear and stop codes.
    fn reset(&mut self) {
        let root_count = 1usize << self.code_size;

        self.strings.clear();
        self.strings.extend((0..root_count).map(|k| k as u8));

        self.words.clear();
        self.words
            .extend((0..root_count).map(|k| Word { start: k, end: k + 1 }));
        self.words.push(Word::default());
        self.words.push(Word::default());

        self.read_size = self.code_size + 1;
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.words.len()
    }

    #[inline(always)]
    fn word(&self, code: u16) -> &[u8] {
        let word = self.words[code as usize];
        &self.strings[word.start..word.end]
    }

    #[inline(always)]
    fn first_byte(&self, code: u16) -> u8 {
        self.strings[self.words[code as usize].start]
    }

    /// Adds the word `prefix + k`. Once the table is full, nothing is added and the read
    /// size stays where it is.
    #[inline(always)]
    fn add(&mut self, prefix: u16, k: u8) {
        if self.words.len() >= MAX_TABLE_SIZE {
            return;
        }

        let prefix_word = self.words[prefix as usize];
        let new_word = if prefix_word.end == self.strings.len() {
            // The prefix sits at the end of the buffer, extend it in place.
            self.strings.push(k);
            Word {
                start: prefix_word.start,
                end: prefix_word.end + 1,
            }
        } else {
            let start = self.strings.len();
            self.strings.reserve(prefix_word.len() + 1);
            self.strings
                .extend_from_within(prefix_word.start..prefix_word.end);
            self.strings.push(k);
            Word {
                start,
                end: self.strings.len(),
            }
        };
        self.words.push(new_word);

        if self.words.len().is_power_of_two() && self.read_size < MAX_CODE_SIZE {
            self.read_size += 1;
        }
    }
}

/// LZW decoder for GIF image data: least significant bit first, variable code size.
pub struct GifStyleDecoder;

impl GifStyleDecoder {
    /// Decode GIF flavoured LZW.
    ///
    /// # Arguments
    ///
    /// * `data` - The compressed data, sub-block length prefixes already removed.
    /// * `into` - The output where decompressed data should be written.
    /// * `code_size` - Between 1 and 8, the minimum code size stored in front of the
    ///   image data. The initial read size will be equal to code size + 1.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error] from `into`, on an invalid code size,
    /// on a code the table can't resolve, or if `data` ends before the stop code.
    ///
    /// # Examples
    /// ```
    /// use gif_lzw::decoder::{DecodingError, GifStyleDecoder};
    ///
    /// fn main() -> Result<(), DecodingError> {
    ///     let data = [0x04, 0x32, 0x05];
    ///     let mut output = vec![];
    ///
    ///     GifStyleDecoder::decode(&data[..], &mut output, 2)?;
    ///
    ///     assert_eq!(output, [0, 0, 1, 3]);
    ///     Ok(())
    /// }
    /// ```
    pub fn decode<W: Write>(data: &[u8], into: W, code_size: u8) -> Result<(), DecodingError> {
        let mut buffers = TableBuffers::default();
        Self::inner_decode(data, WriteOutput(into), code_size, &mut buffers)?;
        Ok(())
    }

    /// Decode GIF flavoured LZW into a new vec. See [GifStyleDecoder::decode].
    pub fn decode_to_vec(data: &[u8], code_size: u8) -> Result<Vec<u8>, DecodingError> {
        let mut output = vec![];
        Self::decode(data, &mut output, code_size)?;
        Ok(output)
    }

    /// Same as [GifStyleDecoder::decode], but the code table storage is borrowed from `pool`
    /// and given back once done, error or not.
    pub fn decode_with_pool<W: Write>(
        data: &[u8],
        into: W,
        code_size: u8,
        pool: &TablePool,
    ) -> Result<(), DecodingError> {
        let mut buffers = pool.acquire();
        Self::inner_decode(data, WriteOutput(into), code_size, &mut buffers)?;
        Ok(())
    }

    /// Decode GIF flavoured LZW into a fixed size buffer.
    ///
    /// Decoding stops at the stop code, or as soon as `into` is full, whichever comes first.
    /// A full buffer is not an error: the rest of the code stream is never read.
    ///
    /// Returns the number of bytes written to `into`.
    ///
    /// # Examples
    /// ```
    /// use gif_lzw::decoder::{DecodingError, GifStyleDecoder};
    ///
    /// fn main() -> Result<(), DecodingError> {
    ///     let data = [0x04, 0x32, 0x05];
    ///     let mut output = [0; 2];
    ///
    ///     let written = GifStyleDecoder::decode_to_slice(&data[..], &mut output, 2)?;
    ///
    ///     assert_eq!(written, 2);
    ///     assert_eq!(output, [0, 0]);
    ///     Ok(())
    /// }
    /// ```
    pub fn decode_to_slice(
        data: &[u8],
        into: &mut [u8],
        code_size: u8,
    ) -> Result<usize, DecodingError> {
        let mut buffers = TableBuffers::default();
        Self::inner_decode(data, SliceOutput::new(into), code_size, &mut buffers)
    }

    /// Same as [GifStyleDecoder::decode_to_slice], with the code table storage borrowed
    /// from `pool`.
    pub fn decode_to_slice_with_pool(
        data: &[u8],
        into: &mut [u8],
        code_size: u8,
        pool: &TablePool,
    ) -> Result<usize, DecodingError> {
        let mut buffers = pool.acquire();
        Self::inner_decode(data, SliceOutput::new(into), code_size, &mut buffers)
    }

    fn inner_decode<O: Output>(
        data: &[u8],
        mut into: O,
        code_size: u8,
        buffers: &mut TableBuffers,
    ) -> Result<usize, DecodingError> {
        if !(1..=8).contains(&code_size) {
            return Err(DecodingError::CodeSize(code_size));
        }

        let mut bit_reader = LittleEndianReader::new(data);
        let mut table = CodeTable::new(code_size, buffers);
        let clear_code = table.clear_code();
        let stop_code = table.stop_code();

        let mut previous: Option<u16> = None;

        while !into.is_full() {
            let code = bit_reader.read_one(table.read_size)?;

            if code == stop_code {
                break;
            } else if code == clear_code {
                trace!("Clear code after {} entries", table.len());
                table.reset();
                previous = None;
                continue;
            }

            let next = table.len() as u16;
            if code < next {
                into.put(table.word(code))?;
                if let Some(previous) = previous {
                    let k = table.first_byte(code);
                    table.add(previous, k);
                }
            } else if let (true, Some(previous)) = (code == next, previous) {
                let k = table.first_byte(previous);
                table.add(previous, k);
                into.put(table.word(code))?;
            } else {
                return Err(DecodingError::InvalidCode { code, next });
            }

            previous = Some(code);
        }

        into.finish()
    }
}

/// Where decoded words go.
trait Output {
    fn put(&mut self, word: &[u8]) -> Result<(), DecodingError>;

    /// Whether decoding should stop because nothing more can be taken.
    fn is_full(&self) -> bool;

    /// Flushes, and returns the number of bytes taken.
    fn finish(self) -> Result<usize, DecodingError>;
}

struct WriteOutput<W: Write>(W);

impl<W: Write> Output for WriteOutput<W> {
    #[inline(always)]
    fn put(&mut self, word: &[u8]) -> Result<(), DecodingError> {
        self.0.write_all(word)?;
        Ok(())
    }

    #[inline(always)]
    fn is_full(&self) -> bool {
        false
    }

    fn finish(mut self) -> Result<usize, DecodingError> {
        self.0.flush()?;
        Ok(0)
    }
}

/// Takes words until the slice is full, the overflowing part of the last word is dropped.
struct SliceOutput<'a> {
    buffer: &'a mut [u8],
    written: usize,
}

impl<'a> SliceOutput<'a> {
    fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, written: 0 }
    }
}

impl<'a> Output for SliceOutput<'a> {
    #[inline(always)]
    fn put(&mut self, word: &[u8]) -> Result<(), DecodingError> {
        let length = word.len().min(self.buffer.len() - self.written);
        self.buffer[self.written..self.written + length].copy_from_slice(&word[..length]);
        self.written += length;
        Ok(())
    }

    #[inline(always)]
    fn is_full(&self) -> bool {
        self.written == self.buffer.len()
    }

    fn finish(self) -> Result<usize, DecodingError> {
        Ok(self.written)
    }
}
