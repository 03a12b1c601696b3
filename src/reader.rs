use crate::{blocks::GifColor, error::GifError};

/// Sequential cursor over a GIF held in memory. GIF is a little endian format.
pub(crate) struct ByteReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// A reader starting at `position`, which may be past the end: reads will then fail.
    pub fn at(buffer: &'a [u8], position: usize) -> Self {
        Self { buffer, position }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    #[inline]
    fn ensure_can_read(&self, length: usize) -> Result<(), GifError> {
        if length > self.remaining() {
            return Err(GifError::TruncatedBuffer {
                offset: self.position,
                requested: length,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_byte(&mut self) -> Result<u8, GifError> {
        self.ensure_can_read(1)?;
        let byte = self.buffer[self.position];
        self.position += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], GifError> {
        self.ensure_can_read(count)?;
        let bytes = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, GifError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_string(&mut self, length: usize) -> Result<String, GifError> {
        self.read_bytes(length).map(ascii_string)
    }

    pub fn read_color(&mut self) -> Result<GifColor, GifError> {
        let bytes = self.read_bytes(3)?;
        Ok(GifColor::new(bytes[0], bytes[1], bytes[2]))
    }

    pub fn read_color_table(&mut self, size: usize) -> Result<Vec<GifColor>, GifError> {
        // Checked up front so a bogus size can't trigger a large allocation.
        self.ensure_can_read(size * 3)?;
        (0..size).map(|_| self.read_color()).collect()
    }

    /// Walks data sub-blocks up to and including the zero length terminator, handing each
    /// payload to `visit`.
    fn walk_data_blocks<F: FnMut(&'a [u8])>(&mut self, mut visit: F) -> Result<(), GifError> {
        loop {
            let length = self.read_byte()? as usize;
            if length == 0 {
                return Ok(());
            }
            visit(self.read_bytes(length)?);
        }
    }

    pub fn skip_data_blocks(&mut self) -> Result<(), GifError> {
        self.walk_data_blocks(|_| {})
    }

    /// Appends the payload of every sub-block to `destination`.
    pub fn read_data_blocks_into(&mut self, destination: &mut Vec<u8>) -> Result<(), GifError> {
        self.walk_data_blocks(|payload| destination.extend_from_slice(payload))
    }

    pub fn read_data_blocks(&mut self) -> Result<Vec<u8>, GifError> {
        let mut data = vec![];
        self.read_data_blocks_into(&mut data)?;
        Ok(data)
    }

    pub fn read_string_from_data_blocks(&mut self) -> Result<String, GifError> {
        let mut text = String::new();
        self.walk_data_blocks(|payload| text.extend(payload.iter().map(|&byte| ascii_char(byte))))?;
        Ok(text)
    }
}

/// GIF text is ASCII. Anything else shows up as a replacement character.
fn ascii_char(byte: u8) -> char {
    if byte.is_ascii() {
        byte as char
    } else {
        char::REPLACEMENT_CHARACTER
    }
}

pub(crate) fn ascii_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| ascii_char(byte)).collect()
}
