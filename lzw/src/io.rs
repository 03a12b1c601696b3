use crate::decoder::DecodingError;

pub trait BitReader {
    fn read_one(&mut self, amount: u8) -> Result<u16, DecodingError>;
}

/// Reads codes packed least significant bit first, as GIF does.
///
/// Bytes are pulled from the slice four at a time into a wide accumulator, so most reads
/// don't touch the slice at all.
pub struct LittleEndianReader<'a> {
    data: &'a [u8],
    position: usize,
    bit_buffer: u64,
    remaining_bits: u8,
}

impl<'a> LittleEndianReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            bit_buffer: 0,
            remaining_bits: 0,
        }
    }

    #[inline]
    fn refill(&mut self, amount: u8) -> Result<(), DecodingError> {
        let available = self.data.len() - self.position;
        if available == 0 {
            if self.remaining_bits == 0 {
                return Err(DecodingError::UnexpectedEndOfData);
            }
            // The last code is cut short: complete it with zero bits, once.
            self.remaining_bits = amount;
            return Ok(());
        }

        let take = available.min(4);
        let mut load = [0; 4];
        load[..take].copy_from_slice(&self.data[self.position..self.position + take]);

        self.bit_buffer |= (u32::from_le_bytes(load) as u64) << self.remaining_bits;
        self.position += take;
        self.remaining_bits += (take * 8) as u8;
        Ok(())
    }
}

impl<'a> BitReader for LittleEndianReader<'a> {
    #[inline]
    fn read_one(&mut self, amount: u8) -> Result<u16, DecodingError> {
        while self.remaining_bits < amount {
            self.refill(amount)?;
        }

        let mask = (1 << amount) - 1;
        let data = (self.bit_buffer & mask) as u16;
        self.bit_buffer >>= amount;
        self.remaining_bits -= amount;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_1_little_endian() -> Result<(), DecodingError> {
        let input = [0x01];

        let mut reader = LittleEndianReader::new(&input[..]);

        assert_eq!(1, reader.read_one(1)?);
        Ok(())
    }

    #[test]
    fn read_colors_little_endian() -> Result<(), DecodingError> {
        let input = [0x8C, 0x2D];

        let mut reader = LittleEndianReader::new(&input[..]);
        let mut output = vec![];

        output.push(reader.read_one(3)?);
        output.push(reader.read_one(3)?);
        output.push(reader.read_one(3)?);
        output.push(reader.read_one(3)?);
        output.push(reader.read_one(4)?);

        assert_eq!(output, [4, 1, 6, 6, 2]);
        Ok(())
    }

    #[test]
    fn read_12_bits_little_endian() -> Result<(), DecodingError> {
        let input = [0xff, 0x0f];

        let mut reader = LittleEndianReader::new(&input[..]);

        assert_eq!(reader.read_one(12)?, 0xfff);
        Ok(())
    }

    #[test]
    fn read_0xfffa_little_endian() -> Result<(), DecodingError> {
        let input = [0xfa, 0xff];

        let mut reader = LittleEndianReader::new(&input[..]);

        assert_eq!(reader.read_one(16)?, 0xfffa);
        Ok(())
    }

    #[test]
    fn read_across_loads() -> Result<(), DecodingError> {
        // Twelve bit codes 0x001, 0x002, ... 0x00a packed back to back: 15 bytes.
        let input = [
            0x01, 0x20, 0x00, 0x03, 0x40, 0x00, 0x05, 0x60, 0x00, 0x07, 0x80, 0x00, 0x09, 0xa0,
            0x00,
        ];

        let mut reader = LittleEndianReader::new(&input[..]);
        let mut output = vec![];
        for _ in 0..10 {
            output.push(reader.read_one(12)?);
        }

        assert_eq!(output, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        Ok(())
    }

    #[test]
    fn zero_fill_last_code() -> Result<(), DecodingError> {
        let input = [0x05];

        let mut reader = LittleEndianReader::new(&input[..]);

        assert_eq!(reader.read_one(3)?, 5);
        // Only 5 bits are left, the rest of the code reads as zeros.
        assert_eq!(reader.read_one(9)?, 0);

        Ok(())
    }

    #[test]
    fn fail_once_exhausted() {
        let input = [0x05];

        let mut reader = LittleEndianReader::new(&input[..]);

        assert!(reader.read_one(8).is_ok());
        assert!(matches!(
            reader.read_one(3),
            Err(DecodingError::UnexpectedEndOfData)
        ));
    }

    #[test]
    fn fail_after_zero_fill() {
        let input = [0x05];

        let mut reader = LittleEndianReader::new(&input[..]);

        assert!(reader.read_one(6).is_ok());
        assert!(reader.read_one(6).is_ok());
        assert!(matches!(
            reader.read_one(1),
            Err(DecodingError::UnexpectedEndOfData)
        ));
    }

    #[test]
    fn empty_input() {
        let mut reader = LittleEndianReader::new(&[]);

        assert!(matches!(
            reader.read_one(3),
            Err(DecodingError::UnexpectedEndOfData)
        ));
    }
}
