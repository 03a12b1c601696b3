//! Builds GIF files byte by byte.

#![allow(dead_code)]

use weezl::{encode::Encoder, BitOrder};

pub struct GifBuilder {
    data: Vec<u8>,
}

impl GifBuilder {
    pub fn new(version: &str, width: u16, height: u16) -> Self {
        let mut data = b"GIF".to_vec();
        data.extend_from_slice(version.as_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[0x00, 0x00, 0x00]);
        Self { data }
    }

    /// Sets the global color table flag and size, then appends the table.
    pub fn global_color_table(mut self, colors: &[[u8; 3]]) -> Self {
        self.data[10] = 0x80 | table_size_bits(colors.len());
        for color in colors {
            self.data.extend_from_slice(color);
        }
        self
    }

    pub fn graphic_control(mut self, disposal: u8, delay: u16, transparency: Option<u8>) -> Self {
        let packed = (disposal << 2) | transparency.is_some() as u8;
        self.data.extend_from_slice(&[0x21, 0xF9, 0x04, packed]);
        self.data.extend_from_slice(&delay.to_le_bytes());
        self.data.push(transparency.unwrap_or(0));
        self.data.push(0x00);
        self
    }

    pub fn comment(mut self, text: &str) -> Self {
        self.data.extend_from_slice(&[0x21, 0xFE]);
        self.data.extend_from_slice(&sub_blocks(text.as_bytes()));
        self
    }

    pub fn netscape(mut self, repeat_count: u16) -> Self {
        self.data.extend_from_slice(&[0x21, 0xFF, 0x0B]);
        self.data.extend_from_slice(b"NETSCAPE2.0");
        let [low, high] = repeat_count.to_le_bytes();
        self.data.extend_from_slice(&sub_blocks(&[0x01, low, high]));
        self
    }

    pub fn plain_text(mut self, text: &str) -> Self {
        self.data.extend_from_slice(&[0x21, 0x01, 0x0C]);
        self.data.extend_from_slice(&[0, 0, 0, 0, 0x40, 0, 0x10, 0, 0x08, 0x10, 0x01, 0x00]);
        self.data.extend_from_slice(&sub_blocks(text.as_bytes()));
        self
    }

    /// A frame covering `width` x `height`, compressed with `weezl` at code size 8.
    pub fn frame(self, width: u16, height: u16, pixels: &[u8]) -> Self {
        self.frame_with(width, height, 0x00, 8, &encode(pixels, 8))
    }

    pub fn frame_with(
        mut self,
        width: u16,
        height: u16,
        packed: u8,
        code_size: u8,
        compressed: &[u8],
    ) -> Self {
        self.data.extend_from_slice(&[0x2C, 0x00, 0x00, 0x00, 0x00]);
        self.data.extend_from_slice(&width.to_le_bytes());
        self.data.extend_from_slice(&height.to_le_bytes());
        self.data.push(packed);
        self.data.push(code_size);
        self.data.extend_from_slice(&sub_blocks(compressed));
        self
    }

    pub fn frame_with_local_table(
        mut self,
        width: u16,
        height: u16,
        colors: &[[u8; 3]],
        pixels: &[u8],
    ) -> Self {
        self.data.extend_from_slice(&[0x2C, 0x00, 0x00, 0x00, 0x00]);
        self.data.extend_from_slice(&width.to_le_bytes());
        self.data.extend_from_slice(&height.to_le_bytes());
        self.data.push(0x80 | table_size_bits(colors.len()));
        for color in colors {
            self.data.extend_from_slice(color);
        }
        self.data.push(8);
        self.data.extend_from_slice(&sub_blocks(&encode(pixels, 8)));
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn trailer(self) -> Vec<u8> {
        self.raw(&[0x3B]).data
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

pub fn encode(pixels: &[u8], code_size: u8) -> Vec<u8> {
    Encoder::new(BitOrder::Lsb, code_size)
        .encode(pixels)
        .expect("weezl encoding")
}

pub fn sub_blocks(data: &[u8]) -> Vec<u8> {
    let mut blocks = vec![];
    for chunk in data.chunks(255) {
        blocks.push(chunk.len() as u8);
        blocks.extend_from_slice(chunk);
    }
    blocks.push(0);
    blocks
}

fn table_size_bits(entries: usize) -> u8 {
    (entries.max(2).next_power_of_two().trailing_zeros() - 1) as u8
}
