// pack.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Bit packing of LZW codes into image data sub-blocks
//!
//! Codes are packed LSB-first: each code fills the least significant free
//! bits of the stream, and bytes are emitted as soon as they fill up.
use crate::lzw::CodeWord;

/// Maximum length of a data sub-block
pub const MAX_SUB_BLOCK: usize = 0xFF;

/// LSB-first bit writer
#[derive(Debug, Default)]
struct BitWriter {
    /// Packed bytes
    buf: Vec<u8>,
    /// Pending bits
    code: u32,
    /// Number of pending bits
    n_bits: u8,
}

impl BitWriter {
    /// Create a new bit writer
    fn with_capacity(capacity: usize) -> Self {
        BitWriter {
            buf: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Pack one code into the buffer
    fn pack(&mut self, word: CodeWord) {
        self.code |= u32::from(word.code) << self.n_bits;
        self.n_bits += word.bits();
        while self.n_bits >= 8 {
            self.buf.push(self.code as u8);
            self.code >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Flush the final partial byte (zero padded)
    fn finish(mut self) -> Vec<u8> {
        if self.n_bits > 0 {
            self.buf.push(self.code as u8);
        }
        self.buf
    }
}

/// Pack codes into a contiguous byte stream
pub fn pack_codes(words: &[CodeWord]) -> Vec<u8> {
    let bits: usize = words.iter().map(|w| usize::from(w.bits())).sum();
    let mut bw = BitWriter::with_capacity((bits + 7) / 8);
    for word in words {
        bw.pack(*word);
    }
    bw.finish()
}

/// Split bytes into length-prefixed sub-blocks, with a zero-length
/// terminator.
pub fn sub_blocks(bytes: &[u8]) -> Vec<u8> {
    let n_blocks = (bytes.len() + MAX_SUB_BLOCK - 1) / MAX_SUB_BLOCK;
    let mut buf = Vec::with_capacity(bytes.len() + n_blocks + 1);
    for chunk in bytes.chunks(MAX_SUB_BLOCK) {
        buf.push(chunk.len() as u8); // block size
        buf.extend_from_slice(chunk);
    }
    buf.push(0); // block size
    buf
}

/// Pack codes into a complete image data section.
///
/// The section starts with the LZW minimum code size, followed by the
/// packed codes in sub-blocks.
///
/// ```
/// use flipbook::lzw::Compressor;
/// use flipbook::pack::pack;
///
/// let words = Compressor::new(2).compress(&[1, 1, 1, 1]).unwrap();
/// assert_eq!(pack(&words, 2), [0x02, 0x02, 0x8C, 0x53, 0x00]);
/// ```
pub fn pack(words: &[CodeWord], min_code_size: u8) -> Vec<u8> {
    let packed = pack_codes(words);
    let mut buf = Vec::with_capacity(packed.len() + packed.len() / 255 + 3);
    buf.push(min_code_size);
    buf.extend(sub_blocks(&packed));
    buf
}

/// Join sub-blocks back into contiguous bytes, checking the block structure
#[cfg(test)]
pub(crate) fn unblock(mut data: &[u8]) -> Vec<u8> {
    let mut bytes = vec![];
    loop {
        let len = usize::from(data[0]);
        if len == 0 {
            assert_eq!(data.len(), 1, "data after terminator");
            return bytes;
        }
        bytes.extend_from_slice(&data[1..=len]);
        data = &data[len + 1..];
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lzw::{Compressor, Decompressor};

    fn word(code: u16, table_len: u16) -> CodeWord {
        CodeWord { code, table_len }
    }

    #[test]
    fn lsb_first() {
        // 3 bit codes: 4, 1, 6 => 100, 001, 110
        let words = [word(4, 6), word(1, 6), word(6, 7)];
        assert_eq!(pack_codes(&words), [0b1000_1100, 0b0000_0001]);
    }

    #[test]
    fn width_growth() {
        // 8 => 3 bits, 9 => 4 bits
        let words = [word(7, 8), word(15, 9)];
        assert_eq!(pack_codes(&words), [0b0111_1111]);
        let words = [word(7, 8), word(15, 9), word(2, 9)];
        assert_eq!(pack_codes(&words), [0b0111_1111, 0b0000_0001]);
    }

    #[test]
    fn runs() {
        let words = Compressor::new(2)
            .compress(&[1, 1, 1, 1, 1, 2, 2, 2, 2, 2])
            .unwrap();
        let data = pack(&words, 2);
        assert_eq!(data, [0x02, 0x04, 0x8C, 0x2D, 0x99, 0x05, 0x00]);
        let out = Decompressor::new(2).decompress(&unblock(&data[1..]));
        assert_eq!(out, [1, 1, 1, 1, 1, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn sub_block_sizes() {
        for n in [0, 1, 254, 255, 256, 510, 1000] {
            let bytes: Vec<u8> = (0..n).map(|i| i as u8).collect();
            let blocks = sub_blocks(&bytes);
            assert_eq!(*blocks.last().unwrap(), 0);
            assert_eq!(blocks.len(), n + (n + 254) / 255 + 1);
            assert_eq!(unblock(&blocks), bytes);
            let mut rest = &blocks[..];
            while rest[0] != 0 {
                let len = usize::from(rest[0]);
                assert!(len <= MAX_SUB_BLOCK);
                rest = &rest[len + 1..];
            }
            assert_eq!(rest, [0]);
        }
    }

    #[test]
    fn large_image_data() {
        let data: Vec<u8> = (0..40_000u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
            .collect();
        let words = Compressor::new(8).compress(&data).unwrap();
        let section = pack(&words, 8);
        assert_eq!(section[0], 8);
        let packed = unblock(&section[1..]);
        assert!(packed.len() > MAX_SUB_BLOCK * 4);
        assert_eq!(Decompressor::new(8).decompress(&packed), data);
    }
}
