// palette.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Color table planning
use crate::error::{Error, Result};
use pix::rgb::{Rgb, SRgb8};

/// Number of channels in a color table entry
const CHANNELS: usize = 3;

/// Maximum number of colors in a color table
const MAX_COLORS: usize = 256;

/// Planned global color table.
///
/// The palette is padded with black up to the next power of two, which is
/// the only table size a GIF color table can declare.
///
/// ```
/// use flipbook::palette::Plan;
/// use pix::rgb::SRgb8;
///
/// let colors = [
///     SRgb8::new(0xFF, 0xFF, 0xFF),
///     SRgb8::new(0xFF, 0x00, 0x00),
///     SRgb8::new(0x00, 0x00, 0xFF),
/// ];
/// let plan = Plan::new(&colors).unwrap();
/// assert_eq!(plan.bit_depth(), 2);
/// assert_eq!(plan.len(), 4);
/// assert_eq!(plan.colors()[3], SRgb8::new(0, 0, 0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// Color table bit depth (1-8)
    bit_depth: u8,
    /// Padded colors
    colors: Vec<SRgb8>,
}

impl Plan {
    /// Plan a color table for a palette.
    ///
    /// Fails with `InvalidPalette` for an empty palette, or one with more
    /// than 256 colors.
    pub fn new(colors: &[SRgb8]) -> Result<Self> {
        if colors.is_empty() || colors.len() > MAX_COLORS {
            return Err(Error::InvalidPalette);
        }
        // a one-color table still needs one bit
        let len = colors.len().max(2).next_power_of_two();
        let bit_depth = len.trailing_zeros() as u8;
        let mut padded = Vec::with_capacity(len);
        padded.extend_from_slice(colors);
        padded.resize(len, SRgb8::new(0, 0, 0));
        debug!(
            "color table: {} colors padded to {}, {} bits",
            colors.len(),
            len,
            bit_depth
        );
        Ok(Plan {
            bit_depth,
            colors: padded,
        })
    }

    /// Get the color table bit depth.
    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// Get the padded colors.
    pub fn colors(&self) -> &[SRgb8] {
        &self.colors
    }

    /// Get the number of entries in the padded table (always `2^bit_depth`).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// LZW minimum code size for image data.
    ///
    /// GIF decoders require at least 2, so one-bit tables are compressed as
    /// if they had two bits.
    pub fn min_code_size(&self) -> u8 {
        self.bit_depth.max(2)
    }

    /// Get the LZW clear code
    pub fn clear_code(&self) -> u16 {
        1 << self.min_code_size()
    }

    /// Get the LZW end code
    pub fn end_code(&self) -> u16 {
        self.clear_code() + 1
    }

    /// Serialize the padded table as consecutive RGB triples.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.colors.len() * CHANNELS);
        for clr in &self.colors {
            bytes.push(u8::from(Rgb::red(*clr)));
            bytes.push(u8::from(Rgb::green(*clr)));
            bytes.push(u8::from(Rgb::blue(*clr)));
        }
        bytes
    }
}
