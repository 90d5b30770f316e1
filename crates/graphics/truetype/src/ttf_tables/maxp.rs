//! [MaxP](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6maxp.html) table implementation.

use crate::{
    stream::{read_fixed_at, read_u16_at, Fixed},
    ttf::TTFParseError,
};

#[derive(Clone, Copy, Debug)]
pub struct MaxPTable {
    /// `0.5` for fonts with CFF outlines, `1.0` for TrueType outlines
    pub version: Fixed,

    /// Number of glyphs defined in the font
    pub num_glyphs: u16,
}

impl MaxPTable {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        Ok(Self {
            version: read_fixed_at(data, 0)?,
            num_glyphs: read_u16_at(data, 4)?,
        })
    }
}
