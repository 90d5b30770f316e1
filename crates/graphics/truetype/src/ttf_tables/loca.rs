//! [Loca](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6loca.html) table implementation
//!
//! Stores where each glyph's data starts inside the [glyf](super::glyf) table.

use std::ops::Range;

use super::{cmap::GlyphID, head::LocaTableFormat};
use crate::{
    stream::{read_u16_at, read_u32_at, slice_at},
    ttf::TTFParseError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaTable {
    /// `num_glyphs + 1` offsets, glyph `i` spans `offsets[i]..offsets[i + 1]`
    offsets: Vec<u32>,
}

impl LocaTable {
    pub fn new(
        data: &[u8],
        format: LocaTableFormat,
        num_glyphs: usize,
    ) -> Result<Self, TTFParseError> {
        let num_entries = num_glyphs + 1;
        let entry_size = Self::entry_size(format);
        let data = slice_at(data, 0, num_entries * entry_size)?;

        let offsets = data
            .chunks_exact(entry_size)
            .map(|entry| match format {
                LocaTableFormat::Short => read_u16_at(entry, 0).map(|offset| u32::from(offset) * 2),
                LocaTableFormat::Long => read_u32_at(entry, 0),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { offsets })
    }

    /// The number of glyphs a table of the given size can describe
    ///
    /// Used when the font does not say how many glyphs it contains.
    #[must_use]
    pub fn num_glyphs_in(data: &[u8], format: LocaTableFormat) -> usize {
        (data.len() / Self::entry_size(format)).saturating_sub(1)
    }

    #[inline]
    #[must_use]
    fn entry_size(format: LocaTableFormat) -> usize {
        match format {
            LocaTableFormat::Short => 2,
            LocaTableFormat::Long => 4,
        }
    }

    #[inline]
    #[must_use]
    pub fn num_glyphs(&self) -> usize {
        self.offsets.len() - 1
    }

    /// The byte range of a glyph within the glyf table
    ///
    /// Returns `None` if the glyph does not exist. The range is not
    /// validated against the glyf table.
    #[must_use]
    pub fn get_glyph_range(&self, glyph_id: GlyphID) -> Option<Range<usize>> {
        let index = glyph_id.numeric() as usize;
        let start = *self.offsets.get(index)? as usize;
        let end = *self.offsets.get(index + 1)? as usize;
        Some(start..end)
    }
}
