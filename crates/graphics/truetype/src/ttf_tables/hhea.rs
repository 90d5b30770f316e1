//! [Horizontal Header](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hhea.html) Table
//!
//! Holds the vertical metrics used to position lines of text and the
//! record count for the [hmtx](super::hmtx) table.

use crate::{
    stream::{Fixed, Stream},
    ttf::TTFParseError,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HHEATable {
    version: Fixed,
    ascent: i16,

    /// Stored as a negative number for glyphs that extend below the baseline
    descent: i16,
    line_gap: i16,
    max_advance_width: u16,
    min_left_side_bearing: i16,
    min_right_side_bearing: i16,
    x_max_extent: i16,
    caret_slope_rise: i16,
    caret_slope_run: i16,
    num_of_long_hor_metrics: u16,
}

impl HHEATable {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new(data);

        let version: Fixed = stream.read()?;
        let ascent: i16 = stream.read()?;
        let descent: i16 = stream.read()?;
        let line_gap: i16 = stream.read()?;
        let max_advance_width: u16 = stream.read()?;
        let min_left_side_bearing: i16 = stream.read()?;
        let min_right_side_bearing: i16 = stream.read()?;
        let x_max_extent: i16 = stream.read()?;
        let caret_slope_rise: i16 = stream.read()?;
        let caret_slope_run: i16 = stream.read()?;

        // caretOffset, four reserved fields and metricDataFormat
        stream.skip_bytes(12);
        let num_of_long_hor_metrics: u16 = stream.read()?;

        // Glyphs are scaled by font_size / ascent
        if ascent == 0 {
            return Err(TTFParseError::InvalidMetrics("ascent must not be zero"));
        }

        Ok(Self {
            version,
            ascent,
            descent,
            line_gap,
            max_advance_width,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            num_of_long_hor_metrics,
        })
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> Fixed {
        self.version
    }

    /// Distance from the baseline to the highest ascender, in `FUnits`
    #[inline]
    #[must_use]
    pub fn ascent(&self) -> i16 {
        self.ascent
    }

    /// Distance from the baseline to the lowest descender, in `FUnits`.
    ///
    /// This is the *magnitude* of the stored value: a font that stores
    /// `-200` reports `200` here. Use [raw_descent](Self::raw_descent) for the
    /// value as it appears in the font.
    #[inline]
    #[must_use]
    pub fn descent(&self) -> i32 {
        -i32::from(self.descent)
    }

    #[inline]
    #[must_use]
    pub fn raw_descent(&self) -> i16 {
        self.descent
    }

    #[inline]
    #[must_use]
    pub fn line_gap(&self) -> i16 {
        self.line_gap
    }

    #[inline]
    #[must_use]
    pub fn max_advance_width(&self) -> u16 {
        self.max_advance_width
    }

    #[inline]
    #[must_use]
    pub fn min_left_side_bearing(&self) -> i16 {
        self.min_left_side_bearing
    }

    #[inline]
    #[must_use]
    pub fn min_right_side_bearing(&self) -> i16 {
        self.min_right_side_bearing
    }

    #[inline]
    #[must_use]
    pub fn x_max_extent(&self) -> i16 {
        self.x_max_extent
    }

    /// Slope of the cursor as `(rise, run)`, `(1, 0)` for upright text
    #[inline]
    #[must_use]
    pub fn caret_slope(&self) -> (i16, i16) {
        (self.caret_slope_rise, self.caret_slope_run)
    }

    #[inline]
    #[must_use]
    pub fn num_of_long_hor_metrics(&self) -> usize {
        self.num_of_long_hor_metrics as usize
    }
}
