//! [Horizontal Metrics](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hmtx.html) table

use crate::{
    stream::{read_i16_at, read_u16_at, slice_at},
    ttf::TTFParseError,
};

use super::cmap::GlyphID;

#[derive(Clone, Debug, PartialEq)]
pub struct HMTXTable {
    long_hor_metrics: Vec<LongHorMetric>,

    /// Bearings for the glyphs that share the advance width of the last long metric
    left_side_bearings: Vec<i16>,

    /// Used for every glyph if the font stores no long metrics at all
    fallback_advance_width: u16,
}

impl HMTXTable {
    /// Decode the table
    ///
    /// `fallback_advance_width` is only used for fonts that declare zero
    /// long metrics, such fonts are treated as monospaced.
    pub fn new(
        data: &[u8],
        num_of_long_hor_metrics: usize,
        num_glyphs: usize,
        fallback_advance_width: u16,
    ) -> Result<Self, TTFParseError> {
        if num_glyphs < num_of_long_hor_metrics {
            return Err(TTFParseError::InvalidMetrics(
                "more horizontal metrics than glyphs",
            ));
        }

        let num_bearings = num_glyphs - num_of_long_hor_metrics;
        let required_size = num_of_long_hor_metrics * 4 + num_bearings * 2;
        let data = slice_at(data, 0, required_size)?;

        let long_hor_metrics = data[..num_of_long_hor_metrics * 4]
            .chunks_exact(4)
            .map(|metric_data| -> Result<_, TTFParseError> {
                Ok(LongHorMetric {
                    advance_width: read_u16_at(metric_data, 0)?,
                    left_side_bearing: read_i16_at(metric_data, 2)?,
                })
            })
            .collect::<Result<Vec<_>, TTFParseError>>()?;

        let left_side_bearings = data[num_of_long_hor_metrics * 4..]
            .chunks_exact(2)
            .map(|bearing| read_i16_at(bearing, 0))
            .collect::<Result<Vec<_>, TTFParseError>>()?;

        if long_hor_metrics.is_empty() && num_glyphs != 0 {
            log::debug!(
                "hmtx has no long metrics, using {fallback_advance_width} as the advance of every glyph"
            );
        }

        Ok(Self {
            long_hor_metrics,
            left_side_bearings,
            fallback_advance_width,
        })
    }

    /// The number of glyphs this table has metrics for
    #[inline]
    #[must_use]
    pub fn num_glyphs(&self) -> usize {
        self.long_hor_metrics.len() + self.left_side_bearings.len()
    }

    pub fn get_metric_for(&self, glyph_id: GlyphID) -> Result<LongHorMetric, TTFParseError> {
        let index = glyph_id.numeric() as usize;

        if let Some(metric) = self.long_hor_metrics.get(index) {
            return Ok(*metric);
        }

        let left_side_bearing = self
            .left_side_bearings
            .get(index - self.long_hor_metrics.len())
            .copied()
            .ok_or(TTFParseError::GlyphIndexOutOfRange {
                index,
                num_glyphs: self.num_glyphs(),
            })?;

        let advance_width = self
            .long_hor_metrics
            .last()
            .map(LongHorMetric::advance_width)
            .unwrap_or(self.fallback_advance_width);

        Ok(LongHorMetric {
            advance_width,
            left_side_bearing,
        })
    }

    /// The horizontal distance the pen moves after drawing the glyph, in `FUnits`
    #[inline]
    pub fn advance_width(&self, glyph_id: GlyphID) -> Result<u16, TTFParseError> {
        self.get_metric_for(glyph_id)
            .map(|metric| metric.advance_width())
    }

    #[inline]
    pub fn left_side_bearing(&self, glyph_id: GlyphID) -> Result<i16, TTFParseError> {
        self.get_metric_for(glyph_id)
            .map(|metric| metric.left_side_bearing())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LongHorMetric {
    advance_width: u16,
    left_side_bearing: i16,
}

impl LongHorMetric {
    #[inline]
    #[must_use]
    pub fn advance_width(&self) -> u16 {
        self.advance_width
    }

    #[inline]
    #[must_use]
    pub fn left_side_bearing(&self) -> i16 {
        self.left_side_bearing
    }
}
