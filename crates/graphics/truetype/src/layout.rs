//! Positioning glyph outlines along a baseline

use crate::{
    path::{Path, PathSegment},
    ttf::{Font, TTFParseError},
    ttf_tables::cmap::EncodingTable,
};
use math::{AffineTransform, Vec2D};

/// The outline of a string, together with the state of the pen afterwards
#[derive(Clone, Debug, PartialEq)]
pub struct LaidOutText {
    pub path: Path,

    /// The transform that would be applied to a glyph following the text.
    ///
    /// Its translation is the pen position after the last glyph.
    pub transform: AffineTransform,
}

/// The transform that places the origin of the first glyph at `position`
///
/// Font units are scaled so that `ascent` maps to `font_size` pixels and the
/// y-axis is flipped, since font coordinates grow upwards.
#[must_use]
pub fn text_transform(position: Vec2D, font_size: f32, ascent: f32) -> AffineTransform {
    let scale = font_size / ascent;

    AffineTransform::translate(Vec2D::new(0., ascent))
        .chain(AffineTransform::scale(scale, -scale))
        .chain(AffineTransform::translate(Vec2D::new(
            position.x,
            position.y + font_size,
        )))
}

impl Font {
    /// Lay out `text` on a single line, starting with `transform`
    ///
    /// Glyphs are looked up in `encoding`, which is usually one of the font's own
    /// [encoding tables](crate::ttf_tables::cmap::CMAPTable::encoding_table).
    /// Characters the encoding does not cover are drawn with the notdef glyph.
    ///
    /// Either the whole text is laid out or an error is returned, there are no partial results.
    pub fn layout(
        &self,
        text: &str,
        encoding: &EncodingTable,
        mut transform: AffineTransform,
    ) -> Result<LaidOutText, TTFParseError> {
        let format = encoding.format().ok_or_else(|| {
            let (platform, encoding) = encoding.raw_ids();
            TTFParseError::UnsupportedCMapFormat { platform, encoding }
        })?;

        let glyph_table = self.glyph_table();
        let metrics = self.horizontal_metrics_table();
        let mut segments: Vec<PathSegment> = vec![];

        for c in text.chars() {
            let glyph_id = format.glyph_index(c as u32);
            log::trace!("Laying out {c:?} using glyph {glyph_id}");

            let outline = glyph_table.get_glyph(glyph_id)?;
            outline.append_to(&mut segments, transform);

            let advance_width = metrics.advance_width(glyph_id)?;
            transform = AffineTransform::translate(Vec2D::new(f32::from(advance_width), 0.))
                .chain(transform);
        }

        Ok(LaidOutText {
            path: Path::new(segments),
            transform,
        })
    }

    /// Lay out `text` at `font_size` pixels, see [text_transform]
    pub fn layout_at(
        &self,
        text: &str,
        encoding: &EncodingTable,
        position: Vec2D,
        font_size: f32,
    ) -> Result<LaidOutText, TTFParseError> {
        let ascent = f32::from(self.horizontal_header_table().ascent());
        self.layout(text, encoding, text_transform(position, font_size, ascent))
    }
}
