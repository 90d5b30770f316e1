//! [Glyph](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6glyf.html) table implementation

use super::{cmap::GlyphID, loca::LocaTable};
use crate::{
    path::{self, Path, PathSegment},
    stream::Stream,
    ttf::TTFParseError,
};

use math::{AffineTransform, Vec2D};

/// A view into the glyf table, combined with the [LocaTable] that indexes it
#[derive(Clone, Copy, Debug)]
pub struct GlyphTable<'a> {
    data: &'a [u8],
    loca_table: &'a LocaTable,
}

impl<'a> GlyphTable<'a> {
    pub fn new(data: &'a [u8], loca_table: &'a LocaTable) -> Self {
        Self { data, loca_table }
    }

    /// Get the total number of glyphs defined in the font
    #[inline]
    #[must_use]
    pub fn num_glyphs(&self) -> usize {
        self.loca_table.num_glyphs()
    }

    pub fn get_glyph(&self, glyph_id: GlyphID) -> Result<GlyphOutline, TTFParseError> {
        let range = self.loca_table.get_glyph_range(glyph_id).ok_or(
            TTFParseError::GlyphIndexOutOfRange {
                index: glyph_id.numeric() as usize,
                num_glyphs: self.num_glyphs(),
            },
        )?;

        if range.start > range.end {
            log::warn!("Glyph {glyph_id} has a reversed loca range {range:?}");
            return Err(TTFParseError::TruncatedData);
        }

        // Glyphs without outlines (like the space character) have no data at all
        if range.is_empty() {
            log::trace!("Glyph {glyph_id} has no outline data");
            return Ok(GlyphOutline::default());
        }

        let data = self.data.get(range).ok_or(TTFParseError::TruncatedData)?;
        GlyphOutline::from_data(data)
    }
}

/// The bounding box that the glyph header declares, in `FUnits`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub min_x: i16,
    pub min_y: i16,
    pub max_x: i16,
    pub max_y: i16,
}

impl Metrics {
    #[must_use]
    pub fn width(&self) -> i32 {
        i32::from(self.max_x) - i32::from(self.min_x)
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        i32::from(self.max_y) - i32::from(self.min_y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphPoint {
    pub is_on_curve: bool,
    pub coordinates: Vec2D<i16>,
}

/// A closed loop of points, the last point connects back to the first one
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contour {
    points: Vec<GlyphPoint>,
}

impl Contour {
    #[must_use]
    pub fn new(points: Vec<GlyphPoint>) -> Self {
        Self { points }
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[GlyphPoint] {
        &self.points
    }
}

/// The decoded outline of a simple glyph
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphOutline {
    metrics: Metrics,
    contours: Vec<Contour>,
}

impl GlyphOutline {
    pub fn from_data(data: &[u8]) -> Result<Self, TTFParseError> {
        // Memory map is like this (same for simple & compound glyphs):
        // num contours          : i16
        // min x                 : i16
        // min y                 : i16
        // max x                 : i16
        // max y                 : i16
        let mut stream = Stream::new(data);
        let num_contours: i16 = stream.read()?;
        let metrics = Metrics {
            min_x: stream.read()?,
            min_y: stream.read()?,
            max_x: stream.read()?,
            max_y: stream.read()?,
        };

        // Compound glyphs reference other glyphs and are marked by a negative contour count
        if num_contours.is_negative() {
            log::debug!("Refusing to decode compound glyph");
            return Err(TTFParseError::UnsupportedGlyphFormat);
        }

        // Simple glyphs are structured as follows:
        //
        // end points of contours: [u16; num contours]
        // instruction length    : u16
        // instructions          : [u8; instruction length]
        // flags                 : [u8; unknown]
        // x coords              : [u8 or i16; last value in "end points of contours" + 1]
        // y coords              : [u8 or i16; last value in "end points of contours" + 1]
        let num_contours = num_contours as usize;
        let mut end_points_of_contours = Vec::with_capacity(num_contours);
        for _ in 0..num_contours {
            let end_point = stream.read::<u16>()? as usize;

            if end_points_of_contours
                .last()
                .is_some_and(|&previous| end_point <= previous)
            {
                log::warn!("Contour end points are not strictly increasing");
                return Err(TTFParseError::UnsupportedGlyphFormat);
            }
            end_points_of_contours.push(end_point);
        }

        let Some(&last_end_point) = end_points_of_contours.last() else {
            return Ok(Self {
                metrics,
                contours: vec![],
            });
        };
        let num_points = last_end_point + 1;

        // Hinting is not supported, skip the instructions
        let instruction_length = stream.read::<u16>()? as usize;
        stream.skip_bytes(instruction_length);

        let flags = read_flags(&mut stream, num_points)?;
        let x_coordinates = read_coordinates(&mut stream, &flags, Axis::X)?;
        let y_coordinates = read_coordinates(&mut stream, &flags, Axis::Y)?;

        let mut points = flags
            .iter()
            .zip(x_coordinates.into_iter().zip(y_coordinates))
            .map(|(flag, (x, y))| GlyphPoint {
                is_on_curve: flag.is_on_curve(),
                coordinates: Vec2D::new(x, y),
            });

        let mut contours = Vec::with_capacity(num_contours);
        let mut start = 0;
        for end_point in end_points_of_contours {
            let contour_points = points.by_ref().take(end_point + 1 - start).collect();
            contours.push(Contour::new(contour_points));
            start = end_point + 1;
        }

        log::trace!(
            "Decoded glyph with {} contours and {num_points} points",
            contours.len()
        );

        Ok(Self { metrics, contours })
    }

    #[inline]
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    #[inline]
    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Append the outline to `segments`, mapping every coordinate through `transform`
    pub fn append_to(&self, segments: &mut Vec<PathSegment>, transform: AffineTransform) {
        for contour in self.contours() {
            path::append_contour(segments, contour, transform);
        }
    }

    /// The outline as a path in `FUnits`
    #[must_use]
    pub fn to_path(&self) -> Path {
        let mut segments = vec![];
        self.append_to(&mut segments, AffineTransform::identity());
        Path::new(segments)
    }
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    X,
    Y,
}

/// Read one flag per point, expanding repeated flags
fn read_flags(stream: &mut Stream<'_>, num_points: usize) -> Result<Vec<GlyphFlag>, TTFParseError> {
    // Note that the flag array can never be larger than n_points (thats the case when no
    // compression happens)
    let mut flags = Vec::with_capacity(num_points);

    while flags.len() < num_points {
        let flag = GlyphFlag(stream.read()?);
        flags.push(flag);

        if flag.repeat() {
            // read another byte, this is the number of times the flag should be
            // repeated
            let repeat_for = stream.read::<u8>()? as usize;
            let remaining = num_points - flags.len();

            if remaining < repeat_for {
                log::warn!(
                    "Glyph flag repeats {repeat_for} times but only {remaining} points are left"
                );
            }

            let new_len = flags.len() + repeat_for.min(remaining);
            flags.resize(new_len, flag);
        }
    }

    Ok(flags)
}

/// Read the delta-encoded coordinates along one axis and turn them into absolute values
fn read_coordinates(
    stream: &mut Stream<'_>,
    flags: &[GlyphFlag],
    axis: Axis,
) -> Result<Vec<i16>, TTFParseError> {
    let mut coordinates = Vec::with_capacity(flags.len());
    let mut previous: i16 = 0;

    for flag in flags {
        let coordinate_type = match axis {
            Axis::X => flag.coordinate_type_x(),
            Axis::Y => flag.coordinate_type_y(),
        };

        let delta = match coordinate_type {
            GlyphCoordinateType::Delta16B => stream.read::<i16>()?,
            GlyphCoordinateType::ZeroDelta16B => 0,
            GlyphCoordinateType::Negative8B => -i16::from(stream.read::<u8>()?),
            GlyphCoordinateType::Positive8B => i16::from(stream.read::<u8>()?),
        };

        previous = previous.wrapping_add(delta);
        coordinates.push(previous);
    }

    Ok(coordinates)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphFlag(u8);

impl GlyphFlag {
    const POINT_ON_CURVE: u8 = 1;
    const PRIMARY_FLAG_X: u8 = 2;
    const PRIMARY_FLAG_Y: u8 = 4;
    const REPEAT: u8 = 8;
    const SECONDARY_FLAG_X: u8 = 16;
    const SECONDARY_FLAG_Y: u8 = 32;

    pub fn is_on_curve(&self) -> bool {
        self.0 & Self::POINT_ON_CURVE != 0
    }

    pub fn repeat(&self) -> bool {
        self.0 & Self::REPEAT != 0
    }

    pub fn coordinate_type_x(&self) -> GlyphCoordinateType {
        GlyphCoordinateType::from_bits(
            self.0 & Self::PRIMARY_FLAG_X != 0,
            self.0 & Self::SECONDARY_FLAG_X != 0,
        )
    }

    pub fn coordinate_type_y(&self) -> GlyphCoordinateType {
        GlyphCoordinateType::from_bits(
            self.0 & Self::PRIMARY_FLAG_Y != 0,
            self.0 & Self::SECONDARY_FLAG_Y != 0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphCoordinateType {
    /// The current coordinate is a 16 bit signed delta change.
    Delta16B,
    /// The current coordinate is omitted, it has the same value as the previous one.
    ZeroDelta16B,
    /// The current coordinate is 8 bit, value is negative.
    Negative8B,
    /// The current coordinate is 8 bit, value is positive.
    Positive8B,
}

impl GlyphCoordinateType {
    fn from_bits(short_vector: bool, same_or_positive: bool) -> Self {
        match (short_vector, same_or_positive) {
            (false, false) => Self::Delta16B,
            (false, true) => Self::ZeroDelta16B,
            (true, false) => Self::Negative8B,
            (true, true) => Self::Positive8B,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ttf_tables::head::LocaTableFormat;

    fn glyph_header(num_contours: i16) -> Vec<u8> {
        [num_contours, 0, 0, 400, 800]
            .iter()
            .flat_map(|value| value.to_be_bytes())
            .collect()
    }

    #[test]
    fn flag_repeat_compression() {
        // One off-curve flag, then an on-curve flag repeated 3 more times
        let data = [0x00, 0x01 | 0x08, 3];
        let mut stream = Stream::new(&data);
        let flags = read_flags(&mut stream, 5).unwrap();

        assert_eq!(flags.len(), 5);
        assert!(!flags[0].is_on_curve());
        assert!(flags[1..].iter().all(GlyphFlag::is_on_curve));
        assert_eq!(stream.offset(), 3);
    }

    #[test]
    fn overlong_repeat_is_clamped() {
        let data = [0x01 | 0x08, 200];
        let mut stream = Stream::new(&data);
        assert_eq!(read_flags(&mut stream, 4).unwrap().len(), 4);
    }

    #[test]
    fn all_coordinate_encodings() {
        let flags = [
            GlyphFlag(0x00),                          // 16 bit delta
            GlyphFlag(GlyphFlag::SECONDARY_FLAG_X),   // same as before
            GlyphFlag(GlyphFlag::PRIMARY_FLAG_X),     // 8 bit negative
            GlyphFlag(GlyphFlag::PRIMARY_FLAG_X | GlyphFlag::SECONDARY_FLAG_X), // 8 bit positive
        ];
        let data = [0x01, 0x2C, 50, 20];
        let mut stream = Stream::new(&data);

        let coordinates = read_coordinates(&mut stream, &flags, Axis::X).unwrap();
        assert_eq!(coordinates, vec![300, 300, 250, 270]);
    }

    #[test]
    fn decode_simple_glyph() {
        let mut data = glyph_header(1);
        data.extend([0, 3]); // end point of the only contour
        data.extend([0, 0]); // no instructions
        data.extend([
            0x01 | 0x10,               // x unchanged, y is a 16 bit delta
            0x01 | 0x02 | 0x10 | 0x20, // x positive byte, y unchanged
            0x01 | 0x10 | 0x04 | 0x20, // x unchanged, y positive byte
            0x01 | 0x02 | 0x20,        // x negative byte, y unchanged
        ]);
        data.extend([200, 200]); // x deltas
        data.extend([0x03, 0x20, 200]); // y deltas: 800, then 200

        let outline = GlyphOutline::from_data(&data).unwrap();
        assert_eq!(outline.metrics().width(), 400);
        assert_eq!(outline.metrics().height(), 800);
        assert_eq!(outline.contours().len(), 1);

        let coordinates: Vec<_> = outline.contours()[0]
            .points()
            .iter()
            .map(|point| (point.coordinates.x, point.coordinates.y))
            .collect();
        assert_eq!(coordinates, vec![(0, 800), (200, 800), (200, 1000), (0, 1000)]);
    }

    #[test]
    fn multiple_contours_split_at_end_points() {
        let mut data = glyph_header(2);
        data.extend([0, 1, 0, 2]); // end points
        data.extend([0, 0]);
        data.extend([0x01 | 0x08 | 0x10 | 0x20, 2]); // three points at the origin
        let outline = GlyphOutline::from_data(&data).unwrap();

        let sizes: Vec<_> = outline
            .contours()
            .iter()
            .map(|contour| contour.points().len())
            .collect();
        assert_eq!(sizes, vec![2, 1]);
    }

    #[test]
    fn zero_contours_is_empty() {
        let outline = GlyphOutline::from_data(&glyph_header(0)).unwrap();
        assert!(outline.is_empty());
        assert!(outline.to_path().segments().is_empty());
    }

    #[test]
    fn compound_glyphs_are_unsupported() {
        assert!(matches!(
            GlyphOutline::from_data(&glyph_header(-1)),
            Err(TTFParseError::UnsupportedGlyphFormat)
        ));
    }

    #[test]
    fn decreasing_end_points() {
        let mut data = glyph_header(2);
        data.extend([0, 4, 0, 2]);
        assert!(matches!(
            GlyphOutline::from_data(&data),
            Err(TTFParseError::UnsupportedGlyphFormat)
        ));
    }

    #[test]
    fn missing_coordinates() {
        let mut data = glyph_header(1);
        data.extend([0, 0, 0, 0, 0x01]); // one point with a 16 bit x delta that isn't there
        assert!(matches!(
            GlyphOutline::from_data(&data),
            Err(TTFParseError::TruncatedData)
        ));
    }

    #[test]
    fn table_lookup() {
        let mut glyf = glyph_header(0);
        glyf.extend(glyph_header(-1));
        let loca = LocaTable::new(&[0, 0, 0, 5, 0, 5, 0, 10], LocaTableFormat::Short, 3)
            .unwrap();
        let table = GlyphTable::new(&glyf, &loca);

        assert_eq!(table.num_glyphs(), 3);
        assert!(table.get_glyph(GlyphID::new(0)).unwrap().is_empty());
        assert!(table.get_glyph(GlyphID::new(1)).unwrap().is_empty());
        assert!(matches!(
            table.get_glyph(GlyphID::new(2)),
            Err(TTFParseError::UnsupportedGlyphFormat)
        ));
        assert!(matches!(
            table.get_glyph(GlyphID::new(3)),
            Err(TTFParseError::GlyphIndexOutOfRange {
                index: 3,
                num_glyphs: 3
            })
        ));
    }

    #[test]
    fn glyph_range_outside_of_table() {
        let glyf = glyph_header(0);
        let loca = LocaTable::new(&[0, 0, 0, 50], LocaTableFormat::Short, 1)
            .unwrap();
        let table = GlyphTable::new(&glyf, &loca);
        assert!(matches!(
            table.get_glyph(GlyphID::new(0)),
            Err(TTFParseError::TruncatedData)
        ));
    }

    #[test]
    fn reversed_glyph_range() {
        let glyf = glyph_header(0);
        let loca = LocaTable::new(&[0, 10, 0, 5], LocaTableFormat::Short, 1)
            .unwrap();
        let table = GlyphTable::new(&glyf, &loca);
        assert!(matches!(
            table.get_glyph(GlyphID::new(0)),
            Err(TTFParseError::TruncatedData)
        ));
    }
}
