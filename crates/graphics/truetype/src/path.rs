//! Vector paths produced from glyph outlines

use std::fmt::Write;

use crate::ttf_tables::glyf::Contour;
use math::{AffineTransform, Rectangle, Vec2D};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Vec2D),
    LineTo(Vec2D),

    /// A quadratic bezier curve with one control point
    QuadraticTo(Vec2D, Vec2D),

    /// A cubic bezier curve with two control points
    ///
    /// TrueType outlines never produce these, they exist for consumers that
    /// share the segment type with other outline formats.
    CubicTo(Vec2D, Vec2D, Vec2D),
    Close,
}

impl PathSegment {
    /// Every point referenced by this segment, control points included
    fn points(&self) -> impl Iterator<Item = Vec2D> {
        let points = match *self {
            Self::MoveTo(p) | Self::LineTo(p) => [Some(p), None, None],
            Self::QuadraticTo(c, p) => [Some(c), Some(p), None],
            Self::CubicTo(c1, c2, p) => [Some(c1), Some(c2), Some(p)],
            Self::Close => [None, None, None],
        };
        points.into_iter().flatten()
    }
}

/// Receives the segments of a [Path], usually to rasterize them
pub trait PathConsumer {
    fn move_to(&mut self, p: Vec2D);
    fn line_to(&mut self, p: Vec2D);
    fn quad_bez_to(&mut self, p1: Vec2D, p2: Vec2D);
    fn cubic_bez_to(&mut self, p1: Vec2D, p2: Vec2D, p3: Vec2D);
    fn close(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn into_segments(self) -> Vec<PathSegment> {
        self.segments
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The smallest rectangle containing every point of the path
    ///
    /// Control points are included, so curves may not touch the edges of the box.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rectangle> {
        Rectangle::bounding_box(self.segments.iter().flat_map(PathSegment::points))
    }

    /// Feed every segment into `consumer`, in order
    pub fn replay<C: PathConsumer>(&self, consumer: &mut C) {
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => consumer.move_to(p),
                PathSegment::LineTo(p) => consumer.line_to(p),
                PathSegment::QuadraticTo(c, p) => consumer.quad_bez_to(c, p),
                PathSegment::CubicTo(c1, c2, p) => consumer.cubic_bez_to(c1, c2, p),
                PathSegment::Close => consumer.close(),
            }
        }
    }

    /// Render the path in the syntax of the `d` attribute of a SVG `<path>`
    #[must_use]
    pub fn to_svg_path_data(&self) -> String {
        let mut svg = SvgPathWriter::default();
        self.replay(&mut svg);
        svg.data
    }
}

#[derive(Default)]
struct SvgPathWriter {
    data: String,
}

impl SvgPathWriter {
    fn command(&mut self, command: char, points: &[Vec2D]) {
        if !self.data.is_empty() {
            self.data.push(' ');
        }
        self.data.push(command);
        for point in points {
            // Writing into a String never fails
            let _ = write!(self.data, " {} {}", point.x, point.y);
        }
    }
}

impl PathConsumer for SvgPathWriter {
    fn move_to(&mut self, p: Vec2D) {
        self.command('M', &[p]);
    }

    fn line_to(&mut self, p: Vec2D) {
        self.command('L', &[p]);
    }

    fn quad_bez_to(&mut self, p1: Vec2D, p2: Vec2D) {
        self.command('Q', &[p1, p2]);
    }

    fn cubic_bez_to(&mut self, p1: Vec2D, p2: Vec2D, p3: Vec2D) {
        self.command('C', &[p1, p2, p3]);
    }

    fn close(&mut self) {
        self.command('Z', &[]);
    }
}

/// Convert a contour into path segments, mapping every point through `transform`
///
/// Consecutive off-curve points imply an on-curve point halfway between them.
/// The contour is closed with a curve back to its start if it ends on an
/// off-curve point.
pub(crate) fn append_contour(
    segments: &mut Vec<PathSegment>,
    contour: &Contour,
    transform: AffineTransform,
) {
    let points = contour.points();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return;
    };

    let first_coordinates = Vec2D::from(first.coordinates);
    let last_coordinates = Vec2D::from(last.coordinates);

    // Find a point on the curve to start from
    let (start, remaining) = if first.is_on_curve {
        (first_coordinates, &points[1..])
    } else if last.is_on_curve {
        (last_coordinates, &points[..points.len() - 1])
    } else {
        (Vec2D::middle(last_coordinates, first_coordinates), points)
    };

    segments.push(PathSegment::MoveTo(transform.apply_to(start)));

    let mut control_point: Option<Vec2D> = None;
    for point in remaining {
        let coordinates = Vec2D::from(point.coordinates);

        match (control_point, point.is_on_curve) {
            (None, true) => {
                segments.push(PathSegment::LineTo(transform.apply_to(coordinates)));
            },
            (None, false) => control_point = Some(coordinates),
            (Some(control), true) => {
                segments.push(PathSegment::QuadraticTo(
                    transform.apply_to(control),
                    transform.apply_to(coordinates),
                ));
                control_point = None;
            },
            (Some(control), false) => {
                let implied = Vec2D::middle(control, coordinates);
                segments.push(PathSegment::QuadraticTo(
                    transform.apply_to(control),
                    transform.apply_to(implied),
                ));
                control_point = Some(coordinates);
            },
        }
    }

    if let Some(control) = control_point {
        segments.push(PathSegment::QuadraticTo(
            transform.apply_to(control),
            transform.apply_to(start),
        ));
    }

    segments.push(PathSegment::Close);
}
