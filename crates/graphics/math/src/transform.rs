use super::Vec2D;

/// A 2-dimensional affine transformation.
///
/// Stored as the upper two rows of a `3x3` matrix, the last row is always `[0, 0, 1]`.
/// See [Wikipedia](https://en.wikipedia.org/wiki/Affine_transformation) for more information.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform([[f32; 3]; 2]);

impl AffineTransform {
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self([[1., 0., 0.], [0., 1., 0.]])
    }

    /// Create transformation that shifts every point by a fixed offset
    #[inline]
    #[must_use]
    pub const fn translate(translate_by: Vec2D) -> Self {
        Self([[1., 0., translate_by.x], [0., 1., translate_by.y]])
    }

    /// Create a transformation that scales points by fixed values along the X and Y axis
    #[inline]
    #[must_use]
    pub const fn scale(x_scale: f32, y_scale: f32) -> Self {
        Self([[x_scale, 0., 0.], [0., y_scale, 0.]])
    }

    /// Apply this transform to a provided vector
    #[inline]
    #[must_use]
    pub fn apply_to(self, point: Vec2D) -> Vec2D {
        Vec2D {
            x: point
                .x
                .mul_add(self.0[0][0], point.y.mul_add(self.0[0][1], self.0[0][2])),
            y: point
                .x
                .mul_add(self.0[1][0], point.y.mul_add(self.0[1][1], self.0[1][2])),
        }
    }

    /// Combine two transforms into one that applies `self` first and `other` second
    #[inline]
    #[must_use]
    pub fn chain(&self, other: Self) -> Self {
        // a b c
        // d e f
        // 0 0 1
        let a = other.0[0][0].mul_add(self.0[0][0], other.0[0][1] * self.0[1][0]);
        let b = other.0[0][0].mul_add(self.0[0][1], other.0[0][1] * self.0[1][1]);
        let c = other.0[0][0].mul_add(
            self.0[0][2],
            other.0[0][1].mul_add(self.0[1][2], other.0[0][2]),
        );

        let d = other.0[1][0].mul_add(self.0[0][0], other.0[1][1] * self.0[1][0]);
        let e = other.0[1][0].mul_add(self.0[0][1], other.0[1][1] * self.0[1][1]);
        let f = other.0[1][0].mul_add(
            self.0[0][2],
            other.0[1][1].mul_add(self.0[1][2], other.0[1][2]),
        );

        Self([[a, b, c], [d, e, f]])
    }

    /// Where the origin ends up after the transform is applied
    #[inline]
    #[must_use]
    pub const fn translation(&self) -> Vec2D {
        Vec2D {
            x: self.0[0][2],
            y: self.0[1][2],
        }
    }

    /// The scale factors along the X and Y axis
    ///
    /// Only meaningful for transforms without rotation or shear, which
    /// are the only kind this crate ever builds.
    #[inline]
    #[must_use]
    pub const fn scale_factors(&self) -> (f32, f32) {
        (self.0[0][0], self.0[1][1])
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}
