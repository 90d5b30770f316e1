use super::Vec2D;

use std::ops;

/// An axis-aligned rectangle
///
/// `top_left` holds the smaller coordinates on both axis, no matter which
/// direction the y-axis points in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle<T = f32> {
    top_left: Vec2D<T>,
    bottom_right: Vec2D<T>,
}

impl<T> Rectangle<T> {
    pub fn from_corners(top_left: Vec2D<T>, bottom_right: Vec2D<T>) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }
}

impl<T> Rectangle<T>
where
    T: Copy,
{
    pub const fn top_left(&self) -> Vec2D<T> {
        self.top_left
    }

    pub const fn bottom_right(&self) -> Vec2D<T> {
        self.bottom_right
    }
}

impl<T> Rectangle<T>
where
    T: ops::Sub<Output = T> + Copy,
{
    pub fn width(&self) -> T {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> T {
        self.bottom_right.y - self.top_left.y
    }
}

impl<T> Rectangle<T>
where
    T: PartialOrd + Copy,
{
    /// The smallest rectangle containing every point, or `None` if there are no points
    pub fn bounding_box<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2D<T>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;

        let mut bounds = Self::from_corners(first, first);
        for point in points {
            bounds.grow_to_contain_point(point);
        }
        Some(bounds)
    }

    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec2D<T>) -> bool {
        self.top_left.x <= point.x
            && point.x <= self.bottom_right.x
            && self.top_left.y <= point.y
            && point.y <= self.bottom_right.y
    }

    pub fn grow_to_contain_point(&mut self, point: Vec2D<T>) {
        // Like Ord::min/Ord::max except they only require T to implement
        // PartialOrd, not Ord
        if point.x < self.top_left.x {
            self.top_left.x = point.x;
        }
        if point.y < self.top_left.y {
            self.top_left.y = point.y;
        }
        if self.bottom_right.x < point.x {
            self.bottom_right.x = point.x;
        }
        if self.bottom_right.y < point.y {
            self.bottom_right.y = point.y;
        }
    }
}
