use std::ops::{Add, Div, Mul, Sub};

/// Generate a trait impl for an operation involving two [Vec2D]s, like [Add] or [Sub]
macro_rules! impl_bin_op {
    ($trait: ident, $fn: ident, $op: tt) => {
        impl<T: $trait<T, Output = T>> $trait for Vec2D<T> {
            type Output = Vec2D<T>;

            fn $fn(self, rhs: Self) -> Self::Output {
                Self {
                    x: self.x $op rhs.x,
                    y: self.y $op rhs.y,
                }
            }
        }
    };
}

/// Generate a trait impl for an operation involving a [Vec2D] and a scalar value
macro_rules! impl_scalar_op {
    ($trait: ident, $fn: ident, $op: tt, $rhs: ident) => {
        impl<T: $trait<$rhs, Output = T>> $trait<$rhs> for Vec2D<T> {
            type Output = Vec2D<T>;

            fn $fn(self, rhs: $rhs) -> Self::Output {
                Self {
                    x: self.x $op rhs,
                    y: self.y $op rhs,
                }
            }
        }
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2D<T = f32> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2D<T> {
    #[inline]
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Apply `f` to both components
    #[inline]
    #[must_use]
    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> Vec2D<U> {
        Vec2D {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl Vec2D<f32> {
    /// The point halfway between `a` and `b`
    #[inline]
    #[must_use]
    pub fn middle(a: Self, b: Self) -> Self {
        Self::new((a.x + b.x) / 2., (a.y + b.y) / 2.)
    }

    /// Returns `true` if both components differ by less than `tolerance`
    #[inline]
    #[must_use]
    pub fn approx_eq(&self, other: Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

impl From<Vec2D<i16>> for Vec2D<f32> {
    fn from(value: Vec2D<i16>) -> Self {
        value.map(f32::from)
    }
}

impl_bin_op!(Add, add, +);
impl_bin_op!(Sub, sub, -);

impl_scalar_op!(Mul, mul, *, f32);
impl_scalar_op!(Mul, mul, *, i16);
impl_scalar_op!(Mul, mul, *, i32);

impl_scalar_op!(Div, div, /, f32);
impl_scalar_op!(Div, div, /, i16);
impl_scalar_op!(Div, div, /, i32);
