//! Geometry primitives shared by the glyph outline pipeline

mod rect;
mod transform;
mod vec2d;

pub use rect::Rectangle;
pub use transform::AffineTransform;
pub use vec2d::Vec2D;
