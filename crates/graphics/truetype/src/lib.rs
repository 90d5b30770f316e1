//! TrueType font decoding.
//!
//! Turns the raw bytes of a font file into glyph outlines and lays out
//! strings as a single vector [Path], ready to be handed to a rasterizer.
//!
//! Hinting, composite glyphs and shaping are not supported.

mod layout;
pub mod path;
mod stream;
pub mod ttf;
pub mod ttf_tables;

pub use layout::{text_transform, LaidOutText};
pub use path::{Path, PathConsumer, PathSegment};
pub use stream::{Fixed, Readable, Stream};
pub use ttf::{Font, TTFParseError};
pub use ttf_tables::{cmap::GlyphID, offset::Tag};
