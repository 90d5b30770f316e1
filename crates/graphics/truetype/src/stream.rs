//! Big-endian reads over borrowed font data
//!
//! Every read is bounds checked, running past the end of the data
//! yields [TTFParseError::TruncatedData] instead of a panic.

use crate::ttf::TTFParseError;
use std::fmt;

/// A cursor over a byte slice.
#[derive(Clone, Copy, Debug)]
pub struct Stream<'a> {
    bytes: &'a [u8],
    ptr: usize,
}

impl<'a> Stream<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, ptr: 0 }
    }

    /// Create a stream that starts reading at `offset`
    #[must_use]
    pub fn new_at(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, ptr: offset }
    }

    pub fn read<T: Readable>(&mut self) -> Result<T, TTFParseError> {
        let value = read_at::<T>(self.bytes, self.ptr)?;
        self.ptr += T::SIZE;
        Ok(value)
    }

    /// Read `n` raw bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], TTFParseError> {
        let bytes = slice_at(self.bytes, self.ptr, n)?;
        self.ptr += n;
        Ok(bytes)
    }

    pub fn skip_bytes(&mut self, num_bytes: usize) {
        self.ptr = self.ptr.saturating_add(num_bytes);
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.ptr
    }
}

/// Trait for things that can be read from a byte stream
pub trait Readable: Sized {
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Decode `Self` from the first [Self::SIZE] bytes of `bytes`
    ///
    /// `bytes` is guaranteed to hold exactly [Self::SIZE] bytes.
    fn from_be_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_readable {
    ($($primitive: ty),*) => {
        $(
            impl Readable for $primitive {
                #[inline]
                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut buffer = [0; std::mem::size_of::<$primitive>()];
                    buffer.copy_from_slice(bytes);
                    <$primitive>::from_be_bytes(buffer)
                }
            }
        )*
    };
}

impl_readable!(u8, i8, u16, i16, u32, i32);

/// A signed 16.16 fixed-point number, as used for table versions
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fixed(i32);

impl Fixed {
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    #[inline]
    #[must_use]
    pub const fn bits(&self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.
    }
}

impl Readable for Fixed {
    const SIZE: usize = 4;

    fn from_be_slice(bytes: &[u8]) -> Self {
        Self(i32::from_be_slice(bytes))
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

/// Borrow `length` bytes starting at `offset`
pub fn slice_at(data: &[u8], offset: usize, length: usize) -> Result<&[u8], TTFParseError> {
    let end = offset
        .checked_add(length)
        .ok_or(TTFParseError::TruncatedData)?;
    data.get(offset..end).ok_or(TTFParseError::TruncatedData)
}

#[inline]
pub fn read_at<T: Readable>(data: &[u8], offset: usize) -> Result<T, TTFParseError> {
    slice_at(data, offset, T::SIZE).map(T::from_be_slice)
}

#[inline]
pub fn read_u16_at(data: &[u8], offset: usize) -> Result<u16, TTFParseError> {
    read_at(data, offset)
}

#[inline]
pub fn read_i16_at(data: &[u8], offset: usize) -> Result<i16, TTFParseError> {
    read_at(data, offset)
}

#[inline]
pub fn read_u32_at(data: &[u8], offset: usize) -> Result<u32, TTFParseError> {
    read_at(data, offset)
}

#[inline]
pub fn read_fixed_at(data: &[u8], offset: usize) -> Result<Fixed, TTFParseError> {
    read_at(data, offset)
}
