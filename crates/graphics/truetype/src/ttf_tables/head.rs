//! [Head](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6head.html) table implementation

use crate::{
    stream::{read_fixed_at, read_i16_at, read_u16_at, read_u32_at, Fixed},
    ttf::TTFParseError,
    ttf_tables::offset::Tag,
};

/// Value of the `magicNumber` field in every valid head table
const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaTableFormat {
    /// Offsets are stored as `u16`, divided by two
    Short,

    /// Offsets are stored as `u32`
    Long,
}

#[derive(Clone, Copy, Debug)]
pub struct HeadTable {
    font_revision: Fixed,

    units_per_em: u16,

    /// The minimum x value that can be encountered while
    /// rendering a glyph from this font, in `FUnits`.
    min_x: i16,

    /// The minimum y value that can be encountered while
    /// rendering a glyph from this font, in `FUnits`.
    min_y: i16,

    /// The maximum x value that can be encountered while
    /// rendering a glyph from this font, in `FUnits`.
    max_x: i16,

    /// The maximum y value that can be encountered while
    /// rendering a glyph from this font, in `FUnits`.
    max_y: i16,

    loca_table_format: LocaTableFormat,
}

impl HeadTable {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        let magic_number = read_u32_at(data, 12)?;
        if magic_number != MAGIC_NUMBER {
            log::warn!("head table has invalid magic number {magic_number:#010x}");
        }

        let loca_table_format = match read_i16_at(data, 50)? {
            0 => LocaTableFormat::Short,
            1 => LocaTableFormat::Long,
            other => {
                log::error!("Unknown loca table format: {other}");
                return Err(TTFParseError::UnsupportedTableFormat {
                    tag: Tag::HEAD,
                    format: other as u16,
                });
            },
        };

        Ok(Self {
            font_revision: read_fixed_at(data, 4)?,
            units_per_em: read_u16_at(data, 18)?,
            min_x: read_i16_at(data, 36)?,
            min_y: read_i16_at(data, 38)?,
            max_x: read_i16_at(data, 40)?,
            max_y: read_i16_at(data, 42)?,
            loca_table_format,
        })
    }

    #[inline]
    #[must_use]
    pub fn font_revision(&self) -> Fixed {
        self.font_revision
    }

    #[inline]
    #[must_use]
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    #[inline]
    #[must_use]
    pub fn min_x(&self) -> i16 {
        self.min_x
    }

    #[inline]
    #[must_use]
    pub fn min_y(&self) -> i16 {
        self.min_y
    }

    #[inline]
    #[must_use]
    pub fn max_x(&self) -> i16 {
        self.max_x
    }

    #[inline]
    #[must_use]
    pub fn max_y(&self) -> i16 {
        self.max_y
    }

    /// Get the format of the [Loca Table](super::loca::LocaTable).
    #[inline]
    #[must_use]
    pub fn loca_table_format(&self) -> LocaTableFormat {
        self.loca_table_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_bytes(loca_format: i16) -> Vec<u8> {
        let mut data = vec![0; 54];
        data[0..4].copy_from_slice(&0x0001_0000_u32.to_be_bytes());
        data[4..8].copy_from_slice(&0x0002_8000_u32.to_be_bytes());
        data[12..16].copy_from_slice(&MAGIC_NUMBER.to_be_bytes());
        data[18..20].copy_from_slice(&2048_u16.to_be_bytes());
        data[36..38].copy_from_slice(&(-100_i16).to_be_bytes());
        data[38..40].copy_from_slice(&(-200_i16).to_be_bytes());
        data[40..42].copy_from_slice(&1000_i16.to_be_bytes());
        data[42..44].copy_from_slice(&900_i16.to_be_bytes());
        data[50..52].copy_from_slice(&loca_format.to_be_bytes());
        data
    }

    #[test]
    fn parse_head() {
        let head = HeadTable::new(&head_bytes(1)).unwrap();
        assert_eq!(head.font_revision().to_f32(), 2.5);
        assert_eq!(head.units_per_em(), 2048);
        assert_eq!(head.min_x(), -100);
        assert_eq!(head.min_y(), -200);
        assert_eq!(head.max_x(), 1000);
        assert_eq!(head.max_y(), 900);
        assert_eq!(head.loca_table_format(), LocaTableFormat::Long);
    }

    #[test]
    fn unknown_loca_format() {
        assert!(matches!(
            HeadTable::new(&head_bytes(2)),
            Err(TTFParseError::UnsupportedTableFormat {
                tag: Tag::HEAD,
                format: 2
            })
        ));
    }

    #[test]
    fn truncated_head() {
        assert!(matches!(
            HeadTable::new(&head_bytes(0)[..40]),
            Err(TTFParseError::TruncatedData)
        ));
    }
}
