//! [Name](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6name.html) table implementation.
//!
//! Note that this implementation includes *some* features from the [OpenType Name Table](https://learn.microsoft.com/en-us/typography/opentype/spec/name)

use super::offset::Tag;
use crate::{
    stream::{slice_at, Stream},
    ttf::TTFParseError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameID {
    Copyright,
    FontFamily,
    FontSubFamily,
    UniqueSubFamilyIdentification,
    FullName,
    NameTableVersion,
    PostScriptName,
    Trademark,
    Manufacturer,
    Designer,
    Description,
    VendorURL,
    DesignerURL,
    License,
    LicenseURL,
    Reserved,
    PreferredFamily,
    PreferredSubFamily,
    CompatibleFull,
    SampleText,
    PostScriptCIDFindFontName,
    WWSFamilyName,
    WWSSubFamilyName,
    LightBackgroundPalette,
    DarkBackgroundPalette,
    VariationsPostscriptNamePrefix,
    FontSpecific,
}

impl From<u16> for NameID {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Copyright,
            1 => Self::FontFamily,
            2 => Self::FontSubFamily,
            3 => Self::UniqueSubFamilyIdentification,
            4 => Self::FullName,
            5 => Self::NameTableVersion,
            6 => Self::PostScriptName,
            7 => Self::Trademark,
            8 => Self::Manufacturer,
            9 => Self::Designer,
            10 => Self::Description,
            11 => Self::VendorURL,
            12 => Self::DesignerURL,
            13 => Self::License,
            14 => Self::LicenseURL,
            15 => Self::Reserved,
            16 => Self::PreferredFamily,
            17 => Self::PreferredSubFamily,
            18 => Self::CompatibleFull,
            19 => Self::SampleText,
            20 => Self::PostScriptCIDFindFontName,
            21 => Self::WWSFamilyName,
            22 => Self::WWSSubFamilyName,
            23 => Self::LightBackgroundPalette,
            24 => Self::DarkBackgroundPalette,
            25 => Self::VariationsPostscriptNamePrefix,
            26..=255 => Self::Reserved,
            256.. => Self::FontSpecific,
        }
    }
}

/// How the bytes of a name record are to be interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StringEncoding {
    Utf16BigEndian,

    /// Mac Roman, only the ASCII subset is decoded
    MacRoman,
}

impl StringEncoding {
    fn for_record(platform_id: u16, platform_specific_id: u16) -> Option<Self> {
        match (platform_id, platform_specific_id) {
            // Unicode is either platform ID 0 (unicode) or platform id 3 (microsoft)
            // with specific id 1 (BMP) or 10 (full repertoire)
            (0, _) | (3, 1) | (3, 10) => Some(Self::Utf16BigEndian),
            (1, 0) => Some(Self::MacRoman),
            _ => None,
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf16BigEndian => {
                // The bytes are in big-endian order, we need to convert to native endianness
                let native_u16s: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&native_u16s)
            },
            Self::MacRoman => bytes
                .iter()
                .map(|&byte| {
                    if byte.is_ascii() {
                        char::from(byte)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NameTable {
    name_records: Vec<NameRecord>,
}

impl NameTable {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new(data);
        let format_selector: u16 = stream.read()?;
        if format_selector > 1 {
            log::warn!("Expected name table format 0 or 1, found {format_selector}");
            return Err(TTFParseError::UnsupportedTableFormat {
                tag: Tag::NAME,
                format: format_selector,
            });
        }

        let num_records = stream.read::<u16>()? as usize;
        let string_offset = stream.read::<u16>()? as usize;

        let mut name_records = Vec::with_capacity(num_records);

        for _ in 0..num_records {
            let platform_id: u16 = stream.read()?;
            let platform_specific_id: u16 = stream.read()?;
            let _language_id: u16 = stream.read()?;
            let name_id: u16 = stream.read()?;
            let length = stream.read::<u16>()? as usize;
            let offset = stream.read::<u16>()? as usize;

            // Other encodings are pretty much deprecated anyways
            let Some(encoding) = StringEncoding::for_record(platform_id, platform_specific_id)
            else {
                continue;
            };

            let value_bytes = slice_at(data, string_offset + offset, length)?;
            name_records.push(NameRecord {
                name_id: name_id.into(),
                is_unicode: encoding == StringEncoding::Utf16BigEndian,
                value: encoding.decode(value_bytes),
            });
        }

        Ok(Self { name_records })
    }

    /// Find a name, preferring unicode records over legacy ones
    #[must_use]
    pub fn get(&self, name_id: NameID) -> Option<&str> {
        let mut candidates = self
            .name_records()
            .iter()
            .filter(|name_record| name_record.name_id == name_id);

        let first = candidates.clone().next()?;
        let preferred = candidates
            .find(|name_record| name_record.is_unicode)
            .unwrap_or(first);
        Some(preferred.value.as_str())
    }

    /// Get the full name of the font, if any.
    #[must_use]
    pub fn get_font_name(&self) -> Option<&str> {
        self.get(NameID::FullName)
    }

    #[must_use]
    pub fn get_font_family(&self) -> Option<&str> {
        self.get(NameID::FontFamily)
    }

    /// Get an iterator over the suitable name records from the font.
    ///
    /// Only records with a known encoding are considered "suitable".
    #[inline]
    #[must_use]
    pub fn name_records(&self) -> &[NameRecord] {
        &self.name_records
    }
}

#[derive(Clone, Debug)]
pub struct NameRecord {
    pub name_id: NameID,
    pub is_unicode: bool,
    pub value: String,
}
