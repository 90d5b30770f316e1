//! The [Table Directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)
//! at the very start of every font file

use crate::{
    stream::{read_u16_at, read_u32_at, slice_at, Stream},
    ttf::TTFParseError,
};
use std::fmt;

/// Size of the header that precedes the table records
const HEADER_SIZE: usize = 12;

/// Size of a single table record
const TABLE_RECORD_SIZE: usize = 16;

/// Four-byte table identifier, like `cmap` or `glyf`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const CMAP: Self = Self(*b"cmap");
    pub const GLYF: Self = Self(*b"glyf");
    pub const HEAD: Self = Self(*b"head");
    pub const HHEA: Self = Self(*b"hhea");
    pub const HMTX: Self = Self(*b"hmtx");
    pub const LOCA: Self = Self(*b"loca");
    pub const MAXP: Self = Self(*b"maxp");
    pub const NAME: Self = Self(*b"name");

    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

/// The version numbers that identify a font with TrueType outlines
///
/// `0x00010000` is the OpenType value, `true` is used by older Apple fonts.
const TRUETYPE_VERSIONS: [u32; 2] = [0x00010000, u32::from_be_bytes(*b"true")];

#[derive(Clone, Debug)]
pub struct TableDirectory {
    scaler_type: u32,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
    tables: Vec<TableEntry>,
}

impl TableDirectory {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        if data.len() < HEADER_SIZE {
            return Err(TTFParseError::TruncatedData);
        }

        let scaler_type = read_u32_at(data, 0)?;
        if !TRUETYPE_VERSIONS.contains(&scaler_type) {
            return Err(TTFParseError::InvalidSignature(scaler_type));
        }

        let num_tables = read_u16_at(data, 4)? as usize;
        let search_range = read_u16_at(data, 6)?;
        let entry_selector = read_u16_at(data, 8)?;
        let range_shift = read_u16_at(data, 10)?;

        // Reject impossible table counts before allocating anything
        let table_data = slice_at(data, HEADER_SIZE, num_tables * TABLE_RECORD_SIZE)?;

        let mut tables: Vec<TableEntry> = Vec::with_capacity(num_tables);
        for record in table_data.chunks_exact(TABLE_RECORD_SIZE) {
            let entry = TableEntry::new(record)?;

            if tables.iter().any(|table| table.tag() == entry.tag()) {
                return Err(TTFParseError::DuplicateTable(entry.tag()));
            }

            // The table has to be fully contained in the font
            slice_at(data, entry.offset(), entry.length())?;

            let computed_checksum = entry.compute_checksum(data)?;
            if computed_checksum != entry.checksum() && entry.tag() != Tag::HEAD {
                // The head checksum is computed with checkSumAdjustment zeroed,
                // so it never matches a plain sum
                log::warn!(
                    "Checksum mismatch for table {}: expected {:#010x}, found {:#010x}",
                    entry.tag(),
                    entry.checksum(),
                    computed_checksum
                );
            }

            log::trace!("Found {entry:?}");
            tables.push(entry);
        }

        log::debug!("Table directory lists {} tables", tables.len());

        Ok(Self {
            scaler_type,
            search_range,
            entry_selector,
            range_shift,
            tables,
        })
    }

    #[inline]
    #[must_use]
    pub fn scaler_type(&self) -> u32 {
        self.scaler_type
    }

    #[inline]
    #[must_use]
    pub fn search_range(&self) -> u16 {
        self.search_range
    }

    #[inline]
    #[must_use]
    pub fn entry_selector(&self) -> u16 {
        self.entry_selector
    }

    #[inline]
    #[must_use]
    pub fn range_shift(&self) -> u16 {
        self.range_shift
    }

    /// Look up a table that the caller can't do without
    pub fn get_table(&self, target_tag: Tag) -> Result<TableEntry, TTFParseError> {
        self.find_table(target_tag)
            .ok_or(TTFParseError::TableNotFound(target_tag))
    }

    /// Look up a table that may legitimately be absent
    #[inline]
    #[must_use]
    pub fn find_table(&self, target_tag: Tag) -> Option<TableEntry> {
        // Binary search might be more performant here but is likely not worth
        // the complexity as tables are only parsed once and fonts only have a small number of
        // tables (< 10-20)
        self.tables()
            .iter()
            .find(|table| table.tag() == target_tag)
            .copied()
    }

    #[inline]
    #[must_use]
    pub fn tables(&self) -> &[TableEntry] {
        &self.tables
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    tag: Tag,
    checksum: u32,
    offset: u32,
    length: u32,
}

impl TableEntry {
    fn new(record: &[u8]) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new(record);
        let tag = Tag(stream.read::<u32>()?.to_be_bytes());

        Ok(Self {
            tag,
            checksum: stream.read()?,
            offset: stream.read()?,
            length: stream.read()?,
        })
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[inline]
    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// The bytes that make up this table
    pub fn data<'a>(&self, font_data: &'a [u8]) -> Result<&'a [u8], TTFParseError> {
        slice_at(font_data, self.offset(), self.length())
    }

    /// Sum of the table interpreted as big-endian `u32`s, zero-padded to a multiple of four
    pub fn compute_checksum(&self, font_data: &[u8]) -> Result<u32, TTFParseError> {
        let table = self.data(font_data)?;

        let checksum = table.chunks(4).fold(0_u32, |sum, chunk| {
            let mut word = [0; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            sum.wrapping_add(u32::from_be_bytes(word))
        });
        Ok(checksum)
    }
}

impl fmt::Debug for TableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table Entry")
            .field("tag", &self.tag())
            .field("checksum", &self.checksum())
            .field("offset", &self.offset())
            .field("length", &self.length())
            .finish()
    }
}
