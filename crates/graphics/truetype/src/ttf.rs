//! [TrueType](https://developer.apple.com/fonts/TrueType-Reference-Manual) font parser
//!
//! ## Reference Material:
//! * <https://learn.microsoft.com/en-us/typography/opentype/spec/otff>
//! * <https://formats.kaitai.io/ttf/index.html>
//! * <https://handmade.network/forums/articles/t/7330-implementing_a_font_reader_and_rasterizer_from_scratch%252C_part_1__ttf_font_reader>

use std::io::{self, Read};

use crate::ttf_tables::{
    cmap::CMAPTable,
    glyf::GlyphTable,
    head::HeadTable,
    hhea::HHEATable,
    hmtx::HMTXTable,
    loca::LocaTable,
    maxp::MaxPTable,
    name::NameTable,
    offset::{TableDirectory, TableEntry, Tag},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TTFParseError {
    #[error("Unexpected end of data")]
    TruncatedData,
    #[error("Not a TrueType font (version {0:#010X})")]
    InvalidSignature(u32),
    #[error("Missing required table {0}")]
    TableNotFound(Tag),
    #[error("Table {0} is defined more than once")]
    DuplicateTable(Tag),
    #[error("Invalid font metrics: {0}")]
    InvalidMetrics(&'static str),
    #[error("Glyph {index} does not exist, the font contains {num_glyphs} glyphs")]
    GlyphIndexOutOfRange { index: usize, num_glyphs: usize },
    #[error("Index {index} is out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Unsupported glyph format")]
    UnsupportedGlyphFormat,
    #[error("Unsupported cmap format (platform {platform}, encoding {encoding})")]
    UnsupportedCMapFormat { platform: u16, encoding: u16 },
    #[error("Unsupported format {format} for table {tag}")]
    UnsupportedTableFormat { tag: Tag, format: u16 },
    #[error("Failed to read font data")]
    IO(#[from] io::Error),
}

/// A decoded TrueType font
///
/// All tables are decoded when the font is created, afterwards the font
/// is immutable and can be shared across threads.
#[derive(Clone, Debug)]
pub struct Font {
    data: Box<[u8]>,
    table_directory: TableDirectory,
    head_table: HeadTable,
    cmap_table: CMAPTable,
    loca_table: LocaTable,
    glyf_entry: TableEntry,
    hhea_table: HHEATable,
    hmtx_table: HMTXTable,
    name_table: Option<NameTable>,
}

impl Font {
    /// Decode a font from a byte slice, the data is copied
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        Self::from_bytes(data.to_vec())
    }

    /// Read the entire source, then decode the font
    ///
    /// The reader is dropped before this function returns.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, TTFParseError> {
        let mut data = vec![];
        reader.read_to_end(&mut data)?;
        drop(reader);

        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TTFParseError> {
        let data = data.into_boxed_slice();
        let table_directory = TableDirectory::new(&data)?;
        log::debug!(
            "Font defines {} tables: {}",
            table_directory.tables().len(),
            table_directory
                .tables()
                .iter()
                .map(|entry| entry.tag().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let head_entry = table_directory.get_table(Tag::HEAD)?;
        let head_table = HeadTable::new(head_entry.data(&data)?)?;

        let loca_entry = table_directory.get_table(Tag::LOCA)?;
        let loca_data = loca_entry.data(&data)?;

        // The maximum profile is the authoritative source for the glyph count,
        // fonts without one get as many glyphs as the loca table has room for
        let num_glyphs = match table_directory.find_table(Tag::MAXP) {
            Some(maxp_entry) => MaxPTable::new(maxp_entry.data(&data)?)?.num_glyphs as usize,
            None => {
                let num_glyphs =
                    LocaTable::num_glyphs_in(loca_data, head_table.loca_table_format());
                log::debug!("Font has no maxp table, assuming {num_glyphs} glyphs");
                num_glyphs
            },
        };

        let loca_table = LocaTable::new(loca_data, head_table.loca_table_format(), num_glyphs)?;
        let glyf_entry = table_directory.get_table(Tag::GLYF)?;

        let hhea_table = HHEATable::new(table_directory.get_table(Tag::HHEA)?.data(&data)?)?;
        if num_glyphs < hhea_table.num_of_long_hor_metrics() {
            return Err(TTFParseError::InvalidMetrics(
                "more horizontal metrics than glyphs",
            ));
        }

        let hmtx_table = HMTXTable::new(
            table_directory.get_table(Tag::HMTX)?.data(&data)?,
            hhea_table.num_of_long_hor_metrics(),
            num_glyphs,
            hhea_table.max_advance_width(),
        )?;

        let cmap_table = CMAPTable::new(table_directory.get_table(Tag::CMAP)?.data(&data)?)?;

        // Names are purely informational, a broken name table does not make the font unusable
        let name_table = match table_directory.find_table(Tag::NAME) {
            Some(name_entry) => match name_entry.data(&data).and_then(NameTable::new) {
                Ok(name_table) => Some(name_table),
                Err(error) => {
                    log::warn!("Ignoring malformed name table: {error}");
                    None
                },
            },
            None => None,
        };

        Ok(Self {
            data,
            table_directory,
            head_table,
            cmap_table,
            loca_table,
            glyf_entry,
            hhea_table,
            hmtx_table,
            name_table,
        })
    }

    /// Get the total number of glyphs defined in the font
    #[inline]
    #[must_use]
    pub fn num_glyphs(&self) -> usize {
        self.loca_table.num_glyphs()
    }

    /// Get the family name of the font, if specified.
    #[must_use]
    pub fn font_family_name(&self) -> Option<&str> {
        self.name_table.as_ref()?.get_font_family()
    }

    /// Get the full name of the font, if specified.
    /// Fonts will usually specify their own name, though it is not required.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.name_table.as_ref()?.get_font_name()
    }

    #[must_use]
    pub fn glyph_table(&self) -> GlyphTable<'_> {
        // The directory verified that every table lies within the font
        let glyf_data = self.glyf_entry.data(&self.data).unwrap_or_default();

        GlyphTable::new(glyf_data, &self.loca_table)
    }

    #[inline]
    #[must_use]
    pub fn cmap_table(&self) -> &CMAPTable {
        &self.cmap_table
    }

    #[inline]
    #[must_use]
    pub fn horizontal_header_table(&self) -> &HHEATable {
        &self.hhea_table
    }

    #[inline]
    #[must_use]
    pub fn horizontal_metrics_table(&self) -> &HMTXTable {
        &self.hmtx_table
    }

    #[inline]
    #[must_use]
    pub fn head_table(&self) -> &HeadTable {
        &self.head_table
    }

    #[inline]
    #[must_use]
    pub fn name_table(&self) -> Option<&NameTable> {
        self.name_table.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn table_directory(&self) -> &TableDirectory {
        &self.table_directory
    }

    /// The raw bytes the font was decoded from
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Return the number of coordinate points per font size unit.
    /// This value is used to scale fonts, ie. when you render a font with
    /// size `17px`, one `em` equals `17px`.
    ///
    /// Note that this value does not constrain the size of individual glyphs.
    /// A glyph may have a size larger than `1em`.
    #[inline]
    #[must_use]
    pub fn units_per_em(&self) -> u16 {
        self.head_table.units_per_em()
    }
}
