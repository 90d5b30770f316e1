//! [CMAP](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html) table implementation

use crate::{
    stream::{read_u16_at, read_u32_at, slice_at, Stream},
    ttf::TTFParseError,
};
use std::{cmp::Ordering, fmt};

/// Zero-cost wrapper around a `u16` for extra type safety.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphID(u16);

impl GlyphID {
    /// The id of the replacement glyph, displayed for characters the font does not cover
    pub const NOTDEF: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn numeric(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_notdef(self) -> bool {
        self.0 == 0
    }
}

impl From<GlyphID> for u16 {
    fn from(value: GlyphID) -> Self {
        value.0
    }
}

impl From<u16> for GlyphID {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for GlyphID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformID {
    Unicode(UnicodePlatformSpecificID),
    Mac,
    Reserved,
    Microsoft(WindowsPlatformSpecificID),
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnicodePlatformSpecificID {
    Version1_0,
    Version1_1,
    Iso10646_1993SemanticDeprecated,
    Unicode2_0OrLaterBmpOnly,
    Unicode2_0OrLater,
    UnicodeVariationSequences,
    LastResort,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowsPlatformSpecificID {
    Symbol,
    UnicodeBmpOnly,
    ShiftJis,
    Prc,
    BigFive,
    Johab,
    UnicodeUcs4,
    Unknown,
}

impl From<(u16, u16)> for PlatformID {
    fn from(value: (u16, u16)) -> Self {
        match value.0 {
            0 => Self::Unicode(value.1.into()),
            1 => Self::Mac,
            2 => Self::Reserved,
            3 => Self::Microsoft(value.1.into()),
            _ => Self::Unknown,
        }
    }
}

impl From<u16> for UnicodePlatformSpecificID {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Version1_0,
            1 => Self::Version1_1,
            2 => Self::Iso10646_1993SemanticDeprecated,
            3 => Self::Unicode2_0OrLaterBmpOnly,
            4 => Self::Unicode2_0OrLater,
            5 => Self::UnicodeVariationSequences,
            6 => Self::LastResort,
            _ => Self::Unknown,
        }
    }
}

impl From<u16> for WindowsPlatformSpecificID {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Symbol,
            1 => Self::UnicodeBmpOnly,
            2 => Self::ShiftJis,
            3 => Self::Prc,
            4 => Self::BigFive,
            5 => Self::Johab,
            10 => Self::UnicodeUcs4,
            _ => Self::Unknown,
        }
    }
}

impl PlatformID {
    /// Whether subtables for this platform map unicode codepoints
    #[must_use]
    pub fn is_unicode(&self) -> bool {
        matches!(
            self,
            Self::Unicode(_)
                | Self::Microsoft(WindowsPlatformSpecificID::UnicodeBmpOnly)
                | Self::Microsoft(WindowsPlatformSpecificID::UnicodeUcs4)
        )
    }
}

#[derive(Clone, Debug)]
pub struct CMAPTable {
    version: u16,
    encoding_tables: Vec<EncodingTable>,
}

impl CMAPTable {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        let version = read_u16_at(data, 0)?;
        let num_subtables = read_u16_at(data, 2)? as usize;

        // 4 bytes header + 8 bytes per table
        let records = slice_at(data, 4, num_subtables * 8)?;

        let encoding_tables = records
            .chunks_exact(8)
            .map(|record| EncodingTable::new(data, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version,
            encoding_tables,
        })
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u16 {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn num_encoding_tables(&self) -> usize {
        self.encoding_tables.len()
    }

    pub fn encoding_table(&self, index: usize) -> Result<&EncodingTable, TTFParseError> {
        self.encoding_tables
            .get(index)
            .ok_or(TTFParseError::IndexOutOfRange {
                index,
                len: self.num_encoding_tables(),
            })
    }

    #[inline]
    pub fn encoding_tables(&self) -> impl Iterator<Item = &EncodingTable> {
        self.encoding_tables.iter()
    }

    /// The first usable table that maps unicode codepoints, if any
    ///
    /// This is a convenience for callers, layout never picks a table on its own.
    #[must_use]
    pub fn unicode_table(&self) -> Option<&EncodingTable> {
        // using a linear search here - there are usually only a handful of tables
        // so binary search really doesn't make a lot of sense
        self.encoding_tables()
            .find(|table| table.platform_id().is_unicode() && table.format().is_some())
    }
}

/// A single subtable of the [CMAPTable]
#[derive(Clone)]
pub struct EncodingTable {
    platform_id: u16,
    platform_specific_id: u16,
    offset: usize,
    format: Option<CMapFormat>,
}

impl EncodingTable {
    fn new(cmap: &[u8], record: &[u8]) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new(record);
        let platform_id: u16 = stream.read()?;
        let platform_specific_id: u16 = stream.read()?;
        let offset = stream.read::<u32>()? as usize;

        let subtable = cmap.get(offset..).ok_or(TTFParseError::TruncatedData)?;
        let format_number = read_u16_at(subtable, 0)?;

        let format = match format_number {
            0 => Some(CMapFormat::ByteEncoding(Format0::new(subtable)?)),
            4 => Some(CMapFormat::SegmentMapping(Format4::new(subtable)?)),
            6 => Some(CMapFormat::TrimmedTable(Format6::new(subtable)?)),
            12 => Some(CMapFormat::SegmentedCoverage(Format12::new(subtable)?)),
            _ => {
                log::debug!(
                    "Skipping cmap subtable with unsupported format {format_number} \
                     (platform {platform_id}, encoding {platform_specific_id})"
                );
                None
            },
        };

        Ok(Self {
            platform_id,
            platform_specific_id,
            offset,
            format,
        })
    }

    #[must_use]
    pub fn platform_id(&self) -> PlatformID {
        (self.platform_id, self.platform_specific_id).into()
    }

    /// The platform and encoding ids as they are stored in the font
    #[must_use]
    pub fn raw_ids(&self) -> (u16, u16) {
        (self.platform_id, self.platform_specific_id)
    }

    /// Offset of the subtable from the start of the cmap table
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The decoded subtable, or `None` if the font uses a format that is not supported
    #[must_use]
    pub fn format(&self) -> Option<&CMapFormat> {
        self.format.as_ref()
    }

    /// Shortcut for looking up a codepoint, unsupported formats map everything to
    /// [GlyphID::NOTDEF]
    #[must_use]
    pub fn glyph_index(&self, codepoint: u32) -> GlyphID {
        self.format()
            .map(|format| format.glyph_index(codepoint))
            .unwrap_or(GlyphID::NOTDEF)
    }
}

impl fmt::Debug for EncodingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding Table")
            .field("platform_id", &self.platform_id())
            .field("offset", &self.offset())
            .field("format", &self.format().map(CMapFormat::format_number))
            .finish()
    }
}

/// The subtable formats that can be decoded
#[derive(Clone, Debug)]
pub enum CMapFormat {
    ByteEncoding(Format0),
    SegmentMapping(Format4),
    TrimmedTable(Format6),
    SegmentedCoverage(Format12),
}

impl CMapFormat {
    #[must_use]
    pub fn format_number(&self) -> u16 {
        match self {
            Self::ByteEncoding(_) => 0,
            Self::SegmentMapping(_) => 4,
            Self::TrimmedTable(_) => 6,
            Self::SegmentedCoverage(_) => 12,
        }
    }

    /// Find the glyph for a codepoint
    ///
    /// Codepoints that are not covered by the subtable map to [GlyphID::NOTDEF].
    #[must_use]
    pub fn glyph_index(&self, codepoint: u32) -> GlyphID {
        let glyph_id = match self {
            Self::ByteEncoding(format0) => format0.get_glyph_id(codepoint),
            Self::SegmentMapping(format4) => u16::try_from(codepoint)
                .ok()
                .and_then(|codepoint| format4.get_glyph_id(codepoint)),
            Self::TrimmedTable(format6) => format6.get_glyph_id(codepoint),
            Self::SegmentedCoverage(format12) => format12.get_glyph_id(codepoint),
        };

        glyph_id.unwrap_or(GlyphID::NOTDEF)
    }

    /// Call `f` for every codepoint that maps to a glyph other than [GlyphID::NOTDEF]
    pub fn codepoints<F: FnMut(u32)>(&self, mut f: F) {
        let mut emit_if_mapped = |codepoint: u32| {
            if !self.glyph_index(codepoint).is_notdef() {
                f(codepoint);
            }
        };

        match self {
            Self::ByteEncoding(_) => (0..256).for_each(&mut emit_if_mapped),
            Self::SegmentMapping(format4) => {
                format4.codepoints(|codepoint| emit_if_mapped(u32::from(codepoint)))
            },
            Self::TrimmedTable(format6) => {
                let first = u32::from(format6.first_code);
                (first..first + format6.glyph_ids.len() as u32).for_each(&mut emit_if_mapped)
            },
            Self::SegmentedCoverage(format12) => {
                for group in &format12.groups {
                    (group.start_code..=group.end_code).for_each(&mut emit_if_mapped)
                }
            },
        }
    }
}

/// Apple's byte encoding table, a plain array of 256 glyph ids
#[derive(Clone, Debug)]
pub struct Format0 {
    glyph_ids: Vec<u8>,
}

impl Format0 {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        // format, length, language: u16 each
        let glyph_ids = slice_at(data, 6, 256)?.to_vec();
        Ok(Self { glyph_ids })
    }

    #[must_use]
    pub fn get_glyph_id(&self, codepoint: u32) -> Option<GlyphID> {
        let index = usize::try_from(codepoint).ok()?;
        self.glyph_ids
            .get(index)
            .map(|&id| GlyphID::new(u16::from(id)))
    }
}

#[derive(Clone, Debug)]
pub struct Format4 {
    segments: Vec<Format4Segment>,
    glyph_ids: Vec<u16>,
}

#[derive(Clone, Copy, Debug)]
struct Format4Segment {
    start_code: u16,
    end_code: u16,
    id_delta: u16,
    id_range_offset: u16,
}

impl Format4 {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        // Byte layout looks like this:
        // Header        : 14 bytes
        // End Code      : [u16; segcount]
        //                 < 2 byte padding>
        // Start Code    : [u16; segcount]
        // ID Delta      : [u16; segcount]
        // ID Range Offs : [u16; segcount]
        // Glyph IDS     : remaining space
        let length = read_u16_at(data, 2)? as usize;
        let data = if length <= data.len() {
            &data[..length]
        } else {
            // Some fonts get this wrong, the arrays still have to fit into the table though
            log::warn!(
                "format 4 subtable claims to be {length} bytes long but only {} bytes are available",
                data.len()
            );
            data
        };

        let segment_count_x2 = read_u16_at(data, 6)? as usize;
        let segment_count = segment_count_x2 / 2;

        let mut segments = Vec::with_capacity(segment_count);
        for i in 0..segment_count {
            let end_code = read_u16_at(data, 14 + 2 * i)?;
            let start_code = read_u16_at(data, 16 + segment_count_x2 + 2 * i)?;
            let id_delta = read_u16_at(data, 16 + 2 * segment_count_x2 + 2 * i)?;
            let id_range_offset = read_u16_at(data, 16 + 3 * segment_count_x2 + 2 * i)?;

            segments.push(Format4Segment {
                start_code,
                end_code,
                id_delta,
                id_range_offset,
            });
        }

        let glyph_ids = data
            .get(16 + 4 * segment_count_x2..)
            .unwrap_or_default()
            .chunks_exact(2)
            .map(|id| read_u16_at(id, 0))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            glyph_ids,
        })
    }

    #[must_use]
    pub fn get_glyph_id(&self, codepoint: u16) -> Option<GlyphID> {
        // Find the segment containing the glyph index
        let segment_index = self
            .segments()
            .binary_search_by(|segment| {
                if segment.start_code > codepoint {
                    Ordering::Greater
                } else if segment.end_code >= codepoint {
                    Ordering::Equal
                } else {
                    Ordering::Less
                }
            })
            .ok()?;

        let segment = self.segments()[segment_index];

        if segment.id_range_offset == 0 {
            let numeric_id = codepoint.wrapping_add(segment.id_delta);
            return Some(GlyphID(numeric_id));
        }

        // The format abuses pointer arithmetic here: the range offset is relative to
        // the position of the offset itself inside the id range offset array, which
        // is stored right before the glyph ids.
        //
        // Counted in u16 units from the start of the glyph id array, the offset
        // field sits at -(segments - segment_index).
        let delta = (codepoint - segment.start_code) as usize;
        let position = (segment.id_range_offset as usize / 2 + delta)
            .checked_sub(self.segments().len() - segment_index);

        let Some(glyph_id) = position.and_then(|position| self.glyph_ids.get(position)) else {
            log::warn!("format 4 subtable references a glyph id outside of the table for {codepoint:#06x}");
            return None;
        };

        if *glyph_id == 0 {
            return Some(GlyphID::NOTDEF);
        }
        Some(GlyphID(glyph_id.wrapping_add(segment.id_delta)))
    }

    #[inline]
    #[must_use]
    fn segments(&self) -> &[Format4Segment] {
        &self.segments
    }

    /// Call `f` for every codepoint covered by a segment
    pub fn codepoints<F: FnMut(u16)>(&self, mut f: F) {
        for segment in self.segments() {
            // Indicates the final segment
            if segment.start_code == 0xFFFF && segment.end_code == 0xFFFF {
                break;
            }

            for codepoint in segment.start_code..=segment.end_code {
                f(codepoint)
            }
        }
    }
}

/// A dense array of glyph ids for a single range of codepoints
#[derive(Clone, Debug)]
pub struct Format6 {
    first_code: u16,
    glyph_ids: Vec<u16>,
}

impl Format6 {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        let first_code = read_u16_at(data, 6)?;
        let entry_count = read_u16_at(data, 8)? as usize;

        let glyph_ids = slice_at(data, 10, entry_count * 2)?
            .chunks_exact(2)
            .map(|id| read_u16_at(id, 0))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            first_code,
            glyph_ids,
        })
    }

    #[must_use]
    pub fn get_glyph_id(&self, codepoint: u32) -> Option<GlyphID> {
        let index = codepoint.checked_sub(u32::from(self.first_code))? as usize;
        self.glyph_ids.get(index).copied().map(GlyphID)
    }
}

/// Sequential ranges of codepoints that map to sequential glyph ids,
/// the usual way to cover codepoints outside the basic multilingual plane
#[derive(Clone, Debug)]
pub struct Format12 {
    groups: Vec<SequentialMapGroup>,
}

#[derive(Clone, Copy, Debug)]
struct SequentialMapGroup {
    start_code: u32,
    end_code: u32,
    start_glyph_id: u32,
}

impl Format12 {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        // format: u16, reserved: u16, length: u32, language: u32
        let num_groups = read_u32_at(data, 12)? as usize;

        // Validate the count against the data before reserving memory for it
        let group_data = slice_at(data, 16, num_groups.saturating_mul(12))?;

        let groups = group_data
            .chunks_exact(12)
            .map(|group| -> Result<_, TTFParseError> {
                let mut stream = Stream::new(group);
                Ok(SequentialMapGroup {
                    start_code: stream.read()?,
                    end_code: stream.read()?,
                    start_glyph_id: stream.read()?,
                })
            })
            .collect::<Result<Vec<_>, TTFParseError>>()?;

        Ok(Self { groups })
    }

    #[must_use]
    pub fn get_glyph_id(&self, codepoint: u32) -> Option<GlyphID> {
        let group_index = self
            .groups
            .binary_search_by(|group| {
                if group.start_code > codepoint {
                    Ordering::Greater
                } else if group.end_code >= codepoint {
                    Ordering::Equal
                } else {
                    Ordering::Less
                }
            })
            .ok()?;

        let group = self.groups[group_index];
        let glyph_id = group
            .start_glyph_id
            .checked_add(codepoint - group.start_code)?;
        u16::try_from(glyph_id).ok().map(GlyphID)
    }
}
