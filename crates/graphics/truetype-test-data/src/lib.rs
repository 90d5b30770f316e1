//! Synthetic TrueType fonts for tests and benchmarks
//!
//! [FontBuilder] assembles a complete font from a handful of glyph outlines,
//! [BeBuffer] is the big-endian writer used to lay out the individual tables.

/// Values that can be written to a [BeBuffer]
pub trait BeBytes {
    fn write_be(&self, data: &mut Vec<u8>);
}

macro_rules! impl_be_bytes {
    ($($t: ty),*) => {
        $(
            impl BeBytes for $t {
                fn write_be(&self, data: &mut Vec<u8>) {
                    data.extend_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

impl_be_bytes!(u8, i8, u16, i16, u32, i32);

impl BeBytes for [u8; 4] {
    fn write_be(&self, data: &mut Vec<u8>) {
        data.extend_from_slice(self);
    }
}

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Clone, Debug, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
}

impl BeBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current length of the buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a single value to the buffer.
    #[must_use]
    pub fn push(mut self, item: impl BeBytes) -> Self {
        item.write_be(&mut self.data);
        self
    }

    /// Write multiple values to the buffer.
    #[must_use]
    pub fn extend<T: BeBytes>(mut self, items: impl IntoIterator<Item = T>) -> Self {
        for item in items {
            item.write_be(&mut self.data);
        }
        self
    }

    /// Append raw bytes without any conversion.
    #[must_use]
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// A point of a glyph outline: `(x, y, on curve)`
pub type Point = (i16, i16, bool);

#[derive(Clone, Debug)]
enum GlyphData {
    Simple(Vec<Vec<Point>>),

    /// Written to the glyf table as is
    Raw(Vec<u8>),
}

#[derive(Clone, Debug)]
struct Glyph {
    data: GlyphData,
    advance_width: u16,
    left_side_bearing: i16,
}

/// Builds a minimal but complete TrueType font in memory
///
/// Glyph 0 is always the (empty) notdef glyph. Character mappings are written
/// into a single format 4 subtable for platform 3, encoding 1.
#[derive(Clone, Debug)]
pub struct FontBuilder {
    version: u32,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    line_gap: i16,
    max_advance_width: Option<u16>,
    num_long_metrics: Option<u16>,
    long_loca: bool,
    include_maxp: bool,
    glyphs: Vec<Glyph>,
    mappings: Vec<(u16, u16)>,
    extra_cmap_subtables: Vec<(u16, u16, Vec<u8>)>,
    family_name: Option<String>,
    full_name: Option<String>,
    replaced_tables: Vec<([u8; 4], Vec<u8>)>,
    removed_tables: Vec<[u8; 4]>,
}

impl Default for FontBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBuilder {
    /// A font with ascent 800, descent 200 and 1000 units per em
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: 0x0001_0000,
            units_per_em: 1000,
            ascent: 800,
            descent: -200,
            line_gap: 0,
            max_advance_width: None,
            num_long_metrics: None,
            long_loca: false,
            include_maxp: true,
            glyphs: vec![Glyph {
                data: GlyphData::Simple(vec![]),
                advance_width: 500,
                left_side_bearing: 0,
            }],
            mappings: vec![],
            extra_cmap_subtables: vec![],
            family_name: None,
            full_name: None,
            replaced_tables: vec![],
            removed_tables: vec![],
        }
    }

    #[must_use]
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn ascent(mut self, ascent: i16) -> Self {
        self.ascent = ascent;
        self
    }

    /// The descent as it is stored in the font, usually negative
    #[must_use]
    pub fn descent(mut self, descent: i16) -> Self {
        self.descent = descent;
        self
    }

    #[must_use]
    pub fn line_gap(mut self, line_gap: i16) -> Self {
        self.line_gap = line_gap;
        self
    }

    /// Defaults to the widest glyph
    #[must_use]
    pub fn max_advance_width(mut self, max_advance_width: u16) -> Self {
        self.max_advance_width = Some(max_advance_width);
        self
    }

    /// Store only the first `count` advance widths, defaults to one per glyph
    #[must_use]
    pub fn num_long_metrics(mut self, count: u16) -> Self {
        self.num_long_metrics = Some(count);
        self
    }

    #[must_use]
    pub fn long_loca(mut self) -> Self {
        self.long_loca = true;
        self
    }

    #[must_use]
    pub fn without_maxp(mut self) -> Self {
        self.include_maxp = false;
        self
    }

    /// Add a simple glyph, its id is the number of glyphs added before it plus one
    #[must_use]
    pub fn glyph(mut self, contours: Vec<Vec<Point>>, advance_width: u16) -> Self {
        let left_side_bearing = contours
            .iter()
            .flatten()
            .map(|point| point.0)
            .min()
            .unwrap_or(0);

        self.glyphs.push(Glyph {
            data: GlyphData::Simple(contours),
            advance_width,
            left_side_bearing,
        });
        self
    }

    /// Add a glyph with arbitrary data in the glyf table
    #[must_use]
    pub fn raw_glyph(mut self, data: Vec<u8>, advance_width: u16) -> Self {
        self.glyphs.push(Glyph {
            data: GlyphData::Raw(data),
            advance_width,
            left_side_bearing: 0,
        });
        self
    }

    /// Map a character to a glyph
    ///
    /// # Panics
    /// Panics if `c` is outside of the basic multilingual plane.
    #[must_use]
    pub fn map(mut self, c: char, glyph_id: u16) -> Self {
        let codepoint = u16::try_from(u32::from(c)).expect("only the BMP can be mapped");
        self.mappings.push((codepoint, glyph_id));
        self
    }

    /// Add another cmap subtable after the format 4 one
    #[must_use]
    pub fn cmap_subtable(mut self, platform_id: u16, encoding_id: u16, data: Vec<u8>) -> Self {
        self.extra_cmap_subtables
            .push((platform_id, encoding_id, data));
        self
    }

    #[must_use]
    pub fn family_name(mut self, name: &str) -> Self {
        self.family_name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn full_name(mut self, name: &str) -> Self {
        self.full_name = Some(name.to_string());
        self
    }

    /// Use `data` instead of the generated table, or add a table that is not generated
    #[must_use]
    pub fn table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.replaced_tables.push((*tag, data));
        self
    }

    #[must_use]
    pub fn without_table(mut self, tag: &[u8; 4]) -> Self {
        self.removed_tables.push(*tag);
        self
    }

    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let (glyf, loca) = self.glyf_and_loca();

        let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"cmap", self.cmap()),
            (*b"glyf", glyf),
            (*b"head", self.head()),
            (*b"hhea", self.hhea()),
            (*b"hmtx", self.hmtx()),
            (*b"loca", loca),
        ];

        if self.include_maxp {
            tables.push((*b"maxp", self.maxp()));
        }

        if self.family_name.is_some() || self.full_name.is_some() {
            tables.push((*b"name", self.name()));
        }

        for (tag, data) in &self.replaced_tables {
            match tables.iter_mut().find(|(existing, _)| existing == tag) {
                Some(table) => table.1 = data.clone(),
                None => tables.push((*tag, data.clone())),
            }
        }
        tables.retain(|(tag, _)| !self.removed_tables.contains(tag));
        tables.sort_by_key(|(tag, _)| *tag);

        self.assemble(&tables)
    }

    fn assemble(&self, tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
        let num_tables = tables.len() as u16;
        let entry_selector = num_tables.max(1).ilog2() as u16;
        let search_range: u16 = (1_u16 << entry_selector) * 16;

        let mut font = BeBuffer::new()
            .push(self.version)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push((num_tables * 16).saturating_sub(search_range));

        let mut offset = 12 + tables.len() * 16;
        for (tag, data) in tables {
            font = font
                .push(*tag)
                .push(checksum(data))
                .push(offset as u32)
                .push(data.len() as u32);
            offset += padded_len(data.len());
        }

        for (_, data) in tables {
            font = font
                .bytes(data)
                .bytes(&[0; 3][..padded_len(data.len()) - data.len()]);
        }

        font.into_vec()
    }

    fn widest_glyph(&self) -> u16 {
        self.glyphs
            .iter()
            .map(|glyph| glyph.advance_width)
            .max()
            .unwrap_or(0)
    }

    fn bounding_box(&self) -> (i16, i16, i16, i16) {
        let points = self.glyphs.iter().flat_map(|glyph| match &glyph.data {
            GlyphData::Simple(contours) => contours.iter().flatten().copied().collect(),
            GlyphData::Raw(_) => vec![],
        });

        points.fold((0, 0, 0, 0), |(min_x, min_y, max_x, max_y), (x, y, _)| {
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        })
    }

    fn head(&self) -> Vec<u8> {
        let (min_x, min_y, max_x, max_y) = self.bounding_box();

        BeBuffer::new()
            .push(0x0001_0000_u32) // version
            .push(0x0001_0000_u32) // font revision
            .push(0_u32) // checksum adjustment
            .push(0x5F0F_3CF5_u32) // magic number
            .push(0_u16) // flags
            .push(self.units_per_em)
            .extend([0_u32; 4]) // created & modified
            .extend([min_x, min_y, max_x, max_y])
            .push(0_u16) // mac style
            .push(8_u16) // lowest readable size
            .push(2_i16) // font direction hint
            .push(i16::from(self.long_loca))
            .push(0_i16) // glyph data format
            .into_vec()
    }

    fn maxp(&self) -> Vec<u8> {
        BeBuffer::new()
            .push(0x0000_5000_u32)
            .push(self.glyphs.len() as u16)
            .into_vec()
    }

    fn hhea(&self) -> Vec<u8> {
        let max_advance_width = self
            .max_advance_width
            .unwrap_or_else(|| self.widest_glyph());

        BeBuffer::new()
            .push(0x0001_0000_u32)
            .push(self.ascent)
            .push(self.descent)
            .push(self.line_gap)
            .push(max_advance_width)
            .extend([0_i16; 3]) // bearings and extent
            .push(1_i16) // caret slope rise
            .push(0_i16) // caret slope run
            .extend([0_i16; 6]) // caret offset, reserved and metric data format
            .push(self.long_metric_count())
            .into_vec()
    }

    fn long_metric_count(&self) -> u16 {
        self.num_long_metrics
            .unwrap_or(self.glyphs.len() as u16)
    }

    fn hmtx(&self) -> Vec<u8> {
        let num_long_metrics = self.long_metric_count() as usize;
        let mut hmtx = BeBuffer::new();

        for (index, glyph) in self.glyphs.iter().enumerate() {
            if index < num_long_metrics {
                hmtx = hmtx.push(glyph.advance_width);
            }
            hmtx = hmtx.push(glyph.left_side_bearing);
        }
        hmtx.into_vec()
    }

    fn glyf_and_loca(&self) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = vec![];
        let mut offsets = vec![0];

        for glyph in &self.glyphs {
            match &glyph.data {
                GlyphData::Simple(contours) => glyf.extend(encode_simple_glyph(contours)),
                GlyphData::Raw(data) => glyf.extend_from_slice(data),
            }

            // Short offsets can only address even positions
            if glyf.len() % 2 == 1 {
                glyf.push(0);
            }
            offsets.push(glyf.len());
        }

        let loca = if self.long_loca {
            BeBuffer::new().extend(offsets.iter().map(|&offset| offset as u32))
        } else {
            BeBuffer::new().extend(offsets.iter().map(|&offset| (offset / 2) as u16))
        };

        (glyf, loca.into_vec())
    }

    fn cmap(&self) -> Vec<u8> {
        let mut subtables = vec![(3, 1, format4(&self.mappings))];
        subtables.extend(self.extra_cmap_subtables.iter().cloned());

        let mut cmap = BeBuffer::new()
            .push(0_u16)
            .push(subtables.len() as u16);

        let mut offset = 4 + subtables.len() * 8;
        for (platform_id, encoding_id, data) in &subtables {
            cmap = cmap
                .push(*platform_id)
                .push(*encoding_id)
                .push(offset as u32);
            offset += data.len();
        }

        for (_, _, data) in &subtables {
            cmap = cmap.bytes(data);
        }
        cmap.into_vec()
    }

    fn name(&self) -> Vec<u8> {
        let records: Vec<(u16, Vec<u8>)> = [(1, &self.family_name), (4, &self.full_name)]
            .into_iter()
            .filter_map(|(name_id, name)| {
                let name = name.as_ref()?;
                Some((name_id, name.encode_utf16().flat_map(u16::to_be_bytes).collect()))
            })
            .collect();

        let mut name = BeBuffer::new()
            .push(0_u16)
            .push(records.len() as u16)
            .push((6 + records.len() * 12) as u16);

        let mut offset = 0;
        for (name_id, value) in &records {
            name = name
                .push(3_u16) // windows
                .push(1_u16) // unicode BMP
                .push(0x0409_u16) // english
                .push(*name_id)
                .push(value.len() as u16)
                .push(offset as u16);
            offset += value.len();
        }

        for (_, value) in &records {
            name = name.bytes(value);
        }
        name.into_vec()
    }
}

/// Encode a glyph without any compression, every coordinate is a 16 bit delta
#[must_use]
pub fn encode_simple_glyph(contours: &[Vec<Point>]) -> Vec<u8> {
    let points: Vec<Point> = contours.iter().flatten().copied().collect();
    let (min_x, min_y, max_x, max_y) = points.iter().fold(
        (0, 0, 0, 0),
        |(min_x, min_y, max_x, max_y), &(x, y, _)| {
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        },
    );

    let mut glyph = BeBuffer::new()
        .push(contours.len() as i16)
        .extend([min_x, min_y, max_x, max_y]);

    let mut end_point = 0_u16;
    for contour in contours {
        end_point += contour.len() as u16;
        glyph = glyph.push(end_point - 1);
    }

    if points.is_empty() {
        return glyph.into_vec();
    }

    // No instructions
    glyph = glyph
        .push(0_u16)
        .extend(points.iter().map(|&(_, _, on_curve)| u8::from(on_curve)));

    let x_deltas = points
        .iter()
        .scan(0_i16, |previous, &(x, _, _)| Some(x - std::mem::replace(previous, x)));
    let x_deltas: Vec<i16> = x_deltas.collect();
    let y_deltas: Vec<i16> = points
        .iter()
        .scan(0_i16, |previous, &(_, y, _)| Some(y - std::mem::replace(previous, y)))
        .collect();

    glyph.extend(x_deltas).extend(y_deltas).into_vec()
}

/// A format 4 cmap subtable with one segment per mapping
#[must_use]
pub fn format4(mappings: &[(u16, u16)]) -> Vec<u8> {
    let mut mappings = mappings.to_vec();
    mappings.sort_unstable();
    mappings.dedup_by_key(|(codepoint, _)| *codepoint);

    // The last segment has to map 0xFFFF
    let mut segments: Vec<(u16, u16, u16)> = mappings
        .iter()
        .filter(|(codepoint, _)| *codepoint != 0xFFFF)
        .map(|&(codepoint, glyph_id)| (codepoint, codepoint, glyph_id.wrapping_sub(codepoint)))
        .collect();
    segments.push((0xFFFF, 0xFFFF, 1));

    let segment_count = segments.len() as u16;
    let entry_selector = segment_count.ilog2() as u16;
    let search_range: u16 = 2 * (1_u16 << entry_selector);

    BeBuffer::new()
        .push(4_u16) // format
        .push(16 + 8 * segment_count) // length
        .push(0_u16) // language
        .push(segment_count * 2)
        .push(search_range)
        .push(entry_selector)
        .push(segment_count * 2 - search_range)
        .extend(segments.iter().map(|segment| segment.1))
        .push(0_u16) // padding
        .extend(segments.iter().map(|segment| segment.0))
        .extend(segments.iter().map(|segment| segment.2))
        .extend(segments.iter().map(|_| 0_u16))
        .into_vec()
}

/// The checksum stored in the table directory
#[must_use]
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0_u32, |sum, chunk| {
        let mut word = [0; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn padded_len(len: usize) -> usize {
    len.next_multiple_of(4)
}

/// The font used in most tests: ascent 800, descent 200 and a 400x800 `A`
///
/// Glyph 1 is the `A`, glyph 2 an empty space. Only the notdef glyph stores
/// its advance, every glyph is 500 units wide.
#[must_use]
pub fn square_font() -> FontBuilder {
    FontBuilder::new()
        .max_advance_width(600)
        .num_long_metrics(1)
        .glyph(
            vec![vec![
                (0, 0, true),
                (400, 0, true),
                (400, 800, true),
                (0, 800, true),
            ]],
            500,
        )
        .glyph(vec![], 500)
        .map('A', 1)
        .map(' ', 2)
}
