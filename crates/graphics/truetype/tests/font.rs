use std::io::Cursor;

use truetype::{
    ttf_tables::{cmap::PlatformID, head::LocaTableFormat},
    Font, GlyphID, TTFParseError, Tag,
};
use truetype_test_data::{square_font, FontBuilder};

#[test]
fn decode_square_font() {
    let font = Font::new(&square_font().build()).unwrap();

    assert_eq!(font.num_glyphs(), 3);
    assert_eq!(font.units_per_em(), 1000);
    assert_eq!(font.horizontal_header_table().ascent(), 800);
    assert_eq!(font.horizontal_header_table().descent(), 200);
    assert_eq!(font.horizontal_header_table().raw_descent(), -200);
    assert_eq!(font.horizontal_header_table().max_advance_width(), 600);
    assert_eq!(font.head_table().loca_table_format(), LocaTableFormat::Short);
    assert_eq!(font.font_family_name(), None);
}

#[test]
fn table_ranges_are_inside_the_font() {
    let data = square_font().family_name("Square").build();
    let font = Font::new(&data).unwrap();

    for entry in font.table_directory().tables() {
        assert!(entry.offset() + entry.length() <= data.len());
        assert_eq!(entry.compute_checksum(&data).unwrap(), entry.checksum());
    }
}

#[test]
fn missing_required_tables() {
    for tag in [b"cmap", b"glyf", b"loca", b"hhea", b"hmtx", b"head"] {
        let data = square_font().without_table(tag).build();

        match Font::new(&data) {
            Err(TTFParseError::TableNotFound(missing)) => assert_eq!(missing, Tag::new(*tag)),
            other => panic!("expected {} to be required, got {other:?}", Tag::new(*tag)),
        }
    }
}

#[test]
fn glyph_count_without_maxp() {
    let font = Font::new(&square_font().without_maxp().build()).unwrap();
    assert_eq!(font.num_glyphs(), 3);
    assert!(font.glyph_table().get_glyph(GlyphID::new(2)).is_ok());
}

#[test]
fn long_loca_offsets() {
    let font = Font::new(&square_font().long_loca().build()).unwrap();
    assert_eq!(font.head_table().loca_table_format(), LocaTableFormat::Long);

    let outline = font.glyph_table().get_glyph(GlyphID::new(1)).unwrap();
    assert_eq!(outline.contours().len(), 1);
    assert_eq!(outline.contours()[0].points().len(), 4);
}

#[test]
fn advance_widths() {
    let font = Font::new(
        &FontBuilder::new()
            .glyph(vec![], 100)
            .glyph(vec![], 200)
            .glyph(vec![], 300)
            .glyph(vec![], 400)
            .num_long_metrics(3)
            .build(),
    )
    .unwrap();
    let hmtx = font.horizontal_metrics_table();

    assert_eq!(hmtx.advance_width(GlyphID::new(0)).unwrap(), 500);
    assert_eq!(hmtx.advance_width(GlyphID::new(1)).unwrap(), 100);
    assert_eq!(hmtx.advance_width(GlyphID::new(2)).unwrap(), 200);

    // Everything after the last long metric shares its advance
    for glyph in 3..5 {
        assert_eq!(hmtx.advance_width(GlyphID::new(glyph)).unwrap(), 200);
    }

    assert!(matches!(
        hmtx.advance_width(GlyphID::new(5)),
        Err(TTFParseError::GlyphIndexOutOfRange {
            index: 5,
            num_glyphs: 5
        })
    ));
}

#[test]
fn monospaced_font_without_long_metrics() {
    let font = Font::new(
        &square_font()
            .num_long_metrics(0)
            .max_advance_width(640)
            .build(),
    )
    .unwrap();

    for glyph in 0..3 {
        assert_eq!(
            font.horizontal_metrics_table()
                .advance_width(GlyphID::new(glyph))
                .unwrap(),
            640
        );
    }
}

#[test]
fn more_metrics_than_glyphs() {
    assert!(matches!(
        Font::new(&square_font().num_long_metrics(4).build()),
        Err(TTFParseError::InvalidMetrics(_))
    ));
}

#[test]
fn zero_ascent() {
    assert!(matches!(
        Font::new(&square_font().ascent(0).build()),
        Err(TTFParseError::InvalidMetrics(_))
    ));
}

#[test]
fn cff_fonts_are_rejected() {
    let otto = u32::from_be_bytes(*b"OTTO");
    assert!(matches!(
        Font::new(&square_font().version(otto).build()),
        Err(TTFParseError::InvalidSignature(version)) if version == otto
    ));
}

#[test]
fn truncated_fonts() {
    let data = square_font().build();

    for len in [0, 8, 12, 40, data.len() - 4] {
        assert!(
            matches!(Font::new(&data[..len]), Err(TTFParseError::TruncatedData)),
            "font truncated to {len} bytes was accepted"
        );
    }
}

#[test]
fn character_mapping() {
    let font = Font::new(&square_font().build()).unwrap();
    let cmap = font.cmap_table();

    assert_eq!(cmap.num_encoding_tables(), 1);
    let encoding = cmap.encoding_table(0).unwrap();
    assert!(matches!(encoding.platform_id(), PlatformID::Microsoft(_)));

    let format = encoding.format().unwrap();
    assert_eq!(format.format_number(), 4);
    assert_eq!(format.glyph_index('A' as u32), GlyphID::new(1));
    assert_eq!(format.glyph_index(' ' as u32), GlyphID::new(2));

    // Unmapped characters are not an error
    assert_eq!(format.glyph_index('B' as u32), GlyphID::NOTDEF);
    assert_eq!(format.glyph_index(0x1F600), GlyphID::NOTDEF);

    assert!(cmap.unicode_table().is_some());
    assert!(matches!(
        cmap.encoding_table(1),
        Err(TTFParseError::IndexOutOfRange { index: 1, len: 1 })
    ));
}

#[test]
fn unsupported_cmap_formats_are_kept() {
    // A format 2 subtable with an empty body
    let format2 = vec![0, 2, 0, 6, 0, 0];
    let font = Font::new(&square_font().cmap_subtable(1, 0, format2).build()).unwrap();

    let encoding = font.cmap_table().encoding_table(1).unwrap();
    assert_eq!(encoding.raw_ids(), (1, 0));
    assert!(encoding.format().is_none());
    assert_eq!(encoding.glyph_index('A' as u32), GlyphID::NOTDEF);
}

#[test]
fn glyph_lookup() {
    let font = Font::new(&square_font().build()).unwrap();
    let glyph_table = font.glyph_table();

    assert_eq!(glyph_table.num_glyphs(), font.num_glyphs());
    assert!(glyph_table.get_glyph(GlyphID::NOTDEF).unwrap().is_empty());
    assert!(glyph_table.get_glyph(GlyphID::new(2)).unwrap().is_empty());

    let metrics = glyph_table.get_glyph(GlyphID::new(1)).unwrap().metrics();
    assert_eq!((metrics.width(), metrics.height()), (400, 800));

    assert!(matches!(
        glyph_table.get_glyph(GlyphID::new(3)),
        Err(TTFParseError::GlyphIndexOutOfRange {
            index: 3,
            num_glyphs: 3
        })
    ));
}

#[test]
fn decoding_is_deterministic() {
    let data = square_font().build();
    let first = Font::new(&data).unwrap();
    let second = Font::new(&data).unwrap();

    for glyph in 0..first.num_glyphs() as u16 {
        let glyph = GlyphID::new(glyph);
        assert_eq!(
            first.glyph_table().get_glyph(glyph).unwrap(),
            second.glyph_table().get_glyph(glyph).unwrap()
        );
        assert_eq!(
            first.horizontal_metrics_table().get_metric_for(glyph).unwrap(),
            second.horizontal_metrics_table().get_metric_for(glyph).unwrap()
        );
    }
}

#[test]
fn font_names() {
    let font = Font::new(
        &square_font()
            .family_name("Square Sans")
            .full_name("Square Sans Bold")
            .build(),
    )
    .unwrap();

    assert_eq!(font.font_family_name(), Some("Square Sans"));
    assert_eq!(font.full_name(), Some("Square Sans Bold"));
}

#[test]
fn broken_name_table_is_ignored() {
    let font = Font::new(&square_font().table(b"name", vec![0, 7]).build()).unwrap();
    assert!(font.name_table().is_none());
    assert_eq!(font.font_family_name(), None);
}

#[test]
fn read_from_source() {
    let data = square_font().build();
    let font = Font::from_reader(Cursor::new(data.clone())).unwrap();
    assert_eq!(font.data(), data.as_slice());
}
