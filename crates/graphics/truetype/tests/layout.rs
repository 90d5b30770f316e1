use math::{AffineTransform, Vec2D};
use truetype::{text_transform, Font, PathSegment, TTFParseError};
use truetype_test_data::{square_font, FontBuilder};

fn is_move(segment: &PathSegment) -> bool {
    matches!(segment, PathSegment::MoveTo(_))
}

fn is_line(segment: &PathSegment) -> bool {
    matches!(segment, PathSegment::LineTo(_))
}

#[test]
fn single_square_glyph() {
    let font = Font::new(&square_font().build()).unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();

    let text = font
        .layout_at("A", encoding, Vec2D::new(0., 0.), 80.)
        .unwrap();
    let segments = text.path.segments();

    assert_eq!(segments.len(), 5);
    assert!(is_move(&segments[0]));
    assert!(segments[1..4].iter().all(is_line));
    assert_eq!(segments[4], PathSegment::Close);

    // 500 units of advance at a scale of 80 / 800
    assert!(text
        .transform
        .translation()
        .approx_eq(Vec2D::new(50., 0.), 1e-4));
}

#[test]
fn glyph_is_scaled_and_flipped() {
    let font = Font::new(&square_font().build()).unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();

    let text = font
        .layout_at("A", encoding, Vec2D::new(10., 100.), 80.)
        .unwrap();
    let bounds = text.path.bounding_box().unwrap();

    assert!(bounds.top_left().approx_eq(Vec2D::new(10., 20.), 1e-4));
    assert!(bounds.bottom_right().approx_eq(Vec2D::new(50., 100.), 1e-4));
}

#[test]
fn height_spans_ascent_and_descent() {
    let font = Font::new(
        &FontBuilder::new()
            .glyph(
                vec![vec![
                    (0, -200, true),
                    (300, -200, true),
                    (300, 800, true),
                    (0, 800, true),
                ]],
                300,
            )
            .map('|', 1)
            .build(),
    )
    .unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();
    let hhea = font.horizontal_header_table();

    // A font size equal to the ascent means no scaling
    let text = font
        .layout_at("|", encoding, Vec2D::default(), f32::from(hhea.ascent()))
        .unwrap();
    let height = text.path.bounding_box().unwrap().height();

    assert_eq!(height, (i32::from(hhea.ascent()) + hhea.descent()) as f32);
}

#[test]
fn advances_accumulate() {
    let font = Font::new(&square_font().build()).unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();

    let text = font
        .layout("A A", encoding, AffineTransform::identity())
        .unwrap();

    // The space contributes an advance but no outline
    assert_eq!(text.path.segments().iter().filter(|s| is_move(s)).count(), 2);
    assert_eq!(text.transform.translation(), Vec2D::new(1500., 0.));

    let second_glyph_start = text
        .path
        .segments()
        .iter()
        .filter(|s| is_move(s))
        .nth(1)
        .copied();
    assert_eq!(
        second_glyph_start,
        Some(PathSegment::MoveTo(Vec2D::new(1000., 0.)))
    );
}

#[test]
fn unmapped_characters_use_notdef() {
    let font = Font::new(&square_font().build()).unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();

    let text = font
        .layout("?", encoding, AffineTransform::identity())
        .unwrap();

    // The notdef glyph of the test font is empty and 500 units wide
    assert!(text.path.is_empty());
    assert_eq!(text.transform.translation(), Vec2D::new(500., 0.));
}

#[test]
fn curves_are_preserved() {
    let font = Font::new(
        &FontBuilder::new()
            .glyph(
                vec![vec![
                    (0, 0, true),
                    (100, 200, false),
                    (200, 200, false),
                    (300, 0, true),
                ]],
                300,
            )
            .map('n', 1)
            .build(),
    )
    .unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();

    let text = font
        .layout("n", encoding, AffineTransform::identity())
        .unwrap();
    assert_eq!(
        text.path.segments(),
        &[
            PathSegment::MoveTo(Vec2D::new(0., 0.)),
            PathSegment::QuadraticTo(Vec2D::new(100., 200.), Vec2D::new(150., 200.)),
            PathSegment::QuadraticTo(Vec2D::new(200., 200.), Vec2D::new(300., 0.)),
            PathSegment::Close,
        ]
    );
}

#[test]
fn layout_is_all_or_nothing() {
    // A compound glyph header, which is not supported
    let compound: Vec<u8> = [-1_i16, 0, 0, 100, 100]
        .iter()
        .flat_map(|value| value.to_be_bytes())
        .collect();

    let font = Font::new(
        &square_font()
            .raw_glyph(compound, 100)
            .map('&', 3)
            .build(),
    )
    .unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();

    assert!(matches!(
        font.layout("AA&", encoding, AffineTransform::identity()),
        Err(TTFParseError::UnsupportedGlyphFormat)
    ));
}

#[test]
fn unsupported_encoding_table() {
    let font = Font::new(
        &square_font()
            .cmap_subtable(3, 10, vec![0, 8, 0, 0])
            .build(),
    )
    .unwrap();
    let encoding = font.cmap_table().encoding_table(1).unwrap();

    assert!(matches!(
        font.layout("A", encoding, AffineTransform::identity()),
        Err(TTFParseError::UnsupportedCMapFormat {
            platform: 3,
            encoding: 10
        })
    ));
}

#[test]
fn empty_text() {
    let font = Font::new(&square_font().build()).unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();
    let transform = text_transform(Vec2D::new(5., 5.), 16., 800.);

    let text = font.layout("", encoding, transform).unwrap();
    assert!(text.path.is_empty());
    assert_eq!(text.transform, transform);
}

#[test]
fn svg_output() {
    let font = Font::new(&square_font().build()).unwrap();
    let encoding = font.cmap_table().encoding_table(0).unwrap();

    let text = font
        .layout("A", encoding, AffineTransform::scale(0.5, 0.5))
        .unwrap();
    assert_eq!(
        text.path.to_svg_path_data(),
        "M 0 0 L 200 0 L 200 400 L 0 400 Z"
    );
}
