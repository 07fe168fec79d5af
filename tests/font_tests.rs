use heatstroke_text::font::{FontCatalog, FontError, GlyphMetric};

const DESCRIPTOR: &str = r#"info face="Test Grotesk" size=32 bold=0 italic=0
common lineHeight=36 base=29 scaleW=256 scaleH=128 pages=2 packed=0
page id=0 file="test_0.png"
page id=1 file="test_1.png"
chars count=4
char id=32 x=0 y=0 width=10 height=0 xoffset=0 yoffset=0 xadvance=10 page=0 chnl=15
char id=65 x=16 y=16 width=20 height=24 xoffset=0 yoffset=0 xadvance=20 page=0 chnl=15
char id=66 x=48 y=16 width=18 height=24 xoffset=0 yoffset=0 xadvance=18 page=0 chnl=15
char id=67 x=80 y=16 width=12 height=20 xoffset=0 yoffset=0 xadvance=12 page=1 chnl=15
"#;

fn catalog() -> FontCatalog {
    FontCatalog::parse(DESCRIPTOR, "textures").expect("descriptor should parse")
}

#[test]
fn parses_name_size_and_counts() {
    let font = catalog();
    assert_eq!(font.name(), "Test Grotesk");
    assert_eq!(font.point_size(), 32);
    assert_eq!(font.glyph_count(), 4);
    assert_eq!(font.page_count(), 2);
}

#[test]
fn catalog_is_debug_printable() {
    // unwrap_err on Result<FontCatalog, _> needs the Debug impl.
    let rendered = format!("{:?}", catalog());
    assert!(rendered.contains("Test Grotesk"), "got {rendered}");
}

#[test]
fn uv_rect_is_normalized_and_y_flipped() {
    let font = catalog();
    let a = font.mapping('A');
    assert!((a.uv_left - 16.0 / 256.0).abs() < 1e-6);
    assert!((a.uv_right - 36.0 / 256.0).abs() < 1e-6);
    assert!((a.uv_top - 112.0 / 128.0).abs() < 1e-6);
    assert!((a.uv_bottom - 88.0 / 128.0).abs() < 1e-6);
}

#[test]
fn uv_top_never_below_bottom() {
    let font = catalog();
    for c in [' ', 'A', 'B', 'C'] {
        let glyph = font.mapping(c);
        assert!(
            glyph.uv_top >= glyph.uv_bottom,
            "glyph '{}' violates the Y-flip invariant",
            c
        );
    }
}

#[test]
fn unmapped_characters_are_zero_not_errors() {
    let font = catalog();
    assert_eq!(font.mapping('z'), GlyphMetric::ZERO);
    assert_eq!(font.char_width('z'), 0.0);
    assert_eq!(font.char_height('z'), 0.0);
    assert_eq!(font.page_for_char('z'), None);
}

#[test]
fn page_paths_are_joined_onto_texture_dir() {
    let font = catalog();
    let path = font.page_path(0).expect("page 0 registered");
    assert!(path.ends_with("textures/test_0.png"), "got {path:?}");
    assert!(font.page_path(7).is_none());
}

#[test]
fn char_record_before_common_is_rejected() {
    let source = "\
char id=65 x=16 y=16 width=20 height=24 xoffset=0 yoffset=0 xadvance=20 page=0 chnl=15
common lineHeight=36 base=29 scaleW=256 scaleH=128 pages=1 packed=0
";
    let err = FontCatalog::parse(source, ".").unwrap_err();
    assert!(matches!(err, FontError::MissingCommon { line: 1 }));
}

#[test]
fn empty_descriptor_is_rejected() {
    assert!(matches!(
        FontCatalog::parse("", "."),
        Err(FontError::Empty)
    ));
    assert!(matches!(
        FontCatalog::parse("   \n\t\n", "."),
        Err(FontError::Empty)
    ));
}

#[test]
fn unreadable_descriptor_is_rejected() {
    let err = FontCatalog::load("no/such/font.fnt", ".").unwrap_err();
    assert!(matches!(err, FontError::Io { .. }));
}

#[test]
fn tolerates_variable_spacing() {
    let source = "\
info   face=\"Squeezed\"    size=16
common  lineHeight=20   base=16  scaleW=64   scaleH=64  pages=1
page  id=0   file=\"squeezed_0.png\"
char  id=88   x=4  y=4   width=8  height=8  xoffset=0  yoffset=0  xadvance=8  page=0  chnl=15
";
    let font = FontCatalog::parse(source, ".").expect("spacing should not matter");
    assert_eq!(font.name(), "Squeezed");
    assert_eq!(font.char_width('X'), 8.0);
}

#[test]
fn missing_required_field_is_reported_with_line() {
    let source = "\
common lineHeight=20 base=16 scaleW=64 scaleH=64 pages=1
char id=88 y=4 width=8 height=8 xoffset=0 yoffset=0 xadvance=8 page=0 chnl=15
";
    let err = FontCatalog::parse(source, ".").unwrap_err();
    assert!(matches!(
        err,
        FontError::MissingField { line: 2, field: "x" }
    ));
}

#[test]
fn invalid_glyph_slot_is_skipped() {
    let source = "\
common lineHeight=20 base=16 scaleW=64 scaleH=64 pages=1
char id=-1 x=0 y=0 width=8 height=8 xoffset=0 yoffset=0 xadvance=8 page=0 chnl=15
char id=88 x=4 y=4 width=8 height=8 xoffset=0 yoffset=0 xadvance=8 page=0 chnl=15
";
    let font = FontCatalog::parse(source, ".").expect("id=-1 is ignorable");
    assert_eq!(font.glyph_count(), 1);
}

#[test]
fn string_measures_sum_widths_and_max_heights() {
    let font = catalog();
    assert_eq!(font.string_width("AB"), 38.0);
    assert_eq!(font.string_height("AC"), 24.0);
    assert_eq!(font.string_width(""), 0.0);
}
