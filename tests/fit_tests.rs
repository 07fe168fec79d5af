use heatstroke_text::font::FontCatalog;
use heatstroke_text::layout::{fit_to_box, LayoutError};

// space 10 wide, 'A' 20x24, 'B' 18x24, 'C' 12x20
const DESCRIPTOR: &str = r#"info face="Test Grotesk" size=32
common lineHeight=36 base=29 scaleW=256 scaleH=128 pages=2 packed=0
page id=0 file="test_0.png"
page id=1 file="test_1.png"
char id=32 x=0 y=0 width=10 height=0 xoffset=0 yoffset=0 xadvance=10 page=0 chnl=15
char id=65 x=16 y=16 width=20 height=24 xoffset=0 yoffset=0 xadvance=20 page=0 chnl=15
char id=66 x=48 y=16 width=18 height=24 xoffset=0 yoffset=0 xadvance=18 page=0 chnl=15
char id=67 x=80 y=16 width=12 height=20 xoffset=0 yoffset=0 xadvance=12 page=1 chnl=15
"#;

fn catalog() -> FontCatalog {
    FontCatalog::parse(DESCRIPTOR, ".").expect("descriptor should parse")
}

#[test]
fn short_message_is_one_line_at_full_scale() {
    let font = catalog();
    let layout = fit_to_box("AB", 100.0, 100.0, &font).unwrap();
    assert_eq!(layout.lines.len(), 1);
    assert_eq!(layout.scale, 1.0);
    assert_eq!(layout.lines[0].text, "AB");
    assert!((layout.lines[0].width - 38.0).abs() < 1e-4);
    assert!((layout.lines[0].height - 24.0).abs() < 1e-4);
}

#[test]
fn wraps_when_space_separated_words_overflow() {
    // "A A" is 20 + 10 + 20 = 50 wide, so a 45-wide box forces a wrap
    // without any scale reduction.
    let font = catalog();
    let layout = fit_to_box("A A", 45.0, 100.0, &font).unwrap();
    assert_eq!(layout.scale, 1.0);
    assert_eq!(layout.lines.len(), 2);
    assert_eq!(layout.lines[0].text, "A");
    assert_eq!(layout.lines[1].text, "A");
}

#[test]
fn exact_width_still_fits_on_one_line() {
    let font = catalog();
    let layout = fit_to_box("A A", 50.0, 100.0, &font).unwrap();
    assert_eq!(layout.lines.len(), 1);
    assert_eq!(layout.lines[0].text, "A A");
    assert!((layout.lines[0].width - 50.0).abs() < 1e-4);
}

#[test]
fn unfittable_word_fails_at_every_scale() {
    // "AAAAAA" is 120 wide; even at the 0.1 floor it needs 12 > 10.
    let font = catalog();
    let result = fit_to_box("AAAAAA", 10.0, 100.0, &font);
    assert_eq!(result.unwrap_err(), LayoutError::NoFit);
}

#[test]
fn fit_is_idempotent() {
    let font = catalog();
    let first = fit_to_box("A B A B C", 60.0, 80.0, &font).unwrap();
    let second = fit_to_box("A B A B C", 60.0, 80.0, &font).unwrap();
    assert_eq!(first, second);
}

#[test]
fn scale_backs_off_until_width_fits() {
    // "AAA" is 60 wide; 60 * 0.75 = 45 is the first candidate scale that
    // fits a 45-wide box.
    let font = catalog();
    let layout = fit_to_box("AAA", 45.0, 100.0, &font).unwrap();
    assert_eq!(layout.lines.len(), 1);
    assert!(
        (layout.scale - 0.75).abs() < 1e-3,
        "expected 0.75, got {}",
        layout.scale
    );
}

#[test]
fn height_constraint_shrinks_instead_of_wrapping() {
    // A 45x20 box: at large scales "A A" needs two 24-high lines (too
    // tall); shrinking to 0.9 re-joins them into one line but 21.6 is
    // still too tall; 0.8 is the first scale where 24 * 0.8 <= 20.
    let font = catalog();
    let layout = fit_to_box("A A", 45.0, 20.0, &font).unwrap();
    assert_eq!(layout.lines.len(), 1);
    assert!(
        (layout.scale - 0.8).abs() < 1e-3,
        "expected 0.8, got {}",
        layout.scale
    );
}

#[test]
fn empty_message_fits_trivially() {
    let font = catalog();
    let layout = fit_to_box("", 50.0, 50.0, &font).unwrap();
    assert!(layout.lines.is_empty());
    assert_eq!(layout.scale, 1.0);
    assert_eq!(layout.total_height(), 0.0);
}

#[test]
fn total_height_sums_line_heights() {
    let font = catalog();
    let layout = fit_to_box("A A", 45.0, 100.0, &font).unwrap();
    assert!((layout.total_height() - 48.0).abs() < 1e-4);
}
