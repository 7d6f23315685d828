//! End-to-end tests: sheet container bytes in, diff records out.

mod common;

use std::sync::Arc;

use common::{description, sheet_png, strip, BLUE, CLEAR, GREEN, RED};
use icondiff_core::{
    extract, generate_diff, load_sheet, ChangeKind, EncodeConfig, ParseErrorKind, SheetDiff,
    SheetError, Side,
};
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;

fn config() -> EncodeConfig {
    EncodeConfig::default()
}

fn idle_sheet(color: [u8; 4]) -> Vec<u8> {
    let text = description(32, "state = \"idle\"\n\tdirs = 1\n\tframes = 1\n");
    sheet_png(&text, &RgbaImage::from_pixel(32, 32, Rgba(color)))
}

fn records(diff: SheetDiff) -> Vec<(String, ChangeKind)> {
    match diff {
        SheetDiff::Changes(records) => records
            .iter()
            .map(|r| (r.name.clone(), r.kind()))
            .collect(),
        other => panic!("expected changes, got {:?}", other),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_single_idle_state_is_static() {
    let sprites = extract(Some(idle_sheet(RED).as_slice()), &config()).unwrap();

    assert_eq!(sprites.names().collect::<Vec<_>>(), vec!["idle"]);
    let idle = sprites.get("idle").unwrap();
    assert!(!idle.is_animated());
    assert_eq!((idle.width(), idle.height()), (32, 32));
    assert_eq!(&idle.data()[1..4], b"PNG");
}

#[test]
fn test_changed_idle_cell_is_modified() {
    let (before, after) = (idle_sheet(RED), idle_sheet(BLUE));
    let diff = generate_diff(Some(before.as_slice()), Some(after.as_slice()), &config()).unwrap();
    assert_eq!(records(diff), vec![("idle".to_string(), ChangeKind::Modified)]);
}

#[test]
fn test_identical_sheets_have_no_records() {
    let sheet = idle_sheet(GREEN);
    let diff = generate_diff(Some(sheet.as_slice()), Some(sheet.as_slice()), &config()).unwrap();
    assert!(records(diff).is_empty());
}

#[test]
fn test_added_file_yields_added_records() {
    let text = description(4, "state = \"new\"\n");
    let after = sheet_png(&text, &strip(4, &[RED]));
    let diff = generate_diff(None, Some(after.as_slice()), &config()).unwrap();
    assert_eq!(records(diff), vec![("new".to_string(), ChangeKind::Added)]);
}

#[test]
fn test_removed_file_yields_removed_records() {
    let diff = generate_diff(Some(idle_sheet(RED).as_slice()), None, &config()).unwrap();
    assert_eq!(records(diff), vec![("idle".to_string(), ChangeKind::Removed)]);
}

#[test]
fn test_metadata_only_change_is_detected() {
    // Same pixels, but the second sheet animates them.
    let pixels = strip(4, &[RED, GREEN]);
    let before = sheet_png(&description(4, "state = \"a\"\nstate = \"b\"\n"), &pixels);
    let after = sheet_png(
        &description(4, "state = \"a\"\n\tframes = 2\n\tdelay = 1,1\n"),
        &pixels,
    );

    let diff = generate_diff(Some(before.as_slice()), Some(after.as_slice()), &config()).unwrap();
    assert_eq!(
        records(diff),
        vec![
            ("a".to_string(), ChangeKind::Modified),
            ("b".to_string(), ChangeKind::Removed),
        ]
    );
}

// ============================================================================
// Extraction properties
// ============================================================================

#[test]
fn test_extraction_is_idempotent() {
    let text = description(
        4,
        "state = \"walk\"\n\tdirs = 4\n\tframes = 2\n\tdelay = 1,2\nstate = \"idle\"\n",
    );
    let colors: Vec<[u8; 4]> = (0..9u8).map(|i| [i * 20, 255 - i * 20, i, 255]).collect();
    let sheet = sheet_png(&text, &strip(4, &colors));

    let first = extract(Some(sheet.as_slice()), &config()).unwrap();
    let second = extract(Some(sheet.as_slice()), &config()).unwrap();

    let fingerprints = |map: &icondiff_core::SpriteMap| -> Vec<(String, String)> {
        map.iter()
            .map(|(name, art)| (name.to_string(), art.fingerprint().to_string()))
            .collect()
    };
    assert_eq!(fingerprints(&first), fingerprints(&second));
}

#[test]
fn test_equal_sprites_share_an_instance() {
    let text = description(4, "state = \"one\"\nstate = \"two\"\nstate = \"three\"\n");
    let sheet = sheet_png(&text, &strip(4, &[RED, BLUE, RED]));
    let sprites = extract(Some(sheet.as_slice()), &config()).unwrap();

    let one = sprites.get("one").unwrap();
    let two = sprites.get("two").unwrap();
    let three = sprites.get("three").unwrap();
    assert!(Arc::ptr_eq(one, three));
    assert!(!Arc::ptr_eq(one, two));
}

#[test]
fn test_duplicate_state_names() {
    let text = description(4, "state = \"walk\"\nstate = \"walk\"\n");
    let sheet = sheet_png(&text, &strip(4, &[RED, BLUE]));
    let sprites = extract(Some(sheet.as_slice()), &config()).unwrap();
    assert_eq!(sprites.names().collect::<Vec<_>>(), vec!["walk", "walk-2"]);
}

#[test]
fn test_sides_do_not_share_instances() {
    let sheet = idle_sheet(RED);
    let before = extract(Some(sheet.as_slice()), &config()).unwrap();
    let after = extract(Some(sheet.as_slice()), &config()).unwrap();
    let (a, b) = (before.get("idle").unwrap(), after.get("idle").unwrap());
    assert!(!Arc::ptr_eq(a, b));
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_rewind_animation_encodes_ping_pong() {
    let text = description(
        4,
        "state = \"blink\"\n\tframes = 3\n\tdelay = 1,2\n\trewind = 1\n\tloop = 2\n",
    );
    let sheet = sheet_png(&text, &strip(4, &[RED, GREEN, BLUE]));
    let sprites = extract(Some(sheet.as_slice()), &config()).unwrap();
    let blink = sprites.get("blink").unwrap();
    assert!(blink.is_animated());
    assert_eq!(blink.frame_count(), 4);

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(blink.data()).unwrap();
    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        delays.push(frame.delay);
    }
    assert_eq!(delays, vec![10, 20, 20, 20]);
    assert_eq!(decoder.repeat(), gif::Repeat::Finite(2));
}

#[test]
fn test_animation_without_loop_repeats_forever() {
    let text = description(4, "state = \"spin\"\n\tframes = 2\n");
    let sheet = sheet_png(&text, &strip(4, &[RED, GREEN]));
    let sprites = extract(Some(sheet.as_slice()), &config()).unwrap();
    let spin = sprites.get("spin").unwrap();

    let mut decoder = gif::DecodeOptions::new().read_info(spin.data()).unwrap();
    while decoder.read_next_frame().unwrap().is_some() {}
    assert_eq!(decoder.repeat(), gif::Repeat::Infinite);
}

#[test]
fn test_loop_zero_differs_from_absent_loop() {
    let looped = description(4, "state = \"spin\"\n\tframes = 2\n\tloop = 0\n");
    let endless = description(4, "state = \"spin\"\n\tframes = 2\n");
    let raster = strip(4, &[RED, GREEN]);

    let looped = extract(Some(sheet_png(&looped, &raster).as_slice()), &config()).unwrap();
    let endless = extract(Some(sheet_png(&endless, &raster).as_slice()), &config()).unwrap();
    let looped = looped.get("spin").unwrap();
    let endless = endless.get("spin").unwrap();
    assert_ne!(looped.fingerprint(), endless.fingerprint());

    let mut decoder = gif::DecodeOptions::new().read_info(looped.data()).unwrap();
    while decoder.read_next_frame().unwrap().is_some() {}
    assert_eq!(decoder.repeat(), gif::Repeat::Finite(0));
}

#[test]
fn test_transparent_cells_are_kept() {
    let text = description(4, "state = \"ghost\"\n");
    let sheet = sheet_png(&text, &strip(4, &[CLEAR]));
    let sprites = extract(Some(sheet.as_slice()), &config()).unwrap();
    let decoded = image::load_from_memory(sprites.get("ghost").unwrap().data())
        .unwrap()
        .to_rgba8();
    assert!(decoded.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn test_load_sheet_exposes_document() {
    let text = description(8, "state = \"a\"\n\tdirs = 4\n\tframes = 1\n");
    let sheet = sheet_png(&text, &RgbaImage::new(32, 8));
    let (document, raster) = load_sheet(&sheet).unwrap();
    assert_eq!(document.states.len(), 1);
    assert_eq!(document.states[0].dirs, 4);
    assert_eq!(raster.dimensions(), (32, 8));
}

// ============================================================================
// Failure classes
// ============================================================================

#[test]
fn test_grammar_error_aborts_the_diff() {
    let bad = sheet_png(&description(4, "state = \"a\"\n\tmovement = 1\n"), &strip(4, &[RED]));
    let good = idle_sheet(RED);
    let err = generate_diff(Some(good.as_slice()), Some(bad.as_slice()), &config()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownKey("movement".to_string()));
}

#[test]
fn test_grammar_error_wins_over_render_failure() {
    let bad = sheet_png(&description(4, "frames = 2\n"), &strip(4, &[RED]));
    let result = generate_diff(Some(&b"not a png"[..]), Some(bad.as_slice()), &config());
    assert!(result.is_err());
}

#[test]
fn test_render_failure_degrades() {
    // The description asks for two cells, the sheet holds one.
    let short = sheet_png(&description(4, "state = \"a\"\n\tframes = 2\n"), &strip(4, &[RED]));
    let good = idle_sheet(RED);
    let diff = generate_diff(Some(good.as_slice()), Some(short.as_slice()), &config()).unwrap();
    match diff {
        SheetDiff::RenderFailed { side, reason } => {
            assert_eq!(side, Side::After);
            assert!(reason.contains("outside"), "unexpected reason: {reason}");
        }
        other => panic!("expected render failure, got {:?}", other),
    }
}

#[test]
fn test_extract_reports_error_class() {
    let err = extract(Some(&b"not a png"[..]), &config()).unwrap_err();
    assert!(err.is_decode());

    let bad = sheet_png(&description(4, "dirs = 4\n"), &strip(4, &[RED]));
    let err = extract(Some(bad.as_slice()), &config()).unwrap_err();
    assert!(matches!(err, SheetError::Parse(_)));
}
