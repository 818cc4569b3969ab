use std::sync::Arc;

use gutterkit::{load_config, open_diagram, quote_diagram, AssetKind, EditorConfig, EditorState, Point};
use image::RgbaImage;

fn saved_diagram(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let mut editor = EditorState::default();
    let gutter = editor.place_loaded(
        "GUT-SC-MAR-3M",
        AssetKind::from_asset_id("GUT-SC-MAR-3M"),
        Arc::new(RgbaImage::new(300, 30)),
        Point::new(200.0, 200.0),
    );
    editor.set_measured_length(gutter, 7000);
    let path = dir.path().join("house.json");
    editor.to_diagram().save_to_file(&path).unwrap();
    path
}

#[test]
fn test_quote_saved_diagram() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved_diagram(&dir);

    let plain = quote_diagram(&path, EditorConfig::default(), false).unwrap();
    let ids: Vec<&str> = plain.iter().map(|l| l.asset_id.as_str()).collect();
    assert_eq!(ids, vec!["GUT-SC-MAR-3M", "GUT-SC-MAR-1.5M"]);
    assert_eq!(plain[0].quantity, 2);
    assert_eq!(plain[0].length_mm, Some(7000));

    let full = quote_diagram(&path, EditorConfig::default(), true).unwrap();
    assert!(full.len() > plain.len());
}

#[test]
fn test_open_diagram_restores_elements() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved_diagram(&dir);
    let editor = open_diagram(&path, EditorConfig::default()).unwrap();
    assert_eq!(editor.document().len(), 1);
    assert!(!editor.can_undo());
}

#[test]
fn test_missing_files_report_context() {
    let dir = tempfile::tempdir().unwrap();
    let err = quote_diagram(&dir.path().join("nope.json"), EditorConfig::default(), true).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read diagram file"));

    let err = load_config(Some(&dir.path().join("editor.yaml"))).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load config"));
    assert!(load_config(None).is_ok());
}
