use gutterkit_settings::{AccessorySettings, StockSettings};
use gutterkit_takeoff::{expand_with_accessories, MaterialLine, Takeoff, TakeoffItem};

fn line<'a>(lines: &'a [MaterialLine], asset_id: &str) -> &'a MaterialLine {
    lines
        .iter()
        .find(|l| l.asset_id == asset_id)
        .unwrap_or_else(|| panic!("missing line {asset_id}"))
}

#[test]
fn test_runs_are_optimized_independently() {
    // Two 2.9m runs need two 3m pieces, not a merged 5.8m allowance.
    let items = vec![
        TakeoffItem::new("GUT-SC-MAR-3M").with_length(2900),
        TakeoffItem::new("GUT-SC-MAR-3M").with_length(2900),
    ];
    let lines = Takeoff::default().material_lines(&items).unwrap();

    assert_eq!(lines.len(), 1);
    let three = line(&lines, "GUT-SC-MAR-3M");
    assert_eq!(three.quantity, 2);
    assert_eq!(three.length_mm, Some(5800));
    assert!(!three.incomplete);
}

#[test]
fn test_counts_sum_per_profile_and_length() {
    let items = vec![
        TakeoffItem::new("GUT-SC-MAR-5M").with_length(8000),
        TakeoffItem::new("GUT-SC-MAR-3M").with_length(4000),
        TakeoffItem::new("GUT-CL-MAR-3M").with_length(1400),
    ];
    let lines = Takeoff::default().material_lines(&items).unwrap();

    // 8000 -> 5000 + 3000; 4000 -> 3000 + 1500 (4500); 1400 -> 1500
    assert_eq!(line(&lines, "GUT-SC-MAR-5M").quantity, 1);
    assert_eq!(line(&lines, "GUT-SC-MAR-3M").quantity, 2);
    // The family's run length rides on its first line only
    assert_eq!(line(&lines, "GUT-SC-MAR-5M").length_mm, Some(12000));
    assert_eq!(line(&lines, "GUT-SC-MAR-3M").length_mm, None);
    assert_eq!(line(&lines, "GUT-SC-MAR-1.5M").quantity, 1);
    assert_eq!(line(&lines, "GUT-CL-MAR-1.5M").quantity, 1);
    // Storm Cloud lines come before Classic
    assert!(lines[0].asset_id.starts_with("GUT-SC"));
}

#[test]
fn test_unmeasured_gutter_uses_standard_length_and_flags_incomplete() {
    let items = vec![TakeoffItem::new("GUT-CL-MAR-5M")];
    let lines = Takeoff::default().material_lines(&items).unwrap();

    let five = line(&lines, "GUT-CL-MAR-5M");
    assert_eq!(five.quantity, 1);
    assert!(five.incomplete);
}

#[test]
fn test_downpipe_length_only_on_first_line_per_size() {
    let items = vec![TakeoffItem::new("DP-65-3M").with_length(4000)];
    let lines = Takeoff::default().material_lines(&items).unwrap();

    // 4000 -> 3000 + 1500
    assert_eq!(lines[0].asset_id, "DP-65-3M");
    assert_eq!(lines[0].length_mm, Some(4000));
    assert_eq!(lines[1].asset_id, "DP-65-1.5M");
    assert_eq!(lines[1].length_mm, None);
}

#[test]
fn test_custom_stock_from_settings() {
    let settings = StockSettings {
        gutter_lengths_mm: vec![4000],
        downpipe_lengths_mm: vec![3000, 1500],
    };
    let takeoff = Takeoff::from_settings(&settings).unwrap();
    let lines = takeoff
        .material_lines(&[TakeoffItem::new("GUT-SC-MAR-3M").with_length(4500)])
        .unwrap();
    assert_eq!(line(&lines, "GUT-SC-MAR-4M").quantity, 2);
}

#[test]
fn test_full_takeoff_with_accessories() {
    let items = vec![
        TakeoffItem::new("GUT-SC-MAR-5M").with_length(4000),
        TakeoffItem::new("DP-80-3M").with_length(2400),
        TakeoffItem::new("DRP-80"),
    ];
    let lines = Takeoff::default().material_lines(&items).unwrap();
    let expanded = expand_with_accessories(&lines, &AccessorySettings::default());

    // 4000mm gutter -> 11 brackets, 33 screws
    assert_eq!(line(&expanded, "BRK-SC-MAR").quantity, 11);
    // 2400mm downpipe -> 2 saddle clips, 4 screws; 1 dropper -> 4 screws
    assert_eq!(line(&expanded, "SCL-80").quantity, 2);
    assert_eq!(line(&expanded, "SCR-SS").quantity, 33 + 4 + 4);
}

#[test]
fn test_lines_serialize_without_empty_lengths() {
    let items = vec![
        TakeoffItem::new("GUT-SC-MAR-3M").with_length(7000),
        TakeoffItem::new("BRK-SC-MAR"),
    ];
    let lines = Takeoff::default().material_lines(&items).unwrap();
    let json = serde_json::to_value(&lines).unwrap();

    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), lines.len());
    let bracket = entries
        .iter()
        .find(|e| e["asset_id"] == "BRK-SC-MAR")
        .unwrap();
    assert_eq!(bracket["quantity"], 1);
    assert!(bracket.get("length_mm").is_none());
    assert_eq!(bracket["incomplete"], false);

    let back: Vec<MaterialLine> = serde_json::from_value(json).unwrap();
    assert_eq!(back, lines);
}
