use pretty_assertions::assert_eq;
use xlsxmap_model::{
    BorderSide, CellRecord, CellScalar, ImageAsset, ModelError, SheetDescription,
    WorkbookDescription,
};

#[test]
fn sheet_order_follows_json_key_order() {
    let json = r#"{"Zeta": {}, "Alpha": {"cells": []}, "Mid": {"assets": []}}"#;
    let wb = WorkbookDescription::from_json_str(json).expect("parse");

    let names: Vec<_> = wb.sheet_names().collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);

    let from_bytes = WorkbookDescription::from_json_slice(json.as_bytes()).expect("parse bytes");
    assert_eq!(from_bytes, wb);
}

#[test]
fn extractor_payload_is_normalized() {
    let json = r#"{
        "Sales": {
            "cells": [
                {
                    "coordinate": "A1", "row": 1, "col": 1,
                    "value": "Total", "formula": null,
                    "font_bold": true, "font_italic": null, "font_size": 12,
                    "font_name": "Calibri", "font_color": "FF000000",
                    "horizontal_align": "center", "vertical_align": "bottom",
                    "text_rotation": 0,
                    "borders": {"left": {"style": "thin", "color": "FF000000"}},
                    "fill_color": null, "is_merged": false, "merge_range": null,
                    "number_format": "General"
                },
                {"coordinate": "B1", "value": 12.5},
                {"coordinate": "C1", "value": 7},
                {"coordinate": "D1", "value": false, "formula": "=NOT(TRUE)"}
            ],
            "dims": {"cols_letter": {"A": 18.5}, "rows_idx": {"1": 30}},
            "assets": [{"filename": "logo.png", "width": 120, "height": 40, "anchor": "E2"}]
        }
    }"#;

    let wb = WorkbookDescription::from_json_str(json).expect("parse");
    let sheet = wb.sheet("Sales").expect("sheet");

    let mut expected_a1 = CellRecord::new("A1", 1, 1)
        .with_value("Total")
        .with_bold(true)
        .with_font_size(12.0)
        .with_font_name("Calibri")
        .with_font_color("FF000000")
        .with_horizontal_align("center")
        .with_vertical_align("bottom")
        .with_text_rotation(0)
        .with_border("left", BorderSide::new("thin", "FF000000"));
    expected_a1.is_merged = Some(false);
    assert_eq!(sheet.cells[0], expected_a1);

    assert_eq!(sheet.cells[1].value, Some(CellScalar::Float(12.5)));
    assert_eq!(sheet.cells[1].row, None);
    assert_eq!(sheet.cells[2].value, Some(CellScalar::Int(7)));
    assert_eq!(sheet.cells[3].value, Some(CellScalar::Bool(false)));
    assert_eq!(sheet.cells[3].formula_text(), Some("=NOT(TRUE)"));

    assert_eq!(sheet.dims.cols.get("A"), Some(&18.5));
    assert_eq!(sheet.dims.rows.get(&1), Some(&30.0));
    assert_eq!(
        sheet.assets,
        vec![ImageAsset::new("logo.png", 120.0, 40.0, "E2")]
    );
}

#[test]
fn in_memory_builder_matches_json_form() {
    let mut built = WorkbookDescription::new();
    built.push_sheet(
        "Notes",
        SheetDescription::default()
            .with_cell(CellRecord::new("A1", 1, 1).with_value("hi"))
            .with_column_width("A", 10.0)
            .with_row_height(2, 15.0),
    );

    let parsed = WorkbookDescription::from_json_str(
        r#"{"Notes": {
            "cells": [{"coordinate": "A1", "row": 1, "col": 1, "value": "hi"}],
            "dims": {"cols": {"A": 10.0}, "rows": {"2": 15.0}}
        }}"#,
    )
    .expect("parse");

    assert_eq!(built, parsed);
}

#[test]
fn missing_coordinate_is_rejected() {
    let err = WorkbookDescription::from_json_str(r#"{"S": {"cells": [{"row": 1}]}}"#)
        .expect_err("coordinate is required");
    assert!(matches!(err, ModelError::Json(_)));
}
