//! Integration tests for record table loading and state persistence.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{grid, grid_sized};
use serde_json::json;
use vastgrid::{CellPos, GridError, GridView};

#[test]
fn three_record_table_fills_header_and_rows() {
    let mut g = grid();
    assert!(g.load_table(&json!([
        {"name": "Ada", "age": 36},
        {"name": "Grace", "age": 85},
        {"name": "Edsger", "age": 72},
    ])));
    let expected = [
        ["name", "age"],
        ["Ada", "36"],
        ["Grace", "85"],
        ["Edsger", "72"],
    ];
    for (row, values) in (0u32..).zip(expected) {
        for (col, value) in (0u32..).zip(values) {
            assert_eq!(g.cell_value(CellPos::new(row, col)), value);
        }
    }
    assert_eq!(g.sheet().cells().len(), 8);
    assert_eq!(
        g.state_json().unwrap(),
        r#"{"0,0":"name","0,1":"age","1,0":"Ada","1,1":"36","2,0":"Grace","2,1":"85","3,0":"Edsger","3,1":"72"}"#
    );
}

#[test]
fn header_order_follows_first_record() {
    let mut g = grid();
    g.load_table_json(r#"[{"zeta": 1, "alpha": 2, "mid": 3}]"#)
        .unwrap();
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "zeta");
    assert_eq!(g.cell_value(CellPos::new(0, 1)), "alpha");
    assert_eq!(g.cell_value(CellPos::new(0, 2)), "mid");
}

#[test]
fn value_coercion() {
    let mut g = grid();
    g.load_table(&json!([
        {"s": "text", "n": 1.5, "b": true, "z": null, "a": [1, 2]},
    ]));
    assert_eq!(g.cell_value(CellPos::new(1, 0)), "text");
    assert_eq!(g.cell_value(CellPos::new(1, 1)), "1.5");
    assert_eq!(g.cell_value(CellPos::new(1, 2)), "true");
    assert_eq!(g.cell_value(CellPos::new(1, 3)), "");
    assert_eq!(g.cell_value(CellPos::new(1, 4)), "[1,2]");
}

#[test]
fn missing_keys_and_non_object_records_leave_gaps() {
    let mut g = grid();
    g.load_table(&json!([
        {"a": 1, "b": 2},
        "not a record",
        {"b": 4, "extra": 5},
    ]));
    assert_eq!(g.cell_value(CellPos::new(1, 1)), "2");
    assert_eq!(g.cell_value(CellPos::new(2, 0)), "");
    assert_eq!(g.cell_value(CellPos::new(3, 0)), "");
    assert_eq!(g.cell_value(CellPos::new(3, 1)), "4");
    // keys not in the header row are ignored
    assert_eq!(g.cell_value(CellPos::new(3, 2)), "");
}

#[test]
fn malformed_tables_are_rejected() {
    let mut g = grid();
    g.load_state_json(r#"{"5,5":"kept"}"#).unwrap();
    for bad in [json!({"a": 1}), json!([]), json!([1, 2]), json!("x")] {
        assert!(!g.load_table(&bad), "{bad}");
    }
    assert!(g.load_table_json("[{").is_err());
    assert_eq!(g.cell_value(CellPos::new(5, 5)), "kept");
}

#[test]
fn table_is_clipped_to_the_grid() {
    let mut g = grid_sized(3, 2);
    g.load_table(&json!([
        {"a": 1, "b": 2, "c": 3},
        {"a": 4, "b": 5, "c": 6},
        {"a": 7, "b": 8, "c": 9},
    ]));
    assert_eq!(g.sheet().cells().len(), 6);
    assert_eq!(g.cell_value(CellPos::new(2, 1)), "5");
}

#[test]
fn load_is_one_undoable_step() {
    let mut g = grid();
    g.load_state_json(r#"{"0,0":"before"}"#).unwrap();
    g.load_table(&json!([{"after": 1}]));
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "after");
    assert!(g.undo());
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "before");
    assert_eq!(g.sheet().cells().len(), 1);
}

#[test]
fn state_restores_into_a_fresh_grid() {
    let mut g = grid();
    g.load_table(&json!([{"k": "v", "n": 2}]));
    let saved = g.state_json().unwrap();

    let mut restored = GridView::with_config_json(r#"{"totalRows": 10}"#, 800.0, 600.0).unwrap();
    assert!(restored.load_state_json(&saved).unwrap());
    assert_eq!(restored.sheet().cells(), g.sheet().cells());
    assert!(restored.load_state_json("[1]").is_err());
    assert!(restored.load_state_json(r#"{"1;1":"x"}"#).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    assert!(GridView::with_config_json(r#"{"totalRows": 0}"#, 800.0, 600.0).is_err());
    assert!(GridView::with_config_json("not json", 800.0, 600.0).is_err());
}

#[test]
fn table_file_loads_and_state_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("records.json");
    std::fs::write(&table, r#"[{"id": 1, "name": "a"}]"#).unwrap();

    let mut g = grid();
    assert!(g.load_table_file(&table).unwrap());
    assert_eq!(g.cell_value(CellPos::new(1, 1)), "a");

    let state = dir.path().join("state.json");
    g.save_state_file(&state).unwrap();
    let mut restored = grid();
    let text = std::fs::read_to_string(&state).unwrap();
    assert!(restored.load_state_json(&text).unwrap());
    assert_eq!(restored.sheet().cells(), g.sheet().cells());
}

#[test]
fn missing_table_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut g = grid();
    let err = g.load_table_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, GridError::Io(_)));
    assert!(g.sheet().cells().is_empty());
}
