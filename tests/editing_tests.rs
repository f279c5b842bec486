//! Integration tests for in-place editing and undo/redo.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

mod common;

use common::{click, ctrl, grid, grid_sized, inside, type_into_focus};
use vastgrid::{
    CellPos, CellRect, EditSession, EditState, GridConfig, GridView, Modifiers, PendingWrite,
};

const NONE: Modifiers = Modifiers::NONE;

fn rect() -> CellRect {
    CellRect {
        x: 50.0,
        y: 24.0,
        width: 80.0,
        height: 24.0,
    }
}

#[test]
fn closing_twice_is_a_noop() {
    let mut edit = EditSession::new();
    edit.open(CellPos::new(1, 1), "old", None, rect());
    edit.set_text("new");
    assert_eq!(
        edit.close(true),
        Some(PendingWrite {
            pos: CellPos::new(1, 1),
            value: "new".to_string(),
        })
    );
    assert_eq!(*edit.state(), EditState::Closed);
    assert_eq!(edit.close(true), None);
    assert_eq!(edit.close(false), None);
}

#[test]
fn commit_twice_records_one_entry() {
    let mut g = grid();
    g.begin_edit(Some("x"));
    assert!(g.commit_edit());
    assert!(!g.commit_edit());
    assert_eq!(g.history().len(), 1);
}

#[test]
fn typing_seeds_the_buffer_and_enter_advances() {
    let mut g = grid();
    click(&mut g, CellPos::new(2, 2));
    g.on_key_down("4", NONE);
    assert!(g.is_editing());
    assert_eq!(g.edit_text(), Some("4"));
    g.on_key_down("2", NONE);
    g.on_key_down("Enter", NONE);
    assert!(!g.is_editing());
    assert_eq!(g.cell_value(CellPos::new(2, 2)), "42");
    assert_eq!(g.selection().focus(), CellPos::new(3, 2));
}

#[test]
fn shift_enter_moves_up_and_tab_moves_right() {
    let mut g = grid();
    click(&mut g, CellPos::new(5, 5));
    g.on_key_down("a", NONE);
    g.on_key_down("Enter", Modifiers::shifted());
    assert_eq!(g.selection().focus(), CellPos::new(4, 5));

    g.on_key_down("b", NONE);
    g.on_key_down("Tab", NONE);
    assert_eq!(g.cell_value(CellPos::new(4, 5)), "b");
    assert_eq!(g.selection().focus(), CellPos::new(4, 6));
}

#[test]
fn escape_discards_the_buffer() {
    let mut g = grid();
    type_into_focus(&mut g, "keep");
    g.on_key_down("ArrowUp", NONE);
    g.on_key_down("F2", NONE);
    assert_eq!(g.edit_text(), Some("keep"));
    g.on_key_down("Backspace", NONE);
    g.on_key_down("Escape", NONE);
    assert!(!g.is_editing());
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "keep");
    assert_eq!(g.history().len(), 1);
}

#[test]
fn empty_buffer_deletes_the_value() {
    let mut g = grid();
    type_into_focus(&mut g, "z");
    g.on_key_down("ArrowUp", NONE);
    g.begin_edit(None);
    g.set_edit_text("");
    assert!(g.commit_edit());
    assert!(g.sheet().cells().get(CellPos::new(0, 0)).is_none());
}

#[test]
fn double_click_opens_editor_over_the_cell() {
    let mut g = grid();
    let pos = CellPos::new(3, 4);
    let (x, y) = inside(&g, pos);
    assert!(g.on_double_click(x, y));
    assert!(g.is_editing());
    assert_eq!(g.edit_session().pos(), Some(pos));
    assert_eq!(g.edit_rect(), Some(g.cell_rect(pos)));
}

#[test]
fn click_inside_the_editing_cell_keeps_editing() {
    let mut g = grid();
    g.on_key_down("w", NONE);
    let (x, y) = inside(&g, CellPos::new(0, 0));
    assert!(g.on_pointer_down(x, y, NONE));
    assert!(g.is_editing());
    g.on_pointer_up(x, y, NONE);
}

#[test]
fn scrolling_commits_the_edit() {
    let mut g = grid();
    g.on_key_down("s", NONE);
    assert!(g.on_wheel(0.0, 100.0));
    assert!(!g.is_editing());
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "s");

    g.on_key_down("ArrowDown", NONE);
    g.on_key_down("t", NONE);
    g.on_scroll(0.0, 0.0);
    assert!(!g.is_editing());
    assert_eq!(g.history().len(), 2);
}

#[test]
fn undo_redo_walks_every_snapshot() {
    let mut g = grid();
    let mut snapshots = vec![g.state_json().unwrap()];
    for value in ["a", "b", "c", "d", "e"] {
        type_into_focus(&mut g, value);
        snapshots.push(g.state_json().unwrap());
    }
    // a sixth step overwrites the first cell
    g.on_key_down("Home", NONE);
    for _ in 0..5 {
        g.on_key_down("ArrowUp", NONE);
    }
    g.begin_edit(Some("A"));
    g.commit_edit();
    snapshots.push(g.state_json().unwrap());

    for expected in snapshots.iter().rev().skip(1) {
        assert!(g.undo());
        assert_eq!(&g.state_json().unwrap(), expected);
    }
    assert!(!g.undo());
    for expected in snapshots.iter().skip(1) {
        assert!(g.redo());
        assert_eq!(&g.state_json().unwrap(), expected);
    }
    assert!(!g.redo());
}

#[test]
fn new_command_truncates_redo_tail() {
    let mut g = grid();
    type_into_focus(&mut g, "1");
    type_into_focus(&mut g, "2");
    assert!(g.undo());
    assert!(g.can_redo());
    type_into_focus(&mut g, "3");
    assert!(!g.can_redo());
    assert_eq!(g.cell_value(CellPos::new(1, 0)), "");
    assert_eq!(g.cell_value(CellPos::new(2, 0)), "3");
}

#[test]
fn keyboard_shortcuts_drive_history() {
    let mut g = grid();
    type_into_focus(&mut g, "k");
    assert!(ctrl("z", &mut g));
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "");
    assert!(ctrl("y", &mut g));
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "k");
    ctrl("z", &mut g);
    let shift_cmd = Modifiers {
        shift: true,
        ..Modifiers::with_command()
    };
    assert!(g.on_key_down("Z", shift_cmd));
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "k");
}

#[test]
fn undo_while_editing_commits_first() {
    let mut g = grid();
    type_into_focus(&mut g, "first");
    g.on_key_down("x", NONE);
    assert!(g.undo());
    // the pending edit was committed, then undone
    assert_eq!(g.cell_value(CellPos::new(1, 0)), "");
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "first");
}

#[test]
fn history_capacity_drops_oldest() {
    let mut g = GridView::new(
        GridConfig {
            history_capacity: 3,
            ..GridConfig::default()
        },
        800.0,
        600.0,
    );
    for value in ["1", "2", "3", "4", "5"] {
        type_into_focus(&mut g, value);
    }
    assert_eq!(g.history().len(), 3);
    while g.undo() {}
    // the two oldest writes can no longer be undone
    assert_eq!(g.cell_value(CellPos::new(0, 0)), "1");
    assert_eq!(g.cell_value(CellPos::new(1, 0)), "2");
    assert_eq!(g.cell_value(CellPos::new(2, 0)), "");
}

#[test]
fn delete_key_clears_selection_as_one_step() {
    let mut g = grid_sized(20, 20);
    for value in ["a", "b", "c"] {
        type_into_focus(&mut g, value);
    }
    g.on_key_down("ArrowUp", NONE);
    g.on_key_down("ArrowUp", Modifiers::shifted());
    g.on_key_down("ArrowUp", Modifiers::shifted());
    assert!(g.on_key_down("Delete", NONE));
    assert!(g.sheet().cells().is_empty());
    assert!(g.undo());
    assert_eq!(g.sheet().cells().len(), 3);
}
