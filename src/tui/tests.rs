// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, style::Color, Terminal};
use tokio::sync::mpsc;

use super::{demo_table, draw, footer_help_line, table_layout, App, EditorSession};
use crate::bootstrap::{
    host_channel, injection_channel, BootstrapBridge, BridgeConfig, HostHandle, Injector,
};
use crate::layout::{cell_center, CellLookup, OverlayAnchor, Point};
use crate::model::{SelectionState, StateSlot, TableData};
use crate::ops::HistoryPolicy;
use crate::render::{derive_overlay, SvgOptions};
use crate::store::StateFile;

struct Harness {
    app: App,
    base: mpsc::Sender<TableData>,
    dir: tempfile::TempDir,
    injector: Option<Injector>,
    host: Option<HostHandle>,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("temp dir");
    let (injector, loader) = injection_channel();
    let (endpoint, handle) = host_channel();
    let (base_tx, base_rx) = mpsc::channel(1);
    let session = EditorSession {
        policy: HistoryPolicy::default(),
        state_file: StateFile::new(dir.path().join("tableData.json")),
        export_path: dir.path().join("capmap.svg"),
        svg: SvgOptions::default(),
        loader,
        host: endpoint,
        base: base_rx,
    };
    Harness {
        app: App::new(session),
        base: base_tx,
        dir,
        injector: Some(injector),
        host: Some(handle),
    }
}

fn loaded(table: TableData) -> Harness {
    let mut harness = harness();
    harness.base.try_send(table).expect("send base");
    harness.app.poll_background();
    harness
}

fn draw_frame(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
}

fn draw_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn cells_with_background(buffer: &Buffer, color: Color) -> usize {
    buffer.content().iter().filter(|cell| cell.bg == color).count()
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn click(app: &mut App, column: u16, row: u16) {
    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    });
}

fn slot(app: &App, row_index: usize, slot: StateSlot) -> Option<SelectionState> {
    app.table().and_then(|table| table.slot(row_index, slot)).copied()
}

fn toast(app: &App) -> &str {
    app.toast.as_ref().map(|toast| toast.message.as_str()).unwrap_or_default()
}

fn line_to_string(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[test]
fn shows_loading_until_the_base_table_arrives() {
    let mut harness = harness();
    assert!(draw_frame(&mut harness.app, 100, 30).contains("Loading..."));
    assert!(!harness.app.host.is_ready());

    harness.base.try_send(demo_table()).expect("send base");
    harness.app.poll_background();

    assert!(harness.app.host.is_ready());
    let screen = draw_frame(&mut harness.app, 120, 40);
    assert!(!screen.contains("Loading..."));
    assert!(screen.contains("Strategy"));
}

#[test]
fn enter_places_a_marker_at_the_cursor_cell_center() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);

    press(&mut harness.app, KeyCode::Right);
    press(&mut harness.app, KeyCode::Down);
    press(&mut harness.app, KeyCode::Enter);

    let state = slot(&harness.app, 1, StateSlot::Current).expect("current state");
    let grid = &harness.app.grid;
    let expected = grid
        .cell_rect(1, 1)
        .and_then(|rect| cell_center(rect, grid.container()))
        .expect("center");
    assert_eq!(state.cell_index, 1);
    assert_eq!(Point::new(state.x, state.y), expected);
    assert_eq!(slot(&harness.app, 1, StateSlot::Aspirational), None);
}

#[test]
fn header_colors_survive_the_overlay() {
    let mut harness = loaded(demo_table());
    let before = draw_buffer(&mut harness.app, 120, 40);
    let header_cells = cells_with_background(&before, Color::Magenta);
    assert!(header_cells > 0);

    press(&mut harness.app, KeyCode::Enter);
    press(&mut harness.app, KeyCode::Down);
    press(&mut harness.app, KeyCode::Right);
    press(&mut harness.app, KeyCode::Enter);
    let after = draw_buffer(&mut harness.app, 120, 40);

    assert_eq!(cells_with_background(&after, Color::Magenta), header_cells);
    assert_eq!(
        cells_with_background(&after, Color::Green),
        cells_with_background(&before, Color::Green)
    );
    let screen: String = after.content().iter().map(|cell| cell.symbol()).collect();
    assert!(screen.contains('●'));
}

#[test]
fn selection_before_the_first_frame_is_ignored() {
    let mut harness = loaded(demo_table());
    press(&mut harness.app, KeyCode::Enter);

    assert_eq!(slot(&harness.app, 0, StateSlot::Current), None);
    assert!(!harness.app.can_undo());
    assert!(toast(&harness.app).contains("not measurable"));
}

#[test]
fn click_writes_the_slot_of_the_active_mode() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);
    press(&mut harness.app, KeyCode::Char('m'));

    let rect = harness.app.grid.cell_rect(2, 3).expect("cell rect");
    click(&mut harness.app, rect.left as u16 + 1, rect.top as u16 + 1);

    assert_eq!(slot(&harness.app, 2, StateSlot::Aspirational).map(|s| s.cell_index), Some(3));
    assert_eq!(slot(&harness.app, 2, StateSlot::Current), None);
    assert_eq!(harness.app.cursor, (2, 3));
}

#[test]
fn clicks_outside_the_cells_do_nothing() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);
    click(&mut harness.app, 0, 0);
    assert!(!harness.app.can_undo());
}

#[test]
fn undo_steps_back_one_click_at_a_time() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);
    press(&mut harness.app, KeyCode::Enter);
    press(&mut harness.app, KeyCode::Right);
    press(&mut harness.app, KeyCode::Enter);
    assert_eq!(slot(&harness.app, 0, StateSlot::Current).map(|s| s.cell_index), Some(1));

    press(&mut harness.app, KeyCode::Char('u'));
    assert_eq!(slot(&harness.app, 0, StateSlot::Current).map(|s| s.cell_index), Some(0));

    harness.app.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL));
    assert_eq!(slot(&harness.app, 0, StateSlot::Current), None);

    press(&mut harness.app, KeyCode::Char('u'));
    assert_eq!(toast(&harness.app), "Nothing to undo");
}

#[test]
fn save_then_load_restores_the_saved_table() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);
    press(&mut harness.app, KeyCode::Enter);
    let saved = harness.app.table().cloned().expect("table");

    press(&mut harness.app, KeyCode::Char('s'));
    assert!(harness.dir.path().join("tableData.json").is_file());

    press(&mut harness.app, KeyCode::Char('u'));
    assert_eq!(slot(&harness.app, 0, StateSlot::Current), None);

    press(&mut harness.app, KeyCode::Char('o'));
    assert_eq!(harness.app.table(), Some(&saved));
}

#[test]
fn every_applied_edit_advances_the_table_revision() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);
    assert_eq!(harness.app.ui.table_rev(), 0);

    press(&mut harness.app, KeyCode::Enter);
    assert_eq!(harness.app.ui.table_rev(), 1);
    press(&mut harness.app, KeyCode::Char('s'));
    assert_eq!(harness.app.ui.table_rev(), 1);

    press(&mut harness.app, KeyCode::Char('u'));
    assert_eq!(harness.app.ui.table_rev(), 2);
    press(&mut harness.app, KeyCode::Char('u'));
    assert_eq!(harness.app.ui.table_rev(), 2);

    press(&mut harness.app, KeyCode::Char('o'));
    assert_eq!(harness.app.ui.table_rev(), 3);
    assert_eq!(slot(&harness.app, 0, StateSlot::Current).map(|s| s.cell_index), Some(0));
}

#[test]
fn malformed_state_file_leaves_the_table_unchanged() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);
    press(&mut harness.app, KeyCode::Enter);
    let before = harness.app.table().cloned();

    std::fs::write(harness.dir.path().join("tableData.json"), "not json").expect("write");
    press(&mut harness.app, KeyCode::Char('o'));

    assert_eq!(harness.app.table().cloned(), before);
    assert!(toast(&harness.app).starts_with("Load failed"));
}

#[test]
fn export_key_writes_an_svg_document() {
    let mut harness = loaded(demo_table());
    press(&mut harness.app, KeyCode::Char('x'));

    let svg = std::fs::read_to_string(harness.dir.path().join("capmap.svg")).expect("svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Governance"));
}

#[test]
fn overlay_follows_the_cells_after_a_resize() {
    let mut harness = loaded(demo_table());
    draw_frame(&mut harness.app, 120, 40);
    press(&mut harness.app, KeyCode::Enter);
    let cached = slot(&harness.app, 0, StateSlot::Current).expect("state");

    draw_frame(&mut harness.app, 90, 30);

    let app = &harness.app;
    let table = app.table().expect("table");
    let overlay = derive_overlay(table, &app.grid, OverlayAnchor::Container(app.grid.container()));
    let marker = overlay.marker(0, StateSlot::Current).expect("marker");
    let live = app
        .grid
        .cell_rect(0, 0)
        .and_then(|rect| cell_center(rect, app.grid.container()))
        .expect("center");
    assert_eq!(marker.center, live);
    assert_ne!(marker.center, Point::new(cached.x, cached.y));
}

#[test]
fn cursor_stays_inside_the_table() {
    let mut harness = loaded(demo_table());
    press(&mut harness.app, KeyCode::Left);
    press(&mut harness.app, KeyCode::Up);
    assert_eq!(harness.app.cursor, (0, 0));

    for _ in 0..20 {
        press(&mut harness.app, KeyCode::Char('j'));
        press(&mut harness.app, KeyCode::Char('l'));
    }
    assert_eq!(harness.app.cursor, (5, 4));
}

#[test]
fn help_overlay_swallows_keys_until_closed() {
    let mut harness = loaded(demo_table());
    press(&mut harness.app, KeyCode::Char('?'));
    assert!(harness.app.show_help);

    press(&mut harness.app, KeyCode::Char('m'));
    assert_eq!(harness.app.ui.mode(), StateSlot::Current);

    press(&mut harness.app, KeyCode::Esc);
    assert!(!harness.app.show_help);
    assert!(!harness.app.should_quit);

    press(&mut harness.app, KeyCode::Char('q'));
    assert!(harness.app.should_quit);
}

#[test]
fn footer_greys_out_undo_without_history() {
    let mut harness = loaded(demo_table());
    let undo_color = |app: &App| {
        let line = footer_help_line(app, "");
        let position = line.spans.iter().position(|span| span.content == "Undo:").expect("undo");
        line.spans[position + 1].style.fg
    };

    assert!(line_to_string(&footer_help_line(&harness.app, "")).contains("Mode:current"));
    assert_eq!(undo_color(&harness.app), Some(Color::DarkGray));

    draw_frame(&mut harness.app, 120, 40);
    press(&mut harness.app, KeyCode::Enter);
    assert_eq!(undo_color(&harness.app), Some(Color::Cyan));
}

#[test]
fn table_layout_gives_every_cell_a_rect_inside_the_container() {
    let table = demo_table();
    let labels = table.rows.iter().map(|row| row.label.clone()).collect::<Vec<_>>();
    let area = Rect::new(1, 1, 118, 37);
    let layout = table_layout(area, table.row_count(), table.column_count(), &labels);

    assert_eq!(layout.headers.len(), 5);
    assert_eq!(layout.labels.len(), 6);
    assert!(layout.cells.iter().all(|row| row.len() == 5));
    for rect in layout.cells.iter().flatten() {
        assert!(rect.width > 0 && rect.height > 0);
        assert!(area.contains(rect.as_position()));
        assert!(rect.right() <= area.right() && rect.bottom() <= area.bottom());
    }
    assert_eq!(layout.cell_grid().len(), 30);
}

#[tokio::test(start_paused = true)]
async fn bridge_delivery_goes_through_the_load_path() {
    let mut harness = harness();
    let injector = harness.injector.take().expect("injector");
    let host = harness.host.take().expect("host");

    let mut injected = demo_table();
    injected.set_slot(3, StateSlot::Current, SelectionState::new(350.0, 510.0, 0));
    injected.set_slot(3, StateSlot::Aspirational, SelectionState::new(850.0, 510.0, 2));
    let delivery = tokio::spawn(
        BootstrapBridge::new(BridgeConfig::default(), injector, host).deliver(injected.clone()),
    );

    tokio::time::sleep(Duration::from_secs(1)).await;
    harness.app.poll_background();
    assert!(harness.app.table().is_none());

    harness.base.try_send(demo_table()).expect("send base");
    harness.app.poll_background();
    delivery.await.expect("join").expect("deliver");
    harness.app.poll_background();

    assert_eq!(harness.app.table(), Some(&injected));
    assert_eq!(toast(&harness.app), "Loaded state from link");
}
