// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The interactive editor (ratatui + crossterm). It waits for the base document, draws the table
//! with its overlay, turns clicks and key presses into selections, and is the host the bootstrap
//! bridge talks to: it reports readiness once a table is loaded and loads whatever file
//! selections arrive through its `HostEndpoint`.

use std::{
    error::Error,
    io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Clear, Paragraph, Wrap,
    },
};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{error, info, warn};

use crate::bootstrap::{HostEndpoint, StateLoader, StateOrigin};
use crate::layout::{cell_center, CellGrid, CellLookup, OverlayAnchor, Point};
use crate::model::{fixtures, StateSlot, TableData};
use crate::ops::{ApplyResult, HistoryPolicy, Op, SelectError, SelectionController};
use crate::render::{dash_segments, derive_overlay, export_svg, Overlay, SvgOptions};
use crate::store::{decode_table, StateFile};
use crate::ui::UiState;

const FOCUS_COLOR: Color = Color::LightGreen;
const GRID_COLOR: Color = Color::DarkGray;
const CELL_TEXT_COLOR: Color = Color::Gray;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const CURRENT_COLOR: Color = Color::Yellow;
const ASPIRATIONAL_COLOR: Color = Color::LightBlue;
const PATH_COLOR: Color = Color::Yellow;
const PAIRING_COLOR: Color = Color::White;
const HEADER_PALETTE: [Color; 5] =
    [Color::Magenta, Color::LightMagenta, Color::Cyan, Color::LightCyan, Color::Green];
const HEADER_HEIGHT: u16 = 2;
const MIN_LABEL_WIDTH: usize = 10;
const MAX_LABEL_WIDTH: usize = 24;
const PAIRING_DASH: f64 = 1.0;
const PAIRING_GAP: f64 = 0.75;
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Everything the editor needs from the outside.
#[derive(Debug)]
pub struct EditorSession {
    pub policy: HistoryPolicy,
    pub state_file: StateFile,
    pub export_path: PathBuf,
    pub svg: SvgOptions,
    pub loader: StateLoader,
    pub host: HostEndpoint,
    /// Delivers the base document once; the editor shows "Loading..." until then.
    pub base: mpsc::Receiver<TableData>,
}

/// The bundled sample map.
pub fn demo_table() -> TableData {
    fixtures::maturity_table()
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(session: EditorSession) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(session);

    while !app.should_quit {
        app.poll_background();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                // The next draw measures the new size.
                Event::Resize(..) => {}
                _ => {}
            }
        }
    }

    info!("editor closed");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let block = Block::default().borders(Borders::ALL).title(main_title(app));
    let inner = block.inner(main_area);
    frame.render_widget(block, main_area);

    match app.controller.as_ref() {
        None => {
            app.grid = CellGrid::default();
            let loading = Paragraph::new("Loading...").alignment(Alignment::Center);
            frame.render_widget(loading, inner);
        }
        Some(controller) => {
            let table = controller.table();
            let labels = table.rows.iter().map(|row| row.label.clone()).collect::<Vec<_>>();
            let layout = table_layout(inner, table.row_count(), table.column_count(), &labels);
            draw_table(frame, app, table, &layout);

            let grid = layout.cell_grid();
            let overlay = derive_overlay(table, &grid, OverlayAnchor::Container(grid.container()));
            draw_overlay(frame, &overlay, &layout);
            app.grid = grid;
        }
    }

    let toast_suffix = match app.toast.as_ref() {
        Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };
    frame.render_widget(Paragraph::new(footer_help_line(app, &toast_suffix)), status_area);

    if app.show_help {
        render_help(frame, main_area);
    }
}

// Table, overlay, footer and help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    controller: Option<SelectionController>,
    policy: HistoryPolicy,
    ui: UiState,
    state_file: StateFile,
    export_path: PathBuf,
    svg: SvgOptions,
    loader: StateLoader,
    host: HostEndpoint,
    base: mpsc::Receiver<TableData>,
    /// Cell rectangles of the last drawn frame.
    grid: CellGrid,
    cursor: (usize, usize),
    toast: Option<Toast>,
    show_help: bool,
    should_quit: bool,
}

impl App {
    fn new(session: EditorSession) -> Self {
        let EditorSession { policy, state_file, export_path, svg, loader, host, base } = session;
        Self {
            controller: None,
            policy,
            ui: UiState::default(),
            state_file,
            export_path,
            svg,
            loader,
            host,
            base,
            grid: CellGrid::default(),
            cursor: (0, 0),
            toast: None,
            show_help: false,
            should_quit: false,
        }
    }

    fn table(&self) -> Option<&TableData> {
        self.controller.as_ref().map(SelectionController::table)
    }

    fn can_undo(&self) -> bool {
        self.controller.as_ref().is_some_and(SelectionController::can_undo)
    }

    /// Picks up the base document and pending file selections.
    fn poll_background(&mut self) {
        if self.controller.is_none() {
            match self.base.try_recv() {
                Ok(table) => self.install_base(table),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {}
            }
        }

        while let Some(selection) = self.host.try_next_selection() {
            self.load_from(Path::new(&selection.name));
        }
    }

    fn install_base(&mut self, table: TableData) {
        info!(rows = table.row_count(), columns = table.column_count(), "base table loaded");
        self.controller = Some(SelectionController::with_policy(table, self.policy));
        self.cursor = (0, 0);
        self.host.set_ready(true);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => self.undo(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('m') | KeyCode::Tab => {
                let mode = self.ui.toggle_mode();
                self.set_toast(format!("Mode: {mode}"));
            }
            KeyCode::Char('c') => self.ui.set_mode(StateSlot::Current),
            KeyCode::Char('a') => self.ui.set_mode(StateSlot::Aspirational),
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('o') => {
                let path = self.state_file.path().to_path_buf();
                self.load_from(&path);
            }
            KeyCode::Char('x') => self.export(),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let (row_index, cell_index) = self.cursor;
                self.select(row_index, cell_index);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_help || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        // Aim at the middle of the terminal cell that was clicked.
        let point = Point::new(f64::from(mouse.column) + 0.5, f64::from(mouse.row) + 0.5);
        let Some((row_index, cell_index)) = self.grid.cell_at(point) else {
            return;
        };
        self.cursor = (row_index, cell_index);
        self.select(row_index, cell_index);
    }

    fn move_cursor(&mut self, rows: isize, columns: isize) {
        let Some(table) = self.table() else {
            return;
        };
        let (row_count, column_count) = (table.row_count(), table.column_count());
        if row_count == 0 || column_count == 0 {
            return;
        }
        let (row, column) = self.cursor;
        self.cursor = (
            row.saturating_add_signed(rows).min(row_count - 1),
            column.saturating_add_signed(columns).min(column_count - 1),
        );
    }

    fn select(&mut self, row_index: usize, cell_index: usize) {
        let mode = self.ui.mode();
        let center = self
            .grid
            .cell_rect(row_index, cell_index)
            .and_then(|rect| cell_center(rect, self.grid.container()));
        let op = Op::SelectCell { row_index, cell_index, slot: mode, center };
        match self.apply(op) {
            None | Some(Ok(ApplyResult { changed: true, .. })) => {}
            Some(Ok(_)) => self.set_toast("Table is not measurable yet"),
            Some(Err(err)) => {
                warn!(%err, "selection rejected");
                self.set_toast(format!("Selection rejected: {err}"));
            }
        }
    }

    fn undo(&mut self) {
        match self.apply(Op::Undo) {
            None => {}
            Some(Ok(ApplyResult { changed: true, .. })) => {
                let depth = self.controller.as_ref().map_or(0, SelectionController::history_depth);
                self.set_toast(format!("Undone ({depth} left)"));
            }
            Some(Ok(_)) => self.set_toast("Nothing to undo"),
            Some(Err(err)) => warn!(%err, "undo rejected"),
        }
    }

    /// Runs `op` against the table; `None` while the base table is still loading.
    fn apply(&mut self, op: Op) -> Option<Result<ApplyResult, SelectError>> {
        let result = self.controller.as_mut()?.apply(op);
        if let Ok(applied) = &result {
            if applied.changed {
                self.ui.observe_table_rev(applied.new_rev);
            }
        }
        Some(result)
    }

    fn save(&mut self) {
        let Some(table) = self.table() else {
            self.set_toast("Table still loading");
            return;
        };
        match self.state_file.save(table) {
            Ok(()) => {
                let message = format!("Saved {}", self.state_file.path().display());
                self.set_toast(message);
            }
            Err(err) => {
                error!(%err, "save failed");
                self.set_toast(format!("Save failed: {err}"));
            }
        }
    }

    /// Loads a state document through the state loader, which may hand over an injected table.
    ///
    /// A document that cannot be read or decoded leaves the table untouched.
    fn load_from(&mut self, path: &Path) {
        if self.controller.is_none() {
            self.set_toast("Table still loading");
            return;
        }

        let loaded = match self.loader.read_state(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(%err, "state load failed");
                self.set_toast(format!("Load failed: {err}"));
                return;
            }
        };
        let table = match decode_table(&loaded.text) {
            Ok(table) => table,
            Err(err) => {
                error!(%err, "state document rejected");
                self.set_toast(format!("Load failed: {err}"));
                return;
            }
        };

        let message = match &loaded.origin {
            StateOrigin::Injected => "Loaded state from link".to_owned(),
            StateOrigin::File(path) => format!("Loaded {}", path.display()),
        };
        if let Some(Err(err)) = self.apply(Op::Replace { table }) {
            warn!(%err, "state document not applied");
            self.set_toast(format!("Load failed: {err}"));
            return;
        }
        self.move_cursor(0, 0);
        info!(origin = ?loaded.origin, "state loaded");
        self.set_toast(message);
    }

    fn export(&mut self) {
        let Some(table) = self.table() else {
            self.set_toast("Table still loading");
            return;
        };
        match export_svg(table, &self.svg, &self.export_path, self.state_file.durability()) {
            Ok(_) => {
                let message = format!("Exported {}", self.export_path.display());
                self.set_toast(message);
            }
            Err(err) => {
                error!(%err, "export failed");
                self.set_toast(format!("Export failed: {err}"));
            }
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).inspect_err(|_| {
            teardown_terminal();
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).inspect_err(|_| teardown_terminal())?;
        terminal.clear().inspect_err(|_| teardown_terminal())?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
