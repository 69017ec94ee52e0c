// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Rectangles of one drawn table, in terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TableLayout {
    container: Rect,
    /// Container minus the header band.
    body: Rect,
    headers: Vec<Rect>,
    labels: Vec<Rect>,
    cells: Vec<Vec<Rect>>,
}

fn table_layout(area: Rect, rows: usize, columns: usize, labels: &[String]) -> TableLayout {
    let label_width = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .saturating_add(4)
        .clamp(MIN_LABEL_WIDTH, MAX_LABEL_WIDTH) as u16;
    let label_width = label_width.min(area.width / 3);

    let mut column_constraints = vec![Constraint::Length(label_width)];
    column_constraints.extend(std::iter::repeat(Constraint::Fill(1)).take(columns));
    let mut row_constraints = vec![Constraint::Length(HEADER_HEIGHT)];
    row_constraints.extend(std::iter::repeat(Constraint::Fill(1)).take(rows));

    let bands = Layout::vertical(row_constraints).split(area);
    let column_spans = |band: Rect| Layout::horizontal(column_constraints.clone()).split(band);

    let header_band = column_spans(bands[0]);
    let headers: Vec<Rect> = header_band.iter().skip(1).copied().collect();

    let mut row_labels = Vec::with_capacity(rows);
    let mut cells: Vec<Vec<Rect>> = Vec::with_capacity(rows);
    for band in bands.iter().skip(1) {
        let spans = column_spans(*band);
        row_labels.push(spans[0]);
        cells.push(spans.iter().skip(1).copied().collect());
    }

    let body_top = bands[0].bottom();
    let body = Rect { y: body_top, height: area.bottom().saturating_sub(body_top), ..area };

    TableLayout { container: area, body, headers, labels: row_labels, cells }
}

impl TableLayout {
    fn cell_grid(&self) -> CellGrid {
        let mut grid = CellGrid::new(Some(self.container.into()));
        for (row_index, row) in self.cells.iter().enumerate() {
            for (cell_index, rect) in row.iter().enumerate() {
                grid.insert(row_index, cell_index, (*rect).into());
            }
        }
        grid
    }
}

fn header_color(cell_index: usize) -> Color {
    HEADER_PALETTE[cell_index % HEADER_PALETTE.len()]
}

fn marker_color(slot: StateSlot) -> Color {
    match slot {
        StateSlot::Current => CURRENT_COLOR,
        StateSlot::Aspirational => ASPIRATIONAL_COLOR,
    }
}

fn marker_glyph(slot: StateSlot) -> &'static str {
    match slot {
        StateSlot::Current => "●",
        StateSlot::Aspirational => "○",
    }
}

fn main_title(app: &App) -> String {
    let mode = app.ui.mode();
    match app.controller.as_ref() {
        Some(controller) => format!(
            " Capability map | mode: {mode} | {} rows x {} columns ",
            controller.table().row_count(),
            controller.table().column_count()
        ),
        None => format!(" Capability map | mode: {mode} "),
    }
}

fn draw_table(frame: &mut Frame<'_>, app: &App, table: &TableData, layout: &TableLayout) {
    for (cell_index, rect) in layout.headers.iter().enumerate() {
        let header = table.headers.get(cell_index).map(String::as_str).unwrap_or_default();
        let paragraph = Paragraph::new(header.to_owned())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Black).bg(header_color(cell_index)))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *rect);
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        if let Some(rect) = layout.labels.get(row_index) {
            let label = Paragraph::new(row.label.clone())
                .style(Style::default().add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL).border_style(cell_border_style(false)))
                .wrap(Wrap { trim: true });
            frame.render_widget(label, *rect);
        }

        let Some(cell_rects) = layout.cells.get(row_index) else {
            continue;
        };
        for (cell_index, rect) in cell_rects.iter().enumerate() {
            let text = row.data.get(cell_index).cloned().unwrap_or_default();
            let focused = app.cursor == (row_index, cell_index);
            let cell = Paragraph::new(text)
                .style(Style::default().fg(CELL_TEXT_COLOR))
                .block(Block::default().borders(Borders::ALL).border_style(cell_border_style(focused)))
                .wrap(Wrap { trim: true });
            frame.render_widget(cell, *rect);
        }
    }
}

fn cell_border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(GRID_COLOR)
    }
}

/// Paints the overlay on top of the already drawn table body.
///
/// `Canvas` resets the background of its whole area, so it only covers `layout.body` and leaves
/// the colored header band alone. Overlay points stay container-relative; canvas y grows upwards.
fn draw_overlay(frame: &mut Frame<'_>, overlay: &Overlay, layout: &TableLayout) {
    let body = layout.body;
    if overlay.is_empty() || body.width == 0 || body.height == 0 {
        return;
    }
    let width = f64::from(body.width);
    let height = f64::from(body.height);
    let header_offset = f64::from(body.y.saturating_sub(layout.container.y));
    let flip = move |point: Point| (point.x, height - (point.y - header_offset));

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for path in &overlay.path_lines {
                let (x1, y1) = flip(path.segment.from);
                let (x2, y2) = flip(path.segment.to);
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, PATH_COLOR));
            }
            for pairing in &overlay.pairing_lines {
                for dash in dash_segments(pairing.segment, PAIRING_DASH, PAIRING_GAP) {
                    let (x1, y1) = flip(dash.from);
                    let (x2, y2) = flip(dash.to);
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, PAIRING_COLOR));
                }
            }
            ctx.layer();
            for marker in &overlay.markers {
                let (x, y) = flip(marker.center);
                let color = marker_color(marker.slot);
                ctx.draw(&Circle { x, y, radius: marker.radius, color });
                ctx.print(x, y, Span::styled(marker_glyph(marker.slot), Style::default().fg(color)));
            }
        });
    frame.render_widget(canvas, body);
}

fn footer_help_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    push_footer_entry(&mut spans, "MODE", app.ui.mode().as_str());
    push_footer_entry_maybe_disabled(&mut spans, "SWITCH", "m", app.controller.is_none());
    push_footer_entry_maybe_disabled(&mut spans, "UNDO", "u", !app.can_undo());
    push_footer_entry_maybe_disabled(&mut spans, "SAVE", "s", app.controller.is_none());
    push_footer_entry_maybe_disabled(&mut spans, "LOAD", "o", app.controller.is_none());
    push_footer_entry_maybe_disabled(&mut spans, "EXPORT", "x", app.controller.is_none());
    push_footer_entry(&mut spans, "HELP", "?");
    push_footer_entry(&mut spans, "QUIT", "q");
    if !toast_suffix.is_empty() {
        spans.push(Span::raw(toast_suffix.to_owned()));
    }
    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_maybe_disabled(spans, label, value, false);
}

fn push_footer_entry_maybe_disabled(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    disabled: bool,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    let color = if disabled { Color::DarkGray } else { FOOTER_KEY_COLOR };
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first.to_uppercase().chain(chars).collect()
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(middle);
    center
}

fn help_kv(key: &str, desc: &str, key_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{key:>key_width$}"),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_ENTRIES: [(&str, &str); 10] = [
    ("click", "place a marker in the clicked cell"),
    ("arrows/hjkl", "move the cell cursor"),
    ("Enter/Space", "place a marker in the cursor cell"),
    ("m/Tab", "switch between current and aspirational"),
    ("c/a", "pick current or aspirational"),
    ("u/Ctrl-z", "undo the last placement"),
    ("s", "save state to the state file"),
    ("o", "load state from the state file"),
    ("x", "export the map as SVG"),
    ("q", "quit"),
];

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let area = centered_rect(70, 70, area);
    frame.render_widget(Clear, area);

    let key_width = HELP_ENTRIES.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let lines = HELP_ENTRIES
        .iter()
        .map(|(key, desc)| help_kv(key, desc, key_width))
        .collect::<Vec<_>>();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help (? or Esc to close) "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
