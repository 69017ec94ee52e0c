// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Standalone SVG export of the table with its overlay.
//!
//! The export lays the table out on a fixed grid (`GridMetrics`) instead of measuring a live
//! surface, then runs the same overlay derivation the TUI uses.

use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::layout::{GridMetrics, OverlayAnchor};
use crate::model::{StateSlot, TableData};
use crate::store::{write_atomic, StoreError, WriteDurability};

use super::overlay::derive_overlay;

/// Header fill colors, cycled per column.
pub const HEADER_COLORS: [&str; 5] = ["violet", "magenta", "teal", "cyan", "green"];

const PAIRING_DASH: &str = "6 4";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    pub metrics: GridMetrics,
    pub padding: f64,
    pub line_width: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self { metrics: GridMetrics::default(), padding: 16.0, line_width: 2.0 }
    }
}

pub fn render_svg(table: &TableData, options: &SvgOptions) -> String {
    let metrics = GridMetrics {
        origin_left: options.metrics.origin_left + options.padding,
        origin_top: options.metrics.origin_top + options.padding,
        ..options.metrics
    };
    let rows = table.row_count();
    let columns = table.column_count();
    let container = metrics.container(rows, columns);
    let width = container.right() + options.padding;
    let height = container.bottom() + options.padding;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">"
    );
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    for (cell_index, header) in table.headers.iter().enumerate() {
        let rect = metrics.header_rect(cell_index);
        let fill = HEADER_COLORS[cell_index % HEADER_COLORS.len()];
        let _ = writeln!(
            svg,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{fill}\" stroke=\"black\" stroke-width=\"1\"/>",
            rect.left, rect.top, rect.width, rect.height
        );
        push_text(&mut svg, rect.center().x, rect.center().y, header, "middle");
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        let label = metrics.label_rect(row_index);
        push_cell_frame(&mut svg, label.left, label.top, label.width, label.height);
        push_text(&mut svg, label.center().x, label.center().y, &row.label, "middle");

        for cell_index in 0..columns {
            let rect = metrics.cell_rect(row_index, cell_index);
            push_cell_frame(&mut svg, rect.left, rect.top, rect.width, rect.height);
            if let Some(text) = row.data.get(cell_index) {
                push_text(&mut svg, rect.left + 6.0, rect.top + 16.0, text, "start");
            }
        }
    }

    // Overlay coordinates are container-relative; shift them back into document space.
    let grid = metrics.grid(rows, columns);
    let overlay = derive_overlay(table, &grid, OverlayAnchor::Container(grid.container()));
    let _ = writeln!(
        svg,
        "<g class=\"overlay\" transform=\"translate({:.2} {:.2})\">",
        container.left, container.top
    );
    for line in &overlay.path_lines {
        let segment = line.segment;
        let _ = writeln!(
            svg,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"black\" stroke-width=\"{:.1}\"/>",
            segment.from.x, segment.from.y, segment.to.x, segment.to.y, options.line_width
        );
    }
    for line in &overlay.pairing_lines {
        let segment = line.segment;
        let _ = writeln!(
            svg,
            "<line class=\"pairing\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"black\" stroke-width=\"{:.1}\" stroke-dasharray=\"{PAIRING_DASH}\"/>",
            segment.from.x, segment.from.y, segment.to.x, segment.to.y, options.line_width
        );
    }
    for marker in &overlay.markers {
        let fill = match marker.slot {
            StateSlot::Current => "black",
            StateSlot::Aspirational => "white",
        };
        let _ = writeln!(
            svg,
            "<circle class=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\" stroke=\"black\" stroke-width=\"1.5\"/>",
            marker.slot, marker.center.x, marker.center.y, marker.radius
        );
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

fn push_cell_frame(svg: &mut String, x: f64, y: f64, width: f64, height: f64) {
    let _ = writeln!(
        svg,
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"none\" stroke=\"black\" stroke-width=\"1\"/>"
    );
}

fn push_text(svg: &mut String, x: f64, y: f64, text: &str, anchor: &str) {
    let _ = writeln!(
        svg,
        "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"sans-serif\" font-size=\"12\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\">{}</text>",
        escape_xml(text)
    );
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the table has no columns")]
    EmptyTable,
    #[error(transparent)]
    Write(#[from] StoreError),
}

/// Renders `table` and writes it to `path`; returns the number of bytes written.
pub fn export_svg(
    table: &TableData,
    options: &SvgOptions,
    path: &Path,
    durability: WriteDurability,
) -> Result<usize, ExportError> {
    if table.column_count() == 0 {
        return Err(ExportError::EmptyTable);
    }
    let document = render_svg(table, options);
    write_atomic(path, document.as_bytes(), durability)?;
    info!(path = %path.display(), bytes = document.len(), "svg exported");
    Ok(document.len())
}
