// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Overlay derivation: markers, path lines and pairing lines.
//!
//! Nothing here is stored between frames. Each pass reads the table plus the live cell geometry
//! and produces a fresh set of primitives, so positions follow resizes and scrolling without any
//! invalidation logic.

use crate::layout::{CellLookup, OverlayAnchor, Point};
use crate::model::{StateSlot, TableData};

/// Marker radius as a fraction of the smaller cell dimension.
pub const MARKER_RADIUS_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub row_index: usize,
    pub cell_index: usize,
    pub slot: StateSlot,
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }
}

/// Connector between the current-state markers of two consecutive populated rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLine {
    pub from_row: usize,
    pub to_row: usize,
    pub segment: Segment,
}

/// Dashed connector between one row's current and aspirational markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingLine {
    pub row_index: usize,
    pub segment: Segment,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub markers: Vec<Marker>,
    pub path_lines: Vec<PathLine>,
    pub pairing_lines: Vec<PairingLine>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.path_lines.is_empty() && self.pairing_lines.is_empty()
    }

    pub fn marker(&self, row_index: usize, slot: StateSlot) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|marker| marker.row_index == row_index && marker.slot == slot)
    }
}

/// Derives the overlay for `table` against the cells reported by `lookup`.
///
/// A populated slot whose cell cannot be resolved (not rendered, index out of range, container
/// unmeasured) gets no marker, and no line touches it.
pub fn derive_overlay(table: &TableData, lookup: &impl CellLookup, anchor: OverlayAnchor) -> Overlay {
    let mut overlay = Overlay::default();

    let resolve = |row_index: usize, slot: StateSlot| -> Option<Marker> {
        let state = table.slot(row_index, slot)?;
        let rect = lookup.cell_rect(row_index, state.cell_index)?;
        let center = anchor.resolve(rect)?;
        Some(Marker {
            row_index,
            cell_index: state.cell_index,
            slot,
            center,
            radius: rect.width.min(rect.height) * MARKER_RADIUS_RATIO,
        })
    };

    // Rows with a current state, in row order, keep their slot in the path even when their cell
    // does not resolve; such a gap suppresses the lines on both sides of it.
    let mut previous_current: Option<Option<Marker>> = None;

    for row_index in 0..table.row_count() {
        let current = resolve(row_index, StateSlot::Current);
        let aspirational = resolve(row_index, StateSlot::Aspirational);

        if table.slot(row_index, StateSlot::Current).is_some() {
            if let (Some(Some(prev)), Some(curr)) = (previous_current, current) {
                overlay.path_lines.push(PathLine {
                    from_row: prev.row_index,
                    to_row: row_index,
                    segment: Segment::new(prev.center, curr.center),
                });
            }
            previous_current = Some(current);
        }

        if let (Some(curr), Some(asp)) = (current, aspirational) {
            overlay.pairing_lines.push(PairingLine {
                row_index,
                segment: Segment::new(curr.center, asp.center),
            });
        }

        overlay.markers.extend(current);
        overlay.markers.extend(aspirational);
    }

    overlay
}

/// Splits `segment` into dashes of length `dash` separated by `gap`.
///
/// Degenerate inputs (zero-length segment, non-positive dash) yield the segment unchanged.
pub fn dash_segments(segment: Segment, dash: f64, gap: f64) -> Vec<Segment> {
    let length = segment.length();
    if length <= f64::EPSILON || dash <= 0.0 {
        return vec![segment];
    }

    let gap = gap.max(0.0);
    let dx = (segment.to.x - segment.from.x) / length;
    let dy = (segment.to.y - segment.from.y) / length;
    let at = |distance: f64| Point::new(segment.from.x + dx * distance, segment.from.y + dy * distance);

    let mut out = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        out.push(Segment::new(at(start), at(end)));
        start = end + gap;
    }
    out
}
