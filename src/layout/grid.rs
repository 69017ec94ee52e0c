// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::geometry::{Point, Rect};

/// Lookup from `(row, cell)` to the rendered cell rectangle.
pub trait CellLookup {
    fn cell_rect(&self, row_index: usize, cell_index: usize) -> Option<Rect>;
}

impl<F> CellLookup for F
where
    F: Fn(usize, usize) -> Option<Rect>,
{
    fn cell_rect(&self, row_index: usize, cell_index: usize) -> Option<Rect> {
        self(row_index, cell_index)
    }
}

/// Rectangles of the cells rendered in the current frame.
///
/// Rebuilt on every draw so that resizes never leave stale geometry behind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellGrid {
    container: Option<Rect>,
    cells: BTreeMap<(usize, usize), Rect>,
}

impl CellGrid {
    pub fn new(container: Option<Rect>) -> Self {
        Self { container, cells: BTreeMap::new() }
    }

    pub fn container(&self) -> Option<Rect> {
        self.container
    }

    pub fn insert(&mut self, row_index: usize, cell_index: usize, rect: Rect) {
        self.cells.insert((row_index, cell_index), rect);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Hit test: the cell under `point`, if any.
    pub fn cell_at(&self, point: Point) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(key, _)| *key)
    }
}

impl CellLookup for CellGrid {
    fn cell_rect(&self, row_index: usize, cell_index: usize) -> Option<Rect> {
        self.cells.get(&(row_index, cell_index)).copied()
    }
}

/// Fixed-size table layout used where no live measurement exists (exports, tests).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub origin_left: f64,
    pub origin_top: f64,
    pub label_width: f64,
    pub column_width: f64,
    pub header_height: f64,
    pub row_height: f64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            origin_left: 0.0,
            origin_top: 0.0,
            label_width: 160.0,
            column_width: 180.0,
            header_height: 40.0,
            row_height: 70.0,
        }
    }
}

impl GridMetrics {
    pub fn container(&self, rows: usize, columns: usize) -> Rect {
        Rect::new(
            self.origin_left,
            self.origin_top,
            self.label_width + self.column_width * columns as f64,
            self.header_height + self.row_height * rows as f64,
        )
    }

    pub fn header_rect(&self, cell_index: usize) -> Rect {
        Rect::new(
            self.origin_left + self.label_width + self.column_width * cell_index as f64,
            self.origin_top,
            self.column_width,
            self.header_height,
        )
    }

    pub fn label_rect(&self, row_index: usize) -> Rect {
        Rect::new(
            self.origin_left,
            self.row_top(row_index),
            self.label_width,
            self.row_height,
        )
    }

    pub fn cell_rect(&self, row_index: usize, cell_index: usize) -> Rect {
        Rect::new(
            self.origin_left + self.label_width + self.column_width * cell_index as f64,
            self.row_top(row_index),
            self.column_width,
            self.row_height,
        )
    }

    fn row_top(&self, row_index: usize) -> f64 {
        self.origin_top + self.header_height + self.row_height * row_index as f64
    }

    /// Lays out a `rows` x `columns` body grid.
    pub fn grid(&self, rows: usize, columns: usize) -> CellGrid {
        let mut grid = CellGrid::new(Some(self.container(rows, columns)));
        for row_index in 0..rows {
            for cell_index in 0..columns {
                grid.insert(row_index, cell_index, self.cell_rect(row_index, cell_index));
            }
        }
        grid
    }
}
