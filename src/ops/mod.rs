// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for the capability table.
//!
//! The selection controller owns the table and its undo history. Every mutation bumps a revision
//! counter so the UI can tell when derived state needs a refresh.

use thiserror::Error;
use tracing::debug;

use crate::layout::Point;
use crate::model::{History, SelectionState, StateSlot, TableData};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// A click on a body cell. `center` is the cell's container-relative center at click time,
    /// or `None` while the container cannot be measured.
    SelectCell { row_index: usize, cell_index: usize, slot: StateSlot, center: Option<Point> },
    Undo,
    /// Whole-document replacement, used by load.
    Replace { table: TableData },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("row {row_index} is out of range (rows={row_count})")]
    RowOutOfRange { row_index: usize, row_count: usize },
    #[error("cell {cell_index} is out of range (columns={column_count})")]
    CellOutOfRange { cell_index: usize, column_count: usize },
}

/// Policy knobs for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryPolicy {
    /// Drop the undo history whenever a whole document is loaded.
    pub clear_on_load: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionController {
    table: TableData,
    history: History,
    policy: HistoryPolicy,
    rev: u64,
}

impl SelectionController {
    pub fn new(table: TableData) -> Self {
        Self::with_policy(table, HistoryPolicy::default())
    }

    pub fn with_policy(table: TableData, policy: HistoryPolicy) -> Self {
        Self { table, history: History::new(), policy, rev: 0 }
    }

    pub fn table(&self) -> &TableData {
        &self.table
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn apply(&mut self, op: Op) -> Result<ApplyResult, SelectError> {
        let changed = match op {
            Op::SelectCell { row_index, cell_index, slot, center } => {
                self.select_cell(row_index, cell_index, slot, center)?
            }
            Op::Undo => self.undo(),
            Op::Replace { table } => {
                self.replace_table(table);
                true
            }
        };
        Ok(ApplyResult { new_rev: self.rev, changed })
    }

    /// Records the click on `(row_index, cell_index)` into exactly one slot of that row.
    ///
    /// Returns `Ok(false)` without touching history when `center` is unknown.
    pub fn select_cell(
        &mut self,
        row_index: usize,
        cell_index: usize,
        slot: StateSlot,
        center: Option<Point>,
    ) -> Result<bool, SelectError> {
        let row_count = self.table.row_count();
        if row_index >= row_count {
            return Err(SelectError::RowOutOfRange { row_index, row_count });
        }
        let column_count = self.table.column_count();
        if cell_index >= column_count {
            return Err(SelectError::CellOutOfRange { cell_index, column_count });
        }

        let Some(center) = center else {
            debug!(row_index, cell_index, "container not measurable; click ignored");
            return Ok(false);
        };

        self.history.record(self.table.clone());
        self.table.set_slot(row_index, slot, SelectionState::new(center.x, center.y, cell_index));
        self.bump_rev();
        debug!(row_index, cell_index, %slot, depth = self.history.depth(), "cell selected");
        Ok(true)
    }

    /// Restores the table as it was before the latest recorded click. No-op on empty history.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.table = previous;
        self.bump_rev();
        true
    }

    pub fn replace_table(&mut self, table: TableData) {
        if self.policy.clear_on_load {
            self.history.clear();
        }
        self.table = table;
        self.bump_rev();
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}
