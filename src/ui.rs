// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared UI state for the editor.
//!
//! Holds the selection mode that decides which slot a cell click writes, plus a revision counter
//! the terminal UI uses to notice changes that need a redraw.

use crate::model::StateSlot;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    rev: u64,
    mode: StateSlot,
    table_rev: u64,
}

impl UiState {
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn mode(&self) -> StateSlot {
        self.mode
    }

    /// Revision of the table last seen by the UI.
    pub fn table_rev(&self) -> u64 {
        self.table_rev
    }

    pub fn set_mode(&mut self, mode: StateSlot) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.rev = self.rev.wrapping_add(1);
    }

    pub fn toggle_mode(&mut self) -> StateSlot {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    pub fn observe_table_rev(&mut self, table_rev: u64) {
        if self.table_rev == table_rev {
            return;
        }
        self.table_rev = table_rev;
        self.rev = self.rev.wrapping_add(1);
    }
}
