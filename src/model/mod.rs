// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A capability table plus the undo history the selection controller keeps over it.

pub(crate) mod fixtures;
pub mod history;
pub mod table;

pub use history::History;
pub use table::{Row, SelectionState, StateSlot, TableData};
