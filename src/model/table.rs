// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Capability table schema.
//!
//! `TableData` is both the in-memory model edited by the TUI and the JSON document exchanged with
//! disk (`tableData.json`) and the base template (`table.json`). Decoding is deliberately lenient:
//! missing fields decode as empty values instead of failing the whole document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of a row's two marker slots an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StateSlot {
    /// Where things are today.
    #[default]
    Current,
    /// Where things should go.
    Aspirational,
}

impl StateSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Aspirational => "aspirational",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Current => Self::Aspirational,
            Self::Aspirational => Self::Current,
        }
    }
}

impl fmt::Display for StateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected cell within a row.
///
/// `cell_index` is the authoritative selection. `x`/`y` cache the container-relative center of the
/// cell at the time it was selected; renderers recompute positions from live geometry instead of
/// trusting them. A zero coordinate is treated as "not yet placed".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub cell_index: usize,
}

impl SelectionState {
    pub fn new(x: f64, y: f64, cell_index: usize) -> Self {
        Self { x, y, cell_index }
    }

    /// A state with no cached coordinates yet.
    pub fn unplaced(cell_index: usize) -> Self {
        Self::new(0.0, 0.0, cell_index)
    }

    pub fn has_x(&self) -> bool {
        self.x != 0.0 && !self.x.is_nan()
    }

    pub fn has_y(&self) -> bool {
        self.y != 0.0 && !self.y.is_nan()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<SelectionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspirational_state: Option<SelectionState>,
}

impl Row {
    pub fn new(label: impl Into<String>, data: Vec<String>) -> Self {
        Self { label: label.into(), data, current_state: None, aspirational_state: None }
    }

    pub fn slot(&self, slot: StateSlot) -> Option<&SelectionState> {
        match slot {
            StateSlot::Current => self.current_state.as_ref(),
            StateSlot::Aspirational => self.aspirational_state.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: StateSlot) -> &mut Option<SelectionState> {
        match slot {
            StateSlot::Current => &mut self.current_state,
            StateSlot::Aspirational => &mut self.aspirational_state,
        }
    }
}

/// The whole capability table: column headers plus one row per capability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl TableData {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Column count `C`; the header row is the source of truth.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row_index: usize) -> Option<&Row> {
        self.rows.get(row_index)
    }

    pub fn row_mut(&mut self, row_index: usize) -> Option<&mut Row> {
        self.rows.get_mut(row_index)
    }

    pub fn contains_cell(&self, cell_index: usize) -> bool {
        cell_index < self.column_count()
    }

    pub fn slot(&self, row_index: usize, slot: StateSlot) -> Option<&SelectionState> {
        self.row(row_index).and_then(|row| row.slot(slot))
    }

    /// Writes `state` into one slot of one row; returns `false` when the row does not exist.
    pub fn set_slot(&mut self, row_index: usize, slot: StateSlot, state: SelectionState) -> bool {
        let Some(row) = self.row_mut(row_index) else {
            return false;
        };
        *row.slot_mut(slot) = Some(state);
        true
    }

    /// Copy of this table with every state slot cleared.
    pub fn template(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| Row::new(row.label.clone(), row.data.clone()))
            .collect();
        Self::new(self.headers.clone(), rows)
    }

    pub fn populated_slot_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| {
                usize::from(row.current_state.is_some())
                    + usize::from(row.aspirational_state.is_some())
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{Row, SelectionState, StateSlot, TableData};

    fn table() -> TableData {
        TableData::new(
            vec!["Initial".to_owned(), "Managed".to_owned(), "Optimized".to_owned()],
            vec![
                Row::new("People", vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]),
                Row::new("Process", vec!["d".to_owned(), "e".to_owned(), "f".to_owned()]),
            ],
        )
    }

    #[test]
    fn decodes_base_document_without_state_slots() {
        let json = r#"{"headers":["A","B"],"rows":[{"label":"One","data":["x","y"]}]}"#;
        let table: TableData = serde_json::from_str(json).expect("decode");
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 1);
        assert!(table.rows[0].current_state.is_none());
        assert!(table.rows[0].aspirational_state.is_none());
    }

    #[test]
    fn missing_fields_decode_as_empty_values() {
        let json = r#"{"rows":[{"currentState":{"cellIndex":1}}]}"#;
        let table: TableData = serde_json::from_str(json).expect("decode");
        assert!(table.headers.is_empty());
        assert_eq!(table.rows[0].label, "");
        let state = table.rows[0].current_state.expect("current state");
        assert_eq!(state.cell_index, 1);
        assert!(!state.has_x());
        assert!(!state.has_y());
    }

    #[test]
    fn encodes_camel_case_keys_and_skips_empty_slots() {
        let mut table = table();
        table.set_slot(0, StateSlot::Aspirational, SelectionState::new(10.0, 20.0, 2));
        let value = serde_json::to_value(&table).expect("encode");

        let row0 = &value["rows"][0];
        assert_eq!(row0["aspirationalState"]["cellIndex"], 2);
        assert!(row0.get("currentState").is_none());
        assert!(value["rows"][1].get("aspirationalState").is_none());
    }

    #[test]
    fn set_slot_touches_only_the_addressed_slot() {
        let mut table = table();
        table.set_slot(1, StateSlot::Current, SelectionState::new(1.0, 1.0, 0));
        assert!(table.set_slot(1, StateSlot::Aspirational, SelectionState::new(2.0, 2.0, 2)));

        assert_eq!(table.slot(1, StateSlot::Current).map(|s| s.cell_index), Some(0));
        assert_eq!(table.slot(1, StateSlot::Aspirational).map(|s| s.cell_index), Some(2));
        assert!(table.rows[0].current_state.is_none());
        assert!(!table.set_slot(9, StateSlot::Current, SelectionState::unplaced(0)));
    }

    #[test]
    fn template_strips_states() {
        let mut table = table();
        table.set_slot(0, StateSlot::Current, SelectionState::new(1.0, 2.0, 1));
        assert_eq!(table.populated_slot_count(), 1);

        let template = table.template();
        assert_eq!(template.populated_slot_count(), 0);
        assert_eq!(template.headers, table.headers);
        assert_eq!(template.rows[0].data, table.rows[0].data);
    }

    #[test]
    fn state_slot_toggles_and_defaults_to_current() {
        assert_eq!(StateSlot::Current.toggled(), StateSlot::Aspirational);
        assert_eq!(StateSlot::default(), StateSlot::Current);
    }
}
