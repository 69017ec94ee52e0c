// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Query-string parameters to table state.
//!
//! Keys are two letters, `[state][row]`: `c` addresses the current state and `g` the aspirational
//! ("goal") state, `a`..`f` address rows 0..5. Values are 1-based column numbers, so
//! `?ca=3&gb=2` puts row 0's current marker in column 3 and row 1's aspirational marker in
//! column 2. Anything that does not fit is skipped without failing the rest.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::model::{SelectionState, StateSlot, TableData};

/// Placeholder coordinates for states created from parameters. They only need to be non-zero;
/// the next render recomputes real positions from cell geometry.
pub const PLACEHOLDER_X_ORIGIN: f64 = 350.0;
pub const PLACEHOLDER_X_STEP: f64 = 250.0;
pub const PLACEHOLDER_Y_ORIGIN: f64 = 300.0;
pub const PLACEHOLDER_Y_STEP: f64 = 70.0;

const ROW_LETTERS: &str = "abcdef";

fn capability_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[cg][a-f]$").expect("static regex"))
}

/// Decoded query parameters in first-seen key order.
///
/// A repeated key keeps its first position but takes the last value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.insert(key.into_owned(), value.into_owned());
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or_default())
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing_value)) => *existing_value = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether any key looks like a capability parameter; gates the whole bootstrap path.
    pub fn has_capability_params(&self) -> bool {
        self.pairs.iter().any(|(key, _)| capability_key_regex().is_match(key))
    }
}

/// A recognized `[state][row]` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityKey {
    pub slot: StateSlot,
    pub row_index: usize,
}

impl CapabilityKey {
    pub fn parse(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let (state, row) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        let slot = match state {
            'c' => StateSlot::Current,
            'g' => StateSlot::Aspirational,
            _ => return None,
        };
        let row_index = ROW_LETTERS.find(row)?;
        Some(Self { slot, row_index })
    }
}

/// Integer prefix of `value`: leading whitespace, an optional sign, then at least one digit.
/// Trailing garbage is ignored, so `"3px"` reads as 3.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match *trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub fn placeholder_x(cell_index: usize) -> f64 {
    PLACEHOLDER_X_ORIGIN + cell_index as f64 * PLACEHOLDER_X_STEP
}

pub fn placeholder_y(row_index: usize) -> f64 {
    PLACEHOLDER_Y_ORIGIN + row_index as f64 * PLACEHOLDER_Y_STEP
}

/// Applies capability parameters onto a copy of `base`.
///
/// Returns `None` when no key passes the capability gate, so callers can skip the bootstrap
/// entirely. Existing non-zero coordinates survive; zero or missing ones get placeholders.
pub fn translate(params: &QueryParams, base: &TableData) -> Option<TableData> {
    if !params.has_capability_params() {
        return None;
    }

    let mut table = base.clone();
    let column_count = table.column_count();
    let row_count = table.row_count();

    for (key, value) in params.iter() {
        let Some(CapabilityKey { slot, row_index }) = CapabilityKey::parse(key) else {
            continue;
        };
        if row_index >= row_count {
            debug!(key, row_index, row_count, "capability parameter row out of range");
            continue;
        }
        let Some(cell_index) = parse_leading_int(value)
            .and_then(|column| column.checked_sub(1))
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| table.contains_cell(*index))
        else {
            debug!(key, value, column_count, "capability parameter column out of range");
            continue;
        };

        let Some(row) = table.row_mut(row_index) else {
            continue;
        };
        let state = row.slot_mut(slot).get_or_insert(SelectionState::unplaced(cell_index));
        state.cell_index = cell_index;
        if !state.has_x() {
            state.x = placeholder_x(cell_index);
        }
        if !state.has_y() {
            state.y = placeholder_y(row_index);
        }
    }

    Some(table)
}

pub fn translate_query(query: &str, base: &TableData) -> Option<TableData> {
    translate(&QueryParams::parse(query), base)
}

pub fn translate_url(url: &Url, base: &TableData) -> Option<TableData> {
    translate(&QueryParams::from_url(url), base)
}
