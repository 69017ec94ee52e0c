// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::table::TableData;

/// Linear undo history of full table snapshots.
///
/// Every recorded mutation pushes the pre-mutation table; undo pops the most recent one. There is
/// no redo and no depth cap, so `depth()` always equals recorded mutations minus effective undos.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    snapshots: Vec<TableData>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: TableData) {
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<TableData> {
        self.snapshots.pop()
    }

    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::History;
    use crate::model::fixtures::maturity_table;

    #[test]
    fn pops_in_reverse_record_order() {
        let mut history = History::new();
        let first = maturity_table();
        let mut second = maturity_table();
        second.headers.push("Extra".to_owned());

        history.record(first.clone());
        history.record(second.clone());
        assert_eq!(history.depth(), 2);

        assert_eq!(history.pop(), Some(second));
        assert_eq!(history.pop(), Some(first));
        assert_eq!(history.pop(), None);
        assert!(history.is_empty());
    }
}
