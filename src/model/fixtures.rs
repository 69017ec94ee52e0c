// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::table::{Row, TableData};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

/// Five maturity columns by six capability rows, the shape of the bundled `table.json`.
pub(crate) fn maturity_table() -> TableData {
    let headers = strings(&["Initial", "Repeatable", "Defined", "Managed", "Optimizing"]);
    let rows = [
        "Strategy",
        "People",
        "Process",
        "Technology",
        "Data",
        "Governance",
    ]
    .into_iter()
    .map(|label| {
        let data = headers.iter().map(|header| format!("{label}: {header}")).collect();
        Row::new(label, data)
    })
    .collect();

    TableData::new(headers, rows)
}

#[cfg(test)]
pub(crate) fn small_table(rows: usize, columns: usize) -> TableData {
    let headers = (0..columns).map(|col| format!("C{col}")).collect::<Vec<_>>();
    let rows = (0..rows)
        .map(|row| {
            let data = (0..columns).map(|col| format!("r{row}c{col}")).collect();
            Row::new(format!("R{row}"), data)
        })
        .collect();
    TableData::new(headers, rows)
}
