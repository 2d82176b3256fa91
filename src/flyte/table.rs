// This file is part of the terraform-provider-unionai project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Extraction of box-drawing tables from console output
//!
//! The tables look like:
//!
//! ```text
//! ┌───────────┬─────────────────┬──────────┐
//! │ Type      │ Name            │ Version  │
//! ╞═══════════╪═════════════════╪══════════╡
//! │ task      │ hello_world.fn  │ d8b4e239 │
//! └───────────┴─────────────────┴──────────┘
//! ```

/// Cell separator
pub const SEPARATOR: char = '│';

/// Cells of a data row, one per requested column, in requested order
pub type TableRow = Vec<String>;

/// Extract the data rows of the first table whose header contains all `columns`
///
/// Returns an empty list when no such table exists.
/// An absent table and an empty table cannot be told apart.
pub fn extract_table(columns: &[&str], text: &str) -> Vec<TableRow> {
    let mut lines = text.lines();

    let Some(header) = lines.by_ref().find(|line| is_header(line, columns)) else {
        return Vec::new();
    };

    let cells = header.split(SEPARATOR).map(str::trim).collect::<Vec<_>>();
    let indices = columns
        .iter()
        .map(|column| cells.iter().position(|cell| cell == column))
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    let mut in_data = false;
    for line in lines {
        if is_table_end(line) {
            break;
        }
        if !in_data {
            // The heavy border separates the header from the data
            in_data = line.contains('═') || line.contains('╞');
            continue;
        }
        if !line.contains(SEPARATOR) {
            continue;
        }

        let cells = line.split(SEPARATOR).collect::<Vec<_>>();
        rows.push(
            indices
                .iter()
                .map(|index| {
                    index
                        .and_then(|i| cells.get(i))
                        .map(|cell| cell.trim().to_owned())
                        .unwrap_or_default()
                })
                .collect(),
        );
    }

    rows
}

fn is_header(line: &str, columns: &[&str]) -> bool {
    line.contains(SEPARATOR) && columns.iter().all(|column| line.contains(column))
}

fn is_table_end(line: &str) -> bool {
    line.contains('└') || line.contains("───")
}
