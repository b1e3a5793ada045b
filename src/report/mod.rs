//! ASCII tables for the bug reporter.

use std::collections::BTreeMap;

use tabled::{settings::Style, Table, Tabled};

use crate::bugs::{BugHistory, SummaryEntry};

#[derive(Tabled)]
struct DumpRow {
    #[tabled(rename = "Bug")]
    bug: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Count")]
    count: String,
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Count")]
    count: String,
}

fn ascii<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::ascii());
    table.to_string()
}

/// Every transition of every bug; the key is only printed on the bug's first
/// row and each bug is followed by a blank row.
pub fn render_dump(histories: &[BugHistory]) -> String {
    let mut rows = Vec::new();

    for history in histories {
        for (idx, transition) in history.transitions.iter().enumerate() {
            rows.push(DumpRow {
                bug: if idx == 0 { history.key.clone() } else { String::new() },
                from: transition.from.clone(),
                to: transition.to.clone(),
            });
        }
        rows.push(DumpRow {
            bug: String::new(),
            from: String::new(),
            to: String::new(),
        });
    }

    ascii(rows)
}

/// Flat transition counts, in the order given
pub fn render_summary(entries: &[SummaryEntry]) -> String {
    let rows: Vec<SummaryRow> = entries
        .iter()
        .map(|entry| SummaryRow {
            from: entry.from.clone(),
            to: entry.to.clone(),
            count: entry.count.to_string(),
        })
        .collect();

    ascii(rows)
}

/// Transition counts grouped by level, with a blank row between levels
pub fn render_level_summary(levels: &BTreeMap<u32, Vec<SummaryEntry>>) -> String {
    let mut rows = Vec::new();

    for (idx, (level, entries)) in levels.iter().enumerate() {
        if idx > 0 {
            rows.push(LevelRow {
                level: String::new(),
                from: String::new(),
                to: String::new(),
                count: String::new(),
            });
        }
        for entry in entries {
            rows.push(LevelRow {
                level: level.to_string(),
                from: entry.from.clone(),
                to: entry.to.clone(),
                count: entry.count.to_string(),
            });
        }
    }

    ascii(rows)
}
