//! Bug status-transition history: pulls labelled bugs from the tracker, keeps
//! the status changes that fall inside a day window and groups them.

use jiff::civil::Date;
use jiff::ToSpan;
use tracing::{debug, info, warn};

use crate::config::TrackerSchema;
use crate::error::{Error, Result};
use crate::time::{day_offset, parse_event_date, DayWindow};
use crate::tracker::{BugQuery, Issue, TrackerClient};

mod level;
mod summary;

pub use level::Level;
pub use summary::{summarise, summarise_by_level, SummaryEntry};

/// One status change, e.g. `Open -> In Progress`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: String,
    pub to: String,
}

/// The in-window transitions of a single bug, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugHistory {
    pub key: String,
    pub level: Level,
    pub transitions: Vec<Transition>,
}

/// Status changes of an issue that happened inside the window, oldest first
pub fn extract_transitions(issue: &Issue, window: &DayWindow, today: Date) -> Vec<Transition> {
    let mut transitions = Vec::new();

    // The tracker lists histories newest first
    for history in &issue.changelog.histories {
        let Some(date) = parse_event_date(&history.created) else {
            warn!(
                "Skipping change on {} with unreadable date '{}'",
                issue.key, history.created
            );
            continue;
        };

        if !window.contains(day_offset(date, today)) {
            continue;
        }

        for item in history.items.iter().filter(|item| item.is_status_change()) {
            transitions.push(Transition {
                from: item.from.clone().unwrap_or_default(),
                to: item.to.clone().unwrap_or_default(),
            });
        }
    }

    transitions.reverse();
    transitions
}

/// Build the history of every issue that changed status inside the window
pub fn collect_histories(
    issues: &[Issue],
    window: &DayWindow,
    today: Date,
    severity_field: &str,
) -> Vec<BugHistory> {
    issues
        .iter()
        .filter_map(|issue| {
            let transitions = extract_transitions(issue, window, today);
            if transitions.is_empty() {
                debug!("{} has no status changes in the window", issue.key);
                return None;
            }

            Some(BugHistory {
                key: issue.key.clone(),
                level: Level::classify(issue.priority(), issue.severity(severity_field)),
                transitions,
            })
        })
        .collect()
}

/// Query the tracker for labelled bugs and extract their in-window histories
pub fn fetch_histories(
    client: &TrackerClient,
    schema: &TrackerSchema,
    label: &str,
    window: &DayWindow,
    today: Date,
) -> Result<Vec<BugHistory>> {
    let updated_from = today
        .checked_sub(window.start.days())
        .map_err(|e| Error::Validation(format!("window start out of range: {}", e)))?;

    let query = BugQuery::new(&schema.bugs, label, updated_from);
    let issues = client.search(&query)?;
    info!("Fetched {} bugs labelled {}", issues.len(), label);

    let histories = collect_histories(&issues, window, today, &schema.fields.severity);
    info!("{} bugs changed status in the window", histories.len());

    Ok(histories)
}
