//! Test utilities for sprint-tools
#![cfg(test)]

use serde_json::{json, Map};

use crate::plan::BoardConfig;
use crate::tracker::{Changelog, History, HistoryItem, Issue, MockTracker, TrackerClient};

/// Create a mock tracker client holding the given bugs
pub fn create_test_tracker_client(issues: Vec<Issue>) -> TrackerClient {
    let mut mock = MockTracker::new();
    mock.issues = issues;
    TrackerClient::Mock(mock)
}

/// Create a bug with optional raw priority/severity and a changelog
/// (newest history first)
pub fn create_test_bug(
    key: &str,
    priority: Option<u32>,
    severity: Option<u32>,
    histories: Vec<History>,
) -> Issue {
    let mut fields = Map::new();
    if let Some(priority) = priority {
        fields.insert(
            "priority".to_string(),
            json!({"id": priority.to_string(), "name": format!("P{}", priority)}),
        );
    }
    if let Some(severity) = severity {
        fields.insert(
            "customfield_10300".to_string(),
            json!({"value": format!("{} - Severity", severity)}),
        );
    }

    Issue {
        key: key.to_string(),
        fields,
        changelog: Changelog { histories },
    }
}

/// A history entry holding a single status change
pub fn status_change(created: &str, from: &str, to: &str) -> History {
    History {
        created: created.to_string(),
        items: vec![HistoryItem {
            field: "status".to_string(),
            field_id: Some("status".to_string()),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }],
    }
}

/// Board settings used by the creation tests
pub fn create_test_board(sprint: Option<u64>) -> BoardConfig {
    BoardConfig {
        board_key: "APP".to_string(),
        assigned_team: "mobile-team".to_string(),
        sprint,
        customer: "Acme".to_string(),
        peer_reviewers: vec!["alice".to_string(), "bob".to_string()],
    }
}
