use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a `/search` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchPage {
    #[serde(rename = "startAt", default)]
    pub start_at: u32,
    #[serde(rename = "maxResults", default)]
    pub max_results: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// An issue as returned by the tracker with `expand=changelog`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub changelog: Changelog,
}

/// Change history of an issue, newest entry first
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

/// A single recorded change, possibly touching several fields
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct History {
    pub created: String,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub field: String,
    #[serde(rename = "fieldId", default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    #[serde(rename = "fromString", default)]
    pub from: Option<String>,
    #[serde(rename = "toString", default)]
    pub to: Option<String>,
}

impl HistoryItem {
    /// Whether this item records a workflow status change
    pub fn is_status_change(&self) -> bool {
        self.field_id.as_deref().unwrap_or(&self.field) == "status"
    }
}

/// Response body of a successful issue creation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreatedIssue {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: String,
}

impl Issue {
    /// Raw priority ordinal, taken from the standard `priority` field
    pub fn priority(&self) -> Option<u32> {
        self.fields.get("priority").and_then(parse_ordinal)
    }

    /// Raw severity ordinal stored in the given custom field
    pub fn severity(&self, field_id: &str) -> Option<u32> {
        self.fields.get(field_id).and_then(parse_ordinal)
    }
}

/// Read a small ordinal code out of whatever shape the tracker used for it:
/// a bare number, a string such as `"3 - Minor"`, or an object carrying one
/// of those under `value`, `name` or `id` (checked in that order, since
/// select options carry an unrelated numeric `id`).
pub fn parse_ordinal(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
        Value::Object(obj) => ["value", "name", "id"]
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(parse_ordinal),
        _ => None,
    }
}
