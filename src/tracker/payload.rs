use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::TrackerSchema;
use crate::plan::{BoardConfig, SizeSpec};

/// Body of `POST /rest/api/2/issue/`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreateIssueRequest {
    pub fields: Map<String, Value>,
}

impl CreateIssueRequest {
    pub fn summary(&self) -> Option<&str> {
        self.fields.get("summary").and_then(Value::as_str)
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.fields
            .get("parent")
            .and_then(|p| p.get("key"))
            .and_then(Value::as_str)
    }
}

/// Body of `POST /rest/api/2/issue/<key>/transitions`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransitionRequest {
    pub transition: TransitionRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransitionRef {
    pub id: String,
}

impl TransitionRequest {
    pub fn new(id: impl Into<String>) -> Self {
        TransitionRequest {
            transition: TransitionRef { id: id.into() },
        }
    }
}

/// A parent story to create
#[derive(Debug, Clone, PartialEq)]
pub struct StoryPayload {
    pub project_key: String,
    pub issue_type: String,
    pub summary: String,
    pub description: String,
    pub sprint_id: Option<u64>,
    pub story_points: u32,
    pub customer: String,
    pub peer_reviewers: Vec<String>,
}

/// A sub-task to create under an existing story
#[derive(Debug, Clone, PartialEq)]
pub struct SubTaskPayload {
    pub project_key: String,
    pub issue_type_id: String,
    pub parent_key: String,
    pub summary: String,
    pub customer: String,
    pub size: SizeSpec,
    pub assigned_team: String,
    /// Link to the assigned team's group resource
    pub team_url: String,
    pub peer_reviewers: Vec<String>,
}

fn reviewer_refs(reviewers: &[String]) -> Value {
    Value::Array(reviewers.iter().map(|name| json!({ "name": name })).collect())
}

impl StoryPayload {
    pub fn new(
        schema: &TrackerSchema,
        board: &BoardConfig,
        summary: impl Into<String>,
        description: impl Into<String>,
        story_points: u32,
    ) -> Self {
        StoryPayload {
            project_key: board.board_key.clone(),
            issue_type: schema.issue_types.story.clone(),
            summary: summary.into(),
            description: description.into(),
            sprint_id: board.sprint,
            story_points,
            customer: board.customer.clone(),
            peer_reviewers: board.peer_reviewers.clone(),
        }
    }

    /// Wire shape, with custom fields keyed by the schema's ids
    pub fn to_request(&self, schema: &TrackerSchema) -> CreateIssueRequest {
        let ids = &schema.fields;
        let mut fields = Map::new();

        fields.insert("project".into(), json!({ "key": self.project_key }));
        fields.insert("issuetype".into(), json!({ "name": self.issue_type }));
        fields.insert("summary".into(), json!(self.summary));
        fields.insert("description".into(), json!(self.description));
        if let Some(sprint_id) = self.sprint_id {
            fields.insert(ids.sprint.clone(), json!(sprint_id));
        }
        fields.insert(ids.story_points.clone(), json!(self.story_points));
        fields.insert(ids.customer.clone(), json!({ "name": self.customer }));
        fields.insert(ids.peer_reviewers.clone(), reviewer_refs(&self.peer_reviewers));

        CreateIssueRequest { fields }
    }
}

impl SubTaskPayload {
    pub fn new(
        schema: &TrackerSchema,
        board: &BoardConfig,
        endpoint: &str,
        parent_key: impl Into<String>,
        summary: impl Into<String>,
        size: SizeSpec,
    ) -> Self {
        SubTaskPayload {
            project_key: board.board_key.clone(),
            issue_type_id: schema.issue_types.sub_task_id.clone(),
            parent_key: parent_key.into(),
            summary: summary.into(),
            customer: board.customer.clone(),
            size,
            assigned_team: board.assigned_team.clone(),
            team_url: format!(
                "{}/rest/api/2/group?groupname={}",
                endpoint.trim_end_matches('/'),
                board.assigned_team
            ),
            peer_reviewers: board.peer_reviewers.clone(),
        }
    }

    pub fn to_request(&self, schema: &TrackerSchema) -> CreateIssueRequest {
        let ids = &schema.fields;
        let mut fields = Map::new();

        fields.insert("project".into(), json!({ "key": self.project_key }));
        fields.insert("issuetype".into(), json!({ "id": self.issue_type_id }));
        fields.insert("parent".into(), json!({ "key": self.parent_key }));
        fields.insert("summary".into(), json!(self.summary));
        fields.insert(ids.customer.clone(), json!({ "name": self.customer }));
        fields.insert(
            ids.task_size.clone(),
            json!({ "value": self.size.size().label() }),
        );
        fields.insert(
            ids.assigned_team.clone(),
            json!({ "name": self.assigned_team, "self": self.team_url }),
        );
        fields.insert(ids.peer_reviewers.clone(), reviewer_refs(&self.peer_reviewers));
        fields.insert(
            "timetracking".into(),
            json!({ "originalEstimate": format!("{}m", self.size.minutes()) }),
        );

        CreateIssueRequest { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Size;

    fn board() -> BoardConfig {
        BoardConfig {
            board_key: "APP".to_string(),
            assigned_team: "rapid".to_string(),
            sprint: Some(208),
            customer: "jane.doe".to_string(),
            peer_reviewers: vec!["alice".to_string(), "bob".to_string()],
        }
    }

    #[test]
    fn test_story_wire_shape() {
        let schema = TrackerSchema::default();
        let payload = StoryPayload::new(&schema, &board(), "Login page", "h6. body", 13);
        let request = payload.to_request(&schema);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "fields": {
                    "project": {"key": "APP"},
                    "issuetype": {"name": "User Story"},
                    "summary": "Login page",
                    "description": "h6. body",
                    "customfield_10007": 208,
                    "customfield_10005": 13,
                    "customfield_10400": {"name": "jane.doe"},
                    "customfield_10700": [{"name": "alice"}, {"name": "bob"}]
                }
            })
        );
        assert_eq!(request.summary(), Some("Login page"));
        assert_eq!(request.parent_key(), None);
    }

    #[test]
    fn test_story_without_sprint() {
        let schema = TrackerSchema::default();
        let mut board = board();
        board.sprint = None;
        let request = StoryPayload::new(&schema, &board, "s", "d", 1).to_request(&schema);
        assert!(!request.fields.contains_key("customfield_10007"));
    }

    #[test]
    fn test_sub_task_wire_shape() {
        let schema = TrackerSchema::default();
        let payload = SubTaskPayload::new(
            &schema,
            &board(),
            "https://tracker.example.com/",
            "APP-7",
            "Build form pt. 1",
            SizeSpec::BySize(Size::M),
        );

        assert_eq!(
            serde_json::to_value(payload.to_request(&schema)).unwrap(),
            json!({
                "fields": {
                    "project": {"key": "APP"},
                    "issuetype": {"id": "5"},
                    "parent": {"key": "APP-7"},
                    "summary": "Build form pt. 1",
                    "customfield_10400": {"name": "jane.doe"},
                    "customfield_11900": {"value": "M"},
                    "customfield_12001": {
                        "name": "rapid",
                        "self": "https://tracker.example.com/rest/api/2/group?groupname=rapid"
                    },
                    "customfield_10700": [{"name": "alice"}, {"name": "bob"}],
                    "timetracking": {"originalEstimate": "240m"}
                }
            })
        );
    }

    #[test]
    fn test_sub_task_by_hours() {
        let schema = TrackerSchema::default();
        let request = SubTaskPayload::new(
            &schema,
            &board(),
            "https://tracker.example.com",
            "APP-7",
            "Write docs",
            SizeSpec::ByHours(5),
        )
        .to_request(&schema);

        assert_eq!(request.fields["customfield_11900"], json!({"value": "M"}));
        assert_eq!(
            request.fields["timetracking"],
            json!({"originalEstimate": "300m"})
        );
        assert_eq!(request.parent_key(), Some("APP-7"));
    }

    #[test]
    fn test_custom_field_ids_come_from_schema() {
        let mut schema = TrackerSchema::default();
        schema.fields.task_size = "customfield_55555".to_string();
        let request = SubTaskPayload::new(
            &schema,
            &board(),
            "https://tracker.example.com",
            "APP-7",
            "x",
            SizeSpec::BySize(Size::XS),
        )
        .to_request(&schema);

        assert!(request.fields.contains_key("customfield_55555"));
        assert!(!request.fields.contains_key("customfield_11900"));
    }

    #[test]
    fn test_transition_request() {
        assert_eq!(
            serde_json::to_value(TransitionRequest::new("11")).unwrap(),
            json!({"transition": {"id": "11"}})
        );
    }
}
