use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Instance-specific ids the tracker uses for custom fields, issue types and
/// workflow transitions
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TrackerSchema {
    #[serde(default)]
    pub fields: FieldIds,
    #[serde(default)]
    pub issue_types: IssueTypes,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub bugs: BugQueryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FieldIds {
    #[serde(default = "default_story_points")]
    pub story_points: String,
    #[serde(default = "default_customer")]
    pub customer: String,
    #[serde(default = "default_sprint")]
    pub sprint: String,
    #[serde(default = "default_assigned_team")]
    pub assigned_team: String,
    #[serde(default = "default_task_size")]
    pub task_size: String,
    #[serde(default = "default_peer_reviewers")]
    pub peer_reviewers: String,
    #[serde(default = "default_severity")]
    pub severity: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct IssueTypes {
    /// Issue type name used for parent stories
    #[serde(default = "default_story_type")]
    pub story: String,
    /// Issue type id used for sub-tasks
    #[serde(default = "default_sub_task_type_id")]
    pub sub_task_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WorkflowConfig {
    #[serde(default = "default_approve_transition_id")]
    pub approve_transition_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BugQueryConfig {
    #[serde(default = "default_bug_project")]
    pub project: String,
    /// Name of the label field as written in JQL
    #[serde(default = "default_label_field")]
    pub label_field: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl TrackerSchema {
    /// Load the schema from a path, the default location, or fall back to the
    /// built-in ids when no file exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let schema_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_schema_path()?;
                if !default_path.exists() {
                    debug!("No tracker schema at {:?}, using built-in ids", default_path);
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let contents = std::fs::read_to_string(&schema_path)
            .with_context(|| format!("Failed to read tracker schema from {:?}", schema_path))?;

        let schema: TrackerSchema = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse tracker schema from {:?}", schema_path))?;

        Ok(schema)
    }

    /// Get the default schema file path
    pub fn default_schema_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("sprint-tools").join("schema.toml"))
    }
}

impl Default for TrackerSchema {
    fn default() -> Self {
        TrackerSchema {
            fields: FieldIds::default(),
            issue_types: IssueTypes::default(),
            workflow: WorkflowConfig::default(),
            bugs: BugQueryConfig::default(),
        }
    }
}

impl Default for FieldIds {
    fn default() -> Self {
        FieldIds {
            story_points: default_story_points(),
            customer: default_customer(),
            sprint: default_sprint(),
            assigned_team: default_assigned_team(),
            task_size: default_task_size(),
            peer_reviewers: default_peer_reviewers(),
            severity: default_severity(),
        }
    }
}

impl Default for IssueTypes {
    fn default() -> Self {
        IssueTypes {
            story: default_story_type(),
            sub_task_id: default_sub_task_type_id(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            approve_transition_id: default_approve_transition_id(),
        }
    }
}

impl Default for BugQueryConfig {
    fn default() -> Self {
        BugQueryConfig {
            project: default_bug_project(),
            label_field: default_label_field(),
            page_size: default_page_size(),
        }
    }
}

// Default value functions
fn default_story_points() -> String {
    "customfield_10005".to_string()
}

fn default_customer() -> String {
    "customfield_10400".to_string()
}

fn default_sprint() -> String {
    "customfield_10007".to_string()
}

fn default_assigned_team() -> String {
    "customfield_12001".to_string()
}

fn default_task_size() -> String {
    "customfield_11900".to_string()
}

fn default_peer_reviewers() -> String {
    "customfield_10700".to_string()
}

fn default_severity() -> String {
    "customfield_10300".to_string()
}

fn default_story_type() -> String {
    "User Story".to_string()
}

fn default_sub_task_type_id() -> String {
    "5".to_string()
}

fn default_approve_transition_id() -> String {
    "11".to_string()
}

fn default_bug_project() -> String {
    "Bugs".to_string()
}

fn default_label_field() -> String {
    "Project Label".to_string()
}

fn default_page_size() -> u32 {
    50
}
