//! Sprint plan documents: the YAML files the creator commands read, their
//! validation, and the expansion of task templates into concrete sub-tasks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

mod csv_tasks;
mod expand;
mod size;

pub use csv_tasks::{load_csv_tasks, read_csv_tasks, CsvTask};
pub use expand::{expand_tasks, render_description, story_points, PlannedStory, PlannedTask};
pub use size::{Size, SizeSpec};

/// Upper bound on `repeat` and on micro-story parts
pub const MAX_REPEAT: u32 = 1000;

/// Board and team settings shared by every creator command
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    pub board_key: String,
    pub assigned_team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<u64>,
    pub customer: String,
    pub peer_reviewers: Vec<String>,
}

/// Input of the `sprint` command
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SprintDocument {
    pub config: BoardConfig,
    pub stories: Vec<StoryTemplate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoryTemplate {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub acceptance_criteria: Vec<String>,
    pub tasks: Vec<TaskTemplate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskTemplate {
    pub summary: String,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
}

/// Input of the `micro-sprint` command: each story is split into a number of
/// equally sized parts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MicroSprintDocument {
    pub config: BoardConfig,
    pub stories: Vec<MicroStory>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MicroStory {
    pub sum: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub acc_cri: Vec<String>,
    pub tasks: u32,
    pub sizes: Size,
}

/// Input of the `attach` command; only the board settings are needed
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AttachDocument {
    pub config: BoardConfig,
}

impl MicroStory {
    /// Equivalent story template; every part is suffixed, even a single one
    pub fn to_story(&self) -> StoryTemplate {
        StoryTemplate {
            summary: self.sum.clone(),
            description: self.desc.clone(),
            acceptance_criteria: self.acc_cri.clone(),
            tasks: (1..=self.tasks)
                .map(|idx| TaskTemplate {
                    summary: format!("{} pt. {}", self.sum, idx),
                    size: self.sizes,
                    repeat: None,
                })
                .collect(),
        }
    }
}

/// Collects every schema violation in a document so they are reported together
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    fn non_empty_str(&mut self, path: &str, value: &str) {
        if value.is_empty() {
            self.messages.push(format!("{}: must not be empty", path));
        }
    }

    fn non_empty_list<T>(&mut self, path: &str, items: &[T]) {
        if items.is_empty() {
            self.messages.push(format!("{}: must contain at least 1 item", path));
        }
    }

    fn at_least(&mut self, path: &str, value: u32, min: u32) {
        if value < min {
            self.messages
                .push(format!("{}: must be at least {}, got {}", path, min, value));
        }
    }

    fn at_most(&mut self, path: &str, value: u32, max: u32) {
        if value > max {
            self.messages
                .push(format!("{}: must be at most {}, got {}", path, max, value));
        }
    }

    fn required<T>(&mut self, path: &str, value: &Option<T>) {
        if value.is_none() {
            self.messages.push(format!("{}: is required", path));
        }
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.messages.join("; ")))
        }
    }
}

/// A document that can check its own constraints after deserialization
pub trait Validate {
    fn collect_violations(&self, violations: &mut Violations);

    fn validate(&self) -> Result<()> {
        let mut violations = Violations::default();
        self.collect_violations(&mut violations);
        violations.into_result()
    }
}

impl BoardConfig {
    fn collect_violations(&self, v: &mut Violations) {
        v.non_empty_str("config.board_key", &self.board_key);
        v.non_empty_str("config.assigned_team", &self.assigned_team);
        v.non_empty_str("config.customer", &self.customer);
        v.non_empty_list("config.peer_reviewers", &self.peer_reviewers);
    }
}

impl Validate for SprintDocument {
    fn collect_violations(&self, v: &mut Violations) {
        self.config.collect_violations(v);
        v.required("config.sprint", &self.config.sprint);
        v.non_empty_list("stories", &self.stories);

        for (i, story) in self.stories.iter().enumerate() {
            let path = format!("stories[{}]", i);
            v.non_empty_str(&format!("{}.summary", path), &story.summary);
            if let Some(description) = &story.description {
                v.non_empty_str(&format!("{}.description", path), description);
            }
            v.non_empty_list(&format!("{}.acceptance_criteria", path), &story.acceptance_criteria);
            for (j, criterion) in story.acceptance_criteria.iter().enumerate() {
                v.non_empty_str(&format!("{}.acceptance_criteria[{}]", path, j), criterion);
            }
            v.non_empty_list(&format!("{}.tasks", path), &story.tasks);
            for (j, task) in story.tasks.iter().enumerate() {
                v.non_empty_str(&format!("{}.tasks[{}].summary", path, j), &task.summary);
                if let Some(repeat) = task.repeat {
                    let repeat_path = format!("{}.tasks[{}].repeat", path, j);
                    v.at_least(&repeat_path, repeat, 1);
                    v.at_most(&repeat_path, repeat, MAX_REPEAT);
                }
            }
        }
    }
}

impl Validate for MicroSprintDocument {
    fn collect_violations(&self, v: &mut Violations) {
        self.config.collect_violations(v);
        v.required("config.sprint", &self.config.sprint);
        v.non_empty_list("stories", &self.stories);

        for (i, story) in self.stories.iter().enumerate() {
            let path = format!("stories[{}]", i);
            v.non_empty_str(&format!("{}.sum", path), &story.sum);
            if let Some(desc) = &story.desc {
                v.non_empty_str(&format!("{}.desc", path), desc);
            }
            v.non_empty_list(&format!("{}.acc_cri", path), &story.acc_cri);
            for (j, criterion) in story.acc_cri.iter().enumerate() {
                v.non_empty_str(&format!("{}.acc_cri[{}]", path, j), criterion);
            }
            v.at_least(&format!("{}.tasks", path), story.tasks, 1);
            v.at_most(&format!("{}.tasks", path), story.tasks, MAX_REPEAT);
        }
    }
}

impl Validate for AttachDocument {
    fn collect_violations(&self, v: &mut Violations) {
        self.config.collect_violations(v);
    }
}

/// Parse and validate a YAML plan document
pub fn parse_document<T>(yaml: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let document: T =
        serde_yaml::from_str(yaml).map_err(|e| Error::Validation(e.to_string()))?;
    document.validate()?;
    Ok(document)
}

/// Read, parse and validate a YAML plan document from disk
pub fn load_document<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let contents = std::fs::read_to_string(path)?;
    parse_document(&contents)
}
