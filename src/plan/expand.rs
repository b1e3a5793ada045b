use super::{Size, StoryTemplate, TaskTemplate};

/// A concrete sub-task to create under a story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    pub summary: String,
    pub size: Size,
}

/// A story with its tasks expanded and its points computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStory {
    pub summary: String,
    /// Rendered description body, acceptance criteria included
    pub description: String,
    pub points: u32,
    pub tasks: Vec<PlannedTask>,
}

/// Flatten task templates, repeating each `repeat` times. Copies of a
/// repeated task are suffixed ` pt. <n>` starting from 1.
pub fn expand_tasks(templates: &[TaskTemplate]) -> Vec<PlannedTask> {
    let mut tasks = Vec::new();

    for template in templates {
        let repeat = template.repeat.unwrap_or(1);
        for idx in 1..=repeat {
            let summary = if repeat > 1 {
                format!("{} pt. {}", template.summary, idx)
            } else {
                template.summary.clone()
            };
            tasks.push(PlannedTask {
                summary,
                size: template.size,
            });
        }
    }

    tasks
}

/// Whole hours of work in the tasks, rounded down
pub fn story_points(tasks: &[PlannedTask]) -> u32 {
    let total_minutes: u64 = tasks.iter().map(|t| u64::from(t.size.minutes())).sum();
    u32::try_from(total_minutes / 60).unwrap_or(u32::MAX)
}

/// Tracker wiki markup for a story body
pub fn render_description(description: &str, acceptance_criteria: &[String]) -> String {
    format!(
        "h6. Description:\n{}\n\nh6.Acceptance Criteria:\n* {}\n",
        description,
        acceptance_criteria.join("\n* ")
    )
}

impl StoryTemplate {
    /// Expand the story into what will be sent to the tracker
    pub fn plan(&self) -> PlannedStory {
        let tasks = expand_tasks(&self.tasks);
        let description = self.description.as_deref().unwrap_or(&self.summary);

        PlannedStory {
            summary: self.summary.clone(),
            description: render_description(description, &self.acceptance_criteria),
            points: story_points(&tasks),
            tasks,
        }
    }
}
