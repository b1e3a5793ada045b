//! Story and sub-task creation against the tracker.

use tracing::{debug, info};

use crate::config::TrackerSchema;
use crate::error::Result;
use crate::plan::{BoardConfig, CsvTask, PlannedStory, SizeSpec, StoryTemplate};
use crate::progress::ProgressReporter;
use crate::tracker::{StoryPayload, SubTaskPayload, TrackerClient};

/// Keys assigned to one created story and its sub-tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedStory {
    pub key: String,
    pub points: u32,
    pub sub_tasks: Vec<String>,
}

/// Creates stories and sub-tasks for one board
pub struct SprintCreator<'a> {
    client: &'a TrackerClient,
    schema: &'a TrackerSchema,
    board: &'a BoardConfig,
    progress: ProgressReporter,
}

impl<'a> SprintCreator<'a> {
    pub fn new(
        client: &'a TrackerClient,
        schema: &'a TrackerSchema,
        board: &'a BoardConfig,
    ) -> Self {
        SprintCreator {
            client,
            schema,
            board,
            progress: ProgressReporter::new(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Create every story in order; the first failure stops the run
    pub fn create_stories(&self, stories: &[StoryTemplate]) -> Result<Vec<CreatedStory>> {
        let mut created = Vec::with_capacity(stories.len());

        for (idx, story) in stories.iter().enumerate() {
            let planned = story.plan();
            created.push(self.create_story(&planned, &format!("Story {} Progress", idx))?);
        }

        Ok(created)
    }

    /// Create the parent story, then each of its sub-tasks
    pub fn create_story(&self, story: &PlannedStory, label: &str) -> Result<CreatedStory> {
        let request = StoryPayload::new(
            self.schema,
            self.board,
            &story.summary,
            &story.description,
            story.points,
        )
        .to_request(self.schema);

        let parent = self.client.create_issue(&request)?;
        info!("Created story {} ({} points)", parent.key, story.points);

        let mut progress = self.progress.start(label, story.tasks.len());
        let mut sub_tasks = Vec::with_capacity(story.tasks.len());

        for task in &story.tasks {
            let request = SubTaskPayload::new(
                self.schema,
                self.board,
                self.client.endpoint(),
                &parent.key,
                &task.summary,
                SizeSpec::BySize(task.size),
            )
            .to_request(self.schema);

            let created = self.client.create_issue(&request)?;
            debug!("Created sub-task {} under {}", created.key, parent.key);
            sub_tasks.push(created.key);
            progress.inc();
        }
        progress.finish();

        Ok(CreatedStory {
            key: parent.key,
            points: story.points,
            sub_tasks,
        })
    }

    /// Create each CSV task under its existing story and approve it
    pub fn attach_tasks(&self, tasks: &[CsvTask]) -> Result<Vec<String>> {
        let transition_id = &self.schema.workflow.approve_transition_id;
        let mut progress = self.progress.start("Progress", tasks.len());
        let mut keys = Vec::with_capacity(tasks.len());

        for task in tasks {
            let request = SubTaskPayload::new(
                self.schema,
                self.board,
                self.client.endpoint(),
                &task.story_key,
                &task.summary,
                task.size_spec(),
            )
            .to_request(self.schema);

            let created = self.client.create_issue(&request)?;
            self.client.transition(&created.key, transition_id)?;
            info!("Attached {} to {}", created.key, task.story_key);

            keys.push(created.key);
            progress.inc();
        }
        progress.finish();

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::plan::{Size, TaskTemplate};
    use crate::test_utils::create_test_board;
    use crate::tracker::MockTracker;
    use serde_json::json;

    fn story(summary: &str, tasks: Vec<TaskTemplate>) -> StoryTemplate {
        StoryTemplate {
            summary: summary.to_string(),
            description: None,
            acceptance_criteria: vec!["It works".to_string()],
            tasks,
        }
    }

    fn task(summary: &str, size: Size, repeat: Option<u32>) -> TaskTemplate {
        TaskTemplate {
            summary: summary.to_string(),
            size,
            repeat,
        }
    }

    fn mock_client(mock: &TrackerClient) -> &MockTracker {
        match mock {
            TrackerClient::Mock(mock) => mock,
            _ => panic!("Expected mock client"),
        }
    }

    #[test]
    fn test_story_then_sub_tasks() {
        let client = TrackerClient::mock();
        let schema = TrackerSchema::default();
        let board = create_test_board(Some(208));
        let creator =
            SprintCreator::new(&client, &schema, &board).with_progress(ProgressReporter::hidden());

        let created = creator
            .create_stories(&[story(
                "Login page",
                vec![task("Build form", Size::M, Some(2)), task("Review", Size::XS, None)],
            )])
            .unwrap();

        assert_eq!(
            created,
            vec![CreatedStory {
                key: "APP-1".to_string(),
                points: 9,
                sub_tasks: vec!["APP-2".to_string(), "APP-3".to_string(), "APP-4".to_string()],
            }]
        );

        let requests = mock_client(&client).created.borrow();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].parent_key(), None);
        assert_eq!(requests[0].fields["customfield_10005"], json!(9));
        assert_eq!(requests[0].fields["customfield_10007"], json!(208));
        assert_eq!(requests[1].summary(), Some("Build form pt. 1"));
        assert_eq!(requests[2].summary(), Some("Build form pt. 2"));
        assert_eq!(requests[3].summary(), Some("Review"));
        assert!(requests[1..].iter().all(|r| r.parent_key() == Some("APP-1")));
        assert_eq!(
            requests[1].fields["customfield_12001"]["self"],
            json!("https://tracker.test/rest/api/2/group?groupname=mobile-team")
        );
    }

    #[test]
    fn test_failure_stops_the_run() {
        let mut mock = MockTracker::new();
        mock.fail_create_at = Some(2);
        let client = TrackerClient::Mock(mock);
        let schema = TrackerSchema::default();
        let board = create_test_board(Some(1));
        let creator =
            SprintCreator::new(&client, &schema, &board).with_progress(ProgressReporter::hidden());

        let err = creator
            .create_stories(&[
                story("First", vec![task("a", Size::S, Some(3))]),
                story("Second", vec![task("b", Size::S, None)]),
            ])
            .unwrap_err();

        assert!(matches!(err, Error::Creation { status: 400, .. }));
        // Story plus one sub-task made it; nothing after the failure
        assert_eq!(mock_client(&client).created.borrow().len(), 2);
    }

    #[test]
    fn test_attach_creates_and_approves() {
        let client = TrackerClient::mock();
        let schema = TrackerSchema::default();
        let board = create_test_board(None);
        let creator =
            SprintCreator::new(&client, &schema, &board).with_progress(ProgressReporter::hidden());

        let tasks = vec![
            CsvTask {
                story_key: "APP-40".to_string(),
                summary: "Write docs".to_string(),
                hours: 5,
            },
            CsvTask {
                story_key: "APP-41".to_string(),
                summary: "Fix tests".to_string(),
                hours: 1,
            },
        ];

        let keys = creator.attach_tasks(&tasks).unwrap();
        assert_eq!(keys, vec!["APP-1", "APP-2"]);

        let mock = mock_client(&client);
        let requests = mock.created.borrow();
        assert_eq!(requests[0].parent_key(), Some("APP-40"));
        assert_eq!(
            requests[0].fields["timetracking"],
            json!({"originalEstimate": "300m"})
        );
        assert_eq!(requests[1].fields["customfield_11900"], json!({"value": "XS"}));

        assert_eq!(
            *mock.transitions.borrow(),
            vec![
                ("APP-1".to_string(), "11".to_string()),
                ("APP-2".to_string(), "11".to_string()),
            ]
        );
    }

    #[test]
    fn test_attach_failure_skips_transition() {
        let mut mock = MockTracker::new();
        mock.fail_create_at = Some(0);
        let client = TrackerClient::Mock(mock);
        let schema = TrackerSchema::default();
        let board = create_test_board(None);
        let creator =
            SprintCreator::new(&client, &schema, &board).with_progress(ProgressReporter::hidden());

        let tasks = vec![CsvTask {
            story_key: "APP-40".to_string(),
            summary: "Write docs".to_string(),
            hours: 2,
        }];

        assert!(creator.attach_tasks(&tasks).is_err());
        assert!(mock_client(&client).transitions.borrow().is_empty());
    }
}
