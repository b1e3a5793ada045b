use anyhow::Result;
use sprint_tools::bugs::{collect_histories, summarise, summarise_by_level};
use sprint_tools::plan::{
    load_csv_tasks, load_document, AttachDocument, MicroSprintDocument, Size, SprintDocument,
};
use sprint_tools::report::{render_dump, render_level_summary};
use sprint_tools::time::DayWindow;
use sprint_tools::tracker::Issue;
use sprint_tools::{Error, TrackerSchema};
use std::fs;
use tempfile::TempDir;

// MockTracker is only compiled for unit tests, so these cover the file
// formats and the offline half of each pipeline.

const BOARD: &str = r#"config:
  board_key: APP
  assigned_team: rapid
  sprint: 86
  customer: jane.doe
  peer_reviewers:
    - alice
"#;

/// Sprint document on disk through to planned stories
#[test]
fn test_sprint_document_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("sprint.yaml");
    fs::write(
        &path,
        format!(
            "{}stories:\n  - summary: Login page\n    description: Users sign in\n    acceptance_criteria: [Form validates, Errors shown]\n    tasks:\n      - summary: Build form\n        size: L\n        repeat: 2\n      - summary: Review\n        size: S\n",
            BOARD
        ),
    )?;

    let document: SprintDocument = load_document(&path)?;
    let planned = document.stories[0].plan();

    assert_eq!(planned.tasks.len(), 3);
    assert_eq!(planned.tasks[1].summary, "Build form pt. 2");
    assert_eq!(planned.tasks[2].size, Size::S);
    // 360 * 2 + 120 = 840 minutes
    assert_eq!(planned.points, 14);
    assert_eq!(
        planned.description,
        "h6. Description:\nUsers sign in\n\nh6.Acceptance Criteria:\n* Form validates\n* Errors shown\n"
    );

    Ok(())
}

#[test]
fn test_micro_sprint_document_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("micro.yaml");
    fs::write(
        &path,
        format!(
            "{}stories:\n  - sum: Payments spike\n    acc_cri: [Options compared]\n    tasks: 3\n    sizes: XS\n",
            BOARD
        ),
    )?;

    let document: MicroSprintDocument = load_document(&path)?;
    let planned = document.stories[0].to_story().plan();

    let summaries: Vec<&str> = planned.tasks.iter().map(|t| t.summary.as_str()).collect();
    assert_eq!(
        summaries,
        vec!["Payments spike pt. 1", "Payments spike pt. 2", "Payments spike pt. 3"]
    );
    assert_eq!(planned.points, 3);

    Ok(())
}

#[test]
fn test_invalid_document_fails_before_any_request() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("sprint.yaml");
    fs::write(&path, format!("{}stories: []\n", BOARD))?;

    let err = load_document::<SprintDocument>(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ref msg) if msg == "stories: must contain at least 1 item"
    ));

    Ok(())
}

/// Attach inputs: board document without a sprint plus the CSV rows
#[test]
fn test_attach_inputs_from_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let board_path = temp_dir.path().join("board.yaml");
    let csv_path = temp_dir.path().join("tasks.csv");
    fs::write(&board_path, BOARD.replace("  sprint: 86\n", ""))?;
    fs::write(
        &csv_path,
        "story,summary,hours\nAPP-10,Write docs,5\nAPP-11,Pair on review,7\n",
    )?;

    let document: AttachDocument = load_document(&board_path)?;
    assert_eq!(document.config.sprint, None);

    let tasks = load_csv_tasks(&csv_path)?;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].story_key, "APP-10");
    assert_eq!(tasks[0].size_spec().size(), Size::M);
    assert_eq!(tasks[1].size_spec().size(), Size::L);
    assert_eq!(tasks[1].size_spec().minutes(), 420);

    Ok(())
}

#[test]
fn test_csv_with_extra_column_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("tasks.csv");
    fs::write(&csv_path, "story,summary,hours\nAPP-10,Write docs,5,extra\n")?;

    let err = load_csv_tasks(&csv_path).unwrap_err();
    assert!(matches!(err, Error::Validation(ref msg) if msg.contains("line 2")));

    Ok(())
}

#[test]
fn test_schema_file_overrides_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("schema.toml");
    fs::write(
        &path,
        concat!(
            "[fields]\nseverity = \"customfield_20000\"\n\n",
            "[workflow]\napprove_transition_id = \"31\"\n",
        ),
    )?;

    let schema = TrackerSchema::load(Some(&path))?;
    assert_eq!(schema.fields.severity, "customfield_20000");
    assert_eq!(schema.workflow.approve_transition_id, "31");
    // Untouched sections keep the built-in ids
    assert_eq!(schema.fields.story_points, "customfield_10005");
    assert_eq!(schema.bugs.project, "Bugs");

    Ok(())
}

#[test]
fn test_missing_schema_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");
    assert!(TrackerSchema::load(Some(&path)).is_err());
}

/// Search response through to the rendered tables
#[test]
fn test_bug_report_from_search_response() -> Result<()> {
    let issues: Vec<Issue> = serde_json::from_str(
        r#"[
        {
            "key": "BUG-1",
            "fields": {"priority": {"id": "1"}, "customfield_10300": {"value": "1 - Blocker"}},
            "changelog": {"histories": [
                {"created": "2024-03-09T11:00:00.000+0000",
                 "items": [{"field": "status", "fieldId": "status", "fromString": "In Progress", "toString": "Done"}]},
                {"created": "2024-03-08T10:00:00.000+0000",
                 "items": [{"field": "status", "fieldId": "status", "fromString": "Open", "toString": "In Progress"}]}
            ]}
        },
        {
            "key": "BUG-2",
            "fields": {"priority": {"id": "3"}},
            "changelog": {"histories": [
                {"created": "2024-03-07T10:00:00.000+0000",
                 "items": [{"field": "status", "fromString": "Open", "toString": "In Progress"}]}
            ]}
        }
    ]"#,
    )?;

    let today = jiff::civil::date(2024, 3, 10);
    let window = DayWindow::from_dates("01-03-2024", "09-03-2024", today)?;
    let histories = collect_histories(&issues, &window, today, "customfield_10300");

    assert_eq!(histories.len(), 2);
    assert_eq!(histories[0].transitions[0].from, "Open");

    let summary = summarise(&histories);
    assert_eq!(summary[0].from, "Open");
    assert_eq!(summary[0].count, 2);

    // BUG-2 has no severity, so only BUG-1 is levelled
    let levels = summarise_by_level(&histories);
    assert_eq!(levels.keys().copied().collect::<Vec<_>>(), vec![1]);
    assert!(render_level_summary(&levels).contains("| 1 "));

    let dump = render_dump(&histories);
    assert!(dump.contains("BUG-1"));
    assert!(dump.contains("BUG-2"));

    Ok(())
}

#[test]
fn test_future_window_is_rejected() {
    let today = jiff::civil::date(2024, 3, 10);
    let err = DayWindow::from_dates("01-03-2024", "11-03-2024", today).unwrap_err();
    assert!(matches!(err, Error::InvalidDate { .. }));
}
