use anyhow::{Context, Result};
use clap::Parser;
use sprint_tools::bugs::{fetch_histories, summarise, summarise_by_level};
use sprint_tools::cli::{Cli, Commands, Connection, ReportMode};
use sprint_tools::error::user_friendly_error;
use sprint_tools::plan::{
    load_csv_tasks, load_document, AttachDocument, BoardConfig, MicroSprintDocument,
    SprintDocument, StoryTemplate,
};
use sprint_tools::report::{render_dump, render_level_summary, render_summary};
use sprint_tools::sprint::{CreatedStory, SprintCreator};
use sprint_tools::time::{today, DayWindow};
use sprint_tools::tracker::TrackerClient;
use sprint_tools::TrackerSchema;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage, help and version all end the run cleanly
            e.print().context("Failed to print usage")?;
            return Ok(());
        }
    };

    // Set up logging based on verbosity
    setup_logging(cli.verbose)?;

    if let Err(e) = run(&cli) {
        user_friendly_error(&e).display();
        std::process::exit(1);
    }

    Ok(())
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    info!("Loading tracker schema");
    let schema =
        TrackerSchema::load(cli.schema.as_deref()).context("Failed to load tracker schema")?;

    match &cli.command {
        Commands::Bugs {
            connection,
            label,
            start,
            end,
            mode,
            by_level,
        } => bugs_command(&schema, connection, label, start, end, *mode, *by_level),
        Commands::Sprint { connection, config } => sprint_command(&schema, connection, config),
        Commands::MicroSprint { connection, config } => {
            micro_sprint_command(&schema, connection, config)
        }
        Commands::Attach {
            connection,
            config,
            tasks,
        } => attach_command(&schema, connection, config, tasks),
    }
}

fn connect(connection: &Connection) -> Result<TrackerClient> {
    TrackerClient::new(
        &connection.endpoint,
        &connection.username,
        &connection.password,
    )
    .context("Failed to create tracker client")
}

fn bugs_command(
    schema: &TrackerSchema,
    connection: &Connection,
    label: &str,
    start: &str,
    end: &str,
    mode: ReportMode,
    by_level: bool,
) -> Result<()> {
    let today = today();
    let window = DayWindow::from_dates(start, end, today).context("Invalid report window")?;
    info!(
        "Reporting on {} between {} and {} days ago",
        label, window.start, window.end
    );

    let client = connect(connection)?;
    let histories = fetch_histories(&client, schema, label, &window, today)
        .with_context(|| format!("Failed to fetch bugs labelled {}", label))?;

    let table = match (mode, by_level) {
        (ReportMode::Dump, _) => render_dump(&histories),
        (ReportMode::Summarise, false) => render_summary(&summarise(&histories)),
        (ReportMode::Summarise, true) => render_level_summary(&summarise_by_level(&histories)),
    };
    println!("{}", table);

    Ok(())
}

fn sprint_command(schema: &TrackerSchema, connection: &Connection, config: &Path) -> Result<()> {
    let document: SprintDocument = load_document(config)
        .with_context(|| format!("Failed to load sprint document {:?}", config))?;
    println!("✓ Loaded {} stories", document.stories.len());

    let client = connect(connection)?;
    create_stories(schema, &client, &document.config, &document.stories)
}

fn micro_sprint_command(
    schema: &TrackerSchema,
    connection: &Connection,
    config: &Path,
) -> Result<()> {
    let document: MicroSprintDocument = load_document(config)
        .with_context(|| format!("Failed to load micro-sprint document {:?}", config))?;
    println!("✓ Loaded {} stories", document.stories.len());

    let stories: Vec<StoryTemplate> = document.stories.iter().map(|s| s.to_story()).collect();
    let client = connect(connection)?;
    create_stories(schema, &client, &document.config, &stories)
}

fn create_stories(
    schema: &TrackerSchema,
    client: &TrackerClient,
    board: &BoardConfig,
    stories: &[StoryTemplate],
) -> Result<()> {
    let creator = SprintCreator::new(client, schema, board);
    let created = creator
        .create_stories(stories)
        .context("Failed to create sprint stories")?;

    for CreatedStory {
        key,
        points,
        sub_tasks,
    } in &created
    {
        println!(
            "✓ {} ({} points, {} sub-tasks)",
            key,
            points,
            sub_tasks.len()
        );
    }

    Ok(())
}

fn attach_command(
    schema: &TrackerSchema,
    connection: &Connection,
    config: &Path,
    tasks: &Path,
) -> Result<()> {
    let document: AttachDocument = load_document(config)
        .with_context(|| format!("Failed to load board document {:?}", config))?;
    let tasks =
        load_csv_tasks(tasks).with_context(|| format!("Failed to read tasks from {:?}", tasks))?;
    println!("✓ Loaded {} tasks", tasks.len());

    let client = connect(connection)?;
    let creator = SprintCreator::new(&client, schema, &document.config);
    let keys = creator
        .attach_tasks(&tasks)
        .context("Failed to attach tasks")?;

    println!("✓ Attached and approved {} tasks", keys.len());

    Ok(())
}
