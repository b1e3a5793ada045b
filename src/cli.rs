use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sprint-tools",
    about = "Bug transition reports and bulk sprint creation for a Jira-style tracker",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the tracker schema file
    #[arg(long, global = true, env = "SPRINT_TOOLS_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Tracker location and basic-auth credentials
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// Tracker base URL, e.g. https://tracker.example.com
    pub endpoint: String,

    pub username: String,

    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report status transitions of labelled bugs inside a date window
    Bugs {
        #[command(flatten)]
        connection: Connection,

        /// Value of the project label field
        label: String,

        /// Window start, dd-mm-yyyy
        start: String,

        /// Window end, dd-mm-yyyy
        end: String,

        /// Count transitions or list them per bug
        #[arg(value_enum)]
        mode: ReportMode,

        /// Group the summary by priority/severity level
        #[arg(long)]
        by_level: bool,
    },

    /// Create the stories and sub-tasks of a sprint document
    Sprint {
        #[command(flatten)]
        connection: Connection,

        /// Sprint YAML document
        config: PathBuf,
    },

    /// Create stories split into equally sized parts
    MicroSprint {
        #[command(flatten)]
        connection: Connection,

        /// Micro-sprint YAML document
        config: PathBuf,
    },

    /// Attach CSV tasks to existing stories and approve them
    Attach {
        #[command(flatten)]
        connection: Connection,

        /// Board YAML document
        config: PathBuf,

        /// CSV of story key, summary and hours
        tasks: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Summarise,
    Dump,
}
