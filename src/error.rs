use std::fmt;
use thiserror::Error;

/// Errors raised by the tracker pipelines
#[derive(Error, Debug)]
pub enum Error {
    #[error("Bug query failed, {status}, \"{reason}\"")]
    Query { status: u16, reason: String },

    #[error("Issue creation failed, {status}, \"{reason}\", {body}")]
    Creation {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Transition of {key} failed, {status}, \"{reason}\", {body}")]
    Transition {
        key: String,
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Invalid report window: {0}")]
    Window(String),

    #[error("Date {date} is in the future")]
    InvalidDate { date: String },

    #[error("Unrecognised size '{0}'")]
    UnrecognisedSize(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// User-friendly error wrapper
#[derive(Debug)]
pub struct UserError {
    message: String,
    details: Option<String>,
    suggestion: Option<String>,
}

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        UserError {
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Format the error for display
    pub fn display(&self) {
        eprintln!("\n❌ Error: {}", self.message);

        if let Some(ref details) = self.details {
            eprintln!("\n   {}", details);
        }

        if let Some(ref suggestion) = self.suggestion {
            eprintln!("\n💡 {}", suggestion);
        }
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref details) = self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for UserError {}

/// Convert a top-level failure into something a person can act on
pub fn user_friendly_error(error: &anyhow::Error) -> UserError {
    let details = format!("{:#}", error);

    if let Some(err) = error.chain().find_map(|e| e.downcast_ref::<Error>()) {
        return match err {
            Error::Query { status: 401, .. }
            | Error::Creation { status: 401, .. }
            | Error::Transition { status: 401, .. } => {
                UserError::new("Tracker rejected the credentials")
                    .with_details(details)
                    .with_suggestion("Check the username and password or API token")
            }
            Error::Query { .. } => UserError::new("Bug search failed")
                .with_details(details)
                .with_suggestion("Check the project label and the tracker base URL"),
            Error::Creation { .. } => UserError::new("Issue creation failed")
                .with_details(details)
                .with_suggestion(
                    "Issues created before the failure were kept; check the schema field ids",
                ),
            Error::Transition { .. } => UserError::new("Issue transition failed")
                .with_details(details)
                .with_suggestion("Check the approve transition id in the tracker schema"),
            Error::Validation(_) | Error::UnrecognisedSize(_) => {
                UserError::new("Invalid configuration file")
                    .with_details(details)
                    .with_suggestion("Fix the document and run again; nothing was sent")
            }
            Error::Window(_) | Error::InvalidDate { .. } => {
                UserError::new("Invalid report window")
                    .with_details(details)
                    .with_suggestion("Window dates use dd-mm-yyyy and cannot be in the future")
            }
            Error::Http(_) => UserError::new("Network connection failed")
                .with_details(details)
                .with_suggestion("Check the endpoint URL and your connection"),
            Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                UserError::new("File not found")
                    .with_details(details)
                    .with_suggestion("Check the path passed on the command line")
            }
            Error::Json(_) | Error::Csv(_) | Error::Io(_) => {
                UserError::new("An unexpected error occurred").with_details(details)
            }
        };
    }

    let error_str = error.to_string();

    if error_str.contains("Failed to read") {
        return UserError::new("File not found")
            .with_details(details)
            .with_suggestion("Check the path passed on the command line");
    }

    if error_str.contains("Permission denied") {
        return UserError::new("Permission denied").with_details(details);
    }

    UserError::new("An unexpected error occurred").with_details(details)
}
