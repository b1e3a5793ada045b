pub mod bugs;
pub mod cli;
pub mod config;
pub mod error;
pub mod plan;
pub mod progress;
pub mod report;
pub mod sprint;
pub mod time;
pub mod tracker;

#[cfg(test)]
mod test_utils;

pub use config::TrackerSchema;
pub use error::{Error, Result};
