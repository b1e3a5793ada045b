use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use super::SizeSpec;
use crate::error::{Error, Result};

/// One ad-hoc task to attach to an existing story
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CsvTask {
    pub story_key: String,
    pub summary: String,
    pub hours: u32,
}

impl CsvTask {
    pub fn size_spec(&self) -> SizeSpec {
        SizeSpec::ByHours(self.hours)
    }
}

/// Read `story-key,summary,hours` rows; the first line is a header and is skipped
pub fn read_csv_tasks<R: Read>(reader: R) -> Result<Vec<CsvTask>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut tasks = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = idx + 2;

        if record.len() != 3 {
            return Err(Error::Validation(format!(
                "line {}: expected 3 columns, found {}",
                line,
                record.len()
            )));
        }

        let hours = record[2].parse::<u32>().map_err(|_| {
            Error::Validation(format!(
                "line {}: hours must be a whole number, got '{}'",
                line, &record[2]
            ))
        })?;

        tasks.push(CsvTask {
            story_key: record[0].to_string(),
            summary: record[1].to_string(),
            hours,
        });
    }

    Ok(tasks)
}

pub fn load_csv_tasks(path: &Path) -> Result<Vec<CsvTask>> {
    let file = std::fs::File::open(path)?;
    read_csv_tasks(file)
}
