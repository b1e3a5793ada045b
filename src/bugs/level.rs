use std::fmt;

/// Composite severity/priority bucket used to group bug summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Ranked(u32),
    /// Priority or severity missing
    NotAvailable,
}

impl Level {
    /// Combine raw 1-5 priority and severity codes. Raw codes are halved
    /// after shifting to zero so 1-2, 3-4 and 5 share a band; the formula is
    /// only meaningful for odd codes.
    pub fn classify(priority: Option<u32>, severity: Option<u32>) -> Level {
        match (priority, severity) {
            (Some(priority), Some(severity)) => {
                Level::Ranked(normalize(priority) * 2 + normalize(severity) + 1)
            }
            _ => Level::NotAvailable,
        }
    }

    pub fn rank(&self) -> Option<u32> {
        match self {
            Level::Ranked(rank) => Some(*rank),
            Level::NotAvailable => None,
        }
    }
}

fn normalize(raw: u32) -> u32 {
    raw.saturating_sub(1) / 2
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Ranked(rank) => write!(f, "{}", rank),
            Level::NotAvailable => f.write_str("NA"),
        }
    }
}
