use crate::error::{Error, Result};
use jiff::civil::Date;
use jiff::Zoned;

/// Format used for window bounds on the command line
pub const WINDOW_DATE_FORMAT: &str = "%d-%m-%Y";

/// Today's date in the local time zone
pub fn today() -> Date {
    Zoned::now().date()
}

/// Whole days between `date` and `today`; positive for dates in the past
pub fn day_offset(date: Date, today: Date) -> i64 {
    i64::from((today - date).get_days())
}

/// Parse a `dd-mm-yyyy` window bound and convert it into a day offset from `today`
///
/// Fails with [`Error::InvalidDate`] when the date lies after `today`.
pub fn parse_window_bound(s: &str, today: Date) -> Result<i64> {
    let date = Date::strptime(WINDOW_DATE_FORMAT, s.trim())
        .map_err(|e| Error::Window(format!("'{}' is not a dd-mm-yyyy date: {}", s, e)))?;

    let offset = day_offset(date, today);
    if offset < 0 {
        return Err(Error::InvalidDate {
            date: s.to_string(),
        });
    }

    Ok(offset)
}

/// Extract the calendar date from a tracker timestamp such as
/// `2024-03-05T10:15:30.000+0000`
pub fn parse_event_date(created: &str) -> Option<Date> {
    let date_part = created.split('T').next()?;
    date_part.parse::<Date>().ok()
}

/// A closed range of day offsets counted back from today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// Older bound (larger offset)
    pub start: i64,
    /// More recent bound (smaller offset)
    pub end: i64,
}

impl DayWindow {
    /// Build a window from the two command line dates
    pub fn from_dates(start: &str, end: &str, today: Date) -> Result<Self> {
        let start_offset = parse_window_bound(start, today)?;
        let end_offset = parse_window_bound(end, today)?;

        if start_offset < end_offset {
            return Err(Error::Window(format!(
                "start date {} must not be after end date {}",
                start, end
            )));
        }

        Ok(DayWindow {
            start: start_offset,
            end: end_offset,
        })
    }

    pub fn contains(&self, offset: i64) -> bool {
        self.end <= offset && offset <= self.start
    }
}
