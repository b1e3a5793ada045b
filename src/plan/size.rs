use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// T-shirt size of a sub-task, ordered smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::XS, Size::S, Size::M, Size::L, Size::XL];

    /// Fixed duration of the size bucket
    pub fn minutes(self) -> u32 {
        match self {
            Size::XS => 60,
            Size::S => 2 * 60,
            Size::M => 4 * 60,
            Size::L => 6 * 60,
            Size::XL => 8 * 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Size::XS => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
        }
    }

    /// Bucket closest to the given duration; ties go to the smaller size
    pub fn nearest(minutes: u32) -> Size {
        let mut best = Size::XS;
        for size in Size::ALL {
            if size.minutes().abs_diff(minutes) < best.minutes().abs_diff(minutes) {
                best = size;
            }
        }
        best
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::ALL
            .into_iter()
            .find(|size| size.label() == s)
            .ok_or_else(|| Error::UnrecognisedSize(s.to_string()))
    }
}

impl TryFrom<String> for Size {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.label().to_string()
    }
}

/// How a sub-task's effort is given: by size label or by an hour estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    BySize(Size),
    ByHours(u32),
}

impl SizeSpec {
    /// Size bucket recorded on the tracker
    pub fn size(&self) -> Size {
        match *self {
            SizeSpec::BySize(size) => size,
            SizeSpec::ByHours(hours) => Size::nearest(hours.saturating_mul(60)),
        }
    }

    /// Original time estimate in minutes
    pub fn minutes(&self) -> u32 {
        match *self {
            SizeSpec::BySize(size) => size.minutes(),
            SizeSpec::ByHours(hours) => hours.saturating_mul(60),
        }
    }
}
