//! User segment selection.
//!
//! A [`Segment`] decides which count column drives charts and the headline
//! metric. It never changes what the aggregators compute.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::analyzers::types::UserCounts;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    #[default]
    All,
    Registered,
    Casual,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::All, Segment::Registered, Segment::Casual];

    /// Picks this segment's column out of a set of counts.
    pub fn select<T: Copy>(self, counts: &UserCounts<T>) -> T {
        match self {
            Segment::All => counts.total,
            Segment::Registered => counts.registered,
            Segment::Casual => counts.casual,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Segment::All => "all",
            Segment::Registered => "registered",
            Segment::Casual => "casual",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown segment `{0}`, expected one of: all, registered, casual")]
pub struct UnknownSegment(String);

impl FromStr for Segment {
    type Err = UnknownSegment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Segment::All),
            "registered" => Ok(Segment::Registered),
            "casual" => Ok(Segment::Casual),
            _ => Err(UnknownSegment(s.to_string())),
        }
    }
}
