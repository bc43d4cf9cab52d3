use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute the archive indexes creation time under.
pub const CREATED_UTC: &str = "created_utc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub attribute: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(attribute: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            attribute: attribute.into(),
            direction,
        }
    }

    /// True when results come back newest first, which means time windows
    /// must be visited right half before left half to keep the order.
    pub fn is_newest_first(&self) -> bool {
        self.attribute == CREATED_UTC && self.direction == SortDirection::Desc
    }
}
