use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two searchable collections exposed by the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Submissions,
    Comments,
}

impl ResourceKind {
    /// Path segment of the search endpoint for this kind.
    pub fn endpoint_segment(&self) -> &'static str {
        match self {
            ResourceKind::Submissions => "submission",
            ResourceKind::Comments => "comment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Submissions => write!(f, "submissions"),
            ResourceKind::Comments => write!(f, "comments"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submissions" | "submission" | "posts" => Ok(ResourceKind::Submissions),
            "comments" | "comment" => Ok(ResourceKind::Comments),
            _ => Err(format!("Unknown resource kind: {s}")),
        }
    }
}
