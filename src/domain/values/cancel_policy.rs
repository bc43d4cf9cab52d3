use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a search does with records already collected when it is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Discard everything and fail with `Cancelled`.
    #[default]
    Fail,
    /// Return what was collected, flagged as partial.
    ReturnPartial,
}

impl fmt::Display for CancelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelPolicy::Fail => write!(f, "fail"),
            CancelPolicy::ReturnPartial => write!(f, "return_partial"),
        }
    }
}

impl FromStr for CancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fail" => Ok(CancelPolicy::Fail),
            "return_partial" | "partial" => Ok(CancelPolicy::ReturnPartial),
            _ => Err(format!("Unknown cancel policy: {s}")),
        }
    }
}
