use std::fmt;

/// Bucket width for aggregation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Day,
    Month,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Day => write!(f, "day"),
            Frequency::Month => write!(f, "month"),
        }
    }
}

/// One aggregation bucket: bucket start (unix seconds) and its document count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct Bucket {
    pub key: i64,
    pub doc_count: u64,
}
