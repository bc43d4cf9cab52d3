use super::resource_kind::ResourceKind;
use serde::{Deserialize, Serialize};

/// Inclusive integer bounds; either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Result<Self, String> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(format!("Range lower bound {lo} exceeds upper bound {hi}"));
            }
        }
        Ok(Self { min, max })
    }

    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: i64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Record filter shared by every request of one search.
///
/// Collections are owned and start empty; an empty list means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Predicate {
    pub query: Option<String>,
    pub title_query: Option<String>,
    pub selftext_query: Option<String>,
    pub ids: Vec<String>,
    pub authors: Vec<String>,
    pub subreddits: Vec<String>,
    pub score: IntRange,
    pub num_comments: IntRange,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, q: impl Into<String>) -> Self {
        self.query = Some(q.into());
        self
    }

    pub fn title(mut self, q: impl Into<String>) -> Self {
        self.title_query = Some(q.into());
        self
    }

    pub fn selftext(mut self, q: impl Into<String>) -> Self {
        self.selftext_query = Some(q.into());
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn subreddits<I, S>(mut self, subreddits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subreddits = subreddits.into_iter().map(Into::into).collect();
        self
    }

    pub fn score(mut self, range: IntRange) -> Self {
        self.score = range;
        self
    }

    pub fn num_comments(mut self, range: IntRange) -> Self {
        self.num_comments = range;
        self
    }

    /// Reject filters the given collection does not support.
    pub fn validate_for(&self, kind: ResourceKind) -> Result<(), String> {
        if kind == ResourceKind::Comments {
            let mut unsupported = Vec::new();
            if self.title_query.is_some() {
                unsupported.push("title");
            }
            if self.selftext_query.is_some() {
                unsupported.push("selftext");
            }
            if !self.num_comments.is_unbounded() {
                unsupported.push("num_comments");
            }
            if !unsupported.is_empty() {
                return Err(format!(
                    "Filters not supported for comments: {}",
                    unsupported.join(", ")
                ));
            }
        }
        Ok(())
    }
}
