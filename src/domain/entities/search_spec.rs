use crate::domain::values::predicate::Predicate;
use crate::domain::values::sort::SortSpec;
use crate::domain::values::time_window::PartialWindow;
use serde::{Deserialize, Serialize};

/// Everything a caller asks of one search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchSpec {
    pub predicate: Predicate,
    pub window: PartialWindow,
    /// `None` means "as many as the sanity ceiling allows".
    pub count: Option<usize>,
    /// Field projection; empty returns whole records.
    pub fields: Vec<String>,
    pub sort: Option<SortSpec>,
}

impl SearchSpec {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            ..Self::default()
        }
    }

    pub fn window(mut self, window: impl Into<PartialWindow>) -> Self {
        self.window = window.into();
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn is_newest_first(&self) -> bool {
        self.sort.as_ref().is_some_and(SortSpec::is_newest_first)
    }
}
