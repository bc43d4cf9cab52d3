use serde::Serialize;

/// One archive record, field order as returned by the service.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Records gathered by a search, in service order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub records: Vec<Record>,
    /// Set only when a cancelled search was allowed to return what it had.
    pub partial: bool,
    /// Windows skipped because their count could not be read. Non-zero
    /// means an empty result is not proof of no matches.
    pub degraded_windows: usize,
}

impl SearchOutcome {
    pub fn complete(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn partial(records: Vec<Record>) -> Self {
        Self {
            records,
            partial: true,
            degraded_windows: 0,
        }
    }

    pub fn with_degraded(mut self, windows: usize) -> Self {
        self.degraded_windows = windows;
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded_windows > 0
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
