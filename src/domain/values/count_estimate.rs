use serde::Serialize;

/// Approximate number of matches in a window, as reported by the
/// aggregation endpoint.
///
/// `degraded` is set when the aggregation payload was missing or malformed
/// and the total fell back to zero, so "no matches" and "count unavailable"
/// stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CountEstimate {
    pub total: u64,
    pub degraded: bool,
}

impl CountEstimate {
    pub fn exact(total: u64) -> Self {
        Self {
            total,
            degraded: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            total: 0,
            degraded: true,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0
    }
}
