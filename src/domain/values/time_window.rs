use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix time of 2005-12-01T00:00:00Z, roughly where the archive begins.
pub const DATASET_EPOCH_SECS: i64 = 1_133_395_200;

pub fn dataset_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(DATASET_EPOCH_SECS, 0).unwrap_or_default()
}

/// Half-open interval `[start, end)`.
///
/// Splitting works on whole seconds because the wire format only carries
/// unix seconds; a window narrower than two seconds cannot be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if start > end {
            return Err(format!(
                "Time window start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn can_split(&self) -> bool {
        self.duration().num_seconds() >= 2
    }

    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + Duration::seconds(self.duration().num_seconds() / 2)
    }

    /// `[start, mid)` and `[mid, end)`. Callers check `can_split` first;
    /// an unsplittable window yields an empty left half.
    pub fn split(&self) -> (TimeWindow, TimeWindow) {
        let mid = self.midpoint();
        (
            TimeWindow {
                start: self.start,
                end: mid,
            },
            TimeWindow {
                start: mid,
                end: self.end,
            },
        )
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.to_rfc3339(),
            self.end.to_rfc3339()
        )
    }
}

/// A window whose ends may be left open by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartialWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl PartialWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Fill an open start with the dataset epoch and an open end with `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<TimeWindow, String> {
        TimeWindow::new(
            self.start.unwrap_or_else(dataset_epoch),
            self.end.unwrap_or(now),
        )
    }
}

impl From<TimeWindow> for PartialWindow {
    fn from(w: TimeWindow) -> Self {
        Self {
            start: Some(w.start),
            end: Some(w.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_rejects_inverted_window() {
        assert!(TimeWindow::new(at(2020, 2, 1), at(2020, 1, 1)).is_err());
        let empty = TimeWindow::new(at(2020, 1, 1), at(2020, 1, 1)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_split_at_midpoint() {
        let w = TimeWindow::new(at(2020, 1, 1), at(2020, 1, 31)).unwrap();
        let (left, right) = w.split();
        assert_eq!(left.start(), at(2020, 1, 1));
        assert_eq!(left.end(), at(2020, 1, 16));
        assert_eq!(right.start(), at(2020, 1, 16));
        assert_eq!(right.end(), at(2020, 1, 31));
    }

    #[test]
    fn test_narrow_window_is_unsplittable() {
        let start = at(2020, 1, 1);
        let w = TimeWindow::new(start, start + Duration::milliseconds(1500)).unwrap();
        assert!(!w.can_split());
        let w = TimeWindow::new(start, start + Duration::seconds(2)).unwrap();
        assert!(w.can_split());
    }

    #[test]
    fn test_epoch_value() {
        assert_eq!(dataset_epoch(), at(2005, 12, 1));
    }

    #[test]
    fn test_partial_window_defaults() {
        let now = at(2021, 6, 1);
        let w = PartialWindow::default().resolve(now).unwrap();
        assert_eq!(w.start(), at(2005, 12, 1));
        assert_eq!(w.end(), now);

        let inverted = PartialWindow::new(Some(at(2022, 1, 1)), None);
        assert!(inverted.resolve(now).is_err());
    }
}
