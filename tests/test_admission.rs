//! The in-flight request limit spans every handle in the process.
//!
//! Kept in its own test binary: the limit is sized by the first handle
//! built in the process.

mod common;

use common::*;
use pushshift_search::config::SearchConfig;
use pushshift_search::domain::entities::search_spec::SearchSpec;
use pushshift_search::domain::values::predicate::Predicate;
use pushshift_search::PushshiftSearch;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_separate_handles_share_in_flight_limit() {
    let http = Arc::new(
        ScriptedHttp::always(Ok(response(200, r#"{"data":[]}"#)))
            .slow(Duration::from_millis(100)),
    );
    let config = SearchConfig {
        max_in_flight: 1,
        ..config(1000)
    };
    let a = PushshiftSearch::with_http(
        http.clone(),
        Arc::new(RecordingObserver::default()),
        config.clone(),
    );
    let b = PushshiftSearch::with_http(
        http.clone(),
        Arc::new(RecordingObserver::default()),
        config,
    );
    let c = a.clone();
    let spec = SearchSpec::new(Predicate::new())
        .window(window(at(2020, 1, 1), at(2020, 2, 1)))
        .count(10);

    let (ra, rb, rc) = tokio::join!(
        a.search_submissions(&spec),
        b.search_comments(&spec),
        c.search_submissions(&spec),
    );

    assert!(ra.is_ok() && rb.is_ok() && rc.is_ok());
    assert_eq!(http.requests(), 3);
    assert_eq!(http.peak_in_flight(), 1);
}
