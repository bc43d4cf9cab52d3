use crate::application::search::SearchUseCase;
use crate::domain::entities::record::Record;
use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::error::DomainError;
use crate::domain::values::predicate::Predicate;
use crate::domain::values::time_window::TimeWindow;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorSet {
    /// Distinct names, sorted.
    pub authors: Vec<String>,
    pub partial: bool,
    /// Windows whose count could not be read in either collection.
    pub degraded_windows: usize,
}

/// Who posted or commented in a subreddit during a window.
pub struct AuthorsUseCase {
    search: Arc<SearchUseCase>,
}

impl AuthorsUseCase {
    pub fn new(search: Arc<SearchUseCase>) -> Self {
        Self { search }
    }

    pub async fn distinct_authors(
        &self,
        subreddit: &str,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<AuthorSet, DomainError> {
        let spec = SearchSpec::new(Predicate::new().subreddits([subreddit]))
            .window(window)
            .fields(["author"]);

        let submissions = self.search.search_submissions(&spec, cancel).await?;
        let comments = self.search.search_comments(&spec, cancel).await?;

        let names: BTreeSet<String> = submissions
            .records
            .iter()
            .chain(comments.records.iter())
            .filter_map(author_of)
            .collect();

        Ok(AuthorSet {
            authors: names.into_iter().collect(),
            partial: submissions.partial || comments.partial,
            degraded_windows: submissions.degraded_windows + comments.degraded_windows,
        })
    }
}

fn author_of(record: &Record) -> Option<String> {
    record
        .get("author")
        .and_then(|v| v.as_str())
        .map(String::from)
}

/// `{base}/{subreddit}/{YYYY-MM-DD}.txt`
pub fn daily_path(base: &Path, subreddit: &str, day: NaiveDate) -> PathBuf {
    base.join(subreddit).join(format!("{}.txt", day.format("%Y-%m-%d")))
}
