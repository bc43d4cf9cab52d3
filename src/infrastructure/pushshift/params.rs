//! Wire parameters for the archive's search endpoints.

use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::values::frequency::Frequency;
use crate::domain::values::predicate::{IntRange, Predicate};
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::sort::{SortSpec, CREATED_UTC};
use crate::domain::values::time_window::TimeWindow;

/// Ordered query parameters. Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.0.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `k=v&k=v`, percent-encoding values except for commas, which the
    /// service needs raw in its list and range syntax.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={}", encode_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn to_url(&self, endpoint: &str) -> String {
        if self.is_empty() {
            endpoint.to_string()
        } else {
            format!("{endpoint}?{}", self.encode())
        }
    }
}

fn encode_value(v: &str) -> String {
    urlencoding::encode(v).replace("%2C", ",")
}

/// Size, projection and sort of a data request.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    pub size: usize,
    pub fields: &'a [String],
    pub sort: Option<&'a SortSpec>,
}

/// Parameters for a data request over `window`.
pub fn fetch_params(
    kind: ResourceKind,
    spec: &SearchSpec,
    window: &TimeWindow,
    size: usize,
) -> QueryParams {
    build(
        kind,
        &spec.predicate,
        window,
        Some(Projection {
            size,
            fields: &spec.fields,
            sort: spec.sort.as_ref(),
        }),
    )
}

/// Parameters asking for per-bucket counts instead of records.
pub fn aggregation_params(
    kind: ResourceKind,
    predicate: &Predicate,
    window: &TimeWindow,
    frequency: Frequency,
) -> QueryParams {
    let mut params = build(kind, predicate, window, None);
    params.push("aggs", CREATED_UTC);
    params.push("frequency", frequency.to_string());
    params
}

pub fn build(
    kind: ResourceKind,
    predicate: &Predicate,
    window: &TimeWindow,
    projection: Option<Projection<'_>>,
) -> QueryParams {
    let submissions = kind == ResourceKind::Submissions;
    let mut params = QueryParams::new();

    if let Some(q) = &predicate.query {
        params.push("q", q.as_str());
    }
    if submissions {
        if let Some(t) = &predicate.title_query {
            params.push("title", t.as_str());
        }
        if let Some(s) = &predicate.selftext_query {
            params.push("selftext", s.as_str());
        }
    }
    params.push("ids", predicate.ids.join(","));

    if let Some(p) = projection {
        params.push("size", p.size.to_string());
        params.push("fields", p.fields.join(","));
        if let Some(sort) = p.sort {
            params.push("sort_type", sort.attribute.as_str());
            params.push("sort", sort.direction.to_string());
        }
    }

    params.push("author", predicate.authors.join(","));
    params.push("subreddit", predicate.subreddits.join(","));

    // `after` is exclusive on the service side.
    params.push("after", (window.start().timestamp() - 1).to_string());
    params.push("before", window.end().timestamp().to_string());

    params.push("score", encode_range(&predicate.score));
    if submissions {
        params.push("num_comments", encode_range(&predicate.num_comments));
    }

    params
}

/// Inclusive bounds as the service's strict inequalities: `>{min-1},<{max+1}`.
pub fn encode_range(range: &IntRange) -> String {
    let mut parts = Vec::new();
    if let Some(min) = range.min {
        parts.push(format!(">{}", min.saturating_sub(1)));
    }
    if let Some(max) = range.max {
        parts.push(format!("<{}", max.saturating_add(1)));
    }
    parts.join(",")
}
