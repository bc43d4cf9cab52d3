use crate::domain::entities::record::Record;
use std::collections::HashMap;

/// Occurrence counts of space-separated words.
#[derive(Debug, Clone, Default)]
pub struct WordFrequency {
    counts: HashMap<String, usize>,
}

impl WordFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count words of the string `field` of each record; other records are skipped.
    pub fn from_records(records: &[Record], field: &str) -> Self {
        let mut freq = Self::new();
        for text in records.iter().filter_map(|r| r.get(field).and_then(|v| v.as_str())) {
            freq.add_text(text);
        }
        freq
    }

    pub fn add_text(&mut self, text: &str) {
        for word in text.split(' ').filter(|w| !w.is_empty()) {
            *self.counts.entry(word.to_string()).or_default() += 1;
        }
    }

    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent words; ties in alphabetical order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted: Vec<(String, usize)> =
            self.counts.iter().map(|(w, c)| (w.clone(), *c)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted.truncate(n);
        sorted
    }
}
