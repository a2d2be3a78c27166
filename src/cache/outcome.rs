//! Per-key results of batched pool operations.

use serde::Serialize;

// == Batch Outcome ==
/// Result of every member of a batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    results: Vec<(String, bool)>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, key: impl Into<String>, success: bool) {
        self.results.push((key.into(), success));
    }

    /// True if every member succeeded. An empty batch succeeds.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, success)| *success)
    }

    /// Keys whose operation failed, in processing order.
    pub fn failed_keys(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, success)| !success)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Outcome for `key`, if it was part of the batch.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.results
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, success)| *success)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.results.iter().map(|(key, success)| (key.as_str(), *success))
    }
}
