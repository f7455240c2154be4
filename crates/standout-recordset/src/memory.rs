//! In-process backend.
//!
//! [`MemoryBackend`] executes pushed-down queries over a vector of raw
//! records with the same reference semantics [`Condition::evaluate`]
//! applies in memory. It also counts how often it was queried, which makes
//! push-down behavior observable.
//!
//! [`Condition::evaluate`]: crate::Condition::evaluate

use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

use crate::condition::Conditions;
use crate::error::Result;
use crate::ordering::SortKeys;
use crate::query::Slice;
use crate::traits::Backend;
use crate::value::Attributes;

/// Backend over an in-memory list of raw records.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: Vec<Attributes>,
    queries: AtomicUsize,
    counts: AtomicUsize,
}

impl MemoryBackend {
    pub fn new(rows: Vec<Attributes>) -> Self {
        MemoryBackend {
            rows,
            ..MemoryBackend::default()
        }
    }

    /// Number of `query` calls served so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    /// Number of `count` calls served so far.
    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::Relaxed)
    }

    fn select(&self, conditions: &Conditions) -> Result<Vec<&Attributes>> {
        let mut selected = Vec::new();
        for row in &self.rows {
            if conditions.matches(row)? {
                selected.push(row);
            }
        }
        Ok(selected)
    }
}

impl Backend for MemoryBackend {
    fn query(
        &self,
        conditions: &Conditions,
        sort_keys: &SortKeys,
        slice: Slice,
    ) -> Result<Vec<Attributes>> {
        self.queries.fetch_add(1, Ordering::Relaxed);

        let mut selected = self.select(conditions)?;
        if !sort_keys.is_empty() {
            selected.sort_by(|a, b| sort_keys.compare(*a, *b));
        }
        let range = slice.range(selected.len());
        trace!(
            "memory query selected {} rows, returning {:?}",
            selected.len(),
            range
        );
        Ok(selected[range].iter().map(|row| (*row).clone()).collect())
    }

    fn count(&self, conditions: &Conditions, slice: Slice) -> Result<usize> {
        self.counts.fetch_add(1, Ordering::Relaxed);

        let matched = self.select(conditions)?.len();
        Ok(slice.range(matched).len())
    }
}
