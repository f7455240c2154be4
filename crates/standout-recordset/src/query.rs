//! Deferred query state.
//!
//! A [`QuerySpec`] is what a record set accumulates before it is
//! materialized: conditions, sort keys, and a [`Slice`].

use crate::condition::{Condition, Conditions};
use crate::ordering::{Dir, SortKeys};

/// Offset and limit of a slice pushed down to a backend.
///
/// A `limit` of `0` means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Slice {
    pub offset: usize,
    pub limit: usize,
}

impl Slice {
    pub fn new(limit: usize, offset: usize) -> Self {
        Slice { offset, limit }
    }

    /// Returns `true` once an offset or a limit has been requested.
    pub fn is_requested(self) -> bool {
        self.offset != 0 || self.limit != 0
    }

    /// Returns the index range this slice selects from `len` items, clamped
    /// at both ends.
    pub fn range(self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        let end = if self.limit == 0 {
            len
        } else {
            start.saturating_add(self.limit).min(len)
        };
        start..end
    }
}

/// Accumulated, not-yet-executed query state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub conditions: Conditions,
    pub sort_keys: SortKeys,
    pub slice: Slice,
}

impl QuerySpec {
    pub fn new() -> Self {
        QuerySpec::default()
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn sort(&mut self, attribute: &str, dir: Dir) {
        self.sort_keys.set(attribute, dir);
    }

    /// Clears what a backend fetch consumed. Sort keys stay.
    pub fn consume(&mut self) {
        self.conditions.clear();
        self.slice = Slice::default();
    }
}
