//! Lazily evaluated record sets.
//!
//! A [`RecordSet`] starts deferred: filters, sort keys, and a slice
//! accumulate into a [`QuerySpec`] and nothing is fetched. The first
//! traversal, count, or serialization materializes it with a single backend
//! query. From then on every refinement runs in memory and yields a new set
//! that owns its own items.
//!
//! # Evaluation rules
//!
//! ```text
//! deferred, no slice yet   -> push the step into the query, return the same set
//! deferred, slice present  -> materialize first, then refine in memory
//! materialized             -> refine in memory, return a new set
//! ```
//!
//! A filter pushed after a slice would change which rows the slice refers
//! to, so a slice is the boundary after which work moves into memory.

use std::sync::Arc;

use log::{debug, trace};

use crate::condition::{Condition, Conditions, Operand, ValueSet};
use crate::error::Result;
use crate::op::Op;
use crate::ordering::{Dir, SortKeys};
use crate::query::{QuerySpec, Slice};
use crate::traits::{Backend, Record};
use crate::value::{Attributes, Value};

#[derive(Debug, Clone)]
enum State<R> {
    Deferred,
    Materialized(Vec<R>),
}

/// A lazily evaluated, chainable collection of records.
///
/// Fluent steps take the set by value. A step that can still be pushed down
/// to the backend returns the same set; a step applied in memory returns a
/// freshly built set holding only the surviving items.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "memory")] {
/// use standout_recordset::{Attributes, Dir, MemoryBackend, RecordSet, Value};
///
/// fn row(id: i64, status: &str, created: i64) -> Attributes {
///     Attributes::from([
///         ("id".to_string(), Value::from(id)),
///         ("status".to_string(), Value::from(status)),
///         ("created".to_string(), Value::from(created)),
///     ])
/// }
///
/// let backend = MemoryBackend::new(vec![
///     row(1, "active", 3),
///     row(2, "active", 1),
///     row(3, "inactive", 5),
/// ]);
///
/// let mut page = RecordSet::<Attributes, _>::with_backend(backend)
///     .filter_eq("status", "active")?
///     .sort_by("created", Dir::Desc)
///     .crop(2, 0)?;
///
/// assert_eq!(page.count()?, 2);
/// let ids: Vec<_> = page.iter()?.map(|r| r["id"].clone()).collect();
/// assert_eq!(ids, vec![Value::from(1), Value::from(2)]);
/// # }
/// # Ok::<(), standout_recordset::RecordSetError>(())
/// ```
#[derive(Debug)]
pub struct RecordSet<R, B> {
    backend: Arc<B>,
    spec: QuerySpec,
    state: State<R>,
    count: Option<usize>,
    cursor: Option<usize>,
}

impl<R: Clone, B> Clone for RecordSet<R, B> {
    fn clone(&self) -> Self {
        RecordSet {
            backend: Arc::clone(&self.backend),
            spec: self.spec.clone(),
            state: self.state.clone(),
            count: self.count,
            cursor: self.cursor,
        }
    }
}

impl<R: Record, B: Backend + Default> Default for RecordSet<R, B> {
    fn default() -> Self {
        RecordSet::all()
    }
}

impl<R: Record, B: Backend> RecordSet<R, B> {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a fresh, deferred set over a default-constructed backend.
    pub fn all() -> Self
    where
        B: Default,
    {
        RecordSet::with_backend(B::default())
    }

    /// Creates a fresh, deferred set over the given backend.
    pub fn with_backend(backend: B) -> Self {
        RecordSet::shared(Arc::new(backend))
    }

    /// Creates a fresh, deferred set over a shared backend.
    pub fn shared(backend: Arc<B>) -> Self {
        RecordSet {
            backend,
            spec: QuerySpec::new(),
            state: State::Deferred,
            count: None,
            cursor: None,
        }
    }

    fn derived(backend: Arc<B>, items: Vec<R>) -> Self {
        RecordSet {
            backend,
            spec: QuerySpec::new(),
            count: Some(items.len()),
            cursor: Some(0),
            state: State::Materialized(items),
        }
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Applies a condition, pushing it down when possible.
    ///
    /// When the condition has to be applied in memory it is validated before
    /// anything is fetched. An error consumes the set; call
    /// [`materialize`](Self::materialize) first to observe a failing fetch
    /// while keeping the set.
    pub fn filter(mut self, condition: Condition) -> Result<Self> {
        if !self.is_materialized() && !self.spec.slice.is_requested() {
            debug!(
                "pushing down {} {} condition",
                condition.attribute, condition.op
            );
            self.spec.push(condition);
            self.count = None;
            return Ok(self);
        }

        condition.validate()?;
        if !self.is_materialized() {
            debug!(
                "slice {:?} already requested, materializing before filtering on {}",
                self.spec.slice, condition.attribute
            );
            self.materialize()?;
        }

        let mut keep = Vec::with_capacity(self.items_slice().len());
        for item in self.items_slice() {
            keep.push(item.satisfies(&condition)?);
        }
        let (backend, items) = self.into_parts();
        let before = items.len();
        let kept: Vec<R> = items
            .into_iter()
            .zip(keep)
            .filter_map(|(item, keep)| keep.then_some(item))
            .collect();
        debug!(
            "refined {} {} in memory: {} of {} items kept",
            condition.attribute,
            condition.op,
            kept.len(),
            before
        );
        Ok(RecordSet::derived(backend, kept))
    }

    fn exclude(self, attribute: &str, op: Op, operand: Operand) -> Result<Self> {
        self.filter(Condition::new(attribute, op.negate(), operand))
    }

    /// Keeps records whose attribute equals `value`.
    pub fn filter_eq(self, attribute: &str, value: impl Into<Value>) -> Result<Self> {
        self.filter(Condition::new(attribute, Op::Eq, Operand::Scalar(value.into())))
    }

    /// Keeps records whose attribute is one of `values`.
    ///
    /// A lone scalar is treated as a one-element set.
    pub fn filter_in(self, attribute: &str, values: impl Into<ValueSet>) -> Result<Self> {
        let set: ValueSet = values.into();
        self.filter(Condition::new(attribute, Op::In, set))
    }

    /// Keeps records whose attribute is greater than `value`.
    pub fn filter_gt(self, attribute: &str, value: impl Into<Value>) -> Result<Self> {
        self.filter(Condition::new(attribute, Op::Gt, Operand::Scalar(value.into())))
    }

    /// Keeps records whose attribute is less than `value`.
    pub fn filter_lt(self, attribute: &str, value: impl Into<Value>) -> Result<Self> {
        self.filter(Condition::new(attribute, Op::Lt, Operand::Scalar(value.into())))
    }

    /// Keeps records whose attribute lies in `[min, max]`.
    pub fn filter_between(
        self,
        attribute: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<Self> {
        let range = Operand::Range(min.into(), max.into());
        self.filter(Condition::new(attribute, Op::Between, range))
    }

    /// Keeps records whose attribute matches a SQL-style pattern.
    pub fn filter_like(self, attribute: &str, pattern: &str) -> Result<Self> {
        self.filter(Condition::new(attribute, Op::Like, Value::from(pattern)))
    }

    /// Drops records whose attribute equals `value`.
    pub fn exclude_eq(self, attribute: &str, value: impl Into<Value>) -> Result<Self> {
        self.exclude(attribute, Op::Eq, Operand::Scalar(value.into()))
    }

    /// Drops records whose attribute is one of `values`.
    pub fn exclude_in(self, attribute: &str, values: impl Into<ValueSet>) -> Result<Self> {
        let set: ValueSet = values.into();
        self.exclude(attribute, Op::In, set.into())
    }

    /// Drops records whose attribute is greater than `value`; the pushed
    /// condition is `Le`.
    pub fn exclude_gt(self, attribute: &str, value: impl Into<Value>) -> Result<Self> {
        self.exclude(attribute, Op::Gt, Operand::Scalar(value.into()))
    }

    /// Drops records whose attribute is less than `value`; the pushed
    /// condition is `Ge`.
    pub fn exclude_lt(self, attribute: &str, value: impl Into<Value>) -> Result<Self> {
        self.exclude(attribute, Op::Lt, Operand::Scalar(value.into()))
    }

    /// Drops records whose attribute lies in `[min, max]`.
    pub fn exclude_between(
        self,
        attribute: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<Self> {
        self.exclude(attribute, Op::Between, Operand::Range(min.into(), max.into()))
    }

    /// Drops records whose attribute matches a SQL-style pattern.
    pub fn exclude_like(self, attribute: &str, pattern: &str) -> Result<Self> {
        self.exclude(attribute, Op::Like, Operand::Scalar(pattern.into()))
    }

    // ========================================================================
    // Ordering and slicing
    // ========================================================================

    /// Sets the sort direction for an attribute. `true` means ascending.
    ///
    /// Always applies to this set. Once materialized the keys are kept but no
    /// longer reorder anything.
    pub fn sort_by(mut self, attribute: &str, dir: impl Into<Dir>) -> Self {
        self.spec.sort(attribute, dir.into());
        self
    }

    /// Sorts ascending by an attribute.
    pub fn sort_asc(self, attribute: &str) -> Self {
        self.sort_by(attribute, Dir::Asc)
    }

    /// Sorts descending by an attribute.
    pub fn sort_desc(self, attribute: &str) -> Self {
        self.sort_by(attribute, Dir::Desc)
    }

    /// Restricts the set to `size` items starting at `offset`.
    ///
    /// The first slice of a deferred set is pushed down, where a `size` of
    /// `0` means no limit. A second slice, or a slice of a materialized set,
    /// takes at most `size` of the items already selected, so a `size` of `0`
    /// leaves nothing.
    pub fn crop(mut self, size: usize, offset: usize) -> Result<Self> {
        if !self.is_materialized() {
            if !self.spec.slice.is_requested() {
                let slice = Slice::new(size, offset);
                debug!("pushing down slice {slice:?}");
                self.spec.slice = slice;
                self.count = None;
                return Ok(self);
            }
            debug!(
                "slice {:?} already requested, materializing before cropping",
                self.spec.slice
            );
            self.materialize()?;
        }

        let (backend, items) = self.into_parts();
        let kept = items.into_iter().skip(offset).take(size).collect();
        Ok(RecordSet::derived(backend, kept))
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Fetches the items now if the set is still deferred.
    ///
    /// On failure the set stays deferred with its query intact.
    pub fn materialize(&mut self) -> Result<()> {
        if let State::Materialized(_) = self.state {
            return Ok(());
        }

        debug!(
            "querying backend: {} conditions, {} sort keys, slice {:?}",
            self.spec.conditions.len(),
            self.spec.sort_keys.len(),
            self.spec.slice
        );
        let rows = self.backend.query(
            &self.spec.conditions,
            &self.spec.sort_keys,
            self.spec.slice,
        )?;
        let items = rows
            .into_iter()
            .map(R::from_attributes)
            .collect::<Result<Vec<_>>>()?;
        debug!("materialized {} items", items.len());

        if self.count.is_none() {
            self.count = Some(items.len());
        }
        self.spec.consume();
        self.state = State::Materialized(items);
        Ok(())
    }

    fn into_parts(self) -> (Arc<B>, Vec<R>) {
        let items = match self.state {
            State::Materialized(items) => items,
            State::Deferred => Vec::new(),
        };
        (self.backend, items)
    }

    fn items_slice(&self) -> &[R] {
        match &self.state {
            State::Materialized(items) => items,
            State::Deferred => &[],
        }
    }

    /// Returns `true` once the items have been fetched.
    pub fn is_materialized(&self) -> bool {
        matches!(self.state, State::Materialized(_))
    }

    // ========================================================================
    // Count
    // ========================================================================

    /// Returns the number of records in the set.
    ///
    /// A deferred set asks the backend to count instead of fetching. The
    /// result is cached.
    pub fn count(&mut self) -> Result<usize> {
        if let Some(count) = self.count {
            return Ok(count);
        }

        let count = match &self.state {
            State::Deferred => {
                debug!(
                    "counting on backend: {} conditions, slice {:?}",
                    self.spec.conditions.len(),
                    self.spec.slice
                );
                self.backend.count(&self.spec.conditions, self.spec.slice)?
            }
            State::Materialized(items) => items.len(),
        };
        self.count = Some(count);
        Ok(count)
    }

    /// Returns the cached count without resolving it.
    pub fn known_count(&self) -> Option<usize> {
        self.count
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Materializes if needed and moves the cursor to the first item.
    pub fn reset(&mut self) -> Result<()> {
        self.materialize()?;
        trace!("cursor reset");
        self.cursor = Some(0);
        Ok(())
    }

    /// Returns `true` if the cursor points at an item.
    ///
    /// An unset cursor is reset first, which materializes the set.
    pub fn is_valid(&mut self) -> Result<bool> {
        let cursor = match self.cursor {
            Some(cursor) => cursor,
            None => {
                self.reset()?;
                0
            }
        };
        let count = self.count.unwrap_or(0);
        Ok(cursor < count && cursor < self.items_slice().len())
    }

    /// Returns the item under the cursor.
    pub fn current(&mut self) -> Result<Option<&R>> {
        if !self.is_valid()? {
            return Ok(None);
        }
        Ok(self.cursor.and_then(|cursor| self.items_slice().get(cursor)))
    }

    /// Returns the cursor position, if it points at an item.
    pub fn key(&mut self) -> Result<Option<usize>> {
        if !self.is_valid()? {
            return Ok(None);
        }
        Ok(self.cursor)
    }

    /// Moves the cursor forward. Does nothing before the first reset.
    pub fn advance(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            *cursor += 1;
        }
    }

    // ========================================================================
    // Traversal and serialization
    // ========================================================================

    /// Materializes if needed and iterates the items in order.
    pub fn iter(&mut self) -> Result<std::slice::Iter<'_, R>> {
        self.materialize()?;
        Ok(self.items_slice().iter())
    }

    /// Materializes if needed and returns the items.
    pub fn into_items(mut self) -> Result<Vec<R>> {
        self.materialize()?;
        Ok(self.into_parts().1)
    }

    /// Serializes every item, in order.
    pub fn to_array(&mut self) -> Result<Vec<Attributes>> {
        self.is_valid()?;
        Ok(self.items_slice().iter().map(R::to_attributes).collect())
    }

    /// Serializes every item into a JSON array.
    pub fn to_json(&mut self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_array()?)?)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the pending conditions; empty once materialized.
    pub fn conditions(&self) -> &Conditions {
        &self.spec.conditions
    }

    /// Returns the sort keys.
    pub fn sort_keys(&self) -> &SortKeys {
        &self.spec.sort_keys
    }

    /// Returns the pending slice; empty once materialized.
    pub fn slice(&self) -> Slice {
        self.spec.slice
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::RecordSetError;

    /// Backend that serves fixed rows, ignoring the query, and counts calls.
    #[derive(Default)]
    struct Fixed {
        rows: Vec<Attributes>,
        queries: AtomicUsize,
        counts: AtomicUsize,
        fail: bool,
    }

    impl Fixed {
        fn rows(n: i64) -> Self {
            Fixed {
                rows: (1..=n)
                    .map(|id| Attributes::from([("id".to_string(), Value::from(id))]))
                    .collect(),
                ..Fixed::default()
            }
        }
    }

    impl Backend for Fixed {
        fn query(&self, _: &Conditions, _: &SortKeys, _: Slice) -> Result<Vec<Attributes>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RecordSetError::backend("connection lost"));
            }
            Ok(self.rows.clone())
        }

        fn count(&self, _: &Conditions, _: Slice) -> Result<usize> {
            self.counts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RecordSetError::backend("connection lost"));
            }
            Ok(self.rows.len())
        }
    }

    type Set = RecordSet<Attributes, Fixed>;

    fn ids(set: &mut Set) -> Vec<i64> {
        set.iter()
            .unwrap()
            .map(|row| row["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn fresh_set_is_deferred() {
        let set = Set::all();
        assert!(!set.is_materialized());
        assert!(set.conditions().is_empty());
        assert_eq!(set.slice(), Slice::default());
        assert_eq!(set.known_count(), None);
    }

    #[test]
    fn filters_accumulate_before_materialization() {
        let set = Set::with_backend(Fixed::rows(3))
            .filter_eq("status", "active")
            .unwrap()
            .filter_gt("id", 1)
            .unwrap()
            .exclude_eq("status", "archived")
            .unwrap();

        assert!(!set.is_materialized());
        let ops: Vec<_> = set.conditions().iter().map(|c| c.op).collect();
        assert_eq!(ops, vec![Op::Eq, Op::Ne, Op::Gt]);
        assert_eq!(set.backend.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exclusions_push_complementary_operators() {
        let set = Set::all()
            .exclude_gt("a", 1)
            .unwrap()
            .exclude_lt("b", 1)
            .unwrap()
            .exclude_in("c", 1)
            .unwrap()
            .exclude_between("d", 1, 2)
            .unwrap()
            .exclude_like("e", "x%")
            .unwrap();

        let ops: Vec<_> = set.conditions().iter().map(|c| c.op).collect();
        assert_eq!(
            ops,
            vec![Op::Le, Op::Ge, Op::NotIn, Op::NotBetween, Op::NotLike]
        );
        assert_eq!(
            set.conditions().for_attribute("c")[0].operand,
            Operand::Set(vec![Value::from(1)])
        );
    }

    #[test]
    fn materialization_consumes_conditions_and_slice() {
        let mut set = Set::with_backend(Fixed::rows(3))
            .filter_eq("x", 1)
            .unwrap()
            .sort_desc("id")
            .crop(2, 0)
            .unwrap();
        assert_eq!(set.slice(), Slice::new(2, 0));

        set.reset().unwrap();
        assert!(set.is_materialized());
        assert!(set.conditions().is_empty());
        assert_eq!(set.slice(), Slice::default());
        assert_eq!(set.sort_keys().get("id"), Some(Dir::Desc));
    }

    #[test]
    fn count_without_fetching() {
        let mut set = Set::with_backend(Fixed::rows(4));
        assert_eq!(set.count().unwrap(), 4);
        assert!(!set.is_materialized());
        assert_eq!(set.backend.counts.load(Ordering::SeqCst), 1);
        assert_eq!(set.backend.queries.load(Ordering::SeqCst), 0);

        // Cached
        assert_eq!(set.count().unwrap(), 4);
        assert_eq!(set.backend.counts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn count_after_materialization_uses_items() {
        let mut set = Set::with_backend(Fixed::rows(3));
        set.reset().unwrap();
        assert_eq!(set.count().unwrap(), 3);
        assert_eq!(set.backend.counts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn deferred_steps_invalidate_a_resolved_count() {
        let mut set = Set::with_backend(Fixed::rows(3));
        set.count().unwrap();

        let mut set = set.filter_eq("id", 1).unwrap();
        assert_eq!(set.known_count(), None);
        set.count().unwrap();

        let set = set.crop(1, 0).unwrap();
        assert_eq!(set.known_count(), None);
    }

    #[test]
    fn filter_after_slice_forces_materialization() {
        let set = Set::with_backend(Fixed::rows(5))
            .crop(3, 0)
            .unwrap()
            .filter_gt("id", 3)
            .unwrap();

        assert!(set.is_materialized());
        assert_eq!(set.backend.queries.load(Ordering::SeqCst), 1);
        assert_eq!(set.known_count(), Some(2));
    }

    #[test]
    fn crop_on_materialized_set_slices_in_memory() {
        let mut set = Set::with_backend(Fixed::rows(5));
        set.reset().unwrap();

        let mut cropped = set.crop(2, 1).unwrap();
        assert_eq!(ids(&mut cropped), vec![2, 3]);
        assert_eq!(cropped.count().unwrap(), 2);
        assert_eq!(cropped.backend.queries.load(Ordering::SeqCst), 1);

        let mut clamped = cropped.crop(5, 1).unwrap();
        assert_eq!(ids(&mut clamped), vec![3]);
    }

    #[test]
    fn in_memory_crop_of_zero_size_is_empty() {
        let mut set = Set::with_backend(Fixed::rows(5));
        set.reset().unwrap();
        let mut none = set.crop(0, 2).unwrap();
        assert_eq!(none.count().unwrap(), 0);
        assert!(ids(&mut none).is_empty());

        let mut narrowed = Set::with_backend(Fixed::rows(5))
            .crop(4, 0)
            .unwrap()
            .crop(0, 1)
            .unwrap();
        assert_eq!(narrowed.count().unwrap(), 0);
    }

    #[test]
    fn forced_materialization_failure_keeps_the_query() {
        let backend = Fixed {
            fail: true,
            ..Fixed::rows(3)
        };
        let mut set = Set::with_backend(backend).crop(2, 0).unwrap();

        assert!(matches!(set.materialize(), Err(RecordSetError::Backend(_))));
        assert!(!set.is_materialized());
        assert_eq!(set.slice(), Slice::new(2, 0));
        assert_eq!(set.known_count(), None);

        assert!(matches!(
            set.filter_eq("id", 1),
            Err(RecordSetError::Backend(_))
        ));
    }

    #[test]
    fn invalid_condition_after_slice_fails_before_fetching() {
        let set = Set::with_backend(Fixed::rows(3)).crop(2, 0).unwrap();
        let backend = Arc::clone(&set.backend);

        let result = set.filter(Condition::new("id", Op::Between, Operand::Scalar(1.into())));
        assert!(matches!(
            result,
            Err(RecordSetError::OperandShape { op: Op::Between, .. })
        ));
        assert_eq!(backend.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sort_by_accepts_an_ascending_flag() {
        let set = Set::all().sort_by("created", false).sort_by("id", true);
        assert_eq!(set.sort_keys().get("created"), Some(Dir::Desc));
        assert_eq!(set.sort_keys().get("id"), Some(Dir::Asc));
    }

    #[test]
    fn refinement_leaves_the_source_untouched() {
        let mut source = Set::with_backend(Fixed::rows(4));
        source.reset().unwrap();

        let mut narrowed = source.clone().filter_in("id", vec![2, 4]).unwrap();
        assert_eq!(ids(&mut narrowed), vec![2, 4]);
        assert_eq!(ids(&mut source), vec![1, 2, 3, 4]);
        assert_eq!(source.count().unwrap(), 4);
    }

    #[test]
    fn cursor_protocol() {
        let mut set = Set::with_backend(Fixed::rows(2));

        assert_eq!(set.key().unwrap(), Some(0));
        assert_eq!(set.current().unwrap().unwrap()["id"], Value::from(1));
        set.advance();
        assert_eq!(set.key().unwrap(), Some(1));
        set.advance();
        assert!(!set.is_valid().unwrap());
        assert!(set.current().unwrap().is_none());
        assert_eq!(set.key().unwrap(), None);

        set.reset().unwrap();
        assert_eq!(set.key().unwrap(), Some(0));
        assert_eq!(set.backend.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn advance_before_reset_does_nothing() {
        let mut set = Set::with_backend(Fixed::rows(2));
        set.advance();
        assert!(!set.is_materialized());
        assert_eq!(set.key().unwrap(), Some(0));
    }

    #[test]
    fn backend_failure_leaves_set_deferred() {
        let backend = Fixed {
            fail: true,
            ..Fixed::rows(2)
        };
        let mut set = Set::with_backend(backend).filter_eq("id", 1).unwrap();

        assert!(matches!(set.reset(), Err(RecordSetError::Backend(_))));
        assert!(!set.is_materialized());
        assert_eq!(set.conditions().len(), 1);
        assert!(set.count().is_err());
        assert_eq!(set.known_count(), None);
    }

    #[test]
    fn reconstruction_failure_propagates() {
        struct Strict(i64);

        impl Record for Strict {
            fn from_attributes(attributes: Attributes) -> Result<Self> {
                attributes
                    .get("name")
                    .and_then(Value::as_i64)
                    .map(Strict)
                    .ok_or_else(|| RecordSetError::MissingAttribute("name".into()))
            }

            fn attribute(&self, _: &str) -> Value {
                self.0.into()
            }

            fn to_attributes(&self) -> Attributes {
                Attributes::new()
            }
        }

        let mut set = RecordSet::<Strict, Fixed>::with_backend(Fixed::rows(1));
        assert!(matches!(
            set.reset(),
            Err(RecordSetError::MissingAttribute(name)) if name == "name"
        ));
        assert!(!set.is_materialized());
    }

    #[test]
    fn to_array_is_idempotent() {
        let mut set = Set::with_backend(Fixed::rows(3));
        let first = set.to_array().unwrap();
        let second = set.to_array().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(set.backend.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn to_json_renders_plain_objects() {
        let mut set = Set::with_backend(Fixed::rows(2));
        assert_eq!(
            set.to_json().unwrap(),
            serde_json::json!([{ "id": 1 }, { "id": 2 }])
        );
    }

    #[test]
    fn into_items_materializes() {
        let set = Set::with_backend(Fixed::rows(2)).filter_eq("id", 9).unwrap();
        // Fixed ignores conditions
        assert_eq!(set.into_items().unwrap().len(), 2);
    }
}
