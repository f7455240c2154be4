//! Collaborator contracts.
//!
//! A [`RecordSet`](crate::RecordSet) coordinates two collaborators: the
//! [`Record`] type it yields, and the [`Backend`] that executes pushed-down
//! queries and counts.

use crate::condition::{Condition, Conditions};
use crate::error::Result;
use crate::ordering::SortKeys;
use crate::query::Slice;
use crate::value::{Attributes, Value};

/// A record a set can hold.
///
/// # Example
///
/// ```
/// use standout_recordset::{Attributes, Record, RecordSetError, Result, Value};
///
/// struct Task {
///     id: i64,
///     status: String,
/// }
///
/// impl Record for Task {
///     fn from_attributes(attributes: Attributes) -> Result<Self> {
///         let id = attributes
///             .get("id")
///             .and_then(Value::as_i64)
///             .ok_or_else(|| RecordSetError::MissingAttribute("id".into()))?;
///         let status = attributes
///             .get("status")
///             .and_then(Value::as_str)
///             .unwrap_or_default()
///             .to_string();
///         Ok(Task { id, status })
///     }
///
///     fn attribute(&self, name: &str) -> Value {
///         match name {
///             "id" => self.id.into(),
///             "status" => self.status.as_str().into(),
///             _ => Value::Null,
///         }
///     }
///
///     fn to_attributes(&self) -> Attributes {
///         Attributes::from([
///             ("id".to_string(), self.id.into()),
///             ("status".to_string(), self.status.as_str().into()),
///         ])
///     }
/// }
/// ```
pub trait Record: Sized {
    /// Reconstructs a record from one raw attribute mapping.
    fn from_attributes(attributes: Attributes) -> Result<Self>;

    /// Returns the value of an attribute, or [`Value::Null`] if absent.
    fn attribute(&self, name: &str) -> Value;

    /// Serializes the record into a plain attribute mapping.
    fn to_attributes(&self) -> Attributes;

    /// Returns whether this record satisfies a condition.
    ///
    /// Used only when refining an already materialized set in memory.
    fn satisfies(&self, condition: &Condition) -> Result<bool> {
        condition.evaluate(&self.attribute(&condition.attribute))
    }
}

impl Record for Attributes {
    fn from_attributes(attributes: Attributes) -> Result<Self> {
        Ok(attributes)
    }

    fn attribute(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }

    fn to_attributes(&self) -> Attributes {
        self.clone()
    }
}

/// Data access a record set pushes its query down to.
///
/// Conditions are conjunctive; sort keys are listed in precedence order;
/// a slice `limit` of `0` means no limit.
pub trait Backend {
    /// Fetches the raw records matching `conditions`, ordered by `sort_keys`,
    /// restricted to `slice`.
    fn query(
        &self,
        conditions: &Conditions,
        sort_keys: &SortKeys,
        slice: Slice,
    ) -> Result<Vec<Attributes>>;

    /// Counts the records `query` would return for the same conditions and
    /// slice.
    fn count(&self, conditions: &Conditions, slice: Slice) -> Result<usize>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn query(
        &self,
        conditions: &Conditions,
        sort_keys: &SortKeys,
        slice: Slice,
    ) -> Result<Vec<Attributes>> {
        (**self).query(conditions, sort_keys, slice)
    }

    fn count(&self, conditions: &Conditions, slice: Slice) -> Result<usize> {
        (**self).count(conditions, slice)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn query(
        &self,
        conditions: &Conditions,
        sort_keys: &SortKeys,
        slice: Slice,
    ) -> Result<Vec<Attributes>> {
        (**self).query(conditions, sort_keys, slice)
    }

    fn count(&self, conditions: &Conditions, slice: Slice) -> Result<usize> {
        (**self).count(conditions, slice)
    }
}
