//! Sort keys and value comparison.
//!
//! Provides [`Dir`] for sort direction, [`SortKey`] for one attribute, and
//! [`SortKeys`], the ordered mapping a record set accumulates through
//! [`RecordSet::sort_by`](crate::RecordSet::sort_by).

use std::cmp::Ordering;

use crate::traits::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl From<bool> for Dir {
    /// `true` is ascending.
    fn from(ascending: bool) -> Self {
        if ascending {
            Dir::Asc
        } else {
            Dir::Desc
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort key: an attribute and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// The attribute to sort by.
    pub attribute: String,
    /// The sort direction.
    pub dir: Dir,
}

impl SortKey {
    pub fn new(attribute: impl Into<String>, dir: Dir) -> Self {
        SortKey {
            attribute: attribute.into(),
            dir,
        }
    }

    /// Compares two values according to this key.
    ///
    /// Returns `None` if the values cannot be compared (type mismatch or NaN).
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        compare_values(a, b).map(|ordering| self.dir.apply(ordering))
    }
}

/// Sort keys keyed by attribute.
///
/// Setting an attribute a second time overwrites its direction but keeps its
/// original position: precedence is the order in which distinct attributes
/// were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortKeys {
    keys: Vec<SortKey>,
}

impl SortKeys {
    pub fn new() -> Self {
        SortKeys::default()
    }

    /// Sets the direction for an attribute.
    pub fn set(&mut self, attribute: &str, dir: Dir) {
        match self.keys.iter_mut().find(|key| key.attribute == attribute) {
            Some(key) => key.dir = dir,
            None => self.keys.push(SortKey::new(attribute, dir)),
        }
    }

    /// Returns the direction for an attribute, if set.
    pub fn get(&self, attribute: &str) -> Option<Dir> {
        self.keys
            .iter()
            .find(|key| key.attribute == attribute)
            .map(|key| key.dir)
    }

    /// Iterates the keys in precedence order.
    pub fn iter(&self) -> std::slice::Iter<'_, SortKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compares two records key by key; later keys break ties.
    ///
    /// Incomparable values count as equal for that key.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        for key in &self.keys {
            let val_a = a.attribute(&key.attribute);
            let val_b = b.attribute(&key.attribute);

            if let Some(ordering) = key.compare(&val_a, &val_b) {
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
        Ordering::Equal
    }
}

impl<'a> IntoIterator for &'a SortKeys {
    type Item = &'a SortKey;
    type IntoIter = std::slice::Iter<'a, SortKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Compares two values of the same type.
///
/// `Null` sorts after everything else. Returns `None` if the types don't
/// match or comparison is not possible (NaN).
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),

        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Greater),
        (_, Value::Null) => Some(Ordering::Less),

        _ => None,
    }
}
