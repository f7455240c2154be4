//! Conditions: attribute / operator / operand predicates.
//!
//! A [`Condition`] is built without any validation. Shape mismatches between
//! operator and operand only surface when the condition is evaluated, either
//! by a backend or by [`Condition::evaluate`], the reference evaluator used
//! for in-memory refinement.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{RecordSetError, Result};
use crate::op::{Op, Shape};
use crate::ordering::compare_values;
use crate::traits::Record;
use crate::value::{Number, Timestamp, Value};

/// Operand of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single value or a `LIKE` pattern.
    Scalar(Value),
    /// Inclusive `(min, max)` bounds.
    Range(Value, Value),
    /// A set of candidate values.
    Set(Vec<Value>),
}

impl Operand {
    pub fn shape(&self) -> Shape {
        match self {
            Operand::Scalar(_) => Shape::Scalar,
            Operand::Range(..) => Shape::Range,
            Operand::Set(_) => Shape::Set,
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Scalar(v)
    }
}

impl From<ValueSet> for Operand {
    fn from(set: ValueSet) -> Self {
        Operand::Set(set.0)
    }
}

/// Values for `In`/`NotIn`.
///
/// A lone scalar converts into a singleton set.
///
/// ```
/// use standout_recordset::{Value, ValueSet};
///
/// assert_eq!(ValueSet::from("a").into_inner(), vec![Value::from("a")]);
/// assert_eq!(ValueSet::from(vec![1, 2]).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueSet(Vec<Value>);

impl ValueSet {
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

macro_rules! singleton_set_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ValueSet {
                fn from(v: $ty) -> Self {
                    ValueSet(vec![Value::from(v)])
                }
            }
        )*
    };
}

singleton_set_from!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, &str, Number,
    Timestamp, Value,
);

impl<T: Into<Value>> From<Vec<T>> for ValueSet {
    fn from(values: Vec<T>) -> Self {
        ValueSet(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for ValueSet {
    fn from(values: [T; N]) -> Self {
        ValueSet(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for ValueSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ValueSet(iter.into_iter().map(Into::into).collect())
    }
}

/// A single predicate.
///
/// # Example
///
/// ```
/// use standout_recordset::{Condition, Op, Operand, Value};
///
/// let condition = Condition::new("status", Op::Eq, Operand::Scalar("active".into()));
/// assert!(condition.evaluate(&Value::from("active")).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Condition {
    /// The attribute to compare.
    pub attribute: String,
    /// The comparison operator.
    pub op: Op,
    /// The operand to compare against.
    pub operand: Operand,
    pattern: OnceLock<std::result::Result<Regex, regex::Error>>,
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute && self.op == other.op && self.operand == other.operand
    }
}

impl Condition {
    pub fn new(attribute: impl Into<String>, op: Op, operand: impl Into<Operand>) -> Self {
        Condition {
            attribute: attribute.into(),
            op,
            operand: operand.into(),
            pattern: OnceLock::new(),
        }
    }

    /// Evaluates this condition against an attribute value.
    ///
    /// A `Null` value never matches, negative operators included. Values of
    /// incomparable types do not match.
    pub fn evaluate(&self, value: &Value) -> Result<bool> {
        self.validate()?;
        if value.is_null() {
            return Ok(false);
        }

        let matched = match (self.op, &self.operand) {
            (Op::In, Operand::Set(set)) => contains(set, value),
            (Op::NotIn, Operand::Set(set)) => !contains(set, value),
            (Op::Between, Operand::Range(min, max)) => within(value, min, max) == Some(true),
            // Incomparable values are neither inside nor outside.
            (Op::NotBetween, Operand::Range(min, max)) => within(value, min, max) == Some(false),
            (Op::Like, Operand::Scalar(_)) => self.like(value)?,
            (Op::NotLike, Operand::Scalar(_)) => value.as_str().is_some() && !self.like(value)?,
            (op, Operand::Scalar(operand)) => match compare_values(value, operand) {
                Some(ordering) => op.eval_ordering(ordering),
                None => false,
            },
            _ => false,
        };
        Ok(matched)
    }

    /// Checks that the operand fits the operator and that a `LIKE` pattern
    /// compiles, without looking at any record.
    pub fn validate(&self) -> Result<()> {
        let expected = self.op.shape();
        if self.operand.shape() != expected {
            return Err(RecordSetError::OperandShape {
                op: self.op,
                expected: expected.as_str(),
            });
        }
        if matches!(self.op, Op::Like | Op::NotLike) {
            self.regex()?;
        }
        Ok(())
    }

    fn regex(&self) -> Result<&Regex> {
        let Operand::Scalar(Value::String(pattern)) = &self.operand else {
            return Err(RecordSetError::OperandShape {
                op: self.op,
                expected: "pattern string",
            });
        };
        self.pattern
            .get_or_init(|| like_to_regex(pattern))
            .as_ref()
            .map_err(|err| RecordSetError::InvalidPattern(err.clone()))
    }

    fn like(&self, value: &Value) -> Result<bool> {
        let Some(text) = value.as_str() else {
            return Ok(false);
        };
        Ok(self.regex()?.is_match(text))
    }
}

fn contains(set: &[Value], value: &Value) -> bool {
    set.iter()
        .any(|candidate| compare_values(value, candidate) == Some(Ordering::Equal))
}

/// Returns whether `value` lies inside `[min, max]`, or `None` when it
/// cannot be compared with both bounds.
fn within(value: &Value, min: &Value, max: &Value) -> Option<bool> {
    if min.is_null() || max.is_null() {
        return None;
    }
    let low = compare_values(value, min)?;
    let high = compare_values(value, max)?;
    Some(low != Ordering::Less && high != Ordering::Greater)
}

/// Translates a SQL `LIKE` pattern into an anchored regular expression.
///
/// `%` matches any run of characters, `_` exactly one, and `\` escapes the
/// character that follows it.
pub fn like_to_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    source.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
                } else {
                    source.push_str(r"\\");
                }
            }
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');
    Regex::new(&source)
}

/// Accumulated conditions, grouped by attribute.
///
/// Attributes keep the order in which they were first constrained; within an
/// attribute, conditions keep call order. All conditions must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    groups: Vec<(String, Vec<Condition>)>,
}

impl Conditions {
    pub fn new() -> Self {
        Conditions::default()
    }

    /// Appends a condition to its attribute's group.
    pub fn push(&mut self, condition: Condition) {
        match self
            .groups
            .iter_mut()
            .find(|(attribute, _)| *attribute == condition.attribute)
        {
            Some((_, group)) => group.push(condition),
            None => self
                .groups
                .push((condition.attribute.clone(), vec![condition])),
        }
    }

    /// Returns the conditions on one attribute.
    pub fn for_attribute(&self, attribute: &str) -> &[Condition] {
        self.groups
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, group)| group.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates `(attribute, conditions)` groups in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[Condition])> {
        self.groups
            .iter()
            .map(|(attribute, group)| (attribute.as_str(), group.as_slice()))
    }

    /// Iterates every condition, group by group.
    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.groups.iter().flat_map(|(_, group)| group.iter())
    }

    /// Total number of conditions.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, group)| group.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Returns `true` if the record satisfies every condition.
    pub fn matches<R: Record>(&self, record: &R) -> Result<bool> {
        for condition in self.iter() {
            if !record.satisfies(condition)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
