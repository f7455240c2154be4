//! Comparison operators for conditions.
//!
//! The [`Op`] enum is closed: these twelve operators are the whole
//! vocabulary a [`Backend`](crate::Backend) has to understand.

use std::cmp::Ordering;

/// Comparison operator for a condition.
///
/// Each operator expects an operand of a given [`Shape`]:
/// - **Range**: `Between`, `NotBetween`
/// - **Set**: `In`, `NotIn`
/// - **Scalar**: everything else (`Like`/`NotLike` take a pattern string)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Member of a set.
    In,
    /// Not a member of a set.
    NotIn,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Ge,
    /// Less than or equal.
    Le,
    /// Inside an inclusive range.
    Between,
    /// Outside an inclusive range.
    NotBetween,
    /// Matches a SQL-style pattern.
    Like,
    /// Does not match a SQL-style pattern.
    NotLike,
}

/// Operand shape an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Range,
    Set,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Scalar => "scalar",
            Shape::Range => "range",
            Shape::Set => "set",
        }
    }
}

impl Op {
    /// All operators, in declaration order.
    pub const ALL: [Op; 12] = [
        Op::Eq,
        Op::Ne,
        Op::In,
        Op::NotIn,
        Op::Gt,
        Op::Lt,
        Op::Ge,
        Op::Le,
        Op::Between,
        Op::NotBetween,
        Op::Like,
        Op::NotLike,
    ];

    /// Returns the operand shape this operator expects.
    pub fn shape(self) -> Shape {
        match self {
            Op::Between | Op::NotBetween => Shape::Range,
            Op::In | Op::NotIn => Shape::Set,
            _ => Shape::Scalar,
        }
    }

    /// Returns the complementary operator.
    ///
    /// `Gt` negates to `Le` and `Lt` to `Ge`: excluding "greater than v"
    /// keeps "v or less".
    pub fn negate(self) -> Op {
        match self {
            Op::Eq => Op::Ne,
            Op::Ne => Op::Eq,
            Op::In => Op::NotIn,
            Op::NotIn => Op::In,
            Op::Gt => Op::Le,
            Op::Le => Op::Gt,
            Op::Lt => Op::Ge,
            Op::Ge => Op::Lt,
            Op::Between => Op::NotBetween,
            Op::NotBetween => Op::Between,
            Op::Like => Op::NotLike,
            Op::NotLike => Op::Like,
        }
    }

    /// Evaluates a scalar comparison given an ordering result.
    ///
    /// Returns `false` for operators that are not ordering-based.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Ge => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Le => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::In => "in",
            Op::NotIn => "not_in",
            Op::Gt => "gt",
            Op::Lt => "lt",
            Op::Ge => "ge",
            Op::Le => "le",
            Op::Between => "between",
            Op::NotBetween => "not_between",
            Op::Like => "like",
            Op::NotLike => "not_like",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
