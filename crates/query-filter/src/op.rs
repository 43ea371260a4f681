//! Operators and tests that predicates apply to resolved values.
//!
//! [`Op`] covers everything that compares a resolved value against a
//! criterion. [`Test`] covers checks that need nothing but the value.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Binary operator comparing a resolved value to a criterion.
///
/// Operators are grouped by what they do:
/// - **Ordering**: `Lt`, `Lte`, `Gt`, `Gte`
/// - **Equality**: `Eq`, `Ne`
/// - **Membership**: `In` (value in criterion), `Contains` (criterion in value)
/// - **Pattern**: `Regex` (search, not full match)
/// - **Identity**: `Is`, `IsNot`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Resolved value is a member of the criterion.
    In,
    /// Criterion is a member of the resolved value.
    Contains,
    /// Resolved string contains a match of the pattern.
    Regex,
    /// Identity.
    Is,
    /// Negated identity.
    IsNot,
}

impl Op {
    /// Every operator, in keyword-name order.
    pub const ALL: [Op; 11] = [
        Op::Lt,
        Op::Lte,
        Op::Eq,
        Op::Ne,
        Op::Gt,
        Op::Gte,
        Op::In,
        Op::Contains,
        Op::Regex,
        Op::Is,
        Op::IsNot,
    ];

    /// Evaluates an ordering operator given an ordering result.
    ///
    /// Equality operators are answered too; membership, pattern and
    /// identity operators always return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the keyword name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::In => "in",
            Op::Contains => "contains",
            Op::Regex => "regex",
            Op::Is => "is",
            Op::IsNot => "is_not",
        }
    }

    /// Returns the name of the `Query` method that builds this operator.
    pub fn method_name(self) -> &'static str {
        match self {
            Op::In => "is_in",
            Op::Regex => "matches_regex",
            Op::Is => "is_",
            other => other.as_str(),
        }
    }

    /// Looks an operator up by keyword name.
    pub fn from_keyword(name: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Looks an operator up by `Query` method name.
    pub fn from_method(name: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.method_name() == name)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Op {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::from_keyword(s).ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

/// Unary check on a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Test {
    /// Value is null.
    IsNone,
    /// Value is anything but null.
    IsNotNone,
    /// Value is exactly boolean `true`.
    IsTrue,
    /// Value is exactly boolean `false`.
    IsFalse,
    /// Value is truthy.
    Truthy,
    /// Value is falsy.
    Falsy,
}

impl Test {
    /// Every test.
    pub const ALL: [Test; 6] = [
        Test::IsNone,
        Test::IsNotNone,
        Test::IsTrue,
        Test::IsFalse,
        Test::Truthy,
        Test::Falsy,
    ];

    /// Returns the `Query` method name of this test.
    pub fn as_str(self) -> &'static str {
        match self {
            Test::IsNone => "is_none",
            Test::IsNotNone => "is_not_none",
            Test::IsTrue => "is_true",
            Test::IsFalse => "is_false",
            Test::Truthy => "truthy",
            Test::Falsy => "falsy",
        }
    }

    /// Looks a test up by method name.
    pub fn from_method(name: &str) -> Option<Test> {
        Test::ALL.into_iter().find(|test| test.as_str() == name)
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Test {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Test::from_method(s).ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}
