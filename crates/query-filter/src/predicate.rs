//! Predicates over records.
//!
//! A [`Predicate`] is a cloneable boolean function over a root record. The
//! constructors here resolve a [`Path`] first and only then apply an
//! operator, so a record that lacks the value never matches.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;

use crate::combinators::{all_of, any_of, negate};
use crate::compare;
use crate::criterion::Criterion;
use crate::error::{QueryError, Result};
use crate::op::{Op, Test};
use crate::path::Path;
use crate::queryable::Queryable;
use crate::value::Value;

type EvalFn = dyn Fn(&dyn Queryable) -> Result<bool> + Send + Sync;

/// Boolean function over a root record.
///
/// Predicates are cheap to clone and can be shared across threads. The
/// label is used for `Debug` output and logging.
#[derive(Clone)]
pub struct Predicate {
    eval: Arc<EvalFn>,
    label: Arc<str>,
}

impl Predicate {
    /// Wraps an infallible custom predicate.
    ///
    /// ```
    /// use query_filter::{Key, Predicate, Queryable, Value};
    /// use serde_json::json;
    ///
    /// let even_id = Predicate::new(|record| {
    ///     matches!(
    ///         record.item(&Key::from("id")),
    ///         Some(Value::Number(n)) if n.as_i64().is_some_and(|id| id % 2 == 0)
    ///     )
    /// });
    /// assert!(even_id.eval(&json!({"id": 4})).unwrap());
    /// assert!(!even_id.eval(&json!({"id": 3})).unwrap());
    /// ```
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Queryable) -> bool + Send + Sync + 'static,
    {
        Self::try_new(move |record| Ok(f(record)))
    }

    /// Wraps a custom predicate that may fail.
    pub fn try_new<F>(f: F) -> Self
    where
        F: Fn(&dyn Queryable) -> Result<bool> + Send + Sync + 'static,
    {
        Predicate {
            eval: Arc::new(f),
            label: Arc::from("<custom>"),
        }
    }

    /// Replaces the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Arc::from(label.into());
        self
    }

    /// Evaluates the predicate against a record.
    pub fn eval(&self, record: &dyn Queryable) -> Result<bool> {
        (self.eval)(record)
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        negate(self)
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        all_of([self, rhs])
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        any_of([self, rhs])
    }
}

/// What counts as "no value" before an operator runs.
///
/// Whatever the policy rejects makes the predicate false without the
/// operator being consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Only an unresolvable path is absent. `Null` and falsy values are
    /// compared like any other.
    #[default]
    Absent,
    /// An unresolvable path or a `Null` value is absent.
    NonNull,
    /// An unresolvable path or any falsy value is absent.
    Truthy,
}

impl Presence {
    /// Returns `true` if a resolved value should reach the operator.
    pub fn admits(self, value: &Value<'_>) -> bool {
        match self {
            Presence::Absent => true,
            Presence::NonNull => !value.is_null(),
            Presence::Truthy => value.is_truthy(),
        }
    }
}

/// Pattern compiled for both text and byte-string values.
#[derive(Debug, Clone)]
struct Pattern {
    text: Regex,
    bytes: BytesRegex,
}

impl Pattern {
    fn compile(criterion: &Criterion) -> Result<Self> {
        let Criterion::String(source) = criterion else {
            return Err(QueryError::TypeMismatch {
                op: Op::Regex.as_str(),
                expected: "a string pattern",
                actual: criterion.kind(),
            });
        };
        Ok(Pattern {
            text: Regex::new(source)?,
            bytes: BytesRegex::new(source)?,
        })
    }

    fn search(&self, value: Value<'_>) -> Result<bool> {
        match value {
            Value::String(s) => Ok(self.text.is_match(s)),
            Value::Bytes(b) => Ok(self.bytes.is_match(b)),
            other => Err(QueryError::TypeMismatch {
                op: Op::Regex.as_str(),
                expected: "a string or bytes",
                actual: other.kind(),
            }),
        }
    }
}

fn present<'a>(path: &Path, record: &'a dyn Queryable, presence: Presence) -> Option<Value<'a>> {
    path.resolve(record)
        .ok()
        .filter(|value| presence.admits(value))
}

/// Applies a binary operator to a resolved value.
///
/// `Op::Regex` compiles the pattern on every call here; [`binary`] compiles
/// it once up front.
pub fn evaluate(op: Op, value: Value<'_>, criterion: &Criterion) -> Result<bool> {
    match op {
        Op::Eq => Ok(compare::equals(value, criterion)),
        Op::Ne => Ok(!compare::equals(value, criterion)),
        Op::Lt | Op::Lte | Op::Gt | Op::Gte => Ok(compare::order(op.as_str(), value, criterion)?
            .is_some_and(|ordering| op.eval_ordering(ordering))),
        Op::In => compare::member_of(value, criterion),
        Op::Contains => compare::contains(value, criterion),
        Op::Regex => Pattern::compile(criterion)?.search(value),
        Op::Is => Ok(compare::identical(value, criterion)),
        Op::IsNot => Ok(!compare::identical(value, criterion)),
    }
}

/// Applies a unary test to a resolved value.
pub fn check(test: Test, value: Value<'_>) -> bool {
    match test {
        Test::IsNone => value.is_null(),
        Test::IsNotNone => !value.is_null(),
        Test::IsTrue => matches!(value, Value::Bool(true)),
        Test::IsFalse => matches!(value, Value::Bool(false)),
        Test::Truthy => value.is_truthy(),
        Test::Falsy => !value.is_truthy(),
    }
}

/// Builds a predicate comparing the value at `path` to `criterion`.
///
/// Fails only when `op` is [`Op::Regex`] and the pattern does not compile
/// or is not a string.
pub fn binary(op: Op, path: Path, criterion: Criterion, presence: Presence) -> Result<Predicate> {
    if op != Op::Regex {
        return Ok(comparison(op, path, criterion, presence));
    }
    let label = format!("{path} {op} {criterion}");
    let pattern = Pattern::compile(&criterion)?;
    Ok(
        Predicate::try_new(move |record| match present(&path, record, presence) {
            Some(value) => pattern.search(value),
            None => Ok(false),
        })
        .with_label(label),
    )
}

/// Like [`binary`], for operators that need no up-front compilation.
pub(crate) fn comparison(
    op: Op,
    path: Path,
    criterion: Criterion,
    presence: Presence,
) -> Predicate {
    let label = format!("{path} {op} {criterion}");
    Predicate::try_new(move |record| match present(&path, record, presence) {
        Some(value) => evaluate(op, value, &criterion),
        None => Ok(false),
    })
    .with_label(label)
}

/// Builds a predicate running `test` on the value at `path`.
pub fn unary(test: Test, path: Path, presence: Presence) -> Predicate {
    let label = format!("{path} {test}");
    Predicate::new(move |record| {
        present(&path, record, presence).is_some_and(|value| check(test, value))
    })
    .with_label(label)
}

/// Builds a predicate running a custom check on the value at `path`.
pub fn satisfies<F>(path: Path, presence: Presence, f: F) -> Predicate
where
    F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
{
    let label = format!("{path} satisfies <custom>");
    Predicate::new(move |record| present(&path, record, presence).is_some_and(|value| f(&value)))
        .with_label(label)
}
