//! Fluent query builder.
//!
//! A [`Query`] accumulates lookups from the root record and turns a
//! terminal method into a [`Predicate`]. Each step returns a new builder,
//! so a partially built query can be shared and extended freely.

use std::fmt;
use std::ops::Not;

use crate::criterion::Criterion;
use crate::error::{QueryError, Result};
use crate::op::{Op, Test};
use crate::path::{Key, Lookup, Path};
use crate::predicate::{self, Predicate, Presence};
use crate::value::Value;

/// Returns an empty query rooted at the record itself.
pub fn query() -> Query {
    Query::root()
}

/// Path builder producing predicates.
///
/// # Example
///
/// ```
/// use query_filter::{query, filter_all};
/// use serde_json::json;
///
/// let users = vec![
///     json!({"name": "Alice", "address": {"state": "CA"}}),
///     json!({"name": "Bob", "address": {"state": "NY"}}),
///     json!({"name": "Carol"}),
/// ];
///
/// let in_california = query().item("address").item("state").eq("CA");
/// let found: Vec<_> = filter_all(&users, [in_california])
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(found, vec![users[0].clone()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    path: Path,
    presence: Presence,
}

impl Query {
    /// Creates a query with an empty path.
    ///
    /// Terminal methods on the root query test the record itself.
    pub fn root() -> Self {
        Query::default()
    }

    /// Creates a query starting from an existing path.
    pub fn from_path(path: Path) -> Self {
        Query {
            path,
            presence: Presence::default(),
        }
    }

    /// Sets the presence policy carried by every predicate this query
    /// builds.
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Returns the accumulated path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the presence policy.
    pub fn presence(&self) -> Presence {
        self.presence
    }

    // ========================================================================
    // Path extension
    // ========================================================================

    /// Extends the path with an attribute lookup.
    pub fn attr(&self, name: impl Into<String>) -> Self {
        self.extend(Lookup::attr(name))
    }

    /// Extends the path with an item lookup.
    pub fn item(&self, key: impl Into<Key>) -> Self {
        self.extend(Lookup::item(key))
    }

    fn extend(&self, lookup: Lookup) -> Self {
        Query {
            path: self.path.child(lookup),
            presence: self.presence,
        }
    }

    // ========================================================================
    // Comparisons
    // ========================================================================

    /// Value is less than `value`.
    pub fn lt(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Lt, value.into())
    }

    /// Value is less than or equal to `value`.
    pub fn lte(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Lte, value.into())
    }

    /// Value equals `value`.
    pub fn eq(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Eq, value.into())
    }

    /// Value does not equal `value`.
    pub fn ne(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Ne, value.into())
    }

    /// Value is greater than `value`.
    pub fn gt(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Gt, value.into())
    }

    /// Value is greater than or equal to `value`.
    pub fn gte(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Gte, value.into())
    }

    // ========================================================================
    // Membership, pattern and identity
    // ========================================================================

    /// Value is a member of `container`: a list element, a map key, or a
    /// substring.
    pub fn is_in(&self, container: impl Into<Criterion>) -> Predicate {
        self.compare(Op::In, container.into())
    }

    /// `member` is a member of the value.
    pub fn contains(&self, member: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Contains, member.into())
    }

    /// Value contains a match of `pattern`.
    ///
    /// The pattern is compiled once, here.
    pub fn matches_regex(&self, pattern: &str) -> Result<Predicate> {
        self.apply(Op::Regex, pattern)
    }

    /// Value is identical to `value`.
    pub fn is_(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::Is, value.into())
    }

    /// Value is not identical to `value`.
    pub fn is_not(&self, value: impl Into<Criterion>) -> Predicate {
        self.compare(Op::IsNot, value.into())
    }

    // ========================================================================
    // Unary tests
    // ========================================================================

    /// Value is null.
    pub fn is_none(&self) -> Predicate {
        self.test(Test::IsNone)
    }

    /// Value is present and not null.
    pub fn is_not_none(&self) -> Predicate {
        self.test(Test::IsNotNone)
    }

    /// Value is exactly `true`.
    pub fn is_true(&self) -> Predicate {
        self.test(Test::IsTrue)
    }

    /// Value is exactly `false`.
    pub fn is_false(&self) -> Predicate {
        self.test(Test::IsFalse)
    }

    /// Value is truthy.
    pub fn truthy(&self) -> Predicate {
        self.test(Test::Truthy)
    }

    /// Value is present and falsy.
    pub fn falsy(&self) -> Predicate {
        self.test(Test::Falsy)
    }

    /// Value passes a custom check.
    pub fn satisfies<F>(&self, f: F) -> Predicate
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        predicate::satisfies(self.path.clone(), self.presence, f)
    }

    // ========================================================================
    // Generic terminals
    // ========================================================================

    /// Applies any binary operator.
    ///
    /// Fails only for [`Op::Regex`] with a bad pattern.
    pub fn apply(&self, op: Op, criterion: impl Into<Criterion>) -> Result<Predicate> {
        predicate::binary(op, self.path.clone(), criterion.into(), self.presence)
    }

    /// Applies any unary test.
    pub fn test(&self, test: Test) -> Predicate {
        predicate::unary(test, self.path.clone(), self.presence)
    }

    fn compare(&self, op: Op, criterion: Criterion) -> Predicate {
        predicate::comparison(op, self.path.clone(), criterion, self.presence)
    }

    /// Treats the last attribute lookup as a method call.
    ///
    /// `query().attr("age").attr("gt").invoke([18])` is the same as
    /// `query().attr("age").gt(18)`. Only attribute lookups named after a
    /// comparison or test method qualify, and the argument count must fit
    /// the method.
    pub fn invoke<I>(&self, args: I) -> Result<Predicate>
    where
        I: IntoIterator,
        I::Item: Into<Criterion>,
    {
        let (Some(parent), Some(last)) = (self.path.parent(), self.path.last()) else {
            return Err(QueryError::invalid_usage(
                "cannot invoke an empty query; build a path first",
            ));
        };
        let Lookup::Attr(method) = last else {
            return Err(QueryError::invalid_usage(format!(
                "cannot invoke {last}: only attribute lookups name methods"
            )));
        };
        let target = Query {
            path: parent,
            presence: self.presence,
        };
        let mut args: Vec<Criterion> = args.into_iter().map(Into::into).collect();

        if let Some(op) = Op::from_method(method) {
            let arg = match args.len() {
                1 => args.pop(),
                _ => None,
            };
            let Some(arg) = arg else {
                return Err(QueryError::invalid_usage(format!(
                    "'{method}' takes exactly one argument, got {}",
                    args.len()
                )));
            };
            return target.apply(op, arg);
        }

        if let Some(test) = invokable_test(method) {
            if !args.is_empty() {
                return Err(QueryError::invalid_usage(format!(
                    "'{method}' takes no arguments, got {}",
                    args.len()
                )));
            }
            return Ok(target.test(test));
        }

        Err(QueryError::invalid_usage(format!(
            "'{method}' is not a query method"
        )))
    }
}

fn invokable_test(name: &str) -> Option<Test> {
    Test::from_method(name).filter(|test| !matches!(test, Test::Truthy | Test::Falsy))
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// `!query` tests for a falsy value.
impl Not for Query {
    type Output = Predicate;

    fn not(self) -> Predicate {
        self.falsy()
    }
}

/// A bare query used as a predicate tests for a truthy value.
impl From<Query> for Predicate {
    fn from(query: Query) -> Predicate {
        query.truthy()
    }
}

impl From<&Query> for Predicate {
    fn from(query: &Query) -> Predicate {
        query.truthy()
    }
}
