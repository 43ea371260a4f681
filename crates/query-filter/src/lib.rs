//! Query-filter - Composable predicates for filtering in-memory records.
//!
//! Query-filter lets you describe "the value at this path compares to that
//! value" once, combine such predicates with boolean logic, and apply them
//! lazily to any sequence of records. It supports:
//!
//! - Nested lookups through attributes (struct fields) and items (map keys,
//!   sequence indices), tolerating missing data
//! - Rich operators: ordering, equality, membership, regex, identity
//! - Unary tests: null, exact booleans, truthiness
//! - Combinators: `all_of`, `any_of`, `none_of`, `negate`, and `!`, `&`, `|`
//! - Keyword predicates such as `address__state__eq`
//!
//! # Quick Start
//!
//! ```rust
//! use query_filter::{filter_all, query, Queryable};
//!
//! #[derive(Clone, Queryable)]
//! struct Task {
//!     name: String,
//!     priority: i32,
//!     archived: bool,
//! }
//!
//! let tasks = vec![
//!     Task { name: "Write docs".into(), priority: 3, archived: false },
//!     Task { name: "Fix bug".into(), priority: 5, archived: false },
//!     Task { name: "Old task".into(), priority: 1, archived: true },
//! ];
//!
//! let urgent = query().attr("priority").gte(3) & query().attr("archived").is_false();
//! let results: Vec<Task> = filter_all(&tasks, [urgent])
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].name, "Write docs");
//! ```
//!
//! # Missing Values
//!
//! A path that cannot be resolved (missing key, missing attribute, index
//! out of range, lookup on a scalar) makes every predicate on it false. The
//! operator never runs. A present `null` is a value like any other; see
//! [`Presence`] to treat it, or any falsy value, as missing instead.
//!
//! # Errors
//!
//! Comparisons that make no sense for the values involved, such as
//! ordering a string against a number, are errors rather than `false`.
//! Filtering yields the error once and stops.
//!
//! # Operators
//!
//! | Operator | Keyword | Meaning |
//! |----------|---------|---------|
//! | `Lt`, `Lte`, `Gt`, `Gte` | `lt`, `lte`, `gt`, `gte` | Ordering |
//! | `Eq`, `Ne` | `eq`, `ne` | Equality |
//! | `In` | `in` | Value is in the criterion |
//! | `Contains` | `contains` | Criterion is in the value |
//! | `Regex` | `regex` | Value contains a pattern match |
//! | `Is`, `IsNot` | `is`, `is_not` | Identity |

mod combinators;
mod compare;
mod criterion;
mod error;
mod filter;
mod keywords;
mod op;
mod path;
pub mod predicate;
mod query;
mod queryable;
mod value;

// Re-export public API
pub use combinators::{all_of, any_of, negate, none_of};
pub use criterion::Criterion;
pub use error::{QueryError, Result};
pub use filter::{
    filter, filter_all, filter_any, filter_not_any, FilterMode, FilterRequest, Filtered,
};
pub use keywords::{
    attrs_all, attrs_any, attrs_not_any, items_all, items_any, items_not_any, keyword_predicate,
    split_key, Expander,
};
pub use op::{Op, Test};
pub use path::{Key, Lookup, LookupKind, NotFound, Path};
pub use predicate::{Predicate, Presence};
pub use query::{query, Query};
pub use queryable::{MapKey, Queryable};
pub use value::{Number, Shape, Value};

#[cfg(feature = "derive")]
pub use query_filter_macros::Queryable;
