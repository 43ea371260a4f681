//! Lazy filtering of record sequences.
//!
//! The filter functions never touch their source: they pull one item at a
//! time, test it, and yield a clone of each item that qualifies. Output
//! order is input order.

use std::fmt;
use std::iter::FusedIterator;

use log::trace;

use crate::combinators::all_of;
use crate::criterion::Criterion;
use crate::error::Result;
use crate::keywords::Expander;
use crate::path::Key;
use crate::predicate::Predicate;
use crate::query::query;
use crate::queryable::Queryable;

/// How a predicate set decides whether an item qualifies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Every predicate is true.
    #[default]
    All,
    /// At least one predicate is true.
    Any,
    /// No predicate is true.
    NotAny,
}

impl FilterMode {
    /// Returns the name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Any => "any",
            FilterMode::NotAny => "not_any",
        }
    }

    fn accepts(self, predicates: &[Predicate], record: &dyn Queryable) -> Result<bool> {
        match self {
            FilterMode::All => {
                for predicate in predicates {
                    if !predicate.eval(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            FilterMode::Any | FilterMode::NotAny => {
                let mut any = false;
                for predicate in predicates {
                    if predicate.eval(record)? {
                        any = true;
                        break;
                    }
                }
                Ok(any == (self == FilterMode::Any))
            }
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Iterator over clones of the items that pass a filter.
///
/// Yields `Err` once if a predicate fails, then ends.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Filtered<I> {
    items: I,
    predicates: Vec<Predicate>,
    mode: FilterMode,
    position: usize,
    done: bool,
}

impl<I> Filtered<I> {
    /// Returns the mode this iterator filters with.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Returns the predicates this iterator filters with.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

impl<I: fmt::Debug> fmt::Debug for Filtered<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filtered")
            .field("items", &self.items)
            .field("predicates", &self.predicates)
            .field("mode", &self.mode)
            .field("done", &self.done)
            .finish()
    }
}

impl<'a, T, I> Iterator for Filtered<I>
where
    T: Queryable + Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for item in self.items.by_ref() {
            let position = self.position;
            self.position += 1;
            match self.mode.accepts(&self.predicates, item) {
                Ok(true) => {
                    trace!("item {position} accepted by {} filter", self.mode);
                    return Some(Ok(item.clone()));
                }
                Ok(false) => trace!("item {position} rejected by {} filter", self.mode),
                Err(err) => {
                    trace!("item {position} failed {} filter: {err}", self.mode);
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        self.done = true;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.items.size_hint().1)
        }
    }
}

impl<'a, T, I> FusedIterator for Filtered<I>
where
    T: Queryable + Clone + 'a,
    I: Iterator<Item = &'a T>,
{
}

/// Filters `items` with `predicates` combined by `mode`.
pub fn filter<'a, T, S, P>(items: S, predicates: P, mode: FilterMode) -> Filtered<S::IntoIter>
where
    T: Queryable + Clone + 'a,
    S: IntoIterator<Item = &'a T>,
    P: IntoIterator<Item = Predicate>,
{
    Filtered {
        items: items.into_iter(),
        predicates: predicates.into_iter().collect(),
        mode,
        position: 0,
        done: false,
    }
}

/// Items for which every predicate is true. No predicates keeps every item.
pub fn filter_all<'a, T, S, P>(items: S, predicates: P) -> Filtered<S::IntoIter>
where
    T: Queryable + Clone + 'a,
    S: IntoIterator<Item = &'a T>,
    P: IntoIterator<Item = Predicate>,
{
    filter(items, predicates, FilterMode::All)
}

/// Items for which at least one predicate is true. No predicates keeps
/// nothing.
pub fn filter_any<'a, T, S, P>(items: S, predicates: P) -> Filtered<S::IntoIter>
where
    T: Queryable + Clone + 'a,
    S: IntoIterator<Item = &'a T>,
    P: IntoIterator<Item = Predicate>,
{
    filter(items, predicates, FilterMode::Any)
}

/// Items for which no predicate is true. No predicates keeps every item.
pub fn filter_not_any<'a, T, S, P>(items: S, predicates: P) -> Filtered<S::IntoIter>
where
    T: Queryable + Clone + 'a,
    S: IntoIterator<Item = &'a T>,
    P: IntoIterator<Item = Predicate>,
{
    filter(items, predicates, FilterMode::NotAny)
}

/// Collects predicates and equality constraints for one filter run.
///
/// Equality constraints compare a top-level item key to a value. They are
/// combined into a single conjunction that joins the predicate list.
///
/// ```
/// use query_filter::{query, FilterRequest};
/// use serde_json::json;
///
/// let trials = vec![
///     json!({"name": "alpha", "status": "open", "sites": 3}),
///     json!({"name": "beta", "status": "closed", "sites": 5}),
///     json!({"name": "gamma", "status": "open", "sites": 9}),
/// ];
///
/// let names: Vec<_> = FilterRequest::new(&trials)
///     .predicate(query().item("sites").gt(4))
///     .where_eq("status", "open")
///     .all()
///     .map(|trial| trial.map(|t| t["name"].clone()))
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(names, vec![json!("gamma")]);
/// ```
#[derive(Debug, Clone)]
pub struct FilterRequest<S> {
    items: S,
    predicates: Vec<Predicate>,
    constraints: Vec<(Key, Criterion)>,
}

impl<S> FilterRequest<S> {
    /// Starts a request over `items`.
    pub fn new(items: S) -> Self {
        FilterRequest {
            items,
            predicates: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a predicate. A [`Query`](crate::Query) passed here tests for
    /// truthiness.
    pub fn predicate(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    /// Adds several predicates.
    pub fn predicates<P>(mut self, predicates: P) -> Self
    where
        P: IntoIterator<Item = Predicate>,
    {
        self.predicates.extend(predicates);
        self
    }

    /// Requires the item at `key` to equal `value`.
    pub fn where_eq(mut self, key: impl Into<Key>, value: impl Into<Criterion>) -> Self {
        self.constraints.push((key.into(), value.into()));
        self
    }

    /// Adds a keyword predicate such as `("address__state", "CA")` over
    /// item lookups.
    pub fn keyword(mut self, key: &str, value: impl Into<Criterion>) -> Result<Self> {
        self.predicates.push(Expander::items().predicate(key, value)?);
        Ok(self)
    }

    /// Runs the request with `mode`.
    pub fn run<'a, T>(self, mode: FilterMode) -> Filtered<S::IntoIter>
    where
        T: Queryable + Clone + 'a,
        S: IntoIterator<Item = &'a T>,
    {
        let mut predicates = self.predicates;
        if !self.constraints.is_empty() {
            predicates.push(all_of(
                self.constraints
                    .into_iter()
                    .map(|(key, value)| query().item(key).eq(value)),
            ));
        }
        filter(self.items, predicates, mode)
    }

    /// Items passing every predicate and constraint.
    pub fn all<'a, T>(self) -> Filtered<S::IntoIter>
    where
        T: Queryable + Clone + 'a,
        S: IntoIterator<Item = &'a T>,
    {
        self.run(FilterMode::All)
    }

    /// Items passing at least one predicate, the constraints counting as
    /// one.
    pub fn any<'a, T>(self) -> Filtered<S::IntoIter>
    where
        T: Queryable + Clone + 'a,
        S: IntoIterator<Item = &'a T>,
    {
        self.run(FilterMode::Any)
    }

    /// Items passing no predicate, the constraints counting as one.
    pub fn not_any<'a, T>(self) -> Filtered<S::IntoIter>
    where
        T: Queryable + Clone + 'a,
        S: IntoIterator<Item = &'a T>,
    {
        self.run(FilterMode::NotAny)
    }
}
