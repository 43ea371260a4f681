//! Keyword predicates.
//!
//! A keyword key packs a path and an operator into one string, separated by
//! double underscores: `address__state` compares `address.state` for
//! equality, `age__gte` compares `age` with `gte`. The operator suffix is
//! optional and defaults to `eq`.
//!
//! ```
//! use query_filter::items_all;
//! use serde_json::json;
//!
//! let adult_in_ca = items_all([("age__gte", json!(18)), ("address__state", json!("CA"))]).unwrap();
//! assert!(adult_in_ca.eval(&json!({"age": 30, "address": {"state": "CA"}})).unwrap());
//! assert!(!adult_in_ca.eval(&json!({"age": 30})).unwrap());
//! ```

use log::debug;

use crate::combinators::{all_of, any_of, none_of};
use crate::criterion::Criterion;
use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::path::{LookupKind, Path};
use crate::predicate::{self, Predicate, Presence};

const SEPARATOR: &str = "__";

/// Splits a keyword key into its path segments and operator.
///
/// A trailing segment naming an operator (`lt`, `lte`, `eq`, `ne`, `gt`,
/// `gte`, `in`, `contains`, `regex`, `is`, `is_not`) is taken as the
/// operator; otherwise the whole key is the path and the operator is `eq`.
///
/// # Errors
///
/// [`QueryError::MalformedKey`] if the path is empty or any segment of it
/// is empty.
///
/// ```
/// use query_filter::{split_key, Op};
///
/// let (path, op) = split_key("a__b__gte").unwrap();
/// assert_eq!(path, ["a", "b"]);
/// assert_eq!(op, Op::Gte);
///
/// assert_eq!(split_key("a").unwrap().1, Op::Eq);
/// assert!(split_key("a____b").is_err());
/// ```
pub fn split_key(key: &str) -> Result<(Vec<String>, Op)> {
    let mut segments: Vec<&str> = key.split(SEPARATOR).collect();
    let op = match segments.last().and_then(|last| Op::from_keyword(last)) {
        Some(op) => {
            segments.pop();
            op
        }
        None => Op::Eq,
    };

    if segments.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
        return Err(QueryError::MalformedKey {
            key: key.to_string(),
        });
    }

    Ok((segments.into_iter().map(str::to_string).collect(), op))
}

/// Builds keyword predicates over one kind of lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expander {
    kind: LookupKind,
    presence: Presence,
}

impl Expander {
    /// Keyword paths look up items by key.
    pub fn items() -> Self {
        Expander::new(LookupKind::Item)
    }

    /// Keyword paths look up attributes by name.
    pub fn attrs() -> Self {
        Expander::new(LookupKind::Attr)
    }

    /// Keyword paths use lookups of `kind`.
    pub fn new(kind: LookupKind) -> Self {
        Expander {
            kind,
            presence: Presence::default(),
        }
    }

    /// Sets the presence policy for every predicate built.
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Returns the lookup kind.
    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    /// Returns the presence policy.
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Builds the predicate for one keyword.
    pub fn predicate(&self, key: &str, value: impl Into<Criterion>) -> Result<Predicate> {
        let (segments, op) = split_key(key)?;
        let path = Path::from_names(self.kind, segments);
        let predicate = predicate::binary(op, path, value.into(), self.presence)?;
        debug!(
            "expanded {} keyword {key:?} to {}",
            self.kind.as_str(),
            predicate.label()
        );
        Ok(predicate)
    }

    /// Builds one predicate per keyword, in order. Stops at the first bad
    /// key.
    pub fn predicates<I, K, V>(&self, pairs: I) -> Result<Vec<Predicate>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Criterion>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| self.predicate(key.as_ref(), value))
            .collect()
    }

    /// True when every keyword holds.
    pub fn all<I, K, V>(&self, pairs: I) -> Result<Predicate>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Criterion>,
    {
        Ok(all_of(self.predicates(pairs)?))
    }

    /// True when at least one keyword holds.
    pub fn any<I, K, V>(&self, pairs: I) -> Result<Predicate>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Criterion>,
    {
        Ok(any_of(self.predicates(pairs)?))
    }

    /// True when no keyword holds.
    pub fn not_any<I, K, V>(&self, pairs: I) -> Result<Predicate>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Criterion>,
    {
        Ok(none_of(self.predicates(pairs)?))
    }
}

/// Builds one keyword predicate with lookups of `kind`.
pub fn keyword_predicate(
    kind: LookupKind,
    key: &str,
    value: impl Into<Criterion>,
) -> Result<Predicate> {
    Expander::new(kind).predicate(key, value)
}

/// Every keyword holds, using item lookups.
pub fn items_all<I, K, V>(pairs: I) -> Result<Predicate>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Criterion>,
{
    Expander::items().all(pairs)
}

/// At least one keyword holds, using item lookups.
pub fn items_any<I, K, V>(pairs: I) -> Result<Predicate>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Criterion>,
{
    Expander::items().any(pairs)
}

/// No keyword holds, using item lookups.
pub fn items_not_any<I, K, V>(pairs: I) -> Result<Predicate>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Criterion>,
{
    Expander::items().not_any(pairs)
}

/// Every keyword holds, using attribute lookups.
pub fn attrs_all<I, K, V>(pairs: I) -> Result<Predicate>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Criterion>,
{
    Expander::attrs().all(pairs)
}

/// At least one keyword holds, using attribute lookups.
pub fn attrs_any<I, K, V>(pairs: I) -> Result<Predicate>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Criterion>,
{
    Expander::attrs().any(pairs)
}

/// No keyword holds, using attribute lookups.
pub fn attrs_not_any<I, K, V>(pairs: I) -> Result<Predicate>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Criterion>,
{
    Expander::attrs().not_any(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_with_operator_suffix() {
        assert_eq!(split_key("a__b__gte").unwrap(), (names(&["a", "b"]), Op::Gte));
        assert_eq!(split_key("tags__contains").unwrap(), (names(&["tags"]), Op::Contains));
        assert_eq!(split_key("x__is_not").unwrap(), (names(&["x"]), Op::IsNot));
        assert_eq!(split_key("name__regex").unwrap(), (names(&["name"]), Op::Regex));
    }

    #[test]
    fn split_defaults_to_equality() {
        assert_eq!(split_key("a").unwrap(), (names(&["a"]), Op::Eq));
        assert_eq!(split_key("a__b").unwrap(), (names(&["a", "b"]), Op::Eq));
        // Only the last segment can be an operator.
        assert_eq!(split_key("gt__a").unwrap(), (names(&["gt", "a"]), Op::Eq));
        // Single underscores are part of the name.
        assert_eq!(split_key("first_name").unwrap(), (names(&["first_name"]), Op::Eq));
    }

    #[test]
    fn split_rejects_empty_segments() {
        for key in ["", "a__", "__b", "a____b", "__", "__lt", "a__b__", "__a__gt", "lt"] {
            assert!(
                matches!(split_key(key), Err(QueryError::MalformedKey { key: k }) if k == key),
                "{key:?} should be malformed"
            );
        }
    }

    #[test]
    fn item_and_attr_expansion() {
        let record = json!({"a": {"b": 5}});
        assert!(Expander::items().predicate("a__b__gt", 3).unwrap().eval(&record).unwrap());
        // JSON values have no attributes.
        assert!(!Expander::attrs().predicate("a__b__gt", 3).unwrap().eval(&record).unwrap());
        assert_eq!(Expander::attrs().kind(), LookupKind::Attr);
    }

    #[test]
    fn aggregators() {
        let record = json!({"x": 1, "y": "z"});
        let pairs = || [("x", json!(1)), ("y__ne", json!("z"))];

        assert!(!items_all(pairs()).unwrap().eval(&record).unwrap());
        assert!(items_any(pairs()).unwrap().eval(&record).unwrap());
        assert!(!items_not_any(pairs()).unwrap().eval(&record).unwrap());
        assert!(items_all(Vec::<(&str, i32)>::new()).unwrap().eval(&record).unwrap());
    }

    #[test]
    fn bad_keys_fail_eagerly() {
        let result = items_all([("ok", json!(1)), ("bad__", json!(2))]);
        assert!(matches!(result, Err(QueryError::MalformedKey { .. })));

        let result = keyword_predicate(LookupKind::Item, "name__regex", "(");
        assert!(matches!(result, Err(QueryError::InvalidRegex(_))));
    }

    #[test]
    fn presence_applies_to_expanded_predicates() {
        let record = json!({"x": null});
        let lenient = Expander::items();
        let strict = Expander::items().with_presence(Presence::NonNull);

        assert!(lenient.predicate("x__ne", 1).unwrap().eval(&record).unwrap());
        assert!(!strict.predicate("x__ne", 1).unwrap().eval(&record).unwrap());
        assert_eq!(strict.presence(), Presence::NonNull);
    }
}
