//! Comparison of resolved values against criteria.
//!
//! Equality never fails: values of different kinds are simply unequal.
//! Ordering and membership do fail when the two sides cannot be compared,
//! and the error travels up to whoever is evaluating the predicate.

use std::cmp::Ordering;

use crate::criterion::Criterion;
use crate::error::{QueryError, Result};
use crate::path::Key;
use crate::value::{Shape, Value};

/// Deep equality between a resolved value and a criterion.
///
/// Numbers compare by value across representations. Sequences equal lists
/// element by element, sets equal lists holding the same members, and
/// mappings equal maps with the same keys and equal entries.
pub fn equals(value: Value<'_>, criterion: &Criterion) -> bool {
    match (value, criterion) {
        (Value::Null, Criterion::Null) => true,
        (Value::Bool(a), Criterion::Bool(b)) => a == *b,
        (Value::Number(a), Criterion::Number(b)) => a.compare(*b) == Some(Ordering::Equal),
        (Value::String(a), Criterion::String(b)) => a == b,
        (Value::Bytes(a), Criterion::Bytes(b)) => a == b.as_slice(),
        (Value::Node(node), Criterion::List(items)) => match node.shape() {
            Shape::Sequence => {
                let members = node.members();
                members.len() == items.len()
                    && members.iter().zip(items).all(|(m, c)| equals(*m, c))
            }
            Shape::Set => {
                let members = node.members();
                members.len() == items.len()
                    && members.iter().all(|m| items.iter().any(|c| equals(*m, c)))
                    && items.iter().all(|c| members.iter().any(|m| equals(*m, c)))
            }
            _ => false,
        },
        (Value::Node(node), Criterion::Map(map)) if node.shape() == Shape::Mapping => {
            let keys = node.members();
            keys.len() == map.len()
                && map.iter().all(|(key, expected)| {
                    node.item(&Key::Name(key.clone()))
                        .is_some_and(|actual| equals(actual, expected))
                })
        }
        _ => false,
    }
}

/// Orders a resolved value against a criterion for the operator `op`.
///
/// Returns `Ok(None)` when both sides are numbers but unordered (NaN).
/// Sequences order lexicographically against lists.
pub fn order(
    op: &'static str,
    value: Value<'_>,
    criterion: &Criterion,
) -> Result<Option<Ordering>> {
    match (value, criterion) {
        (Value::Number(a), Criterion::Number(b)) => Ok(a.compare(*b)),
        (Value::String(a), Criterion::String(b)) => Ok(Some(a.cmp(b.as_str()))),
        (Value::Bytes(a), Criterion::Bytes(b)) => Ok(Some(a.cmp(b.as_slice()))),
        (Value::Bool(a), Criterion::Bool(b)) => Ok(Some(a.cmp(b))),
        (Value::Node(node), Criterion::List(items)) if node.shape() == Shape::Sequence => {
            let members = node.members();
            for (member, item) in members.iter().zip(items) {
                if equals(*member, item) {
                    continue;
                }
                return order(op, *member, item);
            }
            Ok(Some(members.len().cmp(&items.len())))
        }
        _ => Err(QueryError::Incomparable {
            op,
            left: value.kind(),
            right: criterion.kind(),
        }),
    }
}

/// Membership of the resolved value in the criterion.
///
/// Lists test their elements, maps test their keys, and strings and byte
/// strings test for a substring.
pub fn member_of(value: Value<'_>, criterion: &Criterion) -> Result<bool> {
    const OP: &str = "in";
    match criterion {
        Criterion::List(items) => Ok(items.iter().any(|item| equals(value, item))),
        Criterion::Map(map) => Ok(value.as_str().is_some_and(|key| map.contains_key(key))),
        Criterion::String(haystack) => match value {
            Value::String(needle) => Ok(haystack.contains(needle)),
            other => Err(QueryError::TypeMismatch {
                op: OP,
                expected: "a string",
                actual: other.kind(),
            }),
        },
        Criterion::Bytes(haystack) => match value {
            Value::Bytes(needle) => Ok(contains_slice(haystack, needle)),
            other => Err(QueryError::TypeMismatch {
                op: OP,
                expected: "bytes",
                actual: other.kind(),
            }),
        },
        other => Err(QueryError::NotAContainer {
            op: OP,
            kind: other.kind(),
        }),
    }
}

/// Membership of the criterion in the resolved value.
pub fn contains(value: Value<'_>, criterion: &Criterion) -> Result<bool> {
    const OP: &str = "contains";
    match value {
        Value::String(haystack) => match criterion {
            Criterion::String(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(QueryError::TypeMismatch {
                op: OP,
                expected: "a string",
                actual: other.kind(),
            }),
        },
        Value::Bytes(haystack) => match criterion {
            Criterion::Bytes(needle) => Ok(contains_slice(haystack, needle)),
            other => Err(QueryError::TypeMismatch {
                op: OP,
                expected: "bytes",
                actual: other.kind(),
            }),
        },
        Value::Node(node) if node.shape().is_container() => Ok(node
            .members()
            .into_iter()
            .any(|member| equals(member, criterion))),
        other => Err(QueryError::NotAContainer {
            op: OP,
            kind: other.kind(),
        }),
    }
}

/// Identity between a resolved value and a criterion.
///
/// Only null, booleans and numbers of the same representation can be
/// identical. Strings, byte strings and nodes are borrowed from the record
/// and never share identity with an owned criterion.
pub fn identical(value: Value<'_>, criterion: &Criterion) -> bool {
    match (value, criterion) {
        (Value::Null, Criterion::Null) => true,
        (Value::Bool(a), Criterion::Bool(b)) => a == *b,
        (Value::Number(a), Criterion::Number(b)) => a.identical(*b),
        _ => false,
    }
}

fn contains_slice(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queryable::Queryable;
    use crate::value::Number;
    use serde_json::json;
    use std::collections::{BTreeMap, BTreeSet};

    fn num(n: i64) -> Value<'static> {
        Value::Number(Number::I64(n))
    }

    #[test]
    fn scalar_equality() {
        assert!(equals(num(3), &Criterion::from(3.0)));
        assert!(equals(Value::String("CA"), &Criterion::from("CA")));
        assert!(equals(Value::Null, &Criterion::Null));
        assert!(!equals(Value::Null, &Criterion::from(0)));
        assert!(!equals(Value::Bool(true), &Criterion::from(1)));
        assert!(!equals(Value::String("1"), &Criterion::from(1)));
        assert!(!equals(
            Value::Number(Number::F64(f64::NAN)),
            &Criterion::from(f64::NAN)
        ));
    }

    #[test]
    fn container_equality() {
        let seq = vec![1i64, 2, 3];
        assert!(equals(seq.to_value(), &Criterion::from(vec![1, 2, 3])));
        assert!(!equals(seq.to_value(), &Criterion::from(vec![3, 2, 1])));

        let set: BTreeSet<i64> = [1, 2].into();
        assert!(equals(set.to_value(), &Criterion::from(vec![2, 1])));
        assert!(!equals(set.to_value(), &Criterion::from(vec![2, 2])));

        let doc = json!({"a": 1, "b": [true]});
        assert!(equals(doc.to_value(), &Criterion::from(json!({"b": [true], "a": 1}))));
        assert!(!equals(doc.to_value(), &Criterion::from(json!({"a": 1}))));
    }

    #[test]
    fn ordering_same_kind() {
        assert_eq!(order("lt", num(3), &Criterion::from(10)).unwrap(), Some(Ordering::Less));
        assert_eq!(
            order("gt", Value::String("b"), &Criterion::from("a")).unwrap(),
            Some(Ordering::Greater)
        );
        assert_eq!(
            order("lt", Value::Number(Number::F64(f64::NAN)), &Criterion::from(1)).unwrap(),
            None
        );
    }

    #[test]
    fn ordering_sequences_lexicographically() {
        let seq = vec![1i64, 2];
        assert_eq!(
            order("lt", seq.to_value(), &Criterion::from(vec![1, 3])).unwrap(),
            Some(Ordering::Less)
        );
        assert_eq!(
            order("lt", seq.to_value(), &Criterion::from(vec![1, 2, 0])).unwrap(),
            Some(Ordering::Less)
        );
        assert_eq!(
            order("gte", seq.to_value(), &Criterion::from(vec![1, 2])).unwrap(),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn ordering_across_kinds_fails() {
        let err = order("lt", Value::String("5"), &Criterion::from(3)).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Incomparable { op: "lt", left: "string", right: "number" }
        ));
        assert!(order("gt", Value::Null, &Criterion::Null).is_err());
    }

    #[test]
    fn membership_in_criterion() {
        assert!(member_of(num(2), &Criterion::from(vec![1, 2])).unwrap());
        assert!(!member_of(num(5), &Criterion::from(vec![1, 2])).unwrap());
        let post_code = Criterion::from("92415-241024-01152");
        assert!(member_of(Value::String("241024"), &post_code).unwrap());

        let map: BTreeMap<String, i64> = [("k".to_string(), 1)].into();
        assert!(member_of(Value::String("k"), &Criterion::from(map.clone())).unwrap());
        assert!(!member_of(num(1), &Criterion::from(map)).unwrap());

        assert!(matches!(
            member_of(num(1), &Criterion::from("123")),
            Err(QueryError::TypeMismatch { op: "in", .. })
        ));
        assert!(matches!(
            member_of(num(1), &Criterion::from(3)),
            Err(QueryError::NotAContainer { op: "in", kind: "number" })
        ));
    }

    #[test]
    fn containment_in_value() {
        let primes = vec![2i64, 3, 5, 7];
        assert!(contains(primes.to_value(), &Criterion::from(2)).unwrap());
        assert!(!contains(primes.to_value(), &Criterion::from(4)).unwrap());

        let doc = json!({"x": 1});
        assert!(contains(doc.to_value(), &Criterion::from("x")).unwrap());

        assert!(contains(Value::String("hello"), &Criterion::from("ell")).unwrap());
        assert!(contains(Value::Bytes(b"hello"), &Criterion::bytes(&b"ll"[..])).unwrap());
        assert!(contains(Value::Bytes(b"hello"), &Criterion::bytes(Vec::new())).unwrap());

        assert!(matches!(
            contains(Value::String("hello"), &Criterion::from(1)),
            Err(QueryError::TypeMismatch { op: "contains", .. })
        ));
        assert!(matches!(
            contains(num(12), &Criterion::from(1)),
            Err(QueryError::NotAContainer { op: "contains", kind: "number" })
        ));
    }

    #[test]
    fn identity() {
        assert!(identical(Value::Null, &Criterion::Null));
        assert!(identical(Value::Bool(true), &Criterion::from(true)));
        assert!(identical(num(1), &Criterion::from(1u8)));
        assert!(!identical(num(1), &Criterion::from(1.0)));
        assert!(!identical(Value::Bool(true), &Criterion::from(1)));
        assert!(!identical(Value::String("a"), &Criterion::from("a")));
    }
}
