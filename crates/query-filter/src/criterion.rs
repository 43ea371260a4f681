//! Owned comparison operands.
//!
//! Unlike [`Value`](crate::Value), which borrows from the record being
//! inspected, a [`Criterion`] owns its data so predicates can hold it.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::Number;

/// Owned value a resolved field is compared against.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Ordered list, also used as a membership container.
    List(Vec<Criterion>),
    /// String-keyed map.
    Map(BTreeMap<String, Criterion>),
}

impl Criterion {
    /// Builds a byte-string criterion.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Criterion::Bytes(bytes.into())
    }

    /// Returns the kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Criterion::Null => "null",
            Criterion::Bool(_) => "bool",
            Criterion::Number(_) => "number",
            Criterion::String(_) => "string",
            Criterion::Bytes(_) => "bytes",
            Criterion::List(_) => "list",
            Criterion::Map(_) => "map",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Null => f.write_str("null"),
            Criterion::Bool(b) => write!(f, "{b}"),
            Criterion::Number(Number::I64(n)) => write!(f, "{n}"),
            Criterion::Number(Number::U64(n)) => write!(f, "{n}"),
            Criterion::Number(Number::F64(n)) => write!(f, "{n}"),
            Criterion::String(s) => write!(f, "{s:?}"),
            Criterion::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Criterion::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Criterion::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// Conversions from common types to Criterion

impl From<String> for Criterion {
    fn from(s: String) -> Self {
        Criterion::String(s)
    }
}

impl From<&str> for Criterion {
    fn from(s: &str) -> Self {
        Criterion::String(s.to_string())
    }
}

impl From<&String> for Criterion {
    fn from(s: &String) -> Self {
        Criterion::String(s.clone())
    }
}

impl From<bool> for Criterion {
    fn from(b: bool) -> Self {
        Criterion::Bool(b)
    }
}

impl From<Number> for Criterion {
    fn from(n: Number) -> Self {
        Criterion::Number(n)
    }
}

impl From<()> for Criterion {
    fn from(_: ()) -> Self {
        Criterion::Null
    }
}

macro_rules! criterion_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Criterion {
                fn from(n: $ty) -> Self {
                    Criterion::Number(Number::from(n))
                }
            }
        )*
    };
}

criterion_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<Criterion>> From<Option<T>> for Criterion {
    fn from(value: Option<T>) -> Self {
        value.map_or(Criterion::Null, Into::into)
    }
}

impl<T: Into<Criterion>> From<Vec<T>> for Criterion {
    fn from(items: Vec<T>) -> Self {
        Criterion::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Criterion>, const N: usize> From<[T; N]> for Criterion {
    fn from(items: [T; N]) -> Self {
        Criterion::List(items.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Criterion>> From<BTreeMap<String, V>> for Criterion {
    fn from(map: BTreeMap<String, V>) -> Self {
        Criterion::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_bytes::ByteBuf> for Criterion {
    fn from(bytes: serde_bytes::ByteBuf) -> Self {
        Criterion::Bytes(bytes.into_vec())
    }
}

impl From<serde_json::Value> for Criterion {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Criterion::Null,
            serde_json::Value::Bool(b) => Criterion::Bool(b),
            serde_json::Value::Number(n) => Criterion::Number(Number::from(&n)),
            serde_json::Value::String(s) => Criterion::String(s),
            serde_json::Value::Array(items) => {
                Criterion::List(items.into_iter().map(Criterion::from).collect())
            }
            serde_json::Value::Object(map) => Criterion::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Criterion::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Criterion {
    fn from(value: &serde_json::Value) -> Self {
        Criterion::from(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn criterion_conversions() {
        assert_eq!(Criterion::from("a"), Criterion::String("a".into()));
        assert_eq!(Criterion::from(3u8), Criterion::Number(Number::U64(3)));
        assert_eq!(Criterion::from(None::<i32>), Criterion::Null);
        assert_eq!(Criterion::from(Some(true)), Criterion::Bool(true));
        assert_eq!(
            Criterion::from(vec![1, 2]),
            Criterion::List(vec![Criterion::from(1), Criterion::from(2)])
        );
        assert_eq!(Criterion::bytes(&b"ab"[..]), Criterion::Bytes(vec![b'a', b'b']));
        assert_eq!(
            Criterion::from(serde_bytes::ByteBuf::from(vec![1u8])),
            Criterion::Bytes(vec![1])
        );
    }

    #[test]
    fn criterion_from_json() {
        let criterion = Criterion::from(json!({"a": [1, "x", null]}));
        let Criterion::Map(map) = criterion else {
            panic!("expected a map");
        };
        assert_eq!(
            map["a"],
            Criterion::List(vec![
                Criterion::Number(Number::I64(1)),
                Criterion::String("x".into()),
                Criterion::Null,
            ])
        );
    }

    #[test]
    fn criterion_display() {
        assert_eq!(Criterion::from(3).to_string(), "3");
        assert_eq!(Criterion::from("CA").to_string(), "\"CA\"");
        assert_eq!(Criterion::from(vec!["a", "b"]).to_string(), "[\"a\", \"b\"]");
        assert_eq!(Criterion::Null.to_string(), "null");
    }
}
