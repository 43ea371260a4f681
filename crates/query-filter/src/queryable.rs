//! The [`Queryable`] trait and its implementations for std and JSON types.
//!
//! Every root record handed to a filter, and every node a path walks
//! through, is a `Queryable`. Structs usually get their implementation from
//! `#[derive(Queryable)]`; containers and scalars are covered here.

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use crate::path::Key;
use crate::value::{Number, Shape, Value};

/// Trait for values that paths can walk through.
///
/// Only [`to_value`](Queryable::to_value) is required. The lookup methods
/// default to "not found", which is right for scalars.
///
/// # Manual Implementation
///
/// ```
/// use query_filter::{Queryable, Value};
///
/// struct Person {
///     name: String,
///     mother: Option<Box<Person>>,
/// }
///
/// impl Queryable for Person {
///     fn to_value(&self) -> Value<'_> {
///         Value::Node(self)
///     }
///
///     fn attr(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "name" => Some(self.name.to_value()),
///             "mother" => Some(self.mother.to_value()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Queryable {
    /// Returns the value comparisons see when a path ends on `self`.
    ///
    /// Scalars return themselves; anything with attributes, items or
    /// members returns `Value::Node(self)`.
    fn to_value(&self) -> Value<'_>;

    /// How this node answers membership tests.
    fn shape(&self) -> Shape {
        Shape::Object
    }

    /// Attribute lookup.
    fn attr(&self, _name: &str) -> Option<Value<'_>> {
        None
    }

    /// Item lookup by mapping key or sequence index.
    fn item(&self, _key: &Key) -> Option<Value<'_>> {
        None
    }

    /// Members for `in`/`contains`: elements of sequences and sets, keys
    /// of mappings. Empty for objects.
    fn members(&self) -> Vec<Value<'_>> {
        Vec::new()
    }
}

/// Maps a possibly negative index onto `0..len`.
pub(crate) fn normalize_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        let index = usize::try_from(index).ok()?;
        (index < len).then_some(index)
    } else {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)
    }
}

// ============================================================================
// Scalars
// ============================================================================

impl Queryable for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Queryable for () {
    fn to_value(&self) -> Value<'_> {
        Value::Null
    }
}

macro_rules! queryable_number {
    ($($ty:ty),*) => {
        $(
            impl Queryable for $ty {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

queryable_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Queryable for str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl Queryable for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl Queryable for Cow<'_, str> {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

// ============================================================================
// Byte strings
// ============================================================================

/// A `Vec<u8>` is a sequence of numbers; wrap it in a `ByteBuf` to compare
/// and match it as a byte string.
impl Queryable for serde_bytes::ByteBuf {
    fn to_value(&self) -> Value<'_> {
        Value::Bytes(self.as_slice())
    }
}

impl Queryable for serde_bytes::Bytes {
    fn to_value(&self) -> Value<'_> {
        Value::Bytes(self)
    }
}

// ============================================================================
// Wrappers
// ============================================================================

macro_rules! queryable_deref {
    ($($ptr:ident),*) => {
        $(
            impl<T: Queryable + ?Sized> Queryable for $ptr<T> {
                fn to_value(&self) -> Value<'_> {
                    (**self).to_value()
                }

                fn shape(&self) -> Shape {
                    (**self).shape()
                }

                fn attr(&self, name: &str) -> Option<Value<'_>> {
                    (**self).attr(name)
                }

                fn item(&self, key: &Key) -> Option<Value<'_>> {
                    (**self).item(key)
                }

                fn members(&self) -> Vec<Value<'_>> {
                    (**self).members()
                }
            }
        )*
    };
}

queryable_deref!(Box, Rc, Arc);

impl<T: Queryable + ?Sized> Queryable for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn attr(&self, name: &str) -> Option<Value<'_>> {
        (**self).attr(name)
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        (**self).item(key)
    }

    fn members(&self) -> Vec<Value<'_>> {
        (**self).members()
    }
}

/// `None` is a present null, so `is_none()` can see it.
impl<T: Queryable> Queryable for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn shape(&self) -> Shape {
        self.as_ref().map_or(Shape::Object, Queryable::shape)
    }

    fn attr(&self, name: &str) -> Option<Value<'_>> {
        self.as_ref()?.attr(name)
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        self.as_ref()?.item(key)
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.as_ref().map(Queryable::members).unwrap_or_default()
    }
}

// ============================================================================
// Sequences and sets
// ============================================================================

impl<T: Queryable> Queryable for Vec<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        let index = normalize_index(key.as_index()?, self.len())?;
        Some(self[index].to_value())
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.iter().map(Queryable::to_value).collect()
    }
}

impl<T: Queryable> Queryable for VecDeque<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        let index = normalize_index(key.as_index()?, self.len())?;
        self.get(index).map(Queryable::to_value)
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.iter().map(Queryable::to_value).collect()
    }
}

impl<T: Queryable, const N: usize> Queryable for [T; N] {
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        let index = normalize_index(key.as_index()?, N)?;
        Some(self[index].to_value())
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.iter().map(Queryable::to_value).collect()
    }
}

impl<T: Queryable, S: BuildHasher> Queryable for HashSet<T, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Set
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.iter().map(Queryable::to_value).collect()
    }
}

impl<T: Queryable> Queryable for BTreeSet<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Set
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.iter().map(Queryable::to_value).collect()
    }
}

// ============================================================================
// Mappings
// ============================================================================

/// Keys a mapping can be looked up by.
///
/// A [`Key::Name`] reaches string-keyed mappings and a [`Key::Index`]
/// reaches integer-keyed ones. Keys of one kind never match mappings keyed
/// by the other, and a negative index is a plain key, not a position.
pub trait MapKey: Queryable {
    /// Borrowed form the mapping is searched with.
    type Lookup: ?Sized;

    /// Runs `f` with `key` converted for lookup, or returns `None` when
    /// `key` cannot name an entry of this key type.
    fn with_lookup<R>(key: &Key, f: impl FnOnce(&Self::Lookup) -> R) -> Option<R>;
}

macro_rules! map_key_str {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                type Lookup = str;

                fn with_lookup<R>(key: &Key, f: impl FnOnce(&str) -> R) -> Option<R> {
                    key.as_name().map(f)
                }
            }
        )*
    };
}

map_key_str!(String, Box<str>, Rc<str>, Arc<str>, Cow<'_, str>);

impl MapKey for &str {
    type Lookup = str;

    fn with_lookup<R>(key: &Key, f: impl FnOnce(&str) -> R) -> Option<R> {
        key.as_name().map(f)
    }
}

macro_rules! map_key_int {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                type Lookup = $ty;

                fn with_lookup<R>(key: &Key, f: impl FnOnce(&$ty) -> R) -> Option<R> {
                    let index = <$ty>::try_from(key.as_index()?).ok()?;
                    Some(f(&index))
                }
            }
        )*
    };
}

map_key_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<K, V, S> Queryable for HashMap<K, V, S>
where
    K: MapKey + Borrow<K::Lookup> + Eq + Hash,
    K::Lookup: Eq + Hash,
    V: Queryable,
    S: BuildHasher,
{
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Mapping
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        K::with_lookup(key, |lookup| self.get(lookup))?.map(Queryable::to_value)
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.keys().map(Queryable::to_value).collect()
    }
}

impl<K, V> Queryable for BTreeMap<K, V>
where
    K: MapKey + Borrow<K::Lookup> + Ord,
    K::Lookup: Ord,
    V: Queryable,
{
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Mapping
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        K::with_lookup(key, |lookup| self.get(lookup))?.map(Queryable::to_value)
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.keys().map(Queryable::to_value).collect()
    }
}

// ============================================================================
// JSON
// ============================================================================

impl Queryable for serde_json::Value {
    fn to_value(&self) -> Value<'_> {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(Number::from(n)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Node(self),
        }
    }

    fn shape(&self) -> Shape {
        match self {
            serde_json::Value::Array(_) => Shape::Sequence,
            serde_json::Value::Object(_) => Shape::Mapping,
            _ => Shape::Object,
        }
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        match (self, key) {
            (serde_json::Value::Array(items), Key::Index(i)) => {
                let index = normalize_index(*i, items.len())?;
                Some(items[index].to_value())
            }
            (serde_json::Value::Object(map), Key::Name(name)) => {
                map.get(name).map(Queryable::to_value)
            }
            _ => None,
        }
    }

    fn members(&self) -> Vec<Value<'_>> {
        match self {
            serde_json::Value::Array(items) => items.iter().map(Queryable::to_value).collect(),
            serde_json::Value::Object(map) => map.keys().map(|k| Value::String(k)).collect(),
            _ => Vec::new(),
        }
    }
}

impl Queryable for serde_json::Map<String, serde_json::Value> {
    fn to_value(&self) -> Value<'_> {
        Value::Node(self)
    }

    fn shape(&self) -> Shape {
        Shape::Mapping
    }

    fn item(&self, key: &Key) -> Option<Value<'_>> {
        self.get(key.as_name()?).map(Queryable::to_value)
    }

    fn members(&self) -> Vec<Value<'_>> {
        self.keys().map(|k| Value::String(k)).collect()
    }
}
