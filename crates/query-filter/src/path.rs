//! Lookup paths and their resolution against a root record.
//!
//! A [`Path`] is an ordered list of [`Lookup`] steps. Resolving it either
//! lands on a [`Value`] or fails with [`NotFound`]; there is no partial
//! result. Failures of every kind (missing attribute, missing key, index out
//! of range, lookup on a scalar) look the same to the caller.

use std::fmt;

use log::trace;
use thiserror::Error;

use crate::queryable::{normalize_index, Queryable};
use crate::value::{Number, Value};

/// Item key: a mapping key or a sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Mapping key.
    Name(String),
    /// Sequence index. Negative values count from the end.
    Index(i64),
}

impl Key {
    /// Returns the key as a mapping key, if it is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    /// Returns the key as a sequence index, if it is one.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{name:?}"),
            Key::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

macro_rules! key_from_index {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key {
                fn from(i: $ty) -> Self {
                    Key::Index(i64::from(i))
                }
            }
        )*
    };
}

key_from_index!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

/// Which accessor a lookup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// Named attribute of an object.
    Attr,
    /// Keyed or indexed item of a container.
    Item,
}

impl LookupKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            LookupKind::Attr => "attr",
            LookupKind::Item => "item",
        }
    }
}

/// One resolution step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Read a named attribute.
    Attr(String),
    /// Read an item by key or index.
    Item(Key),
}

impl Lookup {
    /// Creates an attribute lookup.
    pub fn attr(name: impl Into<String>) -> Self {
        Lookup::Attr(name.into())
    }

    /// Creates an item lookup.
    pub fn item(key: impl Into<Key>) -> Self {
        Lookup::Item(key.into())
    }

    /// Creates a lookup of the given kind with a string key.
    pub fn named(kind: LookupKind, name: impl Into<String>) -> Self {
        match kind {
            LookupKind::Attr => Lookup::Attr(name.into()),
            LookupKind::Item => Lookup::Item(Key::Name(name.into())),
        }
    }

    /// Returns the discriminator of this lookup.
    pub fn kind(&self) -> LookupKind {
        match self {
            Lookup::Attr(_) => LookupKind::Attr,
            Lookup::Item(_) => LookupKind::Item,
        }
    }

    /// Applies this step to a value.
    pub fn apply<'a>(&self, value: Value<'a>) -> Option<Value<'a>> {
        match (self, value) {
            (Lookup::Attr(name), Value::Node(node)) => node.attr(name),
            (Lookup::Item(key), Value::Node(node)) => node.item(key),
            (Lookup::Item(Key::Index(i)), Value::String(s)) => char_at(s, *i).map(Value::String),
            (Lookup::Item(Key::Index(i)), Value::Bytes(b)) => {
                let index = normalize_index(*i, b.len())?;
                Some(Value::Number(Number::from(b[index])))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Attr(name) => write!(f, ".{name}"),
            Lookup::Item(key) => write!(f, "[{key}]"),
        }
    }
}

/// The character at a (possibly negative) position, as a string slice.
fn char_at(s: &str, index: i64) -> Option<&str> {
    let count = s.chars().count();
    let index = normalize_index(index, count)?;
    let (start, c) = s.char_indices().nth(index)?;
    Some(&s[start..start + c.len_utf8()])
}

/// Resolution failed at the step with index `depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no value found at lookup {depth}")]
pub struct NotFound {
    /// Index of the first lookup that could not be resolved.
    pub depth: usize,
}

/// An ordered sequence of lookups, applied left to right.
///
/// # Example
///
/// ```
/// use query_filter::{Path, Value, Number};
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": [10, 20]}});
/// let path = Path::root().item("a").item("b").item(-1);
///
/// assert_eq!(path.resolve(&doc), Ok(Value::Number(Number::I64(20))));
/// assert!(Path::root().item("x").resolve(&doc).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    lookups: Vec<Lookup>,
}

impl Path {
    /// The empty path. Resolves to the root itself.
    pub fn root() -> Self {
        Path::default()
    }

    /// Builds a path of string-keyed lookups of one kind.
    pub fn from_names<I, S>(kind: LookupKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| Lookup::named(kind, name))
            .collect()
    }

    /// Returns a new path with `lookup` appended.
    pub fn child(&self, lookup: Lookup) -> Self {
        let mut lookups = self.lookups.clone();
        lookups.push(lookup);
        Path { lookups }
    }

    /// Returns a new path extended by an attribute lookup.
    pub fn attr(&self, name: impl Into<String>) -> Self {
        self.child(Lookup::attr(name))
    }

    /// Returns a new path extended by an item lookup.
    pub fn item(&self, key: impl Into<Key>) -> Self {
        self.child(Lookup::item(key))
    }

    /// The path without its last lookup, or `None` for the empty path.
    pub fn parent(&self) -> Option<Path> {
        let (_, rest) = self.lookups.split_last()?;
        Some(Path {
            lookups: rest.to_vec(),
        })
    }

    /// The last lookup, if any.
    pub fn last(&self) -> Option<&Lookup> {
        self.lookups.last()
    }

    /// The lookups, in order.
    pub fn lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    /// Number of lookups.
    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    /// Returns `true` for the empty path.
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Resolves this path against `root`.
    ///
    /// Never mutates `root`. Any step that cannot be taken yields
    /// [`NotFound`].
    pub fn resolve<'a>(&self, root: &'a dyn Queryable) -> Result<Value<'a>, NotFound> {
        let mut current = root.to_value();
        for (depth, lookup) in self.lookups.iter().enumerate() {
            current = match lookup.apply(current) {
                Some(next) => next,
                None => {
                    trace!("path {self}: {lookup} not found on {} value", current.kind());
                    return Err(NotFound { depth });
                }
            };
        }
        Ok(current)
    }
}

impl FromIterator<Lookup> for Path {
    fn from_iter<I: IntoIterator<Item = Lookup>>(iter: I) -> Self {
        Path {
            lookups: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Lookup>> for Path {
    fn from(lookups: Vec<Lookup>) -> Self {
        Path { lookups }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lookups.is_empty() {
            return f.write_str("<root>");
        }
        for lookup in &self.lookups {
            write!(f, "{lookup}")?;
        }
        Ok(())
    }
}
