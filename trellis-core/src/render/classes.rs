//! Class Values
//!
//! The values accepted by the `class` and `className` props. See
//! [`resolve_class`](super::resolve_class) for how they turn into a set of
//! active class names.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::child::Child;
use crate::reactive::Signal;

/// A function producing a class value.
pub type ClassesFn = Arc<dyn Fn() -> Classes + Send + Sync>;

/// A value resolving to a set of class names.
#[derive(Clone, Default)]
pub enum Classes {
    /// No classes.
    #[default]
    None,
    /// Whitespace-separated class names.
    Str(String),
    /// A function read for its current value.
    Accessor(ClassesFn),
    /// Class name to a (possibly reactive) truthy-or-falsy toggle.
    Map(IndexMap<String, Child>),
    /// Any mix of the above.
    Array(Vec<Classes>),
}

impl Classes {
    pub fn accessor<F>(f: F) -> Self
    where
        F: Fn() -> Classes + Send + Sync + 'static,
    {
        Self::Accessor(Arc::new(f))
    }

    /// A toggle map, in the given order.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Child>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    /// Whether resolving this value can never read anything reactive.
    pub fn is_static(&self) -> bool {
        match self {
            Self::None | Self::Str(_) => true,
            Self::Accessor(_) => false,
            Self::Map(map) => map.values().all(|value| !matches!(value, Child::Function(_))),
            Self::Array(items) => items.iter().all(Classes::is_static),
        }
    }
}

impl fmt::Debug for Classes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Accessor(_) => f.write_str("Accessor(..)"),
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
        }
    }
}

impl From<&str> for Classes {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Classes {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Classes>> for Classes {
    fn from(value: Vec<Classes>) -> Self {
        Self::Array(value)
    }
}

impl<T> From<Option<T>> for Classes
where
    T: Into<Classes>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<Signal<String>> for Classes {
    fn from(signal: Signal<String>) -> Self {
        Self::accessor(move || Classes::Str(signal.get()))
    }
}
