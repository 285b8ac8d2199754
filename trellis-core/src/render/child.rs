//! Child Values
//!
//! A [`Child`] is anything that can be rendered into a DOM position: nothing,
//! a primitive, a node, a list of children, or a function producing a child.
//!
//! Functions come in four flavours, see [`Accessor`]. The flavour replaces
//! the hidden markers a dynamic host would attach to function objects.

use std::fmt;
use std::sync::Arc;

use crate::dom::{number_to_string, Node};
use crate::reactive::Signal;

/// A function producing a child.
pub type ChildFn = Arc<dyn Fn() -> Child + Send + Sync>;

/// A function producing a child, tagged with how the renderer may treat it.
#[derive(Clone)]
pub enum Accessor {
    /// A plain deferred child, such as a render thunk. Resolved inside a
    /// reaction, but not counted as an observable inside arrays.
    Thunk(ChildFn),
    /// A reactive read. Resolved inside a reaction.
    Observable(ChildFn),
    /// Observable-shaped but known never to change. Read once.
    Frozen(ChildFn),
    /// Already unwrapped without tracking. Read once.
    Untracked(ChildFn),
}

impl Accessor {
    /// Invoke the function.
    pub fn call(&self) -> Child {
        match self {
            Self::Thunk(f) | Self::Observable(f) | Self::Frozen(f) | Self::Untracked(f) => f(),
        }
    }

    /// Whether this is an observable (live or frozen) rather than a plain
    /// function.
    pub fn is_observable(&self) -> bool {
        matches!(self, Self::Observable(_) | Self::Frozen(_))
    }

    /// Whether a single read is enough, no subscription needed.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Frozen(_) | Self::Untracked(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Thunk(_) => "Thunk",
            Self::Observable(_) => "Observable",
            Self::Frozen(_) => "Frozen",
            Self::Untracked(_) => "Untracked",
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(..)", self.kind())
    }
}

/// An ordered list of children.
///
/// `uncached` marks a list that downstream consumers must never memoize or
/// reuse across renders.
#[derive(Clone, Debug)]
pub struct ChildArray {
    pub items: Arc<[Child]>,
    pub uncached: bool,
}

impl ChildArray {
    pub fn new(items: impl Into<Arc<[Child]>>) -> Self {
        Self {
            items: items.into(),
            uncached: false,
        }
    }

    pub fn uncached(items: impl Into<Arc<[Child]>>) -> Self {
        Self {
            items: items.into(),
            uncached: true,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Child> {
        self.items.iter()
    }
}

/// Something that can be rendered.
#[derive(Clone, Debug, Default)]
pub enum Child {
    /// null / undefined. Renders nothing.
    #[default]
    Void,
    /// Renders nothing.
    Bool(bool),
    Number(f64),
    BigInt(i128),
    Text(String),
    /// An opaque symbol. Renders nothing.
    Symbol(Arc<str>),
    Node(Node),
    Array(ChildArray),
    Function(Accessor),
}

impl Child {
    /// A reactive child read through `f`.
    pub fn observable<F>(f: F) -> Self
    where
        F: Fn() -> Child + Send + Sync + 'static,
    {
        Self::Function(Accessor::Observable(Arc::new(f)))
    }

    /// A plain deferred child.
    pub fn thunk<F>(f: F) -> Self
    where
        F: Fn() -> Child + Send + Sync + 'static,
    {
        Self::Function(Accessor::Thunk(Arc::new(f)))
    }

    /// An observable-shaped child that never changes.
    pub fn frozen<F>(f: F) -> Self
    where
        F: Fn() -> Child + Send + Sync + 'static,
    {
        Self::Function(Accessor::Frozen(Arc::new(f)))
    }

    /// A function whose reads are already untracked.
    pub fn untracked<F>(f: F) -> Self
    where
        F: Fn() -> Child + Send + Sync + 'static,
    {
        Self::Function(Accessor::Untracked(Arc::new(f)))
    }

    /// A list that must never be memoized downstream.
    pub fn uncached(items: Vec<Child>) -> Self {
        Self::Array(ChildArray::uncached(items))
    }

    pub fn symbol(name: &str) -> Self {
        Self::Symbol(Arc::from(name))
    }

    /// `Void`. Named after the host value it stands for.
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Children that render nothing: nil, booleans and symbols.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void | Self::Bool(_) | Self::Symbol(_))
    }

    /// Strings, numbers and bigints, which render as text nodes.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Number(_) | Self::BigInt(_))
    }

    /// Host truthiness: `0`, `-0`, `NaN`, `0n`, `""`, `false` and nil are
    /// falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Void => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::BigInt(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
            Self::Symbol(_) | Self::Node(_) | Self::Array(_) | Self::Function(_) => true,
        }
    }

    /// The text a primitive renders as.
    pub fn primitive_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(number_to_string(*n)),
            Self::BigInt(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ChildArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl From<()> for Child {
    fn from(_: ()) -> Self {
        Self::Void
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

macro_rules! number_child {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

number_child!(f64, f32, i32, i64, u32, u64, usize);

impl From<i128> for Child {
    fn from(value: i128) -> Self {
        Self::BigInt(value)
    }
}

impl From<Node> for Child {
    fn from(value: Node) -> Self {
        Self::Node(value)
    }
}

impl From<Vec<Child>> for Child {
    fn from(value: Vec<Child>) -> Self {
        Self::Array(ChildArray::new(value))
    }
}

impl From<ChildArray> for Child {
    fn from(value: ChildArray) -> Self {
        Self::Array(value)
    }
}

impl<T> From<Option<T>> for Child
where
    T: Into<Child>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// A signal is an observable child that reads its current value.
impl<T> From<Signal<T>> for Child
where
    T: Clone + Into<Child> + Send + Sync + 'static,
{
    fn from(signal: Signal<T>) -> Self {
        Self::observable(move || signal.get().into())
    }
}
