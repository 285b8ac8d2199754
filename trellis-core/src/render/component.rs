//! Components
//!
//! The four things [`create_element`](super::create_element) knows how to
//! render, and the [`Element`] render thunk it hands back.

use std::fmt;
use std::sync::Arc;

use super::child::{Accessor, Child};
use super::props::Props;
use crate::dom::Node;

/// A class component instance.
///
/// Constructed from props for every render; `render` produces its child.
pub trait ComponentClass: Send + Sync + 'static {
    fn render(&self) -> Child;
}

/// Builds a class component instance from props.
pub type ComponentConstructor = Arc<dyn Fn(Props) -> Arc<dyn ComponentClass> + Send + Sync>;

/// A function component.
pub type ComponentFn = Arc<dyn Fn(Props) -> Child + Send + Sync>;

/// Something that can be rendered by [`create_element`](super::create_element).
#[derive(Clone)]
pub enum Component {
    /// A class component. The ref, if any, receives the instance.
    Class(ComponentConstructor),
    /// A function component. The ref, if any, is passed along in its props.
    Function(ComponentFn),
    /// An intrinsic element, by tag name.
    Intrinsic(String),
    /// An existing node, passed through untouched.
    Node(Node),
}

impl Component {
    /// A class component built by `construct`.
    pub fn class<C, F>(construct: F) -> Self
    where
        C: ComponentClass,
        F: Fn(Props) -> C + Send + Sync + 'static,
    {
        Self::Class(Arc::new(move |props| Arc::new(construct(props)) as Arc<dyn ComponentClass>))
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Props) -> Child + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    pub fn intrinsic(tag: impl Into<String>) -> Self {
        Self::Intrinsic(tag.into())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(_) => f.write_str("Class(..)"),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Intrinsic(tag) => f.debug_tuple("Intrinsic").field(tag).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
        }
    }
}

impl From<&str> for Component {
    fn from(tag: &str) -> Self {
        Self::Intrinsic(tag.to_owned())
    }
}

impl From<String> for Component {
    fn from(tag: String) -> Self {
        Self::Intrinsic(tag)
    }
}

impl From<Node> for Component {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

/// A deferred render of one component.
///
/// Nothing happens until [`Element::render`] is called, so a parent's setup
/// always runs before its children are instantiated.
#[derive(Clone)]
pub struct Element(Arc<dyn Fn() -> Child + Send + Sync>);

impl Element {
    pub(crate) fn new<F>(render: F) -> Self
    where
        F: Fn() -> Child + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    /// Perform the render.
    pub fn render(&self) -> Child {
        (self.0)()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Element(..)")
    }
}

/// An element placed as a child is a plain thunk: it renders when the
/// parent resolves it.
impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Function(Accessor::Thunk(element.0))
    }
}

/// Check that `tag` can name an element.
pub(crate) fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '.' || c == '_')
        }
        _ => false,
    }
}
