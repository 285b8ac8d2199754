//! Props
//!
//! The open set of properties passed to a component or intrinsic element.
//! `children`, `key` and `ref` are reserved: they are pulled out by
//! [`create_element`](super::create_element) and never applied as plain
//! attributes.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::child::Child;
use super::classes::Classes;
use super::component::ComponentClass;
use crate::dom::{Event, Listener, Node};

/// What a ref receives.
#[derive(Clone)]
pub enum RefTarget {
    /// The element created for an intrinsic tag.
    Node(Node),
    /// The instance created for a class component.
    Instance(Arc<dyn ComponentClass>),
}

impl RefTarget {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Instance(_) => None,
        }
    }
}

impl fmt::Debug for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

/// A ref callback. Receives the target when bound and `None` on cleanup.
pub type Ref = Arc<dyn Fn(Option<RefTarget>) + Send + Sync>;

/// Properties for a component or element.
#[derive(Clone, Default)]
pub struct Props {
    pub children: Option<Child>,
    pub key: Option<String>,
    pub r#ref: Option<Ref>,
    pub class: Option<Classes>,
    pub class_name: Option<Classes>,
    pub attributes: IndexMap<String, Child>,
    pub listeners: IndexMap<String, Listener>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(mut self, children: impl Into<Child>) -> Self {
        self.children = Some(children.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_ref<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<RefTarget>) + Send + Sync + 'static,
    {
        self.r#ref = Some(Arc::new(f));
        self
    }

    pub fn class(mut self, class: impl Into<Classes>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<Classes>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set an attribute. Reactive values are kept in sync.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Child>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add an event listener.
    pub fn on<F>(mut self, event: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.listeners.insert(event.into(), Arc::new(f));
        self
    }

    /// Read an attribute passed to a function component.
    pub fn get(&self, name: &str) -> Option<&Child> {
        self.attributes.get(name)
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("children", &self.children)
            .field("key", &self.key)
            .field("ref", &self.r#ref.is_some())
            .field("class", &self.class)
            .field("class_name", &self.class_name)
            .field("attributes", &self.attributes)
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}
