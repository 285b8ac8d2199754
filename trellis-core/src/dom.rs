//! In-Memory DOM
//!
//! A small, thread-safe document model that the renderer writes into. It
//! has exactly what the resolvers and setters need: elements with
//! attributes, a class list and listeners; text nodes; comment nodes used
//! as position placeholders.
//!
//! [`Node`] is a cheap handle. Cloning it clones the handle, not the node,
//! and equality is identity.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;

/// A DOM event as seen by listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An event listener.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

struct ElementData {
    tag: String,
    attributes: RwLock<IndexMap<String, String>>,
    classes: RwLock<IndexSet<String>>,
    listeners: RwLock<IndexMap<String, Vec<Listener>>>,
}

enum Kind {
    Element(ElementData),
    Text(RwLock<String>),
    Comment(RwLock<String>),
}

struct Inner {
    kind: Kind,
    children: RwLock<Vec<Node>>,
    parent: RwLock<Weak<Inner>>,
}

/// A handle to a DOM node.
#[derive(Clone)]
pub struct Node(Arc<Inner>);

impl Node {
    fn from_kind(kind: Kind) -> Self {
        Self(Arc::new(Inner {
            kind,
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
        }))
    }

    /// Create a detached element.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::from_kind(Kind::Element(ElementData {
            tag: tag.into(),
            attributes: RwLock::new(IndexMap::new()),
            classes: RwLock::new(IndexSet::new()),
            listeners: RwLock::new(IndexMap::new()),
        }))
    }

    /// Create a detached text node.
    pub fn text(data: impl Into<String>) -> Self {
        Self::from_kind(Kind::Text(RwLock::new(data.into())))
    }

    /// Create a detached comment node.
    pub fn comment(data: impl Into<String>) -> Self {
        Self::from_kind(Kind::Comment(RwLock::new(data.into())))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.kind, Kind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.kind, Kind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.0.kind, Kind::Comment(_))
    }

    /// The tag name, for elements.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.0.kind {
            Kind::Element(data) => Some(&data.tag),
            _ => None,
        }
    }

    /// The character data, for text and comment nodes.
    pub fn text_data(&self) -> Option<String> {
        match &self.0.kind {
            Kind::Text(data) | Kind::Comment(data) => Some(data.read().clone()),
            Kind::Element(_) => None,
        }
    }

    /// Replace the character data of a text or comment node.
    ///
    /// Returns `false` (and does nothing) for elements.
    pub fn set_text_data(&self, value: impl Into<String>) -> bool {
        match &self.0.kind {
            Kind::Text(data) | Kind::Comment(data) => {
                *data.write() = value.into();
                true
            }
            Kind::Element(_) => false,
        }
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    pub fn parent(&self) -> Option<Node> {
        self.0.parent.read().upgrade().map(Node)
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.children.read().clone()
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.0.children.read().get(index).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.read().len()
    }

    fn set_parent(&self, parent: Option<&Node>) {
        *self.0.parent.write() = parent.map(|p| Arc::downgrade(&p.0)).unwrap_or_default();
    }

    /// Append `child`, moving it out of its current parent first.
    pub fn append_child(&self, child: &Node) {
        child.remove();
        self.0.children.write().push(child.clone());
        child.set_parent(Some(self));
    }

    /// Insert `child` before `reference`, or append when `reference` is
    /// `None` or not a child of this node.
    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) {
        child.remove();
        {
            let mut children = self.0.children.write();
            let index = reference
                .and_then(|r| children.iter().position(|c| c == r))
                .unwrap_or(children.len());
            children.insert(index, child.clone());
        }
        child.set_parent(Some(self));
    }

    /// Remove `child` from this node. Returns whether it was a child.
    pub fn remove_child(&self, child: &Node) -> bool {
        let removed = {
            let mut children = self.0.children.write();
            match children.iter().position(|c| c == child) {
                Some(index) => {
                    children.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            child.set_parent(None);
        }
        removed
    }

    /// Detach this node from its parent, if any.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// Replace the contiguous run of `old` children with `new`.
    ///
    /// The new nodes take the position of the first old node that is still
    /// a child; if none is, they are appended. Nodes present in both lists
    /// are moved rather than removed, so reusing a node is safe.
    pub fn replace_nodes(&self, old: &[Node], new: &[Node]) {
        for node in new {
            if node.parent().is_some_and(|p| p != *self) {
                node.remove();
            }
        }

        let dropped: Vec<Node> = {
            let mut children = self.0.children.write();
            let anchor = children.iter().position(|c| old.contains(c));
            let mut next = Vec::with_capacity(children.len() + new.len());
            let mut dropped = Vec::new();

            for (index, child) in children.iter().enumerate() {
                if Some(index) == anchor {
                    next.extend(new.iter().cloned());
                }
                if new.contains(child) {
                    continue;
                }
                if old.contains(child) {
                    dropped.push(child.clone());
                    continue;
                }
                next.push(child.clone());
            }
            if anchor.is_none() {
                next.extend(new.iter().cloned());
            }

            *children = next;
            dropped
        };

        for node in &dropped {
            node.set_parent(None);
        }
        for node in new {
            node.set_parent(Some(self));
        }
    }

    /// Deep copy of this node and its subtree. Listeners are not copied.
    pub fn clone_deep(&self) -> Node {
        let copy = match &self.0.kind {
            Kind::Element(data) => {
                let copy = Node::element(data.tag.clone());
                if let Kind::Element(target) = &copy.0.kind {
                    *target.attributes.write() = data.attributes.read().clone();
                    *target.classes.write() = data.classes.read().clone();
                }
                copy
            }
            Kind::Text(data) => Node::text(data.read().clone()),
            Kind::Comment(data) => Node::comment(data.read().clone()),
        };
        for child in self.children() {
            copy.append_child(&child.clone_deep());
        }
        copy
    }

    // ------------------------------------------------------------------
    // Attributes and classes
    // ------------------------------------------------------------------

    fn element_data(&self) -> Option<&ElementData> {
        match &self.0.kind {
            Kind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Read an attribute. `class` reflects the class list.
    pub fn attribute(&self, name: &str) -> Option<String> {
        let data = self.element_data()?;
        if name == "class" {
            let classes = data.classes.read();
            if classes.is_empty() {
                return None;
            }
            return Some(classes.iter().map(String::as_str).collect::<Vec<_>>().join(" "));
        }
        data.attributes.read().get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let Some(data) = self.element_data() else { return };
        let value = value.into();
        if name == "class" {
            *data.classes.write() = value.split_whitespace().map(str::to_owned).collect();
            return;
        }
        data.attributes.write().insert(name.to_owned(), value);
    }

    pub fn remove_attribute(&self, name: &str) {
        let Some(data) = self.element_data() else { return };
        if name == "class" {
            data.classes.write().clear();
            return;
        }
        data.attributes.write().shift_remove(name);
    }

    pub fn add_class(&self, class: &str) {
        if let Some(data) = self.element_data() {
            data.classes.write().insert(class.to_owned());
        }
    }

    pub fn remove_class(&self, class: &str) {
        if let Some(data) = self.element_data() {
            data.classes.write().shift_remove(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element_data()
            .is_some_and(|data| data.classes.read().contains(class))
    }

    /// The active classes, in insertion order.
    pub fn classes(&self) -> Vec<String> {
        self.element_data()
            .map(|data| data.classes.read().iter().cloned().collect())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(&self, name: &str, listener: Listener) {
        if let Some(data) = self.element_data() {
            data.listeners
                .write()
                .entry(name.to_owned())
                .or_default()
                .push(listener);
        }
    }

    /// Call every listener registered for the event's name.
    ///
    /// Returns how many listeners ran.
    pub fn dispatch_event(&self, event: &Event) -> usize {
        let listeners: Vec<Listener> = match self.element_data() {
            Some(data) => data.listeners.read().get(&event.name).cloned().unwrap_or_default(),
            None => return 0,
        };
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Concatenated text of this node and its descendants. Comments are
    /// skipped.
    pub fn text_content(&self) -> String {
        match &self.0.kind {
            Kind::Text(data) => data.read().clone(),
            Kind::Comment(_) => String::new(),
            Kind::Element(_) => self.children().iter().map(Node::text_content).collect(),
        }
    }

    /// Serialize this node as HTML.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Serialize the children of this node as HTML.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            child.write_html(&mut out);
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.0.kind {
            Kind::Text(data) => escape_into(out, &data.read(), false),
            Kind::Comment(data) => {
                out.push_str("<!--");
                out.push_str(&data.read());
                out.push_str("-->");
            }
            Kind::Element(data) => {
                out.push('<');
                out.push_str(&data.tag);
                if let Some(class) = self.attribute("class") {
                    out.push_str(" class=\"");
                    escape_into(out, &class, true);
                    out.push('"');
                }
                for (name, value) in data.attributes.read().iter() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(out, value, true);
                    out.push('"');
                }
                out.push('>');
                for child in self.children() {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            Kind::Element(data) => f
                .debug_struct("Element")
                .field("tag", &data.tag)
                .field("children", &self.child_count())
                .finish(),
            Kind::Text(data) => f.debug_tuple("Text").field(&*data.read()).finish(),
            Kind::Comment(data) => f.debug_tuple("Comment").field(&*data.read()).finish(),
        }
    }
}

/// Format a number the way a JavaScript host stringifies it.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if value == 0.0 {
        "0".to_owned()
    } else {
        value.to_string()
    }
}
