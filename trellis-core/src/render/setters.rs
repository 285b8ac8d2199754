//! Prop Setters
//!
//! Apply props to a freshly created element. Children go through
//! [`resolve_child`] into a [`FragmentSlot`]; classes through
//! [`resolve_class`]; reactive attributes get their own reaction. Every
//! update is narrow: a changed child replaces only the nodes of its own
//! slot, a changed class toggles only the names that differ.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::child::Child;
use super::classes::Classes;
use super::fragment::{Fragment, FragmentEntry, FragmentSlot};
use super::props::{Props, Ref, RefTarget};
use super::resolvers::{create_text, resolve_child, resolve_class, ResolvedClasses, Setter};
use crate::dom::Node;
use crate::reactive::{on_cleanup, use_reaction};

/// Apply every prop to `element`. `key` is never applied.
pub fn set_props(element: &Node, props: Props) {
    let Props {
        children,
        key: _,
        r#ref,
        class,
        class_name,
        attributes,
        listeners,
    } = props;

    if let Some(children) = children {
        set_child(element, children);
    }
    // Both props feed one set, so neither can remove a name the other holds.
    match (class, class_name) {
        (Some(class), Some(class_name)) => set_classes(element, Classes::Array(vec![class, class_name])),
        (Some(classes), None) | (None, Some(classes)) => set_classes(element, classes),
        (None, None) => {}
    }
    for (name, value) in attributes {
        set_attribute(element, &name, value);
    }
    for (name, listener) in listeners {
        element.add_event_listener(&name, listener);
    }
    if let Some(r#ref) = r#ref {
        set_ref(RefTarget::Node(element.clone()), r#ref);
    }
}

/// Render `child` at the end of `parent` and keep it up to date.
///
/// Returns the slot tracking the nodes the child currently occupies.
pub fn set_child(parent: &Node, child: Child) -> FragmentSlot {
    let slot = FragmentSlot::new();
    bind_slot(parent, child, slot.clone(), Arc::new(AtomicBool::new(true)));
    slot
}

/// Resolve `child` into `slot`. Until `attached` is set, deliveries only
/// record the fragment; the enclosing slot inserts the nodes itself.
fn bind_slot(parent: &Node, child: Child, slot: FragmentSlot, attached: Arc<AtomicBool>) {
    let parent = parent.clone();
    let setter: Setter = Arc::new(move |value, dynamic| {
        set_child_static(&parent, value, &slot, attached.load(Ordering::SeqCst), dynamic);
    });
    resolve_child(child, setter, false);
}

fn set_child_static(parent: &Node, value: Child, slot: &FragmentSlot, attached: bool, dynamic: bool) {
    let previous = slot.get();

    // One text node showing a primitive: patch the data in place.
    if let (Some(text), Some(node)) = (value.primitive_text(), previous.single_node()) {
        if node.is_text() {
            node.set_text_data(text);
            return;
        }
    }

    let mut fragment = Fragment::from_entries(entries_for(parent, value));

    // A position that can change again needs a node to hold its place.
    if fragment.is_empty() && dynamic {
        fragment = match previous.single_node() {
            Some(node) if node.is_comment() => Fragment::Node(node.clone()),
            _ => Fragment::Node(Node::comment("")),
        };
    }

    let old_nodes = previous.nodes();
    let new_nodes = fragment.nodes();
    slot.replace(fragment);

    if !attached {
        return;
    }
    if old_nodes.is_empty() && !dynamic {
        for node in &new_nodes {
            parent.append_child(node);
        }
    } else {
        parent.replace_nodes(&old_nodes, &new_nodes);
    }
}

fn entries_for(parent: &Node, value: Child) -> Vec<FragmentEntry> {
    let mut entries = Vec::new();
    push_entries(parent, value, &mut entries);
    entries
}

fn push_entries(parent: &Node, value: Child, entries: &mut Vec<FragmentEntry>) {
    match value {
        Child::Node(node) => entries.push(FragmentEntry::Node(node)),
        Child::Array(array) => {
            for item in array.iter() {
                push_entries(parent, item.clone(), entries);
            }
        }
        Child::Function(accessor) => {
            let nested = FragmentSlot::new();
            let attached = Arc::new(AtomicBool::new(false));
            bind_slot(parent, Child::Function(accessor), nested.clone(), attached.clone());
            attached.store(true, Ordering::SeqCst);
            entries.push(FragmentEntry::Fragment(nested));
        }
        value if value.is_primitive() => entries.push(FragmentEntry::Node(create_text(&value))),
        _ => {}
    }
}

/// Apply a class value to `element`.
///
/// Static values are applied once. Values that read anything reactive are
/// re-resolved in a reaction and only the difference is applied.
pub fn set_classes(element: &Node, classes: Classes) {
    if classes.is_static() {
        for class in resolve_class(&classes, ResolvedClasses::new()) {
            element.add_class(&class);
        }
        return;
    }

    let element = element.clone();
    let previous = Arc::new(Mutex::new(ResolvedClasses::new()));
    use_reaction(move || {
        let next = resolve_class(&classes, ResolvedClasses::new());
        let mut previous = previous.lock();

        for class in previous.iter().filter(|class| !next.contains(*class)) {
            element.remove_class(class);
        }
        for class in next.iter().filter(|class| !previous.contains(*class)) {
            element.add_class(class);
        }

        *previous = next;
    });
}

/// Apply an attribute value to `element`, tracking it if it is reactive.
pub fn set_attribute(element: &Node, name: &str, value: Child) {
    match value {
        Child::Function(accessor) if accessor.is_static() => {
            set_attribute(element, name, accessor.call());
        }
        Child::Function(accessor) => {
            let element = element.clone();
            let name = name.to_owned();
            use_reaction(move || apply_attribute(&element, &name, accessor.call()));
        }
        value => apply_attribute(element, name, value),
    }
}

fn apply_attribute(element: &Node, name: &str, mut value: Child) {
    while let Child::Function(accessor) = &value {
        value = accessor.call();
    }

    match value {
        Child::Void | Child::Bool(false) => element.remove_attribute(name),
        Child::Bool(true) => element.set_attribute(name, ""),
        value if value.is_primitive() => {
            element.set_attribute(name, value.primitive_text().unwrap_or_default());
        }
        value => {
            tracing::warn!(attribute = name, ?value, "unsupported attribute value, ignoring");
        }
    }
}

/// Hand `target` to `r#ref` now, and `None` when the current owner is
/// cleaned up.
pub fn set_ref(target: RefTarget, r#ref: Ref) {
    r#ref(Some(target));
    on_cleanup(move || r#ref(None));
}
