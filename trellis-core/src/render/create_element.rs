//! Element Construction
//!
//! [`create_element`] validates its arguments up front and returns an
//! [`Element`], a thunk that does the actual work later. Wrapping every
//! component this way makes parents run before their children.

use super::child::Child;
use super::component::{is_valid_tag, Component, Element};
use super::props::{Props, RefTarget};
use super::setters::{set_props, set_ref};
use crate::dom::Node;
use crate::error::{Error, Result};

/// Build the render thunk for `component`.
///
/// Children are taken from `children` when exactly one is given, from
/// `props.children` when none are, and as a list otherwise. A nil result
/// leaves `props.children` unset. `key` is dropped.
///
/// # Errors
///
/// - [`Error::InvalidClassProp`] when a string `class` is combined with a
///   `class_name`.
/// - [`Error::InvalidComponent`] when an intrinsic tag is not a valid
///   element name.
pub fn create_element(
    component: impl Into<Component>,
    props: Option<Props>,
    children: Vec<Child>,
) -> Result<Element> {
    let component = component.into();
    let mut props = props.unwrap_or_default();

    let children = match children.len() {
        0 => props.children.take(),
        1 => children.into_iter().next(),
        _ => Some(Child::from(children)),
    };
    props.key = None;

    if props.class_name.is_some() && props.class.as_ref().is_some_and(|class| class.is_str()) {
        return Err(Error::InvalidClassProp);
    }

    props.children = children.filter(|child| !child.is_nil());

    let element = match component {
        Component::Class(construct) => {
            tracing::debug!("creating class component element");
            let r#ref = props.r#ref.take();
            Element::new(move || {
                let instance = construct(props.clone());
                let child = instance.render();
                if let Some(r#ref) = &r#ref {
                    set_ref(RefTarget::Instance(instance), r#ref.clone());
                }
                child
            })
        }
        Component::Function(render) => {
            tracing::debug!("creating function component element");
            Element::new(move || render(props.clone()))
        }
        Component::Intrinsic(tag) => {
            if !is_valid_tag(&tag) {
                return Err(Error::InvalidComponent { tag });
            }
            tracing::debug!(tag = %tag, "creating intrinsic element");
            Element::new(move || {
                let element = Node::element(tag.as_str());
                set_props(&element, props.clone());
                Child::Node(element)
            })
        }
        Component::Node(node) => Element::new(move || Child::Node(node.clone())),
    };

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Root;
    use crate::render::classes::Classes;
    use crate::render::component::ComponentClass;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn node_of(child: Child) -> Node {
        child.as_node().cloned().expect("expected a node")
    }

    #[test]
    fn span_without_props() {
        let root = Root::new();
        let element = create_element("span", None, vec![]).unwrap();

        let first = node_of(root.run(|| element.render()));
        let second = node_of(root.run(|| element.render()));

        assert_eq!(first.tag_name(), Some("span"));
        assert_eq!(first.child_count(), 0);
        assert_ne!(first, second, "every render creates a new element");
    }

    #[test]
    fn string_class_with_class_name_is_rejected() {
        let props = Props::new()
            .class("a")
            .class_name(Classes::map([("b", true)]));

        let err = create_element("div", Some(props), vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidClassProp));
    }

    #[test]
    fn non_string_class_with_class_name_is_fine() {
        let props = Props::new()
            .class(Classes::map([("a", true)]))
            .class_name("b");

        let root = Root::new();
        let element = create_element("div", Some(props), vec![]).unwrap();
        let node = node_of(root.run(|| element.render()));

        assert_eq!(node.classes(), ["a", "b"]);
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let err = create_element("not a tag", None, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { tag } if tag == "not a tag"));
    }

    #[test]
    fn variadic_child_wins_over_props_children() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        let component = Component::function(move |props: Props| {
            *seen_clone.lock() = props.children.clone().and_then(|c| c.primitive_text());
            Child::Void
        });

        let element = create_element(
            component,
            Some(Props::new().children("hi")),
            vec![Child::from("bye")],
        )
        .unwrap();
        element.render();

        assert_eq!(seen.lock().as_deref(), Some("bye"));
    }

    #[test]
    fn nil_child_leaves_children_unset() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let component = Component::function(move |props: Props| {
            seen_clone.lock().push(props.children.is_some());
            Child::Void
        });

        create_element(component.clone(), None, vec![Child::Void]).unwrap().render();
        create_element(component, Some(Props::new().children(Child::Void)), vec![])
            .unwrap()
            .render();

        assert_eq!(*seen.lock(), [false, false]);
    }

    #[test]
    fn props_children_used_without_variadic_children() {
        let root = Root::new();
        let element = create_element("p", Some(Props::new().children("hi")), vec![]).unwrap();
        let node = node_of(root.run(|| element.render()));
        assert_eq!(node.outer_html(), "<p>hi</p>");
    }

    #[test]
    fn many_children_become_a_list() {
        let root = Root::new();
        let element = create_element("p", None, vec!["a".into(), 1.into(), Child::Void]).unwrap();
        let node = node_of(root.run(|| element.render()));
        assert_eq!(node.inner_html(), "a1");
    }

    #[test]
    fn nothing_runs_until_rendered() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let element = create_element(
            Component::function(move |_| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Child::Void
            }),
            None,
            vec![],
        )
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        element.render();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct Greeting {
        name: String,
    }

    impl ComponentClass for Greeting {
        fn render(&self) -> Child {
            format!("hello {}", self.name).into()
        }
    }

    #[test]
    fn class_component_ref_receives_instance() {
        let bound = Arc::new(AtomicUsize::new(0));
        let bound_clone = bound.clone();
        let component = Component::class(|props: Props| Greeting {
            name: props
                .children
                .and_then(|c| c.primitive_text())
                .unwrap_or_default(),
        });
        let props = Props::new().with_ref(move |target| {
            if matches!(target, Some(RefTarget::Instance(_))) {
                bound_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        let root = Root::new();
        let element = create_element(component, Some(props), vec!["ada".into()]).unwrap();
        let child = root.run(|| element.render());

        assert_eq!(child.primitive_text().as_deref(), Some("hello ada"));
        assert_eq!(bound.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn function_component_receives_ref_in_props() {
        let has_ref = Arc::new(AtomicUsize::new(0));
        let has_ref_clone = has_ref.clone();
        let component = Component::function(move |props: Props| {
            if props.r#ref.is_some() && props.key.is_none() {
                has_ref_clone.fetch_add(1, Ordering::SeqCst);
            }
            Child::Void
        });

        let props = Props::new().key("k").with_ref(|_| {});
        create_element(component, Some(props), vec![]).unwrap().render();

        assert_eq!(has_ref.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn intrinsic_ref_receives_node() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        let props = Props::new().with_ref(move |target: Option<RefTarget>| {
            if let Some(node) = target.as_ref().and_then(RefTarget::as_node) {
                *seen_clone.lock() = Some(node.clone());
            }
        });

        let root = Root::new();
        let element = create_element("input", Some(props), vec![]).unwrap();
        let node = node_of(root.run(|| element.render()));

        assert_eq!(seen.lock().as_ref(), Some(&node));
    }

    #[test]
    fn node_passes_through() {
        let existing = Node::element("section");
        let element = create_element(existing.clone(), None, vec![]).unwrap();
        assert_eq!(node_of(element.render()), existing);
        assert_eq!(node_of(element.render()), existing);
    }
}
