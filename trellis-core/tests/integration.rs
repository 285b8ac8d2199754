//! Integration Tests for Rendering
//!
//! These tests verify that signals, reactions and the renderer work together
//! correctly: elements are built once and only the affected nodes change.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use trellis_core::dom::{Event, Node};
use trellis_core::reactive::{batch, Root, Signal};
use trellis_core::render::{
    create_element, resolve_child, set_child, Child, Classes, Component, ComponentClass, Fragment, Props,
    RefTarget, Setter,
};
use trellis_core::Error;

/// Render `child` into a fresh `<body>` under `root`.
fn mount(root: &Root, child: impl Into<Child>) -> Node {
    let body = Node::element("body");
    let child = child.into();
    root.run(|| set_child(&body, child));
    body
}

/// Test that a reactive text child is patched in place.
#[test]
fn reactive_text_updates_in_place() {
    let name = Signal::new(String::from("world"));
    let root = Root::new();

    let heading = create_element("h1", Some(Props::new().children(name.clone())), vec![]).unwrap();
    let body = mount(&root, heading);
    assert_eq!(body.inner_html(), "<h1>world</h1>");

    let h1 = body.child(0).unwrap();
    let text = h1.child(0).unwrap();

    name.set("trellis".into());

    // Same element, same text node, new data
    assert_eq!(body.inner_html(), "<h1>trellis</h1>");
    assert_eq!(body.child(0), Some(h1.clone()));
    assert_eq!(h1.child(0), Some(text));
}

/// Test that a parent renders once while its reactive child updates.
#[test]
fn parent_is_not_rerendered_by_child_updates() {
    let count = Signal::new(0);
    let renders = Arc::new(AtomicI32::new(0));

    let count_clone = count.clone();
    let renders_clone = renders.clone();
    let counter = Component::function(move |_props: Props| {
        renders_clone.fetch_add(1, Ordering::SeqCst);
        let count = count_clone.clone();
        create_element(
            "span",
            None,
            vec![Child::from("count: "), Child::observable(move || count.get().into())],
        )
        .map(Child::from)
        .unwrap_or_default()
    });

    let root = Root::new();
    let body = mount(&root, create_element(counter, None, vec![]).unwrap());
    assert_eq!(body.inner_html(), "<span>count: 0</span>");

    count.set(1);
    count.set(2);

    assert_eq!(body.inner_html(), "<span>count: 2</span>");
    assert_eq!(renders.load(Ordering::SeqCst), 1);
}

/// Test that two changes inside a batch produce one delivery.
#[test]
fn batched_changes_deliver_once() {
    let first = Signal::new(String::from("a"));
    let second = Signal::new(String::from("b"));
    let deliveries = Arc::new(Mutex::new(Vec::new()));

    let sink = deliveries.clone();
    let setter: Setter = Arc::new(move |value: Child, dynamic: bool| {
        let len = value.as_array().map_or(0, |array| array.len());
        sink.lock().push((len, dynamic));
    });

    let root = Root::new();
    root.run(|| {
        resolve_child(
            vec![Child::from(first.clone()), Child::from("-"), Child::from(second.clone())].into(),
            setter,
            false,
        )
    });
    assert_eq!(deliveries.lock().len(), 1);

    batch(|| {
        first.set("x".into());
        second.set("y".into());
    });

    assert_eq!(deliveries.lock().len(), 2);
    assert_eq!(deliveries.lock()[1], (3, true));
}

/// Test a list driven by a signal of strings.
#[test]
fn list_follows_its_signal() {
    let items = Signal::new(vec![String::from("one"), String::from("two")]);

    let items_clone = items.clone();
    let list = create_element(
        "ul",
        Some(Props::new().children(Child::observable(move || {
            items_clone
                .get()
                .into_iter()
                .map(|item| {
                    create_element("li", None, vec![item.into()])
                        .map(Child::from)
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .into()
        }))),
        vec![],
    )
    .unwrap();

    let root = Root::new();
    let body = mount(&root, list);
    assert_eq!(body.inner_html(), "<ul><li>one</li><li>two</li></ul>");

    items.update(|items| items.push("three".into()));
    assert_eq!(body.inner_html(), "<ul><li>one</li><li>two</li><li>three</li></ul>");

    items.set(Vec::new());
    assert_eq!(body.inner_html(), "<ul><!----></ul>");
}

/// Test that siblings of a reactive child are left untouched.
#[test]
fn siblings_keep_their_nodes() {
    let show = Signal::new(true);

    let show_clone = show.clone();
    let badge = Child::thunk(move || {
        if show_clone.get() {
            create_element("em", None, vec!["new".into()])
                .map(Child::from)
                .unwrap_or_default()
        } else {
            Child::Void
        }
    });
    let card = create_element(
        "div",
        None,
        vec![Child::Node(Node::element("h2")), badge, Child::Node(Node::element("p"))],
    )
    .unwrap();

    let root = Root::new();
    let body = mount(&root, card);
    let div = body.child(0).unwrap();
    let heading = div.child(0).unwrap();
    assert_eq!(div.inner_html(), "<h2></h2><em>new</em><p></p>");

    show.set(false);
    assert_eq!(div.inner_html(), "<h2></h2><!----><p></p>");
    assert_eq!(div.child(0), Some(heading));

    show.set(true);
    assert_eq!(div.inner_html(), "<h2></h2><em>new</em><p></p>");
}

/// Test class toggling through a map of reactive values.
#[test]
fn class_map_toggles() {
    let active = Signal::new(false);

    let active_clone = active.clone();
    let props = Props::new()
        .class(Classes::map([("selected", Child::observable(move || active_clone.get().into()))]))
        .class_name("item");

    let root = Root::new();
    let body = mount(&root, create_element("li", Some(props), vec![]).unwrap());
    let li = body.child(0).unwrap();
    assert_eq!(li.classes(), ["item"]);

    active.set(true);
    assert!(li.has_class("selected"));
    assert!(li.has_class("item"));

    active.set(false);
    assert!(!li.has_class("selected"));
}

/// Test that a string class combined with class_name is rejected.
#[test]
fn conflicting_class_props_fail_early() {
    let props = Props::new().class("a").class_name("b");
    let result = create_element("div", Some(props), vec![]);
    assert!(matches!(result, Err(Error::InvalidClassProp)));
}

/// Test reactive attributes and event listeners on an intrinsic element.
#[test]
fn attributes_and_listeners() {
    let disabled = Signal::new(false);
    let clicks = Arc::new(AtomicI32::new(0));

    let clicks_clone = clicks.clone();
    let props = Props::new()
        .attr("type", "button")
        .attr("disabled", disabled.clone())
        .on("click", move |_| {
            clicks_clone.fetch_add(1, Ordering::SeqCst);
        });

    let root = Root::new();
    let body = mount(&root, create_element("button", Some(props), vec!["go".into()]).unwrap());
    let button = body.child(0).unwrap();
    assert_eq!(button.outer_html(), r#"<button type="button">go</button>"#);

    disabled.set(true);
    assert_eq!(button.attribute("disabled").as_deref(), Some(""));

    button.dispatch_event(&Event::new("click"));
    button.dispatch_event(&Event::new("click"));
    assert_eq!(clicks.load(Ordering::SeqCst), 2);
}

struct Counter {
    start: i32,
}

impl ComponentClass for Counter {
    fn render(&self) -> Child {
        self.start.into()
    }
}

/// Test that refs are bound on render and cleared on disposal.
#[test]
fn refs_bind_and_clear() {
    let events = Arc::new(Mutex::new(Vec::new()));

    let sink = events.clone();
    let node_props = Props::new().with_ref(move |target: Option<RefTarget>| {
        sink.lock().push(match target {
            Some(RefTarget::Node(_)) => "node",
            Some(RefTarget::Instance(_)) => "instance",
            None => "cleared",
        });
    });
    let sink = events.clone();
    let class_props = Props::new().with_ref(move |target: Option<RefTarget>| {
        sink.lock().push(match target {
            Some(RefTarget::Node(_)) => "node",
            Some(RefTarget::Instance(_)) => "instance",
            None => "cleared",
        });
    });

    let counter = Component::class(|_props: Props| Counter { start: 7 });
    let tree = create_element(
        "section",
        Some(node_props),
        vec![create_element(counter, Some(class_props), vec![]).unwrap().into()],
    )
    .unwrap();

    let root = Root::new();
    let body = mount(&root, tree);
    assert_eq!(body.inner_html(), "<section>7</section>");

    root.dispose();

    let events = events.lock();
    assert_eq!(events.len(), 4);
    assert!(events[..2].contains(&"node"));
    assert!(events[..2].contains(&"instance"));
    assert_eq!(events[2..], ["cleared", "cleared"]);
}

/// Test that disposing the root stops all updates.
#[test]
fn disposed_root_stops_updates() {
    let label = Signal::new(String::from("before"));

    let root = Root::new();
    let body = mount(&root, label.clone());
    assert_eq!(body.inner_html(), "before");
    assert_eq!(label.subscriber_count(), 1);

    root.dispose();
    label.set("after".into());

    assert_eq!(body.inner_html(), "before");
    assert_eq!(label.subscriber_count(), 0);
}

/// Test that a nested thunk next to plain nodes gets its own fragment.
#[test]
fn mixed_fragment_tracks_nested_slots() {
    let word = Signal::new(String::from("a"));

    let word_clone = word.clone();
    let body = Node::element("body");
    let root = Root::new();
    let slot = root.run(|| {
        set_child(
            &body,
            vec![
                Child::Node(Node::text("[")),
                Child::thunk(move || word_clone.get().into()),
                Child::Node(Node::text("]")),
            ]
            .into(),
        )
    });

    let fragment = slot.get();
    assert!(matches!(fragment, Fragment::Mixed(_)));
    assert_eq!(fragment.len(), 3);
    assert!(fragment.is_fragmented());

    word.set("b".into());
    assert_eq!(body.text_content(), "[b]");

    // The enclosing fragment sees the nested update on traversal
    let text: String = slot.get().nodes().iter().map(Node::text_content).collect();
    assert_eq!(text, "[b]");
}
