//! Rendering
//!
//! Turns components and children into DOM nodes and keeps them current.
//!
//! # Overview
//!
//! [`create_element`] returns an [`Element`] thunk. Rendering it builds the
//! node and applies props through the setters. A child that can change is
//! resolved inside a reaction, and only its own nodes are replaced when it
//! does. There is no virtual DOM and no diffing against a previous tree:
//! every reactive position knows exactly which nodes it owns, tracked as a
//! [`Fragment`].
//!
//! ```rust,ignore
//! use trellis_core::dom::Node;
//! use trellis_core::reactive::{Root, Signal};
//! use trellis_core::render::{create_element, set_child, Child, Props};
//!
//! let count = Signal::new(0);
//! let button = create_element("button", Some(Props::new().children(count.clone())), vec![])?;
//!
//! let body = Node::element("body");
//! let root = Root::new();
//! root.run(|| set_child(&body, button.into()));
//!
//! count.set(1); // patches the button's text node, nothing else
//! ```

mod child;
mod classes;
mod component;
mod create_element;
mod fragment;
mod props;
mod resolvers;
mod setters;
mod template;

pub use child::{Accessor, Child, ChildArray, ChildFn};
pub use classes::{Classes, ClassesFn};
pub use component::{Component, ComponentClass, ComponentConstructor, ComponentFn, Element};
pub use create_element::create_element;
pub use fragment::{Fragment, FragmentEntry, FragmentSlot};
pub use props::{Props, Ref, RefTarget};
pub use resolvers::{
    create_text, resolve_arrays_and_statics, resolve_child, resolve_class, resolve_resolved,
    ResolvedClasses, Setter,
};
pub use setters::{set_attribute, set_child, set_classes, set_props, set_ref};
pub use template::{apply_template_actions, TemplateAction, TemplateActionPath, TemplateActionProxy};
