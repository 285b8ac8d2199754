//! Trellis Core
//!
//! This crate provides the rendering core of the Trellis UI framework.
//! It implements:
//!
//! - Reactive primitives (signals, reactions, batching, ownership)
//! - Child and class resolution into concrete DOM nodes
//! - Element construction for intrinsic tags, class and function components
//! - Targeted DOM updates without a virtual DOM
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: Core reactive primitives and dependency tracking
//! - `dom`: A small in-memory DOM the renderer writes into
//! - `render`: Resolvers, setters and `create_element`
//! - `config`: Process-wide runtime settings
//! - `error`: Errors raised while constructing elements
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_core::dom::Node;
//! use trellis_core::reactive::{Root, Signal};
//! use trellis_core::render::{create_element, set_child, Props};
//!
//! // Create a signal
//! let name = Signal::new(String::from("world"));
//!
//! // Describe an element whose text follows the signal
//! let greeting = create_element("h1", Some(Props::new().children(name.clone())), vec![])?;
//!
//! // Render it
//! let body = Node::element("body");
//! let root = Root::new();
//! root.run(|| set_child(&body, greeting.into()));
//! assert_eq!(body.inner_html(), "<h1>world</h1>");
//!
//! // Update the signal, only the text node changes
//! name.set("trellis".into());
//! assert_eq!(body.inner_html(), "<h1>trellis</h1>");
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod reactive;
pub mod render;

pub use config::{config, set_config, Config};
pub use error::{Error, Result};
pub use render::{create_element, Child, Component, Element, Props};
