//! Reactive Primitives
//!
//! This module implements the reactive engine the renderer runs on:
//! signals, reactions, batching and ownership.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal's value is read
//! within a reaction, the signal automatically registers that reaction as a
//! dependent. When the signal's value changes, all dependents are notified.
//!
//! ## Reactions
//!
//! A Reaction is a side-effecting computation that runs immediately and
//! again whenever a signal it read changes. The renderer uses one per
//! reactive DOM position, so an update touches only that position.
//!
//! ## Owners
//!
//! Reactions created while another reaction (or a [`Root`]) runs are owned
//! by it and are disposed before it re-runs. Without this, every re-render
//! of a parent would leave the previous children subscribed.
//!
//! # Implementation Notes
//!
//! The reactive system uses a thread-local tracking context to automatically
//! detect dependencies. When a signal is read, we check if there is an active
//! tracking context and, if so, register the dependency.
//!
//! This approach (sometimes called "automatic dependency tracking" or
//! "transparent reactivity") is used by SolidJS, Vue 3, and Leptos.

mod context;
mod owner;
mod reaction;
mod runtime;
mod signal;
mod subscriber;

pub use context::{untrack, ReactiveContext};
pub use owner::{on_cleanup, Root};
pub use reaction::{use_reaction, Reaction};
pub use runtime::{batch, Reactive, ReactiveHandle, Runtime};
pub use signal::Signal;
pub use subscriber::SubscriberId;
