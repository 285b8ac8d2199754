//! Error types.
//!
//! Every error in this crate is raised at element-construction time or while
//! loading configuration. Failures inside a later reactive re-run are the
//! runtime's concern and are reported through `tracing` instead.

use thiserror::Error;

/// Errors returned by the rendering core.
#[derive(Debug, Error)]
pub enum Error {
    /// A string `class` prop was combined with a `className` prop.
    #[error("invalid class prop, it can only be absent or a non-string value when className is provided too")]
    InvalidClassProp,

    /// The component is not something that can be rendered.
    #[error("invalid component: {tag:?}")]
    InvalidComponent {
        /// The rejected tag name.
        tag: String,
    },

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
