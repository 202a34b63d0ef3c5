//! Error types surfaced by hooks and client setup

use thiserror::Error;

/// Errors raised while driving a hook's lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The element has no data attribute with this name
    #[error("element '{element}' has no data-{attribute} attribute")]
    MissingAttribute { element: String, attribute: String },

    /// The target attribute could not be parsed as a timestamp
    #[error("element '{element}' has an invalid target '{value}': {reason}")]
    InvalidTarget {
        element: String,
        value: String,
        reason: String,
    },

    /// No hook is registered under this name
    #[error("no hook registered as '{0}'")]
    UnknownHook(String),

    /// No mounted element has this id
    #[error("no mounted element with id '{0}'")]
    UnknownElement(String),

    /// An element with this id is already mounted
    #[error("element '{0}' is already mounted")]
    DuplicateElement(String),
}

/// Errors raised while wiring the live socket client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("page has no csrf-token meta tag")]
    MissingCsrfToken,
}
