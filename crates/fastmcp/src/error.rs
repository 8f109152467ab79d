//! Unified error handling for the FastMCP core.
//!
//! A single [`McpError`] covers every runtime failure the core can produce:
//! lookup misses, argument unmarshalling failures, handler failures, and
//! registration conflicts. Build-time failures (bad markers, template or
//! parameter mismatches) never reach this type - they are reported as compile
//! errors by `fastmcp-macros`.
//!
//! The core never swallows or retries: every error propagates through the
//! dispatch future to the protocol runtime, which maps it onto an MCP error
//! payload.

use crate::coerce::CoercionError;

/// Result type alias for MCP operations.
pub type McpResult<T> = Result<T, McpError>;

/// Unified runtime error for registry and dispatch operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum McpError {
    /// No tool registered under the requested name.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// No static resource or matching template for the requested URI.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// No prompt registered under the requested name.
    #[error("prompt not found: {0}")]
    PromptNotFound(String),

    /// The argument map has no entry for a required parameter.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// An argument value could not be coerced to the declared parameter type.
    #[error("invalid parameter '{name}': expected {expected}, got {value}")]
    Coercion {
        /// Parameter name as it appears in the argument map.
        name: String,
        /// Human-readable description of the declared type.
        expected: String,
        /// Compact rendering of the rejected raw value.
        value: String,
    },

    /// The user-supplied handler method itself failed.
    #[error("handler failed: {0}")]
    Handler(String),

    /// A non-overriding duplicate registration was rejected.
    #[error("duplicate registration: {0}")]
    DuplicateRegistration(String),

    /// A registration was structurally invalid (e.g. an unparsable URI
    /// template handed to the registry directly, bypassing the macros).
    #[error("registration failed: {0}")]
    Registration(String),
}

// Handlers returning plain string errors fail as handler failures.
impl From<String> for McpError {
    fn from(message: String) -> Self {
        Self::Handler(message)
    }
}

impl From<&str> for McpError {
    fn from(message: &str) -> Self {
        Self::Handler(message.to_string())
    }
}

impl McpError {
    /// Wrap a handler failure, preserving the cause's rendering.
    #[must_use]
    pub fn handler(cause: impl std::fmt::Display) -> Self {
        Self::Handler(cause.to_string())
    }

    /// Attach a parameter name to a coercion failure.
    #[must_use]
    pub fn coercion(name: impl Into<String>, cause: CoercionError) -> Self {
        Self::Coercion {
            name: name.into(),
            expected: cause.expected,
            value: cause.value,
        }
    }
}
