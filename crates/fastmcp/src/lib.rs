//! # FastMCP
//!
//! Macro-driven MCP server core: publish typed methods as Model Context
//! Protocol *tools*, *resources*, and *prompts* by attaching attribute
//! markers to an impl block. The macros inspect each marked method at compile
//! time, derive a JSON Schema for its argument list, and generate a
//! dispatcher that unmarshals a name-keyed argument map into the concrete
//! argument tuple. An in-process [`McpRegistry`] holds the resulting
//! `(definition, dispatcher)` pairs for the protocol runtime to consult.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fastmcp::prelude::*;
//!
//! #[derive(Clone)]
//! struct Calculator;
//!
//! #[server(name = "calculator", version = "1.0.0")]
//! impl Calculator {
//!     /// Add two numbers.
//!     #[tool]
//!     async fn add(&self, a: f64, b: f64) -> McpResult<f64> {
//!         Ok(a + b)
//!     }
//!
//!     #[resource("calc://history/{entry}")]
//!     async fn history(&self, entry: String) -> McpResult<String> {
//!         Ok(format!("History for {entry}"))
//!     }
//!
//!     #[prompt("Explain a calculation")]
//!     async fn explain(&self, expression: String) -> String {
//!         format!("Please explain: {expression}")
//!     }
//! }
//!
//! # async fn run() -> McpResult<()> {
//! let registry = McpRegistry::new();
//! Arc::new(Calculator).register(&registry)?;
//!
//! let mut args = ArgumentMap::new();
//! args.insert("a".into(), 1.into());
//! args.insert("b".into(), 2.into());
//! let output = registry.call_tool("add", args, None).await?;
//! assert_eq!(output.first_text(), Some("3"));
//! # Ok(())
//! # }
//! ```
//!
//! The wire protocol, transports, and serialization of protocol envelopes are
//! external collaborators: this crate ends at the registry surface.

pub mod coerce;
pub mod content;
pub mod context;
pub mod definitions;
pub mod error;
pub mod registry;
pub mod result;
pub mod schema;
pub mod shape;
pub mod uri_template;

pub use coerce::{ArgumentMap, CoercionError, FromArgument};
pub use content::{
    BlobResourceContents, Content, EmbeddedResource, ImageContent, Message, ResourceContents,
    Role, TextContent, TextResourceContents,
};
pub use context::{ClientInfo, RequestContext};
pub use definitions::{
    PromptArgument, PromptDefinition, ResourceArgument, ResourceDefinition, ServerInfo,
    ToolDefinition,
};
pub use error::{McpError, McpResult};
pub use registry::{
    DispatchFuture, McpRegistry, PromptDispatcher, RegistryOptions, ResourceDispatcher,
    TemplateDispatcher, ToolDispatcher,
};
pub use result::{
    IntoPromptCall, IntoResourceCall, IntoToolCall, ResourceOutput, ToolOutput,
};
pub use shape::{FieldShape, McpType, TypeShape};
pub use uri_template::{UriMatch, UriTemplate, UriTemplateError};

// Attribute and derive macros.
pub use fastmcp_macros::{McpType, prompt, resource, server, tool};

/// Re-exports for macro-generated code. Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

/// Everything a typical server needs in scope.
pub mod prelude {
    pub use crate::coerce::{ArgumentMap, FromArgument};
    pub use crate::content::{Content, Message, Role};
    pub use crate::context::{ClientInfo, RequestContext};
    pub use crate::definitions::{
        PromptDefinition, ResourceDefinition, ServerInfo, ToolDefinition,
    };
    pub use crate::error::{McpError, McpResult};
    pub use crate::registry::{McpRegistry, RegistryOptions};
    pub use crate::result::{ResourceOutput, ToolOutput};
    // `McpType` brings in both the trait and the derive macro.
    pub use crate::{McpType, prompt, resource, server, tool};
}
