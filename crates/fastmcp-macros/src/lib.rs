//! # FastMCP Macros
//!
//! Procedural macros for ergonomic MCP server development: compile-time
//! schema derivation and dispatcher generation for tools, resources, and
//! prompts.
//!
//! ## Core macros
//!
//! - **`#[server]`** - scan an impl block for marked methods and generate
//!   `server_info()` plus `register()` for a `fastmcp` registry
//! - **`#[tool]`** - mark a method as a tool handler with automatic schema
//!   generation
//! - **`#[resource]`** - mark a method as a resource handler with a URI or
//!   URI template
//! - **`#[prompt]`** - mark a method as a prompt handler
//! - **`#[param]`** - per-parameter metadata: description, examples,
//!   required, schema override, default value
//! - **`#[derive(McpType)]`** - structural shape and coercion for
//!   user-defined argument types
//!
//! ## Usage
//!
//! ```ignore
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
//!     #[tool(description = "Greet someone", tags = ["demo"])]
//!     async fn greet(
//!         &self,
//!         #[param(examples = ["Alice"])] name: String,
//!         title: Option<String>,
//!     ) -> String {
//!         match title {
//!             Some(title) => format!("{title} {name}"),
//!             None => name,
//!         }
//!     }
//!
//!     #[resource("calc://history/{entry}")]
//!     async fn history(&self, entry: String) -> McpResult<String> {
//!         Ok(format!("History for {entry}"))
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod attrs;
mod derive;
mod prompt;
mod resource;
mod server;
mod signature;
mod tool;

/// Marks an impl block as a FastMCP server.
///
/// Scans the block for `#[tool]`, `#[resource]`, and `#[prompt]` methods and
/// generates:
///
/// - `fn server_info() -> fastmcp::ServerInfo`
/// - `fn register(self: Arc<Self>, registry: &fastmcp::McpRegistry) -> fastmcp::McpResult<()>`
///
/// # Example
///
/// ```ignore
/// #[server(name = "my-server", version = "1.0.0", description = "Demo")]
/// impl MyServer {
///     #[tool]
///     async fn ping(&self) -> String { "pong".into() }
/// }
/// ```
#[proc_macro_attribute]
pub fn server(args: TokenStream, input: TokenStream) -> TokenStream {
    server::generate_server(args, input)
}

/// Marks a method as a tool handler.
///
/// Interpreted by the enclosing `#[server]` attribute; using it on a method
/// outside a `#[server]` impl block is a compile error.
#[proc_macro_attribute]
pub fn tool(_args: TokenStream, input: TokenStream) -> TokenStream {
    orphan_marker("tool", input)
}

/// Marks a method as a resource handler.
///
/// Interpreted by the enclosing `#[server]` attribute; using it on a method
/// outside a `#[server]` impl block is a compile error.
#[proc_macro_attribute]
pub fn resource(_args: TokenStream, input: TokenStream) -> TokenStream {
    orphan_marker("resource", input)
}

/// Marks a method as a prompt handler.
///
/// Interpreted by the enclosing `#[server]` attribute; using it on a method
/// outside a `#[server]` impl block is a compile error.
#[proc_macro_attribute]
pub fn prompt(_args: TokenStream, input: TokenStream) -> TokenStream {
    orphan_marker("prompt", input)
}

/// Shared error path for markers that escaped their `#[server]` scan.
fn orphan_marker(name: &str, input: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(input);
    let message = format!(
        "#[{name}] is interpreted by #[server]; annotate the enclosing impl block \
         with #[server(...)]"
    );
    let error = syn::Error::new(proc_macro2::Span::call_site(), message).to_compile_error();
    quote::quote! {
        #error
        #item
    }
    .into()
}

/// Derives `fastmcp::McpType` and `fastmcp::FromArgument` for an argument
/// type.
///
/// Structs with named fields become product shapes (object schemas with one
/// property per field, `Option` fields optional); enums with only unit
/// variants become sum shapes (string schemas with an `enum` listing the
/// variant names, matched case-insensitively at dispatch time).
///
/// # Example
///
/// ```ignore
/// #[derive(McpType)]
/// struct UserProfile {
///     #[param(description = "Email address")]
///     email: String,
///     nickname: Option<String>,
/// }
///
/// #[derive(McpType)]
/// enum Operation { Add, Multiply }
/// ```
#[proc_macro_derive(McpType, attributes(param))]
pub fn derive_mcp_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    match derive::expand_derive(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
