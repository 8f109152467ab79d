//! Tool registration codegen.
//!
//! For each `#[tool]` method the server macro emits one registration block:
//! a `ToolDefinition` whose schema is derived from the parameter shapes, and
//! a dispatcher closure that unmarshals the argument map and invokes the
//! method directly with the coerced argument tuple.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ImplItemFn;

use crate::attrs::ToolArgs;
use crate::signature::{MethodParam, analyze_method, extract_doc_comments, option_string};

/// Emit the registration block for one `#[tool]` method.
pub fn expand_tool(method: &ImplItemFn, args: &ToolArgs) -> syn::Result<TokenStream> {
    let fn_ident = &method.sig.ident;
    let tool_name = args.name.clone().unwrap_or_else(|| fn_ident.to_string());
    let description = option_string(
        args.description
            .clone()
            .or_else(|| extract_doc_comments(&method.attrs))
            .as_deref(),
    );
    let tags = &args.tags;

    let params = analyze_method(method)?;
    let specs: Vec<TokenStream> = params
        .iter()
        .filter(|p| !p.is_context)
        .map(MethodParam::parameter_spec)
        .collect();
    let extractions: Vec<TokenStream> = params
        .iter()
        .filter(|p| !p.is_context)
        .map(MethodParam::extraction)
        .collect();
    let call_args: Vec<TokenStream> = params.iter().map(MethodParam::call_arg).collect();

    Ok(quote! {
        {
            let definition = ::fastmcp::ToolDefinition {
                name: #tool_name.to_string(),
                description: #description,
                input_schema: ::fastmcp::schema::input_schema(&[#(#specs),*]),
                tags: vec![#(#tags.to_string()),*],
            };
            let host = ::std::sync::Arc::clone(&self);
            registry.register_tool(
                definition,
                ::std::sync::Arc::new(
                    move |__args: ::fastmcp::ArgumentMap, __ctx: ::fastmcp::RequestContext| {
                        let host = ::std::sync::Arc::clone(&host);
                        let fut: ::fastmcp::DispatchFuture<::fastmcp::ToolOutput> =
                            ::std::boxed::Box::pin(async move {
                                #(#extractions)*
                                let __result = host.#fn_ident(#(#call_args),*).await;
                                ::fastmcp::IntoToolCall::into_tool_call(__result)
                            });
                        fut
                    },
                ),
            )?;
        }
    })
}
