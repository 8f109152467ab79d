//! Prompt registration codegen.
//!
//! Prompts share the tool pipeline - argument map in, coerced tuple out -
//! but their definition carries per-argument descriptors instead of a JSON
//! schema, and the dispatcher adapts the return value to a message list.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ImplItemFn;

use crate::attrs::PromptArgs;
use crate::signature::{MethodParam, analyze_method, extract_doc_comments, option_string};

/// Emit the registration block for one `#[prompt]` method.
pub fn expand_prompt(method: &ImplItemFn, args: &PromptArgs) -> syn::Result<TokenStream> {
    let fn_ident = &method.sig.ident;
    let prompt_name = args.name.clone().unwrap_or_else(|| fn_ident.to_string());
    let description = option_string(
        args.description
            .clone()
            .or_else(|| extract_doc_comments(&method.attrs))
            .as_deref(),
    );

    let params = analyze_method(method)?;
    let value_params: Vec<&MethodParam> = params.iter().filter(|p| !p.is_context).collect();

    let arguments = if value_params.is_empty() {
        quote! { ::std::option::Option::None }
    } else {
        let entries = value_params.iter().map(|param| {
            let name = &param.name;
            let description = option_string(param.param.description.as_deref());
            let required = !param.is_optional && param.param.default.is_none();
            quote! {
                ::fastmcp::PromptArgument {
                    name: #name.to_string(),
                    description: #description,
                    required: #required,
                }
            }
        });
        quote! { ::std::option::Option::Some(vec![#(#entries),*]) }
    };

    let extractions: Vec<TokenStream> = value_params
        .iter()
        .map(|p| p.extraction())
        .collect();
    let call_args: Vec<TokenStream> = params.iter().map(MethodParam::call_arg).collect();

    Ok(quote! {
        {
            let definition = ::fastmcp::PromptDefinition {
                name: #prompt_name.to_string(),
                description: #description,
                arguments: #arguments,
            };
            let host = ::std::sync::Arc::clone(&self);
            registry.register_prompt(
                definition,
                ::std::sync::Arc::new(
                    move |__args: ::fastmcp::ArgumentMap, __ctx: ::fastmcp::RequestContext| {
                        let host = ::std::sync::Arc::clone(&host);
                        let fut: ::fastmcp::DispatchFuture<::std::vec::Vec<::fastmcp::Message>> =
                            ::std::boxed::Box::pin(async move {
                                #(#extractions)*
                                let __result = host.#fn_ident(#(#call_args),*).await;
                                ::fastmcp::IntoPromptCall::into_prompt_call(__result)
                            });
                        fut
                    },
                ),
            )?;
        }
    })
}
