//! Resource registration codegen.
//!
//! A `#[resource("uri")]` method registers as a static resource when the URI
//! has no placeholders (the method must take no arguments beyond an optional
//! context), or as a templated resource when it does (the placeholder set
//! must equal the method's non-context parameter names). Both directions of
//! a template/parameter mismatch are compile errors.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::ImplItemFn;

use crate::attrs::ResourceArgs;
use crate::signature::{MethodParam, analyze_method, extract_doc_comments, option_string};

/// Scan `{name}` placeholders out of a URI template.
///
/// Validates brace nesting and the placeholder grammar
/// `[A-Za-z_][A-Za-z0-9_]*`; rejects duplicates.
pub fn template_placeholders(uri: &str) -> Result<Vec<String>, String> {
    let mut placeholders: Vec<String> = Vec::new();
    let mut chars = uri.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    name.push(inner);
                }
                if !closed {
                    return Err(format!("unclosed placeholder: {{{name}"));
                }
                let valid = name
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if !valid {
                    return Err(format!("invalid placeholder name: {{{name}}}"));
                }
                if placeholders.contains(&name) {
                    return Err(format!("duplicate placeholder: {{{name}}}"));
                }
                placeholders.push(name);
            }
            '}' => return Err("unexpected closing brace without opening".to_string()),
            _ => {}
        }
    }

    Ok(placeholders)
}

/// Emit the registration block for one `#[resource]` method.
pub fn expand_resource(method: &ImplItemFn, args: &ResourceArgs) -> syn::Result<TokenStream> {
    let fn_ident = &method.sig.ident;
    let uri = &args.uri;
    let placeholders = template_placeholders(uri)
        .map_err(|message| syn::Error::new_spanned(fn_ident, format!("in '{uri}': {message}")))?;

    let resource_name = args.name.clone().unwrap_or_else(|| fn_ident.to_string());
    let description = option_string(
        args.description
            .clone()
            .or_else(|| extract_doc_comments(&method.attrs))
            .as_deref(),
    );
    let mime_type = args
        .mime_type
        .clone()
        .unwrap_or_else(|| "text/plain".to_string());

    let params = analyze_method(method)?;
    let value_params: Vec<&MethodParam> = params.iter().filter(|p| !p.is_context).collect();
    let call_args: Vec<TokenStream> = params.iter().map(MethodParam::call_arg).collect();

    if placeholders.is_empty() {
        if let Some(extra) = value_params.first() {
            return Err(syn::Error::new_spanned(
                &extra.ident,
                format!(
                    "static resource '{uri}' takes no parameters, but `{}` is declared; \
                     add a {{placeholder}} to the URI or drop the parameter",
                    extra.name
                ),
            ));
        }
        return Ok(quote! {
            {
                let definition = ::fastmcp::ResourceDefinition {
                    uri: #uri.to_string(),
                    name: ::std::option::Option::Some(#resource_name.to_string()),
                    description: #description,
                    mime_type: #mime_type.to_string(),
                    is_template: false,
                    arguments: ::std::option::Option::None,
                };
                let host = ::std::sync::Arc::clone(&self);
                registry.register_resource(
                    definition,
                    ::std::sync::Arc::new(move |__ctx: ::fastmcp::RequestContext| {
                        let host = ::std::sync::Arc::clone(&host);
                        let fut: ::fastmcp::DispatchFuture<::fastmcp::ResourceOutput> =
                            ::std::boxed::Box::pin(async move {
                                let __result = host.#fn_ident(#(#call_args),*).await;
                                ::fastmcp::IntoResourceCall::into_resource_call(__result)
                            });
                        fut
                    }),
                )?;
            }
        });
    }

    // Templated: placeholders and parameters must agree exactly.
    let placeholder_set: BTreeSet<&str> = placeholders.iter().map(String::as_str).collect();
    let param_set: BTreeSet<&str> = value_params.iter().map(|p| p.name.as_str()).collect();
    for placeholder in placeholder_set.difference(&param_set) {
        return Err(syn::Error::new_spanned(
            fn_ident,
            format!(
                "URI template '{uri}' has placeholder {{{placeholder}}} but `{fn_ident}` \
                 declares no parameter of that name"
            ),
        ));
    }
    for param in param_set.difference(&placeholder_set) {
        return Err(syn::Error::new_spanned(
            fn_ident,
            format!(
                "parameter `{param}` of `{fn_ident}` does not appear in the URI \
                 template '{uri}'"
            ),
        ));
    }

    // Placeholder descriptors in template declaration order.
    let argument_entries: Vec<TokenStream> = placeholders
        .iter()
        .map(|placeholder| {
            let param = value_params
                .iter()
                .find(|p| &p.name == placeholder)
                .expect("placeholder/parameter alignment was just validated");
            let name = &param.name;
            let description = option_string(param.param.description.as_deref());
            let required = !param.is_optional;
            quote! {
                ::fastmcp::ResourceArgument {
                    name: #name.to_string(),
                    description: #description,
                    required: #required,
                }
            }
        })
        .collect();

    let extractions: Vec<TokenStream> = value_params
        .iter()
        .map(|p| p.template_extraction())
        .collect();

    Ok(quote! {
        {
            let definition = ::fastmcp::ResourceDefinition {
                uri: #uri.to_string(),
                name: ::std::option::Option::Some(#resource_name.to_string()),
                description: #description,
                mime_type: #mime_type.to_string(),
                is_template: true,
                arguments: ::std::option::Option::Some(vec![#(#argument_entries),*]),
            };
            let host = ::std::sync::Arc::clone(&self);
            registry.register_resource_template(
                definition,
                ::std::sync::Arc::new(
                    move |__params: ::std::collections::HashMap<::std::string::String, ::std::string::String>,
                          __ctx: ::fastmcp::RequestContext| {
                        let host = ::std::sync::Arc::clone(&host);
                        let fut: ::fastmcp::DispatchFuture<::fastmcp::ResourceOutput> =
                            ::std::boxed::Box::pin(async move {
                                #(#extractions)*
                                let __result = host.#fn_ident(#(#call_args),*).await;
                                ::fastmcp::IntoResourceCall::into_resource_call(__result)
                            });
                        fut
                    },
                ),
            )?;
        }
    })
}
