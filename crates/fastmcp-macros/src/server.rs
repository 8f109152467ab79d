//! Server macro - scans a host impl block and generates registration code.
//!
//! `#[server]` is the discovery entry point: it walks the impl block for
//! methods carrying `#[tool]`, `#[resource]`, or `#[prompt]` markers, runs
//! the per-kind generators, strips the markers (and `#[param]` metadata)
//! from the re-emitted impl, and appends a second inherent impl with
//! `server_info()` and `register()`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{ImplItem, ImplItemFn, ItemImpl};

use crate::attrs::{PromptArgs, ResourceArgs, ServerArgs, ToolArgs};
use crate::{prompt, resource, tool};

/// Marker kinds a method can carry.
enum Marker {
    Tool(ToolArgs),
    Resource(ResourceArgs),
    Prompt(PromptArgs),
}

/// Main entry point for the server macro.
pub fn generate_server(
    args: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let impl_block = match syn::parse::<ItemImpl>(input) {
        Ok(item) => item,
        Err(_) => {
            return syn::Error::new(
                proc_macro2::Span::call_site(),
                "the #[server] attribute can only be applied to impl blocks",
            )
            .to_compile_error()
            .into();
        }
    };

    let attrs = match ServerArgs::parse(args.into()) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand_server(&impl_block, &attrs) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_server(impl_block: &ItemImpl, attrs: &ServerArgs) -> syn::Result<TokenStream> {
    validate_impl_block(impl_block)?;

    let type_name = host_type_name(impl_block)?;
    let server_name = attrs.name.clone().unwrap_or_else(|| type_name.clone());
    let server_version = attrs.version.clone().unwrap_or_else(|| "1.0.0".to_string());
    let description = match &attrs.description {
        Some(text) => quote! { .with_description(#text) },
        None => quote! {},
    };

    let mut registrations: Vec<TokenStream> = vec![quote! { let _ = &registry; }];
    for item in &impl_block.items {
        let ImplItem::Fn(method) = item else { continue };
        let Some(marker) = method_marker(method)? else {
            continue;
        };
        validate_handler(method)?;
        registrations.push(match marker {
            Marker::Tool(args) => tool::expand_tool(method, &args)?,
            Marker::Resource(args) => resource::expand_resource(method, &args)?,
            Marker::Prompt(args) => prompt::expand_prompt(method, &args)?,
        });
    }

    let stripped = strip_handler_attributes(impl_block);
    let self_ty = &impl_block.self_ty;
    let (impl_generics, _, where_clause) = impl_block.generics.split_for_impl();

    Ok(quote! {
        #stripped

        impl #impl_generics #self_ty #where_clause {
            /// Identity advertised for this server.
            pub fn server_info() -> ::fastmcp::ServerInfo {
                ::fastmcp::ServerInfo::new(#server_name, #server_version)
                    #description
            }

            /// Register every marked method with `registry`.
            ///
            /// # Errors
            ///
            /// Propagates registry failures, e.g. a duplicate registration
            /// under a strict duplicate policy.
            pub fn register(
                self: ::std::sync::Arc<Self>,
                registry: &::fastmcp::McpRegistry,
            ) -> ::fastmcp::McpResult<()> {
                #(#registrations)*
                Ok(())
            }
        }
    })
}

/// Last path segment of the impl's self type.
fn host_type_name(impl_block: &ItemImpl) -> syn::Result<String> {
    match &*impl_block.self_ty {
        syn::Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => Ok(segment.ident.to_string()),
            None => Err(syn::Error::new_spanned(
                &type_path.path,
                "expected a valid type path",
            )),
        },
        other => Err(syn::Error::new_spanned(
            other,
            "the #[server] attribute only supports named types",
        )),
    }
}

/// Find and parse the marker attribute of a method, if any.
fn method_marker(method: &ImplItemFn) -> syn::Result<Option<Marker>> {
    let mut found: Option<Marker> = None;
    for attr in &method.attrs {
        let marker = if attr.path().is_ident("tool") {
            Marker::Tool(ToolArgs::parse(attr)?)
        } else if attr.path().is_ident("resource") {
            Marker::Resource(ResourceArgs::parse(attr)?)
        } else if attr.path().is_ident("prompt") {
            Marker::Prompt(PromptArgs::parse(attr)?)
        } else {
            continue;
        };
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a method can carry only one of #[tool], #[resource], #[prompt]",
            ));
        }
        found = Some(marker);
    }
    Ok(found)
}

/// Strip handler markers and `#[param]` metadata from the re-emitted impl.
fn strip_handler_attributes(impl_block: &ItemImpl) -> ItemImpl {
    let mut stripped = impl_block.clone();
    for item in &mut stripped.items {
        if let ImplItem::Fn(method) = item {
            method.attrs.retain(|attr| {
                !attr.path().is_ident("tool")
                    && !attr.path().is_ident("resource")
                    && !attr.path().is_ident("prompt")
            });
            for input in &mut method.sig.inputs {
                if let syn::FnArg::Typed(pat_type) = input {
                    pat_type.attrs.retain(|attr| !attr.path().is_ident("param"));
                }
            }
        }
    }
    stripped
}

/// Validate the impl block structure and catch common marker typos.
fn validate_impl_block(impl_block: &ItemImpl) -> syn::Result<()> {
    if impl_block.trait_.is_some() {
        return Err(syn::Error::new_spanned(
            impl_block,
            "#[server] cannot be used on trait implementations; apply it to an \
             inherent impl block",
        ));
    }

    const TYPO_SUGGESTIONS: &[(&str, &str)] = &[
        ("tools", "tool"),
        ("resources", "resource"),
        ("prompts", "prompt"),
        ("Tool", "tool"),
        ("Resource", "resource"),
        ("Prompt", "prompt"),
        ("mcp_tool", "tool"),
        ("mcp_resource", "resource"),
        ("mcp_prompt", "prompt"),
        ("params", "param"),
    ];

    for item in &impl_block.items {
        let ImplItem::Fn(method) = item else { continue };
        for attr in &method.attrs {
            if let Some(ident) = attr.path().get_ident() {
                let name = ident.to_string();
                for (typo, correct) in TYPO_SUGGESTIONS {
                    if &name == typo {
                        return Err(syn::Error::new_spanned(
                            attr,
                            format!(
                                "unknown attribute `#[{typo}]` - did you mean `#[{correct}]`?"
                            ),
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Validate a marked method's shape: async with a `&self` receiver.
fn validate_handler(method: &ImplItemFn) -> syn::Result<()> {
    let name = &method.sig.ident;

    if method.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &method.sig,
            format!("handler `{name}` must be async"),
        ));
    }

    let takes_ref_self = method.sig.inputs.iter().any(|arg| {
        matches!(
            arg,
            syn::FnArg::Receiver(receiver)
                if receiver.reference.is_some() && receiver.mutability.is_none()
        )
    });
    if !takes_ref_self {
        return Err(syn::Error::new_spanned(
            &method.sig,
            format!("handler `{name}` must take &self as its first parameter"),
        ));
    }

    Ok(())
}
