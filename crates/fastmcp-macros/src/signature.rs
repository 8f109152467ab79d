//! Method signature analysis shared by the tool, resource, and prompt
//! generators.
//!
//! Walks a marked method's formal parameters, pairing each with its
//! `#[param]` metadata and classifying it: context parameters (type
//! `RequestContext`) are injected rather than unmarshalled, `Option`
//! parameters are demoted from `required`, and `#[param]` constraints are
//! validated against the declared type here so violations surface as
//! compile errors on the offending parameter.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{FnArg, ImplItemFn, Pat, PatType, Type};

use crate::attrs::ParamArgs;

/// One analyzed formal parameter.
#[derive(Debug)]
pub struct MethodParam {
    /// Binding identifier.
    pub ident: syn::Ident,
    /// Parameter name as it appears in argument maps and schemas.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Whether this is the injected `RequestContext` parameter.
    pub is_context: bool,
    /// Whether the declared type is `Option<_>`.
    pub is_optional: bool,
    /// Parsed `#[param]` metadata (default when absent).
    pub param: ParamArgs,
}

/// Whether a type is `RequestContext` (by final path segment).
pub fn is_context_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "RequestContext")
    } else {
        false
    }
}

/// Whether a type is `Option<_>` (by final path segment).
pub fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option")
    } else {
        false
    }
}

/// Join a method's doc comment lines into one description string.
pub fn extract_doc_comments(attrs: &[syn::Attribute]) -> Option<String> {
    let doc_lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if attr.path().is_ident("doc")
                && let syn::Meta::NameValue(meta) = &attr.meta
                && let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit_str),
                    ..
                }) = &meta.value
            {
                return Some(lit_str.value().trim().to_string());
            }
            None
        })
        .collect();

    if doc_lines.is_empty() {
        None
    } else {
        Some(doc_lines.join(" "))
    }
}

/// Analyze every formal parameter of a marked method.
pub fn analyze_method(method: &ImplItemFn) -> syn::Result<Vec<MethodParam>> {
    let mut params = Vec::new();

    for input in &method.sig.inputs {
        let FnArg::Typed(PatType { pat, ty, attrs, .. }) = input else {
            continue;
        };
        let Pat::Ident(pat_ident) = pat.as_ref() else {
            return Err(syn::Error::new_spanned(
                pat,
                "handler parameters must be simple identifiers",
            ));
        };
        let ident = pat_ident.ident.clone();
        let name = ident.to_string();

        if let Type::Reference(reference) = ty.as_ref()
            && is_context_type(&reference.elem)
        {
            return Err(syn::Error::new_spanned(
                ty,
                "take RequestContext by value; it is cheap to clone",
            ));
        }

        let mut param_attrs = attrs.iter().filter(|attr| attr.path().is_ident("param"));
        let param = match param_attrs.next() {
            Some(attr) => {
                if let Some(duplicate) = param_attrs.next() {
                    return Err(syn::Error::new_spanned(
                        duplicate,
                        "duplicate #[param] attribute",
                    ));
                }
                ParamArgs::parse(attr)?
            }
            None => ParamArgs::default(),
        };

        let is_context = is_context_type(ty);
        let is_optional = is_option_type(ty);

        if is_context {
            if param.description.is_some()
                || !param.examples.is_empty()
                || param.required.is_some()
                || param.schema.is_some()
                || param.default.is_some()
            {
                return Err(syn::Error::new_spanned(
                    pat,
                    "#[param] does not apply to the RequestContext parameter",
                ));
            }
        } else {
            if param.required == Some(false) && !is_optional && param.default.is_none() {
                return Err(syn::Error::new_spanned(
                    pat,
                    "required = false needs an Option type or a default value",
                ));
            }
            if param.default.is_some() && is_optional {
                return Err(syn::Error::new_spanned(
                    pat,
                    "a default on an Option parameter is ambiguous; missing arguments \
                     already yield None",
                ));
            }
        }

        params.push(MethodParam {
            ident,
            name,
            ty: (**ty).clone(),
            is_context,
            is_optional,
            param,
        });
    }

    Ok(params)
}

impl MethodParam {
    /// Expression building this parameter's `ParameterSpec`.
    pub fn parameter_spec(&self) -> TokenStream {
        let name = &self.name;
        let ty = &self.ty;
        let description = option_string(self.param.description.as_deref());
        let examples = &self.param.examples;
        let required = match self.param.required {
            Some(flag) => quote! { ::std::option::Option::Some(#flag) },
            None => quote! { ::std::option::Option::None },
        };
        let schema_override = option_string(self.param.schema.as_deref());
        let has_default = self.param.default.is_some();

        quote! {
            ::fastmcp::schema::ParameterSpec {
                name: #name.to_string(),
                shape: <#ty as ::fastmcp::McpType>::shape(),
                description: #description,
                examples: vec![#(#examples.to_string()),*],
                required: #required,
                schema_override: #schema_override,
                has_default: #has_default,
            }
        }
    }

    /// Statement extracting this parameter from the `__args` map.
    pub fn extraction(&self) -> TokenStream {
        let ident = &self.ident;
        let name = &self.name;
        let ty = &self.ty;

        if let Some(default) = &self.param.default {
            return quote! {
                let #ident: #ty = ::fastmcp::coerce::with_default(
                    &__args,
                    #name,
                    || ::fastmcp::__private::serde_json::json!(#default),
                )?;
            };
        }
        if self.is_optional {
            return quote! {
                let #ident: #ty = ::fastmcp::coerce::optional(&__args, #name)?;
            };
        }
        quote! {
            let #ident: #ty = ::fastmcp::coerce::required(&__args, #name)?;
        }
    }

    /// Statement extracting this parameter from extracted URI segments.
    pub fn template_extraction(&self) -> TokenStream {
        let ident = &self.ident;
        let name = &self.name;
        let ty = &self.ty;
        quote! {
            let #ident: #ty = ::fastmcp::coerce::from_template(&__params, #name)?;
        }
    }

    /// Expression used when invoking the original method.
    pub fn call_arg(&self) -> TokenStream {
        if self.is_context {
            quote! { __ctx.clone() }
        } else {
            let ident = &self.ident;
            quote! { #ident }
        }
    }
}

/// `Some("...")`/`None` expression for an optional string.
pub fn option_string(value: Option<&str>) -> TokenStream {
    match value {
        Some(text) => quote! { ::std::option::Option::Some(#text.to_string()) },
        None => quote! { ::std::option::Option::None },
    }
}
