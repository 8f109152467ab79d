//! `#[derive(McpType)]` for user-defined argument types.
//!
//! Structs with named fields derive a `Product` shape and a field-by-field
//! coercer; enums whose variants are all nullary derive a `Sum` shape and a
//! case-insensitive variant-name coercer. Both halves come from the same
//! declaration, so the schema a client sees and the coercion its arguments
//! go through always agree.
//!
//! Field descriptions come from field-level `#[param(description = "...")]`
//! markers.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attrs::ParamArgs;
use crate::signature::is_option_type;

/// Entry point for the derive macro.
pub fn expand_derive(input: &DeriveInput) -> syn::Result<TokenStream> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_product(input, fields),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "McpType can only be derived for structs with named fields",
            )),
        },
        Data::Enum(data) => expand_sum(input, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "McpType cannot be derived for unions",
        )),
    }
}

/// Field-level `#[param]`: only `description` applies to fields.
fn field_param(field: &syn::Field) -> syn::Result<ParamArgs> {
    let mut attrs = field.attrs.iter().filter(|attr| attr.path().is_ident("param"));
    let Some(attr) = attrs.next() else {
        return Ok(ParamArgs::default());
    };
    if attrs.next().is_some() {
        return Err(syn::Error::new_spanned(field, "duplicate #[param] attribute"));
    }
    let args = ParamArgs::parse(attr)?;
    if !args.examples.is_empty()
        || args.required.is_some()
        || args.schema.is_some()
        || args.default.is_some()
    {
        return Err(syn::Error::new_spanned(
            attr,
            "only `description` is supported in field-level #[param] markers",
        ));
    }
    Ok(args)
}

fn expand_product(input: &DeriveInput, fields: &syn::FieldsNamed) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut field_shapes = Vec::new();
    let mut field_coercions = Vec::new();

    for field in &fields.named {
        let ident = field.ident.as_ref().expect("named fields have identifiers");
        let field_name = ident.to_string();
        let ty = &field.ty;
        let optional = is_option_type(ty);
        let param = field_param(field)?;
        let description = match &param.description {
            Some(text) => quote! { ::std::option::Option::Some(#text.to_string()) },
            None => quote! { ::std::option::Option::None },
        };

        field_shapes.push(quote! {
            ::fastmcp::FieldShape {
                name: #field_name.to_string(),
                shape: <#ty as ::fastmcp::McpType>::shape(),
                optional: #optional,
                description: #description,
            }
        });

        let missing = if optional {
            quote! { ::std::option::Option::None }
        } else {
            quote! {
                return ::std::result::Result::Err(
                    ::fastmcp::CoercionError::missing_field(#name_str, #field_name),
                )
            }
        };
        field_coercions.push(quote! {
            #ident: match obj.get(#field_name) {
                ::std::option::Option::Some(v) => {
                    ::fastmcp::FromArgument::from_argument(v)
                        .map_err(|e| e.in_field(#field_name))?
                }
                ::std::option::Option::None => #missing,
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::fastmcp::McpType for #name #ty_generics #where_clause {
            fn shape() -> ::fastmcp::TypeShape {
                ::fastmcp::TypeShape::Product {
                    name: #name_str.to_string(),
                    fields: vec![#(#field_shapes),*],
                }
            }
        }

        impl #impl_generics ::fastmcp::FromArgument for #name #ty_generics #where_clause {
            fn from_argument(
                value: &::fastmcp::__private::serde_json::Value,
            ) -> ::std::result::Result<Self, ::fastmcp::CoercionError> {
                let obj = match value {
                    ::fastmcp::__private::serde_json::Value::Object(map) => map,
                    _ => {
                        return ::std::result::Result::Err(
                            ::fastmcp::CoercionError::mismatch(#name_str, value),
                        );
                    }
                };
                ::std::result::Result::Ok(Self {
                    #(#field_coercions),*
                })
            }
        }
    })
}

fn expand_sum(input: &DeriveInput, data: &syn::DataEnum) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut variant_names = Vec::new();
    let mut variant_matches = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "McpType enums must have only unit variants",
            ));
        }
        let ident = &variant.ident;
        let variant_name = ident.to_string();
        variant_matches.push(quote! {
            if s.eq_ignore_ascii_case(#variant_name) {
                return ::std::result::Result::Ok(Self::#ident);
            }
        });
        variant_names.push(variant_name);
    }

    Ok(quote! {
        impl #impl_generics ::fastmcp::McpType for #name #ty_generics #where_clause {
            fn shape() -> ::fastmcp::TypeShape {
                ::fastmcp::TypeShape::Sum {
                    name: #name_str.to_string(),
                    variants: vec![#(#variant_names.to_string()),*],
                }
            }
        }

        impl #impl_generics ::fastmcp::FromArgument for #name #ty_generics #where_clause {
            fn from_argument(
                value: &::fastmcp::__private::serde_json::Value,
            ) -> ::std::result::Result<Self, ::fastmcp::CoercionError> {
                let ::std::option::Option::Some(s) = value.as_str() else {
                    return ::std::result::Result::Err(
                        ::fastmcp::CoercionError::mismatch(#name_str, value),
                    );
                };
                #(#variant_matches)*
                ::std::result::Result::Err(::fastmcp::CoercionError::mismatch(#name_str, value))
            }
        }
    })
}
