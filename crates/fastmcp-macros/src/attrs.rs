//! Attribute parsing for FastMCP markers.
//!
//! Syn-based parsers for the method-level markers (`#[tool]`, `#[resource]`,
//! `#[prompt]`) and the parameter-level `#[param]` marker. Every marker
//! accepts a keyword form; `#[tool]`/`#[prompt]` also accept a bare
//! description string, `#[resource]` leads with its mandatory URI, and
//! `#[param]` additionally accepts positional arguments in the order
//! `description, examples, required, schema`.

use syn::parse::{Parse, ParseStream};
use syn::{Expr, ExprArray, ExprLit, Lit, LitBool, LitStr, Token};

/// Pull the strings out of an `["a", "b"]` literal.
fn string_array(expr: &Expr) -> syn::Result<Vec<String>> {
    let Expr::Array(ExprArray { elems, .. }) = expr else {
        return Err(syn::Error::new_spanned(
            expr,
            "expected an array of strings, like [\"a\", \"b\"]",
        ));
    };
    elems
        .iter()
        .map(|elem| match elem {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Ok(s.value()),
            other => Err(syn::Error::new_spanned(other, "expected a string literal")),
        })
        .collect()
}

/// Arguments of the `#[tool]` marker.
#[derive(Debug, Default, Clone)]
pub struct ToolArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl ToolArgs {
    /// Parse from `#[tool]`, `#[tool("description")]`, or
    /// `#[tool(name = ..., description = ..., tags = [...])]`.
    pub fn parse(attr: &syn::Attribute) -> syn::Result<Self> {
        let mut args = Self::default();
        let syn::Meta::List(list) = &attr.meta else {
            return Ok(args);
        };

        // Bare string shorthand.
        if let Ok(lit) = syn::parse2::<LitStr>(list.tokens.clone()) {
            args.description = Some(lit.value());
            return Ok(args);
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                args.name = Some(value.value());
            } else if meta.path.is_ident("description") {
                let value: LitStr = meta.value()?.parse()?;
                args.description = Some(value.value());
            } else if meta.path.is_ident("tags") {
                let value: Expr = meta.value()?.parse()?;
                args.tags = string_array(&value)?;
            } else {
                return Err(meta.error(
                    "unknown tool attribute; expected `name`, `description`, or `tags`",
                ));
            }
            Ok(())
        })?;

        Ok(args)
    }
}

/// Arguments of the `#[prompt]` marker.
#[derive(Debug, Default, Clone)]
pub struct PromptArgs {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PromptArgs {
    /// Parse from `#[prompt]`, `#[prompt("description")]`, or
    /// `#[prompt(name = ..., description = ...)]`.
    pub fn parse(attr: &syn::Attribute) -> syn::Result<Self> {
        let mut args = Self::default();
        let syn::Meta::List(list) = &attr.meta else {
            return Ok(args);
        };

        if let Ok(lit) = syn::parse2::<LitStr>(list.tokens.clone()) {
            args.description = Some(lit.value());
            return Ok(args);
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                args.name = Some(value.value());
            } else if meta.path.is_ident("description") {
                let value: LitStr = meta.value()?.parse()?;
                args.description = Some(value.value());
            } else {
                return Err(
                    meta.error("unknown prompt attribute; expected `name` or `description`")
                );
            }
            Ok(())
        })?;

        Ok(args)
    }
}

/// Arguments of the `#[resource]` marker. The URI is mandatory and comes
/// first.
#[derive(Debug, Clone)]
pub struct ResourceArgs {
    pub uri: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
}

impl ResourceArgs {
    /// Parse from `#[resource("uri://...")]` or
    /// `#[resource("uri://...", name = ..., description = ..., mime_type = ...)]`.
    pub fn parse(attr: &syn::Attribute) -> syn::Result<Self> {
        let syn::Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[resource(\"uri://template\")]",
            ));
        };
        syn::parse2(list.tokens.clone())
    }
}

impl Parse for ResourceArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let uri: LitStr = input.parse()?;
        let mut args = Self {
            uri: uri.value(),
            name: None,
            description: None,
            mime_type: None,
        };

        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let key: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;
            match key.to_string().as_str() {
                "name" => args.name = Some(value.value()),
                "description" => args.description = Some(value.value()),
                "mime_type" => args.mime_type = Some(value.value()),
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!(
                            "unknown resource attribute `{other}`; expected `name`, \
                             `description`, or `mime_type`"
                        ),
                    ));
                }
            }
        }

        Ok(args)
    }
}

/// Arguments of the `#[param]` marker.
#[derive(Debug, Default, Clone)]
pub struct ParamArgs {
    pub description: Option<String>,
    pub examples: Vec<String>,
    pub required: Option<bool>,
    pub schema: Option<String>,
    pub default: Option<Lit>,
}

impl ParamArgs {
    /// Parse the contents of a `#[param(...)]` attribute.
    pub fn parse(attr: &syn::Attribute) -> syn::Result<Self> {
        match &attr.meta {
            syn::Meta::Path(_) => Ok(Self::default()),
            syn::Meta::List(list) => syn::parse2(list.tokens.clone()),
            syn::Meta::NameValue(nv) => Err(syn::Error::new_spanned(
                nv,
                "expected #[param(...)] with parenthesized arguments",
            )),
        }
    }
}

impl Parse for ParamArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = Self::default();
        // Positional slots, in order: description, examples, required,
        // schema.
        let mut position = 0usize;

        while !input.is_empty() {
            if input.peek(syn::Ident) && input.peek2(Token![=]) {
                let key: syn::Ident = input.parse()?;
                input.parse::<Token![=]>()?;
                match key.to_string().as_str() {
                    "description" => {
                        let value: LitStr = input.parse()?;
                        args.description = Some(value.value());
                    }
                    "examples" => {
                        let value: Expr = input.parse()?;
                        args.examples = string_array(&value)?;
                    }
                    "required" => {
                        let value: LitBool = input.parse()?;
                        args.required = Some(value.value());
                    }
                    "schema" => {
                        let value: LitStr = input.parse()?;
                        args.schema = Some(value.value());
                    }
                    "default" => {
                        let value: Lit = input.parse()?;
                        args.default = Some(value);
                    }
                    other => {
                        return Err(syn::Error::new(
                            key.span(),
                            format!(
                                "unknown param attribute `{other}`; expected `description`, \
                                 `examples`, `required`, `schema`, or `default`"
                            ),
                        ));
                    }
                }
            } else {
                let expr: Expr = input.parse()?;
                match position {
                    0 => match &expr {
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) => args.description = Some(s.value()),
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "first positional param argument is the description string",
                            ));
                        }
                    },
                    1 => args.examples = string_array(&expr)?,
                    2 => match &expr {
                        Expr::Lit(ExprLit {
                            lit: Lit::Bool(b), ..
                        }) => args.required = Some(b.value),
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "third positional param argument is the required flag",
                            ));
                        }
                    },
                    3 => match &expr {
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) => args.schema = Some(s.value()),
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "fourth positional param argument is the schema override string",
                            ));
                        }
                    },
                    _ => {
                        return Err(syn::Error::new_spanned(
                            expr,
                            "too many positional param arguments; the order is \
                             description, examples, required, schema",
                        ));
                    }
                }
                position += 1;
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// Arguments of the `#[server]` attribute.
#[derive(Debug, Default)]
pub struct ServerArgs {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl ServerArgs {
    /// Parse from the attribute token stream.
    pub fn parse(args: proc_macro2::TokenStream) -> syn::Result<Self> {
        let mut parsed = Self::default();
        if args.is_empty() {
            return Ok(parsed);
        }

        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.name = Some(value.value());
            } else if meta.path.is_ident("version") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.version = Some(value.value());
            } else if meta.path.is_ident("description") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.description = Some(value.value());
            } else {
                return Err(meta.error(
                    "unknown server attribute; expected `name`, `version`, or `description`",
                ));
            }
            Ok(())
        });
        syn::parse::Parser::parse2(parser, args)?;

        Ok(parsed)
    }
}
