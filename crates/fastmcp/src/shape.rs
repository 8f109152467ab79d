//! Structural type descriptions for schema derivation and coercion.
//!
//! A [`TypeShape`] is a pure-structural description of a parameter type,
//! computed once per type through the [`McpType`] trait. The schema generator
//! walks shapes to emit JSON Schema; the coercion layer mirrors the same
//! structure, so the two can never drift apart.
//!
//! Built-in impls cover scalars, `Option`, `Vec`, and string-keyed maps.
//! User-defined product and sum types plug in with `#[derive(McpType)]`;
//! anything else can implement the trait by hand, typically returning
//! [`TypeShape::Opaque`].

use std::collections::{BTreeMap, HashMap};

/// Structural description of a parameter type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// UTF-8 string.
    String,
    /// Integer-like scalar.
    Integer,
    /// Floating-point scalar.
    Number,
    /// Boolean scalar.
    Boolean,
    /// Optional container; demotes the parameter from `required`.
    Optional(Box<TypeShape>),
    /// Ordered collection.
    List(Box<TypeShape>),
    /// Associative collection with string-convertible keys.
    Map(Box<TypeShape>, Box<TypeShape>),
    /// User-defined product type with named fields in declaration order.
    Product {
        /// Type name, used in coercion diagnostics.
        name: String,
        /// Fields in declaration order.
        fields: Vec<FieldShape>,
    },
    /// User-defined sum type whose variants are all nullary.
    Sum {
        /// Type name, used in coercion diagnostics.
        name: String,
        /// Variant names in declaration order.
        variants: Vec<String>,
    },
    /// Any other reference type; serialized as a permissive object.
    Opaque {
        /// Type name, for diagnostics only.
        name: String,
    },
}

/// One field of a [`TypeShape::Product`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    /// Field name as it appears in argument maps.
    pub name: String,
    /// Field shape.
    pub shape: TypeShape,
    /// Whether the field may be absent.
    pub optional: bool,
    /// Field description, sourced from a field-level `#[param]` marker.
    pub description: Option<String>,
}

impl TypeShape {
    /// Whether this shape is the optional container.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Short human-readable rendering used in coercion diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".into(),
            Self::Integer => "integer".into(),
            Self::Number => "number".into(),
            Self::Boolean => "boolean".into(),
            Self::Optional(inner) => format!("optional {}", inner.describe()),
            Self::List(inner) => format!("array of {}", inner.describe()),
            Self::Map(_, value) => format!("map of {}", value.describe()),
            Self::Product { name, .. } | Self::Sum { name, .. } | Self::Opaque { name } => {
                name.clone()
            }
        }
    }
}

/// Types that carry a structural description.
///
/// Implemented for scalars and standard containers below, and derivable for
/// user-defined structs and unit enums with `#[derive(McpType)]`.
pub trait McpType {
    /// The structural shape of this type.
    fn shape() -> TypeShape;
}

impl McpType for String {
    fn shape() -> TypeShape {
        TypeShape::String
    }
}

impl McpType for bool {
    fn shape() -> TypeShape {
        TypeShape::Boolean
    }
}

macro_rules! integer_shapes {
    ($($ty:ty),* $(,)?) => {
        $(impl McpType for $ty {
            fn shape() -> TypeShape {
                TypeShape::Integer
            }
        })*
    };
}

integer_shapes!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl McpType for f32 {
    fn shape() -> TypeShape {
        TypeShape::Number
    }
}

impl McpType for f64 {
    fn shape() -> TypeShape {
        TypeShape::Number
    }
}

impl<T: McpType> McpType for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Optional(Box::new(T::shape()))
    }
}

impl<T: McpType> McpType for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::List(Box::new(T::shape()))
    }
}

impl<V: McpType, S> McpType for HashMap<String, V, S> {
    fn shape() -> TypeShape {
        TypeShape::Map(Box::new(TypeShape::String), Box::new(V::shape()))
    }
}

impl<V: McpType> McpType for BTreeMap<String, V> {
    fn shape() -> TypeShape {
        TypeShape::Map(Box::new(TypeShape::String), Box::new(V::shape()))
    }
}

impl McpType for serde_json::Value {
    fn shape() -> TypeShape {
        TypeShape::Opaque {
            name: "Value".into(),
        }
    }
}
