//! Value coercion from raw JSON arguments to declared parameter types.
//!
//! Generated dispatchers receive a name-keyed [`ArgumentMap`] of
//! [`serde_json::Value`]s and must produce the concrete argument tuple of the
//! user method. [`FromArgument`] is the conversion seam: one impl per type,
//! chosen statically by the code generator, with derive-generated impls for
//! product and sum types.
//!
//! Coercion is deliberately lenient where a JSON transport forces it to be:
//! booleans accept the usual string spellings, numbers accept numeric
//! strings (URI template extraction only ever yields strings), and
//! collections accept JSON-encoded strings. When the raw value already has
//! the right runtime shape it passes through untouched.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::error::{McpError, McpResult};

/// Name-keyed raw argument map, as decoded by the protocol runtime.
pub type ArgumentMap = serde_json::Map<String, Value>;

/// Failure to coerce a raw value to a declared type.
///
/// Carries a description of the expected type and a compact rendering of the
/// offending value; the dispatcher attaches the parameter name when wrapping
/// this into [`McpError::Coercion`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("expected {expected}, got {value}")]
pub struct CoercionError {
    /// Human-readable description of the expected type.
    pub expected: String,
    /// Compact rendering of the rejected value.
    pub value: String,
}

impl CoercionError {
    /// A value whose runtime shape does not match the expected type.
    #[must_use]
    pub fn mismatch(expected: impl Into<String>, value: &Value) -> Self {
        Self {
            expected: expected.into(),
            value: render(value),
        }
    }

    /// A product value missing one of its required fields.
    #[must_use]
    pub fn missing_field(product: &str, field: &str) -> Self {
        Self {
            expected: format!("{product} with field `{field}`"),
            value: format!("object without `{field}`"),
        }
    }

    /// Qualify the expected-type description with a field path segment.
    #[must_use]
    pub fn in_field(mut self, field: &str) -> Self {
        self.expected = format!("{} (in field `{field}`)", self.expected);
        self
    }
}

/// Render a raw value for an error message, eliding long payloads.
fn render(value: &Value) -> String {
    let text = value.to_string();
    if text.len() > 120 {
        format!("{}...", &text[..120])
    } else {
        text
    }
}

/// Conversion from a raw JSON argument to a concrete parameter type.
pub trait FromArgument: Sized {
    /// Coerce `value` into `Self`.
    ///
    /// # Errors
    ///
    /// Returns a [`CoercionError`] when the value cannot represent `Self`.
    fn from_argument(value: &Value) -> Result<Self, CoercionError>;
}

impl FromArgument for String {
    fn from_argument(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(CoercionError::mismatch("string", other)),
        }
    }
}

impl FromArgument for bool {
    fn from_argument(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                _ => Err(CoercionError::mismatch("boolean", value)),
            },
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(i != 0),
                None => Err(CoercionError::mismatch("boolean", value)),
            },
            other => Err(CoercionError::mismatch("boolean", other)),
        }
    }
}

macro_rules! integer_from_argument {
    ($($ty:ty),* $(,)?) => {
        $(impl FromArgument for $ty {
            fn from_argument(value: &Value) -> Result<Self, CoercionError> {
                let reject = || CoercionError::mismatch("integer", value);
                match value {
                    Value::Number(n) => {
                        if let Some(i) = n.as_i64() {
                            return <$ty>::try_from(i).map_err(|_| reject());
                        }
                        if let Some(u) = n.as_u64() {
                            return <$ty>::try_from(u).map_err(|_| reject());
                        }
                        // Floats are accepted only when integral.
                        match n.as_f64() {
                            Some(f) if f.fract() == 0.0 => {
                                let i = f as i64;
                                <$ty>::try_from(i).map_err(|_| reject())
                            }
                            _ => Err(reject()),
                        }
                    }
                    Value::String(s) => s.trim().parse::<$ty>().map_err(|_| reject()),
                    _ => Err(reject()),
                }
            }
        })*
    };
}

integer_from_argument!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_from_argument {
    ($($ty:ty),* $(,)?) => {
        $(impl FromArgument for $ty {
            fn from_argument(value: &Value) -> Result<Self, CoercionError> {
                match value {
                    Value::Number(n) => n
                        .as_f64()
                        .map(|f| f as $ty)
                        .ok_or_else(|| CoercionError::mismatch("number", value)),
                    Value::String(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|_| CoercionError::mismatch("number", value)),
                    _ => Err(CoercionError::mismatch("number", value)),
                }
            }
        })*
    };
}

float_from_argument!(f32, f64);

impl<T: FromArgument> FromArgument for Option<T> {
    fn from_argument(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_argument(other).map(Some),
        }
    }
}

impl<T: FromArgument> FromArgument for Vec<T> {
    fn from_argument(value: &Value) -> Result<Self, CoercionError> {
        let items = match value {
            Value::Array(items) => items.clone(),
            // A JSON-encoded array arriving as a string.
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => items,
                _ => return Err(CoercionError::mismatch("array", value)),
            },
            _ => return Err(CoercionError::mismatch("array", value)),
        };
        items.iter().map(T::from_argument).collect()
    }
}

fn object_entries(value: &Value) -> Result<ArgumentMap, CoercionError> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        // A JSON-encoded object arriving as a string.
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(CoercionError::mismatch("object", value)),
        },
        _ => Err(CoercionError::mismatch("object", value)),
    }
}

impl<V: FromArgument, S: std::hash::BuildHasher + Default> FromArgument for HashMap<String, V, S> {
    fn from_argument(value: &Value) -> Result<Self, CoercionError> {
        object_entries(value)?
            .iter()
            .map(|(k, v)| Ok((k.clone(), V::from_argument(v).map_err(|e| e.in_field(k))?)))
            .collect()
    }
}

impl<V: FromArgument> FromArgument for BTreeMap<String, V> {
    fn from_argument(value: &Value) -> Result<Self, CoercionError> {
        object_entries(value)?
            .iter()
            .map(|(k, v)| Ok((k.clone(), V::from_argument(v).map_err(|e| e.in_field(k))?)))
            .collect()
    }
}

impl FromArgument for Value {
    fn from_argument(value: &Value) -> Result<Self, CoercionError> {
        Ok(value.clone())
    }
}

/// Look up and coerce a required parameter.
///
/// # Errors
///
/// [`McpError::MissingParameter`] when absent, [`McpError::Coercion`] when
/// present but not convertible.
pub fn required<T: FromArgument>(args: &ArgumentMap, name: &str) -> McpResult<T> {
    let value = args
        .get(name)
        .ok_or_else(|| McpError::MissingParameter(name.to_string()))?;
    T::from_argument(value).map_err(|e| McpError::coercion(name, e))
}

/// Look up and coerce an optional parameter; absent or `null` yields `None`.
///
/// # Errors
///
/// [`McpError::Coercion`] when a present value is not convertible.
pub fn optional<T: FromArgument>(args: &ArgumentMap, name: &str) -> McpResult<Option<T>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::from_argument(value)
            .map(Some)
            .map_err(|e| McpError::coercion(name, e)),
    }
}

/// Look up and coerce a parameter, substituting `default` when absent.
///
/// # Errors
///
/// [`McpError::Coercion`] when the supplied value or the default is not
/// convertible.
pub fn with_default<T: FromArgument>(
    args: &ArgumentMap,
    name: &str,
    default: impl FnOnce() -> Value,
) -> McpResult<T> {
    match args.get(name) {
        Some(value) => T::from_argument(value).map_err(|e| McpError::coercion(name, e)),
        None => T::from_argument(&default()).map_err(|e| McpError::coercion(name, e)),
    }
}

/// Coerce a URI template extraction (always a string) to the declared type.
///
/// # Errors
///
/// [`McpError::MissingParameter`] when the placeholder was not extracted,
/// [`McpError::Coercion`] when the segment is not convertible.
pub fn from_template<T: FromArgument>(
    params: &HashMap<String, String>,
    name: &str,
) -> McpResult<T> {
    let segment = params
        .get(name)
        .ok_or_else(|| McpError::MissingParameter(name.to_string()))?;
    let value = Value::String(segment.clone());
    T::from_argument(&value).map_err(|e| McpError::coercion(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ArgumentMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_passthrough_when_shape_matches() {
        assert_eq!(String::from_argument(&json!("hi")).unwrap(), "hi");
        assert_eq!(i64::from_argument(&json!(42)).unwrap(), 42);
        assert_eq!(f64::from_argument(&json!(1.5)).unwrap(), 1.5);
        assert!(bool::from_argument(&json!(true)).unwrap());
    }

    #[test]
    fn test_bool_spellings() {
        for truthy in ["true", "YES", "1", "On"] {
            assert!(bool::from_argument(&json!(truthy)).unwrap(), "{truthy}");
        }
        for falsy in ["false", "no", "0", "OFF"] {
            assert!(!bool::from_argument(&json!(falsy)).unwrap(), "{falsy}");
        }
        assert!(bool::from_argument(&json!(7)).unwrap());
        assert!(!bool::from_argument(&json!(0)).unwrap());
        assert!(bool::from_argument(&json!("maybe")).is_err());
    }

    #[test]
    fn test_integer_forms() {
        assert_eq!(i64::from_argument(&json!("17")).unwrap(), 17);
        assert_eq!(u32::from_argument(&json!(3.0)).unwrap(), 3);
        assert!(i64::from_argument(&json!(3.5)).is_err());
        assert!(u8::from_argument(&json!(-1)).is_err());
        assert!(i64::from_argument(&json!("seven")).is_err());
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(f64::from_argument(&json!(3)).unwrap(), 3.0);
        assert_eq!(f64::from_argument(&json!("2.5")).unwrap(), 2.5);
        assert!(f64::from_argument(&json!([])).is_err());
    }

    #[test]
    fn test_list_forms() {
        let direct: Vec<i64> = FromArgument::from_argument(&json!([1, 2, 3])).unwrap();
        assert_eq!(direct, vec![1, 2, 3]);

        let encoded: Vec<i64> = FromArgument::from_argument(&json!("[4, 5]")).unwrap();
        assert_eq!(encoded, vec![4, 5]);

        let bad: Result<Vec<i64>, _> = FromArgument::from_argument(&json!("not json"));
        assert!(bad.is_err());
    }

    #[test]
    fn test_map_forms() {
        let direct: HashMap<String, i64> =
            FromArgument::from_argument(&json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(direct["a"], 1);

        let encoded: HashMap<String, i64> =
            FromArgument::from_argument(&json!("{\"c\": 3}")).unwrap();
        assert_eq!(encoded["c"], 3);
    }

    #[test]
    fn test_option_null_sentinel() {
        let none: Option<String> = FromArgument::from_argument(&Value::Null).unwrap();
        assert_eq!(none, None);

        let some: Option<String> = FromArgument::from_argument(&json!("x")).unwrap();
        assert_eq!(some, Some("x".to_string()));
    }

    #[test]
    fn test_required_lookup() {
        let map = args(json!({"a": 1}));
        let a: i64 = required(&map, "a").unwrap();
        assert_eq!(a, 1);

        let missing = required::<i64>(&map, "b");
        assert!(matches!(missing, Err(McpError::MissingParameter(name)) if name == "b"));
    }

    #[test]
    fn test_optional_lookup() {
        let map = args(json!({"title": null}));
        let absent: Option<String> = optional(&map, "missing").unwrap();
        let null: Option<String> = optional(&map, "title").unwrap();
        assert_eq!(absent, None);
        assert_eq!(null, None);
    }

    #[test]
    fn test_with_default() {
        let map = args(json!({"op": "MULTIPLY"}));
        let op: String = with_default(&map, "op", || json!("ADD")).unwrap();
        assert_eq!(op, "MULTIPLY");

        let empty = args(json!({}));
        let op: String = with_default(&empty, "op", || json!("ADD")).unwrap();
        assert_eq!(op, "ADD");
    }

    #[test]
    fn test_from_template_coerces_segments() {
        let mut params = HashMap::new();
        params.insert("user_id".to_string(), "42".to_string());

        let as_string: String = from_template(&params, "user_id").unwrap();
        assert_eq!(as_string, "42");

        let as_int: u64 = from_template(&params, "user_id").unwrap();
        assert_eq!(as_int, 42);
    }

    #[test]
    fn test_coercion_error_carries_value() {
        let map = args(json!({"count": "abc"}));
        let err = required::<i64>(&map, "count").unwrap_err();
        match err {
            McpError::Coercion {
                name,
                expected,
                value,
            } => {
                assert_eq!(name, "count");
                assert_eq!(expected, "integer");
                assert_eq!(value, "\"abc\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
