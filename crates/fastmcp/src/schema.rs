//! JSON Schema derivation for tool and prompt argument lists.
//!
//! Schema generation is a pure function of the parameter shapes plus their
//! `#[param]` metadata: re-running it over the same signature always yields
//! byte-identical output. The emitted document is fully inlined - any
//! `$defs`/`$ref` pairs (overrides may introduce them) are resolved before
//! emission.

use serde_json::{Map, Value, json};

use crate::shape::TypeShape;

/// Everything the generator needs to know about one formal parameter.
///
/// Constructed by the `#[server]` macro; the context parameter never appears
/// here.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Parameter name as it appears in the argument map.
    pub name: String,
    /// Structural shape of the declared type.
    pub shape: TypeShape,
    /// Description from the `#[param]` marker.
    pub description: Option<String>,
    /// Example values from the `#[param]` marker.
    pub examples: Vec<String>,
    /// Explicit required override from the `#[param]` marker.
    pub required: Option<bool>,
    /// Raw JSON text that fully replaces the generated property subschema.
    pub schema_override: Option<String>,
    /// Whether the parameter carries a `#[param(default = ...)]` value.
    pub has_default: bool,
}

impl ParameterSpec {
    /// A bare parameter with no metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            description: None,
            examples: Vec::new(),
            required: None,
            schema_override: None,
            has_default: false,
        }
    }

    /// Whether this parameter lands in the top-level `required` array.
    ///
    /// Required unless the shape is optional, the marker says otherwise, or a
    /// default exists.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.shape.is_optional() && self.required.unwrap_or(true) && !self.has_default
    }
}

/// Produce the `input_schema` object for an argument list.
///
/// Top-level contract: `"type": "object"`, `properties` keyed by parameter
/// name in declaration order, `required` sorted ascending, no `$defs` or
/// resolvable `$ref` anywhere in the output.
#[must_use]
pub fn input_schema(parameters: &[ParameterSpec]) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for param in parameters {
        let mut subschema = shape_schema(&param.shape);

        // Overrides from #[param] apply last; a full schema override replaces
        // the generated subschema wholesale, falling back silently when the
        // override text is not valid JSON.
        if let Some(raw) = &param.schema_override
            && let Ok(replacement) = serde_json::from_str::<Value>(raw)
        {
            subschema = replacement;
        }
        if let Some(description) = &param.description
            && let Some(obj) = subschema.as_object_mut()
        {
            obj.insert("description".to_string(), json!(description));
        }
        if !param.examples.is_empty()
            && let Some(obj) = subschema.as_object_mut()
        {
            obj.insert("examples".to_string(), json!(param.examples));
        }

        properties.insert(param.name.clone(), subschema);
        if param.is_required() {
            required.push(param.name.clone());
        }
    }

    required.sort();

    inline_refs(json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    }))
}

/// Subschema for a single shape.
#[must_use]
pub fn shape_schema(shape: &TypeShape) -> Value {
    match shape {
        TypeShape::String => json!({"type": "string"}),
        TypeShape::Integer => json!({"type": "integer"}),
        TypeShape::Number => json!({"type": "number"}),
        TypeShape::Boolean => json!({"type": "boolean"}),
        // The optional container is transparent in the property position; it
        // only demotes the parameter from `required`.
        TypeShape::Optional(inner) => shape_schema(inner),
        TypeShape::List(inner) => json!({"type": "array", "items": shape_schema(inner)}),
        TypeShape::Map(_, value) => {
            json!({"type": "object", "additionalProperties": shape_schema(value)})
        }
        TypeShape::Product { fields, .. } => {
            let mut properties = Map::new();
            let mut required = Vec::new();
            for field in fields {
                let mut subschema = shape_schema(&field.shape);
                if let Some(description) = &field.description
                    && let Some(obj) = subschema.as_object_mut()
                {
                    obj.insert("description".to_string(), json!(description));
                }
                properties.insert(field.name.clone(), subschema);
                if !field.optional {
                    required.push(field.name.clone());
                }
            }
            json!({"type": "object", "properties": properties, "required": required})
        }
        TypeShape::Sum { variants, .. } => json!({"type": "string", "enum": variants}),
        TypeShape::Opaque { .. } => json!({"type": "object"}),
    }
}

/// Inline every resolvable `{"$ref": "#/$defs/X"}` and drop the `$defs` table.
///
/// Definitions may reference each other; resolution recurses into the
/// replacement. Unresolvable refs (unknown names, or cycles) are left in
/// place.
#[must_use]
pub fn inline_refs(mut schema: Value) -> Value {
    let defs = match schema
        .as_object_mut()
        .and_then(|obj| obj.shift_remove("$defs"))
    {
        Some(Value::Object(defs)) => defs,
        Some(other) => {
            // Malformed $defs: put it back untouched.
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("$defs".to_string(), other);
            }
            return schema;
        }
        None => return schema,
    };

    let mut stack = Vec::new();
    substitute(&mut schema, &defs, &mut stack);
    schema
}

const REF_PREFIX: &str = "#/$defs/";

fn substitute(value: &mut Value, defs: &Map<String, Value>, stack: &mut Vec<String>) {
    if let Some(name) = ref_target(value) {
        // Cycles stay as refs rather than expanding forever.
        if stack.iter().any(|seen| seen == &name) {
            return;
        }
        if let Some(definition) = defs.get(&name) {
            let mut replacement = definition.clone();
            stack.push(name);
            substitute(&mut replacement, defs, stack);
            stack.pop();
            *value = replacement;
        }
        return;
    }

    match value {
        Value::Object(obj) => {
            for entry in obj.values_mut() {
                substitute(entry, defs, stack);
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute(item, defs, stack);
            }
        }
        _ => {}
    }
}

fn ref_target(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    let target = obj.get("$ref")?.as_str()?;
    target.strip_prefix(REF_PREFIX).map(str::to_string)
}
