//! Derived argument types flowing through schema generation and dispatch.

use std::sync::Arc;

use fastmcp::prelude::*;
use serde_json::{Value, json};

#[derive(McpType, Debug, Clone, PartialEq)]
struct UserProfile {
    #[param(description = "Email address")]
    email: String,
    nickname: Option<String>,
    age: u32,
}

#[derive(McpType, Debug, Clone, Copy, PartialEq)]
enum Operation {
    Add,
    Multiply,
}

#[derive(Clone)]
struct TypedServer;

#[server(name = "typed")]
impl TypedServer {
    #[tool]
    async fn save_profile(&self, profile: UserProfile) -> String {
        match profile.nickname {
            Some(nickname) => format!("{} aka {nickname}", profile.email),
            None => profile.email,
        }
    }

    #[tool]
    async fn apply(&self, a: f64, b: f64, op: Operation) -> f64 {
        match op {
            Operation::Add => a + b,
            Operation::Multiply => a * b,
        }
    }

    #[tool]
    async fn tag_counts(&self, tags: Vec<String>, weights: Option<Vec<f64>>) -> String {
        format!("{}:{}", tags.len(), weights.map_or(0, |w| w.len()))
    }
}

fn registered() -> McpRegistry {
    let registry = McpRegistry::new();
    Arc::new(TypedServer).register(&registry).unwrap();
    registry
}

fn args(value: Value) -> ArgumentMap {
    value.as_object().cloned().unwrap()
}

fn tool_schema(registry: &McpRegistry, name: &str) -> Value {
    registry
        .list_tools()
        .into_iter()
        .find(|tool| tool.name == name)
        .unwrap()
        .input_schema
}

#[tokio::test]
async fn product_schema_lists_fields_in_declaration_order() {
    let registry = registered();
    let schema = tool_schema(&registry, "save_profile");
    let profile = &schema["properties"]["profile"];

    assert_eq!(profile["type"], "object");
    let keys: Vec<&String> = profile["properties"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["email", "nickname", "age"]);
    assert_eq!(profile["required"], json!(["email", "age"]));
    assert_eq!(
        profile["properties"]["email"]["description"],
        json!("Email address")
    );
}

#[tokio::test]
async fn product_coerces_nested_map() {
    let registry = registered();

    let output = registry
        .call_tool(
            "save_profile",
            args(json!({"profile": {"email": "a@b.c", "age": 30}})),
            None,
        )
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("a@b.c"));

    let output = registry
        .call_tool(
            "save_profile",
            args(json!({"profile": {"email": "a@b.c", "nickname": "ace", "age": "30"}})),
            None,
        )
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("a@b.c aka ace"));
}

#[tokio::test]
async fn product_missing_field_is_a_coercion_error() {
    let registry = registered();
    let err = registry
        .call_tool("save_profile", args(json!({"profile": {"age": 30}})), None)
        .await
        .unwrap_err();
    match err {
        McpError::Coercion { name, expected, .. } => {
            assert_eq!(name, "profile");
            assert!(expected.contains("email"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn sum_schema_is_string_enum() {
    let registry = registered();
    let schema = tool_schema(&registry, "apply");
    assert_eq!(
        schema["properties"]["op"],
        json!({"type": "string", "enum": ["Add", "Multiply"]})
    );
}

#[tokio::test]
async fn sum_matches_variant_names_case_insensitively() {
    let registry = registered();

    let output = registry
        .call_tool("apply", args(json!({"a": 10, "b": 5, "op": "multiply"})), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("50"));

    let output = registry
        .call_tool("apply", args(json!({"a": 10, "b": 5, "op": "Add"})), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("15"));

    let err = registry
        .call_tool("apply", args(json!({"a": 1, "b": 2, "op": "DIVIDE"})), None)
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::Coercion { name, .. } if name == "op"));
}

#[tokio::test]
async fn collections_accept_arrays_and_json_strings() {
    let registry = registered();

    let output = registry
        .call_tool(
            "tag_counts",
            args(json!({"tags": ["a", "b"], "weights": [1.0, 2.0, 3.0]})),
            None,
        )
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("2:3"));

    // A JSON-encoded array string coerces too.
    let output = registry
        .call_tool("tag_counts", args(json!({"tags": "[\"x\"]"})), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("1:0"));

    let schema = tool_schema(&registry, "tag_counts");
    assert_eq!(
        schema["properties"]["tags"],
        json!({"type": "array", "items": {"type": "string"}})
    );
    assert_eq!(schema["required"], json!(["tags"]));
}

#[test]
fn derived_coercion_is_usable_directly() {
    let profile: UserProfile =
        FromArgument::from_argument(&json!({"email": "x@y.z", "age": 7})).unwrap();
    assert_eq!(
        profile,
        UserProfile {
            email: "x@y.z".into(),
            nickname: None,
            age: 7,
        }
    );

    let op: Operation = FromArgument::from_argument(&json!("ADD")).unwrap();
    assert_eq!(op, Operation::Add);
}
