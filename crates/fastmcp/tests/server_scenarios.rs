//! End-to-end scenarios driving the `#[server]` macro through the registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fastmcp::prelude::*;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Calculator {
    calls: Arc<AtomicU64>,
}

#[server(name = "calculator", version = "1.0.0", description = "A calculator service")]
impl Calculator {
    /// Add two numbers.
    #[tool]
    async fn add(&self, a: f64, b: f64) -> McpResult<f64> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(a + b)
    }

    #[tool(description = "Greet someone")]
    async fn greet(&self, name: String, title: Option<String>) -> String {
        match title {
            Some(title) => format!("{title} {name}"),
            None => name,
        }
    }

    #[tool]
    async fn calculator(
        &self,
        a: f64,
        b: f64,
        #[param(description = "Operation to apply", default = "ADD")] op: String,
    ) -> McpResult<f64> {
        match op.as_str() {
            "ADD" => Ok(a + b),
            "MULTIPLY" => Ok(a * b),
            other => Err(McpError::handler(format!("unknown operation {other}"))),
        }
    }

    #[tool]
    async fn create_user(
        &self,
        #[param(examples = ["john_doe", "jane_smith"])] username: String,
        email: String,
        age: u32,
    ) -> String {
        format!("{username} <{email}> ({age})")
    }

    #[tool]
    async fn process_task(
        &self,
        name: String,
        #[param(
            schema = r#"{"type":"string","enum":["pending","active","completed","cancelled"]}"#
        )]
        status: String,
    ) -> String {
        format!("{name}: {status}")
    }

    #[tool]
    async fn nothing(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    #[tool]
    async fn whoami(&self, ctx: RequestContext) -> String {
        match ctx.client_info() {
            Some(info) => format!("{} {}", info.name, info.version),
            None => "unknown".to_string(),
        }
    }

    #[resource("users://{user_id}", mime_type = "application/json")]
    async fn get_user(&self, user_id: String) -> McpResult<String> {
        Ok(format!("user {user_id}"))
    }

    /// Static application banner.
    #[resource("app://banner")]
    async fn banner(&self) -> String {
        "calculator".to_string()
    }

    #[prompt]
    async fn string_prompt(&self, param: String) -> String {
        format!("value is {param}")
    }
}

fn registered() -> McpRegistry {
    let registry = McpRegistry::new();
    Arc::new(Calculator::default()).register(&registry).unwrap();
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
        .unwrap_or_else(|| panic!("tool {name} not registered"))
        .input_schema
}

#[tokio::test]
async fn add_tool_computes_and_declares_required() {
    let registry = registered();

    let output = registry
        .call_tool("add", args(json!({"a": 1, "b": 2})), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("3"));

    let schema = tool_schema(&registry, "add");
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["required"], json!(["a", "b"]));
    assert_eq!(schema["properties"]["a"], json!({"type": "number"}));
}

#[tokio::test]
async fn optional_parameter_defaults_to_none() {
    let registry = registered();

    let output = registry
        .call_tool("greet", args(json!({"name": "Alice", "title": "Dr"})), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("Dr Alice"));

    let output = registry
        .call_tool("greet", args(json!({"name": "Alice"})), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("Alice"));

    let schema = tool_schema(&registry, "greet");
    assert_eq!(schema["required"], json!(["name"]));
    assert_eq!(schema["properties"]["title"], json!({"type": "string"}));
}

#[tokio::test]
async fn default_value_substitutes_missing_argument() {
    let registry = registered();

    let output = registry
        .call_tool(
            "calculator",
            args(json!({"a": 10, "b": 5, "op": "MULTIPLY"})),
            None,
        )
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("50"));

    let output = registry
        .call_tool("calculator", args(json!({"a": 10, "b": 5})), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("15"));

    // A defaulted parameter is not required.
    let schema = tool_schema(&registry, "calculator");
    assert_eq!(schema["required"], json!(["a", "b"]));
    assert_eq!(
        schema["properties"]["op"]["description"],
        json!("Operation to apply")
    );
}

#[tokio::test]
async fn examples_survive_into_schema() {
    let registry = registered();
    let schema = tool_schema(&registry, "create_user");
    assert_eq!(
        schema["properties"]["username"]["examples"],
        json!(["john_doe", "jane_smith"])
    );
    assert_eq!(schema["required"], json!(["age", "email", "username"]));
}

#[tokio::test]
async fn schema_override_replaces_property() {
    let registry = registered();
    let schema = tool_schema(&registry, "process_task");
    assert_eq!(schema["properties"]["status"]["type"], "string");
    assert_eq!(
        schema["properties"]["status"]["enum"],
        json!(["pending", "active", "completed", "cancelled"])
    );
}

#[tokio::test]
async fn null_result_yields_empty_content() {
    let registry = registered();
    let output = registry
        .call_tool("nothing", ArgumentMap::new(), None)
        .await
        .unwrap();
    assert!(output.content.is_empty());
}

#[tokio::test]
async fn context_is_injected_and_absent_from_schema() {
    let registry = registered();

    let schema = tool_schema(&registry, "whoami");
    assert!(schema["properties"].as_object().unwrap().is_empty());
    assert_eq!(schema["required"], json!([]));

    let ctx = RequestContext::new().with_client_info(ClientInfo::new("inspector", "0.4.0"));
    let output = registry
        .call_tool("whoami", ArgumentMap::new(), Some(ctx))
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("inspector 0.4.0"));

    // Without a caller-supplied context the handler sees the empty context.
    let output = registry
        .call_tool("whoami", ArgumentMap::new(), None)
        .await
        .unwrap();
    assert_eq!(output.first_text(), Some("unknown"));
}

#[tokio::test]
async fn template_resource_extracts_and_anchors() {
    let registry = registered();

    let output = registry.read_resource("users://42", None).await.unwrap();
    assert_eq!(output.as_text(), Some("user 42"));

    let miss = registry.read_resource("teams://42", None).await;
    assert!(matches!(miss, Err(McpError::ResourceNotFound(_))));

    let miss = registry.read_resource("users://42/extra", None).await;
    assert!(matches!(miss, Err(McpError::ResourceNotFound(_))));

    let templates = registry.list_resource_templates();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].uri, "users://{user_id}");
    assert_eq!(templates[0].mime_type, "application/json");
    let arguments = templates[0].arguments.as_ref().unwrap();
    assert_eq!(arguments[0].name, "user_id");
    assert!(arguments[0].required);
}

#[tokio::test]
async fn static_resource_reads_and_lists() {
    let registry = registered();

    let output = registry.read_resource("app://banner", None).await.unwrap();
    assert_eq!(output.as_text(), Some("calculator"));

    let resources = registry.list_resources();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].uri, "app://banner");
    assert_eq!(resources[0].mime_type, "text/plain");
    assert_eq!(
        resources[0].description.as_deref(),
        Some("Static application banner.")
    );
}

#[tokio::test]
async fn string_prompt_wraps_as_user_message() {
    let registry = registered();

    let messages = registry
        .get_prompt("string_prompt", args(json!({"param": "x"})), None)
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
    assert!(messages[0].content.as_text().unwrap().contains("x"));

    let prompts = registry.list_prompts();
    assert_eq!(prompts.len(), 1);
    let arguments = prompts[0].arguments.as_ref().unwrap();
    assert_eq!(arguments[0].name, "param");
    assert!(arguments[0].required);
}

#[tokio::test]
async fn missing_and_invalid_arguments_error() {
    let registry = registered();

    let err = registry
        .call_tool("add", args(json!({"a": 1})), None)
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::MissingParameter(name) if name == "b"));

    let err = registry
        .call_tool("add", args(json!({"a": 1, "b": "x"})), None)
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::Coercion { name, .. } if name == "b"));

    let err = registry
        .call_tool("missing_tool", ArgumentMap::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::ToolNotFound(_)));
}

#[tokio::test]
async fn handler_failures_propagate() {
    let registry = registered();
    let err = registry
        .call_tool(
            "calculator",
            args(json!({"a": 1, "b": 2, "op": "DIVIDE"})),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::Handler(message) if message.contains("DIVIDE")));
}

#[tokio::test]
async fn rescanning_the_host_type_yields_identical_schemas() {
    let first = registered();
    let second = registered();

    let mut a: Vec<_> = first.list_tools();
    let mut b: Vec<_> = second.list_tools();
    a.sort_by(|x, y| x.name.cmp(&y.name));
    b.sort_by(|x, y| x.name.cmp(&y.name));
    assert_eq!(a, b);
}

#[tokio::test]
async fn registering_twice_overwrites_with_warning_policy() {
    let registry = registered();
    // Default policy: warn and overwrite, registration succeeds.
    Arc::new(Calculator::default()).register(&registry).unwrap();
    assert_eq!(
        registry.list_tools().len(),
        7,
        "overwrite must not duplicate definitions"
    );

    let strict = McpRegistry::with_options(RegistryOptions {
        allow_overrides: false,
        warn_on_duplicates: false,
    });
    Arc::new(Calculator::default()).register(&strict).unwrap();
    let err = Arc::new(Calculator::default()).register(&strict).unwrap_err();
    assert!(matches!(err, McpError::DuplicateRegistration(_)));
}

#[tokio::test]
async fn schemas_contain_no_refs() {
    let registry = registered();
    for tool in registry.list_tools() {
        let rendered = tool.input_schema.to_string();
        assert!(!rendered.contains("$ref"), "{} leaks $ref", tool.name);
        assert!(
            tool.input_schema.get("$defs").is_none(),
            "{} leaks $defs",
            tool.name
        );
    }
}

#[test]
fn server_info_reports_attributes() {
    let info = Calculator::server_info();
    assert_eq!(info.name, "calculator");
    assert_eq!(info.version, "1.0.0");
    assert_eq!(info.description.as_deref(), Some("A calculator service"));
}
