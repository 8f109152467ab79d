//! Definition types describing registered server capabilities.
//!
//! These are the records the protocol runtime lists to clients:
//! [`ToolDefinition`] with its derived input schema, [`ResourceDefinition`]
//! for both static and templated resources, and [`PromptDefinition`] with its
//! argument descriptors. Definitions are created once during host-type
//! registration and are read-only afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default MIME type for resources that do not declare one.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Server identification produced by the `#[server]` macro.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    /// Server name (machine-readable identifier)
    pub name: String,
    /// Server version
    pub version: String,
    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServerInfo {
    /// Create server info with name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Tool definition.
///
/// `input_schema` is always an object schema; every non-context parameter of
/// the handler method appears in its `properties`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Tool name (machine-readable identifier)
    pub name: String,
    /// Tool description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Tags for categorization
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
}

impl ToolDefinition {
    /// Create a tool definition with an empty object schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: crate::schema::input_schema(&[]),
            tags: Vec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the input schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }
}

/// Resource definition, static or templated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceDefinition {
    /// Resource URI, or URI template when `is_template` is set
    pub uri: String,
    /// Resource name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resource description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource content
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Whether `uri` contains `{placeholder}` segments
    #[serde(skip)]
    pub is_template: bool,
    /// Template placeholder descriptors; absent for static resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<ResourceArgument>>,
}

impl ResourceDefinition {
    /// Create a static resource definition with the default MIME type.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
            description: None,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            is_template: false,
            arguments: None,
        }
    }

    /// Create a templated resource definition with its placeholder arguments.
    #[must_use]
    pub fn template(uri: impl Into<String>, arguments: Vec<ResourceArgument>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
            description: None,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            is_template: true,
            arguments: Some(arguments),
        }
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Placeholder descriptor for a templated resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceArgument {
    /// Placeholder name
    pub name: String,
    /// Argument description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the argument is required
    pub required: bool,
}

/// Prompt definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptDefinition {
    /// Prompt name (machine-readable identifier)
    pub name: String,
    /// Prompt description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Prompt arguments, one per non-context method parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

impl PromptDefinition {
    /// Create a prompt definition with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an argument.
    #[must_use]
    pub fn with_argument(mut self, argument: PromptArgument) -> Self {
        self.arguments.get_or_insert_with(Vec::new).push(argument);
        self
    }
}

/// Argument descriptor for a prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptArgument {
    /// Argument name, matching a method parameter
    pub name: String,
    /// Argument description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the argument is required
    pub required: bool,
}

impl PromptArgument {
    /// Create a required argument.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: true,
        }
    }

    /// Create an optional argument.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
        }
    }
}
