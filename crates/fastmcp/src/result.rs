//! Result envelopes and conversion traits for handler return values.
//!
//! Generated dispatchers end with a single conversion call, so handlers can
//! return plain values, `Option`s, or `Result`s:
//!
//! - [`IntoToolCall`] adapts tool returns to a [`ToolOutput`] content list.
//! - [`IntoResourceCall`] adapts resource returns to text or blob contents.
//! - [`IntoPromptCall`] adapts prompt returns to a message list.
//!
//! A handler `Err` surfaces through the dispatch future: an `McpError`
//! passes through unchanged, a string error becomes
//! [`McpError::Handler`]. Nothing is swallowed or downgraded to
//! error-flagged content.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::content::{Content, Message};
use crate::error::{McpError, McpResult};

/// Result of a tool invocation: an ordered list of content items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    /// Content items, possibly empty.
    pub content: Vec<Content>,
}

impl ToolOutput {
    /// An empty content list.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
        }
    }

    /// Text of the first text item, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(Content::as_text)
    }
}

/// Result of a resource read: text or raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceOutput {
    /// Textual contents
    Text(String),
    /// Binary contents
    Blob(Vec<u8>),
}

impl ResourceOutput {
    /// The text if these are textual contents.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Blob(_) => None,
        }
    }
}

/// Convert a tool handler's return value into the dispatch result.
pub trait IntoToolCall {
    /// Perform the conversion.
    ///
    /// # Errors
    ///
    /// `Result::Err` returns convert into their [`McpError`] form.
    fn into_tool_call(self) -> McpResult<ToolOutput>;
}

impl IntoToolCall for ToolOutput {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        Ok(self)
    }
}

impl IntoToolCall for String {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        Ok(ToolOutput::text(self))
    }
}

impl IntoToolCall for &str {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        Ok(ToolOutput::text(self))
    }
}

// Byte arrays become a single image item; the runtime has no better guess
// than an opaque octet stream for the MIME type.
impl IntoToolCall for Vec<u8> {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        Ok(ToolOutput {
            content: vec![Content::image(
                BASE64.encode(self),
                "application/octet-stream",
            )],
        })
    }
}

impl IntoToolCall for Content {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        Ok(ToolOutput {
            content: vec![self],
        })
    }
}

impl IntoToolCall for Vec<Content> {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        Ok(ToolOutput { content: self })
    }
}

impl IntoToolCall for () {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        Ok(ToolOutput::empty())
    }
}

macro_rules! display_into_tool_call {
    ($($ty:ty),* $(,)?) => {
        $(impl IntoToolCall for $ty {
            fn into_tool_call(self) -> McpResult<ToolOutput> {
                Ok(ToolOutput::text(self.to_string()))
            }
        })*
    };
}

display_into_tool_call!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool
);

impl IntoToolCall for serde_json::Value {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        match self {
            serde_json::Value::Null => Ok(ToolOutput::empty()),
            serde_json::Value::String(s) => Ok(ToolOutput::text(s)),
            other => Ok(ToolOutput::text(other.to_string())),
        }
    }
}

impl<T: IntoToolCall> IntoToolCall for Option<T> {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        match self {
            Some(value) => value.into_tool_call(),
            None => Ok(ToolOutput::empty()),
        }
    }
}

impl<T: IntoToolCall, E: Into<McpError>> IntoToolCall for Result<T, E> {
    fn into_tool_call(self) -> McpResult<ToolOutput> {
        match self {
            Ok(value) => value.into_tool_call(),
            Err(e) => Err(e.into()),
        }
    }
}

/// Convert a resource handler's return value into the dispatch result.
pub trait IntoResourceCall {
    /// Perform the conversion.
    ///
    /// # Errors
    ///
    /// `Result::Err` returns convert into their [`McpError`] form.
    fn into_resource_call(self) -> McpResult<ResourceOutput>;
}

impl IntoResourceCall for ResourceOutput {
    fn into_resource_call(self) -> McpResult<ResourceOutput> {
        Ok(self)
    }
}

impl IntoResourceCall for String {
    fn into_resource_call(self) -> McpResult<ResourceOutput> {
        Ok(ResourceOutput::Text(self))
    }
}

impl IntoResourceCall for &str {
    fn into_resource_call(self) -> McpResult<ResourceOutput> {
        Ok(ResourceOutput::Text(self.to_string()))
    }
}

impl IntoResourceCall for Vec<u8> {
    fn into_resource_call(self) -> McpResult<ResourceOutput> {
        Ok(ResourceOutput::Blob(self))
    }
}

impl<T: IntoResourceCall, E: Into<McpError>> IntoResourceCall for Result<T, E> {
    fn into_resource_call(self) -> McpResult<ResourceOutput> {
        match self {
            Ok(value) => value.into_resource_call(),
            Err(e) => Err(e.into()),
        }
    }
}

/// Convert a prompt handler's return value into the dispatch result.
///
/// A message list is returned verbatim; a bare string becomes a single
/// user-role text message, and other scalars are stringified the same way.
pub trait IntoPromptCall {
    /// Perform the conversion.
    ///
    /// # Errors
    ///
    /// `Result::Err` returns convert into their [`McpError`] form.
    fn into_prompt_call(self) -> McpResult<Vec<Message>>;
}

impl IntoPromptCall for Vec<Message> {
    fn into_prompt_call(self) -> McpResult<Vec<Message>> {
        Ok(self)
    }
}

impl IntoPromptCall for Message {
    fn into_prompt_call(self) -> McpResult<Vec<Message>> {
        Ok(vec![self])
    }
}

impl IntoPromptCall for String {
    fn into_prompt_call(self) -> McpResult<Vec<Message>> {
        Ok(vec![Message::user(self)])
    }
}

impl IntoPromptCall for &str {
    fn into_prompt_call(self) -> McpResult<Vec<Message>> {
        Ok(vec![Message::user(self)])
    }
}

macro_rules! display_into_prompt_call {
    ($($ty:ty),* $(,)?) => {
        $(impl IntoPromptCall for $ty {
            fn into_prompt_call(self) -> McpResult<Vec<Message>> {
                Ok(vec![Message::user(self.to_string())])
            }
        })*
    };
}

display_into_prompt_call!(i32, i64, u32, u64, f32, f64, bool);

impl<T: IntoPromptCall, E: Into<McpError>> IntoPromptCall for Result<T, E> {
    fn into_prompt_call(self) -> McpResult<Vec<Message>> {
        match self {
            Ok(value) => value.into_prompt_call(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Role;

    #[test]
    fn test_string_becomes_text_item() {
        let output = "Hello".to_string().into_tool_call().unwrap();
        assert_eq!(output.first_text(), Some("Hello"));
        assert_eq!(output.content.len(), 1);
    }

    #[test]
    fn test_bytes_become_octet_stream_image() {
        let output = vec![1u8, 2, 3].into_tool_call().unwrap();
        match &output.content[0] {
            Content::Image(image) => {
                assert_eq!(image.mime_type, "application/octet-stream");
                assert_eq!(image.data, BASE64.encode([1u8, 2, 3]));
            }
            other => panic!("expected image content, got {other:?}"),
        }
    }

    #[test]
    fn test_null_yields_empty_content() {
        let output = serde_json::Value::Null.into_tool_call().unwrap();
        assert!(output.content.is_empty());

        let output = ().into_tool_call().unwrap();
        assert!(output.content.is_empty());

        let output = Option::<String>::None.into_tool_call().unwrap();
        assert!(output.content.is_empty());
    }

    #[test]
    fn test_content_list_maps_elementwise() {
        let items = vec![Content::text("a"), Content::text("b")];
        let output = items.clone().into_tool_call().unwrap();
        assert_eq!(output.content, items);
    }

    #[test]
    fn test_scalars_render_as_text() {
        assert_eq!(42i64.into_tool_call().unwrap().first_text(), Some("42"));
        assert_eq!(true.into_tool_call().unwrap().first_text(), Some("true"));
        assert_eq!(
            serde_json::json!({"k": 1}).into_tool_call().unwrap().first_text(),
            Some("{\"k\":1}")
        );
    }

    #[test]
    fn test_handler_err_propagates() {
        let failed: Result<String, &str> = Err("boom");
        let err = failed.into_tool_call().unwrap_err();
        assert!(matches!(err, McpError::Handler(msg) if msg == "boom"));
    }

    #[test]
    fn test_prompt_string_wraps_as_user_message() {
        let messages = "describe x".into_prompt_call().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content.as_text(), Some("describe x"));
    }

    #[test]
    fn test_prompt_message_list_verbatim() {
        let list = vec![Message::assistant("a"), Message::user("b")];
        assert_eq!(list.clone().into_prompt_call().unwrap(), list);
    }

    #[test]
    fn test_resource_conversions() {
        assert_eq!(
            "body".to_string().into_resource_call().unwrap(),
            ResourceOutput::Text("body".into())
        );
        assert_eq!(
            vec![0u8, 1].into_resource_call().unwrap(),
            ResourceOutput::Blob(vec![0, 1])
        );
    }
}
