//! Content and message envelope types.
//!
//! [`Content`] is the tag-discriminated union carried by tool results and
//! prompt messages: text, base64 image data, or an embedded resource.
//! Embedded resource contents hold either text or a base64 blob, never both -
//! the enum makes the exclusivity structural.

use serde::{Deserialize, Serialize};

/// Role in a prompt message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role (human or client)
    #[default]
    User,
    /// Assistant role (AI or server)
    Assistant,
}

/// Content block in MCP messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Content {
    /// Text content
    #[serde(rename = "text")]
    Text(TextContent),
    /// Image content (base64 encoded)
    #[serde(rename = "image")]
    Image(ImageContent),
    /// Embedded resource content
    #[serde(rename = "resource")]
    Resource(EmbeddedResource),
}

impl Content {
    /// Create text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextContent { text: text.into() })
    }

    /// Create image content from base64 data.
    #[must_use]
    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image(ImageContent {
            data: data.into(),
            mime_type: mime_type.into(),
        })
    }

    /// Create embedded text resource content.
    #[must_use]
    pub fn resource(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Resource(EmbeddedResource {
            resource: ResourceContents::Text(TextResourceContents {
                uri: uri.into(),
                mime_type: Some("text/plain".into()),
                text: text.into(),
            }),
        })
    }

    /// Get the text if this is text content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(&t.text),
            _ => None,
        }
    }
}

/// Plain text content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextContent {
    /// UTF-8 text
    pub text: String,
}

/// Base64-encoded image content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageContent {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type of the image
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Resource content embedded in a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedResource {
    /// The embedded contents
    pub resource: ResourceContents,
}

/// Contents of a resource: text or base64 blob, exactly one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResourceContents {
    /// Textual resource contents
    Text(TextResourceContents),
    /// Binary resource contents
    Blob(BlobResourceContents),
}

impl ResourceContents {
    /// URI of the resource these contents came from.
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Self::Text(t) => &t.uri,
            Self::Blob(b) => &b.uri,
        }
    }
}

/// Textual resource contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextResourceContents {
    /// Source URI
    pub uri: String,
    /// MIME type of the text
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// The text itself
    pub text: String,
}

/// Binary resource contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlobResourceContents {
    /// Source URI
    pub uri: String,
    /// MIME type of the blob
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64-encoded bytes
    pub blob: String,
}

/// A prompt message: a role plus one content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Speaker role
    pub role: Role,
    /// Message content
    pub content: Content,
}

impl Message {
    /// Create a user-role text message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::text(text),
        }
    }

    /// Create an assistant-role text message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::text(text),
        }
    }

    /// Create a message with an explicit role and content block.
    #[must_use]
    pub fn new(role: Role, content: Content) -> Self {
        Self { role, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_serde_tags() {
        let text = serde_json::to_value(Content::text("hi")).unwrap();
        assert_eq!(text["type"], "text");
        assert_eq!(text["text"], "hi");

        let image = serde_json::to_value(Content::image("aGk=", "image/png")).unwrap();
        assert_eq!(image["type"], "image");
        assert_eq!(image["mimeType"], "image/png");
    }

    #[test]
    fn test_embedded_resource_text_xor_blob() {
        let embedded = serde_json::to_value(Content::resource("docs://readme", "hello")).unwrap();
        assert_eq!(embedded["type"], "resource");
        assert_eq!(embedded["resource"]["text"], "hello");
        assert!(embedded["resource"].get("blob").is_none());

        let blob = ResourceContents::Blob(BlobResourceContents {
            uri: "docs://logo".into(),
            mime_type: Some("image/png".into()),
            blob: "aGk=".into(),
        });
        let value = serde_json::to_value(&blob).unwrap();
        assert!(value.get("text").is_none());
        assert_eq!(value["blob"], "aGk=");
    }

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content.as_text(), Some("hello"));

        let roundtrip: Message =
            serde_json::from_str(&serde_json::to_string(&Message::assistant("ok")).unwrap())
                .unwrap();
        assert_eq!(roundtrip.role, Role::Assistant);
    }
}
