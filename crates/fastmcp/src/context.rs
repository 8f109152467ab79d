//! Per-request context threaded through handler invocations.
//!
//! The protocol runtime creates one [`RequestContext`] per request and hands
//! it to the registry call; generated dispatchers inject it into handlers
//! that declare a `RequestContext` parameter. Handlers get read-only access
//! to caller identity and capabilities and must not retain the context after
//! the call returns.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Client identification advertised during initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientInfo {
    /// Client name
    pub name: String,
    /// Client version
    pub version: String,
}

impl ClientInfo {
    /// Create client info with name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Opaque per-request handle with read-only accessors.
///
/// Cheap to clone; all state is behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug, Clone, Default)]
struct ContextInner {
    request_id: String,
    client_info: Option<ClientInfo>,
    client_capabilities: Option<Value>,
    metadata: HashMap<String, Value>,
}

impl RequestContext {
    /// Create a context with a fresh request id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContextInner {
                request_id: Uuid::new_v4().to_string(),
                ..Default::default()
            }),
        }
    }

    /// The empty context, injected when the caller supplied none.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach client identification.
    #[must_use]
    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.make_mut().client_info = Some(client_info);
        self
    }

    /// Attach the client's advertised capabilities.
    #[must_use]
    pub fn with_client_capabilities(mut self, capabilities: Value) -> Self {
        self.make_mut().client_capabilities = Some(capabilities);
        self
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.make_mut().metadata.insert(key.into(), value);
        self
    }

    // Builder methods run before the context is shared, so this never clones
    // in practice.
    fn make_mut(&mut self) -> &mut ContextInner {
        Arc::make_mut(&mut self.inner)
    }

    /// Unique id of the request this context belongs to.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.inner.request_id
    }

    /// Client identification, when the runtime supplied it.
    #[must_use]
    pub fn client_info(&self) -> Option<&ClientInfo> {
        self.inner.client_info.as_ref()
    }

    /// Client capabilities, when the runtime supplied them.
    #[must_use]
    pub fn client_capabilities(&self) -> Option<&Value> {
        self.inner.client_capabilities.as_ref()
    }

    /// Look up a metadata entry.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.inner.metadata.get(key)
    }
}
