//! In-process registry of tools, resources, and prompts.
//!
//! The registry owns `(definition, dispatcher)` pairs and answers the
//! protocol runtime's lookups, listings, and calls. Writes happen during
//! initialization; afterwards the maps are read-mostly and safe for
//! concurrent lookups from any thread. Registration that happens strictly
//! before the first request is visible to every request.
//!
//! Static resources and keyed endpoints live in sharded [`DashMap`]s.
//! Resource templates live in an ordered list because matching walks them in
//! declaration order and takes the first hit.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::coerce::ArgumentMap;
use crate::content::Message;
use crate::context::RequestContext;
use crate::definitions::{PromptDefinition, ResourceDefinition, ToolDefinition};
use crate::error::{McpError, McpResult};
use crate::result::{ResourceOutput, ToolOutput};
use crate::uri_template::UriTemplate;

/// Future returned by a dispatcher invocation.
pub type DispatchFuture<T> = BoxFuture<'static, McpResult<T>>;

/// Generated adapter from a raw argument map to a tool invocation.
pub type ToolDispatcher =
    Arc<dyn Fn(ArgumentMap, RequestContext) -> DispatchFuture<ToolOutput> + Send + Sync>;

/// Generated adapter for a static (zero-parameter) resource.
pub type ResourceDispatcher =
    Arc<dyn Fn(RequestContext) -> DispatchFuture<ResourceOutput> + Send + Sync>;

/// Generated adapter for a templated resource; receives the extracted
/// placeholder values.
pub type TemplateDispatcher = Arc<
    dyn Fn(HashMap<String, String>, RequestContext) -> DispatchFuture<ResourceOutput>
        + Send
        + Sync,
>;

/// Generated adapter from a raw argument map to a prompt invocation.
pub type PromptDispatcher =
    Arc<dyn Fn(ArgumentMap, RequestContext) -> DispatchFuture<Vec<Message>> + Send + Sync>;

/// Duplicate-registration policy.
#[derive(Debug, Clone, Copy)]
pub struct RegistryOptions {
    /// Allow silent replacement of an existing registration.
    pub allow_overrides: bool,
    /// When overrides are not allowed, warn and overwrite instead of failing.
    pub warn_on_duplicates: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            allow_overrides: false,
            warn_on_duplicates: true,
        }
    }
}

struct ToolEntry {
    definition: ToolDefinition,
    dispatcher: ToolDispatcher,
}

struct ResourceEntry {
    definition: ResourceDefinition,
    dispatcher: ResourceDispatcher,
}

struct TemplateEntry {
    definition: ResourceDefinition,
    template: UriTemplate,
    dispatcher: TemplateDispatcher,
}

struct PromptEntry {
    definition: PromptDefinition,
    dispatcher: PromptDispatcher,
}

/// Registry of tools, resources, resource templates, and prompts.
///
/// Not a process-wide singleton: applications may hold several independent
/// registries and hand any of them to the protocol runtime.
#[derive(Default)]
pub struct McpRegistry {
    options: RegistryOptions,
    tools: DashMap<String, ToolEntry>,
    resources: DashMap<String, ResourceEntry>,
    templates: RwLock<Vec<TemplateEntry>>,
    prompts: DashMap<String, PromptEntry>,
}

impl McpRegistry {
    /// Create a registry with the default duplicate policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with an explicit duplicate policy.
    #[must_use]
    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Apply the duplicate policy for `key`; `Ok(())` means proceed with the
    /// (over)write.
    fn admit_duplicate(&self, kind: &str, key: &str, exists: bool) -> McpResult<()> {
        if !exists || self.options.allow_overrides {
            return Ok(());
        }
        if self.options.warn_on_duplicates {
            warn!(kind, key, "duplicate registration, overwriting");
            return Ok(());
        }
        Err(McpError::DuplicateRegistration(key.to_string()))
    }

    /// Register a tool.
    ///
    /// # Errors
    ///
    /// [`McpError::DuplicateRegistration`] when the name is taken and the
    /// policy forbids replacement.
    pub fn register_tool(
        &self,
        definition: ToolDefinition,
        dispatcher: ToolDispatcher,
    ) -> McpResult<()> {
        let name = definition.name.clone();
        self.admit_duplicate("tool", &name, self.tools.contains_key(&name))?;
        debug!(tool = %name, "registered tool");
        self.tools.insert(
            name,
            ToolEntry {
                definition,
                dispatcher,
            },
        );
        Ok(())
    }

    /// Register a static resource keyed by its URI.
    ///
    /// # Errors
    ///
    /// [`McpError::Registration`] when the definition is templated,
    /// [`McpError::DuplicateRegistration`] per the duplicate policy.
    pub fn register_resource(
        &self,
        definition: ResourceDefinition,
        dispatcher: ResourceDispatcher,
    ) -> McpResult<()> {
        if definition.is_template || definition.uri.contains('{') {
            return Err(McpError::Registration(format!(
                "resource '{}' has placeholders, register it as a template",
                definition.uri
            )));
        }
        let uri = definition.uri.clone();
        self.admit_duplicate("resource", &uri, self.resources.contains_key(&uri))?;
        debug!(resource = %uri, "registered resource");
        self.resources.insert(
            uri,
            ResourceEntry {
                definition,
                dispatcher,
            },
        );
        Ok(())
    }

    /// Register a templated resource. Templates are matched in registration
    /// order; the first match wins.
    ///
    /// # Errors
    ///
    /// [`McpError::Registration`] when the URI template does not parse or has
    /// no placeholders, [`McpError::DuplicateRegistration`] per the duplicate
    /// policy.
    pub fn register_resource_template(
        &self,
        definition: ResourceDefinition,
        dispatcher: TemplateDispatcher,
    ) -> McpResult<()> {
        let template = UriTemplate::parse(&definition.uri)
            .map_err(|e| McpError::Registration(format!("uri template '{}': {e}", definition.uri)))?;
        if !template.is_parameterized() {
            return Err(McpError::Registration(format!(
                "resource '{}' has no placeholders, register it as a static resource",
                definition.uri
            )));
        }

        let mut templates = self.templates.write();
        let existing = templates
            .iter()
            .position(|entry| entry.definition.uri == definition.uri);
        self.admit_duplicate("resource_template", &definition.uri, existing.is_some())?;
        if let Some(index) = existing {
            templates.remove(index);
        }
        debug!(template = %definition.uri, "registered resource template");
        templates.push(TemplateEntry {
            definition,
            template,
            dispatcher,
        });
        Ok(())
    }

    /// Register a prompt.
    ///
    /// # Errors
    ///
    /// [`McpError::DuplicateRegistration`] per the duplicate policy.
    pub fn register_prompt(
        &self,
        definition: PromptDefinition,
        dispatcher: PromptDispatcher,
    ) -> McpResult<()> {
        let name = definition.name.clone();
        self.admit_duplicate("prompt", &name, self.prompts.contains_key(&name))?;
        debug!(prompt = %name, "registered prompt");
        self.prompts.insert(
            name,
            PromptEntry {
                definition,
                dispatcher,
            },
        );
        Ok(())
    }

    /// Stored tool definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|entry| entry.definition.clone())
            .collect()
    }

    /// Stored static resource definitions.
    #[must_use]
    pub fn list_resources(&self) -> Vec<ResourceDefinition> {
        self.resources
            .iter()
            .map(|entry| entry.definition.clone())
            .collect()
    }

    /// Stored templated resource definitions, in registration order.
    #[must_use]
    pub fn list_resource_templates(&self) -> Vec<ResourceDefinition> {
        self.templates
            .read()
            .iter()
            .map(|entry| entry.definition.clone())
            .collect()
    }

    /// Stored prompt definitions.
    #[must_use]
    pub fn list_prompts(&self) -> Vec<PromptDefinition> {
        self.prompts
            .iter()
            .map(|entry| entry.definition.clone())
            .collect()
    }

    /// Invoke a tool by name.
    ///
    /// The dispatcher is cloned out of the map before awaiting, so a call in
    /// flight never blocks lookups or registration.
    ///
    /// # Errors
    ///
    /// [`McpError::ToolNotFound`] for unknown names; otherwise whatever the
    /// dispatcher produces.
    pub async fn call_tool(
        &self,
        name: &str,
        args: ArgumentMap,
        ctx: Option<RequestContext>,
    ) -> McpResult<ToolOutput> {
        let dispatcher = self
            .tools
            .get(name)
            .map(|entry| Arc::clone(&entry.dispatcher))
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;
        dispatcher(args, ctx.unwrap_or_else(RequestContext::empty)).await
    }

    /// Read a resource by URI: exact static match first, then templates in
    /// registration order.
    ///
    /// # Errors
    ///
    /// [`McpError::ResourceNotFound`] when nothing matches; otherwise
    /// whatever the dispatcher produces.
    pub async fn read_resource(
        &self,
        uri: &str,
        ctx: Option<RequestContext>,
    ) -> McpResult<ResourceOutput> {
        let ctx = ctx.unwrap_or_else(RequestContext::empty);

        if let Some(entry) = self.resources.get(uri) {
            let dispatcher = Arc::clone(&entry.dispatcher);
            drop(entry);
            return dispatcher(ctx).await;
        }

        let matched = {
            let templates = self.templates.read();
            templates.iter().find_map(|entry| {
                entry
                    .template
                    .matches(uri)
                    .map(|hit| (hit.into_map(), Arc::clone(&entry.dispatcher)))
            })
        };

        match matched {
            Some((params, dispatcher)) => dispatcher(params, ctx).await,
            None => Err(McpError::ResourceNotFound(uri.to_string())),
        }
    }

    /// Retrieve a prompt by name.
    ///
    /// # Errors
    ///
    /// [`McpError::PromptNotFound`] for unknown names; otherwise whatever the
    /// dispatcher produces.
    pub async fn get_prompt(
        &self,
        name: &str,
        args: ArgumentMap,
        ctx: Option<RequestContext>,
    ) -> McpResult<Vec<Message>> {
        let dispatcher = self
            .prompts
            .get(name)
            .map(|entry| Arc::clone(&entry.dispatcher))
            .ok_or_else(|| McpError::PromptNotFound(name.to_string()))?;
        dispatcher(args, ctx.unwrap_or_else(RequestContext::empty)).await
    }
}

impl std::fmt::Debug for McpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpRegistry")
            .field("tools", &self.tools.len())
            .field("resources", &self.resources.len())
            .field("resource_templates", &self.templates.read().len())
            .field("prompts", &self.prompts.len())
            .finish()
    }
}
