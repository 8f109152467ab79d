//! URI templates for parameterized resources.
//!
//! A template is a URI whose path segments may contain `{name}` placeholders,
//! e.g. `users://{user_id}/posts/{post_id}`. Placeholders compile to `([^/]+)`
//! capture groups in a fully anchored regex, so a placeholder never matches an
//! empty segment, never crosses a `/`, and a template never matches a URI
//! with trailing segments beyond the pattern.

use std::collections::HashMap;

use regex::Regex;

/// A parsed URI template with its compiled matcher.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    pattern: Regex,
    variables: Vec<String>,
}

/// A successful match with extracted placeholder values.
#[derive(Debug, Clone)]
pub struct UriMatch {
    // (name, value) pairs in placeholder declaration order.
    parameters: Vec<(String, String)>,
}

impl UriMatch {
    /// Extracted values in placeholder declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Extracted values as a name-keyed map.
    #[must_use]
    pub fn into_map(self) -> HashMap<String, String> {
        self.parameters.into_iter().collect()
    }
}

/// Errors raised while parsing a template string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriTemplateError {
    /// Template string is empty
    #[error("URI template cannot be empty")]
    EmptyTemplate,
    /// Placeholder name violates `[A-Za-z_][A-Za-z0-9_]*`
    #[error("invalid placeholder name: {{{0}}}")]
    InvalidPlaceholder(String),
    /// Placeholder declaration not properly closed
    #[error("unclosed placeholder: {{{0}}}")]
    UnclosedPlaceholder(String),
    /// Same placeholder appears twice
    #[error("duplicate placeholder: {{{0}}}")]
    DuplicatePlaceholder(String),
    /// Closing brace without an opening one
    #[error("unexpected closing brace without opening")]
    UnexpectedCloseBrace,
}

fn is_valid_placeholder(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl UriTemplate {
    /// Parse and compile a template.
    ///
    /// # Errors
    ///
    /// Returns a [`UriTemplateError`] for empty templates, malformed braces,
    /// and invalid or duplicate placeholder names.
    pub fn parse(template: &str) -> Result<Self, UriTemplateError> {
        if template.is_empty() {
            return Err(UriTemplateError::EmptyTemplate);
        }

        let mut pattern = String::from("^");
        let mut variables: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '{' => {
                    pattern.push_str(&regex::escape(&literal));
                    literal.clear();

                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(UriTemplateError::UnclosedPlaceholder(name));
                    }
                    if !is_valid_placeholder(&name) {
                        return Err(UriTemplateError::InvalidPlaceholder(name));
                    }
                    if variables.contains(&name) {
                        return Err(UriTemplateError::DuplicatePlaceholder(name));
                    }
                    variables.push(name);
                    pattern.push_str("([^/]+)");
                }
                '}' => return Err(UriTemplateError::UnexpectedCloseBrace),
                _ => literal.push(ch),
            }
        }
        pattern.push_str(&regex::escape(&literal));
        pattern.push('$');

        // The pattern is built from escaped literals and fixed groups, so
        // compilation cannot fail on any input that got this far.
        let pattern = Regex::new(&pattern).map_err(|_| UriTemplateError::EmptyTemplate)?;

        Ok(Self {
            template: template.to_string(),
            pattern,
            variables,
        })
    }

    /// Match a URI against this template, extracting placeholder values.
    #[must_use]
    pub fn matches(&self, uri: &str) -> Option<UriMatch> {
        let captures = self.pattern.captures(uri)?;
        let parameters = self
            .variables
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(name, capture)| {
                capture.map(|c| (name.clone(), c.as_str().to_string()))
            })
            .collect();
        Some(UriMatch { parameters })
    }

    /// Placeholder names in declaration order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Whether this template contains placeholders.
    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        !self.variables.is_empty()
    }

    /// The original template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}
