//! Named template lookup
//!
//! A [`PromptRegistry`] is filled once at startup and then shared read-only
//! between the pipeline stages, so it needs no interior locking.

use crate::{PromptError, PromptTemplate, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Templates keyed by name
///
/// # Examples
///
/// ```
/// use equity_prompt::{JinjaTemplate, PromptRegistry};
/// use serde_json::json;
///
/// let mut registry = PromptRegistry::new();
/// registry
///     .register(JinjaTemplate::new("analyzer", "Analyze {{ ticker }}").unwrap())
///     .unwrap();
///
/// let prompt = registry.render("analyzer", &json!({ "ticker": "AAPL" })).unwrap();
/// assert_eq!(prompt, "Analyze AAPL");
/// ```
#[derive(Default, Clone)]
pub struct PromptRegistry {
    templates: BTreeMap<String, Arc<dyn PromptTemplate>>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template under its own name
    ///
    /// # Errors
    ///
    /// [`PromptError::DuplicateTemplate`] if the name is already taken.
    pub fn register<T: PromptTemplate + 'static>(&mut self, template: T) -> Result<()> {
        let name = template.name().to_string();
        if self.templates.contains_key(&name) {
            return Err(PromptError::DuplicateTemplate(name));
        }
        self.templates.insert(name, Arc::new(template));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PromptTemplate>> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Render the template registered as `name`
    ///
    /// # Errors
    ///
    /// [`PromptError::TemplateNotRegistered`] for an unknown name, otherwise
    /// whatever the template's own render returns.
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        self.get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))?
            .render(vars)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
