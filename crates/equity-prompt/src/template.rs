//! Core prompt template trait
//!
//! This module defines the [`PromptTemplate`] trait that all template implementations must follow.

use crate::Result;

/// Core trait for prompt templates
///
/// Variables are passed as `serde_json::Value` so the trait stays dyn-compatible
/// and templates can be stored as `Arc<dyn PromptTemplate>` in a registry.
///
/// # Examples
///
/// ```
/// use equity_prompt::{JinjaTemplate, PromptTemplate};
/// use serde_json::json;
///
/// let template = JinjaTemplate::new("greeting", "Analyze {{ ticker }}").unwrap();
/// let result = template.render(&json!({ "ticker": "AAPL" })).unwrap();
/// assert_eq!(result, "Analyze AAPL");
/// ```
pub trait PromptTemplate: Send + Sync {
    /// Get the template name/identifier
    fn name(&self) -> &str;

    /// Render the template with variables
    fn render(&self, vars: &serde_json::Value) -> Result<String>;

    /// Get raw template source (for debugging/inspection)
    fn raw_template(&self) -> &str;
}
