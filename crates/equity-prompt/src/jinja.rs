//! MiniJinja-backed templates

use crate::{PromptError, PromptTemplate, Result};
use minijinja::{Environment, UndefinedBehavior};
use std::fmt;

/// A prompt template in Jinja2 syntax
///
/// The source is syntax-checked when the template is created. Rendering uses
/// strict undefined handling, so a variable missing from the context is an
/// error rather than a silently blank section.
///
/// # Examples
///
/// ```
/// use equity_prompt::{JinjaTemplate, PromptTemplate};
/// use serde_json::json;
///
/// let template = JinjaTemplate::new("verdict", "Rate {{ ticker | upper }}").unwrap();
/// assert_eq!(template.render(&json!({ "ticker": "nvda" })).unwrap(), "Rate NVDA");
/// assert!(template.render(&json!({})).is_err());
/// ```
pub struct JinjaTemplate {
    name: String,
    source: String,
}

fn strict_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

impl JinjaTemplate {
    /// # Errors
    ///
    /// [`PromptError::TemplateParseFailed`] when the source is not valid Jinja.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let env = strict_env();
        if let Err(e) = env.template_from_str(&source) {
            return Err(PromptError::TemplateParseFailed {
                name,
                detail: e.to_string(),
            });
        }
        Ok(Self { name, source })
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, vars: &serde_json::Value) -> Result<String> {
        strict_env()
            .render_str(&self.source, minijinja::Value::from_serialize(vars))
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JinjaTemplate({}, {} bytes)", self.name, self.source.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_error_names_template() {
        let err = JinjaTemplate::new("editor", "{{ unclosed").unwrap_err();
        assert!(matches!(err, PromptError::TemplateParseFailed { ref name, .. } if name == "editor"));
    }

    #[test]
    fn test_missing_variable_is_error() {
        let template = JinjaTemplate::new("fundamental", "Ticker: {{ ticker }}").unwrap();

        let err = template.render(&json!({})).unwrap_err();
        assert!(matches!(err, PromptError::RenderError { ref name, .. } if name == "fundamental"));
    }

    #[test]
    fn test_degraded_branch() {
        let template = JinjaTemplate::new(
            "fundamental",
            "Analyze {{ ticker }}.{% if degraded %} Data is incomplete.{% endif %}",
        )
        .unwrap();

        assert_eq!(
            template
                .render(&json!({ "ticker": "AAPL", "degraded": false }))
                .unwrap(),
            "Analyze AAPL."
        );
        assert_eq!(
            template
                .render(&json!({ "ticker": "ZZZZ", "degraded": true }))
                .unwrap(),
            "Analyze ZZZZ. Data is incomplete."
        );
    }

    #[test]
    fn test_sections_loop() {
        let template = JinjaTemplate::new(
            "editor",
            "{% for section in sections %}{{ section }}\n\n{% endfor %}",
        )
        .unwrap();

        let out = template
            .render(&json!({ "sections": ["## Verdict", "## Financials"] }))
            .unwrap();
        assert_eq!(out, "## Verdict\n\n## Financials\n\n");
    }

    #[test]
    fn test_debug_and_raw() {
        let template = JinjaTemplate::new("editor", "Hello").unwrap();
        assert_eq!(template.raw_template(), "Hello");
        assert_eq!(format!("{template:?}"), "JinjaTemplate(editor, 5 bytes)");
    }
}
