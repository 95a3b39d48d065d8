//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur during prompt operations
#[derive(Error, Debug)]
pub enum PromptError {
    /// Template source failed to parse
    #[error("Failed to parse template '{name}': {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Template rendering failed (including references to undefined variables)
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    #[error("Template '{0}' not registered")]
    TemplateNotRegistered(String),

    /// A second template was registered under an existing name
    #[error("Template '{0}' is already registered")]
    DuplicateTemplate(String),
}
