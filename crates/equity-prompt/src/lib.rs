//! Prompt template management for the equity research desk
//!
//! Templates use Jinja2 syntax (`{{ variable }}`) rendered by MiniJinja with
//! strict undefined-variable checking. A [`PromptRegistry`] holds the named
//! templates a pipeline uses, and [`PromptBuilder`] assembles the data blocks
//! that get interpolated into them.
//!
//! # Quick Start
//!
//! ```
//! use equity_prompt::{JinjaTemplate, PromptBuilder, PromptRegistry};
//! use serde_json::json;
//!
//! let mut registry = PromptRegistry::new();
//! registry
//!     .register(JinjaTemplate::new("analyst", "Analyze {{ ticker }}.\n\n{{ market_data }}").unwrap())
//!     .unwrap();
//!
//! let market = PromptBuilder::new().field("Current Price", "150 USD").build();
//! let prompt = registry
//!     .render("analyst", &json!({ "ticker": "AAPL", "market_data": market }))
//!     .unwrap();
//!
//! assert!(prompt.starts_with("Analyze AAPL."));
//! assert!(prompt.contains("Current Price: 150 USD"));
//! ```

mod builder;
mod error;
mod jinja;
mod registry;
mod template;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use jinja::JinjaTemplate;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
