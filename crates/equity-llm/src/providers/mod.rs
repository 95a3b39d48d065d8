//! Concrete LLM provider implementations

pub mod xai;

pub use xai::{XaiConfig, XaiProvider};
