//! Shared utilities for the equity research workspace
//!
//! Logging setup and `.env` loading used by the binaries.

pub mod env;
pub mod logging;

pub use env::load_dotenv;
pub use logging::{LogFormat, init_tracing};
