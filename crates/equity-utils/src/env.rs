//! `.env` loading

use std::path::PathBuf;

/// Load variables from a `.env` file in the current directory or its parents.
///
/// Variables already set in the process environment win. Returns the path of
/// the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Failed to parse .env file: {}", e);
            None
        }
    }
}
