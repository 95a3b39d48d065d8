//! Peer discovery and filtering

pub mod discovery;
pub mod parser;

pub use discovery::{PeerScout, Rejection, check_candidate};
pub use parser::parse_ticker_candidates;
