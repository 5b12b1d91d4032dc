//! Chirp Core Library
//!
//! Error taxonomy, store ports, and the session-token primitive shared by
//! the server and its storage adapters.

// Re-export pure types from chirp-types
pub use chirp_types::*;

pub mod error;
pub mod ports;
pub mod token;

pub use error::{ChirpError, Result};
