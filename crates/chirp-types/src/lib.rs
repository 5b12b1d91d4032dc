//! Chirp Types - Pure type definitions
//!
//! This crate contains only plain data types with no async runtime
//! dependencies, shared by every other crate in the workspace.

pub mod tweet;
pub mod user;

pub use tweet::*;
pub use user::*;
