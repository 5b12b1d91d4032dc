//! Capability ports consumed by the core services.
//!
//! Each concrete store adapter implements only the narrow interface the
//! core actually calls, so tests can substitute in-memory doubles.

pub mod kv;
pub mod storage;

pub use kv::KeyValue;
pub use storage::{FollowerStore, StatsStore, TagStore, TweetStore, UserStore};
