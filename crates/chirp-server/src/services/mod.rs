//! Business logic services

pub mod auth;
pub mod followers;
pub mod stats;
pub mod tags;
pub mod tweets;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthOutcome, AuthService};
pub use followers::FollowerService;
pub use stats::StatsService;
pub use tags::TagService;
pub use tweets::TweetService;
