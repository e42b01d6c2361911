//! Slack API services and the queries built on them.

pub mod reactions;
pub mod service;
pub mod users;

pub use reactions::{Projection, Reaction, ReactionQuery, Target};
pub use service::{ApiError, ApiResult, Service, SlackService};
pub use users::{Fields, Profile, ProfileQuery, UserInfo};
