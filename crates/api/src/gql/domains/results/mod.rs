pub mod resolvers;
pub mod service;
pub mod types;

pub use resolvers::ResultMutation;
pub use service::{validate_score, ScoreError};
