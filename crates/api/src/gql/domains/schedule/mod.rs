pub mod resolvers;
pub mod service;
pub mod types;

pub use resolvers::{ScheduleMutation, ScheduleQuery};
pub use service::{CommitMode, CommittedSchedule, ScheduleCommitter, ScheduleOptions};
