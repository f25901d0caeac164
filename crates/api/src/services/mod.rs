pub mod availability;
pub mod calendar_events;

pub use availability::{AvailabilityChecker, PgAvailabilityChecker};
pub use calendar_events::CalendarEvents;
