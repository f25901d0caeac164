use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SchedulingConfig;
use crate::gql::domains::schedule::ScheduleCommitter;
use crate::services::{AvailabilityChecker, CalendarEvents, PgAvailabilityChecker};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    config: SchedulingConfig,
    availability: Arc<dyn AvailabilityChecker>,
    calendar: CalendarEvents,
}

impl AppState {
    pub fn new(db: PgPool, config: SchedulingConfig) -> Self {
        Self {
            db,
            config,
            availability: Arc::new(PgAvailabilityChecker),
            calendar: CalendarEvents::new(),
        }
    }

    /// Swap the availability checker, e.g. for a stricter external source.
    pub fn with_availability(mut self, checker: Arc<dyn AvailabilityChecker>) -> Self {
        self.availability = checker;
        self
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    pub fn calendar(&self) -> &CalendarEvents {
        &self.calendar
    }

    pub fn schedule_committer(&self) -> ScheduleCommitter {
        ScheduleCommitter::new(
            self.db.clone(),
            self.availability.clone(),
            self.calendar.clone(),
            self.config.clone(),
        )
    }
}
