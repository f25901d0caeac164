use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use infra::repos::{bookings, FreeCourtsQuery};

/// Answers "which of these courts are free over this window?".
///
/// Runs on the caller's connection so the committer can ask inside its own
/// transaction and see its own uncommitted bookings.
#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
    async fn free_courts(
        &self,
        conn: &mut PgConnection,
        court_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<Uuid>, sqlx::Error>;

    async fn is_free(
        &self,
        conn: &mut PgConnection,
        court_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let free = self.free_courts(conn, &[court_id], start, end, None).await?;
        Ok(free.contains(&court_id))
    }
}

/// Availability straight from `booking_courts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgAvailabilityChecker;

#[async_trait]
impl AvailabilityChecker for PgAvailabilityChecker {
    async fn free_courts(
        &self,
        conn: &mut PgConnection,
        court_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        bookings::free_courts(
            conn,
            FreeCourtsQuery {
                court_ids,
                start_time: start,
                end_time: end,
                exclude_booking_id,
            },
        )
        .await
    }
}
