use crate::models::CourtRow;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

/// Active courts of a facility in court-number order, row-locked for the
/// rest of the surrounding transaction.
pub async fn lock_active_by_facility<'e>(
    executor: impl PgExecutor<'e>,
    facility_id: Uuid,
) -> SqlxResult<Vec<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, facility_id, court_number, name, status, created_at, updated_at
        FROM courts
        WHERE facility_id = $1 AND status = 'active'
        ORDER BY court_number ASC
        FOR UPDATE
        "#,
    )
    .bind(facility_id)
    .fetch_all(executor)
    .await
}
