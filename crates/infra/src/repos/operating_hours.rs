use crate::models::OperatingHoursRow;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

pub async fn list_by_facility<'e>(
    executor: impl PgExecutor<'e>,
    facility_id: Uuid,
) -> SqlxResult<Vec<OperatingHoursRow>> {
    sqlx::query_as::<_, OperatingHoursRow>(
        r#"
        SELECT facility_id, weekday, opens_at, closes_at
        FROM operating_hours
        WHERE facility_id = $1
        ORDER BY weekday ASC
        "#,
    )
    .bind(facility_id)
    .fetch_all(executor)
    .await
}
