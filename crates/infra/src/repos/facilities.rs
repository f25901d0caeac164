use crate::models::FacilityRow;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<FacilityRow>> {
    sqlx::query_as::<_, FacilityRow>(
        r#"
        SELECT id, name, timezone, created_at, updated_at
        FROM facilities
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}
