use crate::models::{BookingRow, CourtBusyWindowRow};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub facility_id: Uuid,
    pub league_id: Option<Uuid>,
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Which of `court_ids` are free over `[start_time, end_time)`, optionally
/// ignoring one booking (for update-in-place checks).
#[derive(Debug, Clone)]
pub struct FreeCourtsQuery<'a> {
    pub court_ids: &'a [Uuid],
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub exclude_booking_id: Option<Uuid>,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateBooking,
) -> SqlxResult<BookingRow> {
    sqlx::query_as::<_, BookingRow>(
        r#"
        INSERT INTO bookings (facility_id, league_id, kind, start_time, end_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, facility_id, league_id, kind, start_time, end_time, status,
                  created_at, updated_at
        "#,
    )
    .bind(data.facility_id)
    .bind(data.league_id)
    .bind(data.kind)
    .bind(data.start_time)
    .bind(data.end_time)
    .fetch_one(executor)
    .await
}

/// Link a court to a booking. The booking window is copied onto the link so
/// the exclusion constraint on `booking_courts` can reject overlaps.
pub async fn attach_court<'e>(
    executor: impl PgExecutor<'e>,
    booking_id: Uuid,
    court_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> SqlxResult<()> {
    sqlx::query(
        r#"
        INSERT INTO booking_courts (booking_id, court_id, start_time, end_time)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(booking_id)
    .bind(court_id)
    .bind(start_time)
    .bind(end_time)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn add_participants<'e>(
    executor: impl PgExecutor<'e>,
    booking_id: Uuid,
    user_ids: &[Uuid],
) -> SqlxResult<u64> {
    if user_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO booking_participants (booking_id, user_id)
        SELECT $1, UNNEST($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(booking_id)
    .bind(user_ids)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn free_courts<'e>(
    executor: impl PgExecutor<'e>,
    query: FreeCourtsQuery<'_>,
) -> SqlxResult<Vec<Uuid>> {
    if query.court_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT c.id
        FROM courts c
        WHERE c.id = ANY($1::uuid[])
          AND c.status = 'active'
          AND NOT EXISTS (
              SELECT 1
              FROM booking_courts bc
              JOIN bookings b ON b.id = bc.booking_id
              WHERE bc.court_id = c.id
                AND bc.is_active = true
                AND b.status = 'confirmed'
                AND bc.start_time < $3
                AND bc.end_time > $2
                AND ($4::uuid IS NULL OR bc.booking_id <> $4)
          )
        ORDER BY c.court_number ASC
        "#,
    )
    .bind(query.court_ids)
    .bind(query.start_time)
    .bind(query.end_time)
    .bind(query.exclude_booking_id)
    .fetch_all(executor)
    .await
}

/// Windows held by confirmed bookings on the given courts that intersect
/// `[from, to)`.
pub async fn list_busy_windows<'e>(
    executor: impl PgExecutor<'e>,
    court_ids: &[Uuid],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> SqlxResult<Vec<CourtBusyWindowRow>> {
    if court_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, CourtBusyWindowRow>(
        r#"
        SELECT bc.court_id, bc.start_time, bc.end_time
        FROM booking_courts bc
        JOIN bookings b ON b.id = bc.booking_id
        WHERE bc.court_id = ANY($1::uuid[])
          AND bc.is_active = true
          AND b.status = 'confirmed'
          AND bc.start_time < $3
          AND bc.end_time > $2
        ORDER BY bc.start_time ASC, bc.court_id ASC
        "#,
    )
    .bind(court_ids)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await
}

pub async fn delete_participants<'e>(
    executor: impl PgExecutor<'e>,
    booking_ids: &[Uuid],
) -> SqlxResult<u64> {
    if booking_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("DELETE FROM booking_participants WHERE booking_id = ANY($1::uuid[])")
        .bind(booking_ids)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_court_links<'e>(
    executor: impl PgExecutor<'e>,
    booking_ids: &[Uuid],
) -> SqlxResult<u64> {
    if booking_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("DELETE FROM booking_courts WHERE booking_id = ANY($1::uuid[])")
        .bind(booking_ids)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    booking_ids: &[Uuid],
) -> SqlxResult<u64> {
    if booking_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("DELETE FROM bookings WHERE id = ANY($1::uuid[])")
        .bind(booking_ids)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
