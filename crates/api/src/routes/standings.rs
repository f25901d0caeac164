use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::gql::domains::standings::service::export_standings_csv;
use crate::state::AppState;

/// `GET /leagues/{league_id}/standings.csv`
pub async fn standings_csv(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let csv = export_standings_csv(&state.db, league_id).await?;
    let disposition = format!("attachment; filename=\"standings-{league_id}.csv\"");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
