use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use infra::models::MatchRow;
use infra::repos::matches;

use crate::error::AppError;

pub const MIN_WINNING_SCORE: i32 = 11;
pub const MIN_WINNING_MARGIN: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("Scores cannot be negative")]
    Negative,

    #[error("Matches cannot end in a tie")]
    Tie,

    #[error("Winning margin must be at least 2 points")]
    MarginTooSmall,

    #[error("Winning score must be at least 11 points")]
    WinnerBelowMinimum,
}

impl From<ScoreError> for AppError {
    fn from(e: ScoreError) -> Self {
        match e {
            ScoreError::Negative => AppError::Validation(e.to_string()),
            ScoreError::Tie | ScoreError::MarginTooSmall | ScoreError::WinnerBelowMinimum => {
                AppError::Conflict(e.to_string())
            }
        }
    }
}

/// Check a final score: no ties, winner on at least 11, won by at least 2.
pub fn validate_score(home_score: i32, away_score: i32) -> Result<(), ScoreError> {
    if home_score < 0 || away_score < 0 {
        return Err(ScoreError::Negative);
    }
    if home_score == away_score {
        return Err(ScoreError::Tie);
    }

    let (winner, loser) = if home_score > away_score {
        (home_score, away_score)
    } else {
        (away_score, home_score)
    };
    if winner - loser < MIN_WINNING_MARGIN {
        return Err(ScoreError::MarginTooSmall);
    }
    if winner < MIN_WINNING_SCORE {
        return Err(ScoreError::WinnerBelowMinimum);
    }
    Ok(())
}

/// Record a final score and complete the match.
///
/// Only one caller can move a match out of scheduled/in_progress; everyone
/// else gets a conflict. Roster locks do not apply here.
pub async fn record_result(
    pool: &PgPool,
    league_id: Uuid,
    match_id: Uuid,
    home_score: i32,
    away_score: i32,
) -> Result<MatchRow, AppError> {
    validate_score(home_score, away_score)?;

    if let Some(row) =
        matches::record_result(pool, league_id, match_id, home_score, away_score).await?
    {
        info!(
            league_id = %league_id,
            match_id = %match_id,
            home_score,
            away_score,
            "match result recorded"
        );
        return Ok(row);
    }

    Err(explain_rejected_transition(pool, league_id, match_id, "accept a result").await)
}

/// Move a scheduled match to in progress.
pub async fn start_match(pool: &PgPool, league_id: Uuid, match_id: Uuid) -> Result<MatchRow, AppError> {
    if let Some(row) = matches::mark_in_progress(pool, league_id, match_id).await? {
        info!(league_id = %league_id, match_id = %match_id, "match started");
        return Ok(row);
    }

    Err(explain_rejected_transition(pool, league_id, match_id, "be started").await)
}

/// The guarded update touched nothing: either the match does not exist in
/// this league or it is in the wrong state.
async fn explain_rejected_transition(
    pool: &PgPool,
    league_id: Uuid,
    match_id: Uuid,
    action: &str,
) -> AppError {
    match matches::get_by_id(pool, league_id, match_id).await {
        Ok(Some(current)) => AppError::conflict(format!(
            "Match is {} and cannot {action}",
            current.status.as_str()
        )),
        Ok(None) => AppError::not_found(format!("Match {match_id} not found in league {league_id}")),
        Err(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_wins() {
        assert_eq!(validate_score(11, 9), Ok(()));
        assert_eq!(validate_score(15, 13), Ok(()));
        assert_eq!(validate_score(3, 11), Ok(()));
        assert_eq!(validate_score(11, 0), Ok(()));
    }

    #[test]
    fn rejects_one_point_margin() {
        assert_eq!(validate_score(11, 10), Err(ScoreError::MarginTooSmall));
        assert_eq!(validate_score(12, 13), Err(ScoreError::MarginTooSmall));
    }

    #[test]
    fn rejects_winner_below_eleven() {
        assert_eq!(validate_score(10, 8), Err(ScoreError::WinnerBelowMinimum));
        assert_eq!(validate_score(0, 2), Err(ScoreError::WinnerBelowMinimum));
    }

    #[test]
    fn rejects_ties_and_negatives() {
        assert_eq!(validate_score(11, 11), Err(ScoreError::Tie));
        assert_eq!(validate_score(0, 0), Err(ScoreError::Tie));
        assert_eq!(validate_score(-1, 11), Err(ScoreError::Negative));
    }

    #[test]
    fn score_errors_map_to_taxonomy() {
        assert!(matches!(AppError::from(ScoreError::Negative), AppError::Validation(_)));
        assert!(matches!(AppError::from(ScoreError::Tie), AppError::Conflict(_)));
        assert!(matches!(
            AppError::from(ScoreError::MarginTooSmall),
            AppError::Conflict(ref m) if m == "Winning margin must be at least 2 points"
        ));
    }
}
