use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, Utc, Weekday};
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use infra::models::{MatchRow, OperatingHoursRow, ScheduledMatchRow};
use infra::repos::{
    bookings, courts, facilities, leagues, matches, operating_hours, team_members, teams,
    CreateBooking, CreateMatch, LeagueStatus,
};

use crate::config::SchedulingConfig;
use crate::error::AppError;
use crate::gql::types::{CalendarRefresh, CalendarRefreshReason};
use crate::scheduling::{
    generate_schedule, parse_timezone, preference_map, reconcile_courts, Bye, BusyWindow,
    CourtInfo, CourtPreferences, DailyWindow, ScheduleRequest, WeeklyHours,
};
use crate::services::{AvailabilityChecker, CalendarEvents};

/// Longest match a schedule may be built with.
const MAX_MATCH_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    pub preserve_courts: bool,
    pub match_duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    Generate,
    Regenerate,
}

#[derive(Debug, Clone)]
pub struct CommittedMatch {
    pub row: MatchRow,
    pub court_id: Uuid,
    pub court_number: i32,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CommittedSchedule {
    pub league_id: Uuid,
    pub facility_id: Uuid,
    pub matches: Vec<CommittedMatch>,
    pub byes: Vec<Bye>,
}

/// Generates a league schedule and persists it in one transaction.
///
/// Either the whole schedule (bookings, court links, participants and
/// matches) is written or nothing is. Regeneration deletes the previous
/// schedule inside the same transaction, so a failure leaves it untouched.
#[derive(Clone)]
pub struct ScheduleCommitter {
    db: PgPool,
    availability: Arc<dyn AvailabilityChecker>,
    calendar: CalendarEvents,
    config: SchedulingConfig,
}

impl ScheduleCommitter {
    pub fn new(
        db: PgPool,
        availability: Arc<dyn AvailabilityChecker>,
        calendar: CalendarEvents,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            db,
            availability,
            calendar,
            config,
        }
    }

    pub async fn generate(
        &self,
        league_id: Uuid,
        options: ScheduleOptions,
    ) -> Result<CommittedSchedule, AppError> {
        self.run(league_id, options, CommitMode::Generate).await
    }

    pub async fn regenerate(
        &self,
        league_id: Uuid,
        options: ScheduleOptions,
    ) -> Result<CommittedSchedule, AppError> {
        self.run(league_id, options, CommitMode::Regenerate).await
    }

    async fn run(
        &self,
        league_id: Uuid,
        options: ScheduleOptions,
        mode: CommitMode,
    ) -> Result<CommittedSchedule, AppError> {
        let minutes = resolve_match_minutes(
            options.match_duration_minutes,
            self.config.default_match_minutes,
        )?;

        // Dropping the future on timeout drops the transaction, which rolls back.
        let committed = match tokio::time::timeout(
            self.config.generation_timeout,
            self.commit(league_id, minutes, options.preserve_courts, mode),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    league_id = %league_id,
                    timeout_secs = self.config.generation_timeout.as_secs(),
                    "schedule generation timed out, transaction rolled back"
                );
                return Err(AppError::internal(format!(
                    "schedule generation for league {league_id} timed out"
                )));
            }
        };

        let reason = match mode {
            CommitMode::Generate => CalendarRefreshReason::ScheduleGenerated,
            CommitMode::Regenerate => CalendarRefreshReason::ScheduleRegenerated,
        };
        self.calendar.publish(
            committed.facility_id,
            CalendarRefresh {
                facility_id: committed.facility_id.into(),
                league_id: committed.league_id.into(),
                reason,
                match_count: committed.matches.len() as i32,
                timestamp: Utc::now(),
            },
        );

        Ok(committed)
    }

    async fn commit(
        &self,
        league_id: Uuid,
        match_minutes: u32,
        preserve_courts: bool,
        mode: CommitMode,
    ) -> Result<CommittedSchedule, AppError> {
        let mut tx = self.db.begin().await?;

        let league = leagues::get_for_update(&mut *tx, league_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("League {league_id} not found")))?;

        if matches!(league.status, LeagueStatus::Completed | LeagueStatus::Cancelled) {
            return Err(AppError::conflict(format!(
                "League is {} and cannot be scheduled",
                league.status.as_str()
            )));
        }

        let facility = facilities::get_by_id(&mut *tx, league.facility_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Facility {} not found", league.facility_id))
            })?;
        let timezone = parse_timezone(&facility.timezone)?;

        let prefs = match mode {
            CommitMode::Generate => {
                if matches::count_by_league(&mut *tx, league_id).await? > 0 {
                    return Err(AppError::conflict(
                        "A schedule already exists for this league; regenerate it instead",
                    ));
                }
                None
            }
            CommitMode::Regenerate => {
                let prefs = if preserve_courts {
                    Some(load_court_preferences(&mut tx, league_id).await?)
                } else {
                    None
                };
                clear_schedule(&mut tx, league_id).await?;
                prefs
            }
        };

        let team_rows = teams::list_active_by_league(&mut *tx, league_id).await?;
        let court_rows = courts::lock_active_by_facility(&mut *tx, facility.id).await?;
        let hour_rows = operating_hours::list_by_facility(&mut *tx, facility.id).await?;

        let team_ids: Vec<Uuid> = team_rows.iter().map(|t| t.id).collect();
        let court_infos: Vec<CourtInfo> = court_rows
            .iter()
            .map(|c| CourtInfo {
                id: c.id,
                number: c.court_number,
            })
            .collect();
        let court_ids: Vec<Uuid> = court_infos.iter().map(|c| c.id).collect();
        let hours = weekly_hours(&hour_rows);

        // Local days map to UTC instants up to a day either side.
        let from = league
            .start_date
            .checked_sub_days(Days::new(1))
            .unwrap_or(league.start_date)
            .and_time(NaiveTime::MIN)
            .and_utc();
        let to = league
            .end_date
            .checked_add_days(Days::new(2))
            .unwrap_or(league.end_date)
            .and_time(NaiveTime::MIN)
            .and_utc();
        let busy: Vec<BusyWindow> = bookings::list_busy_windows(&mut *tx, &court_ids, from, to)
            .await?
            .into_iter()
            .map(|w| BusyWindow {
                court_id: w.court_id,
                start: w.start_time,
                end: w.end_time,
            })
            .collect();

        let request = ScheduleRequest {
            league_id,
            teams: &team_ids,
            start_date: league.start_date,
            end_date: league.end_date,
            courts: &court_infos,
            hours: &hours,
            timezone,
            match_duration: chrono::Duration::minutes(i64::from(match_minutes)),
            busy: &busy,
            max_slots: self.config.max_slots,
        };
        let generated = generate_schedule(&request)?;

        let placed = match &prefs {
            Some(prefs) => reconcile_courts(&generated.matches, prefs, &court_infos, &busy)?,
            None => generated.matches.clone(),
        };

        let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::with_capacity(team_ids.len());
        for (team_id, user_id) in team_members::list_members_by_teams(&mut *tx, &team_ids).await? {
            members.entry(team_id).or_default().push(user_id);
        }

        let mut committed = Vec::with_capacity(placed.len());
        for m in &placed {
            let free = self
                .availability
                .is_free(&mut tx, m.court_id, m.starts_at, m.ends_at)
                .await?;
            if !free {
                warn!(
                    league_id = %league_id,
                    court_id = %m.court_id,
                    starts_at = %m.starts_at,
                    "court taken between read and write, aborting schedule"
                );
                return Err(AppError::conflict(format!(
                    "Court {} is no longer available at {}",
                    m.court_number, m.starts_at
                )));
            }

            let booking = bookings::create(
                &mut *tx,
                CreateBooking {
                    facility_id: facility.id,
                    league_id: Some(league_id),
                    kind: league.reservation_kind.clone(),
                    start_time: m.starts_at,
                    end_time: m.ends_at,
                },
            )
            .await?;
            bookings::attach_court(&mut *tx, booking.id, m.court_id, m.starts_at, m.ends_at)
                .await?;

            let participants: Vec<Uuid> = [m.home_team_id, m.away_team_id]
                .iter()
                .filter_map(|team| members.get(team))
                .flatten()
                .copied()
                .collect();
            bookings::add_participants(&mut *tx, booking.id, &participants).await?;

            let row = matches::create(
                &mut *tx,
                CreateMatch {
                    league_id,
                    home_team_id: m.home_team_id,
                    away_team_id: m.away_team_id,
                    round_number: m.round as i32,
                    booking_id: Some(booking.id),
                    scheduled_at: m.starts_at,
                },
            )
            .await?;

            committed.push(CommittedMatch {
                row,
                court_id: m.court_id,
                court_number: m.court_number,
                ends_at: m.ends_at,
            });
        }

        tx.commit().await?;

        info!(
            league_id = %league_id,
            matches = committed.len(),
            byes = generated.byes.len(),
            preserve_courts,
            regenerated = mode == CommitMode::Regenerate,
            "league schedule committed"
        );

        Ok(CommittedSchedule {
            league_id,
            facility_id: facility.id,
            matches: committed,
            byes: generated.byes,
        })
    }
}

/// Persisted schedule of a league, chronological then by court number.
pub async fn league_schedule(
    pool: &PgPool,
    league_id: Uuid,
) -> Result<Vec<ScheduledMatchRow>, AppError> {
    leagues::get_by_id(pool, league_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("League {league_id} not found")))?;
    Ok(matches::list_schedule(pool, league_id).await?)
}

async fn load_court_preferences(
    conn: &mut PgConnection,
    league_id: Uuid,
) -> Result<CourtPreferences, AppError> {
    let rows = matches::list_pairing_courts(&mut *conn, league_id).await?;
    Ok(preference_map(
        rows.into_iter()
            .map(|r| (r.home_team_id, r.away_team_id, r.court_id)),
    ))
}

/// Remove the league's matches and everything their bookings own.
async fn clear_schedule(conn: &mut PgConnection, league_id: Uuid) -> Result<(), AppError> {
    let booking_ids = matches::list_booking_ids_by_league(&mut *conn, league_id).await?;

    let removed = matches::delete_by_league(&mut *conn, league_id).await?;
    bookings::delete_participants(&mut *conn, &booking_ids).await?;
    bookings::delete_court_links(&mut *conn, &booking_ids).await?;
    bookings::delete_by_ids(&mut *conn, &booking_ids).await?;

    info!(
        league_id = %league_id,
        matches = removed,
        bookings = booking_ids.len(),
        "cleared previous schedule"
    );
    Ok(())
}

pub(crate) fn resolve_match_minutes(requested: Option<u32>, default: u32) -> Result<u32, AppError> {
    let minutes = requested.unwrap_or(default);
    if minutes == 0 || minutes > MAX_MATCH_MINUTES {
        return Err(AppError::validation(format!(
            "Match duration must be between 1 and {MAX_MATCH_MINUTES} minutes, got {minutes}"
        )));
    }
    Ok(minutes)
}

/// Rows with an out-of-range weekday are ignored; the table constraint
/// keeps them out in practice.
pub(crate) fn weekly_hours(rows: &[OperatingHoursRow]) -> WeeklyHours {
    let mut hours = WeeklyHours::new();
    for row in rows {
        let weekday = u8::try_from(row.weekday)
            .ok()
            .and_then(|d| Weekday::try_from(d).ok());
        match weekday {
            Some(weekday) => hours.set(
                weekday,
                DailyWindow {
                    opens_at: row.opens_at,
                    closes_at: row.closes_at,
                },
            ),
            None => warn!(
                facility_id = %row.facility_id,
                weekday = row.weekday,
                "ignoring operating hours with invalid weekday"
            ),
        }
    }
    hours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(weekday: i16, open: (u32, u32), close: (u32, u32)) -> OperatingHoursRow {
        OperatingHoursRow {
            facility_id: Uuid::nil(),
            weekday,
            opens_at: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            closes_at: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
        }
    }

    #[test]
    fn weekday_zero_is_monday() {
        let hours = weekly_hours(&[row(0, (9, 0), (17, 0)), row(6, (10, 0), (14, 0))]);

        let monday = hours.for_weekday(Weekday::Mon).unwrap();
        assert_eq!(monday.opens_at, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(hours.for_weekday(Weekday::Sun).is_some());
        assert!(hours.for_weekday(Weekday::Tue).is_none());
    }

    #[test]
    fn invalid_weekdays_are_skipped() {
        let hours = weekly_hours(&[row(7, (9, 0), (17, 0)), row(-1, (9, 0), (17, 0))]);
        assert_eq!(hours, WeeklyHours::new());
    }

    #[test]
    fn match_minutes_default_and_bounds() {
        assert_eq!(resolve_match_minutes(None, 60).unwrap(), 60);
        assert_eq!(resolve_match_minutes(Some(90), 60).unwrap(), 90);
        assert!(matches!(
            resolve_match_minutes(Some(0), 60),
            Err(AppError::Validation(_))
        ));
        assert!(resolve_match_minutes(Some(24 * 60 + 1), 60).is_err());
    }
}
