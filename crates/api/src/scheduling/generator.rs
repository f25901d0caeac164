//! Round-robin schedule generation.
//!
//! Pure function of its inputs: pairings come from the circle method, and
//! each round is laid onto (day, slot, court) triples by walking the date
//! range forward. Identical inputs always yield the identical schedule.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::round_robin::{circle_rounds, required_matches, Bye, PairKey};

pub const DEFAULT_MATCH_MINUTES: u32 = 60;

/// Hard cap on slots the cursor will look at before giving up.
pub const DEFAULT_MAX_SLOTS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Match duration must be a positive number of minutes")]
    InvalidDuration,

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("At least 2 active teams are required to build a schedule, found {0}")]
    NotEnoughTeams(usize),

    #[error("Team {0} appears more than once in the roster")]
    DuplicateTeam(Uuid),

    #[error("No active courts available")]
    NoActiveCourts,

    #[error("No operating hours defined for any day between {start} and {end}")]
    NoOperatingHours { start: NaiveDate, end: NaiveDate },

    #[error(
        "Not enough court capacity between {start} and {end}: placed {placed} of {required} matches"
    )]
    InsufficientCapacity {
        start: NaiveDate,
        end: NaiveDate,
        placed: usize,
        required: usize,
    },

    #[error("Gave up after considering {limit} slots")]
    SlotLimitExceeded { limit: usize },

    #[error("No free court left for the matches starting at {starts_at}")]
    CourtCapacity { starts_at: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtInfo {
    pub id: Uuid,
    pub number: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWindow {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

impl DailyWindow {
    /// Local start and end of the window on `date`. A closing time of
    /// 00:00 means the window runs to midnight, so 00:00-00:00 is open all
    /// day. A window that closes before it opens has no bounds.
    fn bounds_on(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let open = date.and_time(self.opens_at);
        let close = if self.closes_at == NaiveTime::MIN {
            date.succ_opt()?.and_time(NaiveTime::MIN)
        } else {
            date.and_time(self.closes_at)
        };
        (close > open).then_some((open, close))
    }
}

/// Operating hours per weekday, Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyHours([Option<DailyWindow>; 7]);

impl WeeklyHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same window every day of the week.
    pub fn every_day(opens_at: NaiveTime, closes_at: NaiveTime) -> Self {
        Self([Some(DailyWindow { opens_at, closes_at }); 7])
    }

    pub fn set(&mut self, weekday: Weekday, window: DailyWindow) {
        self.0[weekday.num_days_from_monday() as usize] = Some(window);
    }

    pub fn with(mut self, weekday: Weekday, opens_at: NaiveTime, closes_at: NaiveTime) -> Self {
        self.set(weekday, DailyWindow { opens_at, closes_at });
        self
    }

    pub fn for_weekday(&self, weekday: Weekday) -> Option<DailyWindow> {
        self.0[weekday.num_days_from_monday() as usize]
    }
}

/// A court already occupied by some booking over `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyWindow {
    pub court_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ScheduleRequest<'a> {
    pub league_id: Uuid,
    /// Active teams in roster order; the order drives the pairings.
    pub teams: &'a [Uuid],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub courts: &'a [CourtInfo],
    pub hours: &'a WeeklyHours,
    pub timezone: Tz,
    pub match_duration: Duration,
    pub busy: &'a [BusyWindow],
    pub max_slots: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMatch {
    pub round: u32,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub court_id: Uuid,
    pub court_number: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl GeneratedMatch {
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.home_team_id, self.away_team_id)
    }

    pub fn overlaps(&self, other: &GeneratedMatch) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }

    pub fn involves(&self, team_id: Uuid) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub league_id: Uuid,
    pub matches: Vec<GeneratedMatch>,
    pub byes: Vec<Bye>,
}

/// Produce the full round-robin schedule for `request`, or fail without
/// output when it cannot be placed in full.
pub fn generate_schedule(request: &ScheduleRequest<'_>) -> Result<GeneratedSchedule, ScheduleError> {
    if request.match_duration <= Duration::zero() {
        return Err(ScheduleError::InvalidDuration);
    }
    if request.start_date > request.end_date {
        return Err(ScheduleError::InvalidDateRange {
            start: request.start_date,
            end: request.end_date,
        });
    }
    if request.teams.len() < 2 {
        return Err(ScheduleError::NotEnoughTeams(request.teams.len()));
    }

    let mut unique = HashSet::with_capacity(request.teams.len());
    for team in request.teams {
        if !unique.insert(*team) {
            return Err(ScheduleError::DuplicateTeam(*team));
        }
    }

    if request.courts.is_empty() {
        return Err(ScheduleError::NoActiveCourts);
    }
    if !has_hours_in_range(request.hours, request.start_date, request.end_date) {
        return Err(ScheduleError::NoOperatingHours {
            start: request.start_date,
            end: request.end_date,
        });
    }

    let mut courts = request.courts.to_vec();
    courts.sort_by_key(|c| (c.number, c.id));
    courts.dedup_by_key(|c| c.id);

    let busy = busy_index(request.busy);
    let rounds = circle_rounds(request.teams);
    let required = required_matches(request.teams.len());

    let mut cursor = SlotCursor::new(
        request.start_date,
        request.end_date,
        request.hours,
        request.timezone,
        request.match_duration,
        request.max_slots,
    );

    let mut matches = Vec::with_capacity(required);
    let mut byes = Vec::new();

    'rounds: for round in rounds {
        let mut pending = round.pairings.iter().peekable();

        // Each round starts on a fresh slot so no team is booked twice in
        // one window; a round with more pairings than courts spills over.
        while pending.peek().is_some() {
            let Some(slot) = cursor.next_slot() else {
                break 'rounds;
            };

            for court in &courts {
                if pending.peek().is_none() {
                    break;
                }
                if is_busy(&busy, court.id, slot.start, slot.end) {
                    continue;
                }
                if let Some(pairing) = pending.next() {
                    matches.push(GeneratedMatch {
                        round: pairing.round,
                        home_team_id: pairing.home_team_id,
                        away_team_id: pairing.away_team_id,
                        court_id: court.id,
                        court_number: court.number,
                        starts_at: slot.start,
                        ends_at: slot.end,
                    });
                }
            }
        }

        if let Some(bye) = round.bye {
            byes.push(bye);
        }
    }

    if matches.len() < required {
        if cursor.hit_limit() {
            return Err(ScheduleError::SlotLimitExceeded {
                limit: request.max_slots,
            });
        }
        return Err(ScheduleError::InsufficientCapacity {
            start: request.start_date,
            end: request.end_date,
            placed: matches.len(),
            required,
        });
    }

    Ok(GeneratedSchedule {
        league_id: request.league_id,
        matches,
        byes,
    })
}

fn has_hours_in_range(hours: &WeeklyHours, start: NaiveDate, end: NaiveDate) -> bool {
    // Seven consecutive days cover every weekday.
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .take(7)
        .any(|d| {
            hours
                .for_weekday(d.weekday())
                .and_then(|w| w.bounds_on(d))
                .is_some()
        })
}

pub(crate) type BusyIndex = HashMap<Uuid, Vec<(DateTime<Utc>, DateTime<Utc>)>>;

pub(crate) fn busy_index(busy: &[BusyWindow]) -> BusyIndex {
    let mut by_court: HashMap<Uuid, Vec<_>> = HashMap::new();
    for window in busy {
        by_court
            .entry(window.court_id)
            .or_default()
            .push((window.start, window.end));
    }
    by_court
}

pub(crate) fn is_busy(
    busy: &BusyIndex,
    court_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    busy.get(&court_id)
        .map(|windows| windows.iter().any(|(s, e)| *s < end && start < *e))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Walks `[start_date, end_date]` day by day, yielding match-length slots
/// inside each day's operating window. Stops at the end of the range or
/// after `max_slots` slots, whichever comes first.
struct SlotCursor<'a> {
    date: Option<NaiveDate>,
    end_date: NaiveDate,
    hours: &'a WeeklyHours,
    timezone: Tz,
    duration: Duration,
    day_slots: std::vec::IntoIter<Slot>,
    considered: usize,
    max_slots: usize,
}

impl<'a> SlotCursor<'a> {
    fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        hours: &'a WeeklyHours,
        timezone: Tz,
        duration: Duration,
        max_slots: usize,
    ) -> Self {
        Self {
            date: Some(start_date),
            end_date,
            hours,
            timezone,
            duration,
            day_slots: Vec::new().into_iter(),
            considered: 0,
            max_slots,
        }
    }

    fn hit_limit(&self) -> bool {
        self.considered >= self.max_slots
    }

    fn next_slot(&mut self) -> Option<Slot> {
        loop {
            if self.hit_limit() {
                return None;
            }
            if let Some(slot) = self.day_slots.next() {
                self.considered += 1;
                return Some(slot);
            }

            let date = self.date.filter(|d| *d <= self.end_date)?;
            self.date = date.succ_opt();
            self.day_slots = self.slots_for(date).into_iter();
        }
    }

    fn slots_for(&self, date: NaiveDate) -> Vec<Slot> {
        let Some((open, close)) = self
            .hours
            .for_weekday(date.weekday())
            .and_then(|w| w.bounds_on(date))
        else {
            return Vec::new();
        };

        let mut slots = Vec::new();
        let mut local_start = open;
        while local_start + self.duration <= close {
            let local_end = local_start + self.duration;
            // Local times swallowed by a DST gap are skipped; ambiguous
            // ones resolve to the earlier instant.
            if let (Some(start), Some(end)) = (
                self.timezone.from_local_datetime(&local_start).earliest(),
                self.timezone.from_local_datetime(&local_end).earliest(),
            ) {
                let (start, end) = (start.with_timezone(&Utc), end.with_timezone(&Utc));
                if start < end {
                    slots.push(Slot { start, end });
                }
            }
            local_start = local_end;
        }
        slots
    }
}
