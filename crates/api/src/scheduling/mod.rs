//! Pure scheduling core: no I/O, no clocks except where passed in.

pub mod generator;
pub mod reconciler;
pub mod round_robin;
pub mod roster_lock;
pub mod standings;

pub use generator::{
    generate_schedule, BusyWindow, CourtInfo, DailyWindow, GeneratedMatch, GeneratedSchedule,
    ScheduleError, ScheduleRequest, WeeklyHours, DEFAULT_MATCH_MINUTES, DEFAULT_MAX_SLOTS,
};
pub use reconciler::{preference_map, reconcile_courts, CourtPreferences};
pub use round_robin::{circle_rounds, Bye, PairKey, Pairing};
pub use roster_lock::{is_roster_locked, lock_instant, parse_timezone, UnknownTimezone};
pub use standings::{compute_standings, standings_to_csv, MatchScore, TeamRef, TeamStanding};
