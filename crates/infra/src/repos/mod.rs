pub mod bookings;
pub mod courts;
pub mod facilities;
pub mod leagues;
pub mod matches;
pub mod operating_hours;
pub mod team_members;
pub mod teams;

pub use bookings::{CreateBooking, FreeCourtsQuery};
pub use leagues::{LeagueFormat, LeagueStatus};
pub use matches::{CreateMatch, MatchStatus};
pub use team_members::CreateTeamMember;
