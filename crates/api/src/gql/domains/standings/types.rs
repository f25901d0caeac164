use async_graphql::{SimpleObject, ID};

use crate::scheduling::TeamStanding as Standing;

#[derive(SimpleObject, Clone)]
pub struct TeamStanding {
    pub rank: i32,
    pub team_id: ID,
    pub team_name: String,
    pub matches_played: i32,
    pub wins: i32,
    pub losses: i32,
    pub points_for: i64,
    pub points_against: i64,
    pub point_differential: i64,
}

impl From<Standing> for TeamStanding {
    fn from(s: Standing) -> Self {
        Self {
            rank: s.rank as i32,
            team_id: s.team_id.into(),
            team_name: s.team_name,
            matches_played: s.matches_played as i32,
            wins: s.wins as i32,
            losses: s.losses as i32,
            points_for: s.points_for,
            points_against: s.points_against,
            point_differential: s.point_differential,
        }
    }
}
