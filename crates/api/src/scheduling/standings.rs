//! Standings aggregation and CSV export.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CSV_HEADER: [&str; 8] = [
    "Rank",
    "Team",
    "Matches Played",
    "Wins",
    "Losses",
    "Points For",
    "Points Against",
    "Point Differential",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: Uuid,
    pub name: String,
}

/// Final score of a completed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub rank: u32,
    pub team_id: Uuid,
    pub team_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: i64,
    pub points_against: i64,
    pub point_differential: i64,
}

impl TeamStanding {
    fn empty(team: &TeamRef) -> Self {
        Self {
            rank: 0,
            team_id: team.id,
            team_name: team.name.clone(),
            matches_played: 0,
            wins: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
            point_differential: 0,
        }
    }

    fn record(&mut self, scored: i32, conceded: i32) {
        self.matches_played += 1;
        self.points_for += i64::from(scored);
        self.points_against += i64::from(conceded);
        self.point_differential = self.points_for - self.points_against;
        match scored.cmp(&conceded) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => {}
        }
    }
}

/// Rank every team in `teams` by the completed `results`.
///
/// Order: wins, point differential, points for (all descending), then team
/// name and id ascending. Results naming a team that is not in `teams` are
/// ignored, as are ties, which the recorder never stores.
pub fn compute_standings(teams: &[TeamRef], results: &[MatchScore]) -> Vec<TeamStanding> {
    let mut table: HashMap<Uuid, TeamStanding> = HashMap::with_capacity(teams.len());
    for team in teams {
        table.entry(team.id).or_insert_with(|| TeamStanding::empty(team));
    }

    for result in results {
        if result.home_score == result.away_score || result.home_team_id == result.away_team_id {
            continue;
        }
        if !table.contains_key(&result.home_team_id) || !table.contains_key(&result.away_team_id) {
            continue;
        }
        if let Some(home) = table.get_mut(&result.home_team_id) {
            home.record(result.home_score, result.away_score);
        }
        if let Some(away) = table.get_mut(&result.away_team_id) {
            away.record(result.away_score, result.home_score);
        }
    }

    let mut standings: Vec<TeamStanding> = table.into_values().collect();
    standings.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.point_differential.cmp(&a.point_differential))
            .then(b.points_for.cmp(&a.points_for))
            .then_with(|| a.team_name.cmp(&b.team_name))
            .then(a.team_id.cmp(&b.team_id))
    });

    for (idx, standing) in standings.iter_mut().enumerate() {
        standing.rank = idx as u32 + 1;
    }
    standings
}

/// Render ranked standings as CSV: header line then one row per team.
pub fn standings_to_csv(standings: &[TeamStanding]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

    for s in standings {
        push_row(
            &mut out,
            [
                s.rank.to_string(),
                s.team_name.clone(),
                s.matches_played.to_string(),
                s.wins.to_string(),
                s.losses.to_string(),
                s.points_for.to_string(),
                s.points_against.to_string(),
                s.point_differential.to_string(),
            ],
        );
    }
    out
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push_str("\r\n");
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
