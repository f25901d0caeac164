use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order-independent key for a pairing of two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey(Uuid, Uuid);

impl PairKey {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn teams(&self) -> (Uuid, Uuid) {
        (self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub round: u32,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
}

impl Pairing {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.home_team_id, self.away_team_id)
    }
}

/// A team sitting out a round. A bye is not a match and counts for nothing
/// in the standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bye {
    pub round: u32,
    pub team_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub number: u32,
    pub pairings: Vec<Pairing>,
    pub bye: Option<Bye>,
}

/// Build the full single round-robin with the circle method.
///
/// The first team stays fixed while the others rotate one position per
/// round. With an odd roster a virtual bye slot is added, so each round has
/// exactly one team sitting out. Rounds are numbered from 1.
///
/// The fixed team alternates between home and away from one round to the
/// next; every other pairing keeps the orientation the rotation gives it.
pub fn circle_rounds(teams: &[Uuid]) -> Vec<Round> {
    if teams.len() < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Option<Uuid>> = teams.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let n = slots.len();
    let mut rounds = Vec::with_capacity(n - 1);

    for r in 0..(n - 1) {
        let number = r as u32 + 1;
        let mut pairings = Vec::with_capacity(n / 2);
        let mut bye = None;

        for i in 0..(n / 2) {
            let (mut a, mut b) = (slots[i], slots[n - 1 - i]);
            if i == 0 && r % 2 == 1 {
                std::mem::swap(&mut a, &mut b);
            }

            match (a, b) {
                (Some(home), Some(away)) => pairings.push(Pairing {
                    round: number,
                    home_team_id: home,
                    away_team_id: away,
                }),
                (Some(team_id), None) | (None, Some(team_id)) => {
                    bye = Some(Bye {
                        round: number,
                        team_id,
                    })
                }
                (None, None) => {}
            }
        }

        rounds.push(Round {
            number,
            pairings,
            bye,
        });

        // Keep slot 0 fixed, rotate the rest clockwise.
        slots[1..].rotate_right(1);
    }

    rounds
}

/// Number of matches a complete single round-robin needs.
pub fn required_matches(team_count: usize) -> usize {
    team_count * team_count.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn ids(n: usize) -> Vec<Uuid> {
        (1..=n as u128).map(Uuid::from_u128).collect()
    }

    #[test]
    fn pair_key_ignores_order() {
        let (a, b) = (Uuid::from_u128(7), Uuid::from_u128(3));
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
        assert_eq!(PairKey::new(a, b).teams(), (b, a));
    }

    #[test]
    fn even_roster_meets_everyone_once() {
        let teams = ids(6);
        let rounds = circle_rounds(&teams);
        assert_eq!(rounds.len(), 5);

        let mut seen = HashSet::new();
        for round in &rounds {
            assert_eq!(round.pairings.len(), 3);
            assert!(round.bye.is_none());

            let mut playing = HashSet::new();
            for p in &round.pairings {
                assert_ne!(p.home_team_id, p.away_team_id);
                assert!(playing.insert(p.home_team_id));
                assert!(playing.insert(p.away_team_id));
                assert!(seen.insert(p.key()), "pair repeated: {:?}", p);
            }
        }
        assert_eq!(seen.len(), required_matches(6));
    }

    #[test]
    fn odd_roster_has_one_bye_per_round() {
        let teams = ids(5);
        let rounds = circle_rounds(&teams);
        assert_eq!(rounds.len(), 5);

        let mut byes: HashMap<Uuid, usize> = HashMap::new();
        let mut seen = HashSet::new();
        for round in &rounds {
            assert_eq!(round.pairings.len(), 2);
            let bye = round.bye.expect("odd rosters always have a bye");
            assert!(round
                .pairings
                .iter()
                .all(|p| p.home_team_id != bye.team_id && p.away_team_id != bye.team_id));
            *byes.entry(bye.team_id).or_default() += 1;
            for p in &round.pairings {
                assert!(seen.insert(p.key()));
            }
        }

        assert_eq!(seen.len(), required_matches(5));
        assert_eq!(byes.len(), 5);
        assert!(byes.values().all(|&count| count == 1));
    }

    #[test]
    fn fixed_team_alternates_home_and_away() {
        let teams = ids(4);
        let rounds = circle_rounds(&teams);
        let fixed = teams[0];

        let home_rounds: Vec<bool> = rounds
            .iter()
            .map(|r| {
                r.pairings
                    .iter()
                    .find(|p| p.home_team_id == fixed || p.away_team_id == fixed)
                    .map(|p| p.home_team_id == fixed)
                    .unwrap()
            })
            .collect();
        assert_eq!(home_rounds, vec![true, false, true]);
    }

    #[test]
    fn same_input_same_rounds() {
        let teams = ids(7);
        assert_eq!(circle_rounds(&teams), circle_rounds(&teams));
    }

    #[test]
    fn fewer_than_two_teams_yields_nothing() {
        assert!(circle_rounds(&[]).is_empty());
        assert!(circle_rounds(&ids(1)).is_empty());
        assert_eq!(required_matches(0), 0);
        assert_eq!(required_matches(1), 0);
    }
}
