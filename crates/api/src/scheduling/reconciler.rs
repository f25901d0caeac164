use std::collections::{BTreeMap, HashMap, HashSet};

use uuid::Uuid;

use super::generator::{busy_index, is_busy, BusyWindow, CourtInfo, GeneratedMatch, ScheduleError};
use super::round_robin::PairKey;

/// Court previously used by each pairing.
pub type CourtPreferences = HashMap<PairKey, Uuid>;

/// Build a preference map from `(home, away, court)` triples. The first
/// court seen for a pairing wins, so callers should pass rows in
/// chronological order.
pub fn preference_map<I>(rows: I) -> CourtPreferences
where
    I: IntoIterator<Item = (Uuid, Uuid, Uuid)>,
{
    let mut prefs = CourtPreferences::new();
    for (home, away, court_id) in rows {
        prefs.entry(PairKey::new(home, away)).or_insert(court_id);
    }
    prefs
}

/// Move matches back onto the courts their pairing used before, where
/// possible.
///
/// Matches are grouped by start time. Inside a group a preferred court is
/// honored when it is still active, free and not already claimed by another
/// match in the group; every other match takes the lowest-numbered court
/// left. Start times and pairings never change, only courts.
pub fn reconcile_courts(
    matches: &[GeneratedMatch],
    prefs: &CourtPreferences,
    courts: &[CourtInfo],
    busy: &[BusyWindow],
) -> Result<Vec<GeneratedMatch>, ScheduleError> {
    let mut ordered_courts = courts.to_vec();
    ordered_courts.sort_by_key(|c| (c.number, c.id));
    let by_id: HashMap<Uuid, CourtInfo> = ordered_courts.iter().map(|c| (c.id, *c)).collect();
    let busy = busy_index(busy);

    let mut groups: BTreeMap<_, Vec<usize>> = BTreeMap::new();
    for (idx, m) in matches.iter().enumerate() {
        groups.entry(m.starts_at).or_default().push(idx);
    }

    let mut out = matches.to_vec();

    for (starts_at, mut members) in groups {
        members.sort_by_key(|&i| (matches[i].court_number, i));

        let mut claimed: HashSet<Uuid> = HashSet::new();
        let mut unsatisfied = Vec::new();

        for &i in &members {
            let m = &matches[i];
            let preferred = prefs
                .get(&m.pair_key())
                .and_then(|court_id| by_id.get(court_id))
                .filter(|court| !claimed.contains(&court.id))
                .filter(|court| !is_busy(&busy, court.id, m.starts_at, m.ends_at));

            match preferred {
                Some(court) => {
                    claimed.insert(court.id);
                    out[i].court_id = court.id;
                    out[i].court_number = court.number;
                }
                None => unsatisfied.push(i),
            }
        }

        for i in unsatisfied {
            let m = &matches[i];
            let court = ordered_courts
                .iter()
                .find(|c| !claimed.contains(&c.id) && !is_busy(&busy, c.id, m.starts_at, m.ends_at))
                .ok_or(ScheduleError::CourtCapacity { starts_at })?;

            claimed.insert(court.id);
            out[i].court_id = court.id;
            out[i].court_number = court.number;
        }
    }

    Ok(out)
}
