//! Read paths over matches and poules.

use crate::models::{CategoryId, GameMatch, MatchStatus, Poule, TournamentId};
use crate::store::Store;

/// Every match of a tournament, ordered by kind, round, then position.
pub fn tournament_matches(store: &Store, tournament: TournamentId) -> Vec<GameMatch> {
    let mut matches: Vec<GameMatch> = store
        .matches
        .find(|m| m.tournament == tournament)
        .into_iter()
        .cloned()
        .collect();
    matches.sort_by_key(|m| (m.kind, m.round, m.match_index));
    matches
}

/// Matches still to be fought or being fought, in running order.
pub fn active_matches(store: &Store) -> Vec<GameMatch> {
    running_order(store, |_| true)
}

/// Active matches planned on one tatami, in running order.
pub fn tatami_matches(store: &Store, tatami: u32) -> Vec<GameMatch> {
    running_order(store, |m| m.tatami == Some(tatami))
}

/// Pending/ongoing matches passing `filter`: scheduled ones by time, unscheduled
/// last; at the same time an ongoing bout comes before a pending one.
fn running_order<F>(store: &Store, filter: F) -> Vec<GameMatch>
where
    F: Fn(&GameMatch) -> bool,
{
    let mut matches: Vec<GameMatch> = store
        .matches
        .find(|m| matches!(m.status, MatchStatus::Pending | MatchStatus::Ongoing) && filter(m))
        .into_iter()
        .cloned()
        .collect();
    matches.sort_by_key(|m| {
        (
            m.scheduled_time.is_none(),
            m.scheduled_time,
            m.status != MatchStatus::Ongoing,
        )
    });
    matches
}

pub fn category_poules(store: &Store, tournament: TournamentId, category: CategoryId) -> Vec<Poule> {
    store
        .poules
        .find(|p| p.tournament == tournament && p.category == category)
        .into_iter()
        .cloned()
        .collect()
}
