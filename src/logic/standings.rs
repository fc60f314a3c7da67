//! Ranking of a tournament category from the competitors' aggregated results.

use crate::models::{CategoryId, CompetitorId, ParticipationStatus, TournamentId};
use crate::store::Store;
use serde::Serialize;
use std::cmp::Reverse;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub competitor: CompetitorId,
    pub name: String,
    pub points: u32,
    pub faults: u32,
    pub rank: Option<u32>,
    pub status: ParticipationStatus,
}

/// Ranked competitors first (by rank), then the rest by points descending and faults ascending.
pub fn standings(store: &Store, tournament: TournamentId, category: CategoryId) -> Vec<Standing> {
    let mut table: Vec<Standing> = store
        .competitors
        .iter()
        .filter_map(|c| {
            let results = &c.participation(tournament, category)?.results;
            Some(Standing {
                competitor: c.id,
                name: c.full_name(),
                points: results.points,
                faults: results.faults,
                rank: results.rank,
                status: results.status,
            })
        })
        .collect();
    table.sort_by_key(|s| {
        (
            s.rank.is_none(),
            s.rank,
            Reverse(s.points),
            s.faults,
            s.name.clone(),
        )
    });
    table
}
