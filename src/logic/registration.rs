//! Registering competitors for a tournament category.

use crate::models::{
    CategoryId, Competitor, CompetitorId, EngineError, Participation, ParticipationStatus,
    Results, TournamentId,
};
use crate::store::Store;
use serde::Deserialize;

/// Manual changes to a participation; totals and history stay derived from matches.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ParticipationUpdate {
    pub rank: Option<u32>,
    pub status: Option<ParticipationStatus>,
}

/// Register a competitor for `tournament` in `category` with empty results.
///
/// The category is attached to the tournament if it was not already.
pub fn register_competitor(
    store: &mut Store,
    competitor_id: CompetitorId,
    tournament_id: TournamentId,
    category_id: CategoryId,
) -> Result<Competitor, EngineError> {
    store.tournaments.get(tournament_id)?;
    store.categories.get(category_id)?;
    let competitor = store.competitors.get(competitor_id)?;
    if competitor.is_registered(tournament_id, category_id) {
        return Err(EngineError::AlreadyRegistered {
            competitor: competitor_id,
            tournament: tournament_id,
        });
    }

    store
        .tournaments
        .update_by_id(tournament_id, |t| t.add_category(category_id))?;
    let competitor = store.competitors.update_by_id(competitor_id, |c| {
        c.tournaments.push(Participation {
            tournament: tournament_id,
            category: category_id,
            results: Results::default(),
        });
        c.updated_at = chrono::Utc::now();
    })?;
    log::info!(
        "Registered {} for tournament {} in category {}",
        competitor.full_name(),
        tournament_id,
        category_id
    );
    Ok(competitor)
}

/// Ids of competitors registered for the tournament category, in registration-table order.
pub fn registered_competitors(
    store: &Store,
    tournament_id: TournamentId,
    category_id: CategoryId,
) -> Vec<CompetitorId> {
    store
        .competitors
        .find(|c| c.is_registered(tournament_id, category_id))
        .into_iter()
        .map(|c| c.id)
        .collect()
}

/// Every id in `competitors` must be registered for the tournament category.
pub fn ensure_registered(
    store: &Store,
    tournament_id: TournamentId,
    category_id: CategoryId,
    competitors: &[CompetitorId],
) -> Result<(), EngineError> {
    let unknown = competitors.iter().find(|id| {
        store
            .competitors
            .find_by_id(**id)
            .map_or(true, |c| !c.is_registered(tournament_id, category_id))
    });
    match unknown {
        Some(id) => Err(EngineError::UnregisteredCompetitor(*id)),
        None => Ok(()),
    }
}

/// Set the final rank and/or status of a competitor in a tournament category.
pub fn update_participation(
    store: &mut Store,
    competitor_id: CompetitorId,
    tournament_id: TournamentId,
    category_id: CategoryId,
    update: &ParticipationUpdate,
) -> Result<Competitor, EngineError> {
    let competitor = store.competitors.get_mut(competitor_id)?;
    let participation = competitor
        .participation_mut(tournament_id, category_id)
        .ok_or(EngineError::NotRegistered {
            competitor: competitor_id,
            tournament: tournament_id,
        })?;
    if let Some(rank) = update.rank {
        participation.results.rank = Some(rank);
    }
    if let Some(status) = update.status {
        participation.results.status = status;
    }
    competitor.updated_at = chrono::Utc::now();
    log::info!(
        "Updated {} in tournament {}: rank {:?}, status {:?}",
        competitor.full_name(),
        tournament_id,
        update.rank,
        update.status
    );
    Ok(competitor.clone())
}

/// Shortcut for a status-only update, e.g. disqualification.
pub fn set_participation_status(
    store: &mut Store,
    competitor_id: CompetitorId,
    tournament_id: TournamentId,
    category_id: CategoryId,
    status: ParticipationStatus,
) -> Result<Competitor, EngineError> {
    let update = ParticipationUpdate {
        status: Some(status),
        ..Default::default()
    };
    update_participation(store, competitor_id, tournament_id, category_id, &update)
}
