//! Poule stage: random group draw, round-robin match generation, completion.

use crate::logic::draw::draw_order;
use crate::logic::registration::ensure_registered;
use crate::models::{
    CategoryId, CompetitorId, EngineError, GameMatch, MatchStatus, Poule, PouleId, PouleStatus,
    TournamentId,
};
use crate::store::Store;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Request for [`generate_poules`].
#[derive(Clone, Debug, Deserialize)]
pub struct GeneratePoules {
    pub tournament: TournamentId,
    pub category: CategoryId,
    /// Upper bound on the number of poules; fewer are created if competitors run out.
    pub poules_requested: u32,
    pub competitors: Vec<CompetitorId>,
    #[serde(default)]
    pub replace_existing: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PouleGeneration {
    pub poules_created: usize,
    pub total_competitors: usize,
    pub competitors_per_poule: usize,
    pub poules: Vec<Poule>,
}

/// Outcome of a match generation (poule round robin or bracket).
#[derive(Clone, Debug, Serialize)]
pub struct MatchGeneration {
    pub matches_generated: usize,
    pub matches: Vec<GameMatch>,
}

/// Draw competitors into poules.
///
/// 1. Validate the request, the tournament/category ids and the registrations.
/// 2. Refuse if poules exist, unless `replace_existing` (then drop them and their matches).
/// 3. Shuffle and cut into chunks of `ceil(total / poules_requested)`.
pub fn generate_poules<R: Rng + ?Sized>(
    store: &mut Store,
    request: &GeneratePoules,
    rng: &mut R,
) -> Result<PouleGeneration, EngineError> {
    if request.poules_requested == 0 {
        return Err(EngineError::InvalidPouleCount);
    }
    store.tournaments.get(request.tournament)?;
    store.categories.get(request.category)?;
    if request.competitors.is_empty() {
        return Err(EngineError::NoCompetitors);
    }
    let mut seen = HashSet::with_capacity(request.competitors.len());
    if let Some(dup) = request.competitors.iter().find(|id| !seen.insert(**id)) {
        return Err(EngineError::DuplicateCompetitor(*dup));
    }

    let (tournament, category) = (request.tournament, request.category);
    ensure_registered(store, tournament, category, &request.competitors)?;
    let existing: Vec<PouleId> = store
        .poules
        .find(|p| p.tournament == tournament && p.category == category)
        .into_iter()
        .map(|p| p.id)
        .collect();
    if !existing.is_empty() {
        if !request.replace_existing {
            return Err(EngineError::PoulesExist);
        }
        let dropped_matches = store
            .matches
            .delete_many(|m| m.poule.is_some_and(|p| existing.contains(&p)));
        store
            .poules
            .delete_many(|p| p.tournament == tournament && p.category == category);
        log::info!(
            "Replaced {} poule(s) and {} poule match(es) in category {}",
            existing.len(),
            dropped_matches,
            category
        );
    }

    let drawn = draw_order(&request.competitors, rng);
    let total_competitors = drawn.len();
    let competitors_per_poule = total_competitors.div_ceil(request.poules_requested as usize);

    let poules: Vec<Poule> = drawn
        .chunks(competitors_per_poule)
        .take(request.poules_requested as usize)
        .enumerate()
        .map(|(i, chunk)| {
            let poule = Poule::new(format!("Poule {}", i + 1), tournament, category, chunk.to_vec());
            store.poules.create(poule).clone()
        })
        .collect();

    log::info!(
        "Generated {} poule(s) for {} competitor(s) in tournament {} category {}",
        poules.len(),
        total_competitors,
        tournament,
        category
    );

    Ok(PouleGeneration {
        poules_created: poules.len(),
        total_competitors,
        competitors_per_poule,
        poules,
    })
}

/// Generate the round robin of a poule: every unordered pair meets once.
///
/// Pairs are produced in `i < j` order and `match_index` is the creation
/// sequence number. The poule becomes `Active`.
pub fn generate_poule_matches(
    store: &mut Store,
    poule_id: PouleId,
) -> Result<MatchGeneration, EngineError> {
    let poule = store.poules.get(poule_id)?.clone();
    let n = poule.competitors.len();
    if n < 2 {
        return Err(EngineError::NotEnoughCompetitors {
            required: 2,
            given: n,
        });
    }
    if store.matches.count(|m| m.poule == Some(poule_id)) > 0 {
        return Err(EngineError::PouleMatchesExist(poule_id));
    }

    let mut matches = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n - 1 {
        for j in i + 1..n {
            let game = GameMatch::poule(
                poule.tournament,
                poule.category,
                poule_id,
                poule.competitors[i],
                poule.competitors[j],
                matches.len() as u32,
            );
            matches.push(store.matches.create(game).clone());
        }
    }

    store
        .poules
        .update_by_id(poule_id, |p| p.set_status(PouleStatus::Active))?;
    log::info!("Generated {} match(es) for {}", matches.len(), poule.name);

    Ok(MatchGeneration {
        matches_generated: matches.len(),
        matches,
    })
}

/// Close the poule once every one of its matches is completed.
///
/// A completed poule whose match was reopened goes back to `Active`.
/// Returns the poule's status after the check.
pub fn check_poule_completion(
    store: &mut Store,
    poule_id: PouleId,
) -> Result<PouleStatus, EngineError> {
    let current = store.poules.get(poule_id)?.status;
    let matches = store.matches.find(|m| m.poule == Some(poule_id));
    let all_completed =
        !matches.is_empty() && matches.iter().all(|m| m.status == MatchStatus::Completed);

    let next = match (all_completed, current) {
        (true, _) => PouleStatus::Completed,
        (false, PouleStatus::Completed) => PouleStatus::Active,
        (false, status) => status,
    };
    if next != current {
        store.poules.update_by_id(poule_id, |p| p.set_status(next))?;
        log::info!("Poule {} is now {:?}", poule_id, next);
    }
    Ok(next)
}
