//! Single-elimination bracket: tree shape, generation with byes, deletion.

use crate::logic::draw::draw_order;
use crate::logic::poules::MatchGeneration;
use crate::logic::propagation::propagate_winner;
use crate::logic::registration::ensure_registered;
use crate::models::{
    CategoryId, CompetitorId, EngineError, GameMatch, MatchKind, MatchId, TournamentId,
};
use crate::store::Store;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Request for [`generate_bracket`].
#[derive(Clone, Debug, Deserialize)]
pub struct GenerateBracket {
    pub tournament: TournamentId,
    pub category: CategoryId,
    pub competitors: Vec<CompetitorId>,
    #[serde(default)]
    pub replace_existing: bool,
}

/// Dimensions of a bracket for a given field size.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BracketShape {
    pub competitors: usize,
    pub num_rounds: u32,
    pub total_positions: usize,
    pub total_matches: usize,
    pub first_round_matches: usize,
    pub num_byes: usize,
}

impl BracketShape {
    /// Shape for a field of `competitors`, padded to the next power of two.
    /// `None` below two entrants.
    pub fn for_competitors(competitors: usize) -> Option<Self> {
        if competitors < 2 {
            return None;
        }
        let num_rounds = usize::BITS - (competitors - 1).leading_zeros();
        let total_positions = 1usize << num_rounds;
        Some(Self {
            competitors,
            num_rounds,
            total_positions,
            total_matches: total_positions - 1,
            first_round_matches: total_positions / 2,
            num_byes: total_positions - competitors,
        })
    }

    /// Number of matches in 1-indexed `round`.
    pub fn matches_in_round(&self, round: u32) -> usize {
        1 << (self.num_rounds - round)
    }

    /// Position of the first match of `round` in the flattened, round-ordered match list.
    pub fn round_offset(&self, round: u32) -> usize {
        self.total_positions - (1 << (self.num_rounds - round + 1))
    }

    /// Round-1 matches that get two competitors; the rest are byes.
    pub fn full_first_round_matches(&self) -> usize {
        self.first_round_matches - self.num_byes
    }
}

/// Build the bracket for a tournament category.
///
/// Match shells are laid out round by round (round 1 first), linked to their
/// parent at `floor(index / 2)` in the next round, and round 1 is filled in
/// draw order. Byes go to the last round-1 matches, one competitor each; they
/// are completed at once and their winners moved up before returning.
pub fn generate_bracket<R: Rng + ?Sized>(
    store: &mut Store,
    request: &GenerateBracket,
    rng: &mut R,
) -> Result<MatchGeneration, EngineError> {
    let n = request.competitors.len();
    let Some(shape) = BracketShape::for_competitors(n) else {
        return Err(EngineError::NotEnoughCompetitors {
            required: 2,
            given: n,
        });
    };
    let mut seen = HashSet::with_capacity(n);
    if let Some(dup) = request.competitors.iter().find(|id| !seen.insert(**id)) {
        return Err(EngineError::DuplicateCompetitor(*dup));
    }
    store.tournaments.get(request.tournament)?;
    store.categories.get(request.category)?;

    let (tournament, category) = (request.tournament, request.category);
    ensure_registered(store, tournament, category, &request.competitors)?;
    if has_bracket(store, tournament, category) {
        if !request.replace_existing {
            return Err(EngineError::BracketExists);
        }
        delete_bracket(store, tournament, category);
    }

    let drawn = draw_order(&request.competitors, rng);
    let mut arena = lay_out(&shape, tournament, category);
    seat_first_round(&shape, &mut arena, &drawn);

    let byes: Vec<MatchId> = arena[..shape.first_round_matches]
        .iter_mut()
        .filter_map(|m| {
            let (_, lone) = m.lone_competitor()?;
            m.complete_with(lone);
            Some(m.id)
        })
        .collect();

    for game in arena {
        store.matches.create(game);
    }
    for bye in &byes {
        propagate_winner(store, *bye)?;
    }

    log::info!(
        "Generated bracket for tournament {} category {}: {} competitor(s), {} round(s), {} match(es), {} bye(s)",
        tournament,
        category,
        n,
        shape.num_rounds,
        shape.total_matches,
        byes.len()
    );

    let matches = store.bracket_matches(tournament, category);
    Ok(MatchGeneration {
        matches_generated: matches.len(),
        matches,
    })
}

/// Empty match shells for every round, with `next_match` links wired.
fn lay_out(shape: &BracketShape, tournament: TournamentId, category: CategoryId) -> Vec<GameMatch> {
    let mut arena = Vec::with_capacity(shape.total_matches);
    for round in 1..=shape.num_rounds {
        for index in 0..shape.matches_in_round(round) {
            arena.push(GameMatch::bracket_shell(tournament, category, round, index as u32));
        }
    }

    for round in 1..shape.num_rounds {
        let start = shape.round_offset(round);
        let parent_start = shape.round_offset(round + 1);
        for index in 0..shape.matches_in_round(round) {
            let parent = arena[parent_start + index / 2].id;
            arena[start + index].next_match = Some(parent);
        }
    }
    arena
}

/// Fill round 1 in draw order: full matches first, then one competitor per bye match.
fn seat_first_round(shape: &BracketShape, arena: &mut [GameMatch], drawn: &[CompetitorId]) {
    let full = shape.full_first_round_matches();
    let mut next = drawn.iter().copied();
    for (index, game) in arena[..shape.first_round_matches].iter_mut().enumerate() {
        game.competitor1 = next.next();
        if index < full {
            game.competitor2 = next.next();
        }
    }
}

pub fn has_bracket(store: &Store, tournament: TournamentId, category: CategoryId) -> bool {
    store.matches.count(|m| {
        m.kind == MatchKind::Bracket && m.tournament == tournament && m.category == Some(category)
    }) > 0
}

/// Remove every bracket match of the tournament category. Returns how many were deleted.
pub fn delete_bracket(store: &mut Store, tournament: TournamentId, category: CategoryId) -> usize {
    let removed = store.matches.delete_many(|m| {
        m.kind == MatchKind::Bracket && m.tournament == tournament && m.category == Some(category)
    });
    if removed > 0 {
        log::info!(
            "Deleted bracket of tournament {} category {} ({} match(es))",
            tournament,
            category,
            removed
        );
    }
    removed
}
