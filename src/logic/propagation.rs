//! Moving bracket winners up the tree.

use crate::models::{CompetitorId, EngineError, GameMatch, MatchId, MatchStatus, Side};
use crate::store::Store;

/// Push the winner of `from` into its next match, following forward byes.
///
/// Even `match_index` feeds `competitor1` of the parent, odd feeds
/// `competitor2`. When the parent then holds a single competitor and the
/// other slot can never be filled, the parent is completed with that
/// competitor and the walk continues upward. Rounds strictly increase along
/// links, so the loop runs at most once per round.
///
/// Returns the number of matches that received a competitor.
pub fn propagate_winner(store: &mut Store, from: MatchId) -> Result<usize, EngineError> {
    let mut current = store.matches.get(from)?.clone();
    let mut advanced = 0;

    loop {
        let (Some(winner), Some(next_id)) = (current.winner, current.next_match) else {
            return Ok(advanced);
        };
        let side = Side::for_feeder(current.match_index);

        let next = store.matches.find_by_id_mut(next_id).ok_or_else(|| {
            EngineError::Internal(format!(
                "next match {} of match {} does not exist",
                next_id, current.id
            ))
        })?;
        if next.round <= current.round {
            return Err(EngineError::Internal(format!(
                "match {} links to match {} which is not in a later round",
                current.id, next_id
            )));
        }
        next.set_competitor(side, winner);
        next.touch();
        advanced += 1;
        let next = next.clone();
        log::debug!(
            "Advanced {} from round {} into match {} (round {}, slot {:?})",
            winner,
            current.round,
            next.id,
            next.round,
            side
        );

        let Some(lone) = walkover_winner(store, &next) else {
            return Ok(advanced);
        };

        let walkover = store.matches.get_mut(next.id)?;
        walkover.complete_with(lone);
        log::debug!("Match {} resolved as a bye for {}", walkover.id, lone);
        current = walkover.clone();
    }
}

/// Re-check `match_id` after one of its feeders dropped out.
///
/// If the match holds a single competitor whose opponent slot can no longer
/// fill, it is completed as a walkover and the winner moves on. Returns
/// whether a walkover was given.
pub fn resolve_walkover(store: &mut Store, match_id: MatchId) -> Result<bool, EngineError> {
    let game = store.matches.get(match_id)?.clone();
    let Some(lone) = walkover_winner(store, &game) else {
        return Ok(false);
    };
    store.matches.get_mut(match_id)?.complete_with(lone);
    log::debug!("Match {} resolved as a walkover for {}", match_id, lone);
    propagate_winner(store, match_id)?;
    Ok(true)
}

/// The lone competitor of `game` if the other slot is empty for good.
fn walkover_winner(store: &Store, game: &GameMatch) -> Option<CompetitorId> {
    if matches!(game.status, MatchStatus::Completed | MatchStatus::Cancelled) {
        return None;
    }
    let (side, lone) = game.lone_competitor()?;
    (!slot_can_fill(store, game, side.other())).then_some(lone)
}

/// Matches whose winner feeds `target` in the given slot.
fn feeders(store: &Store, target: MatchId, side: Side) -> Vec<GameMatch> {
    store
        .matches
        .find(|m| m.next_match == Some(target) && Side::for_feeder(m.match_index) == side)
        .into_iter()
        .cloned()
        .collect()
}

/// Whether the `side` slot of `game` can still receive a competitor.
///
/// A slot stays empty for good when no feeder below it holds, or can come to
/// hold, a competitor.
fn slot_can_fill(store: &Store, game: &GameMatch, side: Side) -> bool {
    let mut pending = feeders(store, game.id, side);
    while let Some(feeder) = pending.pop() {
        if feeder.winner.is_some() {
            return true;
        }
        if feeder.status == MatchStatus::Cancelled {
            continue;
        }
        if feeder.has_competitors() {
            return true;
        }
        pending.extend(feeders(store, feeder.id, Side::One));
        pending.extend(feeders(store, feeder.id, Side::Two));
    }
    false
}
