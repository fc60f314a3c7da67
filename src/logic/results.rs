//! Recording match results and running what follows from them.

use crate::logic::poules::check_poule_completion;
use crate::logic::propagation::{propagate_winner, resolve_walkover};
use crate::models::{
    EngineError, Entity, GameMatch, MatchId, MatchKind, MatchRecord, MatchStatus, Outcome, Side,
};
use crate::store::Store;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

/// What to do with the winner of a match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WinnerUpdate {
    /// Field omitted: leave the winner as it is.
    #[default]
    Keep,
    /// `null` or `""`: remove the winner.
    Clear,
    /// `"1"` or `"2"`: the competitor in that slot won.
    Set(Side),
}

fn winner_field<'de, D>(deserializer: D) -> Result<WinnerUpdate, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    match raw {
        None => Ok(WinnerUpdate::Clear),
        Some(serde_json::Value::String(s)) => match s.as_str() {
            "" => Ok(WinnerUpdate::Clear),
            "1" => Ok(WinnerUpdate::Set(Side::One)),
            "2" => Ok(WinnerUpdate::Set(Side::Two)),
            other => Err(D::Error::custom(format!("invalid winner {other:?}, expected \"1\" or \"2\""))),
        },
        Some(serde_json::Value::Number(n)) => match n.as_u64() {
            Some(1) => Ok(WinnerUpdate::Set(Side::One)),
            Some(2) => Ok(WinnerUpdate::Set(Side::Two)),
            _ => Err(D::Error::custom(format!("invalid winner {n}, expected 1 or 2"))),
        },
        Some(other) => Err(D::Error::custom(format!("invalid winner {other}"))),
    }
}

/// Partial update of a match; omitted fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResultUpdate {
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub fouls1: Option<u32>,
    pub fouls2: Option<u32>,
    #[serde(default, deserialize_with = "winner_field")]
    pub winner: WinnerUpdate,
    pub status: Option<MatchStatus>,
}

/// The updated match, plus a note if downstream updates could not be applied.
#[derive(Clone, Debug, Serialize)]
pub struct RecordedResult {
    #[serde(flatten)]
    pub game: GameMatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation_warning: Option<String>,
}

/// Apply a result update to a match.
///
/// A match has a winner exactly when it is `Completed`. Setting a winner (or
/// status `Completed` on a match that has one) completes it and stamps
/// `end_time`; then the bracket winner moves up, the poule is checked for
/// completion and both competitors' results are updated. Moving a match back
/// to `Pending`/`Ongoing`/`Cancelled` drops its winner.
///
/// Cancelling a bracket match re-checks its next match, which may now be a
/// walkover for the competitor already waiting there.
///
/// Failures in the downstream steps are logged and reported through
/// `propagation_warning`; the result itself is still recorded.
pub fn record_match_result(
    store: &mut Store,
    match_id: MatchId,
    update: &ResultUpdate,
) -> Result<RecordedResult, EngineError> {
    let mut game = store.matches.get(match_id)?.clone();
    let was_completed = game.is_completed();
    let was_cancelled = game.status == MatchStatus::Cancelled;
    let now = Utc::now();

    if let Some(v) = update.score1 {
        game.score1 = v;
    }
    if let Some(v) = update.score2 {
        game.score2 = v;
    }
    if let Some(v) = update.fouls1 {
        game.fouls1 = v;
    }
    if let Some(v) = update.fouls2 {
        game.fouls2 = v;
    }

    match update.winner {
        WinnerUpdate::Keep => {}
        WinnerUpdate::Clear => game.winner = None,
        WinnerUpdate::Set(side) => {
            let winner = game
                .competitor(side)
                .ok_or(EngineError::EmptySlot { match_id, side })?;
            game.winner = Some(winner);
        }
    }

    match update.status {
        Some(MatchStatus::Completed) if game.winner.is_none() => {
            return Err(EngineError::CompletedWithoutWinner(match_id));
        }
        Some(status @ (MatchStatus::Pending | MatchStatus::Ongoing | MatchStatus::Cancelled))
            if !matches!(update.winner, WinnerUpdate::Set(_)) =>
        {
            game.winner = None;
            if status == MatchStatus::Ongoing && game.status != MatchStatus::Ongoing {
                game.start_time = Some(now);
            }
            game.status = status;
        }
        _ => {}
    }

    let finished = game.winner.is_some();
    if finished {
        if !was_completed {
            game.end_time = Some(now);
        }
        game.status = MatchStatus::Completed;
    } else if game.status == MatchStatus::Completed {
        game.status = if game.start_time.is_some() {
            MatchStatus::Ongoing
        } else {
            MatchStatus::Pending
        };
    }
    if !finished {
        game.end_time = None;
    }
    game.updated_at = now;

    let game = store.matches.update_by_id(match_id, |m| *m = game)?;
    log::info!(
        "Recorded match {}: {}-{} (fouls {}-{}), status {:?}",
        game.id,
        game.score1,
        game.score2,
        game.fouls1,
        game.fouls2,
        game.status
    );

    let mut warnings = Vec::new();
    if finished || was_completed {
        update_competitor_results(store, &game);
    }
    if finished && game.kind == MatchKind::Bracket && game.next_match.is_some() {
        if let Err(e) = propagate_winner(store, game.id) {
            log::error!("Failed to propagate winner of match {}: {}", game.id, e);
            warnings.push(format!("winner not propagated: {e}"));
        }
    }
    let cancelled = game.status == MatchStatus::Cancelled && !was_cancelled;
    if cancelled && game.kind == MatchKind::Bracket {
        if let Some(next) = game.next_match {
            if let Err(e) = resolve_walkover(store, next) {
                log::error!("Failed to re-check match {} after cancelling {}: {}", next, game.id, e);
                warnings.push(format!("next match not re-checked: {e}"));
            }
        }
    }
    if game.kind == MatchKind::Poule && (finished || was_completed) {
        if let Some(poule) = game.poule {
            if let Err(e) = check_poule_completion(store, poule) {
                log::error!("Failed to check completion of poule {}: {}", poule, e);
                warnings.push(format!("poule completion not checked: {e}"));
            }
        }
    }

    Ok(RecordedResult {
        game,
        propagation_warning: (!warnings.is_empty()).then(|| warnings.join("; ")),
    })
}

/// Write (or withdraw) this match in both competitors' participation results.
///
/// Competitors not registered for the match's tournament category are skipped.
fn update_competitor_results(store: &mut Store, game: &GameMatch) {
    let Some(category) = game.category else {
        return;
    };
    for side in [Side::One, Side::Two] {
        let Some(competitor_id) = game.competitor(side) else {
            continue;
        };
        let Some(competitor) = store.competitors.find_by_id_mut(competitor_id) else {
            log::warn!("Competitor {} of match {} no longer exists", competitor_id, game.id);
            continue;
        };
        let Some(participation) = competitor.participation_mut(game.tournament, category) else {
            continue;
        };
        match game.winner {
            Some(winner) => participation.results.record(MatchRecord {
                match_id: game.id,
                opponent: game.competitor(side.other()),
                outcome: if winner == competitor_id {
                    Outcome::Win
                } else {
                    Outcome::Loss
                },
                points: game.score(side),
                faults: game.fouls(side),
            }),
            None => participation.results.forget(game.id),
        }
        competitor.updated_at = Utc::now();
    }
}

/// Delete a single poule match and re-check its poule.
///
/// Bracket matches are linked to each other and can only go with the whole
/// bracket, see [`crate::logic::delete_bracket`].
pub fn delete_match(store: &mut Store, match_id: MatchId) -> Result<GameMatch, EngineError> {
    let game = store.matches.get(match_id)?;
    if game.kind == MatchKind::Bracket {
        return Err(EngineError::BracketMatchDelete(match_id));
    }
    let game = store
        .matches
        .delete_by_id(match_id)
        .ok_or_else(|| EngineError::not_found(Entity::Match, match_id))?;
    log::info!("Deleted match {}", match_id);
    if let Some(poule) = game.poule {
        check_poule_completion(store, poule)?;
    }
    Ok(game)
}
