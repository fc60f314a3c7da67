//! Planning matches onto tatamis.

use crate::models::{EngineError, GameMatch, MatchId};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Partial update of a match's planning; omitted fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScheduleUpdate {
    pub tatami: Option<u32>,
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Minutes.
    pub duration: Option<u32>,
    pub notes: Option<String>,
}

pub fn schedule_match(
    store: &mut Store,
    match_id: MatchId,
    update: &ScheduleUpdate,
) -> Result<GameMatch, EngineError> {
    if update.duration == Some(0) {
        return Err(EngineError::InvalidDuration);
    }
    let game = store.matches.update_by_id(match_id, |m| {
        if let Some(tatami) = update.tatami {
            m.tatami = Some(tatami);
        }
        if let Some(at) = update.scheduled_time {
            m.scheduled_time = Some(at);
        }
        if let Some(duration) = update.duration {
            m.duration = duration;
        }
        if let Some(notes) = &update.notes {
            m.notes = Some(notes.clone());
        }
        m.touch();
    })?;
    log::info!(
        "Scheduled match {} on tatami {:?} at {:?}",
        game.id,
        game.tatami,
        game.scheduled_time
    );
    Ok(game)
}
