//! Data structures for the tournament: competitors, poules, matches, errors.

mod competitor;
mod error;
mod game;
mod poule;
mod tournament;

pub use competitor::{
    Competitor, CompetitorId, MatchRecord, Outcome, Participation, ParticipationStatus, Results,
};
pub use error::{EngineError, Entity, ErrorKind};
pub use game::{GameMatch, MatchId, MatchKind, MatchStatus, Side, DEFAULT_DURATION_MINUTES};
pub use poule::{Poule, PouleId, PouleStatus};
pub use tournament::{Category, CategoryId, Tournament, TournamentId};
