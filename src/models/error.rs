//! Errors returned by the tournament engine.

use crate::models::game::{MatchId, Side};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification callers use to pick a response (400 / 404 / 409 / 500).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

/// Which kind of record a lookup failed for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entity {
    Tournament,
    Category,
    Competitor,
    Poule,
    Match,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Tournament => "Tournament",
            Entity::Category => "Category",
            Entity::Competitor => "Competitor",
            Entity::Poule => "Poule",
            Entity::Match => "Match",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EngineError {
    #[error("Number of poules must be a positive integer")]
    InvalidPouleCount,
    #[error("No competitors available for this category in this tournament")]
    NoCompetitors,
    #[error("At least {required} competitors are needed (got {given})")]
    NotEnoughCompetitors { required: usize, given: usize },
    #[error("Competitor {0} appears more than once")]
    DuplicateCompetitor(Uuid),
    #[error("Slot {side:?} of match {match_id} has no competitor")]
    EmptySlot { match_id: MatchId, side: Side },
    #[error("Match {0} cannot be completed without a winner")]
    CompletedWithoutWinner(MatchId),
    #[error("Match duration must be at least one minute")]
    InvalidDuration,
    #[error("Competitor {0} is not registered in this category of the tournament")]
    UnregisteredCompetitor(Uuid),
    #[error("{entity} not found with id {id}")]
    NotFound { entity: Entity, id: Uuid },
    #[error("Poules already exist for this category in this tournament; set replace_existing to replace them")]
    PoulesExist,
    #[error("Matches have already been generated for poule {0}")]
    PouleMatchesExist(Uuid),
    #[error("A bracket already exists for this category; set replace_existing to replace it")]
    BracketExists,
    #[error("Competitor {competitor} is already registered in this category of tournament {tournament}")]
    AlreadyRegistered { competitor: Uuid, tournament: Uuid },
    #[error("Competitor {competitor} is not registered in this category of tournament {tournament}")]
    NotRegistered { competitor: Uuid, tournament: Uuid },
    #[error("Match {0} is part of a bracket; delete the whole bracket instead")]
    BracketMatchDelete(MatchId),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        EngineError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            InvalidPouleCount
            | NoCompetitors
            | NotEnoughCompetitors { .. }
            | DuplicateCompetitor(_)
            | EmptySlot { .. }
            | CompletedWithoutWinner(_)
            | InvalidDuration
            | UnregisteredCompetitor(_) => ErrorKind::Validation,
            NotFound { .. } | NotRegistered { .. } => ErrorKind::NotFound,
            PoulesExist
            | PouleMatchesExist(_)
            | BracketExists
            | AlreadyRegistered { .. }
            | BracketMatchDelete(_) => ErrorKind::Conflict,
            Internal(_) => ErrorKind::Internal,
        }
    }
}
