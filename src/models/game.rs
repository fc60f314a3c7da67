//! Match (poule or bracket bout), Side, MatchKind and MatchStatus.

use crate::models::competitor::CompetitorId;
use crate::models::poule::PouleId;
use crate::models::tournament::{CategoryId, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

pub const DEFAULT_DURATION_MINUTES: u32 = 3;

/// One of the two competitor slots of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

impl Side {
    /// Slot a winner lands in when it moves up from the match at `match_index`.
    pub fn for_feeder(match_index: u32) -> Self {
        if match_index % 2 == 0 {
            Side::One
        } else {
            Side::Two
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// Which part of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Poule,
    Bracket,
    Finale,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Ongoing,
    Completed,
    Cancelled,
}

/// A single bout between two competitors.
///
/// Bracket matches start with both slots empty and get filled either at
/// generation time (round 1) or by winner propagation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament: TournamentId,
    pub category: Option<CategoryId>,
    pub kind: MatchKind,
    /// 1-indexed bracket round; 0 for poule matches.
    pub round: u32,
    /// Position within the round (bracket) or creation order (poule).
    pub match_index: u32,
    pub poule: Option<PouleId>,
    pub competitor1: Option<CompetitorId>,
    pub competitor2: Option<CompetitorId>,
    pub score1: u32,
    pub score2: u32,
    pub fouls1: u32,
    pub fouls2: u32,
    pub winner: Option<CompetitorId>,
    pub status: MatchStatus,
    /// Bracket match the winner advances into. None for the final.
    pub next_match: Option<MatchId>,
    /// Mat the bout is fought on.
    pub tatami: Option<u32>,
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Planned length in minutes.
    pub duration: u32,
    pub notes: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameMatch {
    fn new(tournament: TournamentId, category: Option<CategoryId>, kind: MatchKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tournament,
            category,
            kind,
            round: 0,
            match_index: 0,
            poule: None,
            competitor1: None,
            competitor2: None,
            score1: 0,
            score2: 0,
            fouls1: 0,
            fouls2: 0,
            winner: None,
            status: MatchStatus::Pending,
            next_match: None,
            tatami: None,
            scheduled_time: None,
            duration: DEFAULT_DURATION_MINUTES,
            notes: None,
            start_time: None,
            end_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Round-robin match between two poule members.
    pub fn poule(
        tournament: TournamentId,
        category: CategoryId,
        poule: PouleId,
        competitor1: CompetitorId,
        competitor2: CompetitorId,
        match_index: u32,
    ) -> Self {
        Self {
            poule: Some(poule),
            competitor1: Some(competitor1),
            competitor2: Some(competitor2),
            match_index,
            ..Self::new(tournament, Some(category), MatchKind::Poule)
        }
    }

    /// Empty bracket shell; slots and links are filled in by the builder.
    pub fn bracket_shell(
        tournament: TournamentId,
        category: CategoryId,
        round: u32,
        match_index: u32,
    ) -> Self {
        Self {
            round,
            match_index,
            ..Self::new(tournament, Some(category), MatchKind::Bracket)
        }
    }

    pub fn competitor(&self, side: Side) -> Option<CompetitorId> {
        match side {
            Side::One => self.competitor1,
            Side::Two => self.competitor2,
        }
    }

    pub fn set_competitor(&mut self, side: Side, competitor: CompetitorId) {
        match side {
            Side::One => self.competitor1 = Some(competitor),
            Side::Two => self.competitor2 = Some(competitor),
        }
    }

    /// The only filled slot, if exactly one of the two is filled.
    pub fn lone_competitor(&self) -> Option<(Side, CompetitorId)> {
        match (self.competitor1, self.competitor2) {
            (Some(c), None) => Some((Side::One, c)),
            (None, Some(c)) => Some((Side::Two, c)),
            _ => None,
        }
    }

    pub fn has_competitors(&self) -> bool {
        self.competitor1.is_some() || self.competitor2.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Mark completed with the given winner and stamp the end time.
    pub fn complete_with(&mut self, winner: CompetitorId) {
        let now = Utc::now();
        self.winner = Some(winner);
        self.status = MatchStatus::Completed;
        self.end_time = Some(now);
        self.updated_at = now;
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::One => self.score1,
            Side::Two => self.score2,
        }
    }

    pub fn fouls(&self, side: Side) -> u32 {
        match side {
            Side::One => self.fouls1,
            Side::Two => self.fouls2,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
