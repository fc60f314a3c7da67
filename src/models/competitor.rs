//! Competitor and its per-tournament participation records.

use crate::models::game::MatchId;
use crate::models::tournament::{CategoryId, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor.
pub type CompetitorId = Uuid;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

/// One fought match as seen from a competitor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub opponent: Option<CompetitorId>,
    pub outcome: Outcome,
    pub points: u32,
    pub faults: u32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    #[default]
    Registered,
    Active,
    Completed,
    Disqualified,
}

/// Aggregated results for one tournament + category.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub points: u32,
    pub faults: u32,
    pub rank: Option<u32>,
    pub matches: Vec<MatchRecord>,
    pub status: ParticipationStatus,
}

impl Results {
    /// Insert or replace the history entry for `record.match_id`, then recompute totals.
    pub fn record(&mut self, record: MatchRecord) {
        match self.matches.iter_mut().find(|m| m.match_id == record.match_id) {
            Some(existing) => *existing = record,
            None => self.matches.push(record),
        }
        self.totals();
        if self.status == ParticipationStatus::Registered {
            self.status = ParticipationStatus::Active;
        }
    }

    /// Drop the history entry of a match whose result was withdrawn.
    pub fn forget(&mut self, match_id: MatchId) {
        self.matches.retain(|m| m.match_id != match_id);
        self.totals();
    }

    fn totals(&mut self) {
        self.points = self.matches.iter().map(|m| m.points).sum();
        self.faults = self.matches.iter().map(|m| m.faults).sum();
    }
}

/// Registration of a competitor for a tournament in a given category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub tournament: TournamentId,
    pub category: CategoryId,
    pub results: Results,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub first_name: String,
    pub last_name: String,
    pub club: Option<String>,
    /// Weight in kilograms, used for category placement.
    pub weight: Option<u32>,
    pub tournaments: Vec<Participation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Competitor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            club: None,
            weight: None,
            tournaments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn participation(&self, tournament: TournamentId, category: CategoryId) -> Option<&Participation> {
        self.tournaments
            .iter()
            .find(|p| p.tournament == tournament && p.category == category)
    }

    pub fn participation_mut(
        &mut self,
        tournament: TournamentId,
        category: CategoryId,
    ) -> Option<&mut Participation> {
        self.tournaments
            .iter_mut()
            .find(|p| p.tournament == tournament && p.category == category)
    }

    pub fn is_registered(&self, tournament: TournamentId, category: CategoryId) -> bool {
        self.participation(tournament, category).is_some()
    }
}
