//! Poule: a round-robin group inside one tournament category.

use crate::models::competitor::CompetitorId;
use crate::models::tournament::{CategoryId, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a poule.
pub type PouleId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PouleStatus {
    /// Created, no matches yet.
    #[default]
    Pending,
    /// Matches generated and being fought.
    Active,
    /// Every match has a result.
    Completed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Poule {
    pub id: PouleId,
    pub name: String,
    pub tournament: TournamentId,
    pub category: CategoryId,
    pub competitors: Vec<CompetitorId>,
    pub status: PouleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Poule {
    pub fn new(
        name: impl Into<String>,
        tournament: TournamentId,
        category: CategoryId,
        competitors: Vec<CompetitorId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tournament,
            category,
            competitors,
            status: PouleStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: PouleStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
