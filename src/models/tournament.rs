//! Tournament and Category.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Unique identifier for a category (weight class, age group, ...).
pub type CategoryId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// What the category groups by, "weight" unless told otherwise.
    pub kind: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: "weight".to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub categories: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            location: None,
            categories: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach a category once; repeated calls are no-ops.
    pub fn add_category(&mut self, category: CategoryId) {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }
}
