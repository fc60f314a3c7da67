//! In-memory entity store: one table per record type, keyed by id.
//!
//! Tables keep insertion order so listings (poules, matches) come back in the
//! order they were generated.

use crate::models::{
    Category, CategoryId, Competitor, EngineError, Entity, GameMatch, MatchKind, Poule,
    Tournament, TournamentId,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A record that can live in a [`Table`].
pub trait Record: Clone {
    const ENTITY: Entity;

    fn id(&self) -> Uuid;
}

impl Record for Tournament {
    const ENTITY: Entity = Entity::Tournament;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Category {
    const ENTITY: Entity = Entity::Category;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Competitor {
    const ENTITY: Entity = Entity::Competitor;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Poule {
    const ENTITY: Entity = Entity::Poule;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for GameMatch {
    const ENTITY: Entity = Entity::Match;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Clone, Debug)]
pub struct Table<T> {
    rows: HashMap<Uuid, T>,
    order: Vec<Uuid>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Record> Table<T> {
    /// Insert a record, replacing any previous one with the same id.
    pub fn create(&mut self, record: T) -> &T {
        let id = record.id();
        if self.rows.insert(id, record).is_none() {
            self.order.push(id);
        }
        &self.rows[&id]
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn find_by_id_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// Like [`Table::find_by_id`] but reports a missing record as `NotFound`.
    pub fn get(&self, id: Uuid) -> Result<&T, EngineError> {
        self.find_by_id(id)
            .ok_or_else(|| EngineError::not_found(T::ENTITY, id))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut T, EngineError> {
        self.rows
            .get_mut(&id)
            .ok_or_else(|| EngineError::not_found(T::ENTITY, id))
    }

    /// All records matching `filter`, in insertion order.
    pub fn find<F>(&self, filter: F) -> Vec<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.iter().filter(|r| filter(*r)).collect()
    }

    pub fn count<F>(&self, filter: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        self.rows.values().filter(|r| filter(*r)).count()
    }

    /// Apply `patch` to the record and return the updated copy.
    pub fn update_by_id<F>(&mut self, id: Uuid, patch: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut T),
    {
        let record = self.get_mut(id)?;
        patch(record);
        Ok(record.clone())
    }

    pub fn delete_by_id(&mut self, id: Uuid) -> Option<T> {
        let removed = self.rows.remove(&id)?;
        self.order.retain(|x| *x != id);
        Some(removed)
    }

    /// Delete every record matching `filter`; returns how many were removed.
    pub fn delete_many<F>(&mut self, filter: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let doomed: Vec<Uuid> = self
            .rows
            .values()
            .filter(|r| filter(*r))
            .map(|r| r.id())
            .collect();
        for id in &doomed {
            self.rows.remove(id);
        }
        self.order.retain(|id| self.rows.contains_key(id));
        doomed.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.rows.get(id))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All tables of the application.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub tournaments: Table<Tournament>,
    pub categories: Table<Category>,
    pub competitors: Table<Competitor>,
    pub poules: Table<Poule>,
    pub matches: Table<GameMatch>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bracket matches of one tournament category, ordered by round then position.
    pub fn bracket_matches(&self, tournament: TournamentId, category: CategoryId) -> Vec<GameMatch> {
        let mut matches: Vec<GameMatch> = self
            .matches
            .find(|m| {
                m.kind == MatchKind::Bracket
                    && m.tournament == tournament
                    && m.category == Some(category)
            })
            .into_iter()
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.round, m.match_index));
        matches
    }
}
