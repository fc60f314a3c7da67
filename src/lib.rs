//! Martial-arts tournament backend: library with models, store and business logic.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    generate_bracket, generate_poule_matches, generate_poules, record_match_result,
    register_competitor, standings, GenerateBracket, GeneratePoules, MatchGeneration,
    PouleGeneration, RecordedResult, ResultUpdate,
};
pub use models::{
    Category, CategoryId, Competitor, CompetitorId, EngineError, ErrorKind, GameMatch, MatchId,
    MatchKind, MatchStatus, Poule, PouleId, PouleStatus, Side, Tournament, TournamentId,
};
pub use store::Store;
