//! Tournament business logic: registration, poules, brackets, results, scheduling.

mod bracket;
mod draw;
mod poules;
mod propagation;
mod queries;
mod registration;
mod results;
mod schedule;
mod standings;

pub use bracket::{delete_bracket, generate_bracket, has_bracket, BracketShape, GenerateBracket};
pub use draw::draw_order;
pub use poules::{
    check_poule_completion, generate_poule_matches, generate_poules, GeneratePoules,
    MatchGeneration, PouleGeneration,
};
pub use propagation::{propagate_winner, resolve_walkover};
pub use queries::{active_matches, category_poules, tatami_matches, tournament_matches};
pub use registration::{
    ensure_registered, register_competitor, registered_competitors, set_participation_status,
    update_participation, ParticipationUpdate,
};
pub use results::{delete_match, record_match_result, RecordedResult, ResultUpdate, WinnerUpdate};
pub use schedule::{schedule_match, ScheduleUpdate};
pub use standings::{standings, Standing};
