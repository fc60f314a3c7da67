//! REST API over the shared store. Mounted by the `web` binary via [`configure`].

use crate::logic::{
    active_matches, category_poules, delete_bracket, delete_match, generate_bracket,
    generate_poule_matches, generate_poules, record_match_result, register_competitor,
    registered_competitors, schedule_match, set_participation_status, standings, tatami_matches,
    tournament_matches, update_participation, GenerateBracket, GeneratePoules,
    ParticipationUpdate, ResultUpdate, ScheduleUpdate,
};
use crate::models::{
    Category, CategoryId, Competitor, CompetitorId, EngineError, ErrorKind, MatchId,
    ParticipationStatus, PouleId, Tournament, TournamentId,
};
use crate::store::Store;
use actix_web::{
    delete, get, patch, post, put,
    web::{self, Data, Json, Path},
    HttpResponse, Responder,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::RwLock;

/// In-memory state shared by all workers. Write operations hold the write
/// guard for their whole run, so multi-record updates are seen all at once.
pub type AppState = Data<RwLock<Store>>;

pub fn new_state() -> AppState {
    Data::new(RwLock::new(Store::new()))
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    date: NaiveDate,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Deserialize)]
struct CreateCategoryBody {
    name: String,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct CreateCompetitorBody {
    first_name: String,
    last_name: String,
    #[serde(default)]
    club: Option<String>,
    #[serde(default)]
    weight: Option<u32>,
}

#[derive(Deserialize)]
struct RegisterBody {
    competitor_id: CompetitorId,
    category_id: CategoryId,
}

#[derive(Deserialize)]
struct GeneratePoulesBody {
    category_id: CategoryId,
    number_of_poules: u32,
    #[serde(default)]
    replace_existing: bool,
}

#[derive(Deserialize)]
struct GenerateBracketBody {
    category_id: CategoryId,
    /// Defaults to every competitor registered in the category.
    #[serde(default)]
    competitor_ids: Option<Vec<CompetitorId>>,
    #[serde(default)]
    replace_existing: bool,
}

#[derive(Deserialize)]
struct ParticipationBody {
    category_id: CategoryId,
    #[serde(flatten)]
    update: ParticipationUpdate,
}

#[derive(Deserialize)]
struct StatusBody {
    category_id: CategoryId,
    status: ParticipationStatus,
}

/// Path segment: entity id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct IdPath {
    id: uuid::Uuid,
}

/// Path segments: competitor id and tournament id.
#[derive(Deserialize)]
struct CompetitorTournamentPath {
    id: CompetitorId,
    tournament_id: TournamentId,
}

#[derive(Deserialize)]
struct TatamiPath {
    tatami: u32,
}

/// Path segments: tournament id and category id.
#[derive(Deserialize)]
struct CategoryPath {
    id: TournamentId,
    category_id: CategoryId,
}

fn error_response(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.kind(), "message": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Internal => HttpResponse::InternalServerError().json(body),
    }
}

fn lock_error() -> HttpResponse {
    log::error!("Store lock poisoned");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": ErrorKind::Internal,
        "message": "lock error",
    }))
}

fn respond<T: serde::Serialize>(result: Result<T, EngineError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dojo-tournament",
    })
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let mut tournament = Tournament::new(body.name.trim(), body.date);
    tournament.location = body.location;
    let tournament = store.tournaments.create(tournament);
    log::info!("Created tournament {} ({})", tournament.name, tournament.id);
    HttpResponse::Created().json(tournament)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(store.tournaments.get(path.id))
}

#[post("/api/categories")]
async fn api_create_category(state: AppState, body: Json<CreateCategoryBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let mut category = Category::new(body.name.trim());
    if let Some(kind) = body.kind {
        category.kind = kind;
    }
    HttpResponse::Created().json(store.categories.create(category))
}

#[post("/api/competitors")]
async fn api_create_competitor(state: AppState, body: Json<CreateCompetitorBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let mut competitor = Competitor::new(body.first_name.trim(), body.last_name.trim());
    competitor.club = body.club;
    competitor.weight = body.weight;
    HttpResponse::Created().json(store.competitors.create(competitor))
}

#[get("/api/competitors/{id}")]
async fn api_get_competitor(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(store.competitors.get(path.id))
}

/// Register a competitor for a category of this tournament.
#[post("/api/tournaments/{id}/competitors")]
async fn api_register_competitor(
    state: AppState,
    path: Path<IdPath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(register_competitor(
        &mut store,
        body.competitor_id,
        path.id,
        body.category_id,
    ))
}

/// Set the final rank and/or status of a competitor in a tournament category.
#[put("/api/competitors/{id}/tournaments/{tournament_id}/results")]
async fn api_update_participation(
    state: AppState,
    path: Path<CompetitorTournamentPath>,
    body: Json<ParticipationBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(update_participation(
        &mut store,
        path.id,
        path.tournament_id,
        body.category_id,
        &body.update,
    ))
}

#[patch("/api/competitors/{id}/status/{tournament_id}")]
async fn api_set_participation_status(
    state: AppState,
    path: Path<CompetitorTournamentPath>,
    body: Json<StatusBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(set_participation_status(
        &mut store,
        path.id,
        path.tournament_id,
        body.category_id,
        body.status,
    ))
}

#[get("/api/tournaments/{id}/categories/{category_id}/competitors")]
async fn api_category_competitors(state: AppState, path: Path<CategoryPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let competitors: Vec<&Competitor> = registered_competitors(&store, path.id, path.category_id)
        .into_iter()
        .filter_map(|id| store.competitors.find_by_id(id))
        .collect();
    HttpResponse::Ok().json(competitors)
}

#[get("/api/tournaments/{id}/categories/{category_id}/ranking")]
async fn api_ranking(state: AppState, path: Path<CategoryPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(standings(&store, path.id, path.category_id))
}

/// Draw the registered competitors of a category into poules.
#[post("/api/tournaments/{id}/generate-poules")]
async fn api_generate_poules(
    state: AppState,
    path: Path<IdPath>,
    body: Json<GeneratePoulesBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let request = GeneratePoules {
        tournament: path.id,
        category: body.category_id,
        poules_requested: body.number_of_poules,
        competitors: registered_competitors(&store, path.id, body.category_id),
        replace_existing: body.replace_existing,
    };
    match generate_poules(&mut store, &request, &mut rand::thread_rng()) {
        Ok(generation) => HttpResponse::Created().json(generation),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/categories/{category_id}/poules")]
async fn api_category_poules(state: AppState, path: Path<CategoryPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(category_poules(&store, path.id, path.category_id))
}

#[get("/api/poules/{id}")]
async fn api_get_poule(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let poule_id: PouleId = path.id;
    respond(store.poules.get(poule_id))
}

#[post("/api/poules/{id}/generate-matches")]
async fn api_generate_poule_matches(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match generate_poule_matches(&mut store, path.id) {
        Ok(generation) => HttpResponse::Created().json(generation),
        Err(e) => error_response(&e),
    }
}

#[post("/api/tournaments/{id}/generate-bracket")]
async fn api_generate_bracket(
    state: AppState,
    path: Path<IdPath>,
    body: Json<GenerateBracketBody>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let competitors = body
        .competitor_ids
        .unwrap_or_else(|| registered_competitors(&store, path.id, body.category_id));
    let request = GenerateBracket {
        tournament: path.id,
        category: body.category_id,
        competitors,
        replace_existing: body.replace_existing,
    };
    match generate_bracket(&mut store, &request, &mut rand::thread_rng()) {
        Ok(generation) => HttpResponse::Created().json(generation),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/tournaments/{id}/categories/{category_id}/bracket")]
async fn api_delete_bracket(state: AppState, path: Path<CategoryPath>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let deleted = delete_bracket(&mut store, path.id, path.category_id);
    HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted }))
}

#[get("/api/tournaments/{id}/matches")]
async fn api_tournament_matches(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(tournament_matches(&store, path.id))
}

#[get("/api/matches/active")]
async fn api_active_matches(state: AppState) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(active_matches(&store))
}

#[get("/api/matches/tatami/{tatami}")]
async fn api_tatami_matches(state: AppState, path: Path<TatamiPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(tatami_matches(&store, path.tatami))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let store = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let match_id: MatchId = path.id;
    respond(store.matches.get(match_id))
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match delete_match(&mut store, path.id) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(&e),
    }
}

/// Plan a match: tatami, time, duration, notes.
#[put("/api/matches/{id}")]
async fn api_schedule_match(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ScheduleUpdate>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(schedule_match(&mut store, path.id, &body))
}

/// Record scores, fouls, winner and/or status of a match.
#[put("/api/matches/{id}/score")]
async fn api_record_result(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ResultUpdate>,
) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(record_match_result(&mut store, path.id, &body))
}

/// Register every route. `/api/matches/active` and `/api/matches/tatami/{tatami}`
/// come before `/api/matches/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_create_category)
        .service(api_create_competitor)
        .service(api_get_competitor)
        .service(api_register_competitor)
        .service(api_update_participation)
        .service(api_set_participation_status)
        .service(api_category_competitors)
        .service(api_ranking)
        .service(api_generate_poules)
        .service(api_category_poules)
        .service(api_get_poule)
        .service(api_generate_poule_matches)
        .service(api_generate_bracket)
        .service(api_delete_bracket)
        .service(api_tournament_matches)
        .service(api_active_matches)
        .service(api_tatami_matches)
        .service(api_get_match)
        .service(api_schedule_match)
        .service(api_delete_match)
        .service(api_record_result);
}
