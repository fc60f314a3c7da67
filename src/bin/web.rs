//! Single binary web server exposing the tournament API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT; log level with RUST_LOG.

use actix_web::{App, HttpServer};
use dojo_tournament::{api, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.default_log_filter.as_str()),
    );

    log::info!("Starting server at http://{}", config.bind_addr());

    let state = api::new_state();

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
