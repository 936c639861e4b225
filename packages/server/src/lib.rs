#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the violation map application.
//!
//! Serves the REST API the dashboard's data hooks and the AI assistant's
//! tool layer call into. The violation store is seeded at startup from a
//! CSV export of the detection pipeline; live insertion happens outside
//! this service.

mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use violation_map_analytics::EngineConfig;
use violation_map_store::{MemoryStore, ViolationStore};

/// Shared application state.
pub struct AppState {
    /// The violation record store.
    pub store: Arc<dyn ViolationStore>,
    /// Engine configuration resolved from the environment at startup.
    pub engine: EngineConfig,
}

/// Reads the client-date skew switch from the environment.
///
/// Enabled unless `CLIENT_DATE_SKEW` is set to `off`, `false`, or `0`.
/// Local development shares a clock with the browser and must not shift
/// client dates.
fn client_skew_from_env() -> bool {
    std::env::var("CLIENT_DATE_SKEW")
        .map_or(true, |v| {
            !matches!(v.to_lowercase().as_str(), "off" | "false" | "0")
        })
}

/// Starts the violation map API server.
///
/// Loads the violation store from `VIOLATIONS_DATA` (default
/// `data/violations.csv`), resolves the engine configuration, and starts
/// the Actix-Web HTTP server. This is a regular async function; the
/// caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the violations data file exists but cannot be loaded.
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let data_path =
        std::env::var("VIOLATIONS_DATA").unwrap_or_else(|_| "data/violations.csv".to_string());
    let path = Path::new(&data_path);

    let store = if path.exists() {
        log::info!("Loading violations data from {data_path}...");
        MemoryStore::from_csv_path(path).expect("Failed to load violations data")
    } else {
        log::warn!("Violations data file {data_path} not found, starting with an empty store");
        MemoryStore::empty()
    };

    let engine = EngineConfig::new(client_skew_from_env());
    log::info!(
        "Client date skew correction is {}",
        if engine.client_skew_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        engine,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/violations", web::get().to(handlers::violations))
                    .route("/violations/range", web::post().to(handlers::range))
                    .route("/violations/summary", web::get().to(handlers::summary))
                    .route(
                        "/violations/comparison",
                        web::get().to(handlers::comparison),
                    )
                    .route(
                        "/violations/totals",
                        web::get().to(handlers::totals_for_year),
                    )
                    .route(
                        "/violations/totals",
                        web::post().to(handlers::totals_interval),
                    )
                    .route("/violations/search", web::post().to(handlers::search)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
