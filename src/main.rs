mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, Settings};
use crate::core::{ProximityHeuristic, RecordNormalizer, Recommender, Scorer};
use crate::models::ScoringWeights;
use crate::routes::reco::AppState;
use crate::services::{MemoryStore, UpstreamClient, UrlResolver};

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn startup_error(what: &str, e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    // LOG_LEVEL / LOG_FORMAT are folded into `logging` by Settings::load
    let settings = Settings::load().map_err(|e| startup_error("Configuration error", e))?;
    init_tracing(&settings.logging);

    tracing::info!("Starting MatchPet recommendation service...");

    let ttl_secs = settings.cache.ttl_secs.unwrap_or(300);
    let max_entries = settings.cache.l1_cache_size.unwrap_or(1000);
    let store = MemoryStore::new(max_entries, ttl_secs);
    tracing::info!("Snapshot store ready ({} entries, TTL: {}s)", max_entries, ttl_secs);

    let upstream = UpstreamClient::new(
        settings.upstream.base_url.clone(),
        settings.upstream.endpoints.clone(),
        Duration::from_secs(settings.upstream.timeout_secs.unwrap_or(30)),
        store,
    )
    .map_err(|e| {
        tracing::error!("Failed to build upstream client: {}", e);
        startup_error("Upstream client error", e)
    })?
    .with_demo_fallback(settings.upstream.demo_fallback);

    tracing::info!(
        "Upstream {} ({} endpoints, demo fallback: {})",
        settings.upstream.base_url,
        settings.upstream.endpoints.len(),
        settings.upstream.demo_fallback
    );

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let recommender = Recommender::new(
        RecordNormalizer::new(UrlResolver::new(settings.upstream.asset_base())),
        Scorer::new(weights).with_proximity(ProximityHeuristic::default()),
    );
    tracing::info!("Recommender initialized with weights: {:?}", weights);

    let state = AppState {
        recommender,
        upstream: Arc::new(upstream),
        default_page_size: settings.paging.default_size,
        max_page_size: settings.paging.max_size,
    };

    let bind = (settings.server.host.clone(), settings.server.port);
    tracing::info!("Listening on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::json_error_handler))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(settings.server.workers.unwrap_or(4))
    .bind(bind)?
    .run()
    .await
}
