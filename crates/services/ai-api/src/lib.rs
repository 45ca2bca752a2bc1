//! AI API
//!
//! Companion chat with speech output, conversation reports, family mental
//! state generation, weather and disaster-message lookups with background
//! polling, and news collection. Runs standalone or inside the combined
//! binary.

pub mod cache;
pub mod clients;
pub mod config;
pub mod handlers;
pub mod jobs;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use common::CacheBackend;
use storage::{Database, MigrateAction};

use crate::cache::{CacheStore, MemoryCache, RedisCache};
use crate::clients::{GoogleTts, KmaClient, NewsDataClient, OpenAiClient, SafetyDataClient};
use crate::config::AiApiConfig;
use crate::routes::create_router;
use crate::service::NewsManager;
use crate::state::{AppState, Clients, Repositories};

/// Run the AI API as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = AiApiConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AiApiConfig::from_env();
    storage::run_migrations(&config.database, action).await?;
    Ok(())
}

/// Cache backend named by the configuration. An unreachable Redis falls
/// back to the in-memory cache.
async fn build_cache(config: &AiApiConfig) -> Arc<dyn CacheStore> {
    match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Redis => match RedisCache::connect(&config.cache.url).await {
            Ok(cache) => {
                info!("Using Redis cache");
                Arc::new(cache)
            }
            Err(e) => {
                warn!("Redis unavailable, using in-memory cache: {}", e);
                Arc::new(MemoryCache::new())
            }
        },
    }
}

fn build_clients(config: &AiApiConfig) -> Result<Clients, Box<dyn std::error::Error>> {
    if config.openai.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; chat and reports will fail");
    }
    if config.weather.api_key.is_none() {
        warn!("WEATHER_API_KEY is not set; weather lookups will fail");
    }
    if config.disaster.api_key.is_none() {
        warn!("DISASTER_API_KEY is not set; disaster lookups will fail");
    }

    let llm = OpenAiClient::new(
        config.openai.base_url.clone(),
        config.openai.api_key.clone().unwrap_or_default(),
        Duration::from_secs(config.openai.timeout_seconds),
        config.openai.retry,
    )?;
    let tts = GoogleTts::new(
        config.tts.url.clone(),
        config.tts.output_dir.clone(),
        Duration::from_secs(config.tts.timeout_seconds),
    )?;
    let weather = KmaClient::new(
        config.weather.url.clone(),
        config.weather.api_key.clone().unwrap_or_default(),
        Duration::from_secs(config.weather.timeout_seconds),
    )?;
    let disaster = SafetyDataClient::new(
        config.disaster.url.clone(),
        config.disaster.api_key.clone().unwrap_or_default(),
        Duration::from_secs(config.disaster.timeout_seconds),
    )?;

    Ok(Clients {
        llm: Arc::new(llm),
        tts: Arc::new(tts),
        weather: Arc::new(weather),
        disaster: Arc::new(disaster),
    })
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: AiApiConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database
    let db = Database::connect(&config.database).await?;
    let db_conn = db.get_connection();

    tokio::fs::create_dir_all(&config.tts.output_dir).await?;

    let repos = Repositories::from_connection(db_conn.clone());
    let clients = build_clients(&config)?;
    let cache = build_cache(&config).await;

    // News collection only runs with a key
    if let Some(key) = config.news.api_key.clone() {
        let source = NewsDataClient::new(
            config.news.url.clone(),
            key,
            Duration::from_secs(config.news.timeout_seconds),
        )?;
        let news = Arc::new(NewsManager::new(repos.tools.clone(), Arc::new(source)));
        tokio::spawn(jobs::news_collect_task(
            news,
            Duration::from_secs(config.news_refresh_seconds),
        ));
    } else {
        info!("NEWS_API_KEY is not set; news collection disabled");
    }

    let weather_every = Duration::from_secs(config.weather_cache_seconds);
    let disaster_every = Duration::from_secs(config.disaster_cache_seconds);
    let state = AppState::new(repos, clients, cache, config).with_database(db_conn);

    tokio::spawn(jobs::weather_refresh_task(
        state.weather_service.clone(),
        weather_every,
    ));
    tokio::spawn(jobs::disaster_poll_task(
        state.disaster_service.clone(),
        disaster_every,
    ));

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("AI API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
