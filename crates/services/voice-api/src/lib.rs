//! Voice API
//!
//! Wake-word gated speech-to-text and the voice chat relay that feeds the
//! transcript to the companion chat. Runs standalone or inside the combined
//! binary.

pub mod clients;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::clients::{GoogleSpeechClient, HttpRelay};
use crate::config::VoiceApiConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the voice API as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = VoiceApiConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: VoiceApiConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.speech.api_key.is_none() {
        warn!("GOOGLE_SPEECH_API_KEY is not set; speech recognition will fail");
    }

    let recognizer = GoogleSpeechClient::new(
        config.speech.url.clone(),
        config.speech.api_key.clone().unwrap_or_default(),
        config.timeouts.speech(),
    )?;
    let relay = HttpRelay::new(
        config.stt_api_url.clone(),
        config.chat_api_url.clone(),
        config.timeouts.stt_request(),
        config.timeouts.chat_request(),
    )?;

    let state = AppState::new(Arc::new(recognizer), Arc::new(relay), config);

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Voice API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
