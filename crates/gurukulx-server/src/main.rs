//! GurukulX Whiteboard API Server
//!
//! Serves the AI-assist, speech and vision endpoints the whiteboard calls.
//! Collaborators are local mocks with a fixed delay.
//!
//! ## Environment
//!
//! - `GURUKULX_ADDR`: listen address, default `0.0.0.0:3030`
//! - `GURUKULX_MOCK_DELAY_MS`: mock latency, default 500
//! - `RUST_LOG`: tracing filter

mod api;

use gurukulx_assist::{AssistConfig, Collaborators};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};

const DEFAULT_ADDR: &str = "0.0.0.0:3030";

fn listen_addr() -> SocketAddr {
    let fallback = SocketAddr::from(([0, 0, 0, 0], 3030));
    match std::env::var("GURUKULX_ADDR") {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Ignoring GURUKULX_ADDR={}: {}; using {}", raw, e, DEFAULT_ADDR);
            fallback
        }),
        Err(_) => fallback,
    }
}

fn assist_config() -> AssistConfig {
    let mut config = AssistConfig::default();
    if let Some(delay) = std::env::var("GURUKULX_MOCK_DELAY_MS")
        .ok()
        .and_then(|raw| raw.parse().ok())
    {
        config.mock_delay_ms = delay;
    }
    config
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gurukulx_server=info,tower_http=info".into()),
        )
        .init();

    let config = assist_config();
    let state = Arc::new(api::AppState::new(Collaborators::mock(&config)));
    let app = api::router(state);

    let addr = listen_addr();
    info!("GurukulX whiteboard API listening on {}", addr);
    info!("Mock collaborators respond after {}ms", config.mock_delay_ms);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
