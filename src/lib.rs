//! Augur - crypto market analysis and signal-driven scalping server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use services::ScalperService;
use sources::{ConnectFn, MarketDataSource};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market: Arc<dyn MarketDataSource>,
    pub scalper: Arc<ScalperService>,
    /// Builds exchange connectors for trading sessions.
    pub connect: ConnectFn,
}

impl AppState {
    pub fn new(config: Arc<Config>, market: Arc<dyn MarketDataSource>) -> Self {
        let scalper = Arc::new(ScalperService::new(config.scalper.clone()));
        Self {
            config,
            market,
            scalper,
            connect: sources::connect,
        }
    }
}

/// Full HTTP application: API routes plus CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
