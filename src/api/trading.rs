use crate::error::Result;
use crate::types::{ExchangeConfig, ScalperStatus};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Quote currency used to verify credentials before starting.
const VERIFY_CURRENCY: &str = "USDT";

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    #[serde(default = "default_symbol")]
    pub symbol: String,
}

fn default_symbol() -> String {
    "BTC/USDT".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ControlResponse {
    pub message: String,
    pub status: ScalperStatus,
}

/// POST /api/trading/start
async fn start_trading(
    State(state): State<AppState>,
    Query(query): Query<StartQuery>,
    Json(exchange): Json<ExchangeConfig>,
) -> Result<Json<ControlResponse>> {
    if state.scalper.is_running() {
        return Ok(Json(ControlResponse {
            message: "Scalper already running".to_string(),
            status: state.scalper.status(),
        }));
    }

    let connector = (state.connect)(&exchange)?;
    if let Err(e) = connector.get_balance(VERIFY_CURRENCY).await {
        warn!("Credential check failed for {}: {}", exchange.exchange_id, e);
        connector.close().await;
        return Err(e);
    }

    let message = if state.scalper.start(connector.clone(), &query.symbol) {
        info!("Scalper started for {} on {}", query.symbol, exchange.exchange_id);
        format!("Scalper started for {}", query.symbol)
    } else {
        connector.close().await;
        "Scalper already running".to_string()
    };

    Ok(Json(ControlResponse {
        message,
        status: state.scalper.status(),
    }))
}

/// POST /api/trading/stop
async fn stop_trading(State(state): State<AppState>) -> Json<ControlResponse> {
    let message = if state.scalper.stop() {
        "Scalper stopped"
    } else {
        "Scalper is not running"
    };
    Json(ControlResponse {
        message: message.to_string(),
        status: state.scalper.status(),
    })
}

/// GET /api/trading/status
async fn get_status(State(state): State<AppState>) -> Json<ScalperStatus> {
    Json(state.scalper.status())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_trading))
        .route("/stop", post(stop_trading))
        .route("/status", get(get_status))
}
