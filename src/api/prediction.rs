use crate::api::market::require_coin_id;
use crate::error::{AppError, Result};
use crate::services::signals::compute_snapshot;
use crate::types::PredictionSnapshot;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

/// Only daily candles are analysed.
const SUPPORTED_TIMEFRAMES: &[&str] = &["1d"];

#[derive(Debug, Deserialize)]
pub struct SignalsQuery {
    pub coin_id: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

fn default_timeframe() -> String {
    "1d".to_string()
}

/// GET /api/prediction/signals
async fn get_signals(
    State(state): State<AppState>,
    Query(query): Query<SignalsQuery>,
) -> Result<Json<PredictionSnapshot>> {
    let coin_id = require_coin_id(&query.coin_id)?;
    if !SUPPORTED_TIMEFRAMES.contains(&query.timeframe.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported timeframe: {}",
            query.timeframe
        )));
    }

    let bars = state
        .market
        .fetch_series(
            coin_id,
            state.config.prediction_lookback_days,
            &state.config.default_vs_currency,
        )
        .await?;
    let snapshot = compute_snapshot(&bars)?;

    info!(
        "Prediction for {}: {} ({:.1}%)",
        coin_id,
        snapshot.overall_signal.label(),
        snapshot.confidence
    );
    Ok(Json(snapshot))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/signals", get(get_signals))
}
