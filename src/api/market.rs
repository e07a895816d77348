use crate::error::{AppError, Result};
use crate::services::signals::enrich;
use crate::types::{MarketOhlcvResponse, MarketOverview};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

/// Query parameters for the chart endpoint.
#[derive(Debug, Deserialize)]
pub struct OhlcvQuery {
    pub coin_id: String,
    #[serde(default = "default_days")]
    pub days: u32,
    pub vs_currency: Option<String>,
}

fn default_days() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub coin_id: String,
}

pub(crate) fn require_coin_id(coin_id: &str) -> Result<&str> {
    let coin_id = coin_id.trim();
    if coin_id.is_empty() {
        return Err(AppError::BadRequest("coin_id is required".to_string()));
    }
    Ok(coin_id)
}

/// GET /api/market/ohlcv
async fn get_ohlcv(
    State(state): State<AppState>,
    Query(query): Query<OhlcvQuery>,
) -> Result<Json<MarketOhlcvResponse>> {
    let coin_id = require_coin_id(&query.coin_id)?;
    if query.days == 0 {
        return Err(AppError::BadRequest("days must be positive".to_string()));
    }
    let vs_currency = query
        .vs_currency
        .as_deref()
        .unwrap_or(&state.config.default_vs_currency);

    let bars = state
        .market
        .fetch_series(coin_id, query.days, vs_currency)
        .await?;
    let frame = enrich(&bars);
    debug!("Serving {} enriched bars for {}", frame.len(), coin_id);

    Ok(Json(MarketOhlcvResponse {
        symbol: coin_id.to_uppercase(),
        prices: frame.rows,
    }))
}

/// GET /api/market/overview
async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<MarketOverview>> {
    let coin_id = require_coin_id(&query.coin_id)?;
    let overview = state.market.market_overview(coin_id).await?;
    Ok(Json(overview))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ohlcv", get(get_ohlcv))
        .route("/overview", get(get_overview))
}
