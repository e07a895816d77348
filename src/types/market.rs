use serde::{Deserialize, Serialize};

use super::EnrichedBar;

/// Snapshot of a coin's market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    pub price_change_7d: f64,
    pub ath: f64,
    pub atl: f64,
    pub circulating_supply: f64,
}

/// Chart series with indicator columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOhlcvResponse {
    pub symbol: String,
    pub prices: Vec<EnrichedBar>,
}
