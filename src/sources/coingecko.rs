use futures_util::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{snippet, MarketDataSource};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::Cache;
use crate::types::{MarketOverview, OhlcvBar};

/// `/coins/{id}/market_chart` response; each point is `[timestamp_ms, value]`.
#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    total_volumes: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct CoinDetail {
    name: String,
    symbol: String,
    market_data: MarketData,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    #[serde(default)]
    current_price: HashMap<String, f64>,
    #[serde(default)]
    market_cap: HashMap<String, f64>,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    ath: HashMap<String, f64>,
    #[serde(default)]
    atl: HashMap<String, f64>,
    circulating_supply: Option<f64>,
}

/// CoinGecko REST client with response caching.
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    vs_currency: String,
    series_cache: Cache<Vec<OhlcvBar>>,
    overview_cache: Cache<MarketOverview>,
}

impl CoinGeckoClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Augur/0.1 (Crypto Market Analysis)")
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.coingecko_api_url.trim_end_matches('/').to_string(),
            api_key: config.coingecko_api_key.clone(),
            vs_currency: config.default_vs_currency.clone(),
            series_cache: Cache::new(config.ohlcv_cache_ttl, config.cache_max_entries),
            overview_cache: Cache::new(config.overview_cache_ttl, config.cache_max_entries),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        coin_id: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(query);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("x_cg_pro_api_key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Coin not found: {}", coin_id)));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("CoinGecko API returned {}: {}", status, snippet(&text));
            return Err(AppError::ExternalApi(format!(
                "CoinGecko API error: {}",
                status
            )));
        }
        Ok(response.json().await?)
    }

    async fn load_series(&self, coin_id: &str, days: u32, vs_currency: &str) -> Result<Vec<OhlcvBar>> {
        let query = [
            ("vs_currency", vs_currency.to_string()),
            ("days", days.to_string()),
        ];
        let path = format!("/coins/{}/ohlc", coin_id);
        let ohlc: Vec<[f64; 5]> = self.get_json(&path, &query, coin_id).await?;

        let path = format!("/coins/{}/market_chart", coin_id);
        let chart: MarketChart = self.get_json(&path, &query, coin_id).await?;

        let bars = merge_volumes(&ohlc, &chart.total_volumes);
        debug!("Fetched {} bars for {} ({}d)", bars.len(), coin_id, days);
        Ok(bars)
    }

    async fn load_overview(&self, coin_id: &str) -> Result<MarketOverview> {
        let query = [
            ("localization", "false".to_string()),
            ("tickers", "false".to_string()),
            ("community_data", "false".to_string()),
            ("developer_data", "false".to_string()),
        ];
        let path = format!("/coins/{}", coin_id);
        let detail: CoinDetail = self.get_json(&path, &query, coin_id).await?;

        let currency = self.vs_currency.as_str();
        let pick = |map: &HashMap<String, f64>| map.get(currency).copied().unwrap_or(0.0);
        let data = &detail.market_data;
        Ok(MarketOverview {
            name: detail.name.clone(),
            symbol: detail.symbol.to_uppercase(),
            current_price: pick(&data.current_price),
            market_cap: pick(&data.market_cap),
            volume_24h: pick(&data.total_volume),
            price_change_24h: data.price_change_percentage_24h.unwrap_or(0.0),
            price_change_7d: data.price_change_percentage_7d.unwrap_or(0.0),
            ath: pick(&data.ath),
            atl: pick(&data.atl),
            circulating_supply: data.circulating_supply.unwrap_or(0.0),
        })
    }
}

impl MarketDataSource for CoinGeckoClient {
    fn fetch_series<'a>(
        &'a self,
        coin_id: &'a str,
        days: u32,
        vs_currency: &'a str,
    ) -> BoxFuture<'a, Result<Vec<OhlcvBar>>> {
        Box::pin(async move {
            let key = format!("{}:{}:{}", coin_id, days, vs_currency);
            self.series_cache
                .get_or_try_fetch(&key, || self.load_series(coin_id, days, vs_currency))
                .await
        })
    }

    fn market_overview<'a>(&'a self, coin_id: &'a str) -> BoxFuture<'a, Result<MarketOverview>> {
        Box::pin(async move {
            self.overview_cache
                .get_or_try_fetch(coin_id, || self.load_overview(coin_id))
                .await
        })
    }
}

/// Attach volumes to OHLC rows by timestamp.
///
/// Exact timestamp matches win; otherwise the nearest volume sample is used.
/// Rows get zero volume when no samples exist at all.
fn merge_volumes(ohlc: &[[f64; 5]], volumes: &[[f64; 2]]) -> Vec<OhlcvBar> {
    let mut samples: Vec<(i64, f64)> = volumes.iter().map(|v| (v[0] as i64, v[1])).collect();
    samples.sort_by_key(|(ts, _)| *ts);
    let exact: HashMap<i64, f64> = samples.iter().copied().collect();

    ohlc.iter()
        .map(|row| {
            let ts = row[0] as i64;
            let volume = exact
                .get(&ts)
                .copied()
                .or_else(|| nearest(&samples, ts))
                .unwrap_or(0.0);
            OhlcvBar::new(ts, row[1], row[2], row[3], row[4], volume)
        })
        .collect()
}

fn nearest(samples: &[(i64, f64)], ts: i64) -> Option<f64> {
    let idx = samples.partition_point(|(t, _)| *t < ts);
    let after = samples.get(idx);
    let before = idx.checked_sub(1).and_then(|i| samples.get(i));
    match (before, after) {
        (Some(b), Some(a)) => {
            if ts - b.0 <= a.0 - ts {
                Some(b.1)
            } else {
                Some(a.1)
            }
        }
        (Some(only), None) | (None, Some(only)) => Some(only.1),
        (None, None) => None,
    }
}
