use std::env;
use std::time::Duration;

/// Scalper loop tuning.
#[derive(Debug, Clone)]
pub struct ScalperConfig {
    /// Pause between successful iterations.
    pub interval: Duration,
    /// Pause after a failed iteration.
    pub error_backoff: Duration,
    /// Number of bars fetched per iteration.
    pub candle_limit: usize,
    /// Bar timeframe requested from the exchange.
    pub timeframe: String,
    /// Maximum journal lines kept (oldest dropped first).
    pub log_capacity: usize,
    /// Maximum trade intents kept (oldest dropped first).
    pub trade_capacity: usize,
}

impl Default for ScalperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            error_backoff: Duration::from_secs(10),
            candle_limit: 50,
            timeframe: "1m".to_string(),
            log_capacity: 100,
            trade_capacity: 100,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// CoinGecko REST base URL.
    pub coingecko_api_url: String,
    /// CoinGecko API key (optional, raises rate limits).
    pub coingecko_api_key: Option<String>,
    /// TTL for cached OHLCV series.
    pub ohlcv_cache_ttl: Duration,
    /// TTL for cached market overviews.
    pub overview_cache_ttl: Duration,
    /// Maximum entries per response cache.
    pub cache_max_entries: usize,
    /// History window used for predictions (days).
    pub prediction_lookback_days: u32,
    /// Quote currency for market data.
    pub default_vs_currency: String,
    /// Scalper loop settings.
    pub scalper: ScalperConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            coingecko_api_url: "https://api.coingecko.com/api/v3".to_string(),
            coingecko_api_key: None,
            ohlcv_cache_ttl: Duration::from_secs(300),
            overview_cache_ttl: Duration::from_secs(60),
            cache_max_entries: 100,
            prediction_lookback_days: 90,
            default_vs_currency: "usd".to_string(),
            scalper: ScalperConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let scalper_defaults = ScalperConfig::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_env("PORT").unwrap_or(defaults.port),
            coingecko_api_url: env::var("COINGECKO_API_URL").unwrap_or(defaults.coingecko_api_url),
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok().filter(|k| !k.is_empty()),
            ohlcv_cache_ttl: parse_env("OHLCV_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ohlcv_cache_ttl),
            overview_cache_ttl: parse_env("OVERVIEW_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.overview_cache_ttl),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES").unwrap_or(defaults.cache_max_entries),
            prediction_lookback_days: parse_env("PREDICTION_LOOKBACK_DAYS")
                .unwrap_or(defaults.prediction_lookback_days),
            default_vs_currency: env::var("DEFAULT_VS_CURRENCY")
                .unwrap_or(defaults.default_vs_currency),
            scalper: ScalperConfig {
                interval: parse_env("SCALPER_INTERVAL_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(scalper_defaults.interval),
                error_backoff: parse_env("SCALPER_ERROR_BACKOFF_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(scalper_defaults.error_backoff),
                candle_limit: parse_env("SCALPER_CANDLE_LIMIT")
                    .unwrap_or(scalper_defaults.candle_limit),
                timeframe: env::var("SCALPER_TIMEFRAME").unwrap_or(scalper_defaults.timeframe),
                log_capacity: parse_env("SCALPER_LOG_CAPACITY")
                    .unwrap_or(scalper_defaults.log_capacity),
                trade_capacity: parse_env("SCALPER_TRADE_CAPACITY")
                    .unwrap_or(scalper_defaults.trade_capacity),
            },
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
