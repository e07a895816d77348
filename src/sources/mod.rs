//! External collaborators: market data and exchange connectivity.

pub mod binance;
pub mod coingecko;

pub use binance::BinanceConnector;
pub use coingecko::CoinGeckoClient;

use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::types::{ExchangeConfig, MarketOverview, OhlcvBar, OrderResult, Ticker, TradeSide};

/// Historical market data for one-shot analysis.
pub trait MarketDataSource: Send + Sync {
    /// Daily-or-finer OHLCV history for a coin, oldest first.
    fn fetch_series<'a>(
        &'a self,
        coin_id: &'a str,
        days: u32,
        vs_currency: &'a str,
    ) -> BoxFuture<'a, Result<Vec<OhlcvBar>>>;

    fn market_overview<'a>(&'a self, coin_id: &'a str) -> BoxFuture<'a, Result<MarketOverview>>;
}

/// An authenticated session with a trading venue.
///
/// `close` releases the session and is idempotent; every other call fails
/// once the session is closed.
pub trait ExchangeConnector: Send + Sync {
    /// Most recent `limit` bars of `timeframe` (e.g. "1m"), oldest first.
    fn fetch_recent<'a>(
        &'a self,
        symbol: &'a str,
        timeframe: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<OhlcvBar>>>;

    fn fetch_ticker<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<Ticker>>;

    /// Total (free + locked) balance of `currency`.
    fn get_balance<'a>(&'a self, currency: &'a str) -> BoxFuture<'a, Result<f64>>;

    fn create_market_order<'a>(
        &'a self,
        symbol: &'a str,
        side: TradeSide,
        amount: f64,
    ) -> BoxFuture<'a, Result<OrderResult>>;

    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Builds a connector for an exchange session.
pub type ConnectFn = fn(&ExchangeConfig) -> Result<Arc<dyn ExchangeConnector>>;

/// Build a connector for the configured exchange.
pub fn connect(config: &ExchangeConfig) -> Result<Arc<dyn ExchangeConnector>> {
    match config.exchange_id.to_lowercase().as_str() {
        "binance" => Ok(Arc::new(BinanceConnector::new(config)?)),
        other => Err(AppError::BadRequest(format!(
            "Unsupported exchange: {}",
            other
        ))),
    }
}

/// Characters of an upstream error body kept for logs and messages.
const ERROR_SNIPPET_CHARS: usize = 200;

/// Leading part of an upstream response body, cut on a character boundary.
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(ERROR_SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(exchange_id: &str) -> ExchangeConfig {
        ExchangeConfig {
            exchange_id: exchange_id.to_string(),
            api_key: "key".to_string(),
            secret: "secret".to_string(),
            testnet: true,
        }
    }

    #[test]
    fn test_connect_binance() {
        assert!(connect(&config("binance")).is_ok());
        assert!(connect(&config("Binance")).is_ok());
    }

    #[test]
    fn test_connect_unknown_exchange() {
        assert!(matches!(
            connect(&config("mtgox")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_snippet_cuts_on_char_boundary() {
        let body = format!("{}é", "a".repeat(199));
        assert_eq!(body.len(), 201);
        assert_eq!(snippet(&body), body);

        let long = "é".repeat(300);
        assert_eq!(snippet(&long).chars().count(), 200);
        assert_eq!(snippet("short"), "short");
    }
}
