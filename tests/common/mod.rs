//! Shared fixtures for integration tests.
#![allow(dead_code)]

use augur::error::{AppError, Result};
use augur::sources::{ExchangeConnector, MarketDataSource};
use augur::types::{MarketOverview, OhlcvBar, OrderResult, Ticker, TradeSide};
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const MINUTE_MS: i64 = 60_000;

/// `count` flat bars at `price`, one minute apart.
pub fn flat_bars(count: usize, price: f64, volume: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| OhlcvBar::new(i as i64 * MINUTE_MS, price, price, price, price, volume))
        .collect()
}

/// 99 flat bars at 100 followed by a breakout bar to 120 on double volume.
pub fn breakout_series() -> Vec<OhlcvBar> {
    let mut bars = flat_bars(99, 100.0, 1000.0);
    bars.push(OhlcvBar::new(99 * MINUTE_MS, 100.0, 120.0, 100.0, 120.0, 2000.0));
    bars
}

/// Mirror image of the breakout: a collapse to 80 on double volume.
pub fn breakdown_series() -> Vec<OhlcvBar> {
    let mut bars = flat_bars(99, 100.0, 1000.0);
    bars.push(OhlcvBar::new(99 * MINUTE_MS, 100.0, 100.0, 80.0, 80.0, 2000.0));
    bars
}

/// Steady decline then a jump: EMA9 crosses above EMA21 on the last bar
/// with RSI well above 50.
pub fn golden_cross_window() -> Vec<OhlcvBar> {
    let mut bars: Vec<OhlcvBar> = (0..49)
        .map(|i| {
            let close = 100.0 - i as f64;
            OhlcvBar::new(i as i64 * MINUTE_MS, close + 0.5, close + 1.0, close - 0.5, close, 500.0)
        })
        .collect();
    bars.push(OhlcvBar::new(49 * MINUTE_MS, 52.0, 151.0, 52.0, 150.0, 500.0));
    bars
}

/// Deterministic pseudo-random walk.
pub fn random_walk(count: usize, seed: u64) -> Vec<OhlcvBar> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 32) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let mut close = 1000.0;
    (0..count)
        .map(|i| {
            let open = close;
            close = (close * (1.0 + next() * 0.03)).max(1.0);
            let high = open.max(close) * (1.0 + next().abs() * 0.01);
            let low = open.min(close) * (1.0 - next().abs() * 0.01);
            let volume = 1000.0 * (1.0 + next().abs());
            OhlcvBar::new(i as i64 * MINUTE_MS, open, high, low, close, volume)
        })
        .collect()
}

/// In-memory exchange connector.
#[derive(Default)]
pub struct MockConnector {
    pub bars: Vec<OhlcvBar>,
    pub fail_fetch: bool,
    pub reject_auth: bool,
    pub fetches: AtomicUsize,
    pub closes: AtomicUsize,
    pub closed: AtomicBool,
    pub orders: Mutex<Vec<(String, TradeSide, f64)>>,
}

impl MockConnector {
    pub fn with_bars(bars: Vec<OhlcvBar>) -> Self {
        Self {
            bars,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_fetch: true,
            ..Default::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl ExchangeConnector for MockConnector {
    fn fetch_recent<'a>(
        &'a self,
        _symbol: &'a str,
        _timeframe: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<OhlcvBar>>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch {
                return Err(AppError::ExternalApi("connection reset".to_string()));
            }
            let skip = self.bars.len().saturating_sub(limit);
            Ok(self.bars[skip..].to_vec())
        })
    }

    fn fetch_ticker<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<Ticker>> {
        Box::pin(async move {
            let last = self.bars.last().map(|b| b.close).unwrap_or(0.0);
            Ok(Ticker {
                symbol: symbol.to_string(),
                last,
                timestamp: 0,
            })
        })
    }

    fn get_balance<'a>(&'a self, _currency: &'a str) -> BoxFuture<'a, Result<f64>> {
        Box::pin(async move {
            if self.reject_auth {
                Err(AppError::ConnectorAuth("Invalid API-key".to_string()))
            } else {
                Ok(1000.0)
            }
        })
    }

    fn create_market_order<'a>(
        &'a self,
        symbol: &'a str,
        side: TradeSide,
        amount: f64,
    ) -> BoxFuture<'a, Result<OrderResult>> {
        Box::pin(async move {
            self.orders
                .lock()
                .unwrap()
                .push((symbol.to_string(), side, amount));
            Ok(OrderResult {
                order_id: "1".to_string(),
                symbol: symbol.to_string(),
                side,
                amount,
                status: "FILLED".to_string(),
            })
        })
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.closed.store(true, Ordering::SeqCst);
        })
    }
}

/// In-memory market data source serving one fixed series.
pub struct MockMarket {
    pub bars: Vec<OhlcvBar>,
    pub calls: AtomicUsize,
}

impl MockMarket {
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self {
            bars,
            calls: AtomicUsize::new(0),
        }
    }
}

impl MarketDataSource for MockMarket {
    fn fetch_series<'a>(
        &'a self,
        coin_id: &'a str,
        _days: u32,
        _vs_currency: &'a str,
    ) -> BoxFuture<'a, Result<Vec<OhlcvBar>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if coin_id == "unknown-coin" {
                return Err(AppError::NotFound(format!("Coin not found: {}", coin_id)));
            }
            Ok(self.bars.clone())
        })
    }

    fn market_overview<'a>(&'a self, coin_id: &'a str) -> BoxFuture<'a, Result<MarketOverview>> {
        Box::pin(async move {
            if coin_id == "unknown-coin" {
                return Err(AppError::NotFound(format!("Coin not found: {}", coin_id)));
            }
            let price = self.bars.last().map(|b| b.close).unwrap_or(0.0);
            Ok(MarketOverview {
                name: "Bitcoin".to_string(),
                symbol: "BTC".to_string(),
                current_price: price,
                market_cap: 1.0e12,
                volume_24h: 3.0e10,
                price_change_24h: 1.2,
                price_change_7d: -3.4,
                ath: 73_000.0,
                atl: 67.8,
                circulating_supply: 19_600_000.0,
            })
        })
    }
}
