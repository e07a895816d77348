//! Scalper Service
//!
//! Runs at most one background loop that polls recent candles from an
//! exchange connector, evaluates an EMA crossover with an RSI filter and
//! records the resulting trade intents. No orders are placed.

pub mod journal;
pub mod strategy;

pub use journal::Ring;
pub use strategy::{decide, Snapshot, BUY_REASON, SELL_REASON};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::ScalperConfig;
use crate::error::{AppError, Result};
use crate::services::signals::{enrich_with, scalper_indicators};
use crate::sources::ExchangeConnector;
use crate::types::{ScalperStatus, TradeIntent, TradeSide};

/// Trades included in a status snapshot.
pub const STATUS_TRADES: usize = 10;
/// Log lines included in a status snapshot.
pub const STATUS_LOGS: usize = 20;

/// State shared between the service handle and its loop task.
struct Shared {
    config: ScalperConfig,
    running: AtomicBool,
    logs: Mutex<Ring<String>>,
    trades: Mutex<Ring<TradeIntent>>,
}

struct Session {
    connector: Arc<dyn ExchangeConnector>,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    symbol: Option<String>,
    session: Option<Session>,
    /// Task that waits for the stopped loop and closes its connector.
    cleanup: Option<JoinHandle<()>>,
}

/// Lifecycle manager for the scalper loop.
///
/// Construct once and share behind an `Arc`. `start` and `stop` must be
/// called from within a tokio runtime.
pub struct ScalperService {
    shared: Arc<Shared>,
    state: Mutex<State>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn log(&self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "augur::scalper", "{}", message);
        let line = format!("[{}] {}", chrono::Utc::now().format("%H:%M:%S"), message);
        lock(&self.logs).push(line);
    }

    fn record(&self, intent: TradeIntent) {
        lock(&self.trades).push(intent);
    }

    /// One poll-evaluate-record cycle.
    async fn iterate(&self, connector: &dyn ExchangeConnector, symbol: &str) -> Result<()> {
        let bars = connector
            .fetch_recent(symbol, &self.config.timeframe, self.config.candle_limit)
            .await?;
        let frame = enrich_with(&bars, &scalper_indicators());
        let (Some(prev), Some(last)) = (frame.previous(), frame.last()) else {
            return Err(AppError::ExternalApi(format!(
                "Not enough candles for {}: got {}",
                symbol,
                frame.len()
            )));
        };

        let price = last.bar.close;
        let values = &last.indicators;
        self.log(format!(
            "Price: {} | EMA Fast: {} | EMA Slow: {} | RSI: {}",
            price,
            fmt2(values.ema_9),
            fmt2(values.ema_21),
            fmt2(values.rsi)
        ));

        let (Some(prev), Some(last)) = (Snapshot::from_row(prev), Snapshot::from_row(last)) else {
            return Ok(());
        };
        if let Some((side, reason)) = decide(&prev, &last) {
            match side {
                TradeSide::Buy => self.log(format!("BULLISH SIGNAL detected at {}", price)),
                TradeSide::Sell => self.log(format!("BEARISH SIGNAL detected at {}", price)),
            }
            self.record(TradeIntent {
                timestamp: chrono::Utc::now().timestamp_millis(),
                symbol: symbol.to_string(),
                side,
                price,
                reason: reason.to_string(),
            });
        }
        Ok(())
    }
}

fn fmt2(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

async fn run_loop(
    shared: Arc<Shared>,
    connector: Arc<dyn ExchangeConnector>,
    symbol: String,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        let outcome = tokio::select! {
            _ = shutdown_rx.recv() => break,
            outcome = shared.iterate(connector.as_ref(), &symbol) => outcome,
        };

        let pause = match outcome {
            Ok(()) => shared.config.interval,
            Err(e) => {
                error!("Scalper iteration failed for {}: {}", symbol, e);
                shared.log(format!("Error in scalper loop: {}", e));
                shared.config.error_backoff
            }
        };

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = tokio::time::sleep(pause) => {}
        }
    }
    debug!("Scalper loop for {} exited", symbol);
}

impl ScalperService {
    pub fn new(config: ScalperConfig) -> Self {
        let shared = Shared {
            logs: Mutex::new(Ring::new(config.log_capacity)),
            trades: Mutex::new(Ring::new(config.trade_capacity)),
            running: AtomicBool::new(false),
            config,
        };
        Self {
            shared: Arc::new(shared),
            state: Mutex::new(State::default()),
        }
    }

    /// Start the loop for `symbol`. Returns `false` (and changes nothing)
    /// when a loop is already running.
    pub fn start(&self, connector: Arc<dyn ExchangeConnector>, symbol: &str) -> bool {
        let mut state = lock(&self.state);
        if self.shared.running.load(Ordering::SeqCst) {
            debug!("Scalper already running, ignoring start for {}", symbol);
            return false;
        }

        self.shared.running.store(true, Ordering::SeqCst);
        state.symbol = Some(symbol.to_string());
        self.shared.log(format!("Scalper started for {}", symbol));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(run_loop(
            self.shared.clone(),
            connector.clone(),
            symbol.to_string(),
            shutdown_rx,
        ));
        state.session = Some(Session {
            connector,
            shutdown_tx,
            handle,
        });
        true
    }

    /// Request the loop to stop and release its connector in the background.
    /// Returns `false` when nothing was running.
    pub fn stop(&self) -> bool {
        let mut state = lock(&self.state);
        self.shared.running.store(false, Ordering::SeqCst);
        let Some(session) = state.session.take() else {
            return false;
        };

        let _ = session.shutdown_tx.send(());
        self.shared.log("Scalper stopped");

        let Session {
            connector, handle, ..
        } = session;
        // Chain onto any earlier cleanup so `shutdown` awaits all of them.
        let earlier = state.cleanup.take();
        state.cleanup = Some(tokio::spawn(async move {
            if let Some(earlier) = earlier {
                let _ = earlier.await;
            }
            let _ = handle.await;
            connector.close().await;
        }));
        true
    }

    /// Stop and wait until the loop has exited and the connector is closed.
    pub async fn shutdown(&self) {
        self.stop();
        let cleanup = lock(&self.state).cleanup.take();
        if let Some(cleanup) = cleanup {
            let _ = cleanup.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Append a trade intent to the bounded trade journal.
    pub fn record_trade(&self, intent: TradeIntent) {
        self.shared.record(intent);
    }

    /// Snapshot taken under the lifecycle lock, so `is_running` and `symbol`
    /// always belong to the same start/stop transition.
    pub fn status(&self) -> ScalperStatus {
        let state = lock(&self.state);
        ScalperStatus {
            is_running: self.is_running(),
            symbol: state.symbol.clone(),
            recent_trades: lock(&self.shared.trades).tail(STATUS_TRADES),
            logs: lock(&self.shared.logs).tail(STATUS_LOGS),
        }
    }
}
