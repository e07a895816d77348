use futures_util::future::BoxFuture;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::{snippet, ExchangeConnector};
use crate::error::{AppError, Result};
use crate::types::{ExchangeConfig, OhlcvBar, OrderResult, Ticker, TradeSide};

type HmacSha256 = Hmac<Sha256>;

const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";
const BINANCE_TESTNET_API_URL: &str = "https://testnet.binance.vision/api/v3";
const RECV_WINDOW_MS: u64 = 5000;

/// Error codes Binance uses for rejected API keys and signatures.
const AUTH_ERROR_CODES: &[i64] = &[-2014, -2015];

#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i64,
    msg: String,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: String,
}

#[derive(Debug, Deserialize)]
struct Account {
    balances: Vec<Balance>,
}

#[derive(Debug, Deserialize)]
struct Balance {
    asset: String,
    free: String,
    locked: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderAck {
    order_id: i64,
    symbol: String,
    status: String,
    executed_qty: String,
}

/// Binance spot REST connector.
pub struct BinanceConnector {
    client: Client,
    base_url: String,
    api_key: String,
    secret: String,
    closed: AtomicBool,
}

impl BinanceConnector {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let base_url = if config.testnet {
            BINANCE_TESTNET_API_URL
        } else {
            BINANCE_API_URL
        };
        Self::with_base_url(config, base_url)
    }

    /// Connector against an explicit REST root.
    pub fn with_base_url(config: &ExchangeConfig, base_url: &str) -> Result<Self> {
        if config.api_key.is_empty() || config.secret.is_empty() {
            return Err(AppError::ConnectorAuth(
                "API key and secret are required".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent("Augur/0.1")
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client: {}", e)))?;

        info!(testnet = config.testnet, "Created Binance connector");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            secret: config.secret.clone(),
            closed: AtomicBool::new(false),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(AppError::ExternalApi("Binance connector is closed".to_string()))
        } else {
            Ok(())
        }
    }

    async fn public_get<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<T> {
        self.ensure_open()?;
        let url = format!("{}{}?{}", self.base_url, path, query);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn signed<T: DeserializeOwned>(&self, method: Method, path: &str, params: &str) -> Result<T> {
        self.ensure_open()?;
        let timestamp = chrono::Utc::now().timestamp_millis();
        let query = if params.is_empty() {
            format!("recvWindow={}&timestamp={}", RECV_WINDOW_MS, timestamp)
        } else {
            format!("{}&recvWindow={}&timestamp={}", params, RECV_WINDOW_MS, timestamp)
        };
        let signature = sign(&self.secret, &query)?;
        let url = format!("{}{}?{}&signature={}", self.base_url, path, query, signature);

        let response = self
            .client
            .request(method, &url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        warn!("Binance API returned {}: {}", status, snippet(&body));
        Err(classify_error(status, &body))
    }
}

impl ExchangeConnector for BinanceConnector {
    fn fetch_recent<'a>(
        &'a self,
        symbol: &'a str,
        timeframe: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<OhlcvBar>>> {
        Box::pin(async move {
            let query = format!(
                "symbol={}&interval={}&limit={}",
                market_symbol(symbol),
                timeframe,
                limit
            );
            let rows: Vec<Vec<Value>> = self.public_get("/klines", &query).await?;
            let bars = rows
                .iter()
                .map(|row| parse_kline(row))
                .collect::<Result<Vec<_>>>()?;
            debug!("Fetched {} {} klines for {}", bars.len(), timeframe, symbol);
            Ok(bars)
        })
    }

    fn fetch_ticker<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<Ticker>> {
        Box::pin(async move {
            let query = format!("symbol={}", market_symbol(symbol));
            let ticker: TickerPrice = self.public_get("/ticker/price", &query).await?;
            Ok(Ticker {
                symbol: ticker.symbol,
                last: parse_decimal(&ticker.price)?,
                timestamp: chrono::Utc::now().timestamp_millis(),
            })
        })
    }

    fn get_balance<'a>(&'a self, currency: &'a str) -> BoxFuture<'a, Result<f64>> {
        Box::pin(async move {
            let account: Account = self.signed(Method::GET, "/account", "").await?;
            let wanted = currency.to_uppercase();
            match account.balances.iter().find(|b| b.asset == wanted) {
                Some(balance) => Ok(parse_decimal(&balance.free)? + parse_decimal(&balance.locked)?),
                None => Ok(0.0),
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
            if !(amount.is_finite() && amount > 0.0) {
                return Err(AppError::BadRequest(format!("Invalid order amount: {}", amount)));
            }
            let params = format!(
                "symbol={}&side={}&type=MARKET&quantity={}",
                market_symbol(symbol),
                side.as_str().to_uppercase(),
                amount
            );
            let ack: OrderAck = self.signed(Method::POST, "/order", &params).await?;
            info!("Placed {} market order for {} {}", side.as_str(), amount, symbol);
            Ok(OrderResult {
                order_id: ack.order_id.to_string(),
                symbol: ack.symbol,
                side,
                amount: parse_decimal(&ack.executed_qty)?,
                status: ack.status,
            })
        })
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if !self.closed.swap(true, Ordering::SeqCst) {
                info!("Closed Binance connector");
            }
        })
    }
}

/// "BTC/USDT" -> "BTCUSDT".
pub fn market_symbol(symbol: &str) -> String {
    symbol.replace(['/', '-'], "").to_uppercase()
}

/// Hex HMAC-SHA256 of the query string.
fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("HMAC key: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn classify_error(status: StatusCode, body: &str) -> AppError {
    let parsed: Option<BinanceError> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.msg.clone())
        .unwrap_or_else(|| snippet(body));

    let auth_code = parsed
        .as_ref()
        .is_some_and(|e| AUTH_ERROR_CODES.contains(&e.code));
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || auth_code {
        AppError::ConnectorAuth(message)
    } else {
        AppError::ExternalApi(format!("Binance API error {}: {}", status, message))
    }
}

fn parse_decimal(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| AppError::ExternalApi(format!("Malformed decimal from Binance: {}", raw)))
}

/// Kline row: [open_time, open, high, low, close, volume, close_time, ...].
fn parse_kline(row: &[Value]) -> Result<OhlcvBar> {
    let malformed = || AppError::ExternalApi("Malformed kline from Binance".to_string());
    if row.len() < 6 {
        return Err(malformed());
    }
    let timestamp = row[0].as_i64().ok_or_else(malformed)?;
    let field = |i: usize| -> Result<f64> {
        match &row[i] {
            Value::String(s) => parse_decimal(s),
            Value::Number(n) => n.as_f64().ok_or_else(malformed),
            _ => Err(malformed()),
        }
    };
    Ok(OhlcvBar::new(
        timestamp,
        field(1)?,
        field(2)?,
        field(3)?,
        field(4)?,
        field(5)?,
    ))
}
