use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

/// A hypothetical buy/sell decision recorded by the scalper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Unix timestamp (milliseconds) when the intent was recorded.
    pub timestamp: i64,
    pub symbol: String,
    pub side: TradeSide,
    pub price: f64,
    pub reason: String,
}

/// Credentials and target for an exchange session.
#[derive(Clone, Deserialize)]
pub struct ExchangeConfig {
    pub exchange_id: String,
    pub api_key: String,
    pub secret: String,
    #[serde(default = "default_testnet")]
    pub testnet: bool,
}

fn default_testnet() -> bool {
    true
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("exchange_id", &self.exchange_id)
            .field("api_key", &"***")
            .field("secret", &"***")
            .field("testnet", &self.testnet)
            .finish()
    }
}

/// Last-trade quote for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub last: f64,
    pub timestamp: i64,
}

/// Exchange acknowledgement of a market order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub order_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub amount: f64,
    pub status: String,
}

/// Read-only view of the scalper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalperStatus {
    pub is_running: bool,
    pub symbol: Option<String>,
    /// Oldest first.
    pub recent_trades: Vec<TradeIntent>,
    /// Oldest first.
    pub logs: Vec<String>,
}
