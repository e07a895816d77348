use serde::{Deserialize, Serialize};

use super::OhlcvBar;

/// Name of a derived indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKey {
    Rsi,
    Macd,
    MacdSignal,
    MacdHist,
    BbLower,
    BbMiddle,
    BbUpper,
    Sma20,
    Sma50,
    Ema9,
    Ema21,
    StochK,
    StochD,
    Atr,
    Willr,
    Cci,
    VolChange,
    PriceChange,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 18] = [
        IndicatorKey::Rsi,
        IndicatorKey::Macd,
        IndicatorKey::MacdSignal,
        IndicatorKey::MacdHist,
        IndicatorKey::BbLower,
        IndicatorKey::BbMiddle,
        IndicatorKey::BbUpper,
        IndicatorKey::Sma20,
        IndicatorKey::Sma50,
        IndicatorKey::Ema9,
        IndicatorKey::Ema21,
        IndicatorKey::StochK,
        IndicatorKey::StochD,
        IndicatorKey::Atr,
        IndicatorKey::Willr,
        IndicatorKey::Cci,
        IndicatorKey::VolChange,
        IndicatorKey::PriceChange,
    ];

    /// Column name as it appears in serialized frames.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::MacdSignal => "macd_signal",
            Self::MacdHist => "macd_hist",
            Self::BbLower => "bb_lower",
            Self::BbMiddle => "bb_middle",
            Self::BbUpper => "bb_upper",
            Self::Sma20 => "sma_20",
            Self::Sma50 => "sma_50",
            Self::Ema9 => "ema_9",
            Self::Ema21 => "ema_21",
            Self::StochK => "stoch_k",
            Self::StochD => "stoch_d",
            Self::Atr => "atr",
            Self::Willr => "willr",
            Self::Cci => "cci",
            Self::VolChange => "vol_change",
            Self::PriceChange => "price_change",
        }
    }

    /// Parse from a column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// Derived indicator values for one bar. `None` means "no value yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_9: Option<f64>,
    pub ema_21: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub atr: Option<f64>,
    pub willr: Option<f64>,
    pub cci: Option<f64>,
    pub vol_change: Option<f64>,
    pub price_change: Option<f64>,
}

impl IndicatorValues {
    pub fn get(&self, key: IndicatorKey) -> Option<f64> {
        *self.slot(key)
    }

    pub fn set(&mut self, key: IndicatorKey, value: Option<f64>) {
        *self.slot_mut(key) = value;
    }

    fn slot(&self, key: IndicatorKey) -> &Option<f64> {
        match key {
            IndicatorKey::Rsi => &self.rsi,
            IndicatorKey::Macd => &self.macd,
            IndicatorKey::MacdSignal => &self.macd_signal,
            IndicatorKey::MacdHist => &self.macd_hist,
            IndicatorKey::BbLower => &self.bb_lower,
            IndicatorKey::BbMiddle => &self.bb_middle,
            IndicatorKey::BbUpper => &self.bb_upper,
            IndicatorKey::Sma20 => &self.sma_20,
            IndicatorKey::Sma50 => &self.sma_50,
            IndicatorKey::Ema9 => &self.ema_9,
            IndicatorKey::Ema21 => &self.ema_21,
            IndicatorKey::StochK => &self.stoch_k,
            IndicatorKey::StochD => &self.stoch_d,
            IndicatorKey::Atr => &self.atr,
            IndicatorKey::Willr => &self.willr,
            IndicatorKey::Cci => &self.cci,
            IndicatorKey::VolChange => &self.vol_change,
            IndicatorKey::PriceChange => &self.price_change,
        }
    }

    fn slot_mut(&mut self, key: IndicatorKey) -> &mut Option<f64> {
        match key {
            IndicatorKey::Rsi => &mut self.rsi,
            IndicatorKey::Macd => &mut self.macd,
            IndicatorKey::MacdSignal => &mut self.macd_signal,
            IndicatorKey::MacdHist => &mut self.macd_hist,
            IndicatorKey::BbLower => &mut self.bb_lower,
            IndicatorKey::BbMiddle => &mut self.bb_middle,
            IndicatorKey::BbUpper => &mut self.bb_upper,
            IndicatorKey::Sma20 => &mut self.sma_20,
            IndicatorKey::Sma50 => &mut self.sma_50,
            IndicatorKey::Ema9 => &mut self.ema_9,
            IndicatorKey::Ema21 => &mut self.ema_21,
            IndicatorKey::StochK => &mut self.stoch_k,
            IndicatorKey::StochD => &mut self.stoch_d,
            IndicatorKey::Atr => &mut self.atr,
            IndicatorKey::Willr => &mut self.willr,
            IndicatorKey::Cci => &mut self.cci,
            IndicatorKey::VolChange => &mut self.vol_change,
            IndicatorKey::PriceChange => &mut self.price_change,
        }
    }
}

/// A bar together with its derived indicator columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: OhlcvBar,
    #[serde(flatten)]
    pub indicators: IndicatorValues,
}

/// Time-ascending series of enriched bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub rows: Vec<EnrichedBar>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&EnrichedBar> {
        self.rows.last()
    }

    /// The bar before the last one, if the frame holds at least two.
    pub fn previous(&self) -> Option<&EnrichedBar> {
        self.rows.len().checked_sub(2).map(|i| &self.rows[i])
    }

    /// All values of one column, in bar order.
    pub fn column(&self, key: IndicatorKey) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.indicators.get(key)).collect()
    }
}
