use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANDLE_INTERVAL: CandleInterval = CandleInterval::D1;
pub const DEFAULT_CANDLE_LIMIT: u16 = 30;
pub const MIN_CANDLE_LIMIT: u16 = 1;
pub const MAX_CANDLE_LIMIT: u16 = 1_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const MIN_POLL_INTERVAL_MS: u64 = 1_000;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
pub const FEATURED_ASSET_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarketCategory {
    Futures,
    Crypto,
    Forex,
    Stocks,
    #[serde(rename = "ETF")]
    Etf,
}

impl MarketCategory {
    pub const ALL: [MarketCategory; 5] = [
        Self::Futures,
        Self::Crypto,
        Self::Forex,
        Self::Stocks,
        Self::Etf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Futures => "Futures",
            Self::Crypto => "Crypto",
            Self::Forex => "Forex",
            Self::Stocks => "Stocks",
            Self::Etf => "ETF",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self, AppError> {
        match value {
            "Futures" => Ok(Self::Futures),
            "Crypto" => Ok(Self::Crypto),
            "Forex" => Ok(Self::Forex),
            "Stocks" => Ok(Self::Stocks),
            "ETF" => Ok(Self::Etf),
            other => Err(AppError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CandleInterval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
}

impl CandleInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::D1 => "1d",
            Self::W1 => "1w",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self, AppError> {
        match value.trim() {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "1h" => Ok(Self::H1),
            "4h" => Ok(Self::H4),
            "1d" => Ok(Self::D1),
            "1w" => Ok(Self::W1),
            other => Err(AppError::InvalidArgument(format!(
                "unsupported candle interval '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFlags {
    pub base: String,
    pub quote: String,
}

/// Adapter output before normalization. Optional fields are filled in by
/// [`crate::market::normalizer::normalize_quote`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub id: String,
    pub ticker: String,
    pub name: Option<String>,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub chart_data: Vec<f64>,
    pub icon: Option<String>,
    pub flags: Option<CurrencyFlags>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketAsset {
    pub id: String,
    pub category: MarketCategory,
    pub ticker: String,
    /// Path-safe ticker for the detail screen.
    pub route: String,
    pub name: String,
    pub price: f64,
    pub price_formatted: String,
    pub change: f64,
    pub change_percent: f64,
    pub chart_data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<CurrencyFlags>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandleData {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandleData {
    pub fn apply_trade(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreamConnectionState {
    Disconnected,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeTick {
    pub price: f64,
    pub trade_time_ms: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceDisplay {
    pub price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl PriceDisplay {
    pub fn from_candle(candle: &CandleData) -> Self {
        let change = candle.close - candle.open;
        Self {
            price: candle.close,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            change,
            change_percent: percent_of(change, candle.open),
        }
    }

    pub fn apply_trade(&mut self, price: f64) {
        self.price = price;
        self.close = price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.change = price - self.open;
        self.change_percent = percent_of(self.change, self.open);
    }
}

fn percent_of(delta: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        delta / reference * 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailViewState {
    pub symbol: String,
    pub interval: CandleInterval,
    pub loading: bool,
    pub connection: StreamConnectionState,
    pub display: Option<PriceDisplay>,
    pub candles: Vec<CandleData>,
    pub last_poll_at_ms: Option<i64>,
    pub reason: Option<String>,
}

impl DetailViewState {
    pub fn idle(symbol: String, interval: CandleInterval, reason: Option<String>) -> Self {
        Self {
            symbol,
            interval,
            loading: false,
            connection: StreamConnectionState::Disconnected,
            display: None,
            candles: Vec::new(),
            last_poll_at_ms: None,
            reason,
        }
    }
}

/// Strips the `/` display separator (and the `-` route encoding) and uppercases,
/// e.g. `btc/usdt` becomes `BTCUSDT`.
pub fn exchange_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .chars()
        .filter(|ch| *ch != '/' && *ch != '-')
        .collect::<String>()
        .to_ascii_uppercase()
}

/// `BTC/USDT` becomes `BTC-USDT`, which is safe to embed in a path segment.
pub fn route_ticker(ticker: &str) -> String {
    ticker.trim().to_ascii_uppercase().replacen('/', "-", 1)
}

fn validate_symbol(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let valid_chars = trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '/' || ch == '-');
    let symbol = exchange_symbol(trimmed);
    if symbol.is_empty() || !valid_chars {
        return Err(AppError::InvalidArgument(
            "symbol must be non-empty alphanumeric ASCII with optional '/' or '-' separators"
                .to_string(),
        ));
    }
    Ok(symbol)
}

fn validate_limit(limit: Option<u16>) -> Result<u16, AppError> {
    let limit = limit.unwrap_or(DEFAULT_CANDLE_LIMIT);
    if !(MIN_CANDLE_LIMIT..=MAX_CANDLE_LIMIT).contains(&limit) {
        return Err(AppError::InvalidArgument(format!(
            "limit must be between {MIN_CANDLE_LIMIT} and {MAX_CANDLE_LIMIT}"
        )));
    }
    Ok(limit)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandleQueryArgs {
    pub symbol: String,
    pub interval: Option<CandleInterval>,
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandleQuery {
    pub symbol: String,
    pub interval: CandleInterval,
    pub limit: u16,
}

impl CandleQueryArgs {
    pub fn normalize(self) -> Result<CandleQuery, AppError> {
        Ok(CandleQuery {
            symbol: validate_symbol(&self.symbol)?,
            interval: self.interval.unwrap_or(DEFAULT_CANDLE_INTERVAL),
            limit: validate_limit(self.limit)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetailSessionArgs {
    pub symbol: String,
    pub interval: Option<CandleInterval>,
    pub limit: Option<u16>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSessionConfig {
    pub symbol: String,
    pub interval: CandleInterval,
    pub limit: u16,
    pub poll_interval_ms: u64,
}

impl DetailSessionArgs {
    pub fn normalize(self) -> Result<DetailSessionConfig, AppError> {
        let symbol = validate_symbol(&self.symbol)?;
        let limit = validate_limit(self.limit)?;
        let poll_interval_ms = self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&poll_interval_ms) {
            return Err(AppError::InvalidArgument(format!(
                "pollIntervalMs must be between {MIN_POLL_INTERVAL_MS} and {MAX_POLL_INTERVAL_MS}"
            )));
        }

        Ok(DetailSessionConfig {
            symbol,
            interval: self.interval.unwrap_or(DEFAULT_CANDLE_INTERVAL),
            limit,
            poll_interval_ms,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSession {
    pub running: bool,
    pub symbol: String,
    pub interval: CandleInterval,
    pub limit: u16,
    pub poll_interval_ms: u64,
}

impl DetailSession {
    pub fn from_config(config: &DetailSessionConfig) -> Self {
        Self {
            running: true,
            symbol: config.symbol.clone(),
            interval: config.interval,
            limit: config.limit,
            poll_interval_ms: config.poll_interval_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSessionStopResult {
    pub stopped: bool,
}

/// A positional number as it appears in exchange payloads: some fields are
/// quoted decimals, others bare integers or floats.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl WireNumber {
    pub fn to_f64(&self) -> Result<f64, AppError> {
        let value = match self {
            Self::Integer(value) => *value as f64,
            Self::Float(value) => *value,
            Self::Text(value) => value.trim().parse::<f64>()?,
        };
        if !value.is_finite() {
            return Err(AppError::InvalidArgument(
                "numeric field must be finite".to_string(),
            ));
        }
        Ok(value)
    }

    pub fn to_millis(&self) -> Result<i64, AppError> {
        match self {
            Self::Integer(value) => Ok(*value),
            Self::Float(value) if value.is_finite() => Ok(value.floor() as i64),
            Self::Float(_) => Err(AppError::InvalidArgument(
                "timestamp must be finite".to_string(),
            )),
            Self::Text(value) => value.trim().parse::<i64>().map_err(|_| {
                AppError::InvalidArgument(format!("timestamp '{value}' is not an integer"))
            }),
        }
    }
}

/// One kline row: `[open_time_ms, open, high, low, close, volume, ...]`.
pub type KlineWire = Vec<WireNumber>;

pub fn candle_from_kline(row: &[WireNumber]) -> Result<CandleData, AppError> {
    if row.len() < 5 {
        return Err(AppError::InvalidArgument(format!(
            "kline row has {} fields, expected at least 5",
            row.len()
        )));
    }

    Ok(CandleData {
        time: row[0].to_millis()?.div_euclid(1_000),
        open: row[1].to_f64()?,
        high: row[2].to_f64()?,
        low: row[3].to_f64()?,
        close: row[4].to_f64()?,
    })
}

#[derive(Debug, Deserialize)]
pub struct Ticker24hWire {
    pub symbol: String,
    #[serde(rename = "lastPrice")]
    pub last_price: String,
    #[serde(rename = "priceChangePercent")]
    pub price_change_percent: String,
    #[serde(rename = "priceChange")]
    pub price_change: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CryptoTicker {
    pub symbol: String,
    pub price: f64,
    pub change_percent: f64,
    pub change: f64,
}

impl TryFrom<Ticker24hWire> for CryptoTicker {
    type Error = AppError;

    fn try_from(value: Ticker24hWire) -> Result<Self, Self::Error> {
        let price = value.last_price.parse::<f64>()?;
        let change_percent = value.price_change_percent.parse::<f64>()?;
        let change = value.price_change.parse::<f64>()?;
        if !price.is_finite() || !change_percent.is_finite() || !change.is_finite() || price < 0.0
        {
            return Err(AppError::InvalidArgument(format!(
                "ticker values for {} must be finite and price non-negative",
                value.symbol
            )));
        }

        Ok(Self {
            symbol: value.symbol,
            price,
            change_percent,
            change,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TradeWire {
    #[serde(rename = "p")]
    pub price: WireNumber,
    #[serde(rename = "T", default)]
    pub trade_time: Option<i64>,
}

impl TryFrom<TradeWire> for TradeTick {
    type Error = AppError;

    fn try_from(value: TradeWire) -> Result<Self, Self::Error> {
        let price = value.price.to_f64()?;
        if price < 0.0 {
            return Err(AppError::InvalidArgument(
                "trade price must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            price,
            trade_time_ms: value.trade_time,
        })
    }
}

pub fn parse_trade_payload(payload: &mut [u8]) -> Result<TradeTick, AppError> {
    let wire: TradeWire = simd_json::serde::from_slice(payload)?;
    wire.try_into()
}
