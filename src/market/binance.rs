use crate::error::AppError;
use crate::market::types::{
    candle_from_kline, exchange_symbol, CandleData, CandleInterval, CryptoTicker, KlineWire,
    Ticker24hWire,
};
use reqwest::Client;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::{connect_async_with_config, MaybeTlsStream, WebSocketStream};

pub const BINANCE_REST_BASE_URL: &str = "https://api.binance.com";
pub const BINANCE_STREAM_BASE_URL: &str = "wss://stream.binance.com:9443/ws";

pub type BinanceWsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoints {
    pub rest_base_url: String,
    pub stream_base_url: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            rest_base_url: BINANCE_REST_BASE_URL.to_string(),
            stream_base_url: BINANCE_STREAM_BASE_URL.to_string(),
        }
    }
}

impl SourceEndpoints {
    fn rest(&self) -> &str {
        self.rest_base_url.trim_end_matches('/')
    }

    fn stream(&self) -> &str {
        self.stream_base_url.trim_end_matches('/')
    }
}

fn trade_stream_endpoint(endpoints: &SourceEndpoints, symbol: &str) -> String {
    format!(
        "{}/{}@trade",
        endpoints.stream(),
        exchange_symbol(symbol).to_ascii_lowercase()
    )
}

fn ticker_24h_endpoint(endpoints: &SourceEndpoints, symbols: &[&str]) -> String {
    let quoted: Vec<String> = symbols
        .iter()
        .map(|symbol| format!("%22{}%22", symbol.to_ascii_uppercase()))
        .collect();
    format!(
        "{}/api/v3/ticker/24hr?symbols=%5B{}%5D",
        endpoints.rest(),
        quoted.join(",")
    )
}

fn klines_endpoint(
    endpoints: &SourceEndpoints,
    symbol: &str,
    interval: CandleInterval,
    limit: u16,
) -> String {
    format!(
        "{}/api/v3/klines?symbol={}&interval={}&limit={limit}",
        endpoints.rest(),
        exchange_symbol(symbol),
        interval.as_str()
    )
}

pub async fn connect_trade_stream(
    endpoints: &SourceEndpoints,
    symbol: &str,
) -> Result<BinanceWsStream, AppError> {
    let ws_config = WebSocketConfig {
        max_message_size: Some(1 << 20),
        max_frame_size: Some(1 << 20),
        ..Default::default()
    };

    let request = trade_stream_endpoint(endpoints, symbol);
    let (stream, _) = connect_async_with_config(request, Some(ws_config), true).await?;
    Ok(stream)
}

/// One 24h ticker snapshot covering every requested symbol.
pub async fn fetch_ticker_24h(
    client: &Client,
    endpoints: &SourceEndpoints,
    symbols: &[&str],
) -> Result<Vec<CryptoTicker>, AppError> {
    let endpoint = ticker_24h_endpoint(endpoints, symbols);
    let response = client.get(endpoint).send().await?.error_for_status()?;
    let payload = response.json::<Vec<Ticker24hWire>>().await?;

    let mut tickers = Vec::with_capacity(payload.len());
    for ticker in payload {
        tickers.push(ticker.try_into()?);
    }
    Ok(tickers)
}

pub async fn fetch_klines(
    client: &Client,
    endpoints: &SourceEndpoints,
    symbol: &str,
    interval: CandleInterval,
    limit: u16,
) -> Result<Vec<CandleData>, AppError> {
    let endpoint = klines_endpoint(endpoints, symbol, interval, limit);
    let response = client.get(endpoint).send().await?.error_for_status()?;
    let payload = response.json::<Vec<KlineWire>>().await?;

    let mut candles = Vec::with_capacity(payload.len());
    for row in &payload {
        candles.push(candle_from_kline(row)?);
    }
    Ok(candles)
}
