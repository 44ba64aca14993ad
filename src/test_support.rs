//! In-process stand-in for the exchange REST and trade-stream endpoints.

use crate::db::run_migrations;
use crate::market::aggregator::MarketDataService;
use crate::market::binance::SourceEndpoints;
use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const TICKER_24H_FIXTURE: &str = r#"[
  {"symbol":"BTCUSDT","priceChange":"1054.90000000","priceChangePercent":"2.500","lastPrice":"43250.10000000","volume":"1.0"},
  {"symbol":"ETHUSDT","priceChange":"-30.00000000","priceChangePercent":"-1.250","lastPrice":"2370.00000000","volume":"1.0"},
  {"symbol":"DOGEUSDT","priceChange":"0.00120000","priceChangePercent":"1.500","lastPrice":"0.08120000","volume":"1.0"}
]"#;

pub const KLINES_FIXTURE: &str = r#"[
  [1700000000000,"99.00000000","101.00000000","97.50000000","100.00000000","12.5",1700086399999,"0",10,"0","0","0"],
  [1700086400000,"100.00000000","105.00000000","98.00000000","102.00000000","8.1",1700172799999,"0",12,"0","0","0"]
]"#;

#[derive(Debug, Clone)]
pub struct FakeExchange {
    pub ticker_status: u16,
    pub ticker_body: String,
    pub klines_body: String,
    pub trades: Vec<String>,
    /// Close the socket once every scripted trade has been sent.
    pub close_after_trades: bool,
}

impl Default for FakeExchange {
    fn default() -> Self {
        Self {
            ticker_status: 200,
            ticker_body: TICKER_24H_FIXTURE.to_string(),
            klines_body: KLINES_FIXTURE.to_string(),
            trades: Vec::new(),
            close_after_trades: false,
        }
    }
}

#[derive(Clone)]
struct ExchangeState {
    script: Arc<FakeExchange>,
    requested_streams: Arc<Mutex<Vec<String>>>,
}

pub struct RunningExchange {
    addr: SocketAddr,
    requested_streams: Arc<Mutex<Vec<String>>>,
    server: JoinHandle<()>,
}

impl RunningExchange {
    pub fn endpoints(&self) -> SourceEndpoints {
        SourceEndpoints {
            rest_base_url: format!("http://{}", self.addr),
            stream_base_url: format!("ws://{}/ws", self.addr),
        }
    }

    pub fn requested_streams(&self) -> Vec<String> {
        self.requested_streams.lock().clone()
    }
}

impl Drop for RunningExchange {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub async fn spawn_fake_exchange(script: FakeExchange) -> RunningExchange {
    let requested_streams = Arc::new(Mutex::new(Vec::new()));
    let state = ExchangeState {
        script: Arc::new(script),
        requested_streams: Arc::clone(&requested_streams),
    };

    let app = Router::new()
        .route("/api/v3/ticker/24hr", get(ticker_24h))
        .route("/api/v3/klines", get(klines))
        .route("/ws/{stream}", get(trade_stream))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake exchange");
    let addr = listener.local_addr().expect("fake exchange address");
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    RunningExchange {
        addr,
        requested_streams,
        server,
    }
}

/// Nothing listens on the discard port, so every request fails fast.
pub fn unreachable_endpoints() -> SourceEndpoints {
    SourceEndpoints {
        rest_base_url: "http://127.0.0.1:9".to_string(),
        stream_base_url: "ws://127.0.0.1:9/ws".to_string(),
    }
}

/// App state over a single-connection in-memory database.
pub async fn test_state(endpoints: SourceEndpoints) -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should initialize");
    run_migrations(&pool)
        .await
        .expect("migrations should apply");

    AppState::new(pool, MarketDataService::new(reqwest::Client::new(), endpoints))
}

fn json_response(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn ticker_24h(State(state): State<ExchangeState>) -> Response {
    json_response(state.script.ticker_status, state.script.ticker_body.clone())
}

async fn klines(State(state): State<ExchangeState>) -> Response {
    json_response(200, state.script.klines_body.clone())
}

async fn trade_stream(
    Path(stream): Path<String>,
    State(state): State<ExchangeState>,
    upgrade: WebSocketUpgrade,
) -> Response {
    state.requested_streams.lock().push(stream);
    upgrade.on_upgrade(move |socket| serve_trades(socket, state.script))
}

async fn serve_trades(mut socket: WebSocket, script: Arc<FakeExchange>) {
    for trade in &script.trades {
        if socket.send(Message::Text(trade.clone().into())).await.is_err() {
            return;
        }
    }

    if script.close_after_trades {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        if matches!(message, Message::Close(_)) {
            break;
        }
    }
}
