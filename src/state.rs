use crate::market::aggregator::MarketDataService;
use crate::market::board::MarketBoard;
use crate::market::types::{CandleInterval, DetailViewState, DEFAULT_CANDLE_INTERVAL};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct DetailSessionHandle {
    pub cancellation_token: CancellationToken,
    pub join_handle: JoinHandle<()>,
    pub symbol: String,
    pub interval: CandleInterval,
}

pub struct AppState {
    pub started_at: Instant,
    pub db_pool: SqlitePool,
    pub market_data: MarketDataService,
    pub board: Arc<parking_lot::RwLock<MarketBoard>>,
    pub detail_session: Mutex<Option<DetailSessionHandle>>,
    pub detail_view: Arc<parking_lot::RwLock<DetailViewState>>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, market_data: MarketDataService) -> Self {
        let detail_view = DetailViewState::idle(
            String::new(),
            DEFAULT_CANDLE_INTERVAL,
            Some("detail idle".to_string()),
        );

        Self {
            started_at: Instant::now(),
            db_pool,
            market_data,
            board: Arc::new(parking_lot::RwLock::new(MarketBoard::new())),
            detail_session: Mutex::new(None),
            detail_view: Arc::new(parking_lot::RwLock::new(detail_view)),
        }
    }
}
