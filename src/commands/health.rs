use crate::market::types::{CandleInterval, StreamConnectionState};
use crate::state::AppState;
use serde::Serialize;
use sqlx::SqlitePool;
use std::time::Instant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_ms: u128,
    pub db: &'static str,
    pub loaded_categories: usize,
    pub detail_symbol: Option<String>,
    pub detail_interval: Option<CandleInterval>,
    pub detail_connection: StreamConnectionState,
}

pub async fn build_health_response(started_at: Instant, pool: &SqlitePool) -> HealthResponse {
    let db_status = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await
    {
        Ok(_) => "ok",
        Err(_) => "error",
    };

    HealthResponse {
        status: "ok",
        uptime_ms: started_at.elapsed().as_millis(),
        db: db_status,
        loaded_categories: 0,
        detail_symbol: None,
        detail_interval: None,
        detail_connection: StreamConnectionState::Disconnected,
    }
}

pub async fn health(state: &AppState) -> HealthResponse {
    let mut response = build_health_response(state.started_at, &state.db_pool).await;
    response.loaded_categories = state.board.read().loaded_categories().len();
    if let Some(handle) = state.detail_session.lock().await.as_ref() {
        response.detail_symbol = Some(handle.symbol.clone());
        response.detail_interval = Some(handle.interval);
    }
    response.detail_connection = state.detail_view.read().connection;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::market_data::refresh_category;
    use crate::test_support::{test_state, unreachable_endpoints};

    #[tokio::test]
    async fn health_reports_ok_status_and_db_health() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite should initialize");

        let response = build_health_response(Instant::now(), &pool).await;

        assert_eq!(response.status, "ok");
        assert_eq!(response.db, "ok");
        assert!(response.uptime_ms <= 1_000);
    }

    #[tokio::test]
    async fn health_counts_loaded_categories() {
        let state = test_state(unreachable_endpoints()).await;
        refresh_category(&state, "Forex")
            .await
            .expect("forex refresh succeeds");
        refresh_category(&state, "Crypto")
            .await
            .expect("a failed source still yields a snapshot");

        let response = health(&state).await;
        assert_eq!(response.loaded_categories, 1);
        assert_eq!(response.detail_symbol, None);
        assert_eq!(response.detail_interval, None);
        assert_eq!(response.detail_connection, StreamConnectionState::Disconnected);
    }
}
