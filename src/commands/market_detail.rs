use crate::error::AppError;
use crate::market::detail::run_detail_session;
use crate::market::types::{
    DetailSession, DetailSessionArgs, DetailSessionStopResult, DetailViewState,
    StreamConnectionState,
};
use crate::state::{AppState, DetailSessionHandle};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Starts the detail view for one symbol. A session already running is
/// stopped first, so at most one trade feed is open.
pub async fn start_detail_session(
    state: &AppState,
    args: DetailSessionArgs,
) -> Result<DetailSession, AppError> {
    let config = args.normalize()?;

    let existing_handle = {
        let mut session_slot = state.detail_session.lock().await;
        session_slot.take()
    };
    if let Some(handle) = existing_handle {
        handle.cancellation_token.cancel();
        let _ = handle.join_handle.await;
    }

    let cancellation_token = CancellationToken::new();
    let task_token = cancellation_token.clone();
    let view_store = Arc::clone(&state.detail_view);
    let service = state.market_data.clone();
    let runtime_config = config.clone();

    let join_handle = tokio::spawn(async move {
        run_detail_session(service, runtime_config, view_store, task_token).await;
    });

    {
        let mut session_slot = state.detail_session.lock().await;
        *session_slot = Some(DetailSessionHandle {
            cancellation_token,
            join_handle,
            symbol: config.symbol.clone(),
            interval: config.interval,
        });
    }

    Ok(DetailSession::from_config(&config))
}

pub async fn stop_detail_session(state: &AppState) -> Result<DetailSessionStopResult, AppError> {
    let existing_handle = {
        let mut session_slot = state.detail_session.lock().await;
        session_slot.take()
    };

    let stopped = if let Some(handle) = existing_handle {
        handle.cancellation_token.cancel();
        let _ = handle.join_handle.await;
        true
    } else {
        false
    };

    {
        let mut view = state.detail_view.write();
        view.connection = StreamConnectionState::Disconnected;
        view.loading = false;
        view.reason = Some("detail stopped by command".to_string());
    }

    Ok(DetailSessionStopResult { stopped })
}

pub fn detail_snapshot(state: &AppState) -> DetailViewState {
    state.detail_view.read().clone()
}
