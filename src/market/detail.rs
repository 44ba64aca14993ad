use crate::market::aggregator::MarketDataService;
use crate::market::now_unix_ms;
use crate::market::stream::TradeSubscription;
use crate::market::types::{
    CandleData, DetailSessionConfig, DetailViewState, PriceDisplay, StreamConnectionState,
    TradeTick,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickApplyOutcome {
    Applied,
    NoCandle,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Replaced,
    KeptPrevious,
}

pub fn apply_initial_candles(state: &mut DetailViewState, candles: Vec<CandleData>) {
    state.display = candles.last().map(PriceDisplay::from_candle);
    state.candles = candles;
    state.loading = false;
}

/// Folds one live trade into the newest candle and the displayed price.
/// Older candles are never touched.
pub fn apply_trade_tick(state: &mut DetailViewState, tick: &TradeTick) -> TickApplyOutcome {
    if !tick.price.is_finite() || tick.price < 0.0 {
        return TickApplyOutcome::Rejected;
    }

    let Some(latest) = state.candles.last_mut() else {
        return TickApplyOutcome::NoCandle;
    };
    latest.apply_trade(tick.price);

    let display = state
        .display
        .get_or_insert_with(|| PriceDisplay::from_candle(latest));
    display.apply_trade(tick.price);
    TickApplyOutcome::Applied
}

/// A non-empty poll result replaces the series wholesale, dropping any
/// intra-candle extremes that only live ticks had produced. An empty result
/// keeps what is already shown.
pub fn apply_poll_snapshot(
    state: &mut DetailViewState,
    candles: Vec<CandleData>,
    polled_at_ms: i64,
) -> PollOutcome {
    state.last_poll_at_ms = Some(polled_at_ms);
    if candles.is_empty() {
        return PollOutcome::KeptPrevious;
    }

    state.display = candles.last().map(PriceDisplay::from_candle);
    state.candles = candles;
    PollOutcome::Replaced
}

async fn next_subscription_tick(subscription: &mut Option<TradeSubscription>) -> Option<TradeTick> {
    match subscription.as_mut() {
        Some(subscription) => subscription.next_tick().await,
        None => std::future::pending().await,
    }
}

fn set_connection(
    view_store: &RwLock<DetailViewState>,
    connection: StreamConnectionState,
    reason: Option<String>,
) {
    let mut view = view_store.write();
    view.connection = connection;
    view.reason = reason;
}

/// Drives one detail view until cancelled: initial candle load, a live trade
/// feed, and a fixed-period candle poll in parallel.
pub async fn run_detail_session(
    service: MarketDataService,
    config: DetailSessionConfig,
    view_store: Arc<RwLock<DetailViewState>>,
    cancel_token: CancellationToken,
) {
    let symbol = config.symbol.clone();
    {
        let mut view = view_store.write();
        *view = DetailViewState::idle(symbol.clone(), config.interval, None);
        view.loading = true;
    }

    let initial = tokio::select! {
        biased;
        _ = cancel_token.cancelled() => {
            set_connection(
                &view_store,
                StreamConnectionState::Disconnected,
                Some("stopped".to_string()),
            );
            view_store.write().loading = false;
            return;
        }
        candles = service.fetch_candle_data(&symbol, config.interval, config.limit) => candles,
    };
    info!(symbol = %symbol, count = initial.len(), "detail candles loaded");
    apply_initial_candles(&mut view_store.write(), initial);

    let subscribed = tokio::select! {
        biased;
        _ = cancel_token.cancelled() => {
            set_connection(
                &view_store,
                StreamConnectionState::Disconnected,
                Some("stopped".to_string()),
            );
            return;
        }
        subscribed = service.subscribe_trades(&symbol) => subscribed,
    };
    let mut subscription = match subscribed {
        Ok(subscription) => {
            set_connection(&view_store, subscription.connection_state(), None);
            Some(subscription)
        }
        Err(error) => {
            warn!(symbol = %symbol, %error, "trade feed unavailable, continuing with polling only");
            set_connection(
                &view_store,
                StreamConnectionState::Disconnected,
                Some(error.to_string()),
            );
            None
        }
    };

    let period = Duration::from_millis(config.poll_interval_ms);
    let mut poll = tokio::time::interval_at(Instant::now() + period, period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            tick = next_subscription_tick(&mut subscription) => match tick {
                Some(tick) => {
                    let outcome = apply_trade_tick(&mut view_store.write(), &tick);
                    if outcome != TickApplyOutcome::Applied {
                        debug!(
                            symbol = %symbol,
                            ?outcome,
                            price = tick.price,
                            "trade tick not applied"
                        );
                    }
                }
                None => {
                    info!(symbol = %symbol, "trade feed ended, continuing with polling only");
                    let connection = subscription
                        .take()
                        .map(|ended| ended.connection_state())
                        .unwrap_or(StreamConnectionState::Disconnected);
                    set_connection(&view_store, connection, Some("trade feed ended".to_string()));
                }
            },
            _ = poll.tick() => {
                let polled = service.fetch_candle_data(&symbol, config.interval, config.limit);
                let candles = tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => break,
                    candles = polled => candles,
                };
                let outcome = apply_poll_snapshot(&mut view_store.write(), candles, now_unix_ms());
                debug!(symbol = %symbol, ?outcome, "detail candles polled");
            }
        }
    }

    if let Some(subscription) = subscription.take() {
        subscription.unsubscribe().await;
    }
    set_connection(
        &view_store,
        StreamConnectionState::Disconnected,
        Some("stopped".to_string()),
    );
    info!(symbol = %symbol, "detail session stopped");
}
