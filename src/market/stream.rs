use crate::error::AppError;
use crate::market::binance::{connect_trade_stream, BinanceWsStream, SourceEndpoints};
use crate::market::types::{parse_trade_payload, StreamConnectionState, TradeTick};
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const TICK_CHANNEL_CAPACITY: usize = 1_024;

/// A live trade feed for one symbol with exactly one consumer.
///
/// The feed is not retried once the connection drops. `unsubscribe` (or
/// dropping the subscription) closes the socket.
pub struct TradeSubscription {
    symbol: String,
    ticks: mpsc::Receiver<TradeTick>,
    connection: watch::Receiver<StreamConnectionState>,
    cancellation_token: CancellationToken,
    join_handle: Option<JoinHandle<()>>,
}

impl TradeSubscription {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn connection_state(&self) -> StreamConnectionState {
        *self.connection.borrow()
    }

    /// Next tick, or `None` once the feed has ended.
    pub async fn next_tick(&mut self) -> Option<TradeTick> {
        self.ticks.recv().await
    }

    /// Stops the reader and waits for it to exit. Buffered ticks are
    /// discarded.
    pub async fn unsubscribe(mut self) {
        self.cancellation_token.cancel();
        self.ticks.close();
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TradeSubscription {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

pub async fn subscribe_trades(
    endpoints: &SourceEndpoints,
    symbol: &str,
) -> Result<TradeSubscription, AppError> {
    let websocket_stream = connect_trade_stream(endpoints, symbol).await?;
    info!(symbol, "trade stream connected");

    let (tick_sender, ticks) = mpsc::channel(TICK_CHANNEL_CAPACITY);
    let (state_sender, connection) = watch::channel(StreamConnectionState::Connected);
    let cancellation_token = CancellationToken::new();
    let task_token = cancellation_token.clone();
    let task_symbol = symbol.to_string();

    let join_handle = tokio::spawn(async move {
        read_trade_stream(websocket_stream, &task_symbol, &tick_sender, task_token).await;
        let _ = state_sender.send(StreamConnectionState::Disconnected);
        drop(tick_sender);
    });

    Ok(TradeSubscription {
        symbol: symbol.to_string(),
        ticks,
        connection,
        cancellation_token,
        join_handle: Some(join_handle),
    })
}

async fn read_trade_stream(
    mut websocket_stream: BinanceWsStream,
    symbol: &str,
    tick_sender: &mpsc::Sender<TradeTick>,
    cancel_token: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            _ = cancel_token.cancelled() => {
                close_unsubscribed(&mut websocket_stream, symbol).await;
                return;
            }
            next_message = websocket_stream.next() => next_message,
        };

        let message = match frame {
            Some(Ok(message)) => message,
            Some(Err(error)) => {
                warn!(symbol, %error, "trade stream frame error");
                return;
            }
            None => {
                info!(symbol, "trade stream ended by remote");
                return;
            }
        };

        let tick = match message {
            Message::Text(text_payload) => {
                let mut owned_payload = text_payload.into_bytes();
                parse_trade_payload(owned_payload.as_mut_slice())
            }
            Message::Binary(mut binary_payload) => {
                parse_trade_payload(binary_payload.as_mut_slice())
            }
            Message::Close(frame) => {
                info!(symbol, ?frame, "trade stream closed by remote");
                return;
            }
            _ => continue,
        };

        match tick {
            Ok(tick) => {
                let sent = tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => {
                        close_unsubscribed(&mut websocket_stream, symbol).await;
                        return;
                    }
                    sent = tick_sender.send(tick) => sent,
                };
                if sent.is_err() {
                    debug!(symbol, "trade consumer dropped");
                    return;
                }
            }
            Err(error) => warn!(symbol, %error, "failed to decode trade payload"),
        }
    }
}

async fn close_unsubscribed(websocket_stream: &mut BinanceWsStream, symbol: &str) {
    if let Err(error) = websocket_stream.close(None).await {
        debug!(symbol, %error, "trade stream close handshake failed");
    }
    info!(symbol, "trade stream unsubscribed");
}
