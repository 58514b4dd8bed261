//! Per-symbol feed connection with reconnect handling.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{Instant, interval_at, sleep, sleep_until, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use pampero_types::{PamperoError, Tick};

use crate::message::{self, Inbound};
use crate::{Backoff, FeedConfig, FeedCounters};

/// Request id used for the trade channel subscription.
const SUBSCRIBE_ID: u64 = 1;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Errors that can occur on a feed session.
#[derive(Error, Debug)]
pub enum FeedError {
    /// TCP/TLS/WebSocket handshake failed.
    #[error("Connect failed: {0}")]
    Connect(String),

    /// Connect or subscribe did not finish within the handshake timeout.
    #[error("Handshake timed out")]
    HandshakeTimeout,

    /// The stream refused the trade channel subscription.
    #[error("Subscription rejected: {0}")]
    SubscriptionRejected(String),

    /// The established connection failed mid-session.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<FeedError> for PamperoError {
    fn from(error: FeedError) -> Self {
        Self::Feed(error.to_string())
    }
}

/// Delivery seam between the feed and whatever persists ticks.
///
/// Called once per accepted tick, in receipt order. Implementations own
/// their failure policy; the feed treats delivery as infallible and keeps
/// reading.
#[async_trait]
pub trait TickHandler: Send + Sync {
    /// Receives one accepted tick.
    async fn on_tick(&self, tick: Tick);
}

/// Why a session ended.
#[derive(Debug)]
enum SessionEnd {
    /// Shutdown was requested; the subscription was closed cleanly.
    Shutdown,
    /// The feed closed the connection.
    Closed,
    /// No inbound frame within the idle window.
    Stale,
    /// Handshake, subscription, or transport failure.
    Failed(FeedError),
}

/// One symbol's feed connection task.
///
/// Owns its backoff and counters; nothing is shared across symbols, so a
/// stall on one connection cannot interfere with another.
#[derive(Debug)]
pub struct SymbolFeed {
    config: FeedConfig,
    symbol: String,
    counters: Arc<FeedCounters>,
}

impl SymbolFeed {
    /// Creates a feed task for one symbol.
    #[must_use]
    pub fn new(config: FeedConfig, symbol: impl Into<String>) -> Self {
        Self {
            config,
            symbol: symbol.into(),
            counters: Arc::new(FeedCounters::default()),
        }
    }

    /// Symbol this feed tracks.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Shared handle to this feed's counters.
    #[must_use]
    pub fn counters(&self) -> Arc<FeedCounters> {
        Arc::clone(&self.counters)
    }

    /// Runs the connect/stream/backoff loop until shutdown flips.
    ///
    /// Connection loss is never fatal: every failed or ended session goes
    /// through the backoff delay and reconnects. Reaching the connected
    /// state (handshake plus subscription ack) resets the backoff.
    pub async fn run(&self, handler: Arc<dyn TickHandler>, mut shutdown: watch::Receiver<bool>) {
        let mut backoff = Backoff::new(self.config.backoff_base, self.config.backoff_ceiling);
        info!(symbol = %self.symbol, endpoint = %self.config.endpoint, "starting feed");

        loop {
            if *shutdown.borrow() {
                break;
            }
            match self
                .run_session(handler.as_ref(), &mut shutdown, &mut backoff)
                .await
            {
                SessionEnd::Shutdown => break,
                SessionEnd::Closed => info!(symbol = %self.symbol, "feed closed the connection"),
                SessionEnd::Stale => warn!(
                    symbol = %self.symbol,
                    idle_secs = self.config.idle_timeout.as_secs(),
                    "no traffic within the idle window"
                ),
                SessionEnd::Failed(error) => {
                    warn!(symbol = %self.symbol, error = %error, "feed session failed");
                }
            }
            self.counters.record_disconnect();

            let delay = backoff.next_delay();
            debug!(
                symbol = %self.symbol,
                delay_ms = delay.as_millis() as u64,
                failures = backoff.failures(),
                "backing off before reconnect"
            );
            tokio::select! {
                () = sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(symbol = %self.symbol, "feed stopped");
    }

    /// Connects, subscribes, and streams until the session ends.
    async fn run_session(
        &self,
        handler: &dyn TickHandler,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut Backoff,
    ) -> SessionEnd {
        let url = self.config.socket_url();
        debug!(symbol = %self.symbol, url = %url, "connecting");

        let connected = timeout(self.config.handshake_timeout, async {
            let (mut ws, _response) = connect_async(url.as_str())
                .await
                .map_err(|e| FeedError::Connect(e.to_string()))?;
            self.subscribe(&mut ws).await?;
            Ok::<WsStream, FeedError>(ws)
        })
        .await;

        let ws = match connected {
            Ok(Ok(ws)) => ws,
            Ok(Err(error)) => return SessionEnd::Failed(error),
            Err(_) => return SessionEnd::Failed(FeedError::HandshakeTimeout),
        };

        backoff.reset();
        self.counters.record_connect();
        info!(symbol = %self.symbol, "connected and subscribed");

        let (mut write, mut read) = ws.split();
        let mut ping = interval_at(
            Instant::now() + self.config.ping_interval,
            self.config.ping_interval,
        );
        let mut idle_deadline = Instant::now() + self.config.idle_timeout;

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        let _ = write.send(Message::Close(None)).await;
                        return SessionEnd::Shutdown;
                    }
                }
                frame = read.next() => {
                    let frame = match frame {
                        None => return SessionEnd::Closed,
                        Some(Err(error)) => {
                            return SessionEnd::Failed(FeedError::Transport(error.to_string()));
                        }
                        Some(Ok(frame)) => frame,
                    };
                    idle_deadline = Instant::now() + self.config.idle_timeout;
                    if let Some(end) = self.handle_frame(frame, handler, &mut write).await {
                        return end;
                    }
                }
                _ = ping.tick() => {
                    if write.send(Message::Ping(Bytes::new())).await.is_err() {
                        return SessionEnd::Failed(FeedError::Transport("ping failed".to_string()));
                    }
                }
                () = sleep_until(idle_deadline) => {
                    self.counters.record_stale();
                    return SessionEnd::Stale;
                }
            }
        }
    }

    /// Sends the SUBSCRIBE request and waits for its ack.
    async fn subscribe(&self, ws: &mut WsStream) -> Result<(), FeedError> {
        let request = message::subscribe_request(&self.symbol, SUBSCRIBE_ID);
        ws.send(Message::Text(request.into()))
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        loop {
            let frame = ws
                .next()
                .await
                .ok_or_else(|| FeedError::Transport("closed during subscribe".to_string()))?
                .map_err(|e| FeedError::Transport(e.to_string()))?;
            match frame {
                Message::Text(text) => match message::parse_inbound(text.as_str()) {
                    Ok(Inbound::Ack { id }) if id == SUBSCRIBE_ID => return Ok(()),
                    Ok(Inbound::Rejection { message, .. }) => {
                        return Err(FeedError::SubscriptionRejected(message));
                    }
                    // Nothing else is expected before the ack; drop and keep waiting.
                    Ok(_) | Err(_) => {}
                },
                Message::Ping(payload) => {
                    let _ = ws.send(Message::Pong(payload)).await;
                }
                Message::Close(_) => {
                    return Err(FeedError::Transport("closed during subscribe".to_string()));
                }
                _ => {}
            }
        }
    }

    /// Processes one inbound frame; `Some` ends the session.
    async fn handle_frame(
        &self,
        frame: Message,
        handler: &dyn TickHandler,
        write: &mut WsSink,
    ) -> Option<SessionEnd> {
        match frame {
            Message::Text(text) => {
                match message::parse_inbound(text.as_str()) {
                    Ok(Inbound::Trade(tick)) => {
                        self.counters.record_accepted();
                        handler.on_tick(tick).await;
                    }
                    Ok(Inbound::Ack { id }) => {
                        debug!(symbol = %self.symbol, id, "late ack");
                    }
                    Ok(Inbound::Rejection { id, message }) => {
                        warn!(symbol = %self.symbol, id, %message, "stream rejected a request");
                    }
                    Err(error) => {
                        self.counters.record_rejected();
                        debug!(symbol = %self.symbol, error = %error, "dropped malformed frame");
                    }
                }
                None
            }
            Message::Ping(payload) => {
                if write.send(Message::Pong(payload)).await.is_err() {
                    return Some(SessionEnd::Failed(FeedError::Transport(
                        "pong failed".to_string(),
                    )));
                }
                None
            }
            Message::Close(_) => Some(SessionEnd::Closed),
            Message::Pong(_) | Message::Binary(_) | Message::Frame(_) => None,
        }
    }
}
