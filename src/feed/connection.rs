//! WebSocket connection lifecycle management.
//!
//! [`ConnectionManager`] handles connecting, reading messages, automatic
//! reconnection with exponential backoff, and re-subscription to the viewed
//! market after each reconnect.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tungstenite::Message as WsMessage;

use super::{WsReader, WsWriter, connect, parse_feed_message, ping, unwatch_market, watch_market};
use crate::tui::Message;

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Commands sent from the app loop to the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCommand {
    /// Stream the given feed symbol, replacing the previous one.
    Watch(String),
}

/// Why the reader loop exited.
enum DisconnectReason {
    /// The connection was lost or errored.
    ConnectionError,
    /// The message channel to the app loop was closed (app shutting down).
    Shutdown,
}

/// Manages the feed connection lifecycle including reconnection with
/// exponential backoff.
pub struct ConnectionManager {
    url: String,
    book_depth: u16,
    tx: mpsc::UnboundedSender<Message>,
    cmd_rx: mpsc::UnboundedReceiver<FeedCommand>,
    watched: Option<String>,
}

impl ConnectionManager {
    /// Creates a new connection manager watching `initial_symbol` once connected.
    #[must_use]
    pub fn new(
        url: String,
        book_depth: usize,
        initial_symbol: Option<String>,
        tx: mpsc::UnboundedSender<Message>,
        cmd_rx: mpsc::UnboundedReceiver<FeedCommand>,
    ) -> Self {
        Self {
            url,
            book_depth: u16::try_from(book_depth).unwrap_or(u16::MAX),
            tx,
            cmd_rx,
            watched: initial_symbol,
        }
    }

    /// Runs the connection manager loop until the app shuts down.
    ///
    /// Connects to the WebSocket, reads messages, and automatically
    /// reconnects with exponential backoff on disconnection.
    pub async fn run(mut self) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let _ = self.tx.send(Message::Reconnecting);

            info!(url = %self.url, "Connecting to feed");
            let (mut write, read) = match connect(&self.url).await {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Connection failed: {e}");
                    if self.tx.send(Message::Disconnected).is_err() {
                        return;
                    }
                    info!(backoff_secs = backoff.as_secs(), "Backing off before retry");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
            };

            if let Err(e) = ping(&mut write).await {
                warn!("Ping failed: {e}");
                let _ = self.tx.send(Message::Disconnected);
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }

            if let Some(symbol) = self.watched.clone()
                && let Err(e) = watch_market(&mut write, &symbol, self.book_depth).await
            {
                warn!(symbol = %symbol, "Failed to subscribe: {e}");
            }

            let _ = self.tx.send(Message::Connected);
            info!("Feed connected");
            backoff = INITIAL_BACKOFF;

            match self.read_loop(&mut write, read).await {
                DisconnectReason::ConnectionError => {
                    let _ = self.tx.send(Message::Disconnected);
                    info!(
                        backoff_secs = backoff.as_secs(),
                        "Connection lost, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                DisconnectReason::Shutdown => {
                    info!("Connection manager shutting down");
                    return;
                }
            }
        }
    }

    /// Reads messages until disconnection or shutdown, handling watch
    /// commands on the live writer.
    async fn read_loop(&mut self, write: &mut WsWriter, mut read: WsReader) -> DisconnectReason {
        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => match parse_feed_message(&text) {
                            Ok(Some(message)) => {
                                if self.tx.send(message).is_err() {
                                    return DisconnectReason::Shutdown;
                                }
                            }
                            Ok(None) => {}
                            Err(e) => warn!("Dropping feed message: {e}"),
                        },
                        Some(Ok(_)) => {} // Binary/Ping/Pong/Close frames
                        Some(Err(e)) => {
                            warn!("WebSocket error: {e}");
                            return DisconnectReason::ConnectionError;
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return DisconnectReason::ConnectionError;
                        }
                    }
                }

                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(FeedCommand::Watch(symbol)) => {
                            if self.watched.as_deref() == Some(symbol.as_str()) {
                                continue;
                            }
                            if let Some(previous) = self.watched.take()
                                && let Err(e) = unwatch_market(write, &previous).await
                            {
                                warn!(symbol = %previous, "Failed to unsubscribe: {e}");
                                self.watched = Some(symbol);
                                return DisconnectReason::ConnectionError;
                            }
                            self.watched = Some(symbol.clone());
                            if let Err(e) = watch_market(write, &symbol, self.book_depth).await {
                                warn!(symbol = %symbol, "Failed to subscribe: {e}");
                                return DisconnectReason::ConnectionError;
                            }
                        }
                        None => return DisconnectReason::Shutdown,
                    }
                }
            }
        }
    }
}
