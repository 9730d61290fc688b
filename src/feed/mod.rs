//! Async clients for the external data sources.
//!
//! This module is organized by source:
//! - [`subscription`] - Channel subscribe/unsubscribe for the viewed market
//! - [`handler`] - Incoming feed message routing
//! - [`connection`] - Reconnecting websocket lifecycle
//! - [`rest`] - Polled market list and user data

pub mod connection;
pub mod handler;
pub mod rest;
pub mod subscription;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use tungstenite::Message;

use crate::Result;
use crate::models::PingRequest;

pub use connection::{ConnectionManager, FeedCommand};
pub use handler::parse_feed_message;
pub use rest::{PollCommand, Poller, fetch_markets, fetch_user_data};
pub use subscription::{unwatch_market, watch_market};

/// Write half of a feed connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a feed connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns a [`DeskError`](crate::DeskError) if the connection or TLS handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Sends a ping message over the WebSocket to test connection liveness.
///
/// # Errors
///
/// Returns a [`DeskError`](crate::DeskError) if sending the message fails.
pub async fn ping(write: &mut WsWriter) -> Result<()> {
    let request = PingRequest::new();
    let json = serde_json::to_string(&request)?;
    write.send(Message::Text(json.into())).await?;
    debug!("Sent ping");

    Ok(())
}
