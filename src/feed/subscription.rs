//! Channel subscription for the viewed market.

use futures_util::SinkExt;
use tracing::{debug, info};
use tungstenite::Message;

use super::WsWriter;
use crate::Result;
use crate::models::{Channel, SubscriptionRequest};

/// Channels streamed for the viewed market.
const MARKET_CHANNELS: [Channel; 3] = [Channel::Book, Channel::Trades, Channel::Ticker];

/// Subscribes to the book, trade and ticker channels for `symbol`.
///
/// # Errors
///
/// Returns a [`DeskError`](crate::DeskError) if sending a subscription message fails.
pub async fn watch_market(write: &mut WsWriter, symbol: &str, depth: u16) -> Result<()> {
    let symbols = vec![symbol.to_string()];
    for channel in MARKET_CHANNELS {
        let mut request = SubscriptionRequest::subscribe(channel, &symbols);
        if channel == Channel::Book {
            request = request.with_depth(depth);
        }
        send(write, &request).await?;
    }
    info!(symbol, depth, "Watching market");

    Ok(())
}

/// Unsubscribes from every channel streamed for `symbol`.
///
/// # Errors
///
/// Returns a [`DeskError`](crate::DeskError) if sending an unsubscribe message fails.
pub async fn unwatch_market(write: &mut WsWriter, symbol: &str) -> Result<()> {
    let symbols = vec![symbol.to_string()];
    for channel in MARKET_CHANNELS {
        send(write, &SubscriptionRequest::unsubscribe(channel, &symbols)).await?;
    }
    info!(symbol, "Stopped watching market");

    Ok(())
}

async fn send(write: &mut WsWriter, request: &SubscriptionRequest) -> Result<()> {
    let json = serde_json::to_string(request)?;
    debug!("Sending subscription request: {}", json);
    write.send(Message::Text(json.into())).await?;
    Ok(())
}
