//! Incoming feed message routing.

use tracing::debug;

use crate::error::DeskError;
use crate::tui::Message;

/// Parses raw feed text into an app [`Message`].
///
/// Returns `Ok(None)` for frames the app does not consume (pongs,
/// subscription acknowledgements, unknown channels).
///
/// # Errors
///
/// Returns [`DeskError::MalformedMessage`] if the text is not JSON, or
/// [`DeskError::Json`] if a known channel's payload does not match its model.
pub fn parse_feed_message(text: &str) -> crate::Result<Option<Message>> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DeskError::MalformedMessage(e.to_string()))?;

    if let Some(method) = value.get("method").and_then(|m| m.as_str()) {
        debug!(method, "Ignoring RPC response");
        return Ok(None);
    }

    let Some(channel) = value.get("channel").and_then(|c| c.as_str()) else {
        return Ok(None);
    };

    let message = match channel {
        "heartbeat" => Some(Message::Heartbeat),
        "status" => Some(Message::Status(serde_json::from_value(value)?)),
        "book" => Some(Message::Book(serde_json::from_value(value)?)),
        "trade" => Some(Message::Trade(serde_json::from_value(value)?)),
        "ticker" => Some(Message::Ticker(serde_json::from_value(value)?)),
        other => {
            debug!(channel = other, "Ignoring channel");
            None
        }
    };

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_book_snapshot() {
        let text = r#"{"channel":"book","type":"snapshot","data":[{"symbol":"BTC/USD","bids":[{"price":100.5,"qty":2}],"asks":[],"checksum":1}]}"#;
        match parse_feed_message(text).unwrap() {
            Some(Message::Book(book)) => {
                assert!(book.is_snapshot());
                assert_eq!(book.data[0].bids.len(), 1);
            }
            other => panic!("expected book message, got {other:?}"),
        }
    }

    #[test]
    fn ignores_rpc_and_unknown_channels() {
        let pong = r#"{"method":"pong","time_in":"a","time_out":"b"}"#;
        assert!(parse_feed_message(pong).unwrap().is_none());
        let ohlc = r#"{"channel":"ohlc","type":"update","data":[]}"#;
        assert!(parse_feed_message(ohlc).unwrap().is_none());
    }

    #[test]
    fn heartbeat_has_no_payload() {
        let msg = parse_feed_message(r#"{"channel":"heartbeat"}"#).unwrap();
        assert!(matches!(msg, Some(Message::Heartbeat)));
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_feed_message("not json").unwrap_err();
        assert!(matches!(err, DeskError::MalformedMessage(_)));
    }

    #[test]
    fn rejects_mismatched_payload() {
        let err = parse_feed_message(r#"{"channel":"trade","type":"update","data":"x"}"#);
        assert!(matches!(err, Err(DeskError::Json(_))));
    }
}
