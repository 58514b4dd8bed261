//! Wire messages of the trade stream.
//!
//! Everything inbound goes through [`parse_inbound`]: a frame either becomes
//! a well-typed value or a typed rejection. Folding logic downstream never
//! sees partially-valid data.

use chrono::{DateTime, Utc};
use pampero_types::Tick;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced by the parse-or-reject boundary.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Frame is not valid JSON or matches no known shape.
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Frame parsed but carries an event type we did not subscribe to.
    #[error("Unexpected event type: {0}")]
    UnexpectedEvent(String),

    /// Trade event without a symbol.
    #[error("Missing symbol")]
    MissingSymbol,

    /// A numeric field that did not parse as a number.
    #[error("Invalid {field}: {raw:?} is not a number")]
    InvalidNumber {
        /// Which field was invalid.
        field: &'static str,
        /// The raw value as received.
        raw: String,
    },

    /// A numeric field outside its valid range.
    #[error("Invalid {field}: {value} must be positive and finite")]
    NonPositive {
        /// Which field was invalid.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Trade timestamp outside the representable range.
    #[error("Invalid trade timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// A successfully parsed inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A validated trade observation.
    Trade(Tick),
    /// Acknowledgement of a request we sent (SUBSCRIBE et al.).
    Ack {
        /// Request id the ack responds to.
        id: u64,
    },
    /// The stream rejected a request we sent.
    Rejection {
        /// Request id the rejection responds to.
        id: u64,
        /// Error text from the stream.
        message: String,
    },
}

/// Raw trade event as the exchange encodes it: single-letter keys, prices
/// and quantities as decimal strings.
#[derive(Debug, Deserialize)]
struct TradeEvent {
    #[serde(rename = "e")]
    event: String,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "t")]
    trade_id: i64,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    quantity: String,
    #[serde(rename = "T")]
    trade_time_ms: i64,
}

/// Trade event wrapped in the combined-stream envelope.
#[derive(Debug, Deserialize)]
struct StreamEnvelope {
    #[allow(dead_code)]
    stream: String,
    data: TradeEvent,
}

/// Response to a request made over the stream socket.
#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[allow(dead_code)]
    result: Option<serde_json::Value>,
    error: Option<CommandError>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct CommandError {
    code: i64,
    msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StreamMessage {
    Response(CommandResponse),
    Enveloped(StreamEnvelope),
    Trade(TradeEvent),
}

/// Parses one inbound text frame.
///
/// Accepts bare trade events, combined-stream envelopes, and command
/// responses. The tick's ingest timestamp is assigned here, on receipt.
///
/// # Errors
///
/// Returns a [`ParseError`] when the frame matches no known shape or a
/// trade event fails validation.
pub fn parse_inbound(text: &str) -> Result<Inbound, ParseError> {
    match serde_json::from_str::<StreamMessage>(text)? {
        StreamMessage::Response(response) => Ok(response.error.map_or(
            Inbound::Ack { id: response.id },
            |error| Inbound::Rejection {
                id: response.id,
                message: format!("{} (code {})", error.msg, error.code),
            },
        )),
        StreamMessage::Enveloped(envelope) => validate(envelope.data).map(Inbound::Trade),
        StreamMessage::Trade(event) => validate(event).map(Inbound::Trade),
    }
}

/// Builds the SUBSCRIBE request for a symbol's trade channel.
#[must_use]
pub fn subscribe_request(symbol: &str, id: u64) -> String {
    serde_json::json!({
        "method": "SUBSCRIBE",
        "params": [format!("{}@trade", symbol.to_lowercase())],
        "id": id,
    })
    .to_string()
}

/// Validates a raw trade event into a [`Tick`].
fn validate(event: TradeEvent) -> Result<Tick, ParseError> {
    if event.event != "trade" {
        return Err(ParseError::UnexpectedEvent(event.event));
    }
    if event.symbol.is_empty() {
        return Err(ParseError::MissingSymbol);
    }
    let price = parse_positive(&event.price, "price")?;
    let quantity = parse_positive(&event.quantity, "quantity")?;
    let trade_time = DateTime::from_timestamp_millis(event.trade_time_ms)
        .ok_or(ParseError::InvalidTimestamp(event.trade_time_ms))?;

    Ok(Tick::new(
        event.symbol,
        price,
        quantity,
        trade_time,
        Utc::now(),
        Some(event.trade_id),
    ))
}

/// Parses a decimal string field, requiring a finite positive value.
fn parse_positive(raw: &str, field: &'static str) -> Result<f64, ParseError> {
    let value: f64 = raw.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        raw: raw.to_string(),
    })?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParseError::NonPositive { field, value })
    }
}
