//! The two-layer notification envelope codec.
//!
//! Producers wrap each notification twice: the outer wire form is a JSON
//! object whose `"oslo.message"` entry holds the inner notification as a
//! JSON-encoded *string*. Decoding peels both layers; it is a pure
//! transform with no side effects on failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Envelope key whose value carries the serialized notification.
pub const INNER_ENVELOPE_KEY: &str = "oslo.message";

/// Decoded inner notification.
///
/// `payload` shape varies per event type and is never validated against a
/// schema; extraction performs checked lookups instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Routing key, e.g. `"compute.instance.create.end"`
    pub event_type: String,

    /// Event-type-specific body
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl NotificationMessage {
    /// Build a message from an event type and payload.
    pub fn new(event_type: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }
}

/// Decode raw envelope bytes into a [`NotificationMessage`].
///
/// # Errors
///
/// * `DecodeError::OuterMalformed` - the bytes are not a JSON object
/// * `DecodeError::MissingInnerEnvelope` - no `"oslo.message"` string entry
/// * `DecodeError::InnerMalformed` - the inner string is not a valid message
pub fn decode_notification(body: &[u8]) -> Result<NotificationMessage, DecodeError> {
    let envelope: Map<String, Value> =
        serde_json::from_slice(body).map_err(DecodeError::OuterMalformed)?;

    let inner = envelope
        .get(INNER_ENVELOPE_KEY)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingInnerEnvelope)?;

    serde_json::from_str(inner).map_err(DecodeError::InnerMalformed)
}

/// Encode a [`NotificationMessage`] into the double-nested wire form.
///
/// Inverse of [`decode_notification`]; used by tests and fixture producers.
pub fn encode_notification(message: &NotificationMessage) -> serde_json::Result<String> {
    let inner = serde_json::to_string(message)?;
    let mut envelope = Map::new();
    envelope.insert(INNER_ENVELOPE_KEY.to_string(), Value::String(inner));
    serde_json::to_string(&envelope)
}
