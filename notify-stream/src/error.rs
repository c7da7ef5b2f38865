//! Error types for the notify-stream crate.

/// Errors decoding the two-layer notification envelope.
///
/// All decode errors are scoped to a single message; the subscription keeps
/// running regardless.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The outer envelope bytes are not a JSON object
    #[error("Outer envelope is not a JSON object: {0}")]
    OuterMalformed(#[source] serde_json::Error),

    /// The envelope has no "oslo.message" entry, or it is not a string
    #[error("Envelope has no \"oslo.message\" string entry")]
    MissingInnerEnvelope,

    /// The inner "oslo.message" string is not a valid notification message
    #[error("Inner notification message is malformed: {0}")]
    InnerMalformed(#[source] serde_json::Error),
}

/// Errors extracting a resource identifier from a notification payload.
///
/// Payload shapes are event-type-specific and never schema-validated, so a
/// malformed producer surfaces here rather than as a panic. Scoped to a
/// single message.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The payload lacks the field the routing table expects
    #[error("Event {event_type}: payload field \"{path}\" is missing")]
    FieldMissing {
        /// The event type being routed
        event_type: String,
        /// Dotted path of the missing field
        path: String,
    },

    /// The field exists but is not the expected JSON type
    #[error("Event {event_type}: payload field \"{path}\" has an unexpected type")]
    TypeMismatch {
        /// The event type being routed
        event_type: String,
        /// Dotted path of the mistyped field
        path: String,
    },
}

/// Per-message processing failure: decode or extraction.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Envelope decoding failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Identifier extraction failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
