//! Raw delivery type handed to subscription handlers.

use std::sync::Arc;

use bytes::Bytes;

/// A single raw message delivered by the broker.
///
/// The body is opaque to the transport; decoding it is entirely the
/// handler's concern. Deliveries are cheap to clone.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Raw message body as published
    pub body: Bytes,
}

impl Delivery {
    /// Wrap raw bytes as a delivery.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self { body: body.into() }
    }

    /// Borrow the body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Error type a handler may report back to the broker.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Handler invoked by the broker for each delivery on a subscribed topic.
///
/// The broker invokes handlers serially per subscription. A returned error
/// is transport feedback for that one delivery only; it must not tear down
/// the subscription.
pub type EventHandler = Arc<dyn Fn(Delivery) -> Result<(), HandlerError> + Send + Sync>;
