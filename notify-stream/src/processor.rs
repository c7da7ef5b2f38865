//! Per-message processing: codec then router.
//!
//! The processor is the piece the lifecycle manager registers with the
//! broker. Its handler closure is where the per-message isolation policy
//! is enforced: decode and extraction failures are logged with enough
//! context to diagnose a malformed producer, and the handler still returns
//! `Ok` so one bad message never terminates the subscription.

use std::sync::Arc;

use notify_broker::{Delivery, EventHandler};

use crate::error::ProcessError;
use crate::message::decode_notification;
use crate::router::EventRouter;
use crate::types::Dispatch;

/// Decodes raw deliveries and hands them to the router.
pub struct EventProcessor {
    router: EventRouter,
}

impl EventProcessor {
    /// Create a processor around a router.
    pub fn new(router: EventRouter) -> Self {
        Self { router }
    }

    /// Process one raw delivery end to end.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::Decode` if the envelope cannot be decoded and
    /// `ProcessError::Extraction` if the payload shape does not match the
    /// routing table. Both are scoped to this one delivery.
    pub fn process(&self, delivery: &Delivery) -> Result<Dispatch, ProcessError> {
        let message = decode_notification(delivery.body())?;
        let dispatch = self.router.dispatch(&message)?;
        Ok(dispatch)
    }

    /// Turn the processor into the handler the broker invokes per delivery.
    ///
    /// Per-message failures are logged, never propagated: the returned
    /// handler always reports `Ok` to the broker.
    pub fn into_handler(self: Arc<Self>) -> EventHandler {
        Arc::new(move |delivery: Delivery| {
            match self.process(&delivery) {
                Ok(Dispatch::Delivered { kind, resource_id }) => {
                    tracing::info!("Synced {} {} from event notification", kind, resource_id);
                }
                Ok(Dispatch::Acknowledged) | Ok(Dispatch::Ignored) => {}
                Err(ProcessError::Decode(e)) => {
                    tracing::warn!("Could not decode cluster notification: {}", e);
                }
                Err(ProcessError::Extraction(e)) => {
                    tracing::warn!("Could not extract identifier: {}", e);
                }
            }
            Ok(())
        })
    }
}
