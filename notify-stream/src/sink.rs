//! The downstream synchronization seam.

use crate::types::ResourceKind;

/// Error reported by a sink; logged by the router, never fatal to the
/// subscription.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer of extracted resource identifiers.
///
/// The router calls `apply` once per successfully extracted identifier.
/// Implementations are expected to be fast; slow sinks stall delivery of
/// subsequent messages on the same subscription.
pub trait Sink: Send + Sync {
    /// Accept one `(kind, identifier)` pair for downstream synchronization.
    fn apply(&self, kind: ResourceKind, resource_id: &str) -> Result<(), SinkError>;
}
