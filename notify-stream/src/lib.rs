//! # notify-stream
//!
//! Envelope decoding and event routing for the cluster notification
//! subscriber.
//!
//! Inbound messages arrive as a double-nested JSON envelope. This crate
//! peels both layers into a typed [`NotificationMessage`], classifies the
//! event type through a static routing table, extracts the resource
//! identifier at the table's payload path, and forwards `(kind, id)` pairs
//! to a [`Sink`]. All per-message failures are typed and isolated; nothing
//! in this crate can tear down a subscription.

mod error;
mod message;
mod processor;
mod router;
mod sink;
mod types;

pub use error::*;
pub use message::*;
pub use processor::*;
pub use router::*;
pub use sink::*;
pub use types::*;
