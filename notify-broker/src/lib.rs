//! # notify-broker
//!
//! Abstract broker capability for the cluster notification subscriber.
//!
//! This crate defines the seam between the notification core and whatever
//! pub/sub transport carries cluster lifecycle events: the [`Broker`] and
//! [`SubscriptionHandle`] traits, the raw [`Delivery`] type handlers
//! receive, and the endpoint configuration derived from a cluster API
//! server URL. No transport implementation lives here.

mod broker;
mod delivery;
mod endpoint;
mod error;

pub use broker::*;
pub use delivery::*;
pub use endpoint::*;
pub use error::*;
