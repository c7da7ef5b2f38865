//! # notify-monitor
//!
//! Subscription lifecycle management for the cluster notification
//! subscriber.
//!
//! ## Overview
//!
//! [`NotificationMonitor`] attaches a notification processing pipeline to
//! an abstract broker and owns the full lifecycle: connect, subscribe the
//! handler, wait for an external cancellation signal, then release the
//! subscription and the connection in order. The caller holds the
//! [`CancellationToken`](tokio_util::sync::CancellationToken); the monitor
//! holds everything else.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use notify_broker::BrokerEndpoint;
//! use notify_monitor::NotificationMonitor;
//!
//! let endpoint = BrokerEndpoint::from_server_url("http://192.168.1.1:8080")?;
//! let broker = Arc::new(AmqpBroker::new(endpoint));   // transport impl
//! let sink = Arc::new(ClusterSync::new());            // downstream consumer
//!
//! let monitor = NotificationMonitor::new(broker, sink);
//! let cancel = CancellationToken::new();
//! monitor.start(cancel.clone()).await?;
//!
//! // run until shutdown is requested
//! cancel.cancel();
//! monitor.join().await;
//! ```

pub mod error;
pub mod monitor;

// Re-export main types for convenience
pub use error::{MonitorError, Result};
pub use monitor::{MonitorState, NotificationMonitor};

// Re-export commonly used types from dependencies
pub use notify_broker::{Broker, BrokerEndpoint, DEFAULT_NOTIFICATION_TOPIC};
pub use notify_stream::{Dispatch, ResourceKind, Sink};
