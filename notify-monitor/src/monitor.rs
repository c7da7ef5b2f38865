//! Subscription lifecycle management.
//!
//! The monitor owns the connect → subscribe → run-until-cancelled →
//! unsubscribe → disconnect sequence. `start` connects and returns
//! immediately; a single background task owns the subscription handle and
//! the connection for their whole lifetime, waits only on the external
//! cancellation token, and releases both on every exit path.

use std::sync::{Arc, Mutex, RwLock};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use notify_broker::{Broker, DEFAULT_NOTIFICATION_TOPIC};
use notify_stream::{EventProcessor, EventRouter, Sink};

use crate::error::MonitorError;

/// Observable lifecycle state of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// No run active
    #[default]
    Idle,
    /// Connection open, subscription not yet registered
    Connected,
    /// Subscription active, waiting for messages or cancellation
    Subscribed,
    /// Teardown in progress
    Terminating,
}

/// Long-lived subscriber for cluster lifecycle notifications.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use notify_monitor::NotificationMonitor;
///
/// let monitor = NotificationMonitor::new(broker, sink);
/// let cancel = CancellationToken::new();
///
/// monitor.start(cancel.clone()).await?;
///
/// // ... later, from a signal handler or supervisor:
/// cancel.cancel();
/// monitor.join().await;
/// ```
pub struct NotificationMonitor {
    broker: Arc<dyn Broker>,
    processor: Arc<EventProcessor>,
    topic: String,
    state: Arc<RwLock<MonitorState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationMonitor {
    /// Create a monitor over `broker` delivering to `sink`, subscribed to
    /// the default notification topic.
    pub fn new(broker: Arc<dyn Broker>, sink: Arc<dyn Sink>) -> Self {
        Self::with_topic(broker, sink, DEFAULT_NOTIFICATION_TOPIC)
    }

    /// Create a monitor subscribed to a specific topic.
    pub fn with_topic(
        broker: Arc<dyn Broker>,
        sink: Arc<dyn Sink>,
        topic: impl Into<String>,
    ) -> Self {
        let processor = Arc::new(EventProcessor::new(EventRouter::new(sink)));
        Self {
            broker,
            processor,
            topic: topic.into(),
            state: Arc::new(RwLock::new(MonitorState::Idle)),
            task: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        self.state.read().map(|s| *s).unwrap_or_default()
    }

    /// Connect and start receiving notifications in the background.
    ///
    /// Connects fail-fast (retry policy belongs to the caller), then spawns
    /// the background task and returns without waiting for the subscription
    /// to be registered. The task runs until `cancel` fires, then releases
    /// the subscription and the connection, in that order.
    ///
    /// # Errors
    ///
    /// * `MonitorError::AlreadyRunning` - a previous run has not finished
    /// * `MonitorError::Connect` - the broker connection failed
    pub async fn start(&self, cancel: CancellationToken) -> Result<(), MonitorError> {
        if self.state() != MonitorState::Idle {
            return Err(MonitorError::AlreadyRunning);
        }

        self.broker.connect().await?;
        set_state(&self.state, MonitorState::Connected);
        tracing::info!("Success to connect cluster notification");

        let broker = Arc::clone(&self.broker);
        let processor = Arc::clone(&self.processor);
        let state = Arc::clone(&self.state);
        let topic = self.topic.clone();

        let task = tokio::spawn(async move {
            let handler = processor.into_handler();

            let mut subscription = match broker.subscribe(&topic, handler).await {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("Could not register to cluster notification: {}", e);
                    set_state(&state, MonitorState::Terminating);
                    if let Err(e) = broker.disconnect().await {
                        tracing::warn!("Failed to disconnect cluster notification: {}", e);
                    }
                    set_state(&state, MonitorState::Idle);
                    return;
                }
            };

            set_state(&state, MonitorState::Subscribed);
            tracing::info!("Start cluster notification on {}", topic);

            cancel.cancelled().await;

            set_state(&state, MonitorState::Terminating);
            if let Err(e) = subscription.unsubscribe().await {
                tracing::warn!("Failed to unsubscribe cluster notification: {}", e);
            }
            if let Err(e) = broker.disconnect().await {
                tracing::warn!("Failed to disconnect cluster notification: {}", e);
            }
            set_state(&state, MonitorState::Idle);
            tracing::info!("Stop cluster notification");
        });

        if let Ok(mut slot) = self.task.lock() {
            *slot = Some(task);
        }

        Ok(())
    }

    /// Best-effort disconnect, independent of the cancellation signal.
    ///
    /// A no-op when idle. Does not release the subscription handle; that
    /// stays with the background task, which tears down exactly once when
    /// the cancellation token fires. Brokers tolerate disconnect on an
    /// already-closed transport, so a later teardown is harmless.
    pub async fn stop(&self) {
        if self.state() == MonitorState::Idle {
            return;
        }
        if let Err(e) = self.broker.disconnect().await {
            tracing::warn!("Failed to disconnect cluster notification: {}", e);
        }
        tracing::info!("Close cluster notification");
    }

    /// Wait for the background task to finish its teardown.
    pub async fn join(&self) {
        let task = match self.task.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!("Notification task terminated abnormally: {}", e);
            }
        }
    }
}

fn set_state(state: &RwLock<MonitorState>, next: MonitorState) {
    if let Ok(mut current) = state.write() {
        *current = next;
    }
}
