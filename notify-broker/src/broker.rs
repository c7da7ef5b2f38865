//! Broker capability traits.

use async_trait::async_trait;

use crate::delivery::EventHandler;
use crate::error::{ConnError, SubError};

/// Abstract pub/sub transport for the cluster notification bus.
///
/// Implementations own the actual wire protocol. The lifecycle manager only
/// relies on the ordering contract: `connect` before `subscribe`, the
/// subscription released before `disconnect`, and `disconnect` tolerated as
/// a no-op when the transport is already down.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the lifecycle manager moves a
/// shared reference into its background task.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Open the transport connection.
    ///
    /// # Errors
    ///
    /// Returns `ConnError::ConnectFailed` if the transport cannot be opened.
    async fn connect(&self) -> Result<(), ConnError>;

    /// Close the transport connection.
    ///
    /// Must be safe to call when no connection is open; implementations
    /// report that case as `Ok(())`, not an error.
    async fn disconnect(&self) -> Result<(), ConnError>;

    /// Register a handler for every message published to `topic`.
    ///
    /// The returned handle is the only way to release the registration.
    /// The broker invokes the handler serially per subscription.
    ///
    /// # Errors
    ///
    /// Returns `SubError::SubscribeFailed` if registration fails.
    async fn subscribe(
        &self,
        topic: &str,
        handler: EventHandler,
    ) -> Result<Box<dyn SubscriptionHandle>, SubError>;
}

/// Handle for an active topic registration.
#[async_trait]
pub trait SubscriptionHandle: Send + Sync {
    /// The topic this registration is bound to.
    fn topic(&self) -> &str;

    /// Release the registration.
    ///
    /// Called at most once by the owner; implementations should treat a
    /// repeated call as `SubError::AlreadyReleased` rather than panic.
    async fn unsubscribe(&mut self) -> Result<(), SubError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::Delivery;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// In-memory broker that hands a pushed delivery straight to the handler.
    struct LoopbackBroker {
        connected: AtomicBool,
        handler: std::sync::Mutex<Option<EventHandler>>,
    }

    impl LoopbackBroker {
        fn new() -> Self {
            Self {
                connected: AtomicBool::new(false),
                handler: std::sync::Mutex::new(None),
            }
        }

        fn push(&self, delivery: Delivery) {
            if let Some(handler) = self.handler.lock().unwrap().as_ref() {
                let _ = handler(delivery);
            }
        }
    }

    struct LoopbackHandle {
        topic: String,
        released: bool,
    }

    #[async_trait]
    impl SubscriptionHandle for LoopbackHandle {
        fn topic(&self) -> &str {
            &self.topic
        }

        async fn unsubscribe(&mut self) -> Result<(), SubError> {
            if self.released {
                return Err(SubError::AlreadyReleased);
            }
            self.released = true;
            Ok(())
        }
    }

    #[async_trait]
    impl Broker for LoopbackBroker {
        async fn connect(&self) -> Result<(), ConnError> {
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), ConnError> {
            self.connected.store(false, Ordering::SeqCst);
            Ok(())
        }

        async fn subscribe(
            &self,
            topic: &str,
            handler: EventHandler,
        ) -> Result<Box<dyn SubscriptionHandle>, SubError> {
            if !self.connected.load(Ordering::SeqCst) {
                return Err(SubError::SubscribeFailed {
                    topic: topic.to_string(),
                    reason: "not connected".to_string(),
                });
            }
            *self.handler.lock().unwrap() = Some(handler);
            Ok(Box::new(LoopbackHandle {
                topic: topic.to_string(),
                released: false,
            }))
        }
    }

    #[tokio::test]
    async fn test_subscribe_requires_connection() {
        let broker = LoopbackBroker::new();
        let handler: EventHandler = Arc::new(|_| Ok(()));
        let result = broker.subscribe("notifications.info", handler).await;
        assert!(matches!(result, Err(SubError::SubscribeFailed { .. })));
    }

    #[tokio::test]
    async fn test_subscribe_and_deliver() {
        let broker = LoopbackBroker::new();
        broker.connect().await.unwrap();

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_ref = Arc::clone(&seen);
        let handler: EventHandler = Arc::new(move |d: Delivery| {
            seen_ref.lock().unwrap().push(d.body.clone());
            Ok(())
        });

        let mut handle = broker
            .subscribe("notifications.info", handler)
            .await
            .unwrap();
        assert_eq!(handle.topic(), "notifications.info");

        broker.push(Delivery::new(&b"one"[..]));
        assert_eq!(seen.lock().unwrap().len(), 1);

        handle.unsubscribe().await.unwrap();
        assert!(matches!(
            handle.unsubscribe().await,
            Err(SubError::AlreadyReleased)
        ));
    }
}
