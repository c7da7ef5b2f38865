//! End-to-end tests for the notification pipeline.
//!
//! These wire a loopback broker and a recording sink through the monitor
//! and drive real envelopes through decode, routing, and extraction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use notify_broker::{Broker, ConnError, Delivery, EventHandler, SubError, SubscriptionHandle};
use notify_monitor::{MonitorState, NotificationMonitor, ResourceKind, Sink};
use notify_stream::SinkError;

/// In-process broker that delivers pushed messages straight to the
/// registered handler, the way a transport would between polls.
struct LoopbackBroker {
    handler: Mutex<Option<EventHandler>>,
    unsubscribes: Arc<AtomicUsize>,
    disconnects: Arc<AtomicUsize>,
}

impl LoopbackBroker {
    fn new() -> Self {
        Self {
            handler: Mutex::new(None),
            unsubscribes: Arc::new(AtomicUsize::new(0)),
            disconnects: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn publish(&self, event_type: &str, payload: serde_json::Value) {
        let inner = serde_json::to_string(&json!({
            "event_type": event_type,
            "payload": payload,
        }))
        .unwrap();
        let envelope = serde_json::to_string(&json!({ "oslo.message": inner })).unwrap();
        self.publish_raw(envelope.into_bytes());
    }

    fn publish_raw(&self, body: Vec<u8>) {
        if let Some(handler) = self.handler.lock().unwrap().as_ref() {
            let _ = handler(Delivery::new(body));
        }
    }
}

struct LoopbackHandle {
    topic: String,
    unsubscribes: Arc<AtomicUsize>,
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
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Broker for LoopbackBroker {
    async fn connect(&self) -> Result<(), ConnError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ConnError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        handler: EventHandler,
    ) -> Result<Box<dyn SubscriptionHandle>, SubError> {
        *self.handler.lock().unwrap() = Some(handler);
        Ok(Box::new(LoopbackHandle {
            topic: topic.to_string(),
            unsubscribes: Arc::clone(&self.unsubscribes),
            released: false,
        }))
    }
}

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<(ResourceKind, String)>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<(ResourceKind, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Sink for RecordingSink {
    fn apply(&self, kind: ResourceKind, resource_id: &str) -> Result<(), SinkError> {
        self.calls
            .lock()
            .unwrap()
            .push((kind, resource_id.to_string()));
        Ok(())
    }
}

async fn wait_for_subscribed(monitor: &NotificationMonitor) {
    for _ in 0..200 {
        if monitor.state() == MonitorState::Subscribed {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("monitor never subscribed");
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let broker = Arc::new(LoopbackBroker::new());
    let sink = Arc::new(RecordingSink::default());
    let monitor = NotificationMonitor::new(broker.clone(), sink.clone());
    let cancel = CancellationToken::new();

    monitor.start(cancel.clone()).await.unwrap();
    wait_for_subscribed(&monitor).await;

    // A representative stream of producer traffic: extractions across
    // several resource kinds, a recognized no-op, an unknown type, and
    // malformed messages interleaved throughout
    broker.publish("identity.project.created", json!({"id": "p-1"}));
    broker.publish_raw(b"not even json".to_vec());
    broker.publish(
        "compute.instance.create.end",
        json!({"instance_id": "abc-123"}),
    );
    broker.publish("volume.attach.end", json!({"volume_id": "v-5"}));
    broker.publish("image.upload.end", json!({"image": {"id": "img-1"}}));
    broker.publish("network.create.end", json!({"network": {"id": "net-9"}}));
    broker.publish("network.create.end", json!({"network": {}}));
    broker.publish(
        "floatingip.delete.end",
        json!({"floatingip": {"id": "fip-3"}}),
    );

    assert_eq!(
        sink.calls(),
        vec![
            (ResourceKind::Project, "p-1".to_string()),
            (ResourceKind::Instance, "abc-123".to_string()),
            (ResourceKind::Network, "net-9".to_string()),
            (ResourceKind::FloatingIp, "fip-3".to_string()),
        ]
    );

    cancel.cancel();
    monitor.join().await;

    assert_eq!(broker.unsubscribes.load(Ordering::SeqCst), 1);
    assert_eq!(broker.disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(monitor.state(), MonitorState::Idle);
}

#[tokio::test]
async fn test_restart_after_full_teardown() {
    let broker = Arc::new(LoopbackBroker::new());
    let sink = Arc::new(RecordingSink::default());
    let monitor = NotificationMonitor::new(broker.clone(), sink.clone());

    let first = CancellationToken::new();
    monitor.start(first.clone()).await.unwrap();
    wait_for_subscribed(&monitor).await;
    first.cancel();
    monitor.join().await;

    // A fresh run is a fresh subscription
    let second = CancellationToken::new();
    monitor.start(second.clone()).await.unwrap();
    wait_for_subscribed(&monitor).await;

    broker.publish("router.update.end", json!({"router": {"id": "r-2"}}));
    assert_eq!(
        sink.calls(),
        vec![(ResourceKind::Router, "r-2".to_string())]
    );

    second.cancel();
    monitor.join().await;
    assert_eq!(broker.unsubscribes.load(Ordering::SeqCst), 2);
    assert_eq!(broker.disconnects.load(Ordering::SeqCst), 2);
}
