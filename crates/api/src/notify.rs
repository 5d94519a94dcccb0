//! Webhook delivery of origin-change notifications.
//!
//! Rotation must never wait on the webhook, so events go through a bounded
//! queue to a single background worker. When the queue is full the event is
//! dropped and logged; delivery is best-effort by contract.

use keygate_core::notify::{NotificationSink, OriginChange};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct WebhookNotifier {
    tx: mpsc::Sender<OriginChange>,
}

impl WebhookNotifier {
    /// Start the delivery worker. Returns the sink plus the worker handle;
    /// the worker exits once every sender is dropped and the queue drains.
    pub fn spawn(endpoint: String, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<OriginChange>(capacity);

        let handle = tokio::spawn(async move {
            let client = reqwest::Client::new();
            while let Some(change) = rx.recv().await {
                deliver(&client, &endpoint, &change).await;
            }
        });

        (Self { tx }, handle)
    }
}

impl NotificationSink for WebhookNotifier {
    fn notify(&self, change: OriginChange) {
        if let Err(e) = self.tx.try_send(change) {
            tracing::warn!(error = %e, "notification queue full, dropping origin-change event");
        }
    }
}

async fn deliver(client: &reqwest::Client, endpoint: &str, change: &OriginChange) {
    let payload = json!({
        "user_id": change.user_id,
        "old_ip": change.old_origin,
        "new_ip": change.new_origin,
    });

    match client.post(endpoint).json(&payload).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::debug!(user_id = %change.user_id, "origin-change notification delivered");
        }
        Ok(resp) => {
            tracing::warn!(
                user_id = %change.user_id,
                status = %resp.status(),
                "origin-change webhook rejected the notification"
            );
        }
        Err(e) => {
            tracing::warn!(user_id = %change.user_id, error = %e, "origin-change webhook unreachable");
        }
    }
}
