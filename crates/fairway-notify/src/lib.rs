//! Best-effort client for the external notification service.
//!
//! Every dispatch is fire-and-forget: the call returns immediately, the
//! request runs on a spawned task, and any failure is logged and swallowed.
//! A notification must never fail the operation that triggered it.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub recipient: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: String,
}

#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl Notifier {
    /// `endpoint` is the notification service URL; `None` disables remote
    /// dispatch (notifications are logged and dropped).
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self { client, endpoint }
    }

    /// Queue a notification for delivery and return immediately.
    pub fn dispatch(&self, recipient: Uuid, kind: &str, title: &str, body: &str) {
        let notification = Notification {
            recipient,
            kind: kind.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        };

        let Some(endpoint) = self.endpoint.clone() else {
            debug!(
                "Notification service not configured, dropping '{}' for {}",
                notification.kind, notification.recipient
            );
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.post(&endpoint).json(&notification).send().await;

            match result {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => warn!(
                    "Notification '{}' for {} rejected: {}",
                    notification.kind,
                    notification.recipient,
                    resp.status()
                ),
                Err(e) => warn!(
                    "Notification '{}' for {} failed: {}",
                    notification.kind, notification.recipient, e
                ),
            }
        });
    }
}
