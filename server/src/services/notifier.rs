// server/src/services/notifier.rs

//! Fire-and-forget announcements of newly placed orders.
//!
//! Handlers hand an [`OrderPlaced`] to [`NotificationDispatcher::dispatch`],
//! which only enqueues it. A background task drains the queue and delivers
//! one message per event through a [`NotificationSink`]; there is no retry
//! and no acknowledgement travels back to the request.

use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use catalog_orders::OrderPlaced;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

#[async_trait]
pub trait NotificationSink: Send + Sync {
  async fn deliver(&self, message: &str) -> AppResult<()>;
}

/// Posts to a Slack incoming webhook.
pub struct SlackWebhookSink {
  http: reqwest::Client,
  webhook_url: String,
}

impl SlackWebhookSink {
  pub fn new(webhook_url: String) -> AppResult<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .map_err(|e| AppError::Config(format!("Cannot build notification client: {}", e)))?;
    Ok(Self { http, webhook_url })
  }
}

#[async_trait]
impl NotificationSink for SlackWebhookSink {
  #[instrument(name = "notifier::slack_deliver", skip(self), err(Display))]
  async fn deliver(&self, message: &str) -> AppResult<()> {
    let response = self
      .http
      .post(&self.webhook_url)
      .json(&json!({ "text": message }))
      .send()
      .await
      .map_err(|e| AppError::Notification(format!("Slack webhook unreachable: {}", e)))?;

    if !response.status().is_success() {
      return Err(AppError::Notification(format!(
        "Slack webhook answered {}",
        response.status()
      )));
    }
    Ok(())
  }
}

/// Only logs. Used when no webhook is configured.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
  async fn deliver(&self, message: &str) -> AppResult<()> {
    let notification_id = format!("notification_{}", uuid::Uuid::new_v4());
    info!(%notification_id, "Simulated notification: '{}'", message);
    Ok(())
  }
}

/// Cloneable handle to the notification queue.
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
  sender: mpsc::Sender<OrderPlaced>,
}

impl NotificationDispatcher {
  /// Starts the delivery task on the current tokio runtime.
  pub fn spawn(sink: Arc<dyn NotificationSink>, capacity: usize) -> (Self, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<OrderPlaced>(capacity);
    let worker = tokio::spawn(async move {
      while let Some(event) = receiver.recv().await {
        debug!(order_id = %event.order_id, "Delivering order notification.");
        if let Err(e) = sink.deliver(event.message()).await {
          warn!(order_id = %event.order_id, error = %e, "Order notification failed; not retried.");
        }
      }
      debug!("Notification queue closed.");
    });
    (Self { sender }, worker)
  }

  /// Enqueues without waiting. Returns whether the event was accepted.
  pub fn dispatch(&self, event: OrderPlaced) -> bool {
    match self.sender.try_send(event) {
      Ok(()) => true,
      Err(mpsc::error::TrySendError::Full(event)) => {
        warn!(order_id = %event.order_id, "Notification queue full; dropping notification.");
        false
      }
      Err(mpsc::error::TrySendError::Closed(event)) => {
        warn!(order_id = %event.order_id, "Notification worker gone; dropping notification.");
        false
      }
    }
  }
}

pub fn sink_from_config(slack_webhook_url: Option<&str>) -> AppResult<Arc<dyn NotificationSink>> {
  Ok(match slack_webhook_url {
    Some(url) => Arc::new(SlackWebhookSink::new(url.to_string())?),
    None => Arc::new(LogSink),
  })
}
