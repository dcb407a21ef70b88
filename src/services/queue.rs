use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::services::notifier::{Notification, Notifier, NotifyError};

/// Fire-and-forget notification queue
///
/// Handlers enqueue without waiting; a single background task drains the
/// channel and hands each notification to the sink. Delivery failures are
/// logged and dropped. Nothing is ordered relative to the HTTP response that
/// caused the notification.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<Notification>,
}

impl NotificationQueue {
    /// Start the delivery task on the current runtime
    ///
    /// The task exits once every queue handle has been dropped and the
    /// channel is drained.
    pub fn start(notifier: Arc<dyn Notifier>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<Notification>(capacity.max(1));

        let handle = tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                if let Err(e) = notifier.notify(&notification).await {
                    tracing::error!(
                        "Error sending notification \"{}\" to {}: {}",
                        notification.subject,
                        notification.to,
                        e
                    );
                }
            }
            tracing::debug!("Notification queue drained");
        });

        (Self { sender }, handle)
    }

    /// Queue a notification without waiting for delivery
    pub fn enqueue(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sender.try_send(notification).map_err(|e| match e {
            mpsc::error::TrySendError::Full(n) => {
                tracing::warn!("Notification queue full, dropping \"{}\" to {}", n.subject, n.to);
                NotifyError::QueueFull
            }
            mpsc::error::TrySendError::Closed(n) => {
                tracing::warn!("Notification queue closed, dropping \"{}\" to {}", n.subject, n.to);
                NotifyError::QueueClosed
            }
        })
    }
}
