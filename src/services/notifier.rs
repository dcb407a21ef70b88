use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Notification queue is full")]
    QueueFull,

    #[error("Notification queue is closed")]
    QueueClosed,
}

/// An email to deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound notification sink
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Mail relay client
///
/// Posts each notification as JSON to an HTTP mail relay (any transactional
/// mail API that accepts `{from, to, subject, html}`).
pub struct HttpNotifier {
    endpoint: String,
    api_key: Option<String>,
    from: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpNotifier {
    /// Create a new relay client
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        from_name: &str,
        from_address: &str,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            from: format!("\"{}\" <{}>", from_name, from_address),
            client,
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = RelayPayload {
            from: &self.from,
            to: &notification.to,
            subject: &notification.subject,
            html: &notification.html,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Notification sent to {}: {}", notification.to, notification.subject);
        Ok(())
    }
}

/// Sink used when email delivery is not configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            "Email notifications not configured - skipping \"{}\" to {}",
            notification.subject,
            notification.to
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> Notification {
        Notification {
            to: "ana@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_http_notifier_posts_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .match_header("authorization", "Bearer secret")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "from": "\"Choice Love\" <noreply@example.com>",
                "to": "ana@example.com",
                "subject": "Hello",
                "html": "<p>Hi</p>",
            })))
            .with_status(202)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(
            format!("{}/send", server.url()),
            Some("secret".to_string()),
            "Choice Love",
            "noreply@example.com",
            Duration::from_secs(5),
        )
        .unwrap();

        notifier.notify(&notification()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_notifier_reports_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/send")
            .with_status(503)
            .with_body("relay down")
            .create_async()
            .await;

        let notifier = HttpNotifier::new(
            format!("{}/send", server.url()),
            None,
            "Choice Love",
            "noreply@example.com",
            Duration::from_secs(5),
        )
        .unwrap();

        match notifier.notify(&notification()).await {
            Err(NotifyError::Rejected { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "relay down");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        assert!(LogNotifier.notify(&notification()).await.is_ok());
    }
}
