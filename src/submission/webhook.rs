//! Best-effort lead notification to an external webhook

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

/// Source tag attached to every webhook payload
pub const LEAD_SOURCE: &str = "fact-find";

/// Denormalized lead summary sent to the webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub submission_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest: String,
    pub submitted_at: DateTime<Utc>,
    pub source: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook answered {0}")]
    Status(StatusCode),
}

/// Receiver of new-lead notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, payload: &LeadPayload) -> Result<(), WebhookError>;
}

/// Posts the payload as JSON to a configured URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LeadNotifier for WebhookNotifier {
    async fn notify(&self, payload: &LeadPayload) -> Result<(), WebhookError> {
        let response = self.http.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(WebhookError::Status(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> LeadPayload {
        LeadPayload {
            submission_id: "17".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "021 555 0100".to_string(),
            interest: "life".to_string(),
            submitted_at: Utc::now(),
            source: LEAD_SOURCE.to_string(),
        }
    }

    #[test]
    fn test_payload_uses_camel_case() {
        let value = serde_json::to_value(payload()).unwrap();
        assert_eq!(value["submissionId"], "17");
        assert_eq!(value["source"], "fact-find");
        assert!(value.get("submittedAt").is_some());
    }

    #[tokio::test]
    async fn test_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/lead"))
            .and(body_partial_json(json!({"submissionId": "17", "name": "Jane Doe"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier =
            WebhookNotifier::new(format!("{}/hooks/lead", server.uri()), Duration::from_secs(5))
                .unwrap();
        notifier.notify(&payload()).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = notifier.notify(&payload()).await.unwrap_err();
        assert!(matches!(err, WebhookError::Status(s) if s == StatusCode::BAD_GATEWAY));
    }
}
