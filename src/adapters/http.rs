use crate::domain::model::{DeliveryReceipt, RsvpPayload};
use crate::domain::ports::{ConfigProvider, RsvpTransport};
use crate::utils::error::{Result, RsvpError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// 瀏覽器以字串 body 呼叫 fetch 時的預設型別，Apps Script 不需要 preflight
const BODY_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// 以 HTTP POST 把 RSVP 送到試算表 webhook
pub struct WebhookTransport {
    client: Client,
    endpoint: String,
    strict_status: bool,
}

impl WebhookTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::build(endpoint.into(), DEFAULT_REQUEST_TIMEOUT, false)
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::build(
            config.webhook_endpoint().to_string(),
            config.request_timeout(),
            config.strict_status(),
        )
    }

    fn build(endpoint: String, timeout: Duration, strict_status: bool) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            strict_status,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RsvpTransport for WebhookTransport {
    async fn deliver(&self, payload: &RsvpPayload) -> Result<DeliveryReceipt> {
        let body = serde_json::to_string(payload)?;

        tracing::debug!("Posting RSVP to webhook: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, BODY_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Webhook response status: {}", status);

        if !status.is_success() {
            if self.strict_status {
                return Err(RsvpError::WebhookStatusError {
                    status: status.as_u16(),
                });
            }
            // 回應內容不解析，只要有回應就算送達
            tracing::warn!("Webhook answered {}, treating it as delivered", status);
        }

        Ok(DeliveryReceipt {
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn payload() -> RsvpPayload {
        RsvpPayload {
            name: "Neha Kapoor".to_string(),
            phone: "9876543210".to_string(),
            attending: "yes".to_string(),
            guests: "2".to_string(),
            message: String::new(),
            submission_time_ist: "01/03/2026, 18:00:00".to_string(),
            attendance_days: "8th March".to_string(),
            arrival_time: "16:00".to_string(),
            attendance_info: "8th March - Arrival: 16:00 IST".to_string(),
            timestamp: "2026-03-01T12:30:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_json_text_body() {
        let server = MockServer::start();
        let webhook = server.mock(|when, then| {
            when.method(POST)
                .path("/exec")
                .header("content-type", BODY_CONTENT_TYPE)
                .body_contains("\"name\":\"Neha Kapoor\"")
                .body_contains("\"submissionTimeIST\":\"01/03/2026, 18:00:00\"")
                .body_contains("\"guests\":\"2\"");
            then.status(200).body("ok");
        });

        let transport = WebhookTransport::new(server.url("/exec")).unwrap();
        let receipt = transport.deliver(&payload()).await.unwrap();

        webhook.assert();
        assert_eq!(receipt.status, 200);
    }

    #[tokio::test]
    async fn test_error_status_is_delivered_by_default() {
        let server = MockServer::start();
        let webhook = server.mock(|when, then| {
            when.method(POST).path("/exec");
            then.status(500);
        });

        let transport = WebhookTransport::new(server.url("/exec")).unwrap();
        let receipt = transport.deliver(&payload()).await.unwrap();

        webhook.assert();
        assert_eq!(receipt.status, 500);
    }

    #[tokio::test]
    async fn test_strict_status_rejects_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/exec");
            then.status(503);
        });

        let transport =
            WebhookTransport::build(server.url("/exec"), DEFAULT_REQUEST_TIMEOUT, true).unwrap();
        let err = transport.deliver(&payload()).await.unwrap_err();

        assert!(matches!(err, RsvpError::WebhookStatusError { status: 503 }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_connection_failure_is_an_error() {
        // nothing listens on port 1
        let transport = WebhookTransport::new("http://127.0.0.1:1/exec").unwrap();
        let err = transport.deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, RsvpError::ApiError(_)));
    }
}
