use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::{NotificationError, NotificationGateway};

/// Posts `{"text": message}` to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookGateway {
    client: Client,
}

impl WebhookGateway {
    pub fn new(timeout: Duration) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl NotificationGateway for WebhookGateway {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError> {
        let url = reqwest::Url::parse(destination)
            .map_err(|_| NotificationError::InvalidDestination(destination.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(&json!({ "text": message }))
            .send()
            .await
            .map_err(|e| NotificationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn posts_text_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hooks/balance")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "text": "low funds" })))
            .with_status(200)
            .create_async()
            .await;

        let gateway = WebhookGateway::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/hooks/balance", server.url());
        assert!(gateway.send(&url, "low funds").await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .create_async()
            .await;

        let gateway = WebhookGateway::new(Duration::from_secs(5)).unwrap();
        let result = gateway.send(&server.url(), "x").await;
        assert!(matches!(result, Err(NotificationError::Status(503))));
    }

    #[tokio::test]
    async fn rejects_non_url_destination() {
        let gateway = WebhookGateway::new(Duration::from_secs(5)).unwrap();
        let result = gateway.send("not a url", "x").await;
        assert!(matches!(result, Err(NotificationError::InvalidDestination(_))));
    }
}
