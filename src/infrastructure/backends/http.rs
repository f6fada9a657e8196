#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::StreamExt;
use futures::stream::TryStreamExt;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::ByteStream;
use crate::domain::models::ChatRequest;
use crate::domain::models::FeedbackRequest;

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.to_string();
    return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    detail: Option<String>,
}

/// The documentation assistant's HTTP API.
pub struct HttpBackend {
    url: String,
    timeout: String,
}

impl Default for HttpBackend {
    fn default() -> HttpBackend {
        return HttpBackend {
            url: Config::get(ConfigKey::BackendURL),
            timeout: Config::get(ConfigKey::BackendHealthCheckTimeout),
        };
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Backend URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(format!("{url}/api/v1/health/db-check", url = self.url))
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        if res.is_err() {
            tracing::error!(error = ?res.unwrap_err(), "Backend is not reachable");
            bail!("Backend is not reachable");
        }

        let res = res.unwrap();
        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Backend health check failed");
            bail!("Backend health check failed");
        }

        let health = res.json::<HealthResponse>().await?;
        if health.status != "ok" {
            let detail = health.detail.unwrap_or_default();
            tracing::error!(
                status = %health.status,
                detail = %detail,
                "Backend reported unhealthy"
            );
            bail!(format!("Backend reported unhealthy: {detail}"));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn stream_chat(&self, request: ChatRequest) -> Result<ByteStream> {
        let res = reqwest::Client::new()
            .post(format!("{url}/api/v1/chat/stream", url = self.url))
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                "Failed to make chat request to backend"
            );
            bail!(format!(
                "Network response was not ok: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ));
        }

        return Ok(res.bytes_stream().map_err(convert_err).boxed());
    }

    #[allow(clippy::implicit_return)]
    async fn submit_feedback(&self, feedback: FeedbackRequest) -> Result<()> {
        let res = reqwest::Client::new()
            .post(format!("{url}/api/v1/feedback/", url = self.url))
            .json(&feedback)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Feedback submission failed"
            );
            bail!(format!(
                "Feedback submission failed: {} {} - {body}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ));
        }

        return Ok(());
    }
}
