// src/jobsupervisor/monit/http_client.rs

//! [`MonitClient`] over monit's built-in HTTP interface, using [`reqwest`].

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::jobsupervisor::monit::client::{MonitClient, MonitError, ServiceAction};
use crate::jobsupervisor::monit::status::{parse_status, MonitStatus};
use crate::types::BoxFuture;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the local monit daemon (usually `http://127.0.0.1:2822`).
#[derive(Debug, Clone)]
pub struct HttpMonitClient {
    client: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl HttpMonitClient {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, MonitError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user: user.into(),
            password: password.into(),
        })
    }

    /// Return the response unchanged on success, or [`MonitError::Api`]
    /// carrying status and body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MonitError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MonitError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl MonitClient for HttpMonitClient {
    fn service_action<'a>(
        &'a self,
        service: &'a str,
        action: ServiceAction,
    ) -> BoxFuture<'a, Result<(), MonitError>> {
        Box::pin(async move {
            debug!(service, action = action.as_str(), "sending monit service action");

            let response = self
                .client
                .post(format!("{}/{}", self.base_url, service))
                .basic_auth(&self.user, Some(&self.password))
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(format!("action={}", action.as_str()))
                .send()
                .await?;

            Self::ensure_success(response).await?;
            Ok(())
        })
    }

    fn status(&self) -> BoxFuture<'_, Result<MonitStatus, MonitError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(format!("{}/_status2?format=xml", self.base_url))
                .basic_auth(&self.user, Some(&self.password))
                .send()
                .await?;

            let body = Self::ensure_success(response).await?.text().await?;
            parse_status(&body)
        })
    }
}
