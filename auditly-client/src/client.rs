use crate::error::{AuditError, Result};
use crate::report::AuditReport;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Wire body for `POST /api/audit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRequest {
    pub url: String,
}

/// Client for the remote audit service.
///
/// One call to [`AuditClient::submit_audit`] issues exactly one request.
/// There is no retry and no request timeout: an audit may legitimately take
/// as long as the service needs to load and screenshot the page.
#[derive(Debug, Clone)]
pub struct AuditClient {
    client: Client,
    endpoint: Url,
}

impl AuditClient {
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Auditly/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| AuditError::ClientBuild(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submit `url` for auditing and return the decoded report untouched.
    ///
    /// The URL is sent as given; callers validate it first.
    pub async fn submit_audit(&self, url: &str) -> Result<AuditReport> {
        info!("Submitting audit for {} to {}", url, self.endpoint);
        let started = Instant::now();

        let body = AuditRequest {
            url: url.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!("Audit service answered {} after {:?}", status, started.elapsed());

        if !status.is_success() {
            warn!("Audit for {} failed with status {}", url, status);
            return Err(AuditError::Status(status.as_u16()));
        }

        let report = response.json::<AuditReport>().await?;
        Ok(report)
    }
}
