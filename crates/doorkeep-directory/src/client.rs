//! Thin REST client for the remote directory.
//!
//! Three calls, each a single HTTP round trip bounded by the configured
//! request timeout. No retries here: the access loop's own polling cadence
//! is the retry policy, and enrollment failures surface to the HTTP caller.

use crate::models::{AccessLogEntry, UserRecord};
use doorkeep_core::{CardId, Error, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the directory's REST contract.
///
/// Cheap to clone; the inner `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct EnrollRequest<'a> {
    card_id: &'a CardId,
}

impl DirectoryClient {
    /// Create a client against `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns `Error::Config` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(DirectoryClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the full authorized-user list.
    ///
    /// Called on every verification attempt: no local cache, freshness over
    /// latency.
    ///
    /// # Errors
    /// Any transport failure, timeout, non-2xx status, or undecodable body
    /// is `Error::DirectoryUnavailable`.
    pub async fn fetch_users(&self) -> Result<Vec<UserRecord>> {
        let url = format!("{}/users", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::DirectoryUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::DirectoryUnavailable(format!(
                "GET /users returned {status}"
            )));
        }

        let users: Vec<UserRecord> = response
            .json()
            .await
            .map_err(|e| Error::DirectoryUnavailable(format!("malformed user list: {e}")))?;

        debug!(count = users.len(), "fetched user list");
        Ok(users)
    }

    /// Post an access-log entry, best-effort.
    ///
    /// Failures are logged and swallowed; telemetry never blocks or fails
    /// the decision path.
    pub async fn log_access(&self, entry: &AccessLogEntry) {
        let url = format!("{}/access/log", self.base_url);
        match self.http.post(&url).json(entry).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(result = entry.result, "access log posted");
            }
            Ok(response) => {
                warn!(status = %response.status(), "access log rejected");
            }
            Err(e) => {
                warn!(error = %e, "access log post failed");
            }
        }
    }

    /// Register a freshly captured card with the directory.
    ///
    /// # Errors
    /// Success is strictly HTTP 200; any other status is
    /// `Error::EnrollmentRejected`, and transport failures are
    /// `Error::DirectoryUnavailable`.
    pub async fn enroll(&self, card: &CardId) -> Result<()> {
        let url = format!("{}/users/enroll", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&EnrollRequest { card_id: card })
            .send()
            .await
            .map_err(|e| Error::DirectoryUnavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            debug!(card = %card, "card enrolled");
            Ok(())
        } else {
            Err(Error::EnrollmentRejected {
                status: status.as_u16(),
            })
        }
    }
}
