//! Best-effort result delivery
//!
//! One HTTP POST per terminal job with `{job_id, kind, status, result}`.
//! No retry and no delivery guarantee; failures are logged and never
//! change job state.

use airelay_domain::value_objects::Job;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout for one callback POST
const CALLBACK_TIMEOUT_SECS: u64 = 10;

/// Sender for outbound job-result callbacks
pub struct CallbackSender {
    http_client: reqwest::Client,
}

impl CallbackSender {
    /// Create a sender with its own HTTP client
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(CALLBACK_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// POST the terminal job state to its callback URL, if any
    pub async fn notify(&self, job: &Job) {
        let Some(url) = job.callback_url.as_deref() else {
            return;
        };
        let body = json!({
            "job_id": job.id,
            "kind": job.kind,
            "status": job.status,
            "result": job.result,
            "error": job.error,
        });
        match self.http_client.post(url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(job_id = %job.id, url, "callback delivered");
            }
            Ok(response) => {
                warn!(
                    job_id = %job.id,
                    url,
                    status = %response.status(),
                    "callback endpoint returned an error status"
                );
            }
            Err(err) => {
                warn!(job_id = %job.id, url, error = %err, "callback delivery failed");
            }
        }
    }
}

impl Default for CallbackSender {
    fn default() -> Self {
        Self::new()
    }
}
