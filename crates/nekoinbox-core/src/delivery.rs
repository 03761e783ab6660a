//! Remote delivery of submissions with a fixed retry policy.
//!
//! The HTTP client is created once by the binary and injected here; the
//! retry loop itself ([`run_with_retry`]) knows nothing about HTTP.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::{config::BackendConfig, domain::Submission, messaging::port::SubmissionSink};

const LOG_BODY_MAX: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed pause between two failed attempts. No backoff, no jitter.
    pub retry_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// JSON body accepted by `POST /api/messages`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeliveryPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_name: String,
    pub user_id: String,
    pub content: String,
}

impl From<&Submission> for DeliveryPayload {
    fn from(s: &Submission) -> Self {
        Self {
            kind: s.category.wire_tag().to_string(),
            user_name: s.author_display_name.clone(),
            user_id: s.author_id.clone(),
            content: s.body.clone(),
        }
    }
}

/// Result of a single POST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Any 2xx. `record_id` is filled when the backend echoed the stored record.
    Accepted {
        status: u16,
        record_id: Option<String>,
    },
    Rejected {
        status: u16,
        body: String,
    },
    Transport(String),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Accepted { .. })
    }
}

/// Attempt history of one delivery.
#[derive(Clone, Debug, Default)]
pub struct DeliveryReport {
    pub attempts: Vec<AttemptOutcome>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> bool {
        self.attempts.last().is_some_and(AttemptOutcome::is_success)
    }
}

/// Drive `attempt` until it succeeds or `policy.max_attempts` is reached.
///
/// Sleeps `policy.retry_delay` between failed attempts, never after the last one.
pub async fn run_with_retry<F, Fut>(policy: &DeliveryPolicy, mut attempt: F) -> DeliveryReport
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptOutcome>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut report = DeliveryReport::default();

    for n in 1..=max_attempts {
        let outcome = attempt(n).await;
        log_attempt(n, max_attempts, &outcome);

        let done = outcome.is_success();
        report.attempts.push(outcome);
        if done {
            return report;
        }

        if n < max_attempts {
            tracing::info!(
                attempt = n,
                delay_ms = policy.retry_delay.as_millis() as u64,
                "retrying delivery after delay"
            );
            sleep(policy.retry_delay).await;
        }
    }

    tracing::error!(attempts = max_attempts, "delivery failed after all attempts");
    report
}

fn log_attempt(n: u32, max: u32, outcome: &AttemptOutcome) {
    match outcome {
        AttemptOutcome::Accepted { status, record_id } => tracing::info!(
            attempt = n,
            max_attempts = max,
            status,
            record_id = record_id.as_deref().unwrap_or("-"),
            "delivered submission to backend"
        ),
        AttemptOutcome::Rejected { status, body } => tracing::warn!(
            attempt = n,
            max_attempts = max,
            status,
            body = %body,
            "backend rejected submission"
        ),
        AttemptOutcome::Transport(error) => tracing::warn!(
            attempt = n,
            max_attempts = max,
            error = %error,
            "delivery request failed"
        ),
    }
}

#[derive(Deserialize)]
struct AcceptedEnvelope {
    message: Option<AcceptedRecord>,
}

#[derive(Deserialize)]
struct AcceptedRecord {
    id: Option<String>,
}

fn parse_record_id(body: &str) -> Option<String> {
    serde_json::from_str::<AcceptedEnvelope>(body)
        .ok()?
        .message?
        .id
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= LOG_BODY_MAX {
        return body.to_string();
    }
    let mut out = body.chars().take(LOG_BODY_MAX).collect::<String>();
    out.push_str("...");
    out
}

/// Delivery client for the backend's `POST /api/messages`.
#[derive(Clone, Debug)]
pub struct HttpDeliveryClient {
    http: reqwest::Client,
    url: String,
    token: String,
    policy: DeliveryPolicy,
}

impl HttpDeliveryClient {
    pub fn new(http: reqwest::Client, backend: &BackendConfig, policy: DeliveryPolicy) -> Self {
        Self {
            http,
            url: format!("{}/api/messages", backend.endpoint.trim_end_matches('/')),
            token: backend.token.clone(),
            policy,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send(&self, submission: &Submission) -> DeliveryReport {
        let payload = DeliveryPayload::from(submission);
        run_with_retry(&self.policy, |_| self.post_once(&payload)).await
    }

    async fn post_once(&self, payload: &DeliveryPayload) -> AttemptOutcome {
        let resp = match self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .timeout(self.policy.request_timeout)
            .json(payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return AttemptOutcome::Transport(e.to_string()),
        };

        let status = resp.status();
        // A 2xx counts even if the body cannot be read or parsed.
        let body = resp.text().await.unwrap_or_default();

        if status.is_success() {
            AttemptOutcome::Accepted {
                status: status.as_u16(),
                record_id: parse_record_id(&body),
            }
        } else {
            AttemptOutcome::Rejected {
                status: status.as_u16(),
                body: truncate_body(&body),
            }
        }
    }
}

#[async_trait]
impl SubmissionSink for HttpDeliveryClient {
    async fn deliver(&self, submission: &Submission) -> bool {
        self.send(submission).await.delivered()
    }
}
