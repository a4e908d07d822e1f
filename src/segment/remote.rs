//! HTTP client for an external segment service.
//!
//! # Responsibilities
//! - Call `GET <endpoint>?user_id=<id>` and decode `{"segment": "..."}`
//! - Bound every attempt with a timeout
//! - Retry transient failures with backoff
//! - Map failures onto `SegmentError` for the caller to degrade on

use async_trait::async_trait;

use crate::config::SegmentConfig;
use crate::resilience::RetryPolicy;
use crate::segment::resolver::SegmentResolver;
use crate::segment::types::{Segment, SegmentError, SegmentResponse, SegmentResult};

/// Segment resolver backed by a remote HTTP endpoint.
#[derive(Clone)]
pub struct HttpSegmentResolver {
    client: reqwest::Client,
    endpoint: String,
    policy: RetryPolicy,
}

impl HttpSegmentResolver {
    pub fn new(config: &SegmentConfig) -> SegmentResult<Self> {
        let policy = RetryPolicy::from_config(config);
        let client = reqwest::Client::builder()
            .connect_timeout(policy.attempt_timeout)
            .build()
            .map_err(|e| SegmentError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            policy,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, user_id: i64, attempt: u32) -> SegmentResult<Segment> {
        tracing::trace!(user_id, attempt, endpoint = %self.endpoint, "Requesting segment");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("user_id", user_id)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SegmentError::Timeout(self.policy.attempt_timeout.as_millis() as u64)
                } else {
                    SegmentError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SegmentError::Status(status.as_u16()));
        }

        let body: SegmentResponse = response
            .json()
            .await
            .map_err(|e| SegmentError::Decode(e.to_string()))?;

        match body.segment {
            Some(segment) if !segment.as_str().is_empty() => Ok(segment),
            _ => Err(SegmentError::Missing),
        }
    }
}

#[async_trait]
impl SegmentResolver for HttpSegmentResolver {
    async fn resolve(&self, user_id: i64) -> SegmentResult<Segment> {
        self.policy
            .run(
                |attempt| self.fetch(user_id, attempt),
                SegmentError::is_retryable,
                |elapsed| SegmentError::Timeout(elapsed.as_millis() as u64),
            )
            .await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
