//! Search orchestrator
//!
//! REQUEST → CALL (retry on rate limit) → COLLECT TEXT → EXTRACT

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::anthropic::{MessagesRequest, MessagesResponse};
use crate::config::AgentConfig;
use crate::extract::extract_jobs;
use crate::models::{SearchDebug, SearchResult};
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::Result;

/// Transport to the hosted agent
#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse>;
}

/// Fixed backoff table. One retry per entry, so `delays.len() + 1` attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delays: [2_000, 4_000, 8_000, 16_000]
                .into_iter()
                .map(Duration::from_millis)
                .collect(),
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }
}

/// Builds the agent request, retries rate-limited calls and parses the result.
pub struct SearchOrchestrator {
    transport: Arc<dyn AgentTransport>,
    config: AgentConfig,
    retry: RetryPolicy,
}

impl SearchOrchestrator {
    pub fn new(transport: Arc<dyn AgentTransport>, config: AgentConfig) -> Self {
        Self {
            transport,
            config,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build_request(&self, today: NaiveDate) -> MessagesRequest {
        MessagesRequest::search_turn(&self.config, SYSTEM_PROMPT, build_user_prompt(today))
    }

    /// Call the agent, sleeping through the backoff table while the provider
    /// reports a rate limit. Any other failure is returned at once; after the
    /// table runs out the last failure is returned.
    pub async fn call_with_retry(&self, today: NaiveDate) -> Result<MessagesResponse> {
        let request = self.build_request(today);
        let mut attempt = 0;

        loop {
            match self.transport.create_message(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_rate_limited() && attempt < self.retry.delays.len() => {
                    let delay = self.retry.delays[attempt];
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.retry.delays.len(),
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run one search for `today`. Unparseable agent text is not an error:
    /// the result is empty and `debug` says why.
    pub async fn search(&self, today: NaiveDate) -> Result<SearchResult> {
        let search_id = Uuid::new_v4();
        info!(search_id = %search_id, date = %today, "Starting job search");

        let response = self.call_with_retry(today).await.map_err(|e| {
            error!(search_id = %search_id, "Job search failed: {}", e);
            e
        })?;

        let text = response.collect_text();
        let jobs = extract_jobs(&text);
        let debug = SearchDebug::new(response.stop_reason.clone(), response.block_types(), &text);
        let text_length = debug.text_length;
        let result = SearchResult {
            debug: Some(debug),
            jobs,
        };

        if result.jobs.is_empty() {
            warn!(
                search_id = %search_id,
                text_length,
                stop_reason = ?response.stop_reason,
                "No job listings parsed from agent response"
            );
        } else {
            info!(
                search_id = %search_id,
                jobs = result.jobs.len(),
                new = result.new_count(),
                "Job search complete"
            );
        }

        Ok(result)
    }
}
