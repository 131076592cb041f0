use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;

pub const INFERENCE_BASE_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Failure of a single inference call
pub enum AttemptError {
    /// Worth trying again: the model is loading or we are rate limited
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

impl AttemptError {
    /// Classify a non-2xx inference response
    pub fn from_status(status: StatusCode, error: anyhow::Error) -> Self {
        if is_retryable(status) {
            AttemptError::Retryable(error)
        } else {
            AttemptError::Fatal(error)
        }
    }
}

/// 503 means the model is still loading on the inference side
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::TOO_MANY_REQUESTS
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2_u32.pow(attempt)
    }
}

/// Run `call` until it succeeds, fails fatally, or runs out of attempts
pub async fn with_retries<T, F, Fut>(policy: RetryPolicy, what: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Retryable(e)) => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    return Err(e.context(format!("Gave up after {} attempts", attempt)));
                }

                let backoff = policy.backoff(attempt);
                tracing::debug!(?backoff, "{} busy, retrying: {}", what, e);
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
