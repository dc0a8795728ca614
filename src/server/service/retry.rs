//! Classified retry policy for outbound calls.
//!
//! This module provides [`RetryPolicy`], a value object that re-issues a request while its
//! response is classified as retryable, with exponential backoff between attempts. The
//! policy never turns a response into an error: once it stops retrying, the last response
//! is handed back to the caller to interpret.

use std::{future::Future, time::Duration};

use dioxus_logger::tracing;

use crate::server::model::upstream::{StatusClass, UpstreamResponse};

/// Strategy for handling a response in a retry context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Re-issue the request after backing off
    Retry,
    /// Stop and return the response
    Stop,
}

/// Decides whether a response of the given class should be retried
pub type Classifier = fn(StatusClass) -> RetryStrategy;

/// Retries server-side failures only (5xx, transport failures, timeouts)
pub fn retry_server_errors(class: StatusClass) -> RetryStrategy {
    match class {
        StatusClass::ServerError => RetryStrategy::Retry,
        _ => RetryStrategy::Stop,
    }
}

/// Retries everything except success and client-side failures (4xx)
pub fn retry_non_client_errors(class: StatusClass) -> RetryStrategy {
    match class {
        StatusClass::Success | StatusClass::ClientError => RetryStrategy::Stop,
        _ => RetryStrategy::Retry,
    }
}

/// Policy for re-issuing outbound requests.
///
/// # Retry Behavior
///
/// - **Classifier**: decides per response whether another attempt is worthwhile
/// - **Max attempts**: total attempts including the first one
/// - **Backoff**: exponential starting at `initial_backoff` (1x, 2x, 4x, ...)
/// - **Attempt timeout**: optional; an attempt exceeding it yields a timed-out response,
///   which both built-in classifiers treat as a server-side failure
///
/// # Example
///
/// ```ignore
/// let policy = RetryPolicy::server_errors().with_backoff(Duration::from_millis(250));
///
/// let response = policy
///     .execute("GET /characters/42/", || directory.character(42))
///     .await;
/// let record = response.into_result()?;
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    classifier: Classifier,
    max_attempts: u32,
    initial_backoff: Duration,
    attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub const DEFAULT_SERVER_ERROR_ATTEMPTS: u32 = 3;
    pub const DEFAULT_NON_CLIENT_ERROR_ATTEMPTS: u32 = 5;
    const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;

    pub fn new(classifier: Classifier, max_attempts: u32) -> Self {
        Self {
            classifier,
            max_attempts: max_attempts.max(1),
            initial_backoff: Duration::from_millis(Self::DEFAULT_INITIAL_BACKOFF_MS),
            attempt_timeout: None,
        }
    }

    /// Retry only on server-side failures, 3 attempts
    pub fn server_errors() -> Self {
        Self::new(retry_server_errors, Self::DEFAULT_SERVER_ERROR_ATTEMPTS)
    }

    /// Retry on anything except client-side failures, 5 attempts
    pub fn non_client_errors() -> Self {
        Self::new(retry_non_client_errors, Self::DEFAULT_NON_CLIENT_ERROR_ATTEMPTS)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Issues a request, retrying according to the policy.
    ///
    /// # Arguments
    /// - `description` - Endpoint description for logging, also used for timed-out responses
    /// - `request` - Issues one attempt of the request
    ///
    /// # Returns
    /// The first response the classifier does not retry, or the response of the final
    /// attempt once `max_attempts` is exhausted.
    pub async fn execute<T, F, Fut>(&self, description: &str, request: F) -> UpstreamResponse<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = UpstreamResponse<T>>,
    {
        let mut attempt_count = 0;

        loop {
            attempt_count += 1;

            tracing::debug!(
                "Requesting {} (attempt {}/{})",
                description,
                attempt_count,
                self.max_attempts
            );

            let response = match self.attempt_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, request()).await {
                    Ok(response) => response,
                    Err(_) => UpstreamResponse::timed_out(description),
                },
                None => request().await,
            };

            let class = response.class();

            if (self.classifier)(class) == RetryStrategy::Stop {
                return response;
            }

            if attempt_count >= self.max_attempts {
                tracing::error!(
                    "Max attempts ({}) exceeded for {}: {:?}",
                    self.max_attempts,
                    description,
                    response.status
                );
                return response;
            }

            let backoff = self.backoff(attempt_count);

            tracing::warn!(
                "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                description,
                attempt_count,
                self.max_attempts,
                backoff,
                response.status
            );

            if !backoff.is_zero() {
                tokio::time::sleep(backoff).await;
            }
        }
    }

    /// Delay after the given failed attempt, doubling per attempt and saturating
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));

        self.initial_backoff.saturating_mul(factor)
    }
}
