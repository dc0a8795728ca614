//! Concurrent execution of independent lookups with order-preserving results.

use std::{future::Future, time::Duration};

use dioxus_logger::tracing;
use futures::stream::{self, StreamExt};

use crate::server::error::lookup::LookupError;

const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// Runs a batch of independent operations concurrently.
///
/// Results come back in input order no matter which operation finishes first, and each
/// slot reflects only its own outcome: one failing or timed out operation never aborts
/// its siblings.
#[derive(Clone, Copy, Debug)]
pub struct BatchExecutor {
    concurrency: usize,
    deadline: Option<Duration>,
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_REQUESTS)
    }
}

impl BatchExecutor {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            deadline: None,
        }
    }

    /// Abort any single operation that runs longer than `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Execute `operation` for every input.
    ///
    /// # Arguments
    /// - `description` - Name of the batch for logging
    /// - `inputs` - Request descriptors, one per operation
    /// - `operation` - Issues the request for one descriptor
    ///
    /// # Returns
    /// One result per input, in input order. Operations exceeding the deadline yield
    /// `LookupError::Timeout`.
    pub async fn execute<I, T, F, Fut>(
        &self,
        description: &str,
        inputs: Vec<I>,
        operation: F,
    ) -> Vec<Result<T, LookupError>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
    {
        if inputs.is_empty() {
            return Vec::new();
        }

        let total = inputs.len();
        tracing::debug!(
            "Executing batch {} with {} operations ({} concurrent)",
            description,
            total,
            self.concurrency
        );

        let operation = &operation;
        let deadline = self.deadline;

        let mut completed: Vec<(usize, Result<T, LookupError>)> =
            stream::iter(inputs.into_iter().enumerate())
                .map(|(index, input)| async move {
                    let result = match deadline {
                        Some(deadline) => {
                            match tokio::time::timeout(deadline, operation(input)).await {
                                Ok(result) => result,
                                Err(_) => {
                                    tracing::warn!(
                                        "Operation {} of batch {} exceeded deadline of {:?}",
                                        index,
                                        description,
                                        deadline
                                    );
                                    Err(LookupError::Timeout(format!("{} #{}", description, index)))
                                }
                            }
                        }
                        None => operation(input).await,
                    };

                    (index, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        completed.sort_by_key(|(index, _)| *index);

        completed.into_iter().map(|(_, result)| result).collect()
    }
}
