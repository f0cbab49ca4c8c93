//! Operation poller.
//!
//! Converts the backend's asynchronous "accepted" response into a
//! synchronous completion contract: re-check status at a fixed interval
//! until the operation is done, failed, or the attempt budget runs out.

use crate::client::RagStoreClient;
use crate::error::{RagStoreError, RagStoreResult};
use crate::types::Operation;
use ragstore_config::PollingConfig;
use std::time::Duration;
use tracing::{debug, warn};

/// How a pending ingestion operation is polled.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Pause between status checks.
    pub interval: Duration,
    /// Status checks allowed before giving up with
    /// [`RagStoreError::Timeout`].
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3000),
            max_attempts: 100,
        }
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            max_attempts: config.max_attempts,
        }
    }
}

impl RagStoreClient {
    /// Drive a just-submitted operation to its terminal state.
    ///
    /// A terminal failure on the operation payload surfaces as
    /// [`RagStoreError::IngestionFailed`] and stops polling immediately.
    /// A transport error mid-poll propagates as-is; the operation's true
    /// remote status is then unknown to the caller.
    pub(crate) async fn await_operation(&self, operation: Operation) -> RagStoreResult<Operation> {
        let policy = self.poll_policy().clone();
        let mut operation = operation;
        let mut checks = 0u32;

        loop {
            if operation.done {
                if let Some(error) = operation.error {
                    warn!("Operation {} failed: {}", operation.name, error.message);
                    return Err(RagStoreError::IngestionFailed(format!(
                        "{} (code {})",
                        error.message, error.code
                    )));
                }
                debug!("Operation {} done after {} status checks", operation.name, checks);
                return Ok(operation);
            }

            if checks >= policy.max_attempts {
                return Err(RagStoreError::Timeout { attempts: checks });
            }

            tokio::time::sleep(policy.interval).await;
            operation = self.fetch_operation(&operation.name).await?;
            checks += 1;
        }
    }
}
