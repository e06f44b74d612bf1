//! Bounded, one-at-a-time oracle calls
//!
//! `LlmProvider` is synchronous. Async callers run it on the blocking pool and bound
//! it with their own timeout; an expired call is reported as [`LlmError::Timeout`].
//!
//! A blocking call cannot be aborted, so a timed-out call keeps running until the
//! provider returns. [`SerialOracle`] holds its lane for exactly that long: the next
//! call through any clone of the same oracle waits for the straggler to finish before
//! it starts, and the next call's time budget starts only once it holds the lane.

use crate::LlmError;
use lector_domain::traits::{CompletionRequest, LlmProvider};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::debug;

/// A provider shared by several stages, admitting one call at a time
pub struct SerialOracle<L> {
    provider: Arc<L>,
    lane: Arc<Mutex<()>>,
}

impl<L> Clone for SerialOracle<L> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            lane: Arc::clone(&self.lane),
        }
    }
}

impl<L> SerialOracle<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Wrap a provider
    pub fn new(provider: L) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Wrap an already shared provider. Clones of the result share one lane;
    /// separate `from_shared` calls do not.
    pub fn from_shared(provider: Arc<L>) -> Self {
        Self {
            provider,
            lane: Arc::new(Mutex::new(())),
        }
    }

    /// Run one completion on the blocking pool, giving up after `limit`.
    ///
    /// Waits first for any earlier call on this lane, including one whose caller
    /// already gave up on it.
    pub async fn complete(
        &self,
        request: CompletionRequest,
        limit: Duration,
    ) -> Result<String, LlmError> {
        let permit = match Arc::clone(&self.lane).try_lock_owned() {
            Ok(permit) => permit,
            Err(_) => {
                debug!("Waiting for an earlier oracle call to finish");
                Arc::clone(&self.lane).lock_owned().await
            }
        };

        let llm = Arc::clone(&self.provider);
        let task = tokio::task::spawn_blocking(move || {
            // Released when the provider returns, not when the caller stops waiting
            let _permit = permit;
            llm.complete(&request)
                .map_err(|e| LlmError::Provider(e.to_string()))
        });

        match timeout(limit, task).await {
            Err(_) => Err(LlmError::Timeout(limit)),
            Ok(Err(join_error)) => Err(LlmError::Other(format!("Task join error: {}", join_error))),
            Ok(Ok(result)) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sleeps through every call and records the highest number of overlapping calls
    #[derive(Default)]
    struct OverlapCounter {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl LlmProvider for OverlapCounter {
        type Error = LlmError;

        fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(100));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("{}".to_string())
        }
    }

    #[tokio::test]
    async fn test_completes_within_limit() {
        let oracle = SerialOracle::new(MockProvider::new("done"));
        let result = oracle
            .complete(CompletionRequest::new("i", "p"), Duration::from_secs(5))
            .await;
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let oracle =
            SerialOracle::new(MockProvider::new("late").with_latency(Duration::from_millis(300)));
        let result = oracle
            .complete(CompletionRequest::new("i", "p"), Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(LlmError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_provider_error_is_wrapped() {
        let mut mock = MockProvider::default();
        mock.add_error("p");
        let oracle = SerialOracle::new(mock);

        let result = oracle
            .complete(CompletionRequest::new("i", "p"), Duration::from_secs(5))
            .await;
        assert!(matches!(result, Err(LlmError::Provider(_))));
    }

    #[tokio::test]
    async fn test_timed_out_calls_never_overlap_later_calls() {
        let provider = Arc::new(OverlapCounter::default());
        let oracle = SerialOracle::from_shared(Arc::clone(&provider));

        for _ in 0..3 {
            let result = oracle
                .complete(CompletionRequest::new("i", "p"), Duration::from_millis(20))
                .await;
            assert!(matches!(result, Err(LlmError::Timeout(_))));
        }

        assert_eq!(provider.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clones_share_the_lane() {
        let provider = Arc::new(OverlapCounter::default());
        let first = SerialOracle::from_shared(Arc::clone(&provider));
        let second = first.clone();

        let (a, b) = tokio::join!(
            first.complete(CompletionRequest::new("i", "a"), Duration::from_secs(5)),
            second.complete(CompletionRequest::new("i", "b"), Duration::from_secs(5)),
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(provider.peak.load(Ordering::SeqCst), 1);
    }
}
