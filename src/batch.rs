//! Bounded, order-preserving fan-out.
//!
//! Each input item becomes one unit of work. At most `concurrency` units are
//! in flight; each gets its own timeout. Results land in a slot vector indexed
//! by input position, so output order never depends on completion order.
//! Unit failures are recorded per slot and never abort siblings.

use crate::config::BatchConfig;
use crate::errors::CoreError;
use futures_util::stream::{self, StreamExt};
use std::future::Future;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome<R> {
    Completed(R),
    Failed(String),
    TimedOut,
}

impl<R> UnitOutcome<R> {
    pub fn is_completed(&self) -> bool {
        matches!(self, UnitOutcome::Completed(_))
    }

    pub fn into_completed(self) -> Option<R> {
        match self {
            UnitOutcome::Completed(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl BatchSummary {
    pub fn from_outcomes<R>(outcomes: &[UnitOutcome<R>]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, o| {
            match o {
                UnitOutcome::Completed(_) => acc.completed += 1,
                UnitOutcome::Failed(_) => acc.failed += 1,
                UnitOutcome::TimedOut => acc.timed_out += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.completed + self.failed + self.timed_out
    }

    /// True when there was work and none of it succeeded.
    pub fn all_failed(&self) -> bool {
        self.total() > 0 && self.completed == 0
    }
}

/// Run `unit` over every item and collect outcomes in input order.
///
/// Returns [`CoreError::Cancelled`] if `cancel` fires before every unit
/// finished; in-flight units are dropped and no partial list is returned.
pub async fn run_ordered<I, R, F, Fut>(
    items: Vec<I>,
    config: &BatchConfig,
    cancel: &CancellationToken,
    unit: F,
) -> Result<Vec<UnitOutcome<R>>, CoreError>
where
    F: Fn(usize, I) -> Fut,
    Fut: Future<Output = Result<R, CoreError>>,
{
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    let total = items.len();
    let mut slots: Vec<Option<UnitOutcome<R>>> = (0..total).map(|_| None).collect();
    let timeout = config.unit_timeout();
    let unit = &unit;

    let mut pending = stream::iter(items.into_iter().enumerate())
        .map(|(idx, item)| async move {
            let outcome = match tokio::time::timeout(timeout, unit(idx, item)).await {
                Ok(Ok(value)) => UnitOutcome::Completed(value),
                Ok(Err(e)) => UnitOutcome::Failed(e.to_string()),
                Err(_) => UnitOutcome::TimedOut,
            };
            (idx, outcome)
        })
        .buffer_unordered(config.effective_concurrency());

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("[Batch] Cancelled with {} units outstanding", slots.iter().filter(|s| s.is_none()).count());
                return Err(CoreError::Cancelled);
            }
            next = pending.next() => match next {
                Some((idx, outcome)) => slots[idx] = Some(outcome),
                None => break,
            }
        }
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| UnitOutcome::Failed("unit never ran".to_string())))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn config(concurrency: usize, timeout_ms: u64) -> BatchConfig {
        BatchConfig::new(concurrency, Duration::from_millis(timeout_ms))
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_follows_input_order_not_completion_order() {
        let items: Vec<u64> = vec![50, 10, 40, 0, 30];
        let outcomes = run_ordered(items, &config(5, 1000), &CancellationToken::new(), |_, ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, CoreError>(ms * 2)
        })
        .await
        .unwrap();

        let values: Vec<u64> = outcomes.into_iter().filter_map(UnitOutcome::into_completed).collect();
        assert_eq!(values, vec![100, 20, 80, 0, 60]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unit_failures_and_timeouts_stay_local() {
        let outcomes = run_ordered(vec![0u32, 1, 2], &config(3, 100), &CancellationToken::new(), |idx, _| async move {
            match idx {
                0 => Err(CoreError::ProviderUnavailable("down".into())),
                1 => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(1)
                }
                _ => Ok(2),
            }
        })
        .await
        .unwrap();

        assert!(matches!(outcomes[0], UnitOutcome::Failed(_)));
        assert_eq!(outcomes[1], UnitOutcome::TimedOut);
        assert_eq!(outcomes[2], UnitOutcome::Completed(2));

        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary, BatchSummary { completed: 1, failed: 1, timed_out: 1 });
        assert!(!summary.all_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_cap_is_respected() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        run_ordered((0..12).collect::<Vec<u32>>(), &config(3, 1000), &CancellationToken::new(), |_, _| {
            let in_flight = &in_flight;
            let peak = &peak;
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, CoreError>(())
            }
        })
        .await
        .unwrap();

        assert_eq!(peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_returns_cancelled_not_partial() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let cfg = config(3, 60_000);

        let (result, _) = tokio::join!(
            run_ordered(vec![10u64, 5000, 5000], &cfg, &token, |_, ms| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok::<_, CoreError>(ms)
            }),
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                trigger.cancel();
            }
        );

        assert!(matches!(result, Err(CoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_already_cancelled_runs_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let calls = AtomicUsize::new(0);
        let result = run_ordered(vec![1, 2], &config(2, 100), &token, |_, v: i32| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, CoreError>(v) }
        })
        .await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_summary_is_not_all_failed() {
        let summary = BatchSummary::from_outcomes::<()>(&[]);
        assert!(!summary.all_failed());
    }
}
