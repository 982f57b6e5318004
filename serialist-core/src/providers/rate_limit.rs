//! Process-wide request counting for coarse throttling

use crate::providers::error::ProviderError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts generation calls and refuses new ones past an optional limit
///
/// Shared between sessions behind an `Arc`; the count only moves through
/// atomic updates, so no lock is ever held around a network call.
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
    limit: Option<u64>,
}

impl RequestCounter {
    /// Counter without a limit
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Counter that refuses calls once `limit` have been admitted
    pub fn with_limit(limit: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            limit: Some(limit),
        }
    }

    pub fn new(limit: Option<u64>) -> Self {
        Self {
            count: AtomicU64::new(0),
            limit,
        }
    }

    /// Admit one request, or fail with [`ProviderError::Throttled`]
    pub fn try_acquire(&self) -> Result<u64, ProviderError> {
        match self.limit {
            None => Ok(self.count.fetch_add(1, Ordering::Relaxed) + 1),
            Some(limit) => self
                .count
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                    (current < limit).then_some(current + 1)
                })
                .map(|previous| previous + 1)
                .map_err(|_| ProviderError::Throttled { limit }),
        }
    }

    /// Requests admitted so far
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Requests still allowed, if limited
    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_unlimited_counter() {
        let counter = RequestCounter::unlimited();
        for expected in 1..=5 {
            assert_eq!(counter.try_acquire().unwrap(), expected);
        }
        assert_eq!(counter.remaining(), None);
    }

    #[test]
    fn test_limit_is_enforced() {
        let counter = RequestCounter::with_limit(2);
        assert!(counter.try_acquire().is_ok());
        assert!(counter.try_acquire().is_ok());
        assert_eq!(
            counter.try_acquire(),
            Err(ProviderError::Throttled { limit: 2 })
        );
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.remaining(), Some(0));
    }

    #[test]
    fn test_concurrent_acquire_never_exceeds_limit() {
        let counter = Arc::new(RequestCounter::with_limit(50));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    (0..20).filter(|_| counter.try_acquire().is_ok()).count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
        assert_eq!(counter.count(), 50);
    }
}
