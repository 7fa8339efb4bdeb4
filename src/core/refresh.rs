//! Single-flight token refresh
//!
//! When several requests fail with 401 at the same time, only the first one
//! refreshes the access token. The others park a continuation in a FIFO queue
//! and are released, in arrival order, once the refresh settles.
//!
//! ```text
//!   Idle ──enter()──▶ Refreshing { waiters: [] }   (caller becomes Leader)
//!   Refreshing ──enter()──▶ Refreshing { waiters: [.., w] }   (caller Waits)
//!   Refreshing ──settle(result)──▶ Idle   (waiters released front to back)
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use futures::channel::oneshot;

/// Outcome shared with every queued request
pub type RefreshOutcome = Result<String, RefreshFailed>;

/// The refresh attempt was rejected or could not be made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Token refresh failed: {reason}")]
pub struct RefreshFailed {
    pub reason: String,
}

impl RefreshFailed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Default)]
enum RefreshState {
    #[default]
    Idle,
    Refreshing {
        waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
    },
}

/// Role handed to a caller that needs a fresh token
#[derive(Debug)]
pub enum RefreshTicket {
    /// Must perform the refresh and then call [`RefreshCoordinator::settle`]
    Leader,
    /// Must await the leader's outcome
    Wait(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshTicket {
    /// Resolve a `Wait` ticket. A dropped leader counts as a failed refresh.
    pub async fn outcome(self) -> Option<RefreshOutcome> {
        match self {
            RefreshTicket::Leader => None,
            RefreshTicket::Wait(receiver) => Some(
                receiver
                    .await
                    .unwrap_or_else(|_| Err(RefreshFailed::new("refresh abandoned"))),
            ),
        }
    }
}

/// Explicit refresh state machine with a queue of pending continuations
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut RefreshState) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Join the refresh: the first caller leads, the rest wait in order
    pub fn enter(&self) -> RefreshTicket {
        self.with_state(|state| match state {
            RefreshState::Idle => {
                *state = RefreshState::Refreshing {
                    waiters: VecDeque::new(),
                };
                RefreshTicket::Leader
            }
            RefreshState::Refreshing { waiters } => {
                let (tx, rx) = oneshot::channel();
                waiters.push_back(tx);
                tracing::debug!(queued = waiters.len(), "Request queued behind token refresh");
                RefreshTicket::Wait(rx)
            }
        })
    }

    /// Finish the refresh and release every waiter front to back.
    ///
    /// Returns the number of waiters released.
    pub fn settle(&self, outcome: RefreshOutcome) -> usize {
        let waiters = self.with_state(|state| match std::mem::take(state) {
            RefreshState::Idle => VecDeque::new(),
            RefreshState::Refreshing { waiters } => waiters,
        });

        let released = waiters.len();
        for waiter in waiters {
            // A waiter whose request was dropped is simply skipped
            let _ = waiter.send(outcome.clone());
        }
        released
    }

    /// Guard for the leader: settles as failed if dropped before `finish`
    pub fn lead(&self) -> LeaderGuard<'_> {
        LeaderGuard {
            coordinator: self,
            settled: false,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.with_state(|state| matches!(state, RefreshState::Refreshing { .. }))
    }

    /// Number of requests parked behind the current refresh
    pub fn pending(&self) -> usize {
        self.with_state(|state| match state {
            RefreshState::Idle => 0,
            RefreshState::Refreshing { waiters } => waiters.len(),
        })
    }
}

/// Held by the leader while the refresh call is in flight.
///
/// A leader future cancelled mid-refresh must not leave the queue parked, so
/// dropping the guard releases the waiters with a failure.
#[derive(Debug)]
pub struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    pub fn finish(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Token refresh abandoned before completion");
            self.coordinator
                .settle(Err(RefreshFailed::new("refresh abandoned")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_caller_leads() {
        let coordinator = RefreshCoordinator::new();
        assert!(!coordinator.is_refreshing());

        assert!(matches!(coordinator.enter(), RefreshTicket::Leader));
        assert!(coordinator.is_refreshing());
        assert!(matches!(coordinator.enter(), RefreshTicket::Wait(_)));
        assert_eq!(coordinator.pending(), 1);
    }

    #[tokio::test]
    async fn test_waiters_released_in_arrival_order() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.enter();

        let waiters: Vec<_> = (0..3).map(|_| coordinator.enter()).collect();
        assert_eq!(coordinator.settle(Ok("fresh".to_string())), 3);
        assert!(!coordinator.is_refreshing());

        for waiter in waiters {
            assert_eq!(waiter.outcome().await, Some(Ok("fresh".to_string())));
        }
    }

    #[tokio::test]
    async fn test_failure_is_shared() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.enter();
        let waiter = coordinator.enter();

        coordinator.settle(Err(RefreshFailed::new("cookie rejected")));

        assert_eq!(
            waiter.outcome().await,
            Some(Err(RefreshFailed::new("cookie rejected")))
        );
    }

    #[test]
    fn test_settle_resets_for_next_refresh() {
        let coordinator = RefreshCoordinator::new();
        let _ = coordinator.enter();
        coordinator.settle(Ok("a".to_string()));

        // A later 401 starts a brand new refresh
        assert!(matches!(coordinator.enter(), RefreshTicket::Leader));
    }

    #[test]
    fn test_settle_when_idle_is_noop() {
        let coordinator = RefreshCoordinator::new();
        assert_eq!(coordinator.settle(Ok("x".to_string())), 0);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_dropped_waiter_does_not_block_others() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.enter();
        let dropped = coordinator.enter();
        let kept = coordinator.enter();
        drop(dropped);

        assert_eq!(coordinator.settle(Ok("t".to_string())), 2);
        assert_eq!(kept.outcome().await, Some(Ok("t".to_string())));
    }

    #[tokio::test]
    async fn test_dropped_leader_guard_fails_waiters() {
        let coordinator = RefreshCoordinator::new();
        let _ = coordinator.enter();
        let waiter = coordinator.enter();

        drop(coordinator.lead());

        assert!(!coordinator.is_refreshing());
        assert_eq!(
            waiter.outcome().await,
            Some(Err(RefreshFailed::new("refresh abandoned")))
        );
    }

    #[test]
    fn test_finished_guard_settles_once() {
        let coordinator = RefreshCoordinator::new();
        let _ = coordinator.enter();
        let _waiter = coordinator.enter();

        assert_eq!(coordinator.lead().finish(Ok("t".to_string())), 1);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_leader_ticket_has_no_outcome() {
        assert_eq!(RefreshTicket::Leader.outcome().await, None);
    }
}
