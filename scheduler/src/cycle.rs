//! # Scheduling cycle state
//!
//! One [`CycleState`] lives for one pass of scoring, normalizing and
//! (optionally) reserving a single pod. It carries the phase the pod is in,
//! the oracle's score set once fetched, and the cancellation signal the host
//! hands down for the cycle.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use shared::models::RawScoreSet;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::errors::PluginError;

/// Where a pod stands in its scheduling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scoring,
    Normalized,
    Reserved,
    Unreserved,
}

impl Phase {
    /// Whether the cycle may move from `self` to `to`.
    ///
    /// Score* -> NormalizeScore -> Reserve -> Unreserve, nothing else.
    pub fn allows(self, to: Phase) -> bool {
        matches!(
            (self, to),
            (Phase::Scoring, Phase::Scoring)
                | (Phase::Scoring, Phase::Normalized)
                | (Phase::Normalized, Phase::Reserved)
                | (Phase::Reserved, Phase::Unreserved)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Scoring => write!(f, "Scoring"),
            Phase::Normalized => write!(f, "Normalized"),
            Phase::Reserved => write!(f, "Reserved"),
            Phase::Unreserved => write!(f, "Unreserved"),
        }
    }
}

#[derive(Debug)]
pub struct CycleState {
    pod_id: Uuid,
    phase: Mutex<Phase>,
    scores: OnceCell<Arc<RawScoreSet>>,
    cancel: CancellationToken,
    started: Instant,
}

impl CycleState {
    pub fn new(pod_id: Uuid) -> Self {
        Self::with_cancel(pod_id, CancellationToken::new())
    }

    /// Cycle bound to a cancellation signal owned by the caller.
    pub fn with_cancel(pod_id: Uuid, cancel: CancellationToken) -> Self {
        Self {
            pod_id,
            phase: Mutex::new(Phase::Scoring),
            scores: OnceCell::new(),
            cancel,
            started: Instant::now(),
        }
    }

    /// Time since the cycle started.
    pub fn age(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn pod_id(&self) -> Uuid {
        self.pod_id
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fails unless the cycle could move to `to` right now.
    pub fn ensure(&self, to: Phase) -> Result<(), PluginError> {
        let from = self.phase();
        if from.allows(to) {
            Ok(())
        } else {
            Err(PluginError::InvalidTransition { from, to })
        }
    }

    /// Moves the cycle to `to`. Callers only advance once their callback succeeded.
    pub fn advance(&self, to: Phase) -> Result<(), PluginError> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if !phase.allows(to) {
            return Err(PluginError::InvalidTransition { from: *phase, to });
        }
        *phase = to;
        Ok(())
    }

    /// Score set for this cycle, fetched with `fetch` on first use.
    ///
    /// Concurrent callers wait on the same fetch. A failed fetch is not
    /// remembered, the next caller tries again.
    pub async fn score_set<F, Fut>(&self, fetch: F) -> Result<Arc<RawScoreSet>, PluginError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawScoreSet, PluginError>>,
    {
        self.scores
            .get_or_try_init(move || async move { fetch().await.map(Arc::new) })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_path() {
        let cycle = CycleState::new(Uuid::new_v4());
        assert_eq!(cycle.phase(), Phase::Scoring);
        cycle.advance(Phase::Scoring).unwrap();
        cycle.advance(Phase::Normalized).unwrap();
        cycle.advance(Phase::Reserved).unwrap();
        cycle.advance(Phase::Unreserved).unwrap();
        assert_eq!(cycle.phase(), Phase::Unreserved);
    }

    #[test]
    fn test_no_score_after_normalize() {
        let cycle = CycleState::new(Uuid::new_v4());
        cycle.advance(Phase::Normalized).unwrap();
        assert_eq!(
            cycle.ensure(Phase::Scoring),
            Err(PluginError::InvalidTransition {
                from: Phase::Normalized,
                to: Phase::Scoring
            })
        );
    }

    #[test]
    fn test_reserve_needs_normalize() {
        let cycle = CycleState::new(Uuid::new_v4());
        assert!(cycle.advance(Phase::Reserved).is_err());
        assert!(cycle.advance(Phase::Unreserved).is_err());
        // failed attempts leave the phase alone
        assert_eq!(cycle.phase(), Phase::Scoring);
    }

    #[tokio::test]
    async fn test_score_set_fetched_once() {
        let cycle = CycleState::new(Uuid::new_v4());
        let first = cycle
            .score_set(|| async { Ok(RawScoreSet::from([("n1".to_string(), 1)])) })
            .await
            .unwrap();
        let second = cycle
            .score_set(|| async { Err(PluginError::Transport("unused".into())) })
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_fetch_not_cached() {
        let cycle = CycleState::new(Uuid::new_v4());
        let err = cycle
            .score_set(|| async { Err(PluginError::Transport("refused".into())) })
            .await;
        assert!(err.is_err());

        let ok = cycle
            .score_set(|| async { Ok(RawScoreSet::from([("n1".to_string(), 3)])) })
            .await
            .unwrap();
        assert_eq!(ok.get("n1"), Some(&3));
    }
}
