//! # Extender State
//!
//! The active plugin and the scheduling cycles currently in flight, keyed by
//! pod id. A cycle lives from the first callback for a pod until it is ended
//! explicitly, fails, its reservation is undone, or it outlives the cycle
//! lifetime. A placed pod is never unreserved, so expiry is what forgets it.

use std::{sync::Arc, time::Duration};

use actix_web::web::Data;
use dashmap::DashMap;
use tokio::time;
use uuid::Uuid;

use crate::{
    cycle::{CycleState, Phase},
    plugins::Plugin,
};

/// Thread safe wrapper
pub type State = Data<ExtenderState>;

/// Lifetime of a cycle when none is configured.
pub const DEFAULT_CYCLE_TTL: Duration = Duration::from_secs(30);

pub struct ExtenderState {
    pub plugin: Arc<dyn Plugin>,
    cycles: DashMap<Uuid, Arc<CycleState>>,
    ttl: Duration,
}

impl ExtenderState {
    pub fn new(plugin: Arc<dyn Plugin>) -> State {
        Self::with_ttl(plugin, DEFAULT_CYCLE_TTL)
    }

    pub fn with_ttl(plugin: Arc<dyn Plugin>, ttl: Duration) -> State {
        Data::new(Self {
            plugin,
            cycles: DashMap::new(),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the pod's running cycle, starting one if there is none.
    ///
    /// An expired cycle is replaced. So is one that already finished scoring
    /// when `next` is a new Score: the host moved on to another attempt. A
    /// `Reserved` cycle is kept, its claim must be released or expire first.
    pub fn cycle(&self, pod_id: Uuid, next: Phase) -> Arc<CycleState> {
        let mut entry = self
            .cycles
            .entry(pod_id)
            .or_insert_with(|| new_cycle(pod_id));

        let restart = next == Phase::Scoring
            && matches!(entry.phase(), Phase::Normalized | Phase::Unreserved);
        if restart || entry.age() >= self.ttl {
            tracing::debug!(%pod_id, phase=%entry.phase(), "Replacing stale cycle");
            entry.cancel();
            *entry.value_mut() = new_cycle(pod_id);
        }
        entry.value().clone()
    }

    pub fn get_cycle(&self, pod_id: &Uuid) -> Option<Arc<CycleState>> {
        self.cycles.get(pod_id).map(|c| c.value().clone())
    }

    /// Cancels and forgets the pod's cycle. Returns whether one was running.
    pub fn end_cycle(&self, pod_id: &Uuid) -> bool {
        match self.cycles.remove(pod_id) {
            Some((_, cycle)) => {
                cycle.cancel();
                tracing::debug!(%pod_id, "Ended cycle");
                true
            }
            None => false,
        }
    }

    /// Ends `cycle` if it is still the pod's current one.
    pub fn discard(&self, cycle: &Arc<CycleState>) -> bool {
        let pod_id = cycle.pod_id();
        cycle.cancel();
        let removed = self
            .cycles
            .remove_if(&pod_id, |_, current| Arc::ptr_eq(current, cycle))
            .is_some();
        if removed {
            tracing::debug!(%pod_id, "Discarded cycle");
        }
        removed
    }

    /// Drops every cycle older than the lifetime, returns how many went.
    pub fn evict_expired(&self) -> usize {
        let mut evicted = 0;
        self.cycles.retain(|pod_id, cycle| {
            if cycle.age() < self.ttl {
                return true;
            }
            tracing::debug!(%pod_id, phase=%cycle.phase(), "Evicting expired cycle");
            cycle.cancel();
            evicted += 1;
            false
        });
        evicted
    }

    pub fn active_cycles(&self) -> usize {
        self.cycles.len()
    }
}

fn new_cycle(pod_id: Uuid) -> Arc<CycleState> {
    tracing::debug!(%pod_id, "Starting cycle");
    Arc::new(CycleState::new(pod_id))
}

/// Periodically evicts expired cycles.
pub async fn sweep(state: State, every: Duration) {
    tracing::debug!(every=?every, "Starting cycle sweeper");
    let mut interval = time::interval(every);
    loop {
        interval.tick().await;
        let evicted = state.evict_expired();
        if evicted > 0 {
            tracing::info!(evicted, active = state.active_cycles(), "Evicted expired cycles");
        }
    }
}
