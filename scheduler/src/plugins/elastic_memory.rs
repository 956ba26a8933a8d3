//! # Elastic memory plugin
//!
//! Scores nodes by the memory capacity the oracle reports for them, and keeps
//! the oracle's accounting in step with the placements the scheduler commits.

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{MAX_NODE_SCORE, NodeScore, Pod};

use super::Plugin;
use crate::{
    config::Config,
    cycle::{CycleState, Phase},
    errors::PluginError,
    normalize::normalize,
    oracle::{CapacityOracle, OracleClient, ReservationReporter, ReservationSink, reservations_for},
};

pub struct ElasticMemory {
    oracle: Arc<dyn CapacityOracle>,
    reporter: Arc<dyn ReservationSink>,
}

impl ElasticMemory {
    pub const NAME: &'static str = "ElasticMemory";

    pub fn new(oracle: Arc<dyn CapacityOracle>, reporter: Arc<dyn ReservationSink>) -> Self {
        Self { oracle, reporter }
    }

    /// Oracle client and reporter sharing one HTTP transport.
    pub fn from_config(config: &Config) -> Result<Self, PluginError> {
        let client = OracleClient::from_config(config)?;
        Ok(Self::new(
            Arc::new(client.clone()),
            Arc::new(ReservationReporter::new(client)),
        ))
    }
}

#[async_trait]
impl Plugin for ElasticMemory {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn score(
        &self,
        cycle: &CycleState,
        pod: &Pod,
        node_name: &str,
    ) -> Result<i64, PluginError> {
        cycle.ensure(Phase::Scoring)?;

        let scores = cycle
            .score_set(|| self.oracle.fetch_scores(cycle.cancel_token()))
            .await
            .inspect_err(|err| {
                tracing::warn!(pod=%pod.metadata.name, error=%err, "Failed to get scores")
            })?;

        let score = scores
            .get(node_name)
            .copied()
            .ok_or_else(|| PluginError::NodeNotFound(node_name.to_string()))?;

        cycle.advance(Phase::Scoring)?;
        tracing::debug!(pod=%pod.metadata.name, node=%node_name, score, "Scored");
        Ok(score)
    }

    fn normalize_score(
        &self,
        cycle: &CycleState,
        _pod: &Pod,
        scores: &mut [NodeScore],
    ) -> Result<(), PluginError> {
        cycle.ensure(Phase::Normalized)?;
        normalize(scores, MAX_NODE_SCORE)?;
        cycle.advance(Phase::Normalized)
    }

    async fn reserve(
        &self,
        cycle: &CycleState,
        pod: &Pod,
        node_name: &str,
    ) -> Result<(), PluginError> {
        cycle.ensure(Phase::Reserved)?;

        let records = reservations_for(pod, node_name);
        for (i, r) in records.iter().enumerate() {
            tracing::debug!(
                pod=%pod.metadata.name,
                container=i,
                requests=%r.memory_requests,
                limits=%r.memory_limits,
                "Container memory"
            );
        }

        self.reporter
            .report(&records, cycle.cancel_token())
            .await
            .inspect_err(|err| {
                tracing::error!(pod=%pod.metadata.name, node=%node_name, error=%err, "Unable to send pod data")
            })?;

        cycle.advance(Phase::Reserved)?;
        tracing::info!(pod=%pod.metadata.name, node=%node_name, "Reserved");
        Ok(())
    }

    async fn unreserve(&self, cycle: &CycleState, pod: &Pod, node_name: &str) {
        if let Err(err) = cycle.ensure(Phase::Unreserved) {
            tracing::warn!(pod=%pod.metadata.name, error=%err, "Nothing to release");
            return;
        }

        let records = reservations_for(pod, node_name);
        match self.reporter.release(&records, cycle.cancel_token()).await {
            Ok(()) => match cycle.advance(Phase::Unreserved) {
                Ok(()) => tracing::info!(pod=%pod.metadata.name, node=%node_name, "Released"),
                Err(err) => tracing::warn!(pod=%pod.metadata.name, error=%err, "Released twice"),
            },
            Err(err) => {
                tracing::error!(pod=%pod.metadata.name, node=%node_name, error=%err, "Failed to release reservation")
            }
        }
    }
}
