use async_trait::async_trait;
use rand::Rng;
use shared::models::{MAX_NODE_SCORE, NodeScore, Pod};

use super::Plugin;
use crate::{
    cycle::{CycleState, Phase},
    errors::PluginError,
};

/// Scores every node uniformly at random in `[1, MAX_NODE_SCORE]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomScore;

impl RandomScore {
    pub const NAME: &'static str = "RandomPod";
}

#[async_trait]
impl Plugin for RandomScore {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn score(
        &self,
        cycle: &CycleState,
        _pod: &Pod,
        _node_name: &str,
    ) -> Result<i64, PluginError> {
        cycle.advance(Phase::Scoring)?;
        Ok(rand::rng().random_range(1..=MAX_NODE_SCORE))
    }

    /// Scores are already in range.
    fn normalize_score(
        &self,
        cycle: &CycleState,
        _pod: &Pod,
        _scores: &mut [NodeScore],
    ) -> Result<(), PluginError> {
        cycle.advance(Phase::Normalized)
    }
}
