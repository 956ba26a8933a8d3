//! # Scoring plugins
//!
//! The callbacks a host orchestrator drives for every pod it schedules:
//! `score` once per candidate node, `normalize_score` once over all of them,
//! then `reserve` when a placement is committed and `unreserve` if it is
//! undone. Strategies are mutually exclusive, one is active per process.

pub mod elastic_memory;
pub mod random;

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use shared::models::{NodeScore, Pod};

use crate::{
    config::Config,
    cycle::{CycleState, Phase},
    errors::PluginError,
};

pub use elastic_memory::ElasticMemory;
pub use random::RandomScore;

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw score of `node_name` for `pod`.
    async fn score(
        &self,
        cycle: &CycleState,
        pod: &Pod,
        node_name: &str,
    ) -> Result<i64, PluginError>;

    /// Rescale every candidate score of the cycle in place.
    fn normalize_score(
        &self,
        cycle: &CycleState,
        pod: &Pod,
        scores: &mut [NodeScore],
    ) -> Result<(), PluginError>;

    /// Placement of `pod` on `node_name` was committed.
    async fn reserve(
        &self,
        cycle: &CycleState,
        _pod: &Pod,
        _node_name: &str,
    ) -> Result<(), PluginError> {
        cycle.advance(Phase::Reserved)
    }

    /// A committed placement was undone upstream.
    async fn unreserve(&self, cycle: &CycleState, pod: &Pod, _node_name: &str) {
        if let Err(err) = cycle.advance(Phase::Unreserved) {
            tracing::warn!(pod=%pod.metadata.name, error=%err, "Nothing to unreserve");
        }
    }
}

/// Which plugin the extender runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ElasticMemory,
    Random,
}

impl Strategy {
    pub fn build(&self, config: &Config) -> Result<Arc<dyn Plugin>, PluginError> {
        let plugin: Arc<dyn Plugin> = match self {
            Strategy::ElasticMemory => Arc::new(ElasticMemory::from_config(config)?),
            Strategy::Random => Arc::new(RandomScore),
        };
        Ok(plugin)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ElasticMemory => write!(f, "elastic-memory"),
            Strategy::Random => write!(f, "random"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elastic-memory" | "elasticmemory" => Ok(Strategy::ElasticMemory),
            "random" => Ok(Strategy::Random),
            other => Err(format!("unknown scheduling strategy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!("elastic-memory".parse::<Strategy>(), Ok(Strategy::ElasticMemory));
        assert_eq!("ElasticMemory".parse::<Strategy>(), Ok(Strategy::ElasticMemory));
        assert_eq!(" random ".parse::<Strategy>(), Ok(Strategy::Random));
        assert!("binpack".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_build_named_plugins() {
        let config = Config::default();
        assert_eq!(
            Strategy::ElasticMemory.build(&config).unwrap().name(),
            ElasticMemory::NAME
        );
        assert_eq!(Strategy::Random.build(&config).unwrap().name(), RandomScore::NAME);
    }
}
