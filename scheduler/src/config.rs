use std::{env, time::Duration};

use crate::{plugins::Strategy, state::DEFAULT_CYCLE_TTL};

// --- Config definition ---

/// Extender configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the capacity oracle, `/scores` and `/pods` hang off it
    pub oracle_url: String,
    pub oracle_timeout: Duration,
    pub port: u16,
    pub workers: usize,
    pub strategy: Strategy,
    /// How long a cycle may stay registered, placed pods are never unreserved
    pub cycle_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is missing or unparsable.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = env::var("ORACLE_URL") {
            config.oracle_url = url;
        }

        if let Some(ms) = env::var("ORACLE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.oracle_timeout = Duration::from_millis(ms);
        }

        if let Some(p) = env::var("EXTENDER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
        {
            config.port = p;
        }

        if let Some(val) = env::var("EXTENDER_WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.workers = val;
        }

        if let Some(secs) = env::var("CYCLE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.cycle_ttl = Duration::from_secs(secs);
        }

        match env::var("SCHEDULER_STRATEGY").map(|s| s.parse::<Strategy>()) {
            Ok(Ok(strategy)) => config.strategy = strategy,
            Ok(Err(err)) => tracing::warn!(error=%err, "Ignoring SCHEDULER_STRATEGY"),
            Err(_) => {}
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oracle_url: "http://localhost:6789/m8s".to_string(),
            oracle_timeout: Duration::from_millis(2000),
            port: 7640,
            workers: 2,
            strategy: Strategy::ElasticMemory,
            cycle_ttl: DEFAULT_CYCLE_TTL,
        }
    }
}
