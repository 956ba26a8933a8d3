use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Highest score a node can carry once normalized.
pub const MAX_NODE_SCORE: i64 = 100;
/// Lowest score a node can carry once normalized.
pub const MIN_NODE_SCORE: i64 = 0;

/// Raw per-node scores as published by the capacity oracle.
pub type RawScoreSet = HashMap<String, i64>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

impl NodeScore {
    pub fn new(name: &str, score: i64) -> Self {
        Self {
            name: name.to_string(),
            score,
        }
    }
}

/// One container's memory footprint committed to a node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkloadReservation {
    pub name: String,
    pub memory_requests: String,
    pub memory_limits: String,
    pub assigned_node: String,
}
