use serde::{Deserialize, Serialize};

use crate::models::{NodeScore, Pod, RawScoreSet};

// ============================= CAPACITY ORACLE

/// Body of `GET /scores` on the capacity oracle.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct OracleScores {
    pub result: RawScoreSet,
}

// ============================= EXTENDER CALLBACKS

/// Score one candidate node for a pod.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ScoreRequest {
    pub pod: Pod,
    pub node_name: String,
}

/// Normalize every candidate score gathered for a pod.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NormalizeRequest {
    pub pod: Pod,
    pub scores: Vec<NodeScore>,
}

/// Reserve or unreserve a pod on the node it was placed on.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BindingRequest {
    pub pod: Pod,
    pub node_name: String,
}
