use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::metadata::Metadata;

/// Resource key the memory figures are read from.
pub const MEMORY: &str = "memory";

// --- Core ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Pod {
    pub metadata: Metadata,
    pub spec: PodSpec,
}

/// Desired state
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PodSpec {
    #[serde(default)]
    pub node_name: String,
    pub containers: Vec<ContainerSpec>,
}

// --- Containers ---

/// Definition of a container within a Pod.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub resources: ResourceRequirements,
}

/// Requested and limiting amounts per resource name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub requests: BTreeMap<String, Quantity>,
    #[serde(default)]
    pub limits: BTreeMap<String, Quantity>,
}

/// A resource amount in its canonical textual form (`128Mi`, `1G`, ...).
///
/// Carried verbatim end to end, never parsed into a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Quantity(pub String);

// --- Impl ---

impl Quantity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Quantity {
    /// The zero quantity renders as `0`.
    fn default() -> Self {
        Quantity("0".to_string())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Quantity(s.to_string())
    }
}

impl ContainerSpec {
    /// Container with a memory request and limit, handy for manifests and tests.
    pub fn with_memory(name: &str, request: &str, limit: &str) -> Self {
        let mut container = ContainerSpec {
            name: name.to_string(),
            ..Default::default()
        };
        container
            .resources
            .requests
            .insert(MEMORY.to_string(), Quantity::from(request));
        container
            .resources
            .limits
            .insert(MEMORY.to_string(), Quantity::from(limit));
        container
    }

    pub fn memory_request(&self) -> Quantity {
        self.resources
            .requests
            .get(MEMORY)
            .cloned()
            .unwrap_or_default()
    }

    pub fn memory_limit(&self) -> Quantity {
        self.resources.limits.get(MEMORY).cloned().unwrap_or_default()
    }
}

impl Default for ContainerSpec {
    fn default() -> Self {
        ContainerSpec {
            name: "test-container".to_string(),
            image: "busybox:latest".to_string(),
            resources: ResourceRequirements::default(),
        }
    }
}

impl Default for PodSpec {
    fn default() -> Self {
        PodSpec {
            node_name: "".to_string(),
            containers: vec![ContainerSpec::default()],
        }
    }
}
