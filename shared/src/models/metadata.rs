use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Metadata ---

/// Identity of a workload unit as seen by the scheduler.
///
/// `id` keys the scheduling cycle, `name` is what the capacity oracle knows
/// the workload by.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Metadata {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub created_at: DateTime<Utc>,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Metadata {
    pub fn named(name: &str) -> Self {
        Metadata {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        let id = Uuid::new_v4();
        Metadata {
            id,
            name: id.to_string(),
            namespace: default_namespace(),
            created_at: Utc::now(),
        }
    }
}
