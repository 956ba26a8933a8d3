pub mod metadata;
pub mod pod;
pub mod score;

pub use metadata::Metadata;
pub use pod::{ContainerSpec, Pod, PodSpec, Quantity, ResourceRequirements};
pub use score::{MAX_NODE_SCORE, MIN_NODE_SCORE, NodeScore, RawScoreSet, WorkloadReservation};
