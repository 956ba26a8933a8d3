//! # Reservation Reporter
//!
//! Tells the capacity oracle which memory a pod committed to a node, and hands
//! it back when the placement is undone.

use async_trait::async_trait;
use shared::models::{Pod, WorkloadReservation};
use tokio_util::sync::CancellationToken;

use super::OracleClient;
use crate::errors::PluginError;

/// Sink for reservation records.
#[async_trait]
pub trait ReservationSink: Send + Sync {
    /// Record a committed placement. The whole batch goes out in one request.
    async fn report(
        &self,
        reservations: &[WorkloadReservation],
        cancel: &CancellationToken,
    ) -> Result<(), PluginError>;

    /// Give back what a previous `report` claimed.
    async fn release(
        &self,
        reservations: &[WorkloadReservation],
        cancel: &CancellationToken,
    ) -> Result<(), PluginError>;
}

/// One record per container, all pointing at `node`.
pub fn reservations_for(pod: &Pod, node: &str) -> Vec<WorkloadReservation> {
    pod.spec
        .containers
        .iter()
        .map(|c| WorkloadReservation {
            name: pod.metadata.name.clone(),
            memory_requests: c.memory_request().to_string(),
            memory_limits: c.memory_limit().to_string(),
            assigned_node: node.to_string(),
        })
        .collect()
}

/// Reports reservations to `POST /pods` and releases them via `POST /pods/release`.
#[derive(Debug, Clone)]
pub struct ReservationReporter {
    client: OracleClient,
}

impl ReservationReporter {
    pub fn new(client: OracleClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReservationSink for ReservationReporter {
    async fn report(
        &self,
        reservations: &[WorkloadReservation],
        cancel: &CancellationToken,
    ) -> Result<(), PluginError> {
        self.client.post_json("/pods", reservations, cancel).await?;
        tracing::debug!(records = reservations.len(), "Reported reservation");
        Ok(())
    }

    async fn release(
        &self,
        reservations: &[WorkloadReservation],
        cancel: &CancellationToken,
    ) -> Result<(), PluginError> {
        self.client
            .post_json("/pods/release", reservations, cancel)
            .await?;
        tracing::debug!(records = reservations.len(), "Released reservation");
        Ok(())
    }
}
