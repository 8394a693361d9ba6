use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Allocation, Driver, DriverId, Helper, HelperId, TruckType, TruckTypeRequirement,
};

/// Read-only projection of the stored driver/helper records. The engine owns
/// no writes here; the backing store is the single source of truth and every
/// orchestration re-reads it.
pub trait CandidateRepository: Send + Sync {
    /// Drivers with active status, a license valid for the truck type, the
    /// truck type in their qualification set, and complete documents. An
    /// empty list is a valid, non-error result.
    fn find_qualified_drivers(&self, truck_type: TruckType) -> Result<Vec<Driver>, RepositoryError>;

    /// Helpers passing the same filters. Callers oversample (`min_count`
    /// times the configured factor) so ranking has a real pool to work with.
    fn find_qualified_helpers(
        &self,
        truck_type: TruckType,
        min_count: usize,
    ) -> Result<Vec<Helper>, RepositoryError>;

    fn get_driver(&self, id: &DriverId) -> Result<Option<Driver>, RepositoryError>;
    fn get_helper(&self, id: &HelperId) -> Result<Option<Helper>, RepositoryError>;
}

/// Repository failures are system faults: they propagate to the caller and
/// are never folded into a business refusal.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("malformed candidate record: {0}")]
    Malformed(String),
}

/// Outbound audit/notification hook. Dispatch is fire-and-forget: a publish
/// failure must never cause the allocation itself to fail or roll back.
pub trait AllocationPublisher: Send + Sync {
    fn publish(&self, event: AllocationEvent) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}

/// Events emitted around an orchestration run so audit-trail and
/// driver-notification collaborators can react.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AllocationEvent {
    Allocated {
        truck_type: TruckType,
        driver_id: DriverId,
        helper_ids: Vec<HelperId>,
        allocation_score: f64,
    },
    DriverNotice(AssignmentNotice),
    Refused {
        truck_type: TruckType,
        reason: String,
    },
}

/// Push-notification payload for the assigned driver's device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentNotice {
    pub driver_id: DriverId,
    pub truck_type: TruckType,
    pub delivery_location: Option<String>,
    pub details: BTreeMap<String, String>,
}

/// Audit/history payload handed to the recording collaborator once an
/// allocation succeeds. The engine only produces this record; persistence of
/// it belongs to the delivery workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRecord {
    pub delivery_id: String,
    pub driver_id: DriverId,
    pub helper_ids: Vec<HelperId>,
    pub truck_type: TruckType,
    pub allocation_score: f64,
    pub requirements: TruckTypeRequirement,
    pub allocated_at: DateTime<Utc>,
    pub status: &'static str,
}

impl AllocationRecord {
    pub fn for_delivery(delivery_id: impl Into<String>, allocation: &Allocation) -> Self {
        Self {
            delivery_id: delivery_id.into(),
            driver_id: allocation.driver_id.clone(),
            helper_ids: allocation.helper_ids.clone(),
            truck_type: allocation.truck_type,
            allocation_score: allocation.allocation_score,
            requirements: allocation.requirements,
            allocated_at: allocation.allocated_at,
            status: "active",
        }
    }
}
