//! Smart driver/helper allocation for delivery staffing.
//!
//! Given a truck type, the service selects one qualified driver and the
//! required number of qualified helpers: the qualification table computes the
//! staffing requirement, the candidate repository supplies eligible
//! personnel, the scoring engine ranks them, and the validator re-checks the
//! resolved crew against live repository state before the allocation is
//! returned. Refusals are structured values; only system faults are errors.

pub mod config;
pub mod domain;
pub mod qualification;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod validator;

#[cfg(test)]
mod tests;

pub use config::AllocationConfig;
pub use domain::{
    Allocation, AllocationFailure, AllocationOutcome, ComplianceStatus, CrewStatus,
    DocumentCompliance, Driver, DriverId, Helper, HelperId, HelperLevel, LicenseClass, TruckType,
    TruckTypeRequirement,
};
pub use repository::{
    AllocationEvent, AllocationPublisher, AllocationRecord, AssignmentNotice, CandidateRepository,
    PublishError, RepositoryError,
};
pub use scoring::{ScoreBreakdown, ScoredCandidate, ScoringEngine};
pub use service::{AllocationRequest, AllocationService, AllocationServiceError};
pub use validator::{AllocationValidator, ValidationIssue, ValidationReport};
