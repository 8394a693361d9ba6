//! Final consistency check before an allocation is committed.
//!
//! The validator re-fetches every entity by ID and never accepts the
//! caller's already-fetched snapshots. Two concurrent orchestrations can
//! race for the same "best" driver; the persistence layer makes the
//! available-to-assigned transition atomic, so this re-fetch is the engine's
//! sole safeguard against both of them winning. It accumulates every
//! violation instead of stopping at the first.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{CrewStatus, DriverId, HelperId, TruckType, TruckTypeRequirement};
use super::qualification;
use super::repository::{CandidateRepository, RepositoryError};

/// One violation found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ValidationIssue {
    #[error("No driver assigned")]
    NoDriverAssigned,
    #[error("Driver {0} not found")]
    DriverNotFound(DriverId),
    #[error("Driver {id} license {license} not valid for {truck_type}")]
    DriverLicenseInvalid {
        id: DriverId,
        license: String,
        truck_type: String,
    },
    #[error("Driver {id} is {status}, not active")]
    DriverNotActive { id: DriverId, status: String },
    #[error("Driver {0} documents incomplete")]
    DriverDocumentsIncomplete(DriverId),
    #[error("No helpers assigned. Required: {required}")]
    NoHelpersAssigned { required: usize },
    #[error("Insufficient helpers: assigned {assigned}, required {required}")]
    HelperShortfall { assigned: usize, required: usize },
    #[error("Helper {0} not found")]
    HelperNotFound(HelperId),
    #[error("Helper {id} level {level} below required {required}")]
    HelperLevelTooLow {
        id: HelperId,
        level: String,
        required: String,
    },
    #[error("Helper {id} is {status}, not active")]
    HelperNotActive { id: HelperId, status: String },
    #[error("Helper {0} documents incomplete")]
    HelperDocumentsIncomplete(HelperId),
}

/// Result of a validation pass. `is_valid` iff no issues were found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub requirements: TruckTypeRequirement,
}

impl ValidationReport {
    pub fn error_strings(&self) -> Vec<String> {
        self.errors.iter().map(|issue| issue.to_string()).collect()
    }
}

/// Standalone validator, also usable for pre-flight checks outside the
/// orchestrator (manual admin overrides and the like).
pub struct AllocationValidator<R> {
    repository: Arc<R>,
}

impl<R> AllocationValidator<R>
where
    R: CandidateRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate a tentative assignment against current repository state.
    /// Repository faults propagate; business violations accumulate in the
    /// report.
    pub fn validate(
        &self,
        driver_id: Option<&DriverId>,
        helper_ids: &[HelperId],
        truck_type: TruckType,
    ) -> Result<ValidationReport, RepositoryError> {
        let requirements = qualification::requirements_for(truck_type);
        let mut errors = Vec::new();

        match driver_id {
            None => errors.push(ValidationIssue::NoDriverAssigned),
            Some(id) => match self.repository.get_driver(id)? {
                None => errors.push(ValidationIssue::DriverNotFound(id.clone())),
                Some(driver) => {
                    if !qualification::is_driver_license_valid(driver.license, truck_type) {
                        errors.push(ValidationIssue::DriverLicenseInvalid {
                            id: id.clone(),
                            license: driver.license.label().to_string(),
                            truck_type: truck_type.label().to_string(),
                        });
                    }
                    if driver.status != CrewStatus::Active {
                        errors.push(ValidationIssue::DriverNotActive {
                            id: id.clone(),
                            status: driver.status.label().to_string(),
                        });
                    }
                    if !driver.documents.is_complete() {
                        errors.push(ValidationIssue::DriverDocumentsIncomplete(id.clone()));
                    }
                }
            },
        }

        if helper_ids.is_empty() {
            errors.push(ValidationIssue::NoHelpersAssigned {
                required: requirements.helper_count,
            });
        } else if helper_ids.len() < requirements.helper_count {
            errors.push(ValidationIssue::HelperShortfall {
                assigned: helper_ids.len(),
                required: requirements.helper_count,
            });
        }

        for id in helper_ids {
            match self.repository.get_helper(id)? {
                None => errors.push(ValidationIssue::HelperNotFound(id.clone())),
                Some(helper) => {
                    if !qualification::is_helper_level_valid(helper.level, truck_type) {
                        errors.push(ValidationIssue::HelperLevelTooLow {
                            id: id.clone(),
                            level: helper.level.label().to_string(),
                            required: requirements.helper_level.label().to_string(),
                        });
                    }
                    if helper.status != CrewStatus::Active {
                        errors.push(ValidationIssue::HelperNotActive {
                            id: id.clone(),
                            status: helper.status.label().to_string(),
                        });
                    }
                    if !helper.documents.is_complete() {
                        errors.push(ValidationIssue::HelperDocumentsIncomplete(id.clone()));
                    }
                }
            }
        }

        Ok(ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            requirements,
        })
    }
}
