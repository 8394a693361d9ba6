use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::config::AllocationConfig;
use super::domain::{
    Allocation, AllocationFailure, AllocationOutcome, CrewStatus, Driver, DriverId, Helper,
    HelperId, TruckType,
};
use super::qualification;
use super::repository::{
    AllocationEvent, AllocationPublisher, AssignmentNotice, CandidateRepository, RepositoryError,
};
use super::scoring::ScoringEngine;
use super::validator::AllocationValidator;

/// Inbound request from the delivery-creation workflow. Preferred IDs are
/// hints, re-validated before acceptance rather than trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    pub truck_type: TruckType,
    pub delivery_location: Option<String>,
    pub preferred_driver: Option<DriverId>,
    pub preferred_helpers: Vec<HelperId>,
}

impl AllocationRequest {
    pub fn new(truck_type: TruckType) -> Self {
        Self {
            truck_type,
            delivery_location: None,
            preferred_driver: None,
            preferred_helpers: Vec::new(),
        }
    }
}

/// Orchestrator composing the qualification table, candidate repository,
/// scoring engine, and validator into one query-score-validate pipeline.
/// Holds no state between calls; every run re-reads the repository.
pub struct AllocationService<R, P> {
    repository: Arc<R>,
    publisher: Arc<P>,
    engine: ScoringEngine,
    config: AllocationConfig,
}

impl<R, P> AllocationService<R, P>
where
    R: CandidateRepository + 'static,
    P: AllocationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, publisher: Arc<P>, config: AllocationConfig) -> Self {
        Self {
            repository,
            publisher,
            engine: ScoringEngine::new(config),
            config,
        }
    }

    pub fn validator(&self) -> AllocationValidator<R> {
        AllocationValidator::new(self.repository.clone())
    }

    /// Resolve a complete, valid assignment for the truck type, or a
    /// structured refusal explaining the shortfall. All-or-nothing: no
    /// partial crew is ever returned. Repository faults surface as `Err`,
    /// never as a refusal.
    pub fn allocate(
        &self,
        request: AllocationRequest,
    ) -> Result<AllocationOutcome, AllocationServiceError> {
        let requirement = qualification::requirements_for(request.truck_type);
        let now = Utc::now();

        let mut driver = self.accept_preferred_driver(&request)?;
        let mut helpers = self.accept_preferred_helpers(&request, requirement.helper_count)?;

        if driver.is_none() {
            let pool = self.repository.find_qualified_drivers(request.truck_type)?;
            if pool.is_empty() {
                return self.refuse(AllocationFailure::NoQualifiedDrivers {
                    truck_type: request.truck_type,
                    required_license: requirement.driver_license,
                    available_drivers: 0,
                });
            }

            let ranked = self.engine.rank_drivers(&pool, now);
            let best = &ranked[0];
            driver = pool.into_iter().find(|candidate| candidate.id == best.id);
        }

        let driver = match driver {
            Some(driver) => driver,
            // A preferred-only request with an ineligible preference still
            // falls through to the ranked pool above, so this is unreachable
            // unless the pool lookup lost the top-ranked row.
            None => {
                return Err(AllocationServiceError::Repository(
                    RepositoryError::Malformed("ranked driver missing from pool".to_string()),
                ))
            }
        };

        let needed = requirement.helper_count.saturating_sub(helpers.len());
        if needed > 0 {
            let mut pool = self
                .repository
                .find_qualified_helpers(request.truck_type, needed * self.config.oversample_factor)?;
            pool.retain(|candidate| !helpers.iter().any(|accepted| accepted.id == candidate.id));

            if pool.len() < needed {
                return self.refuse(AllocationFailure::NotEnoughHelpers {
                    truck_type: request.truck_type,
                    helpers_needed: needed,
                    available_helpers: pool.len(),
                    required_level: requirement.helper_level,
                    already_selected: helpers.iter().map(|helper| helper.id.clone()).collect(),
                });
            }

            // Preferred helpers stay first; ranked additions follow in score
            // order so the final list is stable for a given repository state.
            let ranked = self.engine.rank_helpers(&pool, now);
            for scored in ranked.into_iter().take(needed) {
                if let Some(helper) = pool.iter().find(|candidate| candidate.id == scored.id) {
                    helpers.push(helper.clone());
                }
            }
        }

        let helper_ids: Vec<HelperId> = helpers.iter().map(|helper| helper.id.clone()).collect();
        let report = self
            .validator()
            .validate(Some(&driver.id), &helper_ids, request.truck_type)?;
        if !report.is_valid {
            return self.refuse(AllocationFailure::ValidationFailed {
                errors: report.error_strings(),
                requirements: report.requirements,
            });
        }

        let allocation = Allocation {
            truck_type: request.truck_type,
            driver_id: driver.id.clone(),
            helper_ids,
            allocation_score: self.engine.allocation_score(&driver, &helpers),
            requirements: requirement,
            allocated_at: now,
        };

        info!(
            truck_type = allocation.truck_type.label(),
            driver = %allocation.driver_id,
            helpers = allocation.helper_ids.len(),
            score = allocation.allocation_score,
            "allocation resolved"
        );

        self.publish(AllocationEvent::Allocated {
            truck_type: allocation.truck_type,
            driver_id: allocation.driver_id.clone(),
            helper_ids: allocation.helper_ids.clone(),
            allocation_score: allocation.allocation_score,
        });
        self.publish(AllocationEvent::DriverNotice(AssignmentNotice {
            driver_id: allocation.driver_id.clone(),
            truck_type: allocation.truck_type,
            delivery_location: request.delivery_location.clone(),
            details: BTreeMap::new(),
        }));

        Ok(AllocationOutcome::Allocated(allocation))
    }

    /// Re-validate a caller-preferred driver. Ineligible or missing
    /// preferences are logged and dropped so automatic selection can proceed.
    fn accept_preferred_driver(
        &self,
        request: &AllocationRequest,
    ) -> Result<Option<Driver>, AllocationServiceError> {
        let Some(id) = &request.preferred_driver else {
            return Ok(None);
        };

        match self.repository.get_driver(id)? {
            Some(driver) if driver_is_eligible(&driver, request.truck_type) => Ok(Some(driver)),
            Some(driver) => {
                warn!(
                    driver = %driver.id,
                    truck_type = request.truck_type.label(),
                    "preferred driver not eligible, falling back to ranked selection"
                );
                Ok(None)
            }
            None => {
                warn!(driver = %id, "preferred driver not found, falling back to ranked selection");
                Ok(None)
            }
        }
    }

    /// Re-validate caller-preferred helpers, deduplicated by ID and capped at
    /// the requirement headcount. Ineligible entries are logged and skipped.
    fn accept_preferred_helpers(
        &self,
        request: &AllocationRequest,
        helper_count: usize,
    ) -> Result<Vec<Helper>, AllocationServiceError> {
        let mut accepted: Vec<Helper> = Vec::new();

        for id in &request.preferred_helpers {
            if accepted.len() == helper_count {
                break;
            }
            if accepted.iter().any(|helper| &helper.id == id) {
                continue;
            }

            match self.repository.get_helper(id)? {
                Some(helper) if helper_is_eligible(&helper, request.truck_type) => {
                    accepted.push(helper);
                }
                Some(helper) => {
                    warn!(
                        helper = %helper.id,
                        truck_type = request.truck_type.label(),
                        "preferred helper not eligible, skipping"
                    );
                }
                None => {
                    warn!(helper = %id, "preferred helper not found, skipping");
                }
            }
        }

        Ok(accepted)
    }

    fn refuse(
        &self,
        failure: AllocationFailure,
    ) -> Result<AllocationOutcome, AllocationServiceError> {
        info!(reason = %failure.summary(), "allocation refused");
        self.publish(AllocationEvent::Refused {
            truck_type: match &failure {
                AllocationFailure::NoQualifiedDrivers { truck_type, .. }
                | AllocationFailure::NotEnoughHelpers { truck_type, .. } => *truck_type,
                AllocationFailure::ValidationFailed { requirements, .. } => requirements.truck_type,
            },
            reason: failure.summary(),
        });
        Ok(AllocationOutcome::Refused(failure))
    }

    /// Fire-and-forget dispatch: a failing audit or notification transport
    /// never affects the allocation result.
    fn publish(&self, event: AllocationEvent) {
        if let Err(err) = self.publisher.publish(event) {
            warn!(error = %err, "allocation event publish failed");
        }
    }
}

pub(crate) fn driver_is_eligible(driver: &Driver, truck_type: TruckType) -> bool {
    driver.status == CrewStatus::Active
        && driver.documents.is_complete()
        && qualification::is_driver_license_valid(driver.license, truck_type)
        && driver.qualified_truck_types.contains(&truck_type)
}

pub(crate) fn helper_is_eligible(helper: &Helper, truck_type: TruckType) -> bool {
    helper.status == CrewStatus::Active
        && helper.documents.is_complete()
        && qualification::is_helper_level_valid(helper.level, truck_type)
        && helper.qualified_truck_types.contains(&truck_type)
}

/// System faults raised by the orchestrator. Business refusals are values
/// inside `AllocationOutcome`, never errors.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
