use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::workflows::allocation::config::AllocationConfig;
use crate::workflows::allocation::domain::{
    CrewStatus, DocumentCompliance, Driver, DriverId, Helper, HelperId, HelperLevel, LicenseClass,
    TruckType,
};
use crate::workflows::allocation::qualification;
use crate::workflows::allocation::repository::{
    AllocationEvent, AllocationPublisher, CandidateRepository, PublishError, RepositoryError,
};
use crate::workflows::allocation::service::AllocationService;

pub(super) fn driver(id: &str, license: LicenseClass, deliveries: u32, rating: f32) -> Driver {
    Driver {
        id: DriverId(id.to_string()),
        name: format!("Driver {id}"),
        license,
        status: CrewStatus::Active,
        qualified_truck_types: qualification::driver_truck_types(license),
        total_deliveries: deliveries,
        rating,
        last_assignment: None,
        documents: DocumentCompliance::complete(),
    }
}

pub(super) fn helper(id: &str, level: HelperLevel, assignments: u32, rating: f32) -> Helper {
    Helper {
        id: HelperId(id.to_string()),
        name: format!("Helper {id}"),
        license: None,
        level,
        status: CrewStatus::Active,
        qualified_truck_types: qualification::helper_truck_types(level, None),
        total_assignments: assignments,
        rating,
        last_assignment: None,
        documents: DocumentCompliance::complete(),
    }
}

/// In-memory candidate store honoring the repository filter contract.
/// BTreeMaps keep iteration order stable so ranking tie-breaks are
/// reproducible in tests.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    drivers: Arc<Mutex<BTreeMap<DriverId, Driver>>>,
    helpers: Arc<Mutex<BTreeMap<HelperId, Helper>>>,
}

impl MemoryRepository {
    pub(super) fn add_driver(&self, driver: Driver) {
        self.drivers
            .lock()
            .expect("driver mutex poisoned")
            .insert(driver.id.clone(), driver);
    }

    pub(super) fn add_helper(&self, helper: Helper) {
        self.helpers
            .lock()
            .expect("helper mutex poisoned")
            .insert(helper.id.clone(), helper);
    }

    pub(super) fn set_driver_status(&self, id: &str, status: CrewStatus) {
        let mut guard = self.drivers.lock().expect("driver mutex poisoned");
        if let Some(driver) = guard.get_mut(&DriverId(id.to_string())) {
            driver.status = status;
        }
    }

    pub(super) fn set_helper_status(&self, id: &str, status: CrewStatus) {
        let mut guard = self.helpers.lock().expect("helper mutex poisoned");
        if let Some(helper) = guard.get_mut(&HelperId(id.to_string())) {
            helper.status = status;
        }
    }
}

impl CandidateRepository for MemoryRepository {
    fn find_qualified_drivers(&self, truck_type: TruckType) -> Result<Vec<Driver>, RepositoryError> {
        let guard = self.drivers.lock().expect("driver mutex poisoned");
        Ok(guard
            .values()
            .filter(|driver| {
                driver.status == CrewStatus::Active
                    && driver.documents.is_complete()
                    && qualification::is_driver_license_valid(driver.license, truck_type)
                    && driver.qualified_truck_types.contains(&truck_type)
            })
            .cloned()
            .collect())
    }

    fn find_qualified_helpers(
        &self,
        truck_type: TruckType,
        _min_count: usize,
    ) -> Result<Vec<Helper>, RepositoryError> {
        let guard = self.helpers.lock().expect("helper mutex poisoned");
        Ok(guard
            .values()
            .filter(|helper| {
                helper.status == CrewStatus::Active
                    && helper.documents.is_complete()
                    && qualification::is_helper_level_valid(helper.level, truck_type)
                    && helper.qualified_truck_types.contains(&truck_type)
            })
            .cloned()
            .collect())
    }

    fn get_driver(&self, id: &DriverId) -> Result<Option<Driver>, RepositoryError> {
        let guard = self.drivers.lock().expect("driver mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn get_helper(&self, id: &HelperId) -> Result<Option<Helper>, RepositoryError> {
        let guard = self.helpers.lock().expect("helper mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    events: Arc<Mutex<Vec<AllocationEvent>>>,
}

impl MemoryPublisher {
    pub(super) fn events(&self) -> Vec<AllocationEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl AllocationPublisher for MemoryPublisher {
    fn publish(&self, event: AllocationEvent) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct FailingPublisher;

impl AllocationPublisher for FailingPublisher {
    fn publish(&self, _event: AllocationEvent) -> Result<(), PublishError> {
        Err(PublishError::Transport("notification gateway down".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn find_qualified_drivers(&self, _truck_type: TruckType) -> Result<Vec<Driver>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_qualified_helpers(
        &self,
        _truck_type: TruckType,
        _min_count: usize,
    ) -> Result<Vec<Helper>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get_driver(&self, _id: &DriverId) -> Result<Option<Driver>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get_helper(&self, _id: &HelperId) -> Result<Option<Helper>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AllocationService<MemoryRepository, MemoryPublisher>,
    MemoryRepository,
    MemoryPublisher,
) {
    let repository = MemoryRepository::default();
    let publisher = MemoryPublisher::default();
    let service = AllocationService::new(
        Arc::new(repository.clone()),
        Arc::new(publisher.clone()),
        AllocationConfig::default(),
    );
    (service, repository, publisher)
}
