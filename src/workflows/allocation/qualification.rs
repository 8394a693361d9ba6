//! Pure qualification rules: the fixed truck-type requirement table and the
//! license/level compatibility checks. No state, no I/O.

use std::collections::BTreeSet;

use tracing::warn;

use super::domain::{HelperLevel, LicenseClass, TruckType, TruckTypeRequirement};

/// Staffing requirement for a truck type. Exactly one row per type.
pub fn requirements_for(truck_type: TruckType) -> TruckTypeRequirement {
    let (driver_license, helper_count, helper_level) = match truck_type {
        TruckType::Mini => (LicenseClass::NonProfessional, 1, HelperLevel::Basic),
        TruckType::FourWheeler => (LicenseClass::Professional, 1, HelperLevel::Basic),
        TruckType::SixWheeler => (LicenseClass::Professional, 2, HelperLevel::Standard),
        TruckType::EightWheeler => (LicenseClass::Professional, 2, HelperLevel::Advanced),
        TruckType::TenWheeler => (LicenseClass::Professional, 3, HelperLevel::Advanced),
    };

    TruckTypeRequirement {
        truck_type,
        driver_license,
        helper_count,
        helper_level,
    }
}

/// Requirement lookup from a raw truck-type label. Unrecognized labels fall
/// back to the mini-truck row, the smallest and most restrictive vehicle.
/// This is a deliberate default inherited from fleet operations, not an
/// error path.
pub fn requirements_for_label(raw: &str) -> TruckTypeRequirement {
    match TruckType::parse(raw) {
        Some(truck_type) => requirements_for(truck_type),
        None => {
            warn!(label = raw, "unknown truck type, using mini truck requirements");
            requirements_for(TruckType::Mini)
        }
    }
}

/// Whether a license class permits driving the given truck type.
pub fn is_driver_license_valid(license: LicenseClass, truck_type: TruckType) -> bool {
    match license {
        LicenseClass::Professional => true,
        LicenseClass::NonProfessional => truck_type == TruckType::Mini,
    }
}

/// Raw-string variant used at ingestion boundaries. Unknown license strings
/// are logged and rejected, never coerced to a canonical class.
pub fn is_raw_license_valid(raw: &str, truck_type: TruckType) -> bool {
    match LicenseClass::parse(raw) {
        Some(license) => is_driver_license_valid(license, truck_type),
        None => {
            warn!(license = raw, "unknown license type, treating as unqualified");
            false
        }
    }
}

/// Whether a helper's skill tier satisfies the truck type's requirement.
/// Levels are totally ordered, so any tier at or above the required one
/// qualifies.
pub fn is_helper_level_valid(level: HelperLevel, truck_type: TruckType) -> bool {
    level.rank() >= requirements_for(truck_type).helper_level.rank()
}

/// Truck types a driver may operate, fully determined by license class.
pub fn driver_truck_types(license: LicenseClass) -> BTreeSet<TruckType> {
    match license {
        LicenseClass::Professional => TruckType::ALL.into_iter().collect(),
        LicenseClass::NonProfessional => [TruckType::Mini].into_iter().collect(),
    }
}

/// Truck types a helper may assist with. The level table governs unless the
/// helper holds a professional license, which covers every type; a
/// non-professional (or absent) license adds nothing beyond the level table.
pub fn helper_truck_types(level: HelperLevel, license: Option<LicenseClass>) -> BTreeSet<TruckType> {
    if license == Some(LicenseClass::Professional) {
        return TruckType::ALL.into_iter().collect();
    }

    match level {
        HelperLevel::Advanced => TruckType::ALL.into_iter().collect(),
        HelperLevel::Standard => [TruckType::Mini, TruckType::FourWheeler, TruckType::SixWheeler]
            .into_iter()
            .collect(),
        HelperLevel::Basic => [TruckType::Mini, TruckType::FourWheeler].into_iter().collect(),
    }
}
