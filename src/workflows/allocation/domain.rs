use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for driver records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriverId(pub String);

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for helper records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HelperId(pub String);

impl std::fmt::Display for HelperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vehicle classes the fleet operates. Each class carries exactly one
/// staffing requirement row (see the qualification module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TruckType {
    Mini,
    FourWheeler,
    SixWheeler,
    EightWheeler,
    TenWheeler,
}

impl TruckType {
    pub const ALL: [TruckType; 5] = [
        TruckType::Mini,
        TruckType::FourWheeler,
        TruckType::SixWheeler,
        TruckType::EightWheeler,
        TruckType::TenWheeler,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            TruckType::Mini => "mini truck",
            TruckType::FourWheeler => "4 wheeler",
            TruckType::SixWheeler => "6 wheeler",
            TruckType::EightWheeler => "8 wheeler",
            TruckType::TenWheeler => "10 wheeler",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mini truck" | "mini" => Some(TruckType::Mini),
            "4 wheeler" | "four wheeler" => Some(TruckType::FourWheeler),
            "6 wheeler" | "six wheeler" => Some(TruckType::SixWheeler),
            "8 wheeler" | "eight wheeler" => Some(TruckType::EightWheeler),
            "10 wheeler" | "ten wheeler" => Some(TruckType::TenWheeler),
            _ => None,
        }
    }
}

/// Canonical license classes. Raw records use several synonymous spellings
/// ("class ce", "ce", "class c", "c"); `parse` folds them into the two
/// canonical variants exactly once at the repository boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseClass {
    Professional,
    NonProfessional,
}

impl LicenseClass {
    pub const fn label(self) -> &'static str {
        match self {
            LicenseClass::Professional => "professional",
            LicenseClass::NonProfessional => "non-professional",
        }
    }

    /// Normalize a raw license string. Unknown spellings return `None`; the
    /// caller is responsible for logging the condition rather than coercing.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "professional" | "class ce" | "ce" => Some(LicenseClass::Professional),
            "non-professional" | "class c" | "c" => Some(LicenseClass::NonProfessional),
            _ => None,
        }
    }
}

/// Helper skill tiers, totally ordered: basic < standard < advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HelperLevel {
    Basic,
    Standard,
    Advanced,
}

impl HelperLevel {
    pub const fn label(self) -> &'static str {
        match self {
            HelperLevel::Basic => "basic",
            HelperLevel::Standard => "standard",
            HelperLevel::Advanced => "advanced",
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            HelperLevel::Basic => 0,
            HelperLevel::Standard => 1,
            HelperLevel::Advanced => 2,
        }
    }
}

/// Lifecycle status shared by drivers and helpers. Only `Active` personnel
/// are eligible for allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrewStatus {
    Active,
    Inactive,
    LicenseExpiring,
    LicenseExpired,
}

impl CrewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CrewStatus::Active => "active",
            CrewStatus::Inactive => "inactive",
            CrewStatus::LicenseExpiring => "license-expiring",
            CrewStatus::LicenseExpired => "license-expired",
        }
    }
}

/// Aggregate document status: all required identity/credential documents on
/// file and unexpired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Complete,
    Incomplete,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCompliance {
    pub overall: ComplianceStatus,
}

impl DocumentCompliance {
    pub const fn complete() -> Self {
        Self {
            overall: ComplianceStatus::Complete,
        }
    }

    pub const fn is_complete(self) -> bool {
        matches!(self.overall, ComplianceStatus::Complete)
    }
}

/// Driver record as projected by the candidate repository.
///
/// Invariant: `qualified_truck_types` is fully determined by `license`
/// (professional covers every truck type, non-professional only the mini
/// truck) and must be refreshed whenever the license changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub license: LicenseClass,
    pub status: CrewStatus,
    pub qualified_truck_types: BTreeSet<TruckType>,
    pub total_deliveries: u32,
    pub rating: f32,
    pub last_assignment: Option<DateTime<Utc>>,
    pub documents: DocumentCompliance,
}

impl Driver {
    /// Re-derive the qualification set after a license change.
    pub fn refresh_qualified_types(&mut self) {
        self.qualified_truck_types = super::qualification::driver_truck_types(self.license);
    }
}

/// Helper record as projected by the candidate repository.
///
/// Invariant: `qualified_truck_types` is derived from `level`, with a
/// professional license overriding the level table to cover every truck type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Helper {
    pub id: HelperId,
    pub name: String,
    pub license: Option<LicenseClass>,
    pub level: HelperLevel,
    pub status: CrewStatus,
    pub qualified_truck_types: BTreeSet<TruckType>,
    pub total_assignments: u32,
    pub rating: f32,
    pub last_assignment: Option<DateTime<Utc>>,
    pub documents: DocumentCompliance,
}

impl Helper {
    pub fn refresh_qualified_types(&mut self) {
        self.qualified_truck_types =
            super::qualification::helper_truck_types(self.level, self.license);
    }
}

/// Staffing requirement row for a truck type. Derived from the fixed
/// qualification table, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckTypeRequirement {
    pub truck_type: TruckType,
    pub driver_license: LicenseClass,
    pub helper_count: usize,
    pub helper_level: HelperLevel,
}

/// A resolved, validated assignment. Created only by a successful
/// orchestrator run and immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub truck_type: TruckType,
    pub driver_id: DriverId,
    pub helper_ids: Vec<HelperId>,
    pub allocation_score: f64,
    pub requirements: TruckTypeRequirement,
    pub allocated_at: DateTime<Utc>,
}

/// Structured business refusal. Always a value, never an error: callers must
/// be able to distinguish "allocation impossible" from a system fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AllocationFailure {
    NoQualifiedDrivers {
        truck_type: TruckType,
        required_license: LicenseClass,
        available_drivers: usize,
    },
    NotEnoughHelpers {
        truck_type: TruckType,
        helpers_needed: usize,
        available_helpers: usize,
        required_level: HelperLevel,
        already_selected: Vec<HelperId>,
    },
    ValidationFailed {
        errors: Vec<String>,
        requirements: TruckTypeRequirement,
    },
}

impl AllocationFailure {
    pub fn summary(&self) -> String {
        match self {
            AllocationFailure::NoQualifiedDrivers {
                truck_type,
                required_license,
                ..
            } => format!(
                "No qualified drivers available for {} (requires {} license)",
                truck_type.label(),
                required_license.label()
            ),
            AllocationFailure::NotEnoughHelpers {
                truck_type,
                helpers_needed,
                available_helpers,
                required_level,
                ..
            } => format!(
                "Not enough qualified helpers for {}: need {}, found {} at {} level or above",
                truck_type.label(),
                helpers_needed,
                available_helpers,
                required_level.label()
            ),
            AllocationFailure::ValidationFailed { errors, .. } => {
                format!("Allocation validation failed: {}", errors.join("; "))
            }
        }
    }
}

/// Outcome of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AllocationOutcome {
    Allocated(Allocation),
    Refused(AllocationFailure),
}

impl AllocationOutcome {
    pub fn allocation(&self) -> Option<&Allocation> {
        match self {
            AllocationOutcome::Allocated(allocation) => Some(allocation),
            AllocationOutcome::Refused(_) => None,
        }
    }
}
