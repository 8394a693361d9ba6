use serde::{Deserialize, Serialize};

const DEFAULT_OVERSAMPLE_FACTOR: usize = 2;
const DEFAULT_RECENCY_CAP_DAYS: f64 = 7.0;

/// Tunables for candidate selection. Scoring weights themselves are fixed
/// policy (they sum to 100 per role); only pool sizing and the recency window
/// are dials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Helper queries request `needed * oversample_factor` candidates so the
    /// ranking step has a real pool rather than a bare minimum.
    pub oversample_factor: usize,
    /// Days since the last assignment at which recency credit maxes out.
    pub recency_cap_days: f64,
}

impl AllocationConfig {
    pub fn new(oversample_factor: usize, recency_cap_days: f64) -> Self {
        let oversample_factor = oversample_factor.max(1);
        let recency_cap_days = if recency_cap_days.is_finite() && recency_cap_days > 0.0 {
            recency_cap_days
        } else {
            DEFAULT_RECENCY_CAP_DAYS
        };

        Self {
            oversample_factor,
            recency_cap_days,
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OVERSAMPLE_FACTOR, DEFAULT_RECENCY_CAP_DAYS)
    }
}
