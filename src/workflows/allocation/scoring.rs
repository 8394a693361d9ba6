//! Deterministic candidate ranking. Both role scores are weighted sums over
//! a normalized pool, higher is better, with ties broken by input order
//! (stable sort). Repository return order therefore drives tie-breaks; a
//! store without a stable order makes that an accepted non-determinism
//! source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::AllocationConfig;
use super::domain::{Driver, DriverId, Helper, HelperId, HelperLevel};

const DRIVER_EXPERIENCE_WEIGHT: f64 = 40.0;
const DRIVER_RATING_WEIGHT: f64 = 30.0;
const DRIVER_RECENCY_WEIGHT: f64 = 20.0;
const DRIVER_COMPLIANCE_BONUS: f64 = 10.0;

const HELPER_EXPERIENCE_WEIGHT: f64 = 40.0;
const HELPER_RATING_WEIGHT: f64 = 20.0;
const HELPER_RECENCY_WEIGHT: f64 = 10.0;

const MAX_RATING: f64 = 5.0;

// Combined-score shape: driver contribution 60%, helper contribution 40%,
// with experience capped on an absolute scale so the final figure does not
// drift with pool composition.
const COMBINED_DRIVER_SHARE: f64 = 0.6;
const COMBINED_HELPER_SHARE: f64 = 0.4;
const COMBINED_EXPERIENCE_CAP: f64 = 100.0;

/// Per-term points for one ranked candidate, kept so audits and tests can see
/// how a score came together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub experience: f64,
    pub rating: f64,
    pub recency: f64,
    /// Document-compliance bonus for drivers, level bonus for helpers.
    pub bonus: f64,
}

impl ScoreBreakdown {
    pub fn total(self) -> f64 {
        self.experience + self.rating + self.recency + self.bonus
    }
}

/// A candidate with its computed score, ready for selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate<Id> {
    pub id: Id,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Stateless ranking engine parameterized by the allocation tunables.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: AllocationConfig,
}

impl ScoringEngine {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Rank a driver pool, best first. Experience is the candidate's share of
    /// the pool's total deliveries; a pool that has delivered nothing scores
    /// zero on that term rather than dividing by zero.
    pub fn rank_drivers(
        &self,
        pool: &[Driver],
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate<DriverId>> {
        let pool_total: u64 = pool.iter().map(|d| u64::from(d.total_deliveries)).sum();

        let mut ranked: Vec<ScoredCandidate<DriverId>> = pool
            .iter()
            .map(|driver| {
                let breakdown = self.driver_breakdown(driver, pool_total, now);
                ScoredCandidate {
                    id: driver.id.clone(),
                    score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Rank a helper pool, best first. Same structure as drivers with the
    /// level bonus in place of the compliance bonus.
    pub fn rank_helpers(
        &self,
        pool: &[Helper],
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate<HelperId>> {
        let pool_total: u64 = pool.iter().map(|h| u64::from(h.total_assignments)).sum();

        let mut ranked: Vec<ScoredCandidate<HelperId>> = pool
            .iter()
            .map(|helper| {
                let breakdown = self.helper_breakdown(helper, pool_total, now);
                ScoredCandidate {
                    id: helper.id.clone(),
                    score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    fn driver_breakdown(&self, driver: &Driver, pool_total: u64, now: DateTime<Utc>) -> ScoreBreakdown {
        let experience = relative_share(u64::from(driver.total_deliveries), pool_total)
            * DRIVER_EXPERIENCE_WEIGHT;
        let rating = rating_points(driver.rating, DRIVER_RATING_WEIGHT);
        let recency = self.recency_points(driver.last_assignment, now, DRIVER_RECENCY_WEIGHT);
        // The repository already filters on compliance, but a stale or
        // bypassed pool must not earn the bonus for free.
        let bonus = if driver.documents.is_complete() {
            DRIVER_COMPLIANCE_BONUS
        } else {
            0.0
        };

        ScoreBreakdown {
            experience,
            rating,
            recency,
            bonus,
        }
    }

    fn helper_breakdown(&self, helper: &Helper, pool_total: u64, now: DateTime<Utc>) -> ScoreBreakdown {
        let experience = relative_share(u64::from(helper.total_assignments), pool_total)
            * HELPER_EXPERIENCE_WEIGHT;
        let rating = rating_points(helper.rating, HELPER_RATING_WEIGHT);
        let recency = self.recency_points(helper.last_assignment, now, HELPER_RECENCY_WEIGHT);
        let bonus = level_bonus(helper.level);

        ScoreBreakdown {
            experience,
            rating,
            recency,
            bonus,
        }
    }

    /// Days since the last assignment, capped at the configured window. A
    /// candidate who has never been assigned gets full recency credit.
    fn recency_points(
        &self,
        last_assignment: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        weight: f64,
    ) -> f64 {
        match last_assignment {
            None => weight,
            Some(ts) => {
                let days = (now - ts).num_seconds() as f64 / 86_400.0;
                (days / self.config.recency_cap_days).clamp(0.0, 1.0) * weight
            }
        }
    }

    /// Combined score for a resolved assignment: driver contribution weighted
    /// 60%, summed helper contributions 40%, so a larger crew raises the
    /// recorded figure. Contributions use an absolute-capped experience term
    /// plus the rating term, and helper contributions are multiplied by the
    /// level factor.
    pub fn allocation_score(&self, driver: &Driver, helpers: &[Helper]) -> f64 {
        let driver_part = capped_experience(driver.total_deliveries) * DRIVER_EXPERIENCE_WEIGHT
            + rating_points(driver.rating, DRIVER_RATING_WEIGHT);

        let helper_part: f64 = helpers
            .iter()
            .map(|helper| {
                let base = capped_experience(helper.total_assignments) * HELPER_EXPERIENCE_WEIGHT
                    + rating_points(helper.rating, HELPER_RATING_WEIGHT);
                base * level_multiplier(helper.level)
            })
            .sum();

        COMBINED_DRIVER_SHARE * driver_part + COMBINED_HELPER_SHARE * helper_part
    }
}

fn relative_share(value: u64, pool_total: u64) -> f64 {
    if pool_total == 0 {
        0.0
    } else {
        value as f64 / pool_total as f64
    }
}

fn rating_points(rating: f32, weight: f64) -> f64 {
    (f64::from(rating) / MAX_RATING).clamp(0.0, 1.0) * weight
}

fn capped_experience(count: u32) -> f64 {
    (f64::from(count) / COMBINED_EXPERIENCE_CAP).min(1.0)
}

const fn level_bonus(level: HelperLevel) -> f64 {
    match level {
        HelperLevel::Advanced => 30.0,
        HelperLevel::Standard => 20.0,
        HelperLevel::Basic => 10.0,
    }
}

const fn level_multiplier(level: HelperLevel) -> f64 {
    match level {
        HelperLevel::Advanced => 1.5,
        HelperLevel::Standard => 1.2,
        HelperLevel::Basic => 1.0,
    }
}
