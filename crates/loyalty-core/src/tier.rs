//! Tier policy for the loyalty ledger.
//!
//! A tier is a named band over the point line. The standard policy is:
//!
//! | Tier   | Points       |
//! |--------|--------------|
//! | Bronze | 0 – 499      |
//! | Silver | 500 – 999    |
//! | Gold   | 1000 and up  |
//!
//! Bands are contiguous and exhaustive, so every balance maps to exactly one tier.
//! [`TierPolicy::new`] enforces that for custom band lists.

use serde::{Deserialize, Serialize};

use crate::error::{LoyaltyError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Lowest balance in the Bronze tier.
pub const BRONZE_MIN_POINTS: u64 = 0;

/// Lowest balance in the Silver tier.
pub const SILVER_MIN_POINTS: u64 = 500;

/// Lowest balance in the Gold tier.
pub const GOLD_MIN_POINTS: u64 = 1000;

/// A named, inclusive band of point balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    /// Display name, e.g. "Silver".
    pub name: String,

    /// Lowest balance in the band.
    pub min: u64,

    /// Highest balance in the band; `None` for the open-ended top band.
    #[serde(default)]
    pub max: Option<u64>,
}

impl TierBand {
    /// Create a band.
    #[must_use]
    pub fn new(name: impl Into<String>, min: u64, max: Option<u64>) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Check whether a balance falls inside this band.
    #[must_use]
    pub fn contains(&self, points: u64) -> bool {
        points >= self.min && self.max.map_or(true, |max| points <= max)
    }

    /// The label used for rewards that need this tier, e.g. "Silver+".
    #[must_use]
    pub fn plus_label(&self) -> String {
        format!("{}+", self.name)
    }
}

/// An ordered, validated set of tier bands.
///
/// The policy owns no mutable state and is cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TierBand>", into = "Vec<TierBand>")]
pub struct TierPolicy {
    bands: Vec<TierBand>,
}

impl TierPolicy {
    /// Build a policy from bands listed in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::Configuration`] unless the bands start at zero,
    /// follow each other without gap or overlap, end with a single open-ended
    /// band, and have distinct non-blank names.
    pub fn new(bands: Vec<TierBand>) -> Result<Self> {
        let Some(first) = bands.first() else {
            return Err(LoyaltyError::Configuration("tier list is empty".into()));
        };
        if first.min != 0 {
            return Err(LoyaltyError::Configuration(format!(
                "lowest tier {} must start at 0, not {}",
                first.name, first.min
            )));
        }

        for (i, band) in bands.iter().enumerate() {
            if band.name.trim().is_empty() {
                return Err(LoyaltyError::Configuration(format!(
                    "tier at position {i} has no name"
                )));
            }
            if bands[..i].iter().any(|b| b.name == band.name) {
                return Err(LoyaltyError::Configuration(format!(
                    "duplicate tier name {}",
                    band.name
                )));
            }

            match (band.max, bands.get(i + 1)) {
                (Some(max), Some(next)) => {
                    if max < band.min {
                        return Err(LoyaltyError::Configuration(format!(
                            "tier {} ends at {max} before it starts at {}",
                            band.name, band.min
                        )));
                    }
                    if max.checked_add(1) != Some(next.min) {
                        return Err(LoyaltyError::Configuration(format!(
                            "tier {} ends at {max} but {} starts at {}",
                            band.name, next.name, next.min
                        )));
                    }
                }
                (None, Some(_)) => {
                    return Err(LoyaltyError::Configuration(format!(
                        "only the last tier may be open-ended, {} is not last",
                        band.name
                    )));
                }
                (Some(max), None) => {
                    return Err(LoyaltyError::Configuration(format!(
                        "top tier {} must be open-ended, not capped at {max}",
                        band.name
                    )));
                }
                (None, None) => {}
            }
        }

        Ok(Self { bands })
    }

    /// The Bronze / Silver / Gold policy.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bands: vec![
                TierBand::new("Bronze", BRONZE_MIN_POINTS, Some(SILVER_MIN_POINTS - 1)),
                TierBand::new("Silver", SILVER_MIN_POINTS, Some(GOLD_MIN_POINTS - 1)),
                TierBand::new("Gold", GOLD_MIN_POINTS, None),
            ],
        }
    }

    /// All bands, lowest first.
    #[must_use]
    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    /// Look up a band by its exact name.
    #[must_use]
    pub fn band_named(&self, name: &str) -> Option<&TierBand> {
        self.bands.iter().find(|b| b.name == name)
    }

    fn index_of(&self, points: u64) -> usize {
        self.bands
            .iter()
            .position(|b| b.contains(points))
            .unwrap_or(0)
    }

    /// The tier a balance belongs to.
    #[must_use]
    pub fn tier_of(&self, points: u64) -> &TierBand {
        &self.bands[self.index_of(points)]
    }

    /// The tier directly above the balance's tier, if there is one.
    #[must_use]
    pub fn next_tier_of(&self, points: u64) -> Option<&TierBand> {
        self.bands.get(self.index_of(points) + 1)
    }

    /// Percentage of the way from the current tier's floor to the next tier's floor.
    ///
    /// Returns 100 once the top tier is reached. The result is rounded to the
    /// nearest integer, halves rounding up.
    #[must_use]
    pub fn progress_to_next(&self, points: u64) -> u8 {
        let current = self.tier_of(points);
        let Some(next) = self.next_tier_of(points) else {
            return 100;
        };

        let gap = next.min - current.min;
        let progressed = points - current.min;
        let percent = progressed
            .saturating_mul(200)
            .saturating_add(gap)
            / gap.saturating_mul(2);

        u8::try_from(percent.min(100)).unwrap_or(100)
    }

    /// Points still needed to reach the next tier, or `None` at the top tier.
    #[must_use]
    pub fn points_to_next(&self, points: u64) -> Option<u64> {
        self.next_tier_of(points)
            .map(|next| next.min.saturating_sub(points))
    }

    /// The lowest tier whose members can afford a reward of the given cost.
    #[must_use]
    pub fn required_tier(&self, points_cost: u64) -> &TierBand {
        self.tier_of(points_cost)
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<TierBand>> for TierPolicy {
    type Error = LoyaltyError;

    fn try_from(bands: Vec<TierBand>) -> Result<Self> {
        Self::new(bands)
    }
}

impl From<TierPolicy> for Vec<TierBand> {
    fn from(policy: TierPolicy) -> Self {
        policy.bands
    }
}
