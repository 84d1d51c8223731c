//! Rewards catalog entries.

use serde::{Deserialize, Serialize};

use crate::RewardId;

/// Something a customer can spend points on. The catalog is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    /// Catalog identifier.
    pub id: RewardId,

    /// Short display name.
    pub name: String,

    /// What the customer gets.
    pub description: String,

    /// Price in points.
    pub points_cost: u64,

    /// Display glyph, usually a single emoji. Older records call it `image`.
    #[serde(alias = "image")]
    pub icon: String,
}

/// The catalog ordered by ascending point cost. Equal costs keep catalog order.
#[must_use]
pub fn rewards_by_cost(rewards: &[Reward]) -> Vec<&Reward> {
    let mut sorted: Vec<&Reward> = rewards.iter().collect();
    sorted.sort_by_key(|r| r.points_cost);
    sorted
}
