use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A point-in-time measurement of a market's aggregate state at a given
/// block. Snapshots are cumulative market state, not per-period deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub block_number: u64,
    #[serde(default)]
    pub soft_liq_count: u64,
    #[serde(default)]
    pub total_positions: u64,
    #[serde(default)]
    pub ignored_positions: u64,
    #[serde(default)]
    pub total_collateral_usd: f64,
    #[serde(default)]
    pub position_details: Option<HashMap<String, PositionDetail>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDetail {
    #[serde(default)]
    pub total_usd: f64,
}

impl Snapshot {
    /// Volume from per-position details when present, the aggregate
    /// collateral figure otherwise.
    pub fn detailed_volume(&self) -> f64 {
        match &self.position_details {
            Some(details) => details.values().map(|p| p.total_usd).sum(),
            None => self.total_collateral_usd,
        }
    }

    /// Hard-liquidation count derived by subtraction, clamped to zero.
    /// Used only when the cache carries no explicit event list.
    pub fn derived_hard_count(&self) -> u64 {
        self.total_positions
            .saturating_sub(self.soft_liq_count + self.ignored_positions)
    }
}
