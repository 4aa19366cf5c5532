//! Per-asset comparison values in base units.

use crate::config::AssetConfig;
use alloy::primitives::utils::{parse_units, UnitsError};
use alloy::primitives::U256;

/// Approvals at or above ten billion human units are conventionally
/// "unlimited" — no practical spending limit.
pub const UNLIMITED_UNITS: &str = "10000000000";

/// Precomputed comparison values for one (network, asset) pair.
///
/// Computed once when the pair's subscription is established, not per event.
/// Pure function of configuration; a malformed threshold is rejected at
/// config load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairThresholds {
    /// Configured human threshold scaled to base units.
    pub threshold_base: U256,
    /// Unlimited ceiling scaled to base units.
    pub unlimited_base: U256,
}

impl PairThresholds {
    pub fn for_asset(asset: &AssetConfig) -> Result<Self, UnitsError> {
        let threshold_base = parse_units(&asset.threshold, asset.decimals)?.get_absolute();
        let unlimited_base = parse_units(UNLIMITED_UNITS, asset.decimals)?.get_absolute();
        Ok(Self {
            threshold_base,
            unlimited_base,
        })
    }
}
