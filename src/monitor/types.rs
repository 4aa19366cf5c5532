//! Canonical record types produced by the approval monitor.

use alloy::primitives::U256;
use serde::{Serialize, Serializer};

/// A large approval observed on-chain, normalized for consumers.
///
/// Created exactly once by the normalizer after threshold evaluation passes;
/// never mutated afterwards. Destroyed only by store eviction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    /// `{chain_id}-{tx_hash}-{log_index}`; unique within the store.
    pub id: String,
    pub network_id: u64,
    pub network_name: String,
    pub explorer_url: String,
    pub asset_address: String,
    pub asset_symbol: String,
    /// Account that granted the approval, exactly as observed.
    pub owner: String,
    /// Account authorized to spend.
    pub spender: String,
    /// Approval amount in base units. Serialized as a decimal string —
    /// magnitudes routinely exceed u64 and the float-safe integer range.
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub raw_value: U256,
    /// Decimal rendering of `raw_value` scaled by the asset's exponent.
    pub formatted_value: String,
    /// True when the amount is at or above the unlimited ceiling.
    pub is_unlimited: bool,
    pub transaction_hash: String,
    pub block_number: u64,
    /// Milliseconds since epoch, from the containing block header — not the
    /// local observation time.
    pub timestamp: u64,
}

fn serialize_u256_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Engine status exposed to external callers.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    pub is_monitoring: bool,
    pub event_count: usize,
    pub subscription_count: usize,
}
