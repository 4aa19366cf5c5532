//! Converts raw observed approvals into canonical records.

use crate::config::{AssetConfig, NetworkConfig};
use crate::monitor::abi::RawApproval;
use crate::monitor::threshold::PairThresholds;
use crate::monitor::types::ApprovalRecord;
use alloy::primitives::utils::format_units;
use tracing::debug;

/// Evaluate a raw approval against the pair's thresholds and build the
/// canonical record.
///
/// Returns None when the value is below threshold — an event we don't
/// surface, not an error. The block timestamp is resolved by the caller
/// (it needs a network round trip); everything here is pure. A record is
/// never produced for a below-threshold value.
pub fn normalize(
    raw: &RawApproval,
    network: &NetworkConfig,
    asset: &AssetConfig,
    thresholds: &PairThresholds,
    block_timestamp_ms: u64,
) -> Option<ApprovalRecord> {
    if raw.value < thresholds.threshold_base {
        debug!(
            asset = %asset.symbol,
            network = %network.name,
            value = %raw.value,
            "approval below threshold, skipped"
        );
        return None;
    }

    let is_unlimited = raw.value >= thresholds.unlimited_base;

    // Config validation caps the exponent, so formatting can only fail on a
    // hand-built asset; fall back to the bare integer rather than dropping.
    let formatted_value =
        format_units(raw.value, asset.decimals).unwrap_or_else(|_| raw.value.to_string());

    Some(ApprovalRecord {
        id: format!(
            "{}-{}-{}",
            network.chain_id, raw.transaction_hash, raw.log_index
        ),
        network_id: network.chain_id,
        network_name: network.name.clone(),
        explorer_url: network.explorer_url.clone(),
        asset_address: asset.address.clone(),
        asset_symbol: asset.symbol.clone(),
        owner: raw.owner.to_string(),
        spender: raw.spender.to_string(),
        raw_value: raw.value,
        formatted_value,
        is_unlimited,
        transaction_hash: raw.transaction_hash.to_string(),
        block_number: raw.block_number,
        timestamp: block_timestamp_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, U256};

    fn network() -> NetworkConfig {
        NetworkConfig {
            chain_id: 1,
            name: "Ethereum".to_string(),
            ws_url: "wss://ethereum-rpc.publicnode.com".to_string(),
            explorer_url: "https://etherscan.io".to_string(),
            assets: Vec::new(),
        }
    }

    fn asset() -> AssetConfig {
        AssetConfig {
            address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string(),
            symbol: "USDT".to_string(),
            decimals: 6,
            threshold: "1000".to_string(),
        }
    }

    fn raw(value: U256, log_index: u64) -> RawApproval {
        RawApproval {
            owner: address!("1111111111111111111111111111111111111111"),
            spender: address!("2222222222222222222222222222222222222222"),
            value,
            transaction_hash: b256!(
                "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
            ),
            block_number: 19_000_000,
            log_index,
        }
    }

    fn thresholds() -> PairThresholds {
        PairThresholds::for_asset(&asset()).unwrap()
    }

    #[test]
    fn test_below_threshold_skipped() {
        // 999 USDT at 6 decimals.
        let record = normalize(
            &raw(U256::from(999_000_000u64), 0),
            &network(),
            &asset(),
            &thresholds(),
            0,
        );
        assert!(record.is_none());
    }

    #[test]
    fn test_exactly_at_threshold_recorded() {
        let record = normalize(
            &raw(U256::from(1_000_000_000u64), 0),
            &network(),
            &asset(),
            &thresholds(),
            1_700_000_000_000,
        )
        .expect("at-threshold approval must be recorded");

        assert_eq!(record.raw_value, U256::from(1_000_000_000u64));
        assert_eq!(record.formatted_value, "1000.000000");
        assert!(!record.is_unlimited);
        assert_eq!(record.network_name, "Ethereum");
        assert_eq!(record.asset_symbol, "USDT");
        assert_eq!(record.timestamp, 1_700_000_000_000);
        assert_eq!(record.block_number, 19_000_000);
    }

    #[test]
    fn test_unlimited_boundary() {
        // Ten billion human units at 6 decimals = 10^16 base units.
        let ceiling = U256::from(10u8).pow(U256::from(16u8));

        let at = normalize(&raw(ceiling, 0), &network(), &asset(), &thresholds(), 0).unwrap();
        assert!(at.is_unlimited);
        assert_eq!(at.formatted_value, "10000000000.000000");

        let below = normalize(
            &raw(ceiling - U256::from(1u8), 1),
            &network(),
            &asset(),
            &thresholds(),
            0,
        )
        .unwrap();
        assert!(!below.is_unlimited);
    }

    #[test]
    fn test_distinct_log_indices_distinct_ids() {
        let value = U256::from(2_000_000_000u64);
        let first = normalize(&raw(value, 1), &network(), &asset(), &thresholds(), 0).unwrap();
        let second = normalize(&raw(value, 2), &network(), &asset(), &thresholds(), 0).unwrap();

        // Same transaction hash, different log index.
        assert_eq!(first.transaction_hash, second.transaction_hash);
        assert_ne!(first.id, second.id);
        assert_eq!(
            first.id,
            format!("1-{}-1", raw(value, 1).transaction_hash)
        );
    }

    #[test]
    fn test_addresses_rendered_checksummed() {
        let record = normalize(
            &raw(U256::from(1_000_000_000u64), 0),
            &network(),
            &asset(),
            &thresholds(),
            0,
        )
        .unwrap();
        assert_eq!(record.owner, raw(U256::ZERO, 0).owner.to_string());
        assert!(record.owner.starts_with("0x"));
    }
}
