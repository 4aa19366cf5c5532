//! ERC-20 Approval event ABI: topic hash and manual log decoding.
//!
//! We only need the one event, so the ABI surface is a pre-computed topic0
//! hash used in eth_subscribe log filters plus a hand-rolled decoder.

use alloy::primitives::{b256, Address, B256, U256};
use alloy::rpc::types::Log;

/// keccak256("Approval(address,address,uint256)")
pub const APPROVAL_TOPIC: B256 =
    b256!("8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925");

/// Compute keccak256 hash of a byte slice.
pub fn keccak256(data: &[u8]) -> B256 {
    use tiny_keccak::{Hasher, Keccak};
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    B256::from(output)
}

/// A raw observed approval, decoded from a log but not yet evaluated.
#[derive(Debug, Clone)]
pub struct RawApproval {
    pub owner: Address,
    pub spender: Address,
    /// Approved amount in base units (uint256).
    pub value: U256,
    pub transaction_hash: B256,
    pub block_number: u64,
    pub log_index: u64,
}

/// Decode an `Approval(address indexed owner, address indexed spender,
/// uint256 value)` log.
///
/// Topics: [sig, owner, spender]; data: value (one uint256 word). Returns
/// None for anything that doesn't match that shape.
pub fn decode_approval(log: &Log) -> Option<RawApproval> {
    let topics = log.topics();
    if topics.len() < 3 || topics[0] != APPROVAL_TOPIC {
        return None;
    }

    // Indexed addresses are 32-byte words with the address in the low 20 bytes.
    let owner = Address::from_slice(&topics[1].0[12..]);
    let spender = Address::from_slice(&topics[2].0[12..]);

    let data = &log.data().data;
    if data.len() < 32 {
        return None;
    }
    let bytes: [u8; 32] = data[0..32].try_into().unwrap_or([0u8; 32]);
    let value = U256::from_be_bytes(bytes);

    Some(RawApproval {
        owner,
        spender,
        value,
        transaction_hash: log.transaction_hash.unwrap_or_default(),
        block_number: log.block_number.unwrap_or(0),
        log_index: log.log_index.unwrap_or(0),
    })
}
