//! Per-(network, asset) approval subscriptions.
//!
//! Each open subscription is an owned handle over the tokio task draining
//! its log stream; aborting the task is the single teardown operation.
//! Pairs succeed or fail independently — one unreachable endpoint never
//! blocks the rest.

use crate::config::{AssetConfig, NetworkConfig};
use crate::monitor::abi::{self, APPROVAL_TOPIC};
use crate::monitor::normalize;
use crate::monitor::threshold::PairThresholds;
use crate::store::ApprovalStore;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::{BlockNumberOrTag, Filter, Log};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One live (network, asset) subscription.
#[derive(Debug)]
pub struct SubscriptionHandle {
    pub network_id: u64,
    pub asset_symbol: String,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    /// The delivery task is still running (the stream hasn't ended).
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Tear down the subscription. No new deliveries begin after this
    /// returns; an in-flight normalization may still complete.
    pub fn close(self) {
        self.task.abort();
    }
}

/// Outcome of one subscription attempt. Kept per pair so a failure can be
/// reported without masking the pairs that did register.
#[derive(Debug)]
pub enum PairOutcome {
    Subscribed(SubscriptionHandle),
    Failed {
        network_id: u64,
        asset_symbol: String,
        error: anyhow::Error,
    },
}

/// The set of active subscriptions, owned by the lifecycle controller.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    active: Vec<SubscriptionHandle>,
}

impl SubscriptionSet {
    pub fn add(&mut self, handle: SubscriptionHandle) {
        self.active.push(handle);
    }

    /// Subscriptions whose delivery task is still live.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|h| h.is_active()).count()
    }

    /// Tear down every subscription and clear the set. Calling this with an
    /// empty set is a no-op. Returns the number closed.
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        for handle in self.active.drain(..) {
            debug!(
                network = handle.network_id,
                asset = %handle.asset_symbol,
                "closing subscription"
            );
            handle.close();
            closed += 1;
        }
        closed
    }
}

/// Establish the approval subscription for one (network, asset) pair and
/// spawn its delivery task.
///
/// The liveness check and the subscription itself both happen before the
/// task is spawned, so a dead endpoint or unresponsive contract fails here
/// and the pair is skipped by the caller.
pub async fn open(
    provider: DynProvider,
    network: NetworkConfig,
    asset: AssetConfig,
    store: ApprovalStore,
) -> anyhow::Result<SubscriptionHandle> {
    let chain_id = provider.get_chain_id().await?;
    if chain_id != network.chain_id {
        warn!(
            network = %network.name,
            configured = network.chain_id,
            reported = chain_id,
            "endpoint reports a different chain id"
        );
    }

    let token: Address = asset.address.parse()?;
    let thresholds = PairThresholds::for_asset(&asset)?;

    let filter = Filter::new().address(token).event_signature(APPROVAL_TOPIC);
    let sub = provider.subscribe_logs(&filter).await?;

    info!(
        network = %network.name,
        asset = %asset.symbol,
        threshold = %asset.threshold,
        "monitoring approvals"
    );

    let network_id = network.chain_id;
    let asset_symbol = asset.symbol.clone();

    let task = tokio::spawn(async move {
        let mut stream = sub.into_stream();
        while let Some(log) = stream.next().await {
            if let Err(e) =
                process_log(&provider, &network, &asset, &thresholds, &store, &log).await
            {
                // One bad event never tears down the subscription.
                warn!(
                    network = %network.name,
                    asset = %asset.symbol,
                    error = %e,
                    "failed to process approval log, event dropped"
                );
            }
        }
        // Stream ended: the endpoint dropped us. No automatic resubscribe —
        // a lifecycle restart is the recovery path.
        warn!(
            network = %network.name,
            asset = %asset.symbol,
            "approval subscription stream ended"
        );
    });

    Ok(SubscriptionHandle {
        network_id,
        asset_symbol,
        task,
    })
}

/// Process a single observed log: decode, gate on threshold, resolve the
/// block timestamp, normalize, store.
async fn process_log(
    provider: &DynProvider,
    network: &NetworkConfig,
    asset: &AssetConfig,
    thresholds: &PairThresholds,
    store: &ApprovalStore,
    log: &Log,
) -> anyhow::Result<()> {
    let raw = match abi::decode_approval(log) {
        Some(raw) => raw,
        None => {
            debug!(topic0 = ?log.topic0(), "ignoring non-approval log");
            return Ok(());
        }
    };

    debug!(
        network = %network.name,
        asset = %asset.symbol,
        owner = %raw.owner,
        spender = %raw.spender,
        value = %raw.value,
        "approval observed"
    );

    // Gate before the block lookup so below-threshold chatter costs no
    // round trip; the normalizer re-checks as its own guarantee.
    if raw.value < thresholds.threshold_base {
        debug!(
            asset = %asset.symbol,
            value = %raw.value,
            "approval below threshold, skipped"
        );
        return Ok(());
    }

    let timestamp_ms = resolve_block_timestamp_ms(provider, raw.block_number).await?;

    if let Some(record) = normalize::normalize(&raw, network, asset, thresholds, timestamp_ms) {
        store.insert(record);
    }
    Ok(())
}

/// Resolve the containing block to millisecond timestamp. Fails
/// independently of the event itself; the caller logs and drops.
async fn resolve_block_timestamp_ms(
    provider: &DynProvider,
    block_number: u64,
) -> anyhow::Result<u64> {
    let block = provider
        .get_block_by_number(BlockNumberOrTag::Number(block_number))
        .await?
        .ok_or_else(|| anyhow::anyhow!("block {block_number} not found"))?;
    Ok(block.header.timestamp * 1000)
}
