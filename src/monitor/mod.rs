//! Cross-chain approval monitoring engine.
//!
//! Watches every configured (network, asset) pair for ERC-20 `Approval`
//! events at or above the pair's threshold and records them in the bounded
//! store.
//!
//! Architecture:
//! - `ApprovalMonitor`: lifecycle controller. Connects to each network's
//!   WebSocket RPC eagerly at construction; `start`/`stop` open and tear
//!   down per-pair subscriptions and are idempotent.
//! - `subscription`: owns each live subscription as a handle wrapping the
//!   tokio task that drains its log stream. Pairs fail independently.
//! - `threshold`: per-asset comparison values in base units, computed once
//!   at subscription setup.
//! - `normalize`: raw log + block timestamp → canonical `ApprovalRecord`.
//! - Records land in the injected `ApprovalStore`; consumers poll it and
//!   the status accessor, never the subscriptions themselves.

pub mod abi;
pub mod normalize;
pub mod subscription;
pub mod threshold;
pub mod types;

pub use types::{ApprovalRecord, MonitorStatus};

use crate::config::Config;
use crate::monitor::subscription::{PairOutcome, SubscriptionSet};
use crate::store::ApprovalStore;
use alloy::providers::{DynProvider, Provider, ProviderBuilder, WsConnect};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{error, info, warn};

/// The monitoring engine. Construct once, share behind an `Arc`.
pub struct ApprovalMonitor {
    config: Config,
    /// One connection per network, created eagerly and reused for every
    /// subscription on that network. Read-only after construction.
    providers: HashMap<u64, DynProvider>,
    store: ApprovalStore,
    subscriptions: Mutex<SubscriptionSet>,
    monitoring: AtomicBool,
}

impl ApprovalMonitor {
    /// Connect to every configured network. A network whose endpoint is
    /// unreachable is logged and left without a provider; subscription
    /// attempts against it fail independently at `start` without blocking
    /// the rest. Connections are not retried.
    pub async fn connect(config: Config, store: ApprovalStore) -> Self {
        let mut providers = HashMap::new();
        for network in &config.networks {
            let ws = WsConnect::new(&network.ws_url);
            match ProviderBuilder::new().connect_ws(ws).await {
                Ok(provider) => {
                    info!(network = %network.name, chain_id = network.chain_id, "connected");
                    providers.insert(network.chain_id, provider.erased());
                }
                Err(e) => {
                    error!(
                        network = %network.name,
                        url = %network.ws_url,
                        error = %e,
                        "failed to connect, its assets will be skipped"
                    );
                }
            }
        }

        Self {
            config,
            providers,
            store,
            subscriptions: Mutex::new(SubscriptionSet::default()),
            monitoring: AtomicBool::new(false),
        }
    }

    /// Open a subscription for every configured (network, asset) pair.
    ///
    /// Idempotent: a second call while monitoring is a logged no-op. The
    /// engine transitions to monitoring regardless of individual pair
    /// failures; callers observe those as a reduced subscription count.
    pub async fn start(&self) {
        if self.monitoring.swap(true, Ordering::SeqCst) {
            info!("monitoring is already active");
            return;
        }

        info!("starting approval monitoring");

        let mut outcomes = Vec::with_capacity(self.config.pair_count());
        for network in &self.config.networks {
            let Some(provider) = self.providers.get(&network.chain_id) else {
                for asset in &network.assets {
                    outcomes.push(PairOutcome::Failed {
                        network_id: network.chain_id,
                        asset_symbol: asset.symbol.clone(),
                        error: anyhow::anyhow!("no connection to {}", network.name),
                    });
                }
                continue;
            };

            for asset in &network.assets {
                let outcome = match subscription::open(
                    provider.clone(),
                    network.clone(),
                    asset.clone(),
                    self.store.clone(),
                )
                .await
                {
                    Ok(handle) => PairOutcome::Subscribed(handle),
                    Err(error) => PairOutcome::Failed {
                        network_id: network.chain_id,
                        asset_symbol: asset.symbol.clone(),
                        error,
                    },
                };
                outcomes.push(outcome);
            }
        }

        let mut subscribed = 0usize;
        {
            let mut subs = self
                .subscriptions
                .lock()
                .expect("subscription set mutex poisoned");
            for outcome in outcomes {
                match outcome {
                    PairOutcome::Subscribed(handle) => {
                        subs.add(handle);
                        subscribed += 1;
                    }
                    PairOutcome::Failed {
                        network_id,
                        asset_symbol,
                        error,
                    } => {
                        warn!(
                            network = network_id,
                            asset = %asset_symbol,
                            error = %error,
                            "subscription setup failed, pair skipped"
                        );
                    }
                }
            }
            // A stop() that raced this start() wins: nothing opened here
            // may outlive it.
            if !self.monitoring.load(Ordering::SeqCst) {
                subs.close_all();
                info!("monitoring stopped during startup, subscriptions closed");
                return;
            }
        }

        info!(
            subscribed,
            total = self.config.pair_count(),
            "approval monitoring started"
        );
    }

    /// Tear down every subscription. Idempotent. The event store is not
    /// cleared — history persists across stop/start cycles within the
    /// process lifetime.
    pub fn stop(&self) {
        if !self.monitoring.swap(false, Ordering::SeqCst) {
            info!("monitoring is not active");
            return;
        }

        let closed = self
            .subscriptions
            .lock()
            .expect("subscription set mutex poisoned")
            .close_all();
        info!(closed, "approval monitoring stopped");
    }

    pub fn status(&self) -> MonitorStatus {
        let subscription_count = self
            .subscriptions
            .lock()
            .expect("subscription set mutex poisoned")
            .active_count();
        MonitorStatus {
            is_monitoring: self.monitoring.load(Ordering::SeqCst),
            event_count: self.store.len(),
            subscription_count,
        }
    }

    /// Current history, newest first.
    pub fn events(&self) -> Vec<ApprovalRecord> {
        self.store.snapshot()
    }
}
