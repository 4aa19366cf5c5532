//! Axum HTTP surface over the monitoring engine.
//!
//! Routes:
//!   POST /api/monitor/start   → begin monitoring (idempotent)
//!   POST /api/monitor/stop    → halt monitoring; history is retained
//!   GET  /api/monitor/status  → engine status
//!   GET  /api/events          → rolling window of approvals, newest first

use crate::labels;
use crate::monitor::{ApprovalMonitor, ApprovalRecord, MonitorStatus};
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ApiState {
    pub monitor: Arc<ApprovalMonitor>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventEntry {
    #[serde(flatten)]
    record: ApprovalRecord,
    /// Known-protocol annotation for the spender, when we have one.
    spender_label: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct EventsResponse {
    events: Vec<EventEntry>,
}

#[derive(Debug, Serialize)]
struct LifecycleResponse {
    success: bool,
    message: &'static str,
    status: MonitorStatus,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/monitor/start", post(start))
        .route("/api/monitor/stop", post(stop))
        .route("/api/monitor/status", get(status))
        .route("/api/events", get(events))
        .with_state(state)
}

async fn start(State(state): State<ApiState>) -> Json<LifecycleResponse> {
    state.monitor.start().await;
    Json(LifecycleResponse {
        success: true,
        message: "Monitoring started",
        status: state.monitor.status(),
    })
}

async fn stop(State(state): State<ApiState>) -> Json<LifecycleResponse> {
    state.monitor.stop();
    Json(LifecycleResponse {
        success: true,
        message: "Monitoring stopped",
        status: state.monitor.status(),
    })
}

async fn status(State(state): State<ApiState>) -> Json<MonitorStatus> {
    Json(state.monitor.status())
}

async fn events(State(state): State<ApiState>) -> Json<EventsResponse> {
    let events = state
        .monitor
        .events()
        .into_iter()
        .map(|record| {
            let spender_label = labels::lookup(&record.spender).map(|l| l.name);
            EventEntry {
                record,
                spender_label,
            }
        })
        .collect();
    Json(EventsResponse { events })
}

/// Serve the API until a shutdown signal arrives.
pub async fn serve(state: ApiState, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = bind_addr, "api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    #[test]
    fn test_event_entry_carries_spender_label() {
        let record = ApprovalRecord {
            id: "1-0xabc-0".to_string(),
            network_id: 1,
            network_name: "Ethereum".to_string(),
            explorer_url: "https://etherscan.io".to_string(),
            asset_address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string(),
            asset_symbol: "USDT".to_string(),
            owner: "0x1111111111111111111111111111111111111111".to_string(),
            // Uniswap V3 Router, checksummed as the normalizer renders it.
            spender: "0xE592427A0AEce92De3Edee1F18E0157C05861564".to_string(),
            raw_value: U256::from(1_000_000_000u64),
            formatted_value: "1000.000000".to_string(),
            is_unlimited: false,
            transaction_hash: "0xabc".to_string(),
            block_number: 1,
            timestamp: 0,
        };

        let spender_label = labels::lookup(&record.spender).map(|l| l.name);
        let entry = EventEntry {
            record,
            spender_label,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["spenderLabel"], "Uniswap V3 Router");
        // Flattened record fields sit alongside the annotation.
        assert_eq!(json["assetSymbol"], "USDT");
    }
}
