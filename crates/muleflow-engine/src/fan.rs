//! Smurfing (fan-in/fan-out) detection.
//!
//! One sliding-window algorithm parameterized by direction: fan-in finds
//! accounts aggregating funds from many distinct senders, fan-out finds
//! accounts distributing funds to many distinct receivers.

use crate::graph::TransactionGraph;
use crate::messages::{FanScanInput, FanScanOutput};
use async_trait::async_trait;
use muleflow_core::config::FanConfig;
use muleflow_core::error::Result;
use muleflow_core::traits::BatchKernel;
use muleflow_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};
use serde::{Deserialize, Serialize};
use std::time::Instant;

// ============================================================================
// Fan Scan Kernel
// ============================================================================

/// Direction of fund aggregation to scan for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FanDirection {
    /// Many distinct senders into one receiver (aggregator).
    In,
    /// One sender into many distinct receivers (distributor).
    Out,
}

/// A flagged hub account with the counterparties seen in its first
/// qualifying window, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanHub {
    /// The aggregating or distributing account.
    pub account: String,
    /// Distinct counterparties in the first qualifying window.
    pub counterparties: Vec<String>,
}

/// Fan-in/fan-out detection kernel.
///
/// For each candidate hub, its directional transactions are sorted by
/// timestamp (stable; tie order follows input order) and each index is
/// tried as a window start. The first window reaching the distinct
/// counterparty threshold flags the account and records that window's
/// counterparty set; scanning for that account then stops. An account can
/// be flagged as an aggregator and a distributor independently.
#[derive(Debug, Clone)]
pub struct FanScan {
    metadata: KernelMetadata,
}

impl Default for FanScan {
    fn default() -> Self {
        Self::new()
    }
}

impl FanScan {
    /// Create a new fan scan kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("compliance/fan-scan", Domain::Compliance)
                .with_description("Sliding-window fan-in/fan-out aggregation detection")
                .with_throughput(100_000)
                .with_latency_us(50.0),
        }
    }

    /// Detect hub accounts in the given direction.
    ///
    /// Window bounds are inclusive and the threshold check is `>=`.
    pub fn compute(
        graph: &TransactionGraph,
        direction: FanDirection,
        config: &FanConfig,
    ) -> Vec<FanHub> {
        let mut hubs = Vec::new();

        for account in graph.accounts() {
            // (timestamp, counterparty) pairs for the scanned direction.
            let mut legs: Vec<(u64, &str)> = graph
                .transactions_of(account)
                .filter_map(|tx| match direction {
                    FanDirection::In if tx.receiver == *account => {
                        Some((tx.timestamp, tx.sender.as_str()))
                    }
                    FanDirection::Out if tx.sender == *account => {
                        Some((tx.timestamp, tx.receiver.as_str()))
                    }
                    _ => None,
                })
                .collect();
            legs.sort_by_key(|&(timestamp, _)| timestamp);

            if let Some(counterparties) = Self::first_qualifying_window(&legs, config) {
                hubs.push(FanHub {
                    account: account.clone(),
                    counterparties,
                });
            }
        }

        hubs
    }

    /// Scan window starts in order; return the distinct counterparties of
    /// the earliest window meeting the threshold.
    fn first_qualifying_window(legs: &[(u64, &str)], config: &FanConfig) -> Option<Vec<String>> {
        for (start, &(window_start, _)) in legs.iter().enumerate() {
            let window_end = window_start.saturating_add(config.window_seconds);
            let mut distinct: Vec<&str> = Vec::new();

            for &(timestamp, counterparty) in &legs[start..] {
                if timestamp > window_end {
                    break;
                }
                if !distinct.contains(&counterparty) {
                    distinct.push(counterparty);
                }
            }

            if distinct.len() >= config.counterparty_threshold {
                return Some(distinct.into_iter().map(String::from).collect());
            }
        }
        None
    }
}

impl Kernel for FanScan {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<FanScanInput, FanScanOutput> for FanScan {
    async fn execute(&self, input: FanScanInput) -> Result<FanScanOutput> {
        let start = Instant::now();
        let graph = TransactionGraph::build(&input.transactions);
        let hubs = Self::compute(&graph, input.direction, &input.config);
        Ok(FanScanOutput {
            hubs,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}
