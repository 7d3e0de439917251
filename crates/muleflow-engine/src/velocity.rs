//! Transaction-velocity detection.
//!
//! Flags accounts transacting unusually frequently within a short window,
//! counting transaction occurrences rather than distinct counterparties.

use crate::graph::TransactionGraph;
use crate::messages::{VelocityScanInput, VelocityScanOutput};
use async_trait::async_trait;
use muleflow_core::config::VelocityConfig;
use muleflow_core::error::Result;
use muleflow_core::traits::BatchKernel;
use muleflow_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};
use std::time::Instant;

// ============================================================================
// Velocity Scan Kernel
// ============================================================================

/// Transaction-velocity detection kernel.
///
/// Merges each account's sent and received transactions, sorts them by
/// timestamp, and slides an inclusive window across the sequence; the
/// account is flagged as soon as any window holds the burst threshold.
#[derive(Debug, Clone)]
pub struct VelocityScan {
    metadata: KernelMetadata,
}

impl Default for VelocityScan {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityScan {
    /// Create a new velocity scan kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("compliance/velocity-scan", Domain::Compliance)
                .with_description("Sliding-window transaction burst detection")
                .with_throughput(200_000)
                .with_latency_us(20.0),
        }
    }

    /// Detect high-velocity accounts, in account-ID order.
    pub fn compute(graph: &TransactionGraph, config: &VelocityConfig) -> Vec<String> {
        let mut flagged = Vec::new();

        for account in graph.accounts() {
            let mut timestamps: Vec<u64> = graph
                .transactions_of(account)
                .map(|tx| tx.timestamp)
                .collect();
            timestamps.sort_unstable();

            if Self::has_burst(&timestamps, config) {
                flagged.push(account.clone());
            }
        }

        flagged
    }

    fn has_burst(timestamps: &[u64], config: &VelocityConfig) -> bool {
        for (start, &window_start) in timestamps.iter().enumerate() {
            let window_end = window_start.saturating_add(config.window_seconds);
            let count = timestamps[start..]
                .iter()
                .take_while(|&&timestamp| timestamp <= window_end)
                .count();
            if count >= config.burst_threshold {
                return true;
            }
        }
        false
    }
}

impl Kernel for VelocityScan {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<VelocityScanInput, VelocityScanOutput> for VelocityScan {
    async fn execute(&self, input: VelocityScanInput) -> Result<VelocityScanOutput> {
        let start = Instant::now();
        let graph = TransactionGraph::build(&input.transactions);
        let flagged = Self::compute(&graph, &input.config);
        Ok(VelocityScanOutput {
            flagged,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}
