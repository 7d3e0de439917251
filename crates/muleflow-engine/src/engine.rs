//! Analysis orchestration.
//!
//! Sequences graph construction, the four detectors, and the aggregation
//! pass, then assembles the final report. One invocation, one complete
//! in-memory transaction set, no state across calls.

use crate::chains::ShellChainTrace;
use crate::cycles::CycleScan;
use crate::fan::{FanDirection, FanScan};
use crate::graph::TransactionGraph;
use crate::messages::{AnalysisInput, AnalysisOutput};
use crate::scoring::{DetectorFindings, RingAggregator};
use crate::types::{AnalysisReport, Transaction};
use crate::velocity::VelocityScan;
use async_trait::async_trait;
use muleflow_core::config::EngineConfig;
use muleflow_core::error::Result;
use muleflow_core::traits::BatchKernel;
use muleflow_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};
use std::time::Instant;

// ============================================================================
// Analysis Engine
// ============================================================================

/// The analysis orchestrator.
///
/// The detectors consume read-only graph structures and have no data
/// dependency on one another; they run sequentially here in the fixed
/// aggregation order. Running them in parallel is an optimization
/// opportunity, not a correctness requirement.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full detector pipeline over a transaction set.
    ///
    /// Degenerate inputs (zero transactions, a single account, no edges)
    /// yield an empty-but-valid report rather than an error.
    #[must_use]
    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisReport {
        let started = Instant::now();

        let graph = TransactionGraph::build(transactions);
        tracing::debug!(
            accounts = graph.account_count(),
            transactions = transactions.len(),
            "transaction graph built"
        );

        let findings = DetectorFindings {
            cycles: CycleScan::compute(&graph, &self.config.cycle),
            fan_in: FanScan::compute(&graph, FanDirection::In, &self.config.fan),
            fan_out: FanScan::compute(&graph, FanDirection::Out, &self.config.fan),
            chains: ShellChainTrace::compute(&graph, &self.config.shell_chain),
            high_velocity: VelocityScan::compute(&graph, &self.config.velocity),
        };
        tracing::debug!(
            cycles = findings.cycles.len(),
            fan_in = findings.fan_in.len(),
            fan_out = findings.fan_out.len(),
            chains = findings.chains.len(),
            high_velocity = findings.high_velocity.len(),
            "detector pass complete"
        );

        let (nodes, rings) = RingAggregator::aggregate(&graph, &findings);
        let edges = graph.edge_records();

        let nodes: Vec<_> = nodes.into_values().collect();
        let suspicious_accounts = nodes.iter().filter(|n| n.is_suspicious()).count();
        let report = AnalysisReport {
            total_accounts: nodes.len(),
            suspicious_accounts,
            nodes,
            rings,
            edges,
            processing_seconds: started.elapsed().as_secs_f64(),
        };

        tracing::info!(
            accounts = report.total_accounts,
            suspicious = report.suspicious_accounts,
            rings = report.rings.len(),
            "ledger analysis complete"
        );
        report
    }
}

// ============================================================================
// Ledger Analysis Kernel
// ============================================================================

/// Batch kernel wrapping the full analysis pipeline.
#[derive(Debug, Clone)]
pub struct LedgerAnalysis {
    metadata: KernelMetadata,
}

impl Default for LedgerAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerAnalysis {
    /// Create a new ledger analysis kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("compliance/ledger-analysis", Domain::Compliance)
                .with_description("Full laundering-pattern analysis over a transaction ledger")
                .with_throughput(10_000)
                .with_latency_us(5_000.0),
        }
    }
}

impl Kernel for LedgerAnalysis {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<AnalysisInput, AnalysisOutput> for LedgerAnalysis {
    async fn execute(&self, input: AnalysisInput) -> Result<AnalysisOutput> {
        let start = Instant::now();
        let engine = AnalysisEngine::with_config(input.config);
        let report = engine.analyze(&input.transactions);
        Ok(AnalysisOutput {
            report,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}
