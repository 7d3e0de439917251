//! Input and output envelopes for batch kernel execution.
//!
//! These are the serializable request/response shapes embedding
//! applications use to invoke the detectors and the full analysis.

use crate::chains::ShellChain;
use crate::fan::{FanDirection, FanHub};
use crate::types::{AnalysisReport, Transaction};
use muleflow_core::config::{
    CycleConfig, EngineConfig, FanConfig, ShellChainConfig, VelocityConfig,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Detector Messages
// ============================================================================

/// Cycle scan input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleScanInput {
    /// Transactions to analyze.
    pub transactions: Vec<Transaction>,
    /// Detector configuration.
    pub config: CycleConfig,
}

impl CycleScanInput {
    /// Create a new input with default configuration.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            config: CycleConfig::default(),
        }
    }

    /// Set the detector configuration.
    pub fn with_config(mut self, config: CycleConfig) -> Self {
        self.config = config;
        self
    }
}

/// Cycle scan output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleScanOutput {
    /// Detected cycles as visited account sequences.
    pub cycles: Vec<Vec<String>>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

/// Fan scan input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanScanInput {
    /// Transactions to analyze.
    pub transactions: Vec<Transaction>,
    /// Aggregation direction to scan.
    pub direction: FanDirection,
    /// Detector configuration.
    pub config: FanConfig,
}

impl FanScanInput {
    /// Create a new input with default configuration.
    pub fn new(transactions: Vec<Transaction>, direction: FanDirection) -> Self {
        Self {
            transactions,
            direction,
            config: FanConfig::default(),
        }
    }

    /// Set the detector configuration.
    pub fn with_config(mut self, config: FanConfig) -> Self {
        self.config = config;
        self
    }
}

/// Fan scan output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanScanOutput {
    /// Flagged hub accounts with their counterparty lists.
    pub hubs: Vec<FanHub>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

/// Shell-chain trace input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellChainInput {
    /// Transactions to analyze.
    pub transactions: Vec<Transaction>,
    /// Detector configuration.
    pub config: ShellChainConfig,
}

impl ShellChainInput {
    /// Create a new input with default configuration.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            config: ShellChainConfig::default(),
        }
    }

    /// Set the detector configuration.
    pub fn with_config(mut self, config: ShellChainConfig) -> Self {
        self.config = config;
        self
    }
}

/// Shell-chain trace output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellChainOutput {
    /// Detected layered chains.
    pub chains: Vec<ShellChain>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

/// Velocity scan input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityScanInput {
    /// Transactions to analyze.
    pub transactions: Vec<Transaction>,
    /// Detector configuration.
    pub config: VelocityConfig,
}

impl VelocityScanInput {
    /// Create a new input with default configuration.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            config: VelocityConfig::default(),
        }
    }

    /// Set the detector configuration.
    pub fn with_config(mut self, config: VelocityConfig) -> Self {
        self.config = config;
        self
    }
}

/// Velocity scan output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityScanOutput {
    /// Accounts flagged for abnormal transaction velocity.
    pub flagged: Vec<String>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

// ============================================================================
// Full Analysis Messages
// ============================================================================

/// Full-analysis input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Transactions to analyze.
    pub transactions: Vec<Transaction>,
    /// Engine configuration.
    pub config: EngineConfig,
}

impl AnalysisInput {
    /// Create a new input with default configuration.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            config: EngineConfig::default(),
        }
    }

    /// Set the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// Full-analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// The assembled report.
    pub report: AnalysisReport,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}
