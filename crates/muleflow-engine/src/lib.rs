//! # Muleflow Engine
//!
//! Money-laundering pattern detection over an in-memory transaction
//! ledger. One invocation takes a complete transaction set and produces a
//! deterministic, explainable report: per-account suspicion scores,
//! detected-pattern tags, and a registry of fraud rings.
//!
//! ## Kernels
//!
//! - `CycleScan` - bounded simple-cycle enumeration (circular routing)
//! - `FanScan` - sliding-window fan-in/fan-out aggregation (smurfing)
//! - `ShellChainTrace` - layered transfers through shell intermediaries
//! - `VelocityScan` - transaction burst detection
//! - `LedgerAnalysis` - the full pipeline behind one batch surface
//!
//! ## Pipeline
//!
//! Records flow strictly forward: transactions into the graph builder,
//! the four detectors over the read-only graph, then the ring aggregator
//! and the assembled report. Scoring order is fixed (cycles, fan-in,
//! fan-out, shell chains, velocity) so "first ring wins" attribution is
//! reproducible.

#![warn(missing_docs)]

pub mod chains;
pub mod cycles;
pub mod engine;
pub mod factory;
pub mod fan;
pub mod graph;
pub mod messages;
pub mod records;
pub mod scoring;
pub mod types;
pub mod velocity;

pub use chains::{ShellChain, ShellChainTrace};
pub use cycles::CycleScan;
pub use engine::{AnalysisEngine, LedgerAnalysis};
pub use fan::{FanDirection, FanHub, FanScan};
pub use graph::TransactionGraph;
pub use records::{parse_records, parse_records_from_path, ParsedLedger};
pub use scoring::{DetectorFindings, RingAggregator};
pub use types::{
    AccountNode, AnalysisReport, EdgeRecord, FraudRing, RingPattern, Transaction,
};
pub use velocity::VelocityScan;
