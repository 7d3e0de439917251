//! Ledger analysis types and data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// Transaction Types
// ============================================================================

/// A validated money-transfer record.
///
/// Supplied by the upstream record source; the engine performs no further
/// validation. Records sharing an `id` are the same logical transfer for
/// counting purposes. Self-transfers (sender == receiver) are permitted
/// and contribute degenerate graph edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID within the analyzed set.
    pub id: String,
    /// Sending account ID.
    pub sender: String,
    /// Receiving account ID.
    pub receiver: String,
    /// Transfer amount (non-negative).
    pub amount: f64,
    /// Timestamp (Unix epoch seconds).
    pub timestamp: u64,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
        timestamp: u64,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            timestamp,
        }
    }
}

// ============================================================================
// Account Nodes
// ============================================================================

/// Per-account analysis state, one per distinct account ID seen as sender
/// or receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountNode {
    /// Account ID.
    pub id: String,
    /// IDs of transactions touching this account, in input order.
    /// A self-transfer appears once per direction.
    pub transactions: Vec<String>,
    /// Suspicion score in [0, 100]. Full precision internally; rounded
    /// only at export.
    pub score: f64,
    /// Detected pattern tags, insertion-ordered and duplicate-free.
    pub patterns: Vec<String>,
    /// First fraud ring this account was assigned to, by detector
    /// processing order.
    pub ring_id: Option<String>,
    /// Total amount sent (over distinct transactions).
    pub total_sent: f64,
    /// Total amount received (over distinct transactions).
    pub total_received: f64,
    /// Distinct-transaction count.
    pub tx_count: usize,
}

impl AccountNode {
    /// Create an empty node for an account.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transactions: Vec::new(),
            score: 0.0,
            patterns: Vec::new(),
            ring_id: None,
            total_sent: 0.0,
            total_received: 0.0,
            tx_count: 0,
        }
    }

    /// Add a score contribution, saturating at 100.
    pub fn add_score(&mut self, delta: f64) {
        self.score = (self.score + delta).min(100.0);
    }

    /// Add a pattern tag if not already present.
    pub fn add_pattern(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.patterns.contains(&tag) {
            self.patterns.push(tag);
        }
    }

    /// Record ring membership; the first assignment wins.
    pub fn assign_ring(&mut self, ring_id: &str) {
        if self.ring_id.is_none() {
            self.ring_id = Some(ring_id.to_string());
        }
    }

    /// An account is suspicious once any detector has scored it.
    #[must_use]
    pub fn is_suspicious(&self) -> bool {
        self.score > 0.0
    }
}

// ============================================================================
// Fraud Rings
// ============================================================================

/// Structural pattern behind a detected fraud ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingPattern {
    /// Circular fund routing.
    Cycle,
    /// Fan-in aggregation (many senders into one hub).
    FanInSmurfing,
    /// Fan-out distribution (one hub into many receivers).
    FanOutSmurfing,
    /// Layered transfer chain through shell accounts.
    LayeredTransfer,
}

impl RingPattern {
    /// Returns the pattern name as exported.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RingPattern::Cycle => "cycle",
            RingPattern::FanInSmurfing => "fan_in_smurfing",
            RingPattern::FanOutSmurfing => "fan_out_smurfing",
            RingPattern::LayeredTransfer => "layered_transfer",
        }
    }
}

impl std::fmt::Display for RingPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of accounts jointly implicated by one structural detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    /// Sequentially assigned ring ID (stable `ring-NNN` format).
    pub id: String,
    /// Member account IDs in discovery order.
    pub members: Vec<String>,
    /// Structural pattern behind this ring.
    pub pattern: RingPattern,
    /// Mean of members' final suspicion scores, rounded to 1 decimal.
    /// Recomputed after all detectors have run.
    pub risk_score: f64,
    /// Human-readable description of the detection.
    pub description: String,
}

// ============================================================================
// Analysis Report
// ============================================================================

/// A directed edge in the report, one per distinct transaction.
///
/// Multiple transactions between the same account pair stay distinct
/// edges for visualization and audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Sending account ID.
    pub source: String,
    /// Receiving account ID.
    pub target: String,
    /// Transfer amount.
    pub amount: f64,
    /// Timestamp (Unix epoch seconds).
    pub timestamp: u64,
}

/// Complete output of one analysis invocation.
///
/// Immutable once the orchestrator returns; a new upload produces an
/// entirely new report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Every account seen in the input, in account-ID order.
    pub nodes: Vec<AccountNode>,
    /// Detected fraud rings in creation order.
    pub rings: Vec<FraudRing>,
    /// Edge list deduplicated by transaction ID, in input order.
    pub edges: Vec<EdgeRecord>,
    /// Wall-clock processing time in seconds (full precision; rounded at
    /// export).
    pub processing_seconds: f64,
    /// Total distinct accounts.
    pub total_accounts: usize,
    /// Count of accounts with score > 0.
    pub suspicious_accounts: usize,
}

impl AnalysisReport {
    /// Look up a node by account ID.
    #[must_use]
    pub fn node(&self, account: &str) -> Option<&AccountNode> {
        self.nodes.iter().find(|n| n.id == account)
    }

    /// Produce the externally consumable report shape, applying the
    /// rounding rules for presentation (scores to 1 decimal, processing
    /// time to 2 decimals).
    #[must_use]
    pub fn export(&self) -> ReportExport {
        ReportExport {
            suspicious_accounts: self
                .nodes
                .iter()
                .filter(|n| n.is_suspicious())
                .map(|n| SuspiciousAccount {
                    id: n.id.clone(),
                    score: round_to(n.score, 1),
                    patterns: n.patterns.clone(),
                    ring_id: n.ring_id.clone(),
                })
                .collect(),
            rings: self
                .rings
                .iter()
                .map(|r| RingExport {
                    id: r.id.clone(),
                    members: r.members.clone(),
                    pattern: r.pattern,
                    risk_score: round_to(r.risk_score, 1),
                })
                .collect(),
            summary: ReportSummary {
                total_accounts: self.total_accounts,
                flagged_accounts: self.suspicious_accounts,
                rings_detected: self.rings.len(),
                processing_seconds: round_to(self.processing_seconds, 2),
            },
        }
    }
}

/// Externally consumable report shape produced by [`AnalysisReport::export`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExport {
    /// Suspicious accounts with presentation-rounded scores.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Detected fraud rings with presentation-rounded risk scores.
    pub rings: Vec<RingExport>,
    /// Summary counters.
    pub summary: ReportSummary,
}

/// JSON-exportable view of a suspicious account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account ID.
    pub id: String,
    /// Suspicion score rounded to 1 decimal.
    pub score: f64,
    /// Detected pattern tags.
    pub patterns: Vec<String>,
    /// Assigned ring, if any.
    pub ring_id: Option<String>,
}

/// JSON-exportable view of a fraud ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingExport {
    /// Ring ID.
    pub id: String,
    /// Member account IDs in discovery order.
    pub members: Vec<String>,
    /// Structural pattern.
    pub pattern: RingPattern,
    /// Risk score rounded to 1 decimal.
    pub risk_score: f64,
}

/// Summary counters for the exported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total distinct accounts analyzed.
    pub total_accounts: usize,
    /// Accounts with a non-zero suspicion score.
    pub flagged_accounts: usize,
    /// Fraud rings detected.
    pub rings_detected: usize,
    /// Processing time in seconds, rounded to 2 decimals.
    pub processing_seconds: f64,
}

/// Round a value to the given number of decimal places.
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
