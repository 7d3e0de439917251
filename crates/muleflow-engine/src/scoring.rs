//! Suspicion scoring and fraud-ring aggregation.
//!
//! Merges the four detectors' findings into per-account scores, pattern
//! tags, and ring memberships. Detector processing order is a behavioral
//! contract: cycles, then fan-in, then fan-out, then shell chains, then
//! velocity. Final scores are order-independent (additive, saturating);
//! which ring an account is first attributed to is not, so the order is
//! fixed here rather than left to iteration accidents.

use crate::chains::ShellChain;
use crate::fan::FanHub;
use crate::graph::TransactionGraph;
use crate::types::{round_to, AccountNode, FraudRing, RingPattern};
use std::collections::BTreeMap;

// ============================================================================
// Detector Findings
// ============================================================================

/// Combined read-only output of the four detectors.
#[derive(Debug, Clone, Default)]
pub struct DetectorFindings {
    /// Simple cycles as visited account sequences.
    pub cycles: Vec<Vec<String>>,
    /// Fan-in hubs with their sender lists.
    pub fan_in: Vec<FanHub>,
    /// Fan-out hubs with their receiver lists.
    pub fan_out: Vec<FanHub>,
    /// Layered shell chains.
    pub chains: Vec<ShellChain>,
    /// High-velocity accounts.
    pub high_velocity: Vec<String>,
}

// ============================================================================
// Score Contributions
// ============================================================================

/// Score contribution for cycle membership.
pub const CYCLE_SCORE: f64 = 40.0;
/// Score contribution for fan-in aggregation.
pub const FAN_IN_SCORE: f64 = 25.0;
/// Score contribution for fan-out distribution.
pub const FAN_OUT_SCORE: f64 = 25.0;
/// Score contribution for acting as a shell in a layered chain.
pub const SHELL_SCORE: f64 = 30.0;
/// Score contribution for abnormal transaction velocity.
pub const VELOCITY_SCORE: f64 = 10.0;

// ============================================================================
// Ring Aggregator
// ============================================================================

/// Aggregates detector findings into scored nodes and fraud rings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingAggregator;

impl RingAggregator {
    /// Merge detector findings into final nodes and rings.
    ///
    /// Every addition saturates at 100 individually. After all findings
    /// are applied, a second pass recomputes each ring's risk score from
    /// its members' final scores - a member's score may have been raised
    /// by a detector processed after the ring was created.
    #[must_use]
    pub fn aggregate(
        graph: &TransactionGraph,
        findings: &DetectorFindings,
    ) -> (BTreeMap<String, AccountNode>, Vec<FraudRing>) {
        let mut nodes = Self::seed_nodes(graph);
        let mut rings: Vec<FraudRing> = Vec::new();

        for cycle in &findings.cycles {
            for account in cycle {
                if let Some(node) = nodes.get_mut(account) {
                    node.add_score(CYCLE_SCORE);
                    node.add_pattern(format!("cycle_length_{}", cycle.len()));
                }
            }
            Self::open_ring(
                &mut rings,
                &mut nodes,
                cycle.clone(),
                RingPattern::Cycle,
                format!(
                    "Circular fund routing through {} accounts ({})",
                    cycle.len(),
                    cycle.join(" -> ")
                ),
            );
        }

        for hub in &findings.fan_in {
            if let Some(node) = nodes.get_mut(&hub.account) {
                node.add_score(FAN_IN_SCORE);
                node.add_pattern("fan_in_aggregator");
            }
            let mut members = vec![hub.account.clone()];
            members.extend(hub.counterparties.iter().cloned());
            Self::open_ring(
                &mut rings,
                &mut nodes,
                members,
                RingPattern::FanInSmurfing,
                format!(
                    "Account {} aggregated funds from {} distinct senders",
                    hub.account,
                    hub.counterparties.len()
                ),
            );
        }

        for hub in &findings.fan_out {
            if let Some(node) = nodes.get_mut(&hub.account) {
                node.add_score(FAN_OUT_SCORE);
                node.add_pattern("fan_out_distributor");
            }
            let mut members = vec![hub.account.clone()];
            members.extend(hub.counterparties.iter().cloned());
            Self::open_ring(
                &mut rings,
                &mut nodes,
                members,
                RingPattern::FanOutSmurfing,
                format!(
                    "Account {} distributed funds to {} distinct receivers",
                    hub.account,
                    hub.counterparties.len()
                ),
            );
        }

        for chain in &findings.chains {
            for shell in &chain.shells {
                if let Some(node) = nodes.get_mut(shell) {
                    node.add_score(SHELL_SCORE);
                    node.add_pattern("shell_account");
                }
            }
            Self::open_ring(
                &mut rings,
                &mut nodes,
                chain.path.clone(),
                RingPattern::LayeredTransfer,
                format!(
                    "Layered transfer across {} accounts through {} shell intermediaries",
                    chain.path.len(),
                    chain.shells.len()
                ),
            );
        }

        for account in &findings.high_velocity {
            if let Some(node) = nodes.get_mut(account) {
                node.add_score(VELOCITY_SCORE);
                node.add_pattern("high_velocity");
            }
        }

        // Second pass: ring risk from final member scores.
        for ring in &mut rings {
            let total: f64 = ring
                .members
                .iter()
                .filter_map(|member| nodes.get(member))
                .map(|node| node.score)
                .sum();
            ring.risk_score = round_to(total / ring.members.len() as f64, 1);
        }

        (nodes, rings)
    }

    /// Initialize a node for every account in the graph.
    fn seed_nodes(graph: &TransactionGraph) -> BTreeMap<String, AccountNode> {
        graph
            .accounts()
            .map(|account| {
                let mut node = AccountNode::new(account.clone());
                node.transactions = graph
                    .transactions_of(account)
                    .map(|tx| tx.id.clone())
                    .collect();
                node.tx_count = graph.tx_count(account);
                let (sent, received) = graph.totals(account);
                node.total_sent = sent;
                node.total_received = received;
                (account.clone(), node)
            })
            .collect()
    }

    /// Create the next ring and record membership on accounts that have
    /// none yet.
    fn open_ring(
        rings: &mut Vec<FraudRing>,
        nodes: &mut BTreeMap<String, AccountNode>,
        members: Vec<String>,
        pattern: RingPattern,
        description: String,
    ) {
        let id = format!("ring-{:03}", rings.len() + 1);
        for member in &members {
            if let Some(node) = nodes.get_mut(member) {
                node.assign_ring(&id);
            }
        }
        rings.push(FraudRing {
            id,
            members,
            pattern,
            risk_score: 0.0,
            description,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transaction;

    fn tx(id: &str, sender: &str, receiver: &str) -> Transaction {
        Transaction::new(id, sender, receiver, 100.0, 1000)
    }

    fn graph_of(transactions: &[Transaction]) -> TransactionGraph {
        TransactionGraph::build(transactions)
    }

    #[test]
    fn test_cycle_scoring_and_ring() {
        let graph = graph_of(&[tx("t1", "a", "b"), tx("t2", "b", "c"), tx("t3", "c", "a")]);
        let findings = DetectorFindings {
            cycles: vec![vec!["a".into(), "b".into(), "c".into()]],
            ..Default::default()
        };
        let (nodes, rings) = RingAggregator::aggregate(&graph, &findings);

        for account in ["a", "b", "c"] {
            let node = &nodes[account];
            assert_eq!(node.score, 40.0);
            assert_eq!(node.patterns, vec!["cycle_length_3"]);
            assert_eq!(node.ring_id.as_deref(), Some("ring-001"));
        }
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].pattern, RingPattern::Cycle);
        assert_eq!(rings[0].risk_score, 40.0);
    }

    #[test]
    fn test_score_clamped_per_addition() {
        let graph = graph_of(&[tx("t1", "a", "b"), tx("t2", "b", "c"), tx("t3", "c", "a")]);
        // One account on three cycles: 3 x 40 saturates at 100.
        let findings = DetectorFindings {
            cycles: vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                vec!["a".into(), "c".into(), "e".into()],
            ],
            ..Default::default()
        };
        let (nodes, _) = RingAggregator::aggregate(&graph, &findings);

        assert_eq!(nodes["a"].score, 100.0);
    }

    #[test]
    fn test_fan_ring_includes_unscored_counterparties() {
        let transactions: Vec<Transaction> = (0..10)
            .map(|i| tx(&format!("t{i}"), &format!("s{i}"), "hub"))
            .collect();
        let graph = graph_of(&transactions);
        let findings = DetectorFindings {
            fan_in: vec![FanHub {
                account: "hub".into(),
                counterparties: (0..10).map(|i| format!("s{i}")).collect(),
            }],
            ..Default::default()
        };
        let (nodes, rings) = RingAggregator::aggregate(&graph, &findings);

        assert_eq!(rings[0].members.len(), 11);
        assert_eq!(rings[0].pattern, RingPattern::FanInSmurfing);
        assert_eq!(nodes["hub"].score, 25.0);
        assert_eq!(nodes["s0"].score, 0.0);
        // Counterparties are ring members regardless of their own score.
        assert_eq!(nodes["s0"].ring_id.as_deref(), Some("ring-001"));
        // Mean over 11 members: 25 / 11 = 2.27... -> 2.3.
        assert_eq!(rings[0].risk_score, 2.3);
    }

    #[test]
    fn test_first_ring_wins_across_detectors() {
        let graph = graph_of(&[tx("t1", "a", "b"), tx("t2", "b", "c"), tx("t3", "c", "a")]);
        let findings = DetectorFindings {
            cycles: vec![vec!["a".into(), "b".into(), "c".into()]],
            fan_in: vec![FanHub {
                account: "a".into(),
                counterparties: vec!["c".into()],
            }],
            ..Default::default()
        };
        let (nodes, rings) = RingAggregator::aggregate(&graph, &findings);

        assert_eq!(rings.len(), 2);
        // "a" keeps the cycle ring it was attributed to first.
        assert_eq!(nodes["a"].ring_id.as_deref(), Some("ring-001"));
        assert_eq!(nodes["a"].score, 65.0);
        assert_eq!(
            nodes["a"].patterns,
            vec!["cycle_length_3", "fan_in_aggregator"]
        );
    }

    #[test]
    fn test_ring_risk_recomputed_from_final_scores() {
        let graph = graph_of(&[tx("t1", "a", "b"), tx("t2", "b", "c"), tx("t3", "c", "a")]);
        // The cycle ring is created first; "b" is raised afterwards by
        // the velocity pass. The ring risk must reflect the final score.
        let findings = DetectorFindings {
            cycles: vec![vec!["a".into(), "b".into(), "c".into()]],
            high_velocity: vec!["b".into()],
            ..Default::default()
        };
        let (nodes, rings) = RingAggregator::aggregate(&graph, &findings);

        assert_eq!(nodes["b"].score, 50.0);
        // (40 + 50 + 40) / 3 = 43.333... -> 43.3.
        assert_eq!(rings[0].risk_score, 43.3);
    }

    #[test]
    fn test_velocity_creates_no_ring() {
        let graph = graph_of(&[tx("t1", "a", "b")]);
        let findings = DetectorFindings {
            high_velocity: vec!["a".into()],
            ..Default::default()
        };
        let (nodes, rings) = RingAggregator::aggregate(&graph, &findings);

        assert!(rings.is_empty());
        assert_eq!(nodes["a"].score, 10.0);
        assert!(nodes["a"].ring_id.is_none());
    }

    #[test]
    fn test_shell_chain_scoring() {
        let graph = graph_of(&[tx("t1", "a", "b"), tx("t2", "b", "c"), tx("t3", "c", "d")]);
        let findings = DetectorFindings {
            chains: vec![ShellChain {
                path: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                shells: vec!["b".into(), "c".into()],
            }],
            ..Default::default()
        };
        let (nodes, rings) = RingAggregator::aggregate(&graph, &findings);

        assert_eq!(nodes["a"].score, 0.0);
        assert_eq!(nodes["b"].score, 30.0);
        assert_eq!(nodes["c"].score, 30.0);
        assert_eq!(nodes["d"].score, 0.0);
        assert_eq!(nodes["b"].patterns, vec!["shell_account"]);
        assert_eq!(rings[0].pattern, RingPattern::LayeredTransfer);
        assert_eq!(rings[0].members, vec!["a", "b", "c", "d"]);
        // (0 + 30 + 30 + 0) / 4 = 15.0.
        assert_eq!(rings[0].risk_score, 15.0);
    }

    #[test]
    fn test_ring_ids_sequential() {
        let graph = graph_of(&[tx("t1", "a", "b"), tx("t2", "b", "c"), tx("t3", "c", "a")]);
        let findings = DetectorFindings {
            cycles: vec![vec!["a".into(), "b".into(), "c".into()]],
            fan_out: vec![FanHub {
                account: "a".into(),
                counterparties: vec!["b".into()],
            }],
            chains: vec![ShellChain {
                path: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                shells: vec!["b".into(), "c".into()],
            }],
            ..Default::default()
        };
        let (_, rings) = RingAggregator::aggregate(&graph, &findings);

        let ids: Vec<&str> = rings.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ring-001", "ring-002", "ring-003"]);
    }
}
