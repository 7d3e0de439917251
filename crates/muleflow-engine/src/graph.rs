//! Transaction graph construction.
//!
//! Builds the directed adjacency structures and per-account transaction
//! index that every detector reads. The builder is the sole writer; the
//! detectors treat the result as read-only.

use crate::types::{EdgeRecord, Transaction};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Directed transaction graph with a per-account transaction index.
///
/// Ordered maps keep account iteration stable, so ring numbering and
/// report ordering are identical across runs on the same input.
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    /// account -> distinct accounts it has sent to
    forward: BTreeMap<String, BTreeSet<String>>,
    /// account -> distinct accounts that sent to it
    reverse: BTreeMap<String, BTreeSet<String>>,
    /// account -> indices into `transactions`, input order, both
    /// directions, duplicates allowed
    by_account: BTreeMap<String, Vec<usize>>,
    /// The analyzed transaction set, input order.
    transactions: Vec<Transaction>,
}

impl TransactionGraph {
    /// Build the graph from a transaction sequence.
    ///
    /// Every account appearing as sender or receiver keys both adjacency
    /// maps, even when its neighbor set is empty. Empty input yields
    /// empty structures; there are no error conditions.
    #[must_use]
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut graph = Self {
            transactions: transactions.to_vec(),
            ..Self::default()
        };

        for (index, tx) in graph.transactions.iter().enumerate() {
            graph
                .forward
                .entry(tx.sender.clone())
                .or_default()
                .insert(tx.receiver.clone());
            graph.forward.entry(tx.receiver.clone()).or_default();

            graph
                .reverse
                .entry(tx.receiver.clone())
                .or_default()
                .insert(tx.sender.clone());
            graph.reverse.entry(tx.sender.clone()).or_default();

            graph
                .by_account
                .entry(tx.sender.clone())
                .or_default()
                .push(index);
            // A self-transfer touches the account once per direction.
            graph
                .by_account
                .entry(tx.receiver.clone())
                .or_default()
                .push(index);
        }

        graph
    }

    /// All account IDs, in sorted order.
    pub fn accounts(&self) -> impl Iterator<Item = &String> {
        self.forward.keys()
    }

    /// Number of distinct accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.forward.len()
    }

    /// Distinct accounts `account` has sent to.
    #[must_use]
    pub fn successors(&self, account: &str) -> impl Iterator<Item = &String> + '_ {
        self.forward.get(account).into_iter().flatten()
    }

    /// Distinct accounts that have sent to `account`.
    #[must_use]
    pub fn predecessors(&self, account: &str) -> impl Iterator<Item = &String> + '_ {
        self.reverse.get(account).into_iter().flatten()
    }

    /// Whether a direct sender -> receiver edge exists.
    #[must_use]
    pub fn has_edge(&self, sender: &str, receiver: &str) -> bool {
        self.forward
            .get(sender)
            .is_some_and(|targets| targets.contains(receiver))
    }

    /// Transactions touching `account`, input order, duplicates allowed.
    pub fn transactions_of(&self, account: &str) -> impl Iterator<Item = &Transaction> + '_ {
        self.by_account
            .get(account)
            .into_iter()
            .flatten()
            .map(|&i| &self.transactions[i])
    }

    /// Distinct-transaction count for `account`.
    ///
    /// Records sharing an ID are the same logical transfer, so they count
    /// once.
    #[must_use]
    pub fn tx_count(&self, account: &str) -> usize {
        let mut seen = HashSet::new();
        self.transactions_of(account)
            .filter(|tx| seen.insert(tx.id.as_str()))
            .count()
    }

    /// The analyzed transaction set, input order.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Report edges: one per distinct transaction ID, input order.
    #[must_use]
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        let mut seen = HashSet::new();
        self.transactions
            .iter()
            .filter(|tx| seen.insert(tx.id.as_str()))
            .map(|tx| EdgeRecord {
                source: tx.sender.clone(),
                target: tx.receiver.clone(),
                amount: tx.amount,
                timestamp: tx.timestamp,
            })
            .collect()
    }

    /// Totals sent and received for `account`, over distinct transactions.
    #[must_use]
    pub fn totals(&self, account: &str) -> (f64, f64) {
        let mut seen = HashSet::new();
        let mut sent = 0.0;
        let mut received = 0.0;
        for tx in self.transactions_of(account) {
            if !seen.insert(tx.id.as_str()) {
                continue;
            }
            if tx.sender == account {
                sent += tx.amount;
            }
            if tx.receiver == account {
                received += tx.amount;
            }
        }
        (sent, received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, sender: &str, receiver: &str, amount: f64, timestamp: u64) -> Transaction {
        Transaction::new(id, sender, receiver, amount, timestamp)
    }

    #[test]
    fn test_empty_input_yields_empty_structures() {
        let graph = TransactionGraph::build(&[]);
        assert_eq!(graph.account_count(), 0);
        assert!(graph.edge_records().is_empty());
    }

    #[test]
    fn test_every_account_keys_both_adjacencies() {
        let graph = TransactionGraph::build(&[tx("t1", "a", "b", 10.0, 100)]);

        assert_eq!(graph.account_count(), 2);
        // b never sends, but still keys the forward map.
        assert_eq!(graph.successors("b").count(), 0);
        assert_eq!(graph.predecessors("a").count(), 0);
        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_edge("b", "a"));
    }

    #[test]
    fn test_adjacency_deduplicates_neighbors() {
        let graph = TransactionGraph::build(&[
            tx("t1", "a", "b", 10.0, 100),
            tx("t2", "a", "b", 20.0, 200),
        ]);

        assert_eq!(graph.successors("a").count(), 1);
        // Both transactions stay in the per-account index.
        assert_eq!(graph.transactions_of("a").count(), 2);
        assert_eq!(graph.edge_records().len(), 2);
    }

    #[test]
    fn test_duplicate_transaction_ids_count_once() {
        let graph = TransactionGraph::build(&[
            tx("t1", "a", "b", 10.0, 100),
            tx("t1", "a", "b", 10.0, 100),
        ]);

        assert_eq!(graph.tx_count("a"), 1);
        assert_eq!(graph.tx_count("b"), 1);
        assert_eq!(graph.edge_records().len(), 1);
        assert_eq!(graph.totals("a"), (10.0, 0.0));
    }

    #[test]
    fn test_self_transfer_degenerate_edge() {
        let graph = TransactionGraph::build(&[tx("t1", "a", "a", 5.0, 100)]);

        assert_eq!(graph.account_count(), 1);
        assert!(graph.has_edge("a", "a"));
        // One touch per direction in the index, one distinct transaction.
        assert_eq!(graph.transactions_of("a").count(), 2);
        assert_eq!(graph.tx_count("a"), 1);
        assert_eq!(graph.totals("a"), (5.0, 5.0));
    }

    #[test]
    fn test_totals_split_by_direction() {
        let graph = TransactionGraph::build(&[
            tx("t1", "a", "b", 10.0, 100),
            tx("t2", "b", "a", 4.0, 200),
            tx("t3", "a", "c", 6.0, 300),
        ]);

        assert_eq!(graph.totals("a"), (16.0, 4.0));
        assert_eq!(graph.totals("b"), (4.0, 10.0));
        assert_eq!(graph.totals("c"), (0.0, 6.0));
    }
}
