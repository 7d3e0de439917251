//! Synthetic ledger generation.
//!
//! Seeded generator producing background traffic plus injectable
//! laundering patterns, for integration tests and benchmarks. Output is
//! deterministic under a fixed seed.

use crate::types::Transaction;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Laundering patterns the factory can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedPattern {
    /// Circular routing through the given number of accounts.
    Cycle(usize),
    /// Many senders into one hub within a tight window.
    FanIn(usize),
    /// One hub into many receivers within a tight window.
    FanOut(usize),
    /// A layered chain through fresh shell accounts.
    LayeredChain(usize),
    /// A burst of transfers from one account inside an hour.
    VelocityBurst(usize),
}

/// Seeded synthetic-ledger factory.
#[derive(Debug)]
pub struct LedgerFactory {
    rng: StdRng,
    next_tx: u64,
    next_account: u64,
    clock: u64,
}

impl LedgerFactory {
    /// Create a factory with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_tx: 0,
            next_account: 0,
            clock: 1_700_000_000,
        }
    }

    /// Mint a fresh account ID.
    pub fn account(&mut self) -> String {
        let id = format!("acct-{:05}", self.next_account);
        self.next_account += 1;
        id
    }

    /// Mint `count` fresh account IDs.
    pub fn accounts(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.account()).collect()
    }

    fn transfer(&mut self, sender: &str, receiver: &str, amount: f64, timestamp: u64) -> Transaction {
        let id = format!("tx-{:07}", self.next_tx);
        self.next_tx += 1;
        Transaction::new(id, sender, receiver, amount, timestamp)
    }

    /// Generate benign background traffic among the given accounts.
    ///
    /// Transfers are spread hours apart between random pairs, staying
    /// well under every detector threshold as long as the account pool is
    /// reasonably large.
    pub fn background(&mut self, accounts: &[String], count: usize) -> Vec<Transaction> {
        let mut transactions = Vec::with_capacity(count);
        for _ in 0..count {
            let sender = accounts[self.rng.gen_range(0..accounts.len())].clone();
            let mut receiver = accounts[self.rng.gen_range(0..accounts.len())].clone();
            while receiver == sender && accounts.len() > 1 {
                receiver = accounts[self.rng.gen_range(0..accounts.len())].clone();
            }
            let amount = self.rng.gen_range(10.0..2_000.0);
            self.clock += self.rng.gen_range(3_600..14_400);
            let timestamp = self.clock;
            transactions.push(self.transfer(&sender, &receiver, amount, timestamp));
        }
        transactions
    }

    /// Inject one laundering pattern; returns its transactions and the
    /// accounts involved (hub or cycle/chain members first).
    pub fn inject(&mut self, pattern: InjectedPattern) -> (Vec<Transaction>, Vec<String>) {
        self.clock += 50_000;
        match pattern {
            InjectedPattern::Cycle(size) => {
                let members = self.accounts(size);
                let amount = self.rng.gen_range(5_000.0..20_000.0);
                let transactions = (0..size)
                    .map(|i| {
                        let sender = members[i].clone();
                        let receiver = members[(i + 1) % size].clone();
                        let timestamp = self.clock + i as u64 * 1_800;
                        self.transfer(&sender, &receiver, amount * 0.95f64.powi(i as i32), timestamp)
                    })
                    .collect();
                (transactions, members)
            }

            InjectedPattern::FanIn(senders) => {
                let hub = self.account();
                let sources = self.accounts(senders);
                let transactions = sources
                    .iter()
                    .enumerate()
                    .map(|(i, source)| {
                        let amount = self.rng.gen_range(800.0..1_200.0);
                        let timestamp = self.clock + i as u64 * 7_200;
                        self.transfer(source, &hub, amount, timestamp)
                    })
                    .collect();
                let mut involved = vec![hub];
                involved.extend(sources);
                (transactions, involved)
            }

            InjectedPattern::FanOut(receivers) => {
                let hub = self.account();
                let targets = self.accounts(receivers);
                let transactions = targets
                    .iter()
                    .enumerate()
                    .map(|(i, target)| {
                        let amount = self.rng.gen_range(800.0..1_200.0);
                        let timestamp = self.clock + i as u64 * 7_200;
                        self.transfer(&hub, target, amount, timestamp)
                    })
                    .collect();
                let mut involved = vec![hub];
                involved.extend(targets);
                (transactions, involved)
            }

            InjectedPattern::LayeredChain(hops) => {
                // Origin gets enough side activity to clear the shell
                // threshold; the intermediaries stay dormant.
                let origin = self.account();
                let feeders = self.accounts(3);
                let mut transactions = Vec::new();
                for i in 0..6 {
                    let feeder = feeders[i % feeders.len()].clone();
                    let amount = self.rng.gen_range(100.0..900.0);
                    let timestamp = self.clock + i as u64 * 7_200;
                    transactions.push(self.transfer(&feeder, &origin, amount, timestamp));
                }

                let mut members = vec![origin];
                members.extend(self.accounts(hops));
                let base = self.clock + 90_000;
                let amount = self.rng.gen_range(8_000.0..15_000.0);
                for i in 0..members.len() - 1 {
                    let sender = members[i].clone();
                    let receiver = members[i + 1].clone();
                    let timestamp = base + i as u64 * 3_600;
                    transactions.push(self.transfer(&sender, &receiver, amount, timestamp));
                }
                (transactions, members)
            }

            InjectedPattern::VelocityBurst(count) => {
                let account = self.account();
                let targets = self.accounts(count.min(4).max(1));
                let transactions = (0..count)
                    .map(|i| {
                        let target = targets[i % targets.len()].clone();
                        let amount = self.rng.gen_range(50.0..400.0);
                        let timestamp = self.clock + i as u64 * 300;
                        self.transfer(&account, &target, amount, timestamp)
                    })
                    .collect();
                let mut involved = vec![account];
                involved.extend(targets);
                (transactions, involved)
            }
        }
    }
}
