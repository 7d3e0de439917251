//! Detector and engine configuration.
//!
//! Each detector carries its own config struct with its default
//! thresholds; `EngineConfig` aggregates them for the orchestrator. The
//! depth and window caps here are the only safety valve against runaway
//! compute - there is no hard input-size guard.

use serde::{Deserialize, Serialize};

/// Configuration for simple-cycle detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Minimum cycle length in distinct accounts.
    pub min_length: usize,
    /// Maximum cycle length in distinct accounts (search depth cap).
    pub max_length: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 5,
        }
    }
}

/// Configuration for fan-in/fan-out detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanConfig {
    /// Distinct counterparties required to flag an account.
    pub counterparty_threshold: usize,
    /// Sliding window in seconds (inclusive bounds).
    pub window_seconds: u64,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            counterparty_threshold: 10,
            window_seconds: 72 * 3600,
        }
    }
}

/// Configuration for layered shell-chain detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellChainConfig {
    /// Maximum distinct-transaction count for an account to qualify as a shell.
    pub shell_threshold: usize,
    /// Minimum accounts in a recorded chain (start, interiors, endpoint).
    pub min_chain_accounts: usize,
    /// Maximum accounts on a traversal path (depth cap).
    pub max_depth: usize,
}

impl Default for ShellChainConfig {
    fn default() -> Self {
        Self {
            shell_threshold: 3,
            min_chain_accounts: 4,
            max_depth: 8,
        }
    }
}

/// Configuration for transaction-velocity detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityConfig {
    /// Sliding window in seconds (inclusive bounds).
    pub window_seconds: u64,
    /// Transaction occurrences required within the window to flag an account.
    pub burst_threshold: usize,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            window_seconds: 3600,
            burst_threshold: 5,
        }
    }
}

/// Aggregated configuration for a full analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cycle detector configuration.
    pub cycle: CycleConfig,
    /// Fan detector configuration (shared by fan-in and fan-out).
    pub fan: FanConfig,
    /// Shell-chain detector configuration.
    pub shell_chain: ShellChainConfig,
    /// Velocity detector configuration.
    pub velocity: VelocityConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(config.cycle.min_length, 3);
        assert_eq!(config.cycle.max_length, 5);
        assert_eq!(config.fan.counterparty_threshold, 10);
        assert_eq!(config.fan.window_seconds, 259_200);
        assert_eq!(config.shell_chain.shell_threshold, 3);
        assert_eq!(config.shell_chain.max_depth, 8);
        assert_eq!(config.velocity.window_seconds, 3600);
        assert_eq!(config.velocity.burst_threshold, 5);
    }

    #[test]
    fn test_config_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fan.counterparty_threshold, config.fan.counterparty_threshold);
    }
}
