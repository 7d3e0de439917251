//! # Muleflow Core
//!
//! Core abstractions for the muleflow ledger analysis engine.
//!
//! This crate provides:
//! - Domain and kernel metadata definitions
//! - Trait definitions for batch kernels
//! - Detector and engine configuration with default thresholds
//! - The shared error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
pub mod kernel;
pub mod traits;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        CycleConfig, EngineConfig, FanConfig, ShellChainConfig, VelocityConfig,
    };
    pub use crate::domain::Domain;
    pub use crate::error::{KernelError, Result};
    pub use crate::kernel::KernelMetadata;
    pub use crate::traits::{BatchKernel, BatchKernelDyn, Kernel, TypeErasedBatchKernel};
}
