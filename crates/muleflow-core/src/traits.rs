//! Core kernel traits.
//!
//! This module defines the fundamental traits that all kernels implement:
//! - `Kernel`: Base trait for all analysis kernels
//! - `BatchKernel`: Trait for batch (one complete input per invocation) kernels
//! - `BatchKernelDyn` / `TypeErasedBatchKernel`: type-erased execution for
//!   hosts that talk JSON across the kernel boundary

use crate::error::{KernelError, Result};
use crate::kernel::KernelMetadata;
use async_trait::async_trait;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::time::Duration;

/// Base trait for all analysis kernels.
///
/// Provides access to kernel metadata and configuration validation.
pub trait Kernel: Send + Sync + Debug {
    /// Returns the kernel metadata.
    fn metadata(&self) -> &KernelMetadata;

    /// Validate kernel configuration.
    ///
    /// Called before kernel execution to ensure configuration is valid.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the kernel ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// Trait for batch kernels.
///
/// Batch kernels are invoked with one complete, in-memory input and return
/// one complete output; they hold no state between invocations.
///
/// # Type Parameters
///
/// - `I`: Input type
/// - `O`: Output type
#[async_trait]
pub trait BatchKernel<I, O>: Kernel
where
    I: Send + Sync,
    O: Send + Sync,
{
    /// Execute the kernel with the given input.
    async fn execute(&self, input: I) -> Result<O>;

    /// Validate the input before execution.
    ///
    /// Override to provide custom input validation.
    fn validate_input(&self, _input: &I) -> Result<()> {
        Ok(())
    }

    /// Execute the kernel with a deadline.
    ///
    /// Callers needing bounded latency impose it here; the kernels
    /// themselves carry no cancellation mechanism.
    async fn execute_with_timeout(&self, input: I, timeout: Duration) -> Result<O>
    where
        I: 'async_trait,
    {
        match tokio::time::timeout(timeout, self.execute(input)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(KernelError::Timeout(timeout)),
        }
    }
}

/// Type-erased batch kernel for host integration.
#[async_trait]
pub trait BatchKernelDyn: Kernel {
    /// Execute with type-erased JSON input/output.
    async fn execute_dyn(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Type-erased wrapper for batch kernels enabling dynamic dispatch.
///
/// Wraps any `BatchKernel<I, O>` implementation and provides the
/// `BatchKernelDyn` interface for type-erased execution through JSON
/// serialization, so embedding applications can invoke kernels without
/// compile-time knowledge of their input/output types.
pub struct TypeErasedBatchKernel<K, I, O> {
    inner: K,
    // fn(I) -> O is always Send + Sync regardless of I/O bounds
    _phantom: PhantomData<fn(I) -> O>,
}

impl<K: Debug, I, O> Debug for TypeErasedBatchKernel<K, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeErasedBatchKernel")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<K, I, O> TypeErasedBatchKernel<K, I, O> {
    /// Wrap a typed batch kernel for type-erased execution.
    pub fn new(kernel: K) -> Self {
        Self {
            inner: kernel,
            _phantom: PhantomData,
        }
    }

    /// Access the inner kernel.
    pub fn inner(&self) -> &K {
        &self.inner
    }
}

impl<K, I, O> Kernel for TypeErasedBatchKernel<K, I, O>
where
    K: Kernel,
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    fn metadata(&self) -> &KernelMetadata {
        self.inner.metadata()
    }

    fn validate(&self) -> Result<()> {
        self.inner.validate()
    }
}

#[async_trait]
impl<K, I, O> BatchKernelDyn for TypeErasedBatchKernel<K, I, O>
where
    K: BatchKernel<I, O> + 'static,
    I: serde::de::DeserializeOwned + Send + Sync + 'static,
    O: serde::Serialize + Send + Sync + 'static,
{
    async fn execute_dyn(&self, input: &[u8]) -> Result<Vec<u8>> {
        let typed_input: I = serde_json::from_slice(input)
            .map_err(|e| KernelError::DeserializationError(e.to_string()))?;
        let output = self.inner.execute(typed_input).await?;
        serde_json::to_vec(&output).map_err(|e| KernelError::SerializationError(e.to_string()))
    }
}
