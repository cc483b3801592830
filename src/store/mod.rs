//! Trace Store
//!
//! Addresses, writes and enumerates trace files. There is no catalog: the
//! storage path of a trace is its index entry.

pub mod address;
pub mod fs;

pub use address::TraceAddress;
pub use fs::FsTraceStore;

use crate::error::StorageError;
use std::collections::BTreeSet;

/// Trace storage interface
///
/// Implementations hold no per-call mutable state, so reads may run
/// concurrently. Writes to distinct addresses never interfere.
pub trait TraceStore: Send + Sync {
    /// Write a trace, replacing any existing trace at the same address.
    fn write(&self, address: &TraceAddress, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read a whole trace. Fails with `TraceNotFound` if absent.
    fn read(&self, address: &TraceAddress) -> Result<Vec<u8>, StorageError>;

    /// Vertex ids captured for `step` of `job_id`.
    ///
    /// Fails with `JobNotFound` only when the job directory itself is missing.
    fn list_vertices(&self, job_id: &str, step: u64) -> Result<BTreeSet<String>, StorageError>;

    /// Steps with at least one trace for `job_id`.
    fn list_steps(&self, job_id: &str) -> Result<BTreeSet<u64>, StorageError>;
}

impl<S: TraceStore + ?Sized> TraceStore for &S {
    fn write(&self, address: &TraceAddress, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write(address, bytes)
    }

    fn read(&self, address: &TraceAddress) -> Result<Vec<u8>, StorageError> {
        (**self).read(address)
    }

    fn list_vertices(&self, job_id: &str, step: u64) -> Result<BTreeSet<String>, StorageError> {
        (**self).list_vertices(job_id, step)
    }

    fn list_steps(&self, job_id: &str) -> Result<BTreeSet<u64>, StorageError> {
        (**self).list_steps(job_id)
    }
}
