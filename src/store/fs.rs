//! Filesystem-backed trace store
//!
//! Traces live under a configurable root as `{root}/{job}/tr_stp_{step}_vid_{vertex}.tr`.
//! The root may be a mount of a shared filesystem; nothing here assumes more
//! than byte files and directory listing.

use super::address::{validate_job_id, TraceAddress};
use super::TraceStore;
use crate::error::StorageError;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Distinguishes temporaries of concurrent writes within one process.
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Trace store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsTraceStore {
    root: PathBuf,
}

impl FsTraceStore {
    /// Create a store at `root`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            StorageError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to create trace root at {:?}: {}", root, e),
            ))
        })?;
        Ok(Self { root })
    }

    /// Open an existing root without creating it (read side).
    pub fn open<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn trace_path(&self, address: &TraceAddress) -> PathBuf {
        self.root.join(address.relative_path())
    }

    fn job_dir(&self, job_id: &str) -> Result<PathBuf, StorageError> {
        validate_job_id(job_id)?;
        let dir = self.root.join(job_id);
        if !dir.is_dir() {
            return Err(StorageError::JobNotFound(job_id.to_string()));
        }
        Ok(dir)
    }

    /// Every trace address in the job directory; other entries are skipped.
    fn scan_job(&self, job_id: &str) -> Result<Vec<TraceAddress>, StorageError> {
        let dir = self.job_dir(job_id)?;
        let mut addresses = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            match TraceAddress::parse(job_id, name)? {
                Some(address) => addresses.push(address),
                None => trace!(job_id, entry = name, "Skipping non-trace entry"),
            }
        }
        Ok(addresses)
    }
}

impl TraceStore for FsTraceStore {
    /// Writes to a temporary sibling, then renames it over the final path.
    fn write(&self, address: &TraceAddress, bytes: &[u8]) -> Result<(), StorageError> {
        let trace_path = self.trace_path(address);
        let job_dir = self.root.join(address.job_id());
        fs::create_dir_all(&job_dir).map_err(|e| {
            StorageError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to create job directory {:?}: {}", job_dir, e),
            ))
        })?;

        // Leading dot and trailing .tmp keep the temporary out of listings.
        let temp_path = job_dir.join(format!(
            ".{}.{}-{}.tmp",
            address.file_name(),
            std::process::id(),
            TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        ));

        let written = write_file(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, &trace_path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to write trace {}: {}", address, e),
            )));
        }

        debug!(trace = %address, bytes = bytes.len(), "Wrote trace");
        Ok(())
    }

    fn read(&self, address: &TraceAddress) -> Result<Vec<u8>, StorageError> {
        let trace_path = self.trace_path(address);
        match fs::read(&trace_path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::TraceNotFound {
                job_id: address.job_id().to_string(),
                step: address.step(),
                vertex_id: address.vertex_id().to_string(),
            }),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn list_vertices(&self, job_id: &str, step: u64) -> Result<BTreeSet<String>, StorageError> {
        Ok(self
            .scan_job(job_id)?
            .into_iter()
            .filter(|address| address.step() == step)
            .map(|address| address.vertex_id().to_string())
            .collect())
    }

    fn list_steps(&self, job_id: &str) -> Result<BTreeSet<u64>, StorageError> {
        Ok(self
            .scan_job(job_id)?
            .into_iter()
            .map(|address| address.step())
            .collect())
    }
}

/// The handle is closed when this returns, on success and on failure.
fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
