// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-permit gate: one export at a time, extra requests are refused
// outright rather than queued.

use std::sync::Arc;

use folio_core::error::{FolioError, Result};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::warn;

/// Shared "export in progress" flag. Clones refer to the same gate.
#[derive(Debug, Clone)]
pub struct ExportGate {
    permits: Arc<Semaphore>,
}

/// Held for the lifetime of a job; dropping it (on success, failure, or
/// unwind) reopens the gate.
#[derive(Debug)]
pub struct ExportPermit {
    _permit: OwnedSemaphorePermit,
}

impl ExportGate {
    /// Create an idle gate.
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Claim the gate or fail immediately with `FolioError::ExportBusy`.
    pub fn try_begin(&self) -> Result<ExportPermit> {
        match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => Ok(ExportPermit { _permit: permit }),
            Err(_) => {
                warn!("Export request rejected: another export is in progress");
                Err(FolioError::ExportBusy)
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for ExportGate {
    fn default() -> Self {
        Self::new()
    }
}
