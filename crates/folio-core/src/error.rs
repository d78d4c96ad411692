// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Pipeline stages --
    /// The renderer threw, or produced an empty/invalid buffer. Fatal.
    #[error("render failed: {0}")]
    Render(String),

    /// Pixel read-back failed. The paginator recovers with a hard cut.
    #[error("pixel scan failed: {0}")]
    Scan(String),

    /// A page could not be encoded to PNG or PDF. Fatal for the job.
    #[error("page encoding failed: {0}")]
    Encoding(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Invocation --
    #[error("an export is already in progress")]
    ExportBusy,

    #[error("invalid export configuration: {0}")]
    InvalidConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
