// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Page extraction for the Folio export engine.
//
// Scans a rendered report for whitespace bands, picks page breaks that avoid
// cutting through content, composites fixed-size page canvases, and assembles
// them into a multi-page PDF or a numbered PNG sequence.

pub mod compose;
pub mod output;
pub mod paginate;
pub mod scan;

// Re-export the primary items so callers can use `folio_document::Paginator` etc.
pub use compose::{compose_page, compose_pages};
pub use output::inspect::PdfInspector;
pub use output::pdf::PdfAssembler;
pub use output::sequence::{EncodedPage, SequenceWriter};
pub use paginate::{PaginationSettings, Paginator};
pub use scan::gaps::{Gap, choose_cut, find_gaps};
pub use scan::whitespace::{ScanSettings, ScanWindow, scan_rows};
