// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output assembly — numbered PNG sequences, multi-page PDFs, and read-back
// inspection of produced PDFs.

pub mod inspect;
pub mod pdf;
pub mod sequence;

pub use inspect::PdfInspector;
pub use pdf::PdfAssembler;
pub use sequence::{EncodedPage, SequenceWriter};
