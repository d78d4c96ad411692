// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-export — Runs one export end to end: render, settle, paginate,
// compose, and deliver, with at most one job in flight.

pub mod gate;
pub mod job;

pub use gate::{ExportGate, ExportPermit};
pub use job::{ExportJob, ExportOutcome, ExportRequest, Exporter};
