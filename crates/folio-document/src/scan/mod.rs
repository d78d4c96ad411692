// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Whitespace detection — row classification and gap selection.

pub mod gaps;
pub mod whitespace;

pub use gaps::{Gap, choose_cut, find_gaps};
pub use whitespace::{ScanSettings, ScanWindow, scan_rows};
