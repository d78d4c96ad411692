// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Renderer boundary.
//
// The export core never rasterises anything itself. A `Renderer` turns a
// report subtree into a `RasterBuffer`; everything downstream works on that
// buffer alone, so pagination can be tested with synthetic pixels.

pub mod file;
pub mod raster;
pub mod traits;

pub use file::ImageFileRenderer;
pub use raster::RasterBuffer;
pub use traits::{ExcludePredicate, NodeDescriptor, RenderOptions, Renderer};
