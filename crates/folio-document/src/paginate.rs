// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paginator — split a tall raster into page slices, moving each non-final
// break up into the nearest usable whitespace band.
//
// Each cut depends on where the previous page ended, so this loop is
// sequential. It always advances by at least one row, which bounds it at
// `height` iterations.

use folio_core::{ExportConfig, Page, PageGeometry};
use folio_render::RasterBuffer;
use tracing::{debug, info, instrument, warn};

use crate::scan::gaps::choose_cut;
use crate::scan::whitespace::{ScanSettings, ScanWindow, scan_rows};

/// Tuning for the content-aware cut search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationSettings {
    pub scan: ScanSettings,
    /// Gaps strictly taller than this are preferred.
    pub large_gap_min_px: u32,
    /// Share of the page's content height searched above the naive cut.
    pub lookback_fraction: f64,
    /// Hard cap on the search window.
    pub lookback_cap_px: u32,
}

impl PaginationSettings {
    /// Pagination settings taken from an export configuration.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            scan: ScanSettings::from_config(config),
            large_gap_min_px: config.large_gap_min_px,
            lookback_fraction: config.lookback_fraction,
            lookback_cap_px: config.lookback_cap_px,
        }
    }

    /// Height of the window scanned above a naive cut.
    pub fn lookback(&self, max_content: u32) -> u32 {
        let fractional = (self.lookback_fraction * max_content as f64).floor() as u32;
        fractional.min(self.lookback_cap_px)
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

/// Plans the page slices for one raster.
#[derive(Debug, Clone)]
pub struct Paginator {
    geometry: PageGeometry,
    settings: PaginationSettings,
}

impl Paginator {
    /// Create a paginator for one page geometry.
    pub fn new(geometry: PageGeometry, settings: PaginationSettings) -> Self {
        Self { geometry, settings }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Produce the ordered page plan covering every row of `buffer`.
    #[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
    pub fn paginate(&self, buffer: &RasterBuffer) -> Vec<Page> {
        let total_height = buffer.height();
        let mut pages = Vec::new();
        let mut current_y: u32 = 0;

        while current_y < total_height {
            let index = pages.len();
            let top_margin_px = self.geometry.top_margin(index);
            let max_content = self.geometry.max_content(top_margin_px);
            let remaining = total_height - current_y;
            let mut slice_height = max_content.min(remaining);

            if slice_height < remaining {
                let boundary = current_y + slice_height;
                let cut = self.content_aware_cut(buffer, current_y, boundary, max_content);
                slice_height = cut.saturating_sub(current_y).max(1);
            }

            debug!(
                index,
                source_y_start = current_y,
                slice_height,
                top_margin_px,
                "Page planned"
            );
            pages.push(Page {
                index,
                source_y_start: current_y,
                slice_height,
                top_margin_px,
            });
            current_y += slice_height;
        }

        info!(pages = pages.len(), "Pagination complete");
        pages
    }

    /// Cut row for a page whose naive break is `boundary`. Falls back to the
    /// naive break when the pixels cannot be read.
    fn content_aware_cut(
        &self,
        buffer: &RasterBuffer,
        current_y: u32,
        boundary: u32,
        max_content: u32,
    ) -> u32 {
        let lookback = self.settings.lookback(max_content);
        let window = ScanWindow::new(boundary.saturating_sub(lookback).max(current_y), boundary);

        match scan_rows(buffer, window, &self.settings.scan) {
            Ok(rows) => choose_cut(&rows, window.y0, boundary, self.settings.large_gap_min_px),
            Err(err) => {
                warn!(error = %err, boundary, "Whitespace scan failed, using hard cut");
                boundary
            }
        }
    }
}
