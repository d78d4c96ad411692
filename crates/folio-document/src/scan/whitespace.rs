// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Row classification. A row is blank when every sampled pixel is near-white.
//
// Only every Nth column is sampled. Reports rasterise to tens of thousands of
// rows at high density, and a thin rule narrower than the stride can be
// missed; that trade-off is accepted.

use folio_core::ExportConfig;
use folio_core::error::{FolioError, Result};
use folio_render::RasterBuffer;

/// Half-open vertical pixel range `[y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub y0: u32,
    pub y1: u32,
}

impl ScanWindow {
    /// Create a window over rows `[y0, y1)`.
    pub fn new(y0: u32, y1: u32) -> Self {
        Self { y0, y1 }
    }

    /// Number of rows covered; zero for inverted windows.
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }
}

/// Sampling parameters for row classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    /// Channel value at or above which a sample counts as white.
    pub whiteness_threshold: u8,
    /// Sample every Nth column, starting at column 0.
    pub sample_stride: u32,
}

impl ScanSettings {
    /// Scan settings taken from an export configuration.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            whiteness_threshold: config.whiteness_threshold,
            sample_stride: config.sample_stride,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

/// Classify each row of `window`: `true` means blank.
///
/// An empty window does no work and returns an empty vector, which callers
/// treat as "no information". Fails with `FolioError::Scan` when the buffer
/// forbids read-back or the window runs past the bottom of the buffer.
pub fn scan_rows(
    buffer: &RasterBuffer,
    window: ScanWindow,
    settings: &ScanSettings,
) -> Result<Vec<bool>> {
    if window.is_empty() {
        return Ok(Vec::new());
    }

    let pixels = buffer.pixels()?;
    if window.y1 > pixels.height() {
        return Err(FolioError::Scan(format!(
            "scan window {}..{} exceeds buffer height {}",
            window.y0,
            window.y1,
            pixels.height()
        )));
    }

    let threshold = settings.whiteness_threshold;
    let stride = settings.sample_stride.max(1) as usize;
    let row_bytes = pixels.width() as usize * 4;
    let raw = pixels.as_raw();

    let rows = (window.y0..window.y1)
        .map(|y| {
            let start = y as usize * row_bytes;
            raw[start..start + row_bytes]
                .chunks_exact(4)
                .step_by(stride)
                .all(|px| px[0] >= threshold && px[1] >= threshold && px[2] >= threshold)
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

    fn settings(stride: u32) -> ScanSettings {
        ScanSettings {
            whiteness_threshold: 250,
            sample_stride: stride,
        }
    }

    #[test]
    fn classifies_blank_and_inked_rows() {
        let mut img = RgbaImage::from_pixel(40, 6, WHITE);
        for x in 0..40 {
            img.put_pixel(x, 2, INK);
        }
        let buffer = RasterBuffer::new(img).unwrap();

        let rows = scan_rows(&buffer, ScanWindow::new(0, 6), &settings(1)).unwrap();
        assert_eq!(rows, vec![true, true, false, true, true, true]);
    }

    #[test]
    fn window_offset_is_respected() {
        let mut img = RgbaImage::from_pixel(10, 10, WHITE);
        img.put_pixel(0, 7, INK);
        let buffer = RasterBuffer::new(img).unwrap();

        let rows = scan_rows(&buffer, ScanWindow::new(5, 9), &settings(1)).unwrap();
        assert_eq!(rows, vec![true, true, false, true]);
    }

    #[test]
    fn threshold_is_inclusive_per_channel() {
        let mut img = RgbaImage::from_pixel(4, 3, WHITE);
        img.put_pixel(0, 0, Rgba([250, 250, 250, 255]));
        img.put_pixel(0, 1, Rgba([255, 249, 255, 255]));
        img.put_pixel(0, 2, Rgba([255, 255, 255, 0]));
        let buffer = RasterBuffer::new(img).unwrap();

        let rows = scan_rows(&buffer, ScanWindow::new(0, 3), &settings(1)).unwrap();
        // Alpha is ignored; a single channel under the threshold marks ink.
        assert_eq!(rows, vec![true, false, true]);
    }

    #[test]
    fn stride_skips_unsampled_columns() {
        let mut img = RgbaImage::from_pixel(20, 2, WHITE);
        // Column 5 is never sampled with stride 10 (samples 0 and 10).
        img.put_pixel(5, 0, INK);
        img.put_pixel(10, 1, INK);
        let buffer = RasterBuffer::new(img).unwrap();

        let rows = scan_rows(&buffer, ScanWindow::new(0, 2), &settings(10)).unwrap();
        assert_eq!(rows, vec![true, false]);
    }

    #[test]
    fn empty_window_does_no_work() {
        let buffer = RasterBuffer::tainted(RgbaImage::from_pixel(4, 4, WHITE)).unwrap();
        // Even a tainted buffer is fine: nothing is read.
        let rows = scan_rows(&buffer, ScanWindow::new(3, 3), &settings(1)).unwrap();
        assert!(rows.is_empty());
        assert!(ScanWindow::new(5, 2).is_empty());
    }

    #[test]
    fn tainted_buffer_fails_to_scan() {
        let buffer = RasterBuffer::tainted(RgbaImage::from_pixel(4, 4, WHITE)).unwrap();
        let err = scan_rows(&buffer, ScanWindow::new(0, 4), &settings(1)).unwrap_err();
        assert!(matches!(err, FolioError::Scan(_)));
    }

    #[test]
    fn window_past_bottom_fails() {
        let buffer = RasterBuffer::new(RgbaImage::from_pixel(4, 4, WHITE)).unwrap();
        assert!(scan_rows(&buffer, ScanWindow::new(2, 8), &settings(1)).is_err());
    }
}
