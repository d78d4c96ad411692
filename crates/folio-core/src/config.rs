// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration.
//
// The scanning constants were tuned against real report renders; the defaults
// below reproduce that tuning exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::types::{Color, PaperSize};

/// Persistent export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Physical page size of the output.
    pub paper_size: PaperSize,
    /// Page margin in millimetres. The first page has no top margin.
    pub margin_mm: f64,
    /// Device pixel ratio requested from the renderer.
    pub pixel_density: f32,
    /// Page background and renderer fill colour.
    pub background: Color,
    /// A sampled channel at or above this value counts as white (0-255).
    pub whiteness_threshold: u8,
    /// Only every Nth column is sampled when classifying a row.
    pub sample_stride: u32,
    /// Blank runs strictly taller than this are preferred as cut points.
    pub large_gap_min_px: u32,
    /// Fraction of a page's content height searched above the naive cut.
    pub lookback_fraction: f64,
    /// Absolute cap on the lookback window in pixels.
    pub lookback_cap_px: u32,
    /// Delay after rendering before pixels are scanned, giving late glyphs
    /// and icons time to paint.
    pub settle_delay_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_mm: 15.0,
            pixel_density: 4.0,
            background: Color::WHITE,
            whiteness_threshold: 250,
            sample_stride: 10,
            large_gap_min_px: 20,
            lookback_fraction: 0.3,
            lookback_cap_px: 2000,
            settle_delay_ms: 500,
        }
    }
}

impl ExportConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        let (width_mm, height_mm) = self.paper_size.dimensions_mm();
        if width_mm == 0 || height_mm == 0 {
            return Err(FolioError::InvalidConfig(
                "paper width and height must be positive".into(),
            ));
        }
        if !self.margin_mm.is_finite() || self.margin_mm < 0.0 {
            return Err(FolioError::InvalidConfig(format!(
                "margin must be a non-negative number, got {}",
                self.margin_mm
            )));
        }
        if self.margin_mm * 2.0 >= height_mm as f64 {
            return Err(FolioError::InvalidConfig(format!(
                "margin of {} mm leaves no room on a {} mm tall page",
                self.margin_mm, height_mm
            )));
        }
        if !self.pixel_density.is_finite() || self.pixel_density <= 0.0 {
            return Err(FolioError::InvalidConfig(format!(
                "pixel density must be positive, got {}",
                self.pixel_density
            )));
        }
        if self.sample_stride == 0 {
            return Err(FolioError::InvalidConfig("sample stride must be at least 1".into()));
        }
        if !(self.lookback_fraction > 0.0 && self.lookback_fraction <= 1.0) {
            return Err(FolioError::InvalidConfig(format!(
                "lookback fraction must be in (0, 1], got {}",
                self.lookback_fraction
            )));
        }
        Ok(())
    }
}
