// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Folio export engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FolioError, Result};

/// Unique identifier for one export invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportId(pub Uuid);

impl ExportId {
    /// Generate a fresh random export id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Opaque RGB colour used for page backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Pixel dimensions of one physical page, scaled to the raster's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width_px: u32,
    pub page_height_px: u32,
    pub margin_px: u32,
}

impl PageGeometry {
    /// Derive page geometry from a physical paper size.
    ///
    /// The page is as wide as the raster; height and margin keep the paper's
    /// physical proportions. For A4 with a 15 mm margin and a 1000 px wide
    /// raster this yields 1000 x 1414 with a 71 px margin.
    pub fn from_paper(paper: PaperSize, margin_mm: f64, raster_width_px: u32) -> Result<Self> {
        let (width_mm, height_mm) = paper.dimensions_mm();
        if width_mm == 0 || height_mm == 0 {
            return Err(FolioError::InvalidConfig(format!(
                "paper size must be non-zero, got {width_mm}x{height_mm} mm"
            )));
        }
        if raster_width_px == 0 {
            return Err(FolioError::InvalidConfig("raster width is zero".into()));
        }

        let px_per_mm = raster_width_px as f64 / width_mm as f64;
        let page_height_px = (height_mm as f64 * px_per_mm).round() as u32;
        let margin_px = (margin_mm.max(0.0) * px_per_mm).round() as u32;

        Ok(Self {
            page_width_px: raster_width_px,
            page_height_px,
            margin_px,
        })
    }

    /// Top margin for the page at `index`. The first page starts flush.
    pub fn top_margin(&self, index: usize) -> u32 {
        if index == 0 { 0 } else { self.margin_px }
    }

    /// Vertical content budget for a page with the given top margin. Never
    /// below 1 so that pagination always advances.
    pub fn max_content(&self, top_margin_px: u32) -> u32 {
        self.page_height_px
            .saturating_sub(top_margin_px)
            .saturating_sub(self.margin_px)
            .max(1)
    }
}

/// Extraction plan for a single output page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Zero-based page index.
    pub index: usize,
    /// First source row copied onto this page.
    pub source_y_start: u32,
    /// Number of source rows copied. Always at least 1.
    pub slice_height: u32,
    /// Vertical offset of the slice on the page canvas.
    pub top_margin_px: u32,
}

impl Page {
    /// One past the last source row on this page.
    pub fn source_y_end(&self) -> u32 {
        self.source_y_start + self.slice_height
    }
}

/// How finished pages are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportMode {
    /// One multi-page PDF.
    Document,
    /// One PNG per page.
    Sequence,
}

/// Identifiers used to build artifact names:
/// `{kind}_{subject}_{isoDate}` plus `_Page{NN}.png` or `.pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNaming {
    /// Report kind, e.g. `Anamnesis` or `ProgressNote`.
    pub kind: String,
    /// Subject identifier, e.g. a patient record number.
    pub subject: String,
    pub date: NaiveDate,
}

impl ArtifactNaming {
    /// Create naming identifiers; components are sanitised when names are built.
    pub fn new(kind: impl Into<String>, subject: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            kind: kind.into(),
            subject: subject.into(),
            date,
        }
    }

    /// Shared stem of every artifact produced by one export.
    pub fn stem(&self) -> String {
        format!(
            "{}_{}_{}",
            sanitize_component(&self.kind),
            sanitize_component(&self.subject),
            self.date.format("%Y-%m-%d")
        )
    }

    /// File name of the page at zero-based `index` in sequence mode.
    pub fn page_file_name(&self, index: usize) -> String {
        format!("{}_Page{:02}.png", self.stem(), index + 1)
    }

    /// File name of the combined document.
    pub fn document_file_name(&self) -> String {
        format!("{}.pdf", self.stem())
    }
}

/// Replace anything that is not ASCII alphanumeric or `-` with `_`.
fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "untitled".into()
    } else {
        cleaned
    }
}
