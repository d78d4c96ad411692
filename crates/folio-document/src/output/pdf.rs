// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document output — one multi-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: each `PdfPage` holds a `Vec<Op>`, and
// `PdfDocument::save()` serialises the lot. Every page canvas is embedded as a
// full-bleed RGB image, forced through Flate. printpdf's automatic format
// choice may pick DCT, and leaving optimisation off stores raw pixels, so
// neither is used.

use std::path::Path;

use folio_core::PaperSize;
use folio_core::error::{FolioError, Result};
use image::buffer::ConvertBuffer;
use image::{RgbImage, RgbaImage};
use printpdf::{
    ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

const MM_PER_INCH: f32 = 25.4;

/// Assembles page canvases into a single PDF sized to the physical paper.
pub struct PdfAssembler {
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfAssembler {
    /// Create a new assembler targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
    }

    /// Create a new assembler defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Build the PDF. Pages appear in slice order, one canvas per page.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn assemble(&self, pages: &[RgbaImage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(FolioError::Encoding("no pages to assemble".into()));
        }

        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Folio Report");
        info!(paper = ?self.paper_size, title, "Assembling PDF");

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (index, canvas) in pages.iter().enumerate() {
            if canvas.width() == 0 || canvas.height() == 0 {
                return Err(FolioError::Encoding(format!("page {} is empty", index + 1)));
            }

            let rgb: RgbImage = canvas.convert();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: canvas.width() as usize,
                height: canvas.height() as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Stretch the canvas across the full page width; the canvas was
            // built with the paper's aspect ratio, so the height fits too.
            let dpi = canvas.width() as f32 / (page_w.0 / MM_PER_INCH);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(dpi),
                    rotate: None,
                },
            }];
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(page = index + 1, dpi, "Page embedded");
        }

        doc.with_pages(pdf_pages);

        let options = PdfSaveOptions {
            image_optimization: Some(ImageOptimizationOptions {
                format: Some(ImageCompression::Flate),
                auto_optimize: Some(false),
                quality: None,
                ..ImageOptimizationOptions::default()
            }),
            ..PdfSaveOptions::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&options, &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        info!(bytes = output.len(), "PDF assembled");
        Ok(output)
    }

    /// Assemble and write the PDF to `path`.
    ///
    /// The bytes go to a sibling `.pdf.part` file that is renamed into place,
    /// so a failed write never leaves a truncated document (or clobbers an
    /// earlier one) under the final name.
    pub fn write_to_file(&self, pages: &[RgbaImage], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.assemble(pages)?;

        let partial = path.with_extension("pdf.part");
        if let Err(err) = std::fs::write(&partial, &bytes).and_then(|_| std::fs::rename(&partial, path))
        {
            if let Err(cleanup) = std::fs::remove_file(&partial) {
                warn!(error = %cleanup, path = %partial.display(), "Partial PDF cleanup failed");
            }
            return Err(err.into());
        }

        info!(bytes = bytes.len(), "Wrote PDF to {}", path.display());
        Ok(())
    }
}
