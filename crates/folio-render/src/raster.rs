// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Immutable RGBA pixel grid produced once per export.

use folio_core::error::{FolioError, Result};
use image::RgbaImage;

/// The rendered report, read-only once produced.
///
/// A buffer whose content came from a source that forbids read-back is
/// marked tainted; it keeps its dimensions but every pixel access fails.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    image: RgbaImage,
    origin_clean: bool,
}

impl RasterBuffer {
    /// Wrap a freshly rendered image. Empty images are a render failure.
    pub fn new(image: RgbaImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FolioError::Render(format!(
                "renderer produced an empty {}x{} buffer",
                image.width(),
                image.height()
            )));
        }
        Ok(Self {
            image,
            origin_clean: true,
        })
    }

    /// Wrap an image whose pixels may not be read back.
    pub fn tainted(image: RgbaImage) -> Result<Self> {
        let mut buffer = Self::new(image)?;
        buffer.origin_clean = false;
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_origin_clean(&self) -> bool {
        self.origin_clean
    }

    /// Borrow the pixel grid for reading.
    pub fn pixels(&self) -> Result<&RgbaImage> {
        if self.origin_clean {
            Ok(&self.image)
        } else {
            Err(FolioError::Scan(
                "buffer is tainted by content that forbids pixel read-back".into(),
            ))
        }
    }
}
