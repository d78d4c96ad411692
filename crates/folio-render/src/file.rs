// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Renderer backed by an image that was rasterised ahead of time (for example
// a headless-browser screenshot of the full report).

use std::path::Path;

use folio_core::Color;
use folio_core::error::{FolioError, Result};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use tracing::{Span, debug, info, instrument};

use crate::raster::RasterBuffer;
use crate::traits::{RenderOptions, Renderer};

/// Loads a pre-rendered report image from disk.
///
/// There is no element tree, so the exclude predicate does not apply. Any
/// transparency is flattened onto the requested background.
#[derive(Debug, Clone, Default)]
pub struct ImageFileRenderer {
    /// Pixel density the file was captured at. When set and different from
    /// the requested density, the image is resampled.
    source_density: Option<f32>,
}

impl ImageFileRenderer {
    /// Create a renderer that uses the file at its captured density.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the density the file was captured at.
    pub fn with_source_density(mut self, density: f32) -> Self {
        self.source_density = Some(density);
        self
    }
}

impl Renderer for ImageFileRenderer {
    type Node = Path;

    #[instrument(skip_all, fields(path = %node.display()))]
    async fn render(&self, node: &Path, options: &RenderOptions) -> Result<RasterBuffer> {
        let path = node.to_path_buf();
        let source_density = self.source_density;
        let target_density = options.pixel_density;
        let background = options.background;

        // Decode, resample and flatten are all CPU-bound; keep them off the
        // async worker threads.
        let span = Span::current();
        let image = tokio::task::spawn_blocking(move || {
            span.in_scope(|| load_flattened(&path, source_density, target_density, background))
        })
        .await
        .map_err(|err| FolioError::Render(format!("render task failed: {err}")))??;

        RasterBuffer::new(image)
    }
}

/// Decode the image at `path`, resample it to `target_density` when the
/// capture density is known, and flatten it onto `background`.
fn load_flattened(
    path: &Path,
    source_density: Option<f32>,
    target_density: f32,
    background: Color,
) -> Result<RgbaImage> {
    let decoded = image::open(path)
        .map_err(|err| FolioError::Render(format!("failed to open {}: {}", path.display(), err)))?
        .to_rgba8();
    info!(width = decoded.width(), height = decoded.height(), "Pre-rendered image loaded");

    let image = match source_density {
        Some(source) => rescale(decoded, source, target_density),
        None => decoded,
    };
    Ok(flatten_onto(image, background))
}

/// Resample from `source` to `target` pixel density.
fn rescale(image: RgbaImage, source: f32, target: f32) -> RgbaImage {
    if source <= 0.0 || (target / source - 1.0).abs() < 0.01 {
        return image;
    }
    let ratio = target / source;
    let width = ((image.width() as f32 * ratio).round() as u32).max(1);
    let height = ((image.height() as f32 * ratio).round() as u32).max(1);
    debug!(source, target, width, height, "Resampling to requested density");
    image::imageops::resize(&image, width, height, FilterType::Lanczos3)
}

/// Composite every pixel over an opaque background.
fn flatten_onto(mut image: RgbaImage, background: Color) -> RgbaImage {
    let bg = [background.r, background.g, background.b];
    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        if a == 255 {
            continue;
        }
        let alpha = a as u32;
        let blend = |channel: u8, under: u8| -> u8 {
            ((channel as u32 * alpha + under as u32 * (255 - alpha) + 127) / 255) as u8
        };
        *pixel = Rgba([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2]), 255]);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_pixels_take_the_background() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let flat = flatten_onto(image, Color::WHITE);
        assert_eq!(flat.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn opaque_pixels_are_untouched() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let flat = flatten_onto(image, Color::WHITE);
        assert_eq!(flat.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn rescale_doubles_dimensions() {
        let image = RgbaImage::from_pixel(10, 20, Rgba([0, 0, 0, 255]));
        let scaled = rescale(image, 2.0, 4.0);
        assert_eq!(scaled.dimensions(), (20, 40));
    }

    #[test]
    fn load_rescales_and_flattens_in_one_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.png");
        RgbaImage::from_pixel(10, 20, Rgba([0, 0, 0, 0])).save(&path).unwrap();

        let image = load_flattened(&path, Some(2.0), 4.0, Color::WHITE).unwrap();
        assert_eq!(image.dimensions(), (20, 40));
        assert!(image.pixels().all(|px| px.0 == [255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn source_density_resamples_through_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.png");
        RgbaImage::from_pixel(10, 20, Rgba([0, 0, 0, 255])).save(&path).unwrap();

        let options = RenderOptions {
            pixel_density: 4.0,
            ..RenderOptions::default()
        };
        let buffer = ImageFileRenderer::new()
            .with_source_density(2.0)
            .render(&path, &options)
            .await
            .unwrap();
        assert_eq!((buffer.width(), buffer.height()), (20, 40));
    }

    #[tokio::test]
    async fn renders_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.png");
        RgbaImage::from_pixel(30, 60, Rgba([0, 0, 0, 128])).save(&path).unwrap();

        let buffer = ImageFileRenderer::new()
            .render(&path, &RenderOptions::default())
            .await
            .unwrap();
        assert_eq!((buffer.width(), buffer.height()), (30, 60));
        let px = buffer.pixels().unwrap().get_pixel(0, 0);
        assert_eq!(px.0[3], 255);
    }

    #[tokio::test]
    async fn missing_file_is_a_render_failure() {
        let err = ImageFileRenderer::new()
            .render(Path::new("/nonexistent/report.png"), &RenderOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::Render(_)));
    }
}
