// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositing — copy a planned slice onto a fixed-size page canvas.

use folio_core::error::{FolioError, Result};
use folio_core::{Color, Page, PageGeometry};
use folio_render::RasterBuffer;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Render one page: a `page_width_px` x `page_height_px` canvas filled with
/// `background`, with the page's source rows copied verbatim starting at its
/// top margin.
pub fn compose_page(
    buffer: &RasterBuffer,
    page: &Page,
    geometry: &PageGeometry,
    background: Color,
) -> Result<RgbaImage> {
    let source = buffer
        .pixels()
        .map_err(|err| FolioError::Encoding(format!("page {}: {}", page.index, err)))?;

    if page.source_y_end() > source.height() {
        return Err(FolioError::Encoding(format!(
            "page {} slice {}..{} exceeds source height {}",
            page.index,
            page.source_y_start,
            page.source_y_end(),
            source.height()
        )));
    }
    if page.top_margin_px + page.slice_height > geometry.page_height_px {
        return Err(FolioError::Encoding(format!(
            "page {} slice of {} px at offset {} does not fit a {} px page",
            page.index, page.slice_height, page.top_margin_px, geometry.page_height_px
        )));
    }

    let mut canvas = RgbaImage::from_pixel(
        geometry.page_width_px,
        geometry.page_height_px,
        Rgba(background.rgba()),
    );

    let width = source.width().min(geometry.page_width_px);
    let slice =
        image::imageops::crop_imm(source, 0, page.source_y_start, width, page.slice_height)
            .to_image();
    image::imageops::replace(&mut canvas, &slice, 0, page.top_margin_px as i64);

    Ok(canvas)
}

/// Render every planned page. Pages are independent once their cut points
/// are fixed, so they are composed in parallel; output order matches `pages`.
#[instrument(skip_all, fields(pages = pages.len()))]
pub fn compose_pages(
    buffer: &RasterBuffer,
    pages: &[Page],
    geometry: &PageGeometry,
    background: Color,
) -> Result<Vec<RgbaImage>> {
    let canvases = pages
        .par_iter()
        .map(|page| compose_page(buffer, page, geometry, background))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = canvases.len(), "Pages composed");
    Ok(canvases)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn geometry() -> PageGeometry {
        PageGeometry {
            page_width_px: 10,
            page_height_px: 20,
            margin_px: 3,
        }
    }

    /// Each source row gets a distinct grey level so placement is checkable.
    fn graded_buffer(height: u32) -> RasterBuffer {
        RasterBuffer::new(RgbaImage::from_fn(10, height, |_, y| {
            let v = (y % 200) as u8;
            Rgba([v, v, v, 255])
        }))
        .unwrap()
    }

    #[test]
    fn first_page_starts_flush_with_the_top() {
        let buffer = graded_buffer(40);
        let page = Page {
            index: 0,
            source_y_start: 0,
            slice_height: 17,
            top_margin_px: 0,
        };
        let canvas = compose_page(&buffer, &page, &geometry(), Color::WHITE).unwrap();

        assert_eq!(canvas.dimensions(), (10, 20));
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(5, 16), &Rgba([16, 16, 16, 255]));
        assert_eq!(canvas.get_pixel(5, 17), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn later_pages_are_offset_by_the_margin() {
        let buffer = graded_buffer(40);
        let page = Page {
            index: 1,
            source_y_start: 17,
            slice_height: 14,
            top_margin_px: 3,
        };
        let canvas = compose_page(&buffer, &page, &geometry(), Color::WHITE).unwrap();

        assert_eq!(canvas.get_pixel(0, 2), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.get_pixel(0, 3), &Rgba([17, 17, 17, 255]));
        assert_eq!(canvas.get_pixel(0, 16), &Rgba([30, 30, 30, 255]));
        assert_eq!(canvas.get_pixel(0, 17), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn short_final_page_keeps_full_dimensions() {
        let buffer = RasterBuffer::new(RgbaImage::from_pixel(10, 5, INK)).unwrap();
        let page = Page {
            index: 2,
            source_y_start: 0,
            slice_height: 5,
            top_margin_px: 3,
        };
        let background = Color { r: 240, g: 240, b: 230 };
        let canvas = compose_page(&buffer, &page, &geometry(), background).unwrap();
        assert_eq!(canvas.dimensions(), (10, 20));
        assert_eq!(canvas.get_pixel(9, 19), &Rgba([240, 240, 230, 255]));
        assert_eq!(canvas.get_pixel(9, 7), &INK);
    }

    #[test]
    fn slice_past_source_is_rejected() {
        let buffer = graded_buffer(10);
        let page = Page {
            index: 0,
            source_y_start: 5,
            slice_height: 6,
            top_margin_px: 0,
        };
        assert!(matches!(
            compose_page(&buffer, &page, &geometry(), Color::WHITE),
            Err(FolioError::Encoding(_))
        ));
    }

    #[test]
    fn tainted_source_cannot_be_composed() {
        let buffer = RasterBuffer::tainted(RgbaImage::from_pixel(10, 10, INK)).unwrap();
        let page = Page {
            index: 0,
            source_y_start: 0,
            slice_height: 10,
            top_margin_px: 0,
        };
        assert!(compose_page(&buffer, &page, &geometry(), Color::WHITE).is_err());
    }

    #[test]
    fn parallel_composition_preserves_order() {
        let buffer = graded_buffer(45);
        let pages = vec![
            Page { index: 0, source_y_start: 0, slice_height: 17, top_margin_px: 0 },
            Page { index: 1, source_y_start: 17, slice_height: 14, top_margin_px: 3 },
            Page { index: 2, source_y_start: 31, slice_height: 14, top_margin_px: 3 },
        ];
        let canvases = compose_pages(&buffer, &pages, &geometry(), Color::WHITE).unwrap();
        assert_eq!(canvases.len(), 3);
        assert_eq!(canvases[1].get_pixel(0, 3), &Rgba([17, 17, 17, 255]));
        assert_eq!(canvases[2].get_pixel(0, 3), &Rgba([31, 31, 31, 255]));
    }
}
