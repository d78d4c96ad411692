// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the folio-document crate: whitespace scanning and
// full pagination of a tall synthetic report.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use folio_core::{PageGeometry, PaperSize};
use folio_document::{PaginationSettings, Paginator, ScanSettings, ScanWindow, scan_rows};
use folio_render::RasterBuffer;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 2400 px wide, 20000 px tall "report": 90 px text blocks separated by
/// 24 px blank bands, roughly what a 4x render of a long form looks like.
fn synthetic_report() -> RasterBuffer {
    let image = RgbaImage::from_fn(2400, 20_000, |x, y| {
        let in_block = y % 114 < 90;
        if in_block && x % 7 != 0 {
            Rgba([30, 30, 30, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    RasterBuffer::new(image).expect("non-empty fixture")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_scan_window(c: &mut Criterion) {
    let buffer = synthetic_report();
    let settings = ScanSettings::default();

    c.bench_function("scan_rows (2000 rows x 2400 px)", |b| {
        b.iter(|| {
            let rows = scan_rows(&buffer, black_box(ScanWindow::new(5000, 7000)), &settings);
            black_box(rows.expect("clean buffer"));
        });
    });
}

fn bench_paginate(c: &mut Criterion) {
    let buffer = synthetic_report();
    let geometry =
        PageGeometry::from_paper(PaperSize::A4, 15.0, buffer.width()).expect("valid geometry");
    let paginator = Paginator::new(geometry, PaginationSettings::default());

    c.bench_function("paginate (2400 x 20000)", |b| {
        b.iter(|| black_box(paginator.paginate(black_box(&buffer))));
    });
}

criterion_group!(benches, bench_scan_window, bench_paginate);
criterion_main!(benches);
