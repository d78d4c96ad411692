// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sequence output — one lossless PNG per page.
//
// Delivery is all-or-nothing: every page is encoded in memory before the
// first file is written, pages are staged as `.part` files, and only a fully
// staged sequence is renamed onto the final names.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use folio_core::ArtifactNaming;
use folio_core::error::{FolioError, Result};
use image::{ImageFormat, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

/// A page encoded and named, ready to be written.
#[derive(Debug, Clone)]
pub struct EncodedPage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Encodes pages as PNG and writes them with deterministic names.
pub struct SequenceWriter {
    naming: ArtifactNaming,
}

impl SequenceWriter {
    /// Create a writer that names pages after `naming`.
    pub fn new(naming: ArtifactNaming) -> Self {
        Self { naming }
    }

    /// Encode every page. Fails on the first page that cannot be encoded.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn encode(&self, pages: &[RgbaImage]) -> Result<Vec<EncodedPage>> {
        pages
            .par_iter()
            .enumerate()
            .map(|(index, page)| {
                let bytes = encode_png(page).map_err(|err| {
                    FolioError::Encoding(format!("page {}: {}", index + 1, err))
                })?;
                Ok(EncodedPage {
                    file_name: self.naming.page_file_name(index),
                    bytes,
                })
            })
            .collect()
    }

    /// Write encoded pages into `dir`, returning the final paths in page
    /// order. Every page goes to a `.part` file first; the final names are
    /// only touched once all pages are on disk, so a failed write leaves any
    /// earlier export under the same names untouched.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display(), pages = encoded.len()))]
    pub fn write(&self, encoded: &[EncodedPage], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(encoded.len());
        for page in encoded {
            let path = dir.join(&page.file_name);
            let partial = dir.join(format!("{}.part", page.file_name));
            if let Err(err) = std::fs::write(&partial, &page.bytes) {
                warn!(
                    error = %err,
                    path = %partial.display(),
                    staged = staged.len(),
                    "Page write failed, discarding staged pages"
                );
                discard(std::iter::once(&partial).chain(staged.iter().map(|(p, _)| p)));
                return Err(err.into());
            }
            debug!(path = %partial.display(), bytes = page.bytes.len(), "Page staged");
            staged.push((partial, path));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (index, (partial, path)) in staged.iter().enumerate() {
            if let Err(err) = std::fs::rename(partial, path) {
                warn!(
                    error = %err,
                    path = %path.display(),
                    renamed = written.len(),
                    "Page rename failed, discarding remaining staged pages"
                );
                discard(staged[index..].iter().map(|(p, _)| p));
                return Err(err.into());
            }
            written.push(path.clone());
        }

        info!(count = written.len(), "Page sequence written");
        Ok(written)
    }

    /// Encode then write; no file is created unless every page encodes.
    pub fn export(&self, pages: &[RgbaImage], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let encoded = self.encode(pages)?;
        self.write(&encoded, dir)
    }
}

/// Best-effort removal of staged `.part` files.
fn discard<'a>(partials: impl IntoIterator<Item = &'a PathBuf>) {
    for partial in partials {
        if let Err(err) = std::fs::remove_file(partial) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %err, path = %partial.display(), "Staged page cleanup failed");
            }
        }
    }
}

/// Lossless PNG encoding of a page canvas.
pub fn encode_png(page: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    page.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| FolioError::Encoding(format!("PNG encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use image::Rgba;

    fn naming() -> ArtifactNaming {
        ArtifactNaming::new("Anamnesis", "P-7", NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())
    }

    fn pages(count: usize) -> Vec<RgbaImage> {
        (0..count)
            .map(|i| RgbaImage::from_pixel(8, 12, Rgba([i as u8 * 40, 0, 0, 255])))
            .collect()
    }

    #[test]
    fn encoded_pages_are_named_in_order() {
        let encoded = SequenceWriter::new(naming()).encode(&pages(3)).unwrap();
        let names: Vec<&str> = encoded.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Anamnesis_P-7_2026-05-01_Page01.png",
                "Anamnesis_P-7_2026-05-01_Page02.png",
                "Anamnesis_P-7_2026-05-01_Page03.png",
            ]
        );
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let page = RgbaImage::from_fn(16, 16, |x, y| Rgba([x as u8 * 13, y as u8 * 7, 99, 255]));
        let bytes = encode_png(&page).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, page);
    }

    #[test]
    fn export_writes_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SequenceWriter::new(naming()).export(&pages(2), dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn failed_write_leaves_no_staged_pages() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SequenceWriter::new(naming());
        let encoded = writer.encode(&pages(3)).unwrap();
        // A directory squatting on the last staging name makes that write fail.
        std::fs::create_dir(dir.path().join(format!("{}.part", encoded[2].file_name))).unwrap();

        assert!(writer.write(&encoded, dir.path()).is_err());
        for page in &encoded[..2] {
            assert!(!dir.path().join(&page.file_name).exists());
            assert!(!dir.path().join(format!("{}.part", page.file_name)).exists());
        }
    }

    #[test]
    fn failed_write_keeps_a_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SequenceWriter::new(naming());
        let encoded = writer.encode(&pages(3)).unwrap();
        let first = dir.path().join(&encoded[0].file_name);
        std::fs::write(&first, b"previous export").unwrap();
        std::fs::create_dir(dir.path().join(format!("{}.part", encoded[2].file_name))).unwrap();

        assert!(writer.write(&encoded, dir.path()).is_err());
        assert_eq!(std::fs::read(&first).unwrap(), b"previous export");
    }

    #[test]
    fn successful_write_replaces_a_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SequenceWriter::new(naming());
        let encoded = writer.encode(&pages(1)).unwrap();
        let first = dir.path().join(&encoded[0].file_name);
        std::fs::write(&first, b"previous export").unwrap();

        let paths = writer.write(&encoded, dir.path()).unwrap();
        assert_eq!(paths, vec![first.clone()]);
        assert_eq!(std::fs::read(&first).unwrap(), encoded[0].bytes);
        assert!(!dir.path().join(format!("{}.part", encoded[0].file_name)).exists());
    }
}
