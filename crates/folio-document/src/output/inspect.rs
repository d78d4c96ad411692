// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspection — read back an exported document with `lopdf` to confirm
// page count and physical page size.

use std::collections::HashSet;
use std::path::Path;

use folio_core::error::{FolioError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

/// Read-only view of an exported PDF.
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            FolioError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Load a PDF already held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            FolioError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of the 1-based page `page_number`, taken
    /// from its MediaBox (inherited from parent nodes when absent).
    pub fn page_size_pt(&self, page_number: u32) -> Result<(f32, f32)> {
        let pages = self.document.get_pages();
        let page_id = pages.get(&page_number).ok_or_else(|| {
            FolioError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let mut visited: HashSet<ObjectId> = HashSet::new();
        let mut current = *page_id;
        loop {
            if !visited.insert(current) {
                return Err(FolioError::PdfError(format!(
                    "page tree cycle at object {:?}",
                    current
                )));
            }
            let dict = self.dictionary(current)?;
            if let Ok(media_box) = dict.get(b"MediaBox") {
                return media_box_size(media_box);
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| FolioError::PdfError("page has no MediaBox".into()))?;
        }
    }

    /// `/Filter` of every image XObject, in object order. `None` marks an
    /// unfiltered (raw) image stream.
    pub fn image_filters(&self) -> Vec<Option<String>> {
        self.document
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Stream(stream) => Some(&stream.dict),
                _ => None,
            })
            .filter(|dict| {
                dict.get(b"Subtype")
                    .and_then(Object::as_name)
                    .is_ok_and(|name| name == b"Image")
            })
            .map(|dict| dict.get(b"Filter").ok().and_then(filter_name))
            .collect()
    }

    fn dictionary(&self, id: ObjectId) -> Result<&Dictionary> {
        self.document
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|err| FolioError::PdfError(format!("object {:?}: {}", id, err)))
    }
}

fn media_box_size(media_box: &Object) -> Result<(f32, f32)> {
    let values = media_box
        .as_array()
        .map_err(|err| FolioError::PdfError(format!("MediaBox is not an array: {err}")))?
        .iter()
        .map(number)
        .collect::<Result<Vec<f32>>>()?;
    match values.as_slice() {
        [x0, y0, x1, y1] => Ok(((x1 - x0).abs(), (y1 - y0).abs())),
        other => Err(FolioError::PdfError(format!(
            "MediaBox has {} entries",
            other.len()
        ))),
    }
}

/// First filter name of a `/Filter` entry (a name or an array of names).
fn filter_name(filter: &Object) -> Option<String> {
    match filter {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(items) => items.first().and_then(filter_name),
        _ => None,
    }
}

fn number(object: &Object) -> Result<f32> {
    match object {
        Object::Integer(value) => Ok(*value as f32),
        Object::Real(value) => Ok(*value as f32),
        other => Err(FolioError::PdfError(format!("expected a number, got {other:?}"))),
    }
}
