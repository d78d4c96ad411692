// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export job — plan the pages of a rendered report and deliver them.
//
// Pipeline per invocation:
//   1. claim the gate (reject if busy)
//   2. render the subtree (fatal on failure, nothing written)
//   3. wait the settling delay so late glyphs and icons finish painting
//   4. paginate, compose, encode, write (on a blocking worker)
//
// Nothing is persisted between jobs and a started job cannot be cancelled.

use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_core::error::{FolioError, Result};
use folio_core::{ArtifactNaming, ExportConfig, ExportId, ExportMode, Page, PageGeometry};
use folio_document::{PaginationSettings, Paginator, PdfAssembler, SequenceWriter, compose_pages};
use folio_render::{RasterBuffer, RenderOptions, Renderer};
use serde::Serialize;
use tracing::{Instrument, Span, debug, error, info, info_span, instrument};

use crate::gate::ExportGate;

/// What the caller wants exported and where.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub mode: ExportMode,
    pub naming: ArtifactNaming,
    pub output_dir: PathBuf,
}

/// Result of a successful export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub id: ExportId,
    pub mode: ExportMode,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    /// Files written, in page order (a single file in document mode).
    pub files: Vec<PathBuf>,
}

/// The page plan for one rendered report.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub id: ExportId,
    pub mode: ExportMode,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl ExportJob {
    /// Derive geometry from the buffer width and plan every page.
    #[instrument(skip_all, fields(id = %id))]
    pub fn plan(
        id: ExportId,
        buffer: &RasterBuffer,
        config: &ExportConfig,
        mode: ExportMode,
    ) -> Result<Self> {
        let geometry = PageGeometry::from_paper(config.paper_size, config.margin_mm, buffer.width())?;
        debug!(?geometry, "Page geometry derived");

        let pages = Paginator::new(geometry, PaginationSettings::from_config(config)).paginate(buffer);
        Ok(Self {
            id,
            mode,
            geometry,
            pages,
        })
    }

    /// Compose every page and deliver it in the job's mode.
    #[instrument(skip_all, fields(id = %self.id, mode = ?self.mode, pages = self.pages.len()))]
    pub fn execute(
        &self,
        buffer: &RasterBuffer,
        config: &ExportConfig,
        naming: &ArtifactNaming,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let canvases = compose_pages(buffer, &self.pages, &self.geometry, config.background)?;

        match self.mode {
            ExportMode::Sequence => SequenceWriter::new(naming.clone()).export(&canvases, output_dir),
            ExportMode::Document => {
                let mut assembler = PdfAssembler::new(config.paper_size);
                assembler.set_title(naming.stem());

                std::fs::create_dir_all(output_dir)?;
                let path = output_dir.join(naming.document_file_name());
                assembler.write_to_file(&canvases, &path)?;
                Ok(vec![path])
            }
        }
    }
}

/// Runs exports against one renderer, one at a time.
pub struct Exporter<R> {
    renderer: R,
    config: ExportConfig,
    gate: ExportGate,
}

impl<R: Renderer> Exporter<R> {
    /// Create an exporter; fails if `config` does not validate.
    pub fn new(renderer: R, config: ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            config,
            gate: ExportGate::new(),
        })
    }

    /// Use an existing gate, e.g. one shared with other exporters in the
    /// same process.
    pub fn with_gate(mut self, gate: ExportGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }

    /// Run one export to completion or failure.
    ///
    /// Fails with `FolioError::ExportBusy` without doing any work if another
    /// export holds the gate. Errors carry diagnostic detail for the log;
    /// show users `folio_core::human_errors::humanize_error` instead.
    pub async fn export(&self, node: &R::Node, request: &ExportRequest) -> Result<ExportOutcome> {
        let _permit = self.gate.try_begin()?;
        let id = ExportId::new();
        let span = info_span!("export", %id, mode = ?request.mode);

        let outcome = self.run(id, node, request).instrument(span).await;
        if let Err(err) = &outcome {
            error!(%id, error = %err, "Export failed");
        }
        outcome
    }

    async fn run(&self, id: ExportId, node: &R::Node, request: &ExportRequest) -> Result<ExportOutcome> {
        info!(stem = %request.naming.stem(), "Export started");

        let options = RenderOptions::from_config(&self.config);
        let buffer = self.renderer.render(node, &options).await.map_err(|err| match err {
            FolioError::Render(_) => err,
            other => FolioError::Render(other.to_string()),
        })?;
        info!(width = buffer.width(), height = buffer.height(), "Report rendered");

        if self.config.settle_delay_ms > 0 {
            debug!(delay_ms = self.config.settle_delay_ms, "Waiting for late content to settle");
            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        }

        let config = self.config.clone();
        let request = request.clone();
        let span = Span::current();

        let outcome = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let job = ExportJob::plan(id, &buffer, &config, request.mode)?;
            let files = job.execute(&buffer, &config, &request.naming, &request.output_dir)?;
            Ok::<_, FolioError>(ExportOutcome {
                id,
                mode: job.mode,
                geometry: job.geometry,
                pages: job.pages,
                files,
            })
        })
        .await
        .map_err(|err| FolioError::Encoding(format!("export worker failed: {err}")))??;

        info!(pages = outcome.pages.len(), files = outcome.files.len(), "Export complete");
        Ok(outcome)
    }
}
