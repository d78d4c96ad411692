// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — command-line front end.
//
// Entry point. Initialises logging, loads export settings, and runs a single
// export of a pre-rendered report image.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use folio_core::error::Result;
use folio_core::human_errors::humanize_error;
use folio_core::{ArtifactNaming, ExportConfig, ExportMode, PaperSize};
use folio_document::PdfInspector;
use folio_export::{ExportRequest, Exporter};
use folio_render::ImageFileRenderer;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Paginate tall report renders into PDFs or PNG page sequences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a pre-rendered report image
    Export(ExportArgs),

    /// Print page count and page size of an exported PDF
    Inspect {
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Write the default export settings as JSON
    InitConfig {
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Rendered report image (PNG, JPEG, ...)
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Output mode
    #[arg(short, long, value_enum, default_value = "pdf")]
    mode: ModeArg,

    /// Report kind used in file names
    #[arg(long, default_value = "Report")]
    kind: String,

    /// Subject identifier used in file names
    #[arg(long)]
    subject: String,

    /// Report date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// JSON settings file
    #[arg(short, long, env = "FOLIO_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Paper size (overrides the settings file)
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Margin in millimetres (overrides the settings file)
    #[arg(long)]
    margin_mm: Option<f64>,

    /// Pixel density the input image was captured at; the image is resampled
    /// to the configured density when they differ
    #[arg(long)]
    source_density: Option<f32>,

    /// Print the export outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// One multi-page PDF
    Pdf,
    /// One PNG per page
    Png,
}

impl From<ModeArg> for ExportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pdf => ExportMode::Document,
            ModeArg::Png => ExportMode::Sequence,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A3,
    A5,
    Letter,
    Legal,
}

impl From<PaperArg> for PaperSize {
    fn from(paper: PaperArg) -> Self {
        match paper {
            PaperArg::A4 => PaperSize::A4,
            PaperArg::A3 => PaperSize::A3,
            PaperArg::A5 => PaperSize::A5,
            PaperArg::Letter => PaperSize::Letter,
            PaperArg::Legal => PaperSize::Legal,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export(args) => run_export(args).await,
        Commands::Inspect { input } => run_inspect(input),
        Commands::InitConfig { output } => ExportConfig::default().save(&output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run_export(args: ExportArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(paper) = args.paper {
        config.paper_size = paper.into();
    }
    if let Some(margin_mm) = args.margin_mm {
        config.margin_mm = margin_mm;
    }

    let renderer = match args.source_density {
        Some(density) => ImageFileRenderer::new().with_source_density(density),
        None => ImageFileRenderer::new(),
    };
    let exporter = Exporter::new(renderer, config)?;

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let request = ExportRequest {
        mode: args.mode.into(),
        naming: ArtifactNaming::new(args.kind, args.subject, date),
        output_dir: args.output,
    };

    let outcome = exporter.export(args.input.as_path(), &request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        for file in &outcome.files {
            println!("{}", file.display());
        }
    }
    Ok(())
}

fn run_inspect(input: PathBuf) -> Result<()> {
    let inspector = PdfInspector::open(&input)?;
    let pages = inspector.page_count();
    println!("{}: {} page(s)", input.display(), pages);
    if pages > 0 {
        let (w_pt, h_pt) = inspector.page_size_pt(1)?;
        println!("page 1: {:.1} x {:.1} pt", w_pt, h_pt);
    }
    Ok(())
}
