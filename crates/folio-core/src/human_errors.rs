// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for clinicians exporting a report.
//
// Internal detail (renderer messages, codec errors, paths) is never shown.
// Every pipeline failure collapses into one generic message with a retry hint;
// the technical error is logged by the caller.

use crate::error::FolioError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something went wrong mid-export. Trying again usually helps.
    Transient,
    /// The user must change something first (wait, fix settings).
    ActionRequired,
}

/// A user-facing error with a plain-language message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary, shown as a heading.
    pub message: String,
    /// What the user should do next.
    pub suggestion: String,
    /// Whether re-invoking the export is a sensible next step. Folio never
    /// retries on its own.
    pub retriable: bool,
    pub severity: Severity,
}

const GENERIC_MESSAGE: &str = "The report could not be exported.";
const GENERIC_SUGGESTION: &str = "Please wait a moment and try the export again.";

/// Convert a `FolioError` into the message shown to the user.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        FolioError::ExportBusy => HumanError {
            message: "An export is already running.".into(),
            suggestion: "Wait for the current export to finish, then try again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        FolioError::InvalidConfig(_) => HumanError {
            message: "The export settings are not valid.".into(),
            suggestion: "Check the page size and margin settings, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // Scan errors are normally recovered inside the paginator; if one
        // escapes it is treated like any other pipeline failure.
        FolioError::Render(_)
        | FolioError::Scan(_)
        | FolioError::Encoding(_)
        | FolioError::PdfError(_)
        | FolioError::Io(_)
        | FolioError::Serialization(_) => generic(),
    }
}

fn generic() -> HumanError {
    HumanError {
        message: GENERIC_MESSAGE.into(),
        suggestion: GENERIC_SUGGESTION.into(),
        retriable: true,
        severity: Severity::Transient,
    }
}
