//! JSON reports printed by the CLI.

use serde::Serialize;
use std::path::Path;
use vellum::{IngestError, IngestResult, JsonError, MediaReference, VellumResult};

/// Outcome for one input item.
#[derive(Debug, Serialize)]
pub struct ItemReport {
    /// File path or URL as given on the command line
    pub input: String,
    /// Whether the item went through
    pub ok: bool,
    /// Reference produced, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<MediaReference>,
    /// Error message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Not attempted because the widget takes a single file
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

impl ItemReport {
    /// Item accepted without producing a reference.
    pub fn accepted(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ok: true,
            reference: None,
            error: None,
            skipped: false,
        }
    }

    /// Item left out of a single-file upload.
    pub fn skipped(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ok: false,
            reference: None,
            error: Some("Skipped: only one file is uploaded without --multiple".to_string()),
            skipped: true,
        }
    }

    /// Item rejected with `error`.
    pub fn failed(input: impl Into<String>, error: &IngestError) -> Self {
        Self {
            input: input.into(),
            ok: false,
            reference: None,
            error: Some(error.message()),
            skipped: false,
        }
    }

    /// Report from a pipeline result.
    pub fn from_result(input: impl Into<String>, result: IngestResult<MediaReference>) -> Self {
        match result {
            Ok(reference) => Self {
                input: input.into(),
                ok: true,
                reference: Some(reference),
                error: None,
                skipped: false,
            },
            Err(error) => Self::failed(input, &error),
        }
    }
}

/// Display form of a path argument.
pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> VellumResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Prints the reports and returns whether every item succeeded.
pub fn print_reports(reports: &[ItemReport]) -> VellumResult<bool> {
    print_json(&reports)?;
    Ok(reports.iter().all(|report| report.ok))
}
