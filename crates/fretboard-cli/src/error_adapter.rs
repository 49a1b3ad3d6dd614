//! Error adapter for converting FretboardError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use fretboard::FretboardError;

/// Adapter giving a [`FretboardError`] a diagnostic code and help line.
pub struct ErrorAdapter<'a>(pub &'a FretboardError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            FretboardError::Io(_) => "fretboard::io",
            FretboardError::Validation(_) => "fretboard::validation",
            FretboardError::Json(_) => "fretboard::json",
            FretboardError::Config(_) => "fretboard::config",
            FretboardError::Render(_) => "fretboard::render",
            FretboardError::Encode(_) => "fretboard::encode",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            FretboardError::Validation(err) => err.help(),
            FretboardError::Json(_) => {
                "expected an object with `title`, `frets`, `mode` and `mapping` fields"
            }
            FretboardError::Config(_) => "check the TOML configuration file",
            FretboardError::Io(_) | FretboardError::Render(_) | FretboardError::Encode(_) => {
                return None;
            }
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Render `err` as a miette report.
pub fn render_report(err: &FretboardError) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut writer = String::new();
    if reporter
        .render_report(&mut writer, &ErrorAdapter(err))
        .is_err()
    {
        return err.to_string();
    }
    writer
}
