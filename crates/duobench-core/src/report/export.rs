use std::path::Path;

use crate::error::DuobenchError;
use crate::report::render::render_text;
use crate::report::RunReport;

/// Export a run report as pretty-printed JSON.
pub fn export_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Write the text report and the JSON report to the given paths.
pub fn write_reports(
    report: &RunReport,
    text_path: &Path,
    json_path: &Path,
) -> Result<(), DuobenchError> {
    std::fs::write(text_path, render_text(report))?;
    std::fs::write(json_path, export_json(report)?)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
