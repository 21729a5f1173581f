//! Presentation layer for the streaming-history statistics tool.
//!
//! Renders a finished [`stats_data::analysis::Report`] either in the fixed
//! plain-text layout or as JSON.

pub mod console;
pub mod json;

use std::io::Write;

use stats_core::models::OutputFormat;
use stats_data::analysis::Report;

/// Write `report` to `out` in the requested `format`.
pub fn render<W: Write>(out: &mut W, report: &Report, format: OutputFormat) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => console::render(out, report),
        OutputFormat::Json => json::render(out, report),
    }
}
