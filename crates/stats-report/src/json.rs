//! JSON rendering of a report.

use std::io::{self, Write};

use stats_data::analysis::Report;

/// Write `report` as pretty-printed JSON followed by a newline.
pub fn render<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::other)?;
    writeln!(out)
}
