//! JSON output formatting.

use crate::results::ScanResultSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Print results in JSON format.
pub fn print_json(set: &ScanResultSet) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, set)
}

/// Write pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, set: &ScanResultSet) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, set).map_err(io::Error::other)?;
    writeln!(out)
}

/// Write the JSON document to a file, replacing any existing content.
pub fn write_json_file(set: &ScanResultSet, path: &Path) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write_json(&mut file, set)?;
    file.flush()
}
