/// Scan report export: CSV for spreadsheets, JSON for tooling.
use crate::error::Result;
use crate::model::ScanResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Flat CSV row; the kind is written as its stable id.
#[derive(Serialize)]
struct CsvRow<'a> {
    kind: &'static str,
    name: &'a str,
    path: String,
    size_bytes: u64,
    file_count: u64,
}

pub fn write_csv<W: Write>(results: &[ScanResult], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for result in results {
        csv.serialize(CsvRow {
            kind: result.kind.id(),
            name: &result.name,
            path: result.path.to_string_lossy().into_owned(),
            size_bytes: result.size_bytes,
            file_count: result.file_count,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(results: &[ScanResult], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, results)?;
    Ok(())
}

/// Write `results` to `path`, as JSON when the extension is `.json` and as
/// CSV otherwise.
pub fn export(path: &Path, results: &[ScanResult]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        write_json(results, &mut out)?;
    } else {
        write_csv(results, &mut out)?;
    }
    out.flush()?;
    info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}
