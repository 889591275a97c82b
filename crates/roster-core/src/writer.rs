//! CSV writer with all-or-nothing persistence
//!
//! Rows are written to a temporary file beside the destination and moved
//! into place only once everything has been flushed, so a failed run never
//! leaves a truncated output behind.

use crate::error::{Error, Result};
use crate::table::Table;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write a table to `path` as UTF-8 CSV, replacing any previous file atomically
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        write_records(table, &mut writer).map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        writer.flush()?;
    }
    tmp.as_file_mut().sync_all()?;

    tmp.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), rows = table.row_count(), "wrote CSV");
    Ok(())
}

/// Fail if `output` names the same file as any of `inputs`
pub fn ensure_distinct(output: &Path, inputs: &[&Path]) -> Result<()> {
    let resolved = output.canonicalize().ok();
    for input in inputs {
        let same = match (&resolved, input.canonicalize().ok()) {
            (Some(out), Some(inp)) => *out == inp,
            _ => output == *input,
        };
        if same {
            return Err(Error::OutputIsInput {
                path: output.to_path_buf(),
            });
        }
    }
    Ok(())
}

fn write_records<W: Write>(table: &Table, writer: &mut csv::Writer<W>) -> csv::Result<()> {
    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(row.cells.iter().map(|c| c.to_string_value()))?;
    }
    Ok(())
}
