// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::config::consts::CSV_SEP;
use crate::config::options::ExportOptions;
use crate::csv::{parse_rows, write_row};
use crate::error::ExportError;
use crate::record::MonsterRecord;
use crate::store::DataSet;

/// Where a write ended up.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub csv_path: PathBuf,
    pub sqlite_path: Option<PathBuf>,
    pub rows: usize,
}

/// Write the CSV (and the SQLite table when configured) for `records`.
pub fn write_export(records: &[MonsterRecord], export: &ExportOptions) -> Result<ExportSummary, ExportError> {
    let csv_path = write_dataset_csv(records, export.out_path())?;
    let sqlite_path = write_sqlite(records, export)?;

    Ok(ExportSummary {
        csv_path,
        sqlite_path,
        rows: records.len(),
    })
}

#[cfg(feature = "sqlite")]
fn write_sqlite(records: &[MonsterRecord], export: &ExportOptions) -> Result<Option<PathBuf>, ExportError> {
    match &export.sqlite_path {
        Some(db) => {
            crate::store::save_sqlite(records, db)?;
            Ok(Some(db.clone()))
        }
        None => Ok(None),
    }
}

#[cfg(not(feature = "sqlite"))]
fn write_sqlite(_records: &[MonsterRecord], export: &ExportOptions) -> Result<Option<PathBuf>, ExportError> {
    if let Some(db) = &export.sqlite_path {
        tracing::warn!(path = %db.display(), "built without the `sqlite` feature; skipping database");
    }
    Ok(None)
}

/// Create/truncate `path` and write one header plus one row per record.
/// Same records in, same bytes out.
pub fn write_dataset_csv(records: &[MonsterRecord], path: &Path) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let data = DataSet::from_records(records);
    let file = File::create(path)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_row(&mut out, &data.headers, CSV_SEP)?;
    for row in &data.rows {
        write_row(&mut out, row, CSV_SEP)?;
    }
    out.flush()?;

    info!(path = %path.display(), rows = data.rows.len(), columns = data.headers.len(), "wrote CSV");
    Ok(path.to_path_buf())
}

/// Read a CSV written by [`write_dataset_csv`]; the first row is the header.
pub fn read_dataset_csv(path: &Path) -> Result<DataSet, ExportError> {
    let text = fs::read_to_string(path)?;
    let mut rows = parse_rows(&text, CSV_SEP);
    let headers = if rows.is_empty() { Vec::new() } else { rows.remove(0) };
    Ok(DataSet { headers, rows })
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c=='/'||c=='\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.display().to_string()));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &str) -> bool {
    p.ends_with('/') || p.ends_with('\\')
}
