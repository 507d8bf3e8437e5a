//! Results export: row filtering and CSV serialization.
//!
//! Filtering compares raw stored labels; display normalization never applies.
//! The CSV keeps the source column order, includes the header row, and has no
//! index column.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::Dataset;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rows whose coarse and fine labels equal `coarse` and `fine` exactly.
pub fn filter_rows(dataset: &Dataset, coarse: &str, fine: &str) -> Dataset {
    dataset.retain_matching(|r| dataset.coarse_of(r) == coarse && dataset.fine_of(r) == fine)
}

/// Serialize a dataset to UTF-8 CSV bytes, header first.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(dataset.columns())?;
    for record in dataset.records() {
        wtr.write_record(record.cells())?;
    }
    wtr.into_inner().map_err(|e| ExportError::Flush(e.to_string()))
}

/// Suggested download name: `<coarse>__<fine>.csv` using raw labels.
pub fn export_filename(coarse: &str, fine: &str) -> String {
    format!("{coarse}__{fine}.csv")
}

/// On-disk form of [`export_filename`]: path separators become `_`.
pub fn safe_filename(coarse: &str, fine: &str) -> String {
    export_filename(coarse, fine)
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

/// Filter, serialize, and write the export under `dir`. Returns the file path.
pub fn write_export(
    dir: &Path,
    dataset: &Dataset,
    coarse: &str,
    fine: &str,
) -> Result<PathBuf, ExportError> {
    let filtered = filter_rows(dataset, coarse, fine);
    let bytes = to_csv_bytes(&filtered)?;

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(safe_filename(coarse, fine));
    std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        rows = filtered.len(),
        "exported matching rows"
    );
    Ok(path)
}
