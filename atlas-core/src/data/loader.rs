//! CSV loading for company datasets.
//!
//! Parsing steps:
//! 1. Read the header row, trimming surrounding whitespace from each name
//! 2. Validate that `coarse_label` and `fine_label` are present
//! 3. Read every data row as raw strings; short rows are padded with empty
//!    cells, rows wider than the header are rejected
//!
//! Loading from bytes also records a BLAKE3 content hash on the dataset, which
//! the parse cache uses as its key.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::dataset::{Dataset, Record};
use super::schema::{validate_columns, SchemaError};

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row on line {line} has {found} fields, but the header has {expected}")]
    RowTooLong {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// The schema failure, if this load failed validation.
    pub fn as_schema(&self) -> Option<&SchemaError> {
        match self {
            LoadError::Schema(e) => Some(e),
            _ => None,
        }
    }
}

/// Parse a dataset from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // Validate before reading rows so a wrong file fails fast.
    validate_columns(&columns)?;

    let width = columns.len();
    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.len() > width {
            return Err(LoadError::RowTooLong {
                line: row.position().map_or(0, |p| p.line()),
                expected: width,
                found: row.len(),
            });
        }
        let padding = std::iter::repeat("").take(width - row.len());
        records.push(Record::from_iter(row.iter().chain(padding)));
    }

    tracing::debug!(
        columns = columns.len(),
        rows = records.len(),
        "parsed dataset"
    );

    Ok(Dataset::new(columns, records)?)
}

/// Parse a dataset from in-memory bytes and tag it with their content hash.
pub fn load_from_bytes(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let hash = content_hash(bytes);
    let dataset = load_from_reader(bytes)?;
    Ok(dataset.with_content_hash(hash))
}

/// Read a file fully and parse it.
pub fn load_from_path(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = read_file(path)?;
    load_from_bytes(&bytes)
}

/// Read a file into memory, mapping failures to `LoadError::Io`.
pub fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Hex BLAKE3 digest of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
uuid,name,coarse_label,fine_label
1,A,Tech,AI
2,B,Tech,AI
3,C,Tech,Cloud
4,D,Health,General
";

    #[test]
    fn test_load_counts_rows() {
        let ds = load_from_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.columns(), ["uuid", "name", "coarse_label", "fine_label"]);
        assert!(ds.content_hash().is_some());
    }

    #[test]
    fn test_load_trims_header_whitespace() {
        let csv = " name , coarse_label ,fine_label\nA,Tech,AI\n";
        let ds = load_from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.columns(), ["name", "coarse_label", "fine_label"]);
        assert_eq!(ds.coarse_of(&ds.records()[0]), "Tech");
    }

    #[test]
    fn test_load_keeps_cell_whitespace() {
        let csv = "coarse_label,fine_label\n Tech ,AI\n";
        let ds = load_from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.coarse_of(&ds.records()[0]), " Tech ");
    }

    #[test]
    fn test_load_missing_columns_lists_all() {
        let csv = "uuid,name\n1,A\n";
        let err = load_from_bytes(csv.as_bytes()).unwrap_err();
        let schema = err.as_schema().expect("schema error");
        assert_eq!(schema.missing(), ["coarse_label", "fine_label"]);
    }

    #[test]
    fn test_load_header_only_is_empty_dataset() {
        let csv = "coarse_label,fine_label\n";
        let ds = load_from_bytes(csv.as_bytes()).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_load_empty_input_is_schema_error() {
        let err = load_from_bytes(b"").unwrap_err();
        assert!(err.as_schema().is_some());
    }

    #[test]
    fn test_load_long_row_is_rejected() {
        let csv = "coarse_label,fine_label\nTech,AI\nTech,AI,extra\n";
        let err = load_from_bytes(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RowTooLong {
                line: 3,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_load_pads_short_rows() {
        let csv = "name,coarse_label,fine_label\nA,Tech,AI\nB,Tech\n";
        let ds = load_from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let short = &ds.records()[1];
        assert_eq!(short.len(), 3);
        assert_eq!(ds.coarse_of(short), "Tech");
        assert_eq!(ds.fine_of(short), "");
    }

    #[test]
    fn test_load_quoted_fields() {
        let csv = "name,coarse_label,fine_label\n\"Acme, Inc.\",Tech,\"AI \"\"Labs\"\"\"\n";
        let ds = load_from_bytes(csv.as_bytes()).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.get(0), Some("Acme, Inc."));
        assert_eq!(ds.fine_of(rec), "AI \"Labs\"");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_from_path(Path::new("/nonexistent/atlas.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
    }
}
