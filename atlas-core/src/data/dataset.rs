//! In-memory table of company records.

use super::schema::{validate_columns, SchemaError, COARSE_LABEL, FINE_LABEL};

/// One row of the loaded table. Cells are the raw strings read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    cells: Vec<String>,
}

impl Record {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Ordered records plus column names.
///
/// Always carries both label columns; construction fails otherwise.
/// Immutable once built: filtering produces a new dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    coarse_idx: usize,
    fine_idx: usize,
    content_hash: Option<String>,
}

impl Dataset {
    /// Build a dataset, validating that both label columns are present.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self, SchemaError> {
        validate_columns(&columns)?;
        let coarse_idx = position(&columns, COARSE_LABEL)?;
        let fine_idx = position(&columns, FINE_LABEL)?;
        Ok(Self {
            columns,
            records,
            coarse_idx,
            fine_idx,
            content_hash: None,
        })
    }

    /// Attach the BLAKE3 hash of the bytes this dataset was parsed from.
    pub(crate) fn with_content_hash(mut self, hash: String) -> Self {
        self.content_hash = Some(hash);
        self
    }

    /// Hash of the source bytes, if the dataset came from the loader.
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn coarse_idx(&self) -> usize {
        self.coarse_idx
    }

    pub fn fine_idx(&self) -> usize {
        self.fine_idx
    }

    /// Raw coarse label of a record.
    pub fn coarse_of<'a>(&self, record: &'a Record) -> &'a str {
        record.get(self.coarse_idx).unwrap_or_default()
    }

    /// Raw fine label of a record.
    pub fn fine_of<'a>(&self, record: &'a Record) -> &'a str {
        record.get(self.fine_idx).unwrap_or_default()
    }

    /// First `n` records (fewer if the dataset is shorter).
    pub fn head(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// New dataset with the same columns and only the records matching `keep`.
    ///
    /// Row order is preserved. The result carries no content hash.
    pub fn retain_matching<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&Record) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
            coarse_idx: self.coarse_idx,
            fine_idx: self.fine_idx,
            content_hash: None,
        }
    }
}

fn position(columns: &[String], name: &str) -> Result<usize, SchemaError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| SchemaError::MissingColumns {
            missing: vec![name.to_string()],
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_resolves_label_positions() {
        let ds = Dataset::new(
            cols(&["name", "fine_label", "coarse_label"]),
            vec![Record::from_iter(["A", "AI", "Tech"])],
        )
        .unwrap();
        assert_eq!(ds.coarse_idx(), 2);
        assert_eq!(ds.fine_idx(), 1);
        let rec = &ds.records()[0];
        assert_eq!(ds.coarse_of(rec), "Tech");
        assert_eq!(ds.fine_of(rec), "AI");
    }

    #[test]
    fn test_new_rejects_missing_labels() {
        let err = Dataset::new(cols(&["name"]), vec![]).unwrap_err();
        assert_eq!(err.missing().len(), 2);
    }

    #[test]
    fn test_head_clamps_to_length() {
        let ds = Dataset::new(
            cols(&["coarse_label", "fine_label"]),
            vec![
                Record::from_iter(["Tech", "AI"]),
                Record::from_iter(["Tech", "Cloud"]),
            ],
        )
        .unwrap();
        assert_eq!(ds.head(10).len(), 2);
        assert_eq!(ds.head(1).len(), 1);
        assert!(ds.head(0).is_empty());
    }

    #[test]
    fn test_retain_matching_keeps_columns_and_order() {
        let ds = Dataset::new(
            cols(&["coarse_label", "fine_label", "name"]),
            vec![
                Record::from_iter(["Tech", "AI", "A"]),
                Record::from_iter(["Health", "General", "D"]),
                Record::from_iter(["Tech", "AI", "B"]),
            ],
        )
        .unwrap()
        .with_content_hash("abc".into());

        let tech = ds.retain_matching(|r| ds.coarse_of(r) == "Tech");
        assert_eq!(tech.columns(), ds.columns());
        assert_eq!(tech.len(), 2);
        assert_eq!(tech.records()[0].get(2), Some("A"));
        assert_eq!(tech.records()[1].get(2), Some("B"));
        assert_eq!(tech.content_hash(), None);
    }
}
