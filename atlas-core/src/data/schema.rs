//! Required-column schema for company datasets.

/// Column holding the coarse cluster label.
pub const COARSE_LABEL: &str = "coarse_label";

/// Column holding the fine cluster label.
pub const FINE_LABEL: &str = "fine_label";

/// Columns every dataset must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 2] = [COARSE_LABEL, FINE_LABEL];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

impl SchemaError {
    /// The missing columns, in `REQUIRED_COLUMNS` order.
    pub fn missing(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns { missing } => missing,
        }
    }
}

/// Check that every required column is present (exact, case-sensitive).
///
/// Collects all missing columns rather than stopping at the first one.
pub fn validate_columns<S: AsRef<str>>(columns: &[S]) -> Result<(), SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|c| c.as_ref() == **required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns { missing })
    }
}
