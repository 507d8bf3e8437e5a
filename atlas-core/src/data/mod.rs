//! Data layer: schema validation, the in-memory dataset, CSV loading, parse cache.

pub mod cache;
pub mod dataset;
pub mod loader;
pub mod schema;

pub use cache::{CacheStats, DatasetCache};
pub use dataset::{Dataset, Record};
pub use loader::{load_from_bytes, load_from_path, load_from_reader, LoadError};
pub use schema::{validate_columns, SchemaError, COARSE_LABEL, FINE_LABEL, REQUIRED_COLUMNS};
