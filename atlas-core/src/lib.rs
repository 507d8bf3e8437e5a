//! Company Atlas Core: loading, counting, drill-down navigation and export.
//!
//! This crate holds everything the front ends share:
//! - CSV loading with required-column validation and a content-addressed parse cache
//! - Display-only label normalization
//! - Per-category counts at coarse and fine granularity
//! - The three-stage navigation state machine (coarse → fine → results)
//! - A pure view model derived from (dataset, navigation state)
//! - Row filtering and CSV export
//! - Session ownership, TOML configuration, and a seeded sample generator

pub mod aggregate;
pub mod config;
pub mod data;
pub mod export;
pub mod labels;
pub mod navigation;
pub mod sample;
pub mod session;
pub mod view;

pub use aggregate::{coarse_counts, count_by_category, fine_counts, CategoryCount, LabelColumn};
pub use config::{AtlasConfig, ConfigError};
pub use data::{Dataset, DatasetCache, LoadError, Record, SchemaError};
pub use export::{export_filename, filter_rows, to_csv_bytes, write_export, ExportError};
pub use labels::display_label;
pub use navigation::{NavAction, NavigationState, Stage, TransitionOutcome};
pub use session::Session;
pub use view::{render, CategoryButton, GridLayout, View};
