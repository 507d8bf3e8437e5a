//! Shared fixtures for unit tests.

use atlas_core::AtlasConfig;
use tempfile::TempDir;

use crate::app::AppState;

/// Three coarse clusters; `Tech` has two fine clusters.
pub const COMPANIES: &str = "\
coarse_label,fine_label,name
Tech,AI,A
Tech,AI,B
Tech,Cloud,C
Health,General,D
Retail,Unclustered,E
";

/// App with `csv` written to `companies.csv` in a temp dir and opened.
/// Keep the returned dir alive for the duration of the test.
pub fn app_with_file(csv: &str) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("companies.csv");
    std::fs::write(&path, csv).unwrap();

    let mut app = AppState::new(&AtlasConfig::default());
    app.open_file(&path);
    (app, dir)
}
