//! App state persistence: JSON save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use atlas_core::NavigationState;

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_file: Option<PathBuf>,
    /// BLAKE3 hash of `last_file` when `navigation` was saved.
    pub content_hash: Option<String>,
    pub navigation: NavigationState,
    pub preview: bool,
    pub help_dismissed: bool,
}

/// Default location: `{config_dir}/atlas/state.json`.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("atlas")
        .join("state.json")
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_file: app.last_file.clone(),
        content_hash: app
            .session
            .dataset()
            .and_then(|ds| ds.content_hash())
            .map(str::to_string),
        navigation: app.session.navigation().clone(),
        preview: app.session.preview_enabled(),
        help_dismissed: app.help_dismissed,
    }
}

/// Apply persisted state to AppState.
///
/// Reopens the last file. The saved navigation is restored only if the file
/// loads and its content is unchanged since the state was saved.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.help_dismissed = state.help_dismissed;
    if !state.help_dismissed {
        app.overlay = Overlay::Help;
    }
    app.session.set_preview(state.preview);

    if let Some(path) = state.last_file {
        app.open_file(&path);
        let Some(current) = app.session.dataset().and_then(|ds| ds.content_hash()) else {
            return;
        };
        if state.content_hash.as_deref() == Some(current) {
            app.session.restore_navigation(state.navigation);
        } else {
            tracing::info!(
                path = %path.display(),
                "file changed since last session; starting at coarse clusters"
            );
        }
    }
}
