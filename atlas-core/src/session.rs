//! One user's session: active dataset, navigation state, preview toggle, parse cache.
//!
//! Nothing here is shared between sessions. A front end creates one `Session`
//! per user and feeds it load requests and navigation actions.

use std::path::Path;
use std::sync::Arc;

use crate::config::AtlasConfig;
use crate::data::{Dataset, DatasetCache, LoadError, Record};
use crate::navigation::{NavAction, NavigationState, TransitionOutcome};
use crate::view::{render, GridLayout, View};

#[derive(Debug)]
pub struct Session {
    dataset: Option<Arc<Dataset>>,
    navigation: NavigationState,
    preview: bool,
    preview_rows: usize,
    layout: GridLayout,
    cache: DatasetCache,
}

impl Session {
    pub fn new(config: &AtlasConfig) -> Self {
        Self {
            dataset: None,
            navigation: NavigationState::new(),
            preview: config.display.preview_on_start,
            preview_rows: config.display.preview_rows,
            layout: GridLayout::new(config.display.max_grid_columns),
            cache: DatasetCache::new(config.cache.capacity),
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Load a dataset from bytes.
    ///
    /// On success the dataset replaces the current one; navigation resets when
    /// the content differs. On failure the dataset is cleared so no stage is
    /// reachable until a valid file is loaded.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<&Dataset, LoadError> {
        let loaded = self.cache.load(bytes);
        self.install(loaded)
    }

    /// Read and load a file.
    pub fn load_path(&mut self, path: &Path) -> Result<&Dataset, LoadError> {
        let loaded = self.cache.load_path(path);
        if let Err(e) = &loaded {
            tracing::warn!(path = %path.display(), error = %e, "failed to load dataset");
        }
        self.install(loaded)
    }

    fn install(&mut self, loaded: Result<Arc<Dataset>, LoadError>) -> Result<&Dataset, LoadError> {
        match loaded {
            Ok(dataset) => {
                let same = match (&self.dataset, dataset.content_hash()) {
                    (Some(current), Some(hash)) => current.content_hash() == Some(hash),
                    _ => false,
                };
                if !same {
                    self.navigation = NavigationState::new();
                }
                tracing::info!(
                    rows = dataset.len(),
                    columns = dataset.columns().len(),
                    reused = same,
                    "dataset loaded"
                );
                Ok(&**self.dataset.insert(dataset))
            }
            Err(e) => {
                self.dataset = None;
                self.navigation = NavigationState::new();
                Err(e)
            }
        }
    }

    /// Restore a previously persisted navigation state for the current dataset.
    pub fn restore_navigation(&mut self, state: NavigationState) {
        if self.dataset.is_some() {
            self.navigation = state.normalized();
        }
    }

    /// Apply a navigation action. Ignored while no dataset is loaded.
    pub fn apply(&mut self, action: NavAction) -> TransitionOutcome {
        match &self.dataset {
            Some(dataset) => self.navigation.apply(action, dataset),
            None => TransitionOutcome::Ignored,
        }
    }

    /// View for the current state, if a dataset is loaded.
    pub fn view(&self) -> Option<View> {
        self.dataset
            .as_deref()
            .map(|ds| render(ds, &self.navigation, self.layout))
    }

    pub fn preview_enabled(&self) -> bool {
        self.preview
    }

    pub fn set_preview(&mut self, on: bool) {
        self.preview = on;
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview = !self.preview;
        self.preview
    }

    /// First rows of the dataset when the preview toggle is on.
    pub fn preview(&self) -> Option<&[Record]> {
        match (&self.dataset, self.preview) {
            (Some(ds), true) => Some(ds.head(self.preview_rows)),
            _ => None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&AtlasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Stage;

    const TECH: &[u8] = b"coarse_label,fine_label,name\nTech,AI,A\nTech,AI,B\nHealth,General,D\n";
    const RETAIL: &[u8] = b"coarse_label,fine_label,name\nRetail,Shops,E\n";

    #[test]
    fn test_no_dataset_ignores_actions() {
        let mut session = Session::default();
        assert_eq!(
            session.apply(NavAction::SelectCoarse("Tech".into())),
            TransitionOutcome::Ignored
        );
        assert!(session.view().is_none());
    }

    #[test]
    fn test_schema_error_clears_dataset() {
        let mut session = Session::default();
        session.load_bytes(TECH).unwrap();
        session.apply(NavAction::SelectCoarse("Tech".into()));

        let err = session.load_bytes(b"uuid\n1\n").unwrap_err();
        assert!(err.as_schema().is_some());
        assert!(session.dataset().is_none());
        assert_eq!(session.navigation().stage(), Stage::Coarse);
        assert!(session.view().is_none());
    }

    #[test]
    fn test_reloading_same_bytes_keeps_navigation() {
        let mut session = Session::default();
        session.load_bytes(TECH).unwrap();
        session.apply(NavAction::SelectCoarse("Tech".into()));
        session.load_bytes(TECH).unwrap();

        assert_eq!(session.navigation().stage(), Stage::Fine);
        assert_eq!(session.cache().stats().hits, 1);
    }

    #[test]
    fn test_new_dataset_resets_navigation() {
        let mut session = Session::default();
        session.load_bytes(TECH).unwrap();
        session.apply(NavAction::SelectCoarse("Tech".into()));
        session.load_bytes(RETAIL).unwrap();

        assert_eq!(session.navigation(), &NavigationState::new());
    }

    #[test]
    fn test_preview_toggle() {
        let mut session = Session::default();
        session.load_bytes(TECH).unwrap();
        assert!(session.preview().is_none());
        assert!(session.toggle_preview());
        assert_eq!(session.preview().map(<[Record]>::len), Some(3));
    }

    #[test]
    fn test_preview_is_capped() {
        let mut config = AtlasConfig::default();
        config.display.preview_rows = 2;
        config.display.preview_on_start = true;
        let mut session = Session::new(&config);
        session.load_bytes(TECH).unwrap();
        assert_eq!(session.preview().map(<[Record]>::len), Some(2));
    }

    #[test]
    fn test_restore_navigation_requires_dataset() {
        let mut session = Session::default();
        let mut state = NavigationState::new();
        let ds = crate::sample::generate(5, 1);
        state.apply(NavAction::SelectCoarse("Tech".into()), &ds);

        session.restore_navigation(state.clone());
        assert_eq!(session.navigation().stage(), Stage::Coarse);

        session.load_bytes(TECH).unwrap();
        session.restore_navigation(state);
        assert_eq!(session.navigation().stage(), Stage::Fine);
    }
}
