//! Application state: single-owner, main-thread only.
//!
//! Wraps one [`Session`] with the terminal-only concerns: button cursor,
//! overlays, the open-file prompt, status line and error history.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use atlas_core::navigation::{NavAction, Stage, TransitionOutcome};
use atlas_core::view::{StageView, NO_FINE_CLUSTERS};
use atlas_core::{write_export, AtlasConfig, Session, View};

/// Errors kept in the history overlay.
pub const ERROR_HISTORY_CAP: usize = 50;

/// Rows moved by PgUp/PgDn in the results table.
pub const RESULTS_PAGE: usize = 10;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Load,
    Export,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Load => "LOAD",
            ErrorCategory::Export => "EXPORT",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    OpenFile,
    ErrorHistory,
}

/// Cursor movement within the button grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub session: Session,
    /// Index of the highlighted category button.
    pub cursor: usize,
    /// First visible row of the results table.
    pub results_scroll: usize,
    pub overlay: Overlay,
    /// Text typed into the open-file prompt.
    pub path_input: String,
    pub last_file: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub help_dismissed: bool,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
}

impl AppState {
    pub fn new(config: &AtlasConfig) -> Self {
        Self {
            running: true,
            session: Session::new(config),
            cursor: 0,
            results_scroll: 0,
            overlay: Overlay::None,
            path_input: String::new(),
            last_file: None,
            export_dir: config.export.dir.clone(),
            help_dismissed: false,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
        }
    }

    /// View for the current session state, if a dataset is loaded.
    pub fn view(&self) -> Option<View> {
        self.session.view()
    }

    pub fn stage(&self) -> Option<Stage> {
        self.session.dataset().map(|_| self.session.navigation().stage())
    }

    /// Load a CSV file into the session.
    pub fn open_file(&mut self, path: &Path) {
        match self.session.load_path(path) {
            Ok(ds) => {
                let msg = format!("Loaded {} rows from {}", ds.len(), path.display());
                self.last_file = Some(path.to_path_buf());
                self.cursor = 0;
                self.results_scroll = 0;
                self.set_status(msg);
            }
            Err(e) => {
                self.cursor = 0;
                self.push_error(
                    ErrorCategory::Load,
                    e.to_string(),
                    path.display().to_string(),
                );
            }
        }
    }

    /// Move the button cursor, clamped to the current grid.
    pub fn move_cursor(&mut self, dir: Move) {
        let Some(view) = self.view() else {
            return;
        };
        let count = view.stage.buttons().len();
        if count == 0 {
            return;
        }
        let columns = match &view.stage {
            StageView::Coarse(v) => v.grid_columns,
            StageView::Fine(v) => v.grid_columns,
            StageView::Results(_) => return,
        };
        let cursor = self.cursor.min(count - 1);
        self.cursor = match dir {
            Move::Left => cursor.saturating_sub(1),
            Move::Right => (cursor + 1).min(count - 1),
            Move::Up => cursor.saturating_sub(columns),
            Move::Down if cursor + columns < count => cursor + columns,
            Move::Down => cursor,
        };
    }

    /// Select the button under the cursor.
    pub fn select(&mut self) {
        let Some(view) = self.view() else {
            return;
        };
        let Some(button) = view.stage.buttons().get(self.cursor) else {
            return;
        };
        let action = match view.stage.stage() {
            Stage::Coarse => NavAction::SelectCoarse(button.category.clone()),
            Stage::Fine => NavAction::SelectFine(button.category.clone()),
            Stage::Results => return,
        };
        self.navigate(action);
    }

    /// Scroll the results table, clamped so the last row stays reachable.
    pub fn scroll_results(&mut self, delta: isize) {
        let Some(view) = self.view() else {
            return;
        };
        let StageView::Results(results) = &view.stage else {
            return;
        };
        let last = results.matching_rows().saturating_sub(1);
        self.results_scroll = self.results_scroll.saturating_add_signed(delta).min(last);
    }

    pub fn back(&mut self) {
        self.navigate(NavAction::Back);
    }

    /// Reset is offered from the results screen only.
    pub fn reset(&mut self) {
        if self.stage() == Some(Stage::Results) {
            self.navigate(NavAction::Reset);
        }
    }

    fn navigate(&mut self, action: NavAction) {
        match self.session.apply(action) {
            TransitionOutcome::Moved { to, .. } => {
                self.cursor = 0;
                self.results_scroll = 0;
                self.status_message = None;
                tracing::debug!(stage = ?to, "stage changed");
            }
            TransitionOutcome::NoFineClusters => self.set_warning(NO_FINE_CLUSTERS),
            TransitionOutcome::Ignored => {}
        }
    }

    /// Write the results of the current drill-down to the export directory.
    pub fn save_export(&mut self) {
        let Some(view) = self.view() else {
            return;
        };
        let StageView::Results(results) = view.stage else {
            self.set_warning("Pick a fine cluster before exporting");
            return;
        };
        let Some(dataset) = self.session.dataset() else {
            return;
        };
        match write_export(&self.export_dir, dataset, &results.coarse, &results.fine) {
            Ok(path) => self.set_status(format!(
                "Saved {} rows to {}",
                results.matching_rows(),
                path.display()
            )),
            Err(e) => self.push_error(
                ErrorCategory::Export,
                e.to_string(),
                results.filename.clone(),
            ),
        }
    }

    /// Open the file prompt, prefilled with the last file.
    pub fn prompt_open(&mut self) {
        self.path_input = self
            .last_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.overlay = Overlay::OpenFile;
    }

    pub fn toggle_preview(&mut self) {
        if self.session.dataset().is_none() {
            self.set_warning("Load a file to preview rows");
            return;
        }
        let on = self.session.toggle_preview();
        self.set_status(if on { "Preview on" } else { "Preview off" });
    }

    /// Push an error to the history, capping at [`ERROR_HISTORY_CAP`].
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        tracing::warn!(category = category.label(), %message, %context, "user-visible error");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        self.error_history.truncate(ERROR_HISTORY_CAP);
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
