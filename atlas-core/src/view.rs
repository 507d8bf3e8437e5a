//! Pure view model.
//!
//! `render` turns `(Dataset, NavigationState)` into everything a front end
//! needs to draw the current stage. No state lives here; the shell calls it
//! again after every action.

use crate::aggregate::{coarse_counts, fine_counts, rows_in_coarse, CategoryCount};
use crate::data::Dataset;
use crate::export::{export_filename, filter_rows};
use crate::labels::display_label;
use crate::navigation::{NavigationState, Stage};

/// Grid sizing for category buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub max_columns: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { max_columns: 3 }
    }
}

impl GridLayout {
    pub fn new(max_columns: usize) -> Self {
        Self {
            max_columns: max_columns.max(1),
        }
    }

    /// Buttons per row: the maximum when there are more than two buttons,
    /// otherwise one per button. Never more columns than buttons, never zero.
    pub fn columns_for(&self, buttons: usize) -> usize {
        let max = self.max_columns.max(1);
        let cols = if buttons > 2 { max } else { buttons };
        cols.clamp(1, max).min(buttons.max(1))
    }

    /// Number of grid rows needed for `buttons`.
    pub fn rows_for(&self, buttons: usize) -> usize {
        buttons.div_ceil(self.columns_for(buttons))
    }
}

/// One clickable category. Identity is `(category, position)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryButton {
    /// Raw stored label (used for selection and filtering).
    pub category: String,
    /// Position in the count-sorted list.
    pub position: usize,
    pub count: usize,
    /// `"<display label> (<count>)"`
    pub caption: String,
}

impl CategoryButton {
    fn from_counts(counts: &[CategoryCount]) -> Vec<CategoryButton> {
        counts
            .iter()
            .enumerate()
            .map(|(position, c)| CategoryButton {
                category: c.category.clone(),
                position,
                count: c.count,
                caption: format!("{} ({})", display_label(&c.category), c.count),
            })
            .collect()
    }

    pub fn display(&self) -> &str {
        display_label(&self.category)
    }
}

/// Always-visible summary: total rows and the coarse bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub total_rows: usize,
    /// (display label, count), merged by display label, most frequent first.
    pub chart: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoarseView {
    pub heading: String,
    pub buttons: Vec<CategoryButton>,
    pub grid_columns: usize,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineView {
    pub heading: String,
    pub coarse: String,
    pub rows_in_coarse: usize,
    pub buttons: Vec<CategoryButton>,
    pub grid_columns: usize,
    pub caption: String,
    /// Set when the coarse cluster has no rows.
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub heading: String,
    pub coarse: String,
    pub fine: String,
    pub matching: Dataset,
    pub matching_caption: String,
    pub filename: String,
    pub download_label: String,
}

impl ResultsView {
    pub fn matching_rows(&self) -> usize {
        self.matching.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageView {
    Coarse(CoarseView),
    Fine(FineView),
    Results(ResultsView),
}

impl StageView {
    pub fn stage(&self) -> Stage {
        match self {
            StageView::Coarse(_) => Stage::Coarse,
            StageView::Fine(_) => Stage::Fine,
            StageView::Results(_) => Stage::Results,
        }
    }

    /// Buttons the user can pick from at this stage (empty in `Results`).
    pub fn buttons(&self) -> &[CategoryButton] {
        match self {
            StageView::Coarse(v) => &v.buttons,
            StageView::Fine(v) => &v.buttons,
            StageView::Results(_) => &[],
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub overview: Overview,
    pub stage: StageView,
}

pub const NO_FINE_CLUSTERS: &str = "No fine clusters found under this coarse cluster.";

/// Build the view for `state` over `dataset`.
///
/// A state whose selections do not satisfy its stage renders as `Coarse`.
pub fn render(dataset: &Dataset, state: &NavigationState, layout: GridLayout) -> View {
    let coarse = coarse_counts(dataset);
    let overview = Overview {
        total_rows: dataset.len(),
        chart: chart_bars(&coarse),
    };

    let stage = match (state.stage(), state.active_coarse(), state.active_fine()) {
        (Stage::Results, Some(c), Some(f)) => StageView::Results(results_view(dataset, c, f)),
        (Stage::Fine, Some(c), _) => StageView::Fine(fine_view(dataset, c, layout)),
        _ => StageView::Coarse(coarse_view(dataset, &coarse, layout)),
    };

    View { overview, stage }
}

fn coarse_view(dataset: &Dataset, counts: &[CategoryCount], layout: GridLayout) -> CoarseView {
    let buttons = CategoryButton::from_counts(counts);
    CoarseView {
        heading: "Step 1 — Pick a Coarse Cluster".to_string(),
        grid_columns: layout.columns_for(buttons.len()),
        buttons,
        caption: format!("Total rows: {}", dataset.len()),
    }
}

fn fine_view(dataset: &Dataset, coarse: &str, layout: GridLayout) -> FineView {
    let shown = display_label(coarse);
    let in_coarse = rows_in_coarse(dataset, coarse);
    let buttons = CategoryButton::from_counts(&fine_counts(dataset, coarse));
    FineView {
        heading: format!("Step 2 — Fine Clusters in: {shown}"),
        coarse: coarse.to_string(),
        rows_in_coarse: in_coarse,
        grid_columns: layout.columns_for(buttons.len()),
        warning: buttons.is_empty().then(|| NO_FINE_CLUSTERS.to_string()),
        buttons,
        caption: format!("Rows in '{shown}': {in_coarse}"),
    }
}

fn results_view(dataset: &Dataset, coarse: &str, fine: &str) -> ResultsView {
    let matching = filter_rows(dataset, coarse, fine);
    ResultsView {
        heading: format!(
            "Results — {} ➜ {}",
            display_label(coarse),
            display_label(fine)
        ),
        coarse: coarse.to_string(),
        fine: fine.to_string(),
        matching_caption: format!("Matching rows: {}", matching.len()),
        matching,
        filename: export_filename(coarse, fine),
        download_label: format!("Download CSV for {}", display_label(fine)),
    }
}

/// Merge counts by display label (the chart shows display names only).
fn chart_bars(counts: &[CategoryCount]) -> Vec<(String, usize)> {
    let mut bars: Vec<(String, usize)> = Vec::new();
    for c in counts {
        let label = display_label(&c.category);
        match bars.iter_mut().find(|(l, _)| l == label) {
            Some((_, n)) => *n += c.count,
            None => bars.push((label.to_string(), c.count)),
        }
    }
    bars.sort_by(|a, b| b.1.cmp(&a.1));
    bars
}
