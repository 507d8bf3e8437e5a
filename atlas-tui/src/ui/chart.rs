//! Coarse cluster distribution as horizontal bars.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use atlas_core::view::Overview;

use crate::theme;

/// Bars shown before the chart is truncated.
const MAX_BARS: usize = 8;
const LABEL_WIDTH: usize = 24;

/// Rows the chart needs, including borders.
pub fn height(overview: &Overview) -> u16 {
    (overview.chart.len().min(MAX_BARS) as u16).max(1) + 2
}

pub fn render(f: &mut Frame, area: Rect, overview: &Overview) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(format!(" Coarse clusters · {} rows ", overview.total_rows))
        .title_style(theme::panel_title(false));
    let inner = block.inner(area);

    let count_width = overview
        .chart
        .iter()
        .map(|(_, n)| n.to_string().len())
        .max()
        .unwrap_or(1);
    let bar_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + count_width + 3);
    let max = overview.chart.first().map(|(_, n)| *n).unwrap_or(0);

    let lines: Vec<Line> = overview
        .chart
        .iter()
        .take(MAX_BARS)
        .map(|(label, count)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<LABEL_WIDTH$} ", truncate(label, LABEL_WIDTH)),
                    theme::text(),
                ),
                Span::styled(bar(*count, max, bar_width), theme::neutral()),
                Span::styled(format!(" {count:>count_width$}"), theme::muted()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// A bar of `width * count / max` cells; non-zero counts get at least one.
pub fn bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 || width == 0 {
        return String::new();
    }
    let cells = (count * width / max).max(usize::from(count > 0));
    "█".repeat(cells)
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
