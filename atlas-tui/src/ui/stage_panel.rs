//! Stage panel: button grid for coarse/fine selection, table for results.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use atlas_core::view::{CategoryButton, ResultsView, StageView};
use atlas_core::View;

use crate::theme;

const BUTTON_HEIGHT: u16 = 1;

pub fn render(f: &mut Frame, area: Rect, view: &View, cursor: usize, results_scroll: usize) {
    match &view.stage {
        StageView::Coarse(v) => render_grid(
            f,
            area,
            &v.heading,
            &v.caption,
            None,
            &v.buttons,
            v.grid_columns,
            cursor,
            "[h/j/k/l]move [Enter]select",
        ),
        StageView::Fine(v) => render_grid(
            f,
            area,
            &v.heading,
            &v.caption,
            v.warning.as_deref(),
            &v.buttons,
            v.grid_columns,
            cursor,
            "[h/j/k/l]move [Enter]select [Esc]back",
        ),
        StageView::Results(v) => render_results(f, area, v, results_scroll),
    }
}

#[allow(clippy::too_many_arguments)]
fn render_grid(
    f: &mut Frame,
    area: Rect,
    heading: &str,
    caption: &str,
    warning: Option<&str>,
    buttons: &[CategoryButton],
    columns: usize,
    cursor: usize,
    hints: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {heading} "))
        .title_style(theme::panel_title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let mut header = vec![Line::from(vec![
        Span::styled(caption.to_string(), theme::accent()),
        Span::styled(format!("  {hints}"), theme::muted()),
    ])];
    if let Some(w) = warning {
        header.push(Line::from(Span::styled(w.to_string(), theme::warning())));
    }
    f.render_widget(Paragraph::new(header), chunks[0]);

    let grid = chunks[1];
    let columns = columns.clamp(1, grid.width.max(1) as usize);
    let cell_width = grid.width / columns as u16;
    let visible_rows = (grid.height / BUTTON_HEIGHT) as usize;
    let cursor_row = cursor / columns;
    let first_row = cursor_row.saturating_sub(visible_rows.saturating_sub(1));

    for (i, button) in buttons.iter().enumerate() {
        let row = i / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = i % columns;
        let rect = Rect {
            x: grid.x + col as u16 * cell_width,
            y: grid.y + (row - first_row) as u16 * BUTTON_HEIGHT,
            width: cell_width.saturating_sub(1),
            height: BUTTON_HEIGHT,
        };
        let text = format!(" {} ", button.caption);
        f.render_widget(
            Paragraph::new(Span::styled(text, theme::button(i == cursor))),
            rect,
        );
    }
}

fn render_results(f: &mut Frame, area: Rect, results: &ResultsView, scroll: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} ", results.heading))
        .title_style(theme::panel_title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let header = vec![
        Line::from(vec![
            Span::styled(results.matching_caption.clone(), theme::accent()),
            Span::styled(
                format!("  [s] {} → {}", results.download_label, results.filename),
                theme::positive(),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "[j/k, PgUp/PgDn]scroll [Esc]back [r]eset  rows {}-{}",
                (scroll + 1).min(results.matching_rows()),
                results.matching_rows()
            ),
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    // An empty match still shows the column headers.
    let mut state = TableState::default().with_offset(scroll);
    f.render_stateful_widget(
        record_table(results.matching.columns(), results.matching.records()),
        chunks[1],
        &mut state,
    );
}

/// Table of raw records under their column headers.
pub fn record_table<'a>(
    columns: &'a [String],
    records: &'a [atlas_core::Record],
) -> Table<'a> {
    let header = Row::new(
        columns
            .iter()
            .map(|c| Cell::from(c.as_str()).style(theme::accent().add_modifier(Modifier::BOLD))),
    )
    .height(1);

    let rows = records.iter().map(|r| {
        Row::new(r.cells().iter().map(|c| Cell::from(c.as_str()))).style(theme::text())
    });

    let widths = vec![Constraint::Fill(1); columns.len().max(1)];
    Table::new(rows, widths).header(header).column_spacing(1)
}
