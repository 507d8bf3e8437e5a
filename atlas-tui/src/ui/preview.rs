//! Raw preview of the first rows of the loaded file.

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use atlas_core::Record;

use crate::theme;
use crate::ui::stage_panel::record_table;

pub fn render(f: &mut Frame, area: Rect, columns: &[String], rows: &[Record]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(format!(" Preview · first {} rows [p]hide ", rows.len()))
        .title_style(theme::panel_title(false));

    f.render_widget(record_table(columns, rows).block(block), area);
}
