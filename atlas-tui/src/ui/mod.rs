//! Top-level UI layout: overview chart, stage panel, optional preview, status bar.

pub mod chart;
pub mod overlays;
pub mod preview;
pub mod stage_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    match app.view() {
        Some(view) => {
            let preview = app.session.preview();
            let mut constraints = vec![
                Constraint::Length(chart::height(&view.overview)),
                Constraint::Min(5),
            ];
            if preview.is_some() {
                constraints.push(Constraint::Percentage(35));
            }
            let areas = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(main_area);

            chart::render(f, areas[0], &view.overview);
            stage_panel::render(f, areas[1], &view, app.cursor, app.results_scroll);
            if let (Some(rows), Some(dataset)) = (preview, app.session.dataset()) {
                preview::render(f, areas[2], dataset.columns(), rows);
            }
        }
        None => render_empty(f, main_area),
    }

    status_bar::render(f, status_area, app);

    // Draw overlays on top.
    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::OpenFile => overlays::render_open_file(f, main_area, &app.path_input),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Company Atlas ")
        .title_style(theme::panel_title(true));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Explore companies by coarse and fine cluster.",
            theme::accent_bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press o to open a CSV with coarse_label and fine_label columns.",
            theme::muted(),
        )),
        Line::from(Span::styled("Press ? for keys.", theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
