//! Keyboard input dispatch: overlays → global keys → drill-down keys.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use atlas_core::navigation::Stage;

use crate::app::{AppState, Move, Overlay, RESULTS_PAGE};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            app.help_dismissed = true;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::OpenFile => {
            handle_open_prompt(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('o') => {
            app.prompt_open();
            return;
        }
        KeyCode::Char('p') => {
            app.toggle_preview();
            return;
        }
        _ => {}
    }

    // 3. Results table scrolling.
    if app.stage() == Some(Stage::Results) {
        let delta = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(1),
            KeyCode::Char('k') | KeyCode::Up => Some(-1),
            KeyCode::PageDown => Some(RESULTS_PAGE as isize),
            KeyCode::PageUp => Some(-(RESULTS_PAGE as isize)),
            _ => None,
        };
        if let Some(delta) = delta {
            app.scroll_results(delta);
            return;
        }
    }

    // 4. Drill-down keys.
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.move_cursor(Move::Left),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor(Move::Right),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(Move::Up),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(Move::Down),
        KeyCode::Enter => app.select(),
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('s') => app.save_export(),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_open_prompt(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.path_input.clear();
        }
        KeyCode::Enter => {
            let input = app.path_input.trim().to_string();
            app.path_input.clear();
            app.overlay = Overlay::None;
            if input.is_empty() {
                return;
            }
            app.open_file(&PathBuf::from(input));
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            app.path_input.push(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{app_with_file, COMPANIES};
    use atlas_core::AtlasConfig;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn quit_key_stops_app() {
        let mut app = AppState::new(&AtlasConfig::default());
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = AppState::new(&AtlasConfig::default());
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn help_overlay_dismisses_on_any_key() {
        let mut app = AppState::new(&AtlasConfig::default());
        handle_key(&mut app, press(KeyCode::Char('?')));
        assert_eq!(app.overlay, Overlay::Help);
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.help_dismissed);
    }

    #[test]
    fn open_prompt_loads_typed_path() {
        let (_, dir) = app_with_file(COMPANIES);
        let path = dir.path().join("companies.csv");

        let mut app = AppState::new(&AtlasConfig::default());
        handle_key(&mut app, press(KeyCode::Char('o')));
        assert_eq!(app.overlay, Overlay::OpenFile);
        type_str(&mut app, &path.display().to_string());
        handle_key(&mut app, press(KeyCode::Enter));

        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.stage(), Some(Stage::Coarse));
        assert_eq!(app.last_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn open_prompt_escape_cancels() {
        let mut app = AppState::new(&AtlasConfig::default());
        handle_key(&mut app, press(KeyCode::Char('o')));
        type_str(&mut app, "abc");
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.path_input, "ab");
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.path_input.is_empty());
        assert_eq!(app.stage(), None);
    }

    #[test]
    fn drill_down_with_keys() {
        let (mut app, _dir) = app_with_file(COMPANIES);
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.stage(), Some(Stage::Fine));
        handle_key(&mut app, press(KeyCode::Char('l')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.stage(), Some(Stage::Results));

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.stage(), Some(Stage::Fine));
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.stage(), Some(Stage::Coarse));
    }

    #[test]
    fn reset_key_from_results() {
        let (mut app, _dir) = app_with_file(COMPANIES);
        handle_key(&mut app, press(KeyCode::Enter));
        handle_key(&mut app, press(KeyCode::Enter));
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.stage(), Some(Stage::Coarse));
        assert_eq!(app.session.navigation().selected_fine(), None);
    }

    #[test]
    fn results_keys_scroll_table() {
        let mut csv = String::from("coarse_label,fine_label,name\n");
        for i in 0..30 {
            csv.push_str(&format!("Tech,AI,row{i}\n"));
        }
        let (mut app, _dir) = app_with_file(&csv);
        handle_key(&mut app, press(KeyCode::Enter));
        handle_key(&mut app, press(KeyCode::Enter));

        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.results_scroll, 2);
        handle_key(&mut app, press(KeyCode::PageDown));
        assert_eq!(app.results_scroll, 12);
        handle_key(&mut app, press(KeyCode::Char('k')));
        handle_key(&mut app, press(KeyCode::PageUp));
        assert_eq!(app.results_scroll, 1);
        assert_eq!(app.stage(), Some(Stage::Results));
    }

    #[test]
    fn preview_toggle_key() {
        let (mut app, _dir) = app_with_file(COMPANIES);
        assert!(!app.session.preview_enabled());
        handle_key(&mut app, press(KeyCode::Char('p')));
        assert!(app.session.preview_enabled());
    }

    #[test]
    fn error_overlay_scrolls_and_closes() {
        let mut app = AppState::new(&AtlasConfig::default());
        for i in 0..3 {
            app.push_error(
                crate::app::ErrorCategory::Load,
                format!("e{i}"),
                String::new(),
            );
        }
        handle_key(&mut app, press(KeyCode::Char('e')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.error_scroll, 2);
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }
}
