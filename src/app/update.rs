use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Position;
use std::time::Duration;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, HOME_ITEMS, InputMode, Screen};
use crate::ui;

/// What the event loop should do after handling an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        app.tick();

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            let flow = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => Flow::Continue,
            };
            if flow == Flow::Quit {
                break;
            }
        }
    }

    app.close_users();
    tracing::info!("exiting");
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Help => {
            match key.code {
                KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
                KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
                _ => {
                    app.help_scroll = 0;
                    app.input_mode = InputMode::Normal;
                }
            }
            Flow::Continue
        }
        InputMode::Search => {
            handle_search_key(app, key);
            Flow::Continue
        }
        InputMode::Normal => {
            let Some(action) = app.keymap.resolve(&key) else {
                return Flow::Continue;
            };
            match app.screen {
                Screen::Home => handle_home_action(app, action),
                Screen::Users => handle_users_action(app, action),
            }
        }
    }
}

fn handle_home_action(app: &mut AppState, action: KeyAction) -> Flow {
    match action {
        KeyAction::Quit => Flow::Quit,
        KeyAction::OpenHelp => {
            app.input_mode = InputMode::Help;
            Flow::Continue
        }
        KeyAction::MoveUp => {
            app.home_selected = app.home_selected.saturating_sub(1);
            Flow::Continue
        }
        KeyAction::MoveDown => {
            if app.home_selected + 1 < HOME_ITEMS.len() {
                app.home_selected += 1;
            }
            Flow::Continue
        }
        KeyAction::Open => match HOME_ITEMS.get(app.home_selected) {
            Some(&"Users") => {
                app.open_users();
                Flow::Continue
            }
            Some(&"Quit") => Flow::Quit,
            _ => Flow::Continue,
        },
        _ => Flow::Continue,
    }
}

fn handle_users_action(app: &mut AppState, action: KeyAction) -> Flow {
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::Back => {
            app.close_users();
            return Flow::Continue;
        }
        KeyAction::OpenHelp => {
            app.input_mode = InputMode::Help;
            return Flow::Continue;
        }
        _ => {}
    }

    let layout = app.settings.layout;
    let Some(view) = app.view.as_mut() else {
        return Flow::Continue;
    };
    // Everything below the header is suppressed until the records are in.
    if !view.is_ready() {
        return Flow::Continue;
    }

    match action {
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::NextPage => {
            if view.next_page() {
                tracing::debug!(page = view.current_page(), "next page");
            }
        }
        KeyAction::PreviousPage => {
            if view.previous_page() {
                tracing::debug!(page = view.current_page(), "previous page");
            }
        }
        KeyAction::MoveUp => view.move_selection_up(),
        KeyAction::MoveDown => view.move_selection_down(),
        other => {
            if let Some(field) = other.sort_field() {
                if layout.columns().contains(&field) {
                    view.toggle_sort(field);
                }
            }
        }
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    let Some(view) = app.view.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            view.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => view.pop_search_char(),
        KeyCode::Char(c) => view.push_search_char(c),
        _ => {}
    }
}

/// Left click on a header cell toggles that column's sort.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Flow {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || app.input_mode == InputMode::Help {
        return Flow::Continue;
    }
    let pos = Position::new(mouse.column, mouse.row);
    let Some(field) = app
        .header_hits
        .iter()
        .find(|(rect, _)| rect.contains(pos))
        .map(|(_, field)| *field)
    else {
        return Flow::Continue;
    };
    if let Some(view) = app.view.as_mut() {
        if view.is_ready() {
            view.toggle_sort(field);
        }
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ViewSettings;
    use crate::search::{SortDirection, SortField};
    use crate::source::{StaticUserSource, UserRecord};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use std::sync::Arc;

    fn ready_app() -> AppState {
        let mut app = AppState::new(Arc::new(StaticUserSource::default()), ViewSettings::default());
        let records = (1..=7)
            .map(|id| UserRecord {
                id,
                name: format!("User {id}"),
                email: format!("user{id}@example.com"),
                phone: format!("555-000{id}"),
                website: None,
            })
            .collect();
        let mut view = crate::app::UserListView::new(&app.settings);
        view.apply_fetch_result(Ok(records));
        app.view = Some(view);
        app.screen = Screen::Users;
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn search_mode_edits_term_live() {
        let mut app = ready_app();
        handle_key(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "user 3".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        let view = app.view.as_ref().unwrap();
        assert_eq!(view.page().total_matches, 1);

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.view.as_ref().unwrap().search_term(), "");
    }

    #[test]
    fn quit_key_in_search_mode_is_text() {
        let mut app = ready_app();
        handle_key(&mut app, key(KeyCode::Char('/')));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), Flow::Continue);
        assert_eq!(app.view.as_ref().unwrap().search_term(), "q");
    }

    #[test]
    fn back_returns_home_and_drops_view() {
        let mut app = ready_app();
        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), Flow::Continue);
        assert_eq!(app.screen, Screen::Home);
        assert!(app.view.is_none());
    }

    #[test]
    fn sort_keys_outside_layout_are_ignored() {
        let mut app = ready_app();
        app.settings.layout = crate::app::ListLayout::Plain;
        handle_key(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.view.as_ref().unwrap().sort().field, SortField::Id);
        handle_key(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.view.as_ref().unwrap().sort().field, SortField::Name);
    }

    #[test]
    fn header_click_toggles_sort() {
        let mut app = ready_app();
        app.header_hits = vec![(Rect::new(10, 4, 12, 1), SortField::Name)];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, click);
        handle_mouse(&mut app, click);
        let sort = app.view.as_ref().unwrap().sort();
        assert_eq!(sort.field, SortField::Name);
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn loading_view_ignores_paging_and_search() {
        let mut app = AppState::new(Arc::new(StaticUserSource::default()), ViewSettings::default());
        app.screen = Screen::Users;
        app.view = Some(crate::app::UserListView::new(&app.settings));
        handle_key(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Normal);
        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.view.as_ref().unwrap().current_page(), 1);
    }
}
