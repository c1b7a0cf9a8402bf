pub mod components;
pub mod home;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, Screen};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let crumbs = match app.screen {
        Screen::Home => "[Home]",
        Screen::Users => "Home > [Users]",
    };
    let hints = match (app.screen, app.input_mode) {
        (_, InputMode::Search) => "type to filter; Enter: done; Esc: clear",
        (Screen::Home, _) => "Enter: open; ?: help; q: quit",
        (Screen::Users, _) => "/: search; 1-5: sort; ←/→: page; Esc: back; ?: help; q: quit",
    };
    let p = Paragraph::new(format!(
        "{crumbs}  source: {}  | {hints}",
        app.source.describe()
    ))
    .block(
        Block::default()
            .title("userlist-tui")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    match app.screen {
        Screen::Home => home::render_home(f, root[1], app),
        Screen::Users => users::render_users_screen(f, root[1], app),
    }

    components::render_status_bar(f, root[2], app);

    if app.input_mode == InputMode::Help {
        let area = f.area();
        components::render_help_modal(f, area, app, app.help_scroll);
    }
}
