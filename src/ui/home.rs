use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::app::{AppState, HOME_ITEMS};

use super::components::centered_rect;

/// Parent view: a short menu whose "Users" entry mounts the Users screen.
pub fn render_home(f: &mut Frame, area: Rect, app: &AppState) {
    let items = HOME_ITEMS.iter().enumerate().map(|(i, label)| {
        let style = if i == app.home_selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let marker = if i == app.home_selected { "> " } else { "  " };
        ListItem::new(format!("{marker}{label}")).style(style)
    });

    let rect = centered_rect(30, HOME_ITEMS.len() as u16 + 2, area);
    let list = List::new(items).block(
        Block::default()
            .title("Menu")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(list, rect);
}
