//! Shared UI components (status bar, help modal, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, LoadState};

/// Render the bottom status bar with mode, counts and sort.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Help => "HELP",
    };
    let detail = match app.view.as_ref() {
        None => String::new(),
        Some(view) => match view.load_state() {
            LoadState::Loading => "  loading...".to_string(),
            LoadState::Failed(_) => "  load failed".to_string(),
            LoadState::Ready => {
                let page = view.page();
                let sort = view.sort();
                format!(
                    "  users:{}  matches:{}  sort:{} {}  rows/page:{}",
                    view.records().len(),
                    page.total_matches,
                    sort.field.label(),
                    sort.direction.arrow(),
                    page.page_size
                )
            }
        },
    };
    let p = Paragraph::new(format!("mode: {mode}{detail}")).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn key_line(app: &AppState, label: &str, action: KeyAction) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(
            app.keymap.keys_for(action).join(" / "),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
    ])
}

/// Render the help modal listing the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("General", bold))];
    lines.push(key_line(app, "Quit", KeyAction::Quit));
    lines.push(key_line(app, "Open menu entry", KeyAction::Open));
    lines.push(key_line(app, "Back to menu", KeyAction::Back));
    lines.push(key_line(app, "Move up", KeyAction::MoveUp));
    lines.push(key_line(app, "Move down", KeyAction::MoveDown));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Users", bold)));
    lines.push(key_line(app, "Search", KeyAction::StartSearch));
    lines.push(key_line(app, "Next page", KeyAction::NextPage));
    lines.push(key_line(app, "Previous page", KeyAction::PreviousPage));
    lines.push(key_line(app, "Sort by ID", KeyAction::SortById));
    lines.push(key_line(app, "Sort by name", KeyAction::SortByName));
    lines.push(key_line(app, "Sort by email", KeyAction::SortByEmail));
    lines.push(key_line(app, "Sort by phone", KeyAction::SortByPhone));
    lines.push(key_line(app, "Sort by website", KeyAction::SortByWebsite));
    lines.push(Line::raw("Click a column header to sort; again to reverse."));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("any key", Style::default().add_modifier(Modifier::ITALIC)),
    ]));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
