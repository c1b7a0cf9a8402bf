use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::app::{AppState, InputMode, ListLayout, LoadState, Theme, UserListView};
use crate::search::SortField;
use crate::source::UserRecord;

use super::components::centered_rect;

const COLUMN_SPACING: u16 = 1;

pub fn render_users_screen(f: &mut Frame, area: Rect, app: &mut AppState) {
    let Some(view) = app.view.as_ref() else {
        app.header_hits.clear();
        return;
    };
    match view.load_state() {
        LoadState::Loading => {
            render_loading(f, area, &app.theme);
            app.header_hits.clear();
        }
        LoadState::Failed(message) => {
            render_load_error(f, area, &app.theme, message);
            app.header_hits.clear();
        }
        LoadState::Ready => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Length(3)])
                .split(area);
            let searching = app.input_mode == InputMode::Search;
            render_search_bar(f, parts[0], &app.theme, view.search_term(), searching);
            render_users_table(f, parts[1], &app.theme, app.settings.layout, view);
            render_pager(f, parts[2], &app.theme, view);
            app.header_hits = header_hits(parts[1], app.settings.layout);
        }
    }
}

fn render_loading(f: &mut Frame, area: Rect, theme: &Theme) {
    let rect = centered_rect(24, 3, area);
    let p = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(p, rect);
}

fn render_load_error(f: &mut Frame, area: Rect, theme: &Theme, message: &str) {
    let width = 70u16.min(area.width);
    let rect = centered_rect(width, 7, area);
    let lines = vec![
        Line::from(Span::styled(
            "Failed to load users",
            Style::default().fg(theme.error_fg).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::from(Span::styled("Esc: back to menu", Style::default().fg(theme.muted))),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error_fg)),
    );
    f.render_widget(p, rect);
}

fn render_search_bar(f: &mut Frame, area: Rect, theme: &Theme, term: &str, searching: bool) {
    let content = if term.is_empty() && !searching {
        Line::from(Span::styled("Search users... (/)", Style::default().fg(theme.muted)))
    } else if searching {
        Line::from(vec![
            Span::raw(term.to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::raw(term.to_string())
    };
    let border = if searching { theme.highlight_fg } else { theme.border };
    let p = Paragraph::new(content).style(Style::default().fg(theme.text)).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

fn column_width(field: SortField) -> Constraint {
    match field {
        SortField::Id => Constraint::Length(6),
        SortField::Email => Constraint::Fill(3),
        SortField::Name | SortField::Phone | SortField::Website => Constraint::Fill(2),
    }
}

fn cell_text(record: &UserRecord, field: SortField) -> String {
    match field {
        SortField::Id => record.id.to_string(),
        SortField::Name => record.name.clone(),
        SortField::Email => record.email.clone(),
        SortField::Phone => record.phone.clone(),
        SortField::Website => record.website.clone().unwrap_or_default(),
    }
}

/// Screen rectangles of the header cells for `layout` drawn inside `table_area`.
pub fn header_hits(table_area: Rect, layout: ListLayout) -> Vec<(Rect, SortField)> {
    let inner = Block::default().borders(Borders::ALL).inner(table_area);
    if inner.height == 0 {
        return Vec::new();
    }
    let header = Rect { height: 1, ..inner };
    let columns = layout.columns();
    let cells = Layout::horizontal(columns.iter().map(|c| column_width(*c)))
        .spacing(COLUMN_SPACING)
        .split(header);
    cells.iter().copied().zip(columns.iter().copied()).collect()
}

pub fn render_users_table(
    f: &mut Frame,
    area: Rect,
    theme: &Theme,
    layout: ListLayout,
    view: &UserListView,
) {
    let page = view.page();
    let columns = layout.columns();
    let sort = view.sort();

    let header = Row::new(columns.iter().map(|field| {
        if *field == sort.field {
            format!("{} {}", field.label(), sort.direction.arrow())
        } else {
            field.label().to_string()
        }
    }))
    .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = if page.rows.is_empty() {
        let msg = if page.total_matches == 0 && !view.search_term().is_empty() {
            format!("No users match \"{}\"", view.search_term())
        } else if page.total_matches == 0 {
            "No users".to_string()
        } else {
            "Nothing on this page".to_string()
        };
        vec![Row::new(vec![Cell::from(msg)]).style(Style::default().fg(theme.muted))]
    } else {
        page.rows
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let style = if i == view.selected_row() {
                    Style::default()
                        .fg(theme.highlight_fg)
                        .bg(theme.highlight_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                Row::new(columns.iter().map(|field| Cell::from(cell_text(record, *field))))
                    .style(style)
            })
            .collect()
    };

    let title = match layout {
        ListLayout::Table => "Users",
        ListLayout::Compact => "Users (name, email)",
        ListLayout::Plain => "Users (names)",
    };
    let table = Table::new(rows, columns.iter().map(|c| column_width(*c)))
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .column_spacing(COLUMN_SPACING);

    f.render_widget(table, area);
}

fn render_pager(f: &mut Frame, area: Rect, theme: &Theme, view: &UserListView) {
    let page = view.page();
    let button = |label: &str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted).add_modifier(Modifier::DIM)
        };
        Span::styled(label.to_string(), style)
    };
    let line = Line::from(vec![
        button("⇦ prev", page.has_previous),
        Span::styled(
            format!("   Page {} of {}   ", page.page, page.page_count.max(1)),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        button("next ⇨", page.has_next),
    ]);
    let p = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_hits_cover_one_row_inside_borders() {
        let hits = header_hits(Rect::new(0, 5, 80, 10), ListLayout::Table);
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].1, SortField::Id);
        assert_eq!(hits[0].0.x, 1);
        assert_eq!(hits[0].0.y, 6);
        assert_eq!(hits[0].0.width, 6);
        assert!(hits.iter().all(|(r, _)| r.height == 1));
        assert!(hits.windows(2).all(|w| w[0].0.right() < w[1].0.x + 1));
    }

    #[test]
    fn plain_layout_has_single_name_trigger() {
        let hits = header_hits(Rect::new(0, 0, 40, 6), ListLayout::Plain);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, SortField::Name);
    }
}
