use crate::app::{App, Focus};
use crate::domain::{Clasificacion, SortColumn};
use crate::ui::widgets::{focus_style, rgb};
use crate::view::escape::sanitize_terminal;
use crate::view::table::EMPTY_PLACEHOLDER;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

/// First row to draw so that `selected_index` stays visible.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

const WIDTHS: [Constraint; 11] = [
    Constraint::Length(9),
    Constraint::Min(16),
    Constraint::Length(10),
    Constraint::Length(14),
    Constraint::Length(8),
    Constraint::Length(18),
    Constraint::Length(6),
    Constraint::Length(7),
    Constraint::Length(7),
    Constraint::Length(7),
    Constraint::Length(6),
];

pub fn render_projects_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let table_view = &app.dashboard.table;
    let focused = app.focus == Focus::Table;
    let block = Block::default()
        .title(format!(" Proyectos {} ", table_view.count_label()))
        .borders(Borders::ALL)
        .border_style(focus_style(focused, Color::Cyan));

    if table_view.is_placeholder() {
        let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(
        table_view
            .header()
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                let style = if focused && SortColumn::from_index(index) == Some(app.selected_column()) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                };
                Cell::from(label).style(style)
            }),
    );

    // Borders plus header
    let visible = usize::from(area.height.saturating_sub(3));
    let rows = table_view.rows();
    let offset = scroll_offset(rows.len(), visible, app.table_cursor);

    let body = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, row)| {
            let cells = row.cells().into_iter().enumerate().map(|(column, text)| {
                let cell = Cell::from(sanitize_terminal(text));
                if column == 2 {
                    cell.style(badge_style(row.clasificacion))
                } else {
                    cell
                }
            });

            let mut style = Style::default();
            if table_view.selected() == Some(index) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if focused && app.table_cursor == index {
                style = style.bg(Color::Rgb(0, 0, 238)).fg(Color::White);
            }
            Row::new(cells).style(style)
        });

    let table = Table::new(body, WIDTHS)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn badge_style(clasificacion: Clasificacion) -> Style {
    Style::default()
        .fg(rgb(clasificacion))
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_keeps_the_cursor_visible() {
        assert_eq!(scroll_offset(5, 10, 4), 0);
        assert_eq!(scroll_offset(30, 10, 3), 0);
        assert_eq!(scroll_offset(30, 10, 10), 1);
        assert_eq!(scroll_offset(30, 10, 29), 20);
    }
}
