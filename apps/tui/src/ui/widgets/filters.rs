use crate::app::filters::FilterField;
use crate::app::{App, Focus, InputMode};
use crate::ui::widgets::focus_style;
use crate::view::escape::sanitize_terminal;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_filters(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Filters;
    let block = Block::default()
        .title(" Filtros ")
        .borders(Borders::ALL)
        .border_style(focus_style(focused, Color::Yellow));

    let lines: Vec<TextLine<'_>> = FilterField::ALL
        .into_iter()
        .enumerate()
        .map(|(index, field)| {
            let selected = focused && index == app.filter_index;
            let marker = if selected { "> " } else { "  " };
            let label_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            TextLine::from(vec![
                Span::styled(format!("{marker}{:<13}", field.label()), label_style),
                value_span(app, field),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn value_span(app: &App, field: FilterField) -> Span<'static> {
    match app.input_mode {
        InputMode::EditingPrice(editing) if editing == field => Span::styled(
            format!("{}_", app.current_input),
            Style::default().fg(Color::Green),
        ),
        InputMode::Searching(searching) if searching == field => {
            let preview = app
                .search_preview(field)
                .map_or_else(String::new, |choice| format!(" → {}", sanitize_terminal(&choice)));
            Span::styled(
                format!("/{}_{preview}", app.current_input),
                Style::default().fg(Color::Green),
            )
        }
        _ => {
            let value = app.dashboard.filters.get(field);
            let text = match (value, field.is_price()) {
                (Some(value), true) => format!("$ {value}"),
                (Some(value), false) => format!("◂ {} ▸", sanitize_terminal(value)),
                (None, _) => "-".to_string(),
            };
            Span::raw(text)
        }
    }
}
