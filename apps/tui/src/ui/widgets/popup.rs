use crate::app::filters::FilterField;
use crate::view::escape::sanitize_terminal;
use crate::view::map::Popup;
use crate::ui::widgets::rgb;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
    }
}

/// Blocking error popup for a failed project load.
pub fn render_alert(message: &str, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 40, area);
    f.render_widget(ClearWidget, popup_area);

    let mut lines: Vec<TextLine<'_>> = message
        .lines()
        .map(|line| {
            TextLine::from(Span::styled(
                sanitize_terminal(line),
                Style::default().fg(Color::White),
            ))
        })
        .collect();
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Enter / Esc para cerrar",
        Style::default().fg(Color::Gray),
    )));
    let text = Text::from(lines);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Error ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(paragraph, popup_area);
}

/// Marker popup, anchored to the bottom of the map panel.
pub fn render_marker_popup(popup: &Popup, f: &mut Frame<'_>, map_area: Rect) {
    let lines = popup.lines();
    let height = u16::try_from(lines.len() + 2)
        .unwrap_or(u16::MAX)
        .min(map_area.height);
    let area = Rect {
        x: map_area.x,
        y: map_area.y + map_area.height.saturating_sub(height),
        width: map_area.width,
        height,
    };
    f.render_widget(ClearWidget, area);

    let mut text: Vec<TextLine<'_>> = lines.into_iter().map(TextLine::from).collect();
    if let Some(title) = text.first_mut() {
        *title = title.clone().style(
            Style::default()
                .fg(rgb(popup.clasificacion))
                .add_modifier(Modifier::BOLD),
        );
    }
    let paragraph = Paragraph::new(Text::from(text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Proyecto (Esc cierra) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(rgb(popup.clasificacion))),
        );
    f.render_widget(paragraph, area);
}

pub fn render_price_editor(field: FilterField, input: &str, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(40, 20, area);
    f.render_widget(ClearWidget, popup_area);

    let paragraph = Paragraph::new(Text::from(vec![
        TextLine::from(Span::styled(
            format!("$ {input}_"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            "Vacío quita el filtro · Enter aplica · Esc cancela",
            Style::default().fg(Color::Gray),
        )),
    ]))
    .block(
        Block::default()
            .title(format!(" {} ", field.label()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(paragraph, popup_area);
}
