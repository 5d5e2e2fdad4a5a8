use crate::app::chat::ChatRole;
use crate::app::{App, InputMode};
use crate::view::escape::sanitize_terminal;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_chat(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chat = &app.dashboard.chat;
    let block = Block::default()
        .title(" Asistente GeoMapVal ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    let mut lines: Vec<TextLine<'_>> = Vec::new();
    for entry in chat.entries() {
        let (who, color) = match entry.role {
            ChatRole::User => ("Tú", Color::Yellow),
            ChatRole::Assistant => ("Asistente", Color::Cyan),
            ChatRole::Error => ("Error", Color::Red),
        };
        lines.push(TextLine::from(vec![
            Span::styled(format!("[{}] ", entry.timestamp()), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{who}: "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(sanitize_terminal(&entry.text)),
        ]));
    }
    if chat.is_pending() {
        lines.push(TextLine::from(Span::styled(
            "Asistente está escribiendo...",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the newest messages in view.
    let visible = usize::from(chunks[0].height);
    let skip = lines.len().saturating_sub(visible);
    let history = Paragraph::new(Text::from(lines.split_off(skip))).wrap(Wrap { trim: false });
    f.render_widget(history, chunks[0]);

    let typing = app.input_mode == InputMode::Chat;
    let input = Paragraph::new(format!("{}{}", app.current_input, if typing { "_" } else { "" }))
        .block(
            Block::default()
                .title(" Mensaje (Enter envía, Esc cierra) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if typing { Color::Green } else { Color::DarkGray })),
        );
    f.render_widget(input, chunks[1]);
}
