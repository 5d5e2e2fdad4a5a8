use crate::domain::SuccessProfile;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use crate::view::profile::profile_entries;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_profile_popup(profile: Option<&SuccessProfile>, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    f.render_widget(ClearWidget, popup_area);

    let entries = profile.map(profile_entries).unwrap_or_default();
    let mut lines = Vec::new();
    if entries.is_empty() {
        lines.push(TextLine::from(Span::styled(
            "No hay datos disponibles. Regenera la clasificación.",
            Style::default().fg(Color::Gray),
        )));
    }
    for entry in entries {
        lines.push(TextLine::from(Span::styled(
            entry.title,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(TextLine::from(format!(
            "  Promedio: {}  Mediana: {}",
            entry.promedio, entry.mediana
        )));
        lines.push(TextLine::from(Span::styled(
            format!("  Rango: {}", entry.rango),
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Características de proyectos exitosos (p / Esc) ")
                .title_style(
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    f.render_widget(paragraph, popup_area);
}
