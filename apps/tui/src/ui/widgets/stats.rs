use crate::app::App;
use crate::ui::widgets::rgb;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

pub fn render_stats(app: &App, f: &mut Frame<'_>, area: Rect) {
    let view = &app.dashboard.stats;
    let title = if view.is_stale() {
        " Estadísticas (desactualizadas) "
    } else {
        " Estadísticas "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(stats) = view.stats() else {
        f.render_widget(
            Paragraph::new("Sin datos").style(Style::default().fg(Color::Gray)),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            Span::styled("Total: ", Style::default().fg(Color::Gray)),
            Span::styled(
                stats.total.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])),
        rows[0],
    );

    for (share, row) in view.shares().into_iter().zip(rows.iter().skip(1)) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(rgb(share.clasificacion)).bg(Color::Black))
            .ratio((share.percent / 100.0).clamp(0.0, 1.0))
            .label(format!(
                "{} {} ({:.1}%)",
                share.clasificacion.plural_label(),
                share.count,
                share.percent
            ));
        f.render_widget(gauge, *row);
    }

    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            Span::styled("Score promedio: ", Style::default().fg(Color::Gray)),
            Span::styled(view.score_label(), Style::default().add_modifier(Modifier::BOLD)),
        ])),
        rows[4],
    );
}
