use crate::app::{App, Focus};
use crate::domain::Clasificacion;
use crate::ui::widgets::tables::scroll_offset;
use crate::ui::widgets::{focus_style, rgb};
use crate::view::escape::sanitize_terminal;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Top sellers for the current `estado`. The applied seller filter is marked.
pub fn render_ranking(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Ranking;
    let block = Block::default()
        .title(format!(" Ranking constructores ({}) ", app.dashboard.filters.estado()))
        .borders(Borders::ALL)
        .border_style(focus_style(focused, Color::Blue));

    let ranking = &app.dashboard.ranking;
    if ranking.is_empty() {
        f.render_widget(
            Paragraph::new("No hay datos disponibles")
                .style(Style::default().fg(Color::Gray))
                .block(block),
            area,
        );
        return;
    }

    let visible = usize::from(area.height.saturating_sub(2));
    let offset = scroll_offset(ranking.len(), visible, app.ranking_cursor);
    let applied = app.dashboard.filters.vende.as_deref();

    let lines: Vec<TextLine<'_>> = ranking
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, rank)| {
            let mut name_style = Style::default().fg(Color::White);
            if index < 3 {
                name_style = name_style.add_modifier(Modifier::BOLD);
            }
            if rank.vendedor.is_some() && rank.vendedor.as_deref() == applied {
                name_style = name_style.add_modifier(Modifier::REVERSED);
            }
            if focused && index == app.ranking_cursor {
                name_style = name_style.bg(Color::Rgb(0, 0, 238));
            }

            TextLine::from(vec![
                Span::styled(format!("{:>2}. ", index + 1), Style::default().fg(Color::Yellow)),
                Span::styled(sanitize_terminal(rank.display_name()), name_style),
                Span::styled(
                    format!(" {}", rank.exitosos),
                    Style::default().fg(rgb(Clasificacion::Exitoso)),
                ),
                Span::styled(
                    format!("/{} ", rank.total_proyectos),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(format!(
                    "{:.1}% · {:.3}",
                    rank.porcentaje_exitosos, rank.score_promedio
                )),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}
