use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const SECTIONS: [(&str, &[(&str, &str)]); 5] = [
    (
        "General",
        &[
            ("Tab / Shift+Tab", "Cambiar de panel"),
            ("r", "Recargar proyectos"),
            ("x", "Quitar todos los filtros"),
            ("e", "Exportar CSV"),
            ("c", "Abrir el asistente"),
            ("p", "Características de proyectos exitosos"),
            ("F1", "Ayuda"),
            ("q", "Salir"),
        ],
    ),
    (
        "Filtros",
        &[
            ("↑ / ↓", "Elegir filtro"),
            ("← / →", "Cambiar valor"),
            ("Enter o /", "Buscar valor / editar precio"),
            ("Supr", "Quitar precio"),
        ],
    ),
    (
        "Ranking",
        &[
            ("↑ / ↓", "Elegir constructor"),
            ("Enter / Espacio", "Filtrar por el constructor (otra vez quita)"),
        ],
    ),
    (
        "Tabla",
        &[
            ("↑ ↓ PgUp PgDn Inicio Fin", "Mover cursor"),
            ("← / →", "Elegir columna"),
            ("s", "Ordenar por la columna (otra vez invierte)"),
            ("Enter", "Ver proyecto en el mapa"),
        ],
    ),
    (
        "Mapa",
        &[
            ("+ / -", "Acercar / alejar"),
            ("f", "Ajustar a los proyectos"),
            ("Esc", "Cerrar ficha del proyecto"),
        ],
    ),
];

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(TextLine::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, action) in keys {
            lines.push(TextLine::from(vec![
                Span::styled(format!("  {key:<26}"), Style::default().fg(Color::Cyan)),
                Span::raw(*action),
            ]));
        }
        lines.push(TextLine::from(""));
    }

    let help = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("== Ayuda ==")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(help, popup_area);

    let hint = Paragraph::new(Span::styled(
        "F1 o Esc para cerrar",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}
