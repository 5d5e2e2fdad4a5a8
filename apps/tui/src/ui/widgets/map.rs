use crate::app::{App, Focus};
use crate::domain::Clasificacion;
use crate::ui::widgets::{focus_style, rgb};
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::text::Line as TextLine;
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

/// Project markers on a lon/lat canvas, one colour per classification.
pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let map = &app.dashboard.map;
    let viewport = map.viewport();

    let groups: Vec<(Clasificacion, Vec<(f64, f64)>)> = Clasificacion::ALL
        .into_iter()
        .map(|clasificacion| {
            let coords = map
                .markers()
                .iter()
                .filter(|marker| marker.clasificacion == clasificacion)
                .map(|marker| (marker.lon, marker.lat))
                .collect();
            (clasificacion, coords)
        })
        .collect();
    let focused_marker = map
        .open_popup()
        .map(|_| (viewport.center.1, viewport.center.0));

    let title = TextLine::from(format!(
        " Mapa: {} proyectos · zoom {:.0} ",
        map.count(),
        viewport.zoom
    ));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(app.focus == Focus::Map, Color::Green));

    let radius = viewport.lon_span() / 80.0;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(move |ctx| {
            for (clasificacion, coords) in &groups {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: rgb(*clasificacion),
                });
            }
            if let Some((x, y)) = focused_marker {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius,
                    color: Color::White,
                });
            }
        });

    f.render_widget(canvas, area);
}
