pub mod chat;
pub mod filters;
pub mod map;
pub mod popup;
pub mod ranking;
pub mod stats;
pub mod tables;

use crate::domain::Clasificacion;
use ratatui::style::{Color, Style};

pub fn rgb(clasificacion: Clasificacion) -> Color {
    let (r, g, b) = clasificacion.rgb();
    Color::Rgb(r, g, b)
}

/// Border style of a panel, highlighted while it has focus.
pub fn focus_style(focused: bool, color: Color) -> Style {
    if focused {
        Style::default().fg(color)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
