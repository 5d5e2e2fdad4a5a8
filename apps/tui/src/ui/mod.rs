// UI module for the GeoMapVal dashboard
// Draws the app state; never mutates the pipeline

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &mut App, f: &mut Frame<'_>) {
    screens::dashboard::render_dashboard(app, f);
}
