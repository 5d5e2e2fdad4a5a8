use crate::app::{App, InputMode};
use crate::ui::screens::help::render_help_popup;
use crate::ui::screens::profile::render_profile_popup;
use crate::ui::widgets::chat::render_chat;
use crate::ui::widgets::filters::render_filters;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::popup::{render_alert, render_marker_popup, render_price_editor};
use crate::ui::widgets::ranking::render_ranking;
use crate::ui::widgets::stats::render_stats;
use crate::ui::widgets::tables::render_projects_table;
use crate::view::escape::sanitize_terminal;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

pub fn render_dashboard(app: &mut App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Panels
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title_section(app, f, main_layout[0]);
    let map_area = render_content_section(app, f, main_layout[1]);
    render_status_section(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);

    if let Some(popup) = app.dashboard.map.open_popup() {
        render_marker_popup(popup, f, map_area);
    }
    if let InputMode::EditingPrice(field) = app.input_mode {
        render_price_editor(field, &app.current_input, f, main_layout[1]);
    }
    let full = f.area();
    if app.show_profile {
        render_profile_popup(app.dashboard.profile.as_ref(), f, full);
    }
    if app.show_help {
        render_help_popup(f, full);
    }
    if let Some(message) = app.dashboard.alert() {
        render_alert(message, f, full);
    }
}

fn render_title_section(app: &mut App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(30)])
        .split(inner);

    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "GeoMapVal ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Proyectos inmobiliarios · ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            app.dashboard.filters.summary(),
            Style::default().fg(Color::Gray),
        ),
    ]));
    f.render_widget(title, chunks[0]);

    if app.dashboard.is_loading() {
        let throbber = Throbber::default()
            .label("Cargando proyectos...")
            .style(Style::default().fg(Color::Yellow))
            .throbber_set(BRAILLE_SIX);
        f.render_stateful_widget(throbber, chunks[1], &mut app.throbber);
    }
}

/// Draws the panels and returns the map area for the marker popup.
fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(42), Constraint::Min(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Min(5),
        ])
        .split(columns[0]);
    render_filters(app, f, left[0]);
    render_stats(app, f, left[1]);
    render_ranking(app, f, left[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    if app.show_chat {
        let map_and_chat = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(right[0]);
        render_map(app, f, map_and_chat[0]);
        render_chat(app, f, map_and_chat[1]);
        render_projects_table(app, f, right[1]);
        map_and_chat[0]
    } else {
        render_map(app, f, right[0]);
        render_projects_table(app, f, right[1]);
        right[0]
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status = sanitize_terminal(app.dashboard.status());
    let style = if status.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let paragraph = Paragraph::new(Span::styled(status, style))
        .block(
            Block::default()
                .title(" Estado ")
                .title_style(Style::default().fg(Color::Yellow))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = |text: &'static str| {
        Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };
    let hint = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));

    let shortcuts = TextLine::from(vec![
        key("F1"),
        hint(": Ayuda | "),
        key("Tab"),
        hint(": Panel | "),
        key("s"),
        hint(": Ordenar | "),
        key("e"),
        hint(": CSV | "),
        key("c"),
        hint(": Chat | "),
        key("p"),
        hint(": Perfil | "),
        key("q"),
        hint(": Salir"),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}
