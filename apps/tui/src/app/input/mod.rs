pub mod helpers;

use crate::app::dashboard::{Effect, Message};
use crate::app::filters::{normalize_price, FilterField};
use crate::app::state::{App, Focus, InputMode};
use crate::domain::SortColumn;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use helpers::{wrap_decrement, wrap_increment};

const PAGE: usize = 10;

/// Routes one key press. Returns the effects the dashboard asked for.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return Vec::new();
    }

    // The project-load alert blocks everything until dismissed.
    if app.dashboard.alert().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            return app.dashboard.dispatch(Message::DismissAlert);
        }
        return Vec::new();
    }

    match app.input_mode {
        InputMode::EditingPrice(field) => handle_price_input(app, field, key.code),
        InputMode::Searching(field) => handle_search_input(app, field, key.code),
        InputMode::Chat => handle_chat_input(app, key.code),
        InputMode::Normal => {
            if handle_help_toggle(app, key.code) || handle_profile_toggle(app, key.code) {
                return Vec::new();
            }
            handle_normal_input(app, key.code)
        }
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

fn handle_profile_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::Char('p') {
        app.show_profile = !app.show_profile;
        return true;
    }

    if app.show_profile {
        if key == KeyCode::Esc {
            app.show_profile = false;
        }
        return true;
    }

    false
}

fn handle_normal_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char('q') => {
            app.running = false;
            Vec::new()
        }
        KeyCode::Tab => {
            app.focus = app.focus.next();
            Vec::new()
        }
        KeyCode::BackTab => {
            app.focus = app.focus.previous();
            Vec::new()
        }
        KeyCode::Char('r') => app.dashboard.dispatch(Message::Reload),
        KeyCode::Char('x') => app.dashboard.dispatch(Message::ResetFilters),
        KeyCode::Char('e') => app.dashboard.dispatch(Message::ExportCsv),
        KeyCode::Char('c') => {
            app.show_chat = true;
            app.input_mode = InputMode::Chat;
            app.current_input.clear();
            Vec::new()
        }
        key => match app.focus {
            Focus::Filters => handle_filters_input(app, key),
            Focus::Ranking => handle_ranking_input(app, key),
            Focus::Table => handle_table_input(app, key),
            Focus::Map => {
                handle_map_input(app, key);
                Vec::new()
            }
        },
    }
}

fn handle_filters_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    let field = app.selected_filter();
    match key {
        KeyCode::Up => {
            app.filter_index = wrap_decrement(app.filter_index, FilterField::ALL.len());
            Vec::new()
        }
        KeyCode::Down => {
            app.filter_index = wrap_increment(app.filter_index, FilterField::ALL.len());
            Vec::new()
        }
        KeyCode::Left if !field.is_price() => app.cycle_filter(false),
        KeyCode::Right if !field.is_price() => app.cycle_filter(true),
        KeyCode::Enter if field.is_price() => {
            app.current_input = app.dashboard.filters.get(field).unwrap_or_default().to_string();
            app.input_mode = InputMode::EditingPrice(field);
            Vec::new()
        }
        KeyCode::Enter | KeyCode::Char('/') if !field.is_price() => {
            app.current_input.clear();
            app.input_mode = InputMode::Searching(field);
            Vec::new()
        }
        KeyCode::Delete | KeyCode::Backspace if field.is_price() => {
            if app.dashboard.filters.get(field).is_none() {
                return Vec::new();
            }
            app.dashboard.dispatch(Message::SetFilter { field, value: None })
        }
        _ => Vec::new(),
    }
}

fn handle_ranking_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    let last = app.dashboard.ranking.len().saturating_sub(1);
    match key {
        KeyCode::Up => app.ranking_cursor = app.ranking_cursor.saturating_sub(1),
        KeyCode::Down => app.ranking_cursor = (app.ranking_cursor + 1).min(last),
        KeyCode::Enter | KeyCode::Char(' ') => return app.toggle_selected_seller(),
        _ => {}
    }
    Vec::new()
}

fn handle_table_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    let rows = app.dashboard.table.rows().len();
    let last = rows.saturating_sub(1);
    match key {
        KeyCode::Up => app.table_cursor = app.table_cursor.saturating_sub(1),
        KeyCode::Down => app.table_cursor = (app.table_cursor + 1).min(last),
        KeyCode::PageUp => app.table_cursor = app.table_cursor.saturating_sub(PAGE),
        KeyCode::PageDown => app.table_cursor = (app.table_cursor + PAGE).min(last),
        KeyCode::Home => app.table_cursor = 0,
        KeyCode::End => app.table_cursor = last,
        KeyCode::Left => {
            app.header_index = wrap_decrement(app.header_index, SortColumn::TABLE.len());
        }
        KeyCode::Right => {
            app.header_index = wrap_increment(app.header_index, SortColumn::TABLE.len());
        }
        KeyCode::Char('s') => {
            let column = app.selected_column();
            app.table_cursor = 0;
            return app.dashboard.dispatch(Message::SortBy(column));
        }
        KeyCode::Enter if rows > 0 => {
            return app.dashboard.dispatch(Message::SelectRow(app.table_cursor));
        }
        _ => {}
    }
    Vec::new()
}

fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('+' | '=') => app.dashboard.map.zoom_in(),
        KeyCode::Char('-') => app.dashboard.map.zoom_out(),
        KeyCode::Char('f') => {
            if !app.dashboard.map.fit_to_data() {
                app.dashboard.set_status("No hay proyectos en el mapa");
            }
        }
        KeyCode::Esc => app.dashboard.map.close_popup(),
        _ => {}
    }
}

fn handle_price_input(app: &mut App, field: FilterField, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => app.current_input.push(c),
        KeyCode::Backspace => {
            app.current_input.pop();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.current_input.clear();
        }
        KeyCode::Enter => {
            let value = normalize_price(&app.current_input);
            if value.is_none() && !app.current_input.trim().is_empty() {
                app.dashboard.set_status("Precio inválido");
                return Vec::new();
            }
            app.input_mode = InputMode::Normal;
            app.current_input.clear();
            if app.dashboard.filters.get(field) == value.as_deref() {
                return Vec::new();
            }
            return app.dashboard.dispatch(Message::SetFilter { field, value });
        }
        _ => {}
    }
    Vec::new()
}

fn handle_search_input(app: &mut App, field: FilterField, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char(c) => app.current_input.push(c),
        KeyCode::Backspace => {
            app.current_input.pop();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.current_input.clear();
        }
        KeyCode::Enter => {
            let effects = app.apply_search(field);
            app.input_mode = InputMode::Normal;
            app.current_input.clear();
            return effects;
        }
        _ => {}
    }
    Vec::new()
}

fn handle_chat_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char(c) => app.current_input.push(c),
        KeyCode::Backspace => {
            app.current_input.pop();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.show_chat = false;
        }
        KeyCode::Enter => {
            let message = std::mem::take(&mut app.current_input);
            return app.dashboard.dispatch(Message::SendChat(message));
        }
        _ => {}
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::Project;

    fn press(app: &mut App, code: KeyCode) -> Vec<Effect> {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn loaded_app(codes: &[&str]) -> App {
        let mut app = App::new();
        app.dashboard.dispatch(Message::Reload);
        let projects = codes
            .iter()
            .map(|code| Project {
                codigo: Some((*code).to_string()),
                ..Project::default()
            })
            .collect();
        app.dashboard.dispatch(Message::ProjectsLoaded {
            request: app.dashboard.latest_request(),
            result: Ok(projects),
        });
        app
    }

    #[test]
    fn alert_blocks_input_until_dismissed() {
        let mut app = App::new();
        app.dashboard.dispatch(Message::Reload);
        app.dashboard.dispatch(Message::ProjectsLoaded {
            request: 1,
            result: Err(ApiError::Server("caído".to_string())),
        });

        assert!(press(&mut app, KeyCode::Char('r')).is_empty());
        assert!(press(&mut app, KeyCode::Char('q')).is_empty());
        assert!(app.running);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.dashboard.alert(), None);
        assert_eq!(press(&mut app, KeyCode::Char('r')).len(), 1);
    }

    #[test]
    fn price_editor_validates_before_reloading() {
        let mut app = App::new();
        app.filter_index = FilterField::ALL
            .iter()
            .position(|field| *field == FilterField::PrecioMax)
            .unwrap_or_default();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::EditingPrice(FilterField::PrecioMax));

        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('0'));
        let effects = press(&mut app, KeyCode::Enter);

        assert_eq!(effects.len(), 1);
        assert_eq!(app.dashboard.filters.precio_max.as_deref(), Some("50"));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn header_sort_and_row_selection() {
        let mut app = loaded_app(&["B", "A"]);
        app.focus = Focus::Table;

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.dashboard.table.rows()[0].codigo, "A");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.table_cursor, 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.dashboard.table.selected(), Some(1));
    }

    #[test]
    fn ranking_panel_filters_by_seller() {
        let mut app = App::new();
        app.dashboard.ranking = ["Constructora A", "Constructora B"]
            .into_iter()
            .map(|name| crate::domain::ConstructorRank {
                vendedor: Some(name.to_string()),
                ..crate::domain::ConstructorRank::default()
            })
            .collect();
        app.focus = Focus::Ranking;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        let effects = press(&mut app, KeyCode::Enter);

        assert_eq!(effects.len(), 1);
        assert_eq!(app.dashboard.filters.vende.as_deref(), Some("Constructora B"));
    }

    #[test]
    fn profile_overlay_swallows_keys_until_closed() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('p'));
        assert!(app.show_profile);

        assert!(press(&mut app, KeyCode::Char('r')).is_empty());
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_profile);
        assert_eq!(press(&mut app, KeyCode::Char('r')).len(), 1);
    }

    #[test]
    fn chat_mode_sends_and_closes() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('c'));
        for c in "hola".chars() {
            press(&mut app, KeyCode::Char(c));
        }

        let effects = press(&mut app, KeyCode::Enter);
        assert_eq!(
            effects,
            [Effect::SendChat {
                message: "hola".to_string()
            }]
        );

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_chat);
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
