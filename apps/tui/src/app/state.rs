use crate::app::dashboard::{Dashboard, Effect, Message};
use crate::app::filters::FilterField;
use crate::app::input::helpers::{best_match, wrap_decrement, wrap_increment};
use crate::domain::SortColumn;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

const THROBBER_TICK: Duration = Duration::from_millis(120);

/// Panel receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filters,
    Ranking,
    Table,
    Map,
}

impl Focus {
    pub const fn next(self) -> Self {
        match self {
            Self::Filters => Self::Ranking,
            Self::Ranking => Self::Table,
            Self::Table => Self::Map,
            Self::Map => Self::Filters,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Filters => Self::Map,
            Self::Ranking => Self::Filters,
            Self::Table => Self::Ranking,
            Self::Map => Self::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a price for one of the price filters.
    EditingPrice(FilterField),
    /// Fuzzy search over the values of a categorical filter.
    Searching(FilterField),
    Chat,
}

/// Terminal front end around the [`Dashboard`]: focus, cursors and text input.
#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub dashboard: Dashboard,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub current_input: String,
    pub filter_index: usize,
    pub table_cursor: usize,
    pub ranking_cursor: usize,
    pub header_index: usize,
    pub show_help: bool,
    pub show_profile: bool,
    pub show_chat: bool,
    pub throbber: ThrobberState,
    last_tick: Instant,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            dashboard: Dashboard::new(),
            focus: Focus::Filters,
            input_mode: InputMode::Normal,
            current_input: String::new(),
            filter_index: 0,
            table_cursor: 0,
            ranking_cursor: 0,
            header_index: 0,
            show_help: false,
            show_profile: false,
            show_chat: false,
            throbber: ThrobberState::default(),
            last_tick: Instant::now(),
        }
    }

    /// Per-frame housekeeping: spinner animation and cursor clamping.
    pub fn update(&mut self) {
        if self.dashboard.is_loading() && self.last_tick.elapsed() >= THROBBER_TICK {
            self.throbber.calc_next();
            self.last_tick = Instant::now();
        }

        let rows = self.dashboard.table.rows().len();
        self.table_cursor = self.table_cursor.min(rows.saturating_sub(1));
        let sellers = self.dashboard.ranking.len();
        self.ranking_cursor = self.ranking_cursor.min(sellers.saturating_sub(1));
    }

    pub fn selected_filter(&self) -> FilterField {
        FilterField::from_index(self.filter_index).unwrap_or(FilterField::Clasificacion)
    }

    pub fn selected_column(&self) -> SortColumn {
        SortColumn::from_index(self.header_index).unwrap_or(SortColumn::Codigo)
    }

    /// Moves a categorical filter to the neighbouring value and reloads.
    pub fn cycle_filter(&mut self, forward: bool) -> Vec<Effect> {
        let field = self.selected_filter();
        let choices = self.dashboard.filter_choices(field);
        if choices.is_empty() {
            return Vec::new();
        }

        let current = self
            .dashboard
            .filters
            .get(field)
            .and_then(|value| choices.iter().position(|choice| choice == value))
            .unwrap_or(0);
        let next = if forward {
            wrap_increment(current, choices.len())
        } else {
            wrap_decrement(current, choices.len())
        };

        self.dashboard.dispatch(Message::SetFilter {
            field,
            value: choices.get(next).cloned(),
        })
    }

    /// Toggles the seller filter for the ranking entry under the cursor.
    pub fn toggle_selected_seller(&mut self) -> Vec<Effect> {
        let Some(seller) = self
            .dashboard
            .ranking
            .get(self.ranking_cursor)
            .and_then(|rank| rank.vendedor.clone())
        else {
            return Vec::new();
        };
        self.dashboard.dispatch(Message::ToggleSeller(seller))
    }

    /// Applies the best fuzzy match of the search buffer to `field`.
    pub fn apply_search(&mut self, field: FilterField) -> Vec<Effect> {
        let choices = self.dashboard.filter_choices(field);
        let Some(choice) = best_match(&choices, &self.current_input).map(str::to_string) else {
            self.dashboard
                .set_status(format!("Sin coincidencias para \"{}\"", self.current_input));
            return Vec::new();
        };

        if self.dashboard.filters.get(field) == Some(choice.as_str()) {
            return Vec::new();
        }
        self.dashboard.dispatch(Message::SetFilter {
            field,
            value: Some(choice),
        })
    }

    /// Live preview of the fuzzy search.
    pub fn search_preview(&self, field: FilterField) -> Option<String> {
        let choices = self.dashboard.filter_choices(field);
        best_match(&choices, &self.current_input).map(str::to_string)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
