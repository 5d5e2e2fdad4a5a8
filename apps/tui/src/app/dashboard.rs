use crate::api::ApiError;
use crate::app::chat::ChatState;
use crate::app::collection::ProjectCollection;
use crate::app::filters::{FilterField, FilterState};
use crate::domain::{
    ConstructorRank, Diagnostics, FilterOptions, Project, SortColumn, Statistics, SuccessProfile,
};
use crate::view::{MapView, StatsView, TableView};
use std::path::PathBuf;

/// Everything that can happen to the dashboard: user intents and the
/// results of effects.
#[derive(Debug)]
pub enum Message {
    Start,
    SetFilter {
        field: FilterField,
        value: Option<String>,
    },
    ResetFilters,
    Reload,
    SortBy(SortColumn),
    SelectRow(usize),
    /// Filters by the seller, or clears the seller filter when it is the
    /// one already applied.
    ToggleSeller(String),
    ExportCsv,
    DismissAlert,
    SendChat(String),
    FilterOptionsLoaded(Result<FilterOptions, ApiError>),
    ProjectsLoaded {
        request: u64,
        result: Result<Vec<Project>, ApiError>,
    },
    StatisticsLoaded {
        request: u64,
        result: Result<Statistics, ApiError>,
    },
    RankingLoaded {
        request: u64,
        result: Result<Vec<ConstructorRank>, ApiError>,
    },
    SuccessProfileLoaded(Result<SuccessProfile, ApiError>),
    DiagnosticsLoaded {
        request: u64,
        result: Result<Diagnostics, ApiError>,
    },
    ExportFinished(Result<PathBuf, ApiError>),
    ChatReplied(Result<String, ApiError>),
}

/// Work the dashboard asks the runtime to perform. Each effect answers with
/// exactly one [`Message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchFilterOptions,
    FetchProjects { request: u64, filters: FilterState },
    FetchStatistics { request: u64, filters: FilterState },
    FetchRanking { request: u64, estado: String },
    FetchSuccessProfile,
    FetchDiagnostics { request: u64 },
    DownloadCsv { filters: FilterState },
    SendChat { message: String },
}

/// Dashboard state, owned by the UI task and mutated only by [`dispatch`].
///
/// [`dispatch`]: Dashboard::dispatch
#[derive(Debug, Default)]
pub struct Dashboard {
    pub filters: FilterState,
    pub options: FilterOptions,
    pub collection: ProjectCollection,
    pub table: TableView,
    pub map: MapView,
    pub stats: StatsView,
    pub chat: ChatState,
    /// Constructor ranking for the current `estado`. Empty when unavailable.
    pub ranking: Vec<ConstructorRank>,
    pub profile: Option<SuccessProfile>,
    latest_request: u64,
    latest_ranking: u64,
    loading: bool,
    exporting: bool,
    alert: Option<String>,
    status: String,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            status: "Cargando...".to_string(),
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Start => {
                let mut effects = vec![Effect::FetchFilterOptions];
                effects.extend(self.reload());
                effects.push(self.reload_ranking());
                effects.push(Effect::FetchSuccessProfile);
                effects
            }
            Message::SetFilter { field, value } => {
                tracing::debug!(field = field.key(), ?value, "filter changed");
                self.filters.set(field, value);
                let mut effects = self.reload();
                if matches!(field, FilterField::Estado | FilterField::TipoVis) {
                    effects.push(self.reload_ranking());
                }
                effects
            }
            Message::ResetFilters => {
                self.filters = FilterState::default();
                let mut effects = self.reload();
                effects.push(self.reload_ranking());
                effects
            }
            Message::ToggleSeller(seller) => {
                let value = if self.filters.vende.as_deref() == Some(seller.as_str()) {
                    None
                } else {
                    Some(seller)
                };
                tracing::debug!(?value, "seller filter toggled");
                self.filters.set(FilterField::Vende, value);
                self.reload()
            }
            Message::Reload => self.reload(),
            Message::SortBy(column) => {
                self.collection.sort_by(column);
                self.table.render(&self.collection);
                self.map.close_popup();
                Vec::new()
            }
            Message::SelectRow(row) => {
                self.select_row(row);
                Vec::new()
            }
            Message::ExportCsv => {
                if self.exporting {
                    return Vec::new();
                }
                self.exporting = true;
                self.status = "Exportando CSV...".to_string();
                vec![Effect::DownloadCsv {
                    filters: self.filters.clone(),
                }]
            }
            Message::DismissAlert => {
                self.alert = None;
                Vec::new()
            }
            Message::SendChat(text) => self
                .chat
                .submit(&text)
                .map(|message| Effect::SendChat { message })
                .into_iter()
                .collect(),
            Message::FilterOptionsLoaded(result) => {
                match result {
                    Ok(options) => self.options = options,
                    Err(e) => tracing::warn!(error = %e, "could not load filter options"),
                }
                Vec::new()
            }
            Message::ProjectsLoaded { request, result } => self.projects_loaded(request, result),
            Message::StatisticsLoaded { request, result } => {
                if request != self.latest_request {
                    tracing::debug!(request, latest = self.latest_request, "stale statistics dropped");
                    return Vec::new();
                }
                match result {
                    Ok(stats) => self.stats.render(stats),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not load statistics");
                        self.stats.mark_stale();
                    }
                }
                Vec::new()
            }
            Message::RankingLoaded { request, result } => {
                if request != self.latest_ranking {
                    tracing::debug!(request, latest = self.latest_ranking, "stale ranking dropped");
                    return Vec::new();
                }
                match result {
                    Ok(ranking) => {
                        tracing::debug!(sellers = ranking.len(), "ranking loaded");
                        self.ranking = ranking;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "could not load the constructor ranking");
                        self.ranking.clear();
                    }
                }
                Vec::new()
            }
            Message::SuccessProfileLoaded(result) => {
                match result {
                    Ok(profile) => self.profile = Some(profile),
                    Err(e) => tracing::warn!(error = %e, "could not load the success profile"),
                }
                Vec::new()
            }
            Message::DiagnosticsLoaded { request, result } => {
                match result {
                    Ok(diagnostics) if request == self.latest_request => {
                        if let Some(alert) = &mut self.alert {
                            alert.push_str("\n\nDiagnóstico:");
                            for line in diagnostics.lines() {
                                alert.push_str("\n- ");
                                alert.push_str(&line);
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "diagnostics unavailable"),
                }
                Vec::new()
            }
            Message::ExportFinished(result) => {
                self.exporting = false;
                match result {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "CSV exported");
                        self.status = format!("CSV exportado: {}", path.display());
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "CSV export failed");
                        self.status = format!("Error al exportar CSV: {e}");
                    }
                }
                Vec::new()
            }
            Message::ChatReplied(result) => {
                match result {
                    Ok(reply) => self.chat.receive(reply),
                    Err(e) => {
                        tracing::warn!(error = %e, "chat request failed");
                        self.chat.fail(&e.to_string());
                    }
                }
                Vec::new()
            }
        }
    }

    fn reload(&mut self) -> Vec<Effect> {
        self.latest_request += 1;
        self.loading = true;
        self.status = "Cargando proyectos...".to_string();
        tracing::info!(request = self.latest_request, filters = %self.filters.summary(), "loading projects");
        vec![Effect::FetchProjects {
            request: self.latest_request,
            filters: self.filters.clone(),
        }]
    }

    fn reload_ranking(&mut self) -> Effect {
        self.latest_ranking += 1;
        Effect::FetchRanking {
            request: self.latest_ranking,
            estado: self.filters.estado().to_string(),
        }
    }

    fn projects_loaded(
        &mut self,
        request: u64,
        result: Result<Vec<Project>, ApiError>,
    ) -> Vec<Effect> {
        if request != self.latest_request {
            tracing::debug!(request, latest = self.latest_request, "stale projects response dropped");
            return Vec::new();
        }

        self.loading = false;
        let mut effects = Vec::with_capacity(2);
        match result {
            Ok(projects) => {
                tracing::info!(request, count = projects.len(), "projects loaded");
                self.status = format!("{} proyectos", projects.len());
                self.collection.replace(projects);
            }
            Err(e) => {
                tracing::error!(request, error = %e, "could not load projects");
                self.status = "Error al cargar los proyectos".to_string();
                self.alert = Some(e.user_message());
                self.collection.replace(Vec::new());
                effects.push(Effect::FetchDiagnostics { request });
            }
        }
        self.table.render(&self.collection);
        self.map.render(self.collection.unsorted());

        effects.insert(
            0,
            Effect::FetchStatistics {
                request,
                filters: self.filters.clone(),
            },
        );
        effects
    }

    /// Highlights the row and centers the map on its project.
    fn select_row(&mut self, row: usize) {
        if !self.table.select(row) {
            return;
        }
        if let Some(project) = self.collection.effective_get(row) {
            if !self.map.focus(project) {
                tracing::debug!(code = project.display_code(), "selected project has no marker");
            }
        }
    }

    /// Values offered for a categorical filter.
    pub fn filter_choices(&self, field: FilterField) -> Vec<String> {
        let sellers: Vec<String> = self
            .ranking
            .iter()
            .filter_map(|rank| rank.vendedor.clone())
            .collect();
        field.choices(&self.options, &sellers)
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub const fn latest_request(&self) -> u64 {
        self.latest_request
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}
