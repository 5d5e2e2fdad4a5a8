use crate::api::DashboardApi;
use crate::app::collection::SortDirection;
use crate::app::dashboard::{Dashboard, Message};
use crate::app::filters::FilterState;
use crate::domain::{ConstructorRank, SortColumn, Statistics};
use crate::view::escape::sanitize_terminal;
use crate::view::html::render_report;
use crate::view::profile::{profile_entries, ProfileEntry};
use crate::view::table::{TableRow, EMPTY_PLACEHOLDER};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// What a headless run should do besides loading the dashboard.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub filters: FilterState,
    pub sort: Option<(SortColumn, SortDirection)>,
    pub json: bool,
    pub html: Option<PathBuf>,
    pub export_csv: bool,
}

/// Dispatches `message` and runs every resulting effect in order until no
/// work is left.
pub async fn drive<A: DashboardApi>(
    dashboard: &mut Dashboard,
    api: &A,
    export_dir: &Path,
    message: Message,
) {
    let mut queue = VecDeque::from([message]);
    while let Some(message) = queue.pop_front() {
        for effect in dashboard.dispatch(message) {
            queue.push_back(super::effects::perform(api, export_dir, effect).await);
        }
    }
}

/// Loads the dashboard once with the given filters and prints a report.
pub async fn run_headless<A: DashboardApi>(
    api: &A,
    export_dir: &Path,
    options: &HeadlessOptions,
) -> Result<()> {
    let dashboard = load(api, export_dir, options).await?;

    if let Some(path) = &options.html {
        let html = render_report(&dashboard);
        tokio::fs::write(path, html)
            .await
            .wrap_err_with(|| format!("Failed to write HTML report to {}", path.display()))?;
        println!("Informe HTML: {}", path.display());
    } else if options.json {
        let report = HeadlessReport::from_dashboard(&dashboard);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_headless_text(&dashboard);
    }

    Ok(())
}

/// Runs the load pipeline (and the optional sort and export) to completion.
pub async fn load<A: DashboardApi>(
    api: &A,
    export_dir: &Path,
    options: &HeadlessOptions,
) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new();
    dashboard.filters = options.filters.clone();
    drive(&mut dashboard, api, export_dir, Message::Start).await;

    if let Some(alert) = dashboard.alert() {
        return Err(eyre!("{alert}"));
    }

    if let Some((column, direction)) = options.sort {
        drive(&mut dashboard, api, export_dir, Message::SortBy(column)).await;
        if direction == SortDirection::Desc {
            drive(&mut dashboard, api, export_dir, Message::SortBy(column)).await;
        }
    }

    if options.export_csv {
        drive(&mut dashboard, api, export_dir, Message::ExportCsv).await;
        eprintln!("{}", dashboard.status());
    }

    Ok(dashboard)
}

fn render_headless_text(dashboard: &Dashboard) {
    println!("\nGeoMapVal");
    println!("=========");
    println!("Filtros: {}", dashboard.filters.summary());

    match dashboard.stats.stats() {
        Some(stats) => {
            println!("\nTotal: {}", stats.total);
            for share in dashboard.stats.shares() {
                println!(
                    "- {}: {} ({:.1}%)",
                    share.clasificacion.plural_label(),
                    share.count,
                    share.percent
                );
            }
            println!("Score promedio: {}", dashboard.stats.score_label());
        }
        None => println!("\nSin estadísticas disponibles"),
    }

    println!(
        "\nProyectos {} | en el mapa: {}",
        dashboard.table.count_label(),
        dashboard.map.count()
    );
    println!("{}", dashboard.table.header().join(" | "));
    if dashboard.table.is_placeholder() {
        println!("{EMPTY_PLACEHOLDER}");
    }
    for row in dashboard.table.rows() {
        let cells: Vec<String> = row.cells().iter().map(|cell| sanitize_terminal(cell)).collect();
        println!("{}", cells.join(" | "));
    }

    println!("\nRanking de constructores ({})", dashboard.filters.estado());
    if dashboard.ranking.is_empty() {
        println!("No hay datos disponibles");
    }
    for (index, rank) in dashboard.ranking.iter().enumerate() {
        println!(
            "{:>2}. {} | {} proyectos | {} exitosos ({:.1}%) | score {:.3}",
            index + 1,
            sanitize_terminal(rank.display_name()),
            rank.total_proyectos,
            rank.exitosos,
            rank.porcentaje_exitosos,
            rank.score_promedio
        );
    }

    let profile = dashboard.profile.as_ref().map(profile_entries).unwrap_or_default();
    if !profile.is_empty() {
        println!("\nCaracterísticas de proyectos exitosos");
        for entry in profile {
            println!(
                "- {}: promedio {}, mediana {}, rango {}",
                entry.title, entry.promedio, entry.mediana, entry.rango
            );
        }
    }
}

#[derive(serde::Serialize)]
struct HeadlessReport<'a> {
    filters: &'a FilterState,
    statistics: Option<&'a Statistics>,
    statistics_stale: bool,
    mapped_projects: usize,
    sort_column: Option<&'static str>,
    sort_direction: &'static str,
    projects: &'a [TableRow],
    ranking: &'a [ConstructorRank],
    success_profile: Vec<ProfileEntry>,
}

impl<'a> HeadlessReport<'a> {
    fn from_dashboard(dashboard: &'a Dashboard) -> Self {
        let sort = dashboard.table.sort_state();
        Self {
            filters: &dashboard.filters,
            statistics: dashboard.stats.stats(),
            statistics_stale: dashboard.stats.is_stale(),
            mapped_projects: dashboard.map.count(),
            sort_column: sort.column.map(SortColumn::key),
            sort_direction: sort.direction.as_str(),
            projects: dashboard.table.rows(),
            ranking: &dashboard.ranking,
            success_profile: dashboard
                .profile
                .as_ref()
                .map(profile_entries)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::{Diagnostics, FilterOptions, Project, SuccessProfile};
    use reqwest::Url;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubApi {
        projects: Vec<Project>,
        fail_projects: bool,
        fail_statistics: bool,
        project_queries: Mutex<Vec<FilterState>>,
        ranking_queries: Mutex<Vec<String>>,
    }

    impl DashboardApi for StubApi {
        async fn fetch_filter_options(&self) -> Result<FilterOptions, ApiError> {
            Ok(FilterOptions::default())
        }

        async fn fetch_projects(&self, filters: &FilterState) -> Result<Vec<Project>, ApiError> {
            if let Ok(mut queries) = self.project_queries.lock() {
                queries.push(filters.clone());
            }
            if self.fail_projects {
                return Err(ApiError::Server("No hay datos disponibles".to_string()));
            }
            Ok(self.projects.clone())
        }

        async fn fetch_statistics(&self, _filters: &FilterState) -> Result<Statistics, ApiError> {
            if self.fail_statistics {
                return Err(ApiError::Status {
                    status: 500,
                    message: None,
                });
            }
            Ok(Statistics {
                total: self.projects.len() as u64,
                exitosos: 1,
                ..Statistics::default()
            })
        }

        async fn fetch_ranking(&self, estado: &str) -> Result<Vec<ConstructorRank>, ApiError> {
            if let Ok(mut queries) = self.ranking_queries.lock() {
                queries.push(estado.to_string());
            }
            Ok(vec![ConstructorRank {
                vendedor: Some("Constructora A".to_string()),
                total_proyectos: 2,
                exitosos: 1,
                ..ConstructorRank::default()
            }])
        }

        async fn fetch_success_profile(&self) -> Result<SuccessProfile, ApiError> {
            Err(ApiError::Status {
                status: 404,
                message: Some("No hay características".to_string()),
            })
        }

        async fn fetch_diagnostics(&self) -> Result<Diagnostics, ApiError> {
            Ok(Diagnostics {
                archivo_existe: false,
                df_data_vacio: true,
                ..Diagnostics::default()
            })
        }

        async fn fetch_csv(&self, _filters: &FilterState) -> Result<Vec<u8>, ApiError> {
            Ok(b"codigo,nombre\nA,Alfa\n".to_vec())
        }

        async fn send_chat(&self, message: &str) -> Result<String, ApiError> {
            Ok(format!("eco: {message}"))
        }

        fn csv_export_url(&self, _filters: &FilterState) -> Result<Url, ApiError> {
            Url::parse("http://stub/api/descargar").map_err(|e| ApiError::InvalidUrl(e.to_string()))
        }
    }

    fn project(code: &str, score: f64) -> Project {
        Project {
            codigo: Some(code.to_string()),
            score_exito: Some(score),
            lat: Some(3.4),
            lon: Some(-76.5),
            ..Project::default()
        }
    }

    #[tokio::test]
    async fn headless_load_applies_filters_and_sort() -> Result<()> {
        let api = StubApi {
            projects: vec![project("A", 0.2), project("B", 0.9), project("C", 0.5)],
            ..StubApi::default()
        };
        let mut filters = FilterState::default();
        filters.precio_max = Some("500000".to_string());
        let options = HeadlessOptions {
            filters,
            sort: Some((SortColumn::ScoreExito, SortDirection::Desc)),
            ..HeadlessOptions::default()
        };

        let dashboard = load(&api, &std::env::temp_dir(), &options).await?;

        let codes: Vec<_> = dashboard.table.rows().iter().map(|row| row.codigo.as_str()).collect();
        assert_eq!(codes, ["B", "C", "A"]);
        assert_eq!(dashboard.stats.stats().map(|stats| stats.total), Some(3));
        assert_eq!(dashboard.map.count(), 3);
        assert!(!dashboard.is_loading());

        let queries = api.project_queries.lock().map(|q| q.clone()).unwrap_or_default();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].precio_max.as_deref(), Some("500000"));
        Ok(())
    }

    #[tokio::test]
    async fn headless_load_reports_project_failures() {
        let api = StubApi {
            fail_projects: true,
            ..StubApi::default()
        };

        let result = load(&api, &std::env::temp_dir(), &HeadlessOptions::default()).await;

        match result {
            Err(error) => {
                let message = error.to_string();
                assert!(message.contains("No hay datos disponibles"));
                assert!(message.contains("Archivo existe: No"));
            }
            Ok(_) => panic!("expected the project failure to surface"),
        }
    }

    #[tokio::test]
    async fn ranking_follows_the_estado_filter() -> Result<()> {
        let api = StubApi::default();
        let mut filters = FilterState::default();
        filters.estado = Some("Todos".to_string());
        let options = HeadlessOptions {
            filters,
            ..HeadlessOptions::default()
        };

        let dashboard = load(&api, &std::env::temp_dir(), &options).await?;

        assert_eq!(dashboard.ranking.len(), 1);
        assert_eq!(dashboard.profile, None);
        let queries = api.ranking_queries.lock().map(|q| q.clone()).unwrap_or_default();
        assert_eq!(queries, ["Todos"]);

        let report = serde_json::to_value(HeadlessReport::from_dashboard(&dashboard))?;
        assert_eq!(report["ranking"][0]["vendedor"], "Constructora A");
        assert_eq!(report["filters"]["estado"], "Todos");
        Ok(())
    }

    #[tokio::test]
    async fn statistics_failure_does_not_fail_the_run() -> Result<()> {
        let api = StubApi {
            projects: vec![project("A", 0.2)],
            fail_statistics: true,
            ..StubApi::default()
        };

        let dashboard = load(&api, &std::env::temp_dir(), &HeadlessOptions::default()).await?;

        assert_eq!(dashboard.table.rows().len(), 1);
        assert!(dashboard.stats.stats().is_none());
        assert!(dashboard.stats.is_stale());
        Ok(())
    }

    #[tokio::test]
    async fn export_writes_the_csv_into_the_export_dir() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("geomapval-export-{}", std::process::id()));
        let api = StubApi::default();

        let path = crate::event::effects::download_csv(&api, &FilterState::default(), &dir).await?;

        assert!(path.starts_with(&dir));
        assert_eq!(tokio::fs::read_to_string(&path).await?, "codigo,nombre\nA,Alfa\n");
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }

    #[tokio::test]
    async fn empty_result_renders_placeholder_everywhere() -> Result<()> {
        let api = StubApi::default();

        let dashboard = load(&api, &std::env::temp_dir(), &HeadlessOptions::default()).await?;

        assert!(dashboard.table.is_placeholder());
        assert_eq!(dashboard.table.count_label(), "(0)");
        assert_eq!(dashboard.map.count(), 0);
        assert!(dashboard.map.last_fit().is_none());
        Ok(())
    }
}
