use crate::api::{ApiError, DashboardApi};
use crate::app::dashboard::{Effect, Message};
use crate::app::filters::FilterState;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Runs one effect to completion and turns its outcome into a message.
pub async fn perform<A: DashboardApi>(api: &A, export_dir: &Path, effect: Effect) -> Message {
    match effect {
        Effect::FetchFilterOptions => Message::FilterOptionsLoaded(api.fetch_filter_options().await),
        Effect::FetchProjects { request, filters } => Message::ProjectsLoaded {
            request,
            result: api.fetch_projects(&filters).await,
        },
        Effect::FetchStatistics { request, filters } => Message::StatisticsLoaded {
            request,
            result: api.fetch_statistics(&filters).await,
        },
        Effect::FetchRanking { request, estado } => Message::RankingLoaded {
            request,
            result: api.fetch_ranking(&estado).await,
        },
        Effect::FetchSuccessProfile => {
            Message::SuccessProfileLoaded(api.fetch_success_profile().await)
        }
        Effect::FetchDiagnostics { request } => Message::DiagnosticsLoaded {
            request,
            result: api.fetch_diagnostics().await,
        },
        Effect::DownloadCsv { filters } => {
            Message::ExportFinished(download_csv(api, &filters, export_dir).await)
        }
        Effect::SendChat { message } => Message::ChatReplied(api.send_chat(&message).await),
    }
}

/// Saves the CSV export for `filters` under `dir` and returns its path.
pub async fn download_csv<A: DashboardApi>(
    api: &A,
    filters: &FilterState,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    let body = api.fetch_csv(filters).await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(Local::now()));
    tokio::fs::write(&path, &body).await?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "CSV written");
    Ok(path)
}

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("proyectos_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Spawns effects on the runtime and sends their messages back to the UI
/// task. Nothing is cancelled; superseded results are dropped on arrival.
pub struct EffectRunner<A> {
    api: Arc<A>,
    export_dir: PathBuf,
    sender: UnboundedSender<Message>,
}

impl<A: DashboardApi> EffectRunner<A> {
    pub const fn new(api: Arc<A>, export_dir: PathBuf, sender: UnboundedSender<Message>) -> Self {
        Self {
            api,
            export_dir,
            sender,
        }
    }

    pub fn spawn(&self, effects: Vec<Effect>) {
        for effect in effects {
            let api = Arc::clone(&self.api);
            let export_dir = self.export_dir.clone();
            let sender = self.sender.clone();
            tokio::spawn(async move {
                let message = perform(api.as_ref(), &export_dir, effect).await;
                if sender.send(message).is_err() {
                    tracing::debug!("UI loop gone, effect result dropped");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn export_file_name_is_timestamped() {
        let now = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .unwrap_or_else(Local::now);

        let name = export_file_name(now);

        assert!(name.starts_with("proyectos_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "proyectos_YYYYmmdd_HHMMSS.csv".len());
    }
}
