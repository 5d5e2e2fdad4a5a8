// API module for the dashboard backend
// One request per operation, JSON envelopes with a `success` flag
// (`/api/diagnostico` answers with a bare object)

pub mod client;
pub mod error;

pub use client::HttpApiClient;
pub use error::ApiError;

use crate::app::filters::FilterState;
use crate::domain::{ConstructorRank, Diagnostics, FilterOptions, Project, Statistics, SuccessProfile};
use reqwest::Url;
use std::future::Future;

/// Backend operations the dashboard depends on.
///
/// Futures are `Send` so effects can run on spawned tokio tasks.
pub trait DashboardApi: Send + Sync + 'static {
    fn fetch_filter_options(&self) -> impl Future<Output = Result<FilterOptions, ApiError>> + Send;

    fn fetch_projects(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Vec<Project>, ApiError>> + Send;

    fn fetch_statistics(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Statistics, ApiError>> + Send;

    /// Body of the CSV download for `filters`.
    fn fetch_csv(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;

    /// Top sellers for `estado` (`Activos`, `Inactivos` or `Todos`).
    fn fetch_ranking(
        &self,
        estado: &str,
    ) -> impl Future<Output = Result<Vec<ConstructorRank>, ApiError>> + Send;

    fn fetch_success_profile(
        &self,
    ) -> impl Future<Output = Result<SuccessProfile, ApiError>> + Send;

    /// Data-source report used to explain a failed project load.
    fn fetch_diagnostics(&self) -> impl Future<Output = Result<Diagnostics, ApiError>> + Send;

    fn send_chat(&self, message: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Download URL for the CSV export with the same parameters as the
    /// project query.
    fn csv_export_url(&self, filters: &FilterState) -> Result<Url, ApiError>;
}
