// Library surface: pipeline, API client and view models, shared by the
// binary and the tests.
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod event;
pub mod telemetry;
pub mod terminal;
pub mod ui;
pub mod view;

pub use domain::{Clasificacion, Project, SortColumn};
