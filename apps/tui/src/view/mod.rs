// View renderers for the dashboard
// Each one owns its view model and is refreshed from the project collection

pub mod escape;
pub mod html;
pub mod map;
pub mod profile;
pub mod stats;
pub mod table;

pub use map::MapView;
pub use stats::StatsView;
pub use table::TableView;
