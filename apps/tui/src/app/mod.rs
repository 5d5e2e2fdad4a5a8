// App module for the GeoMapVal dashboard
// Pipeline state, message dispatch and keyboard handling

pub mod chat;
pub mod collection;
pub mod dashboard;
pub mod filters;
pub mod input;
pub mod state;

pub use dashboard::{Dashboard, Effect, Message};
pub use input::handle_input;
pub use state::{App, Focus, InputMode};
