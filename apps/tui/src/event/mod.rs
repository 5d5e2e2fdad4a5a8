// Event module: terminal loop, effect execution and the headless runner

pub mod effects;
pub mod headless;
pub mod loop_handler;

pub use headless::{run_headless, HeadlessOptions};
pub use loop_handler::run;
