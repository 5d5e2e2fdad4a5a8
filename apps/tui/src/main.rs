use clap::Parser;
use color_eyre::Result;
use geomapval::api::HttpApiClient;
use geomapval::app::App;
use geomapval::cli::CliArgs;
use geomapval::config::init_app_config;
use geomapval::event::{self, HeadlessOptions};
use geomapval::{telemetry, terminal};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    telemetry::init_logging(&config)?;

    let api = HttpApiClient::new(&config)?;

    // Check if we're running in a terminal
    if args.headless || args.json || args.html.is_some() || !is_terminal() {
        let options = HeadlessOptions {
            filters: args.filters(),
            sort: args.sort(),
            json: args.json,
            html: args.html.clone(),
            export_csv: args.export,
        };
        return event::run_headless(&api, &config.export_dir, &options).await;
    }

    let mut app = App::new();
    app.dashboard.filters = args.filters();

    let mut tui = terminal::setup_terminal()?;
    let result = event::run(&mut tui, &mut app, Arc::new(api), config.export_dir.clone()).await;
    terminal::cleanup_terminal_state(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
