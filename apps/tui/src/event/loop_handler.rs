use crate::api::DashboardApi;
use crate::app::dashboard::Message;
use crate::app::{handle_input, App};
use crate::event::effects::EffectRunner;
use crate::ui;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Configure event poll timeout (ms)
const EVENT_POLL_TIMEOUT: u64 = 50;

/// Run the main application event loop
///
/// Key presses and effect results are both turned into dashboard messages on
/// this task; effects themselves run on spawned tasks.
pub async fn run<A: DashboardApi>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    api: Arc<A>,
    export_dir: PathBuf,
) -> Result<()> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<Message>();
    let runner = EffectRunner::new(api, export_dir, sender);

    runner.spawn(app.dashboard.dispatch(Message::Start));

    loop {
        app.update();

        terminal
            .draw(|f| ui::ui(app, f))
            .wrap_err("Terminal draw error")?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    runner.spawn(handle_input(app, key));
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Redrawn on the next iteration
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "failed to read terminal event"),
            }
        }

        while let Ok(message) = receiver.try_recv() {
            runner.spawn(app.dashboard.dispatch(message));
        }
    }

    tracing::info!("event loop finished");
    Ok(())
}
