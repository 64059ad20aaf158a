//! Main application coordinator

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::controller::{AppEvent, CommandDispatcher, RefreshWorker};
use crate::core::{ContainerRecord, ImageRecord, NotificationLevel};
use crate::runtime::{CliRuntime, SnapshotSource};
use crate::state::AppState;
use crate::ui::{UiAction, UiApp};

/// Main application struct
pub struct App {
    config: Config,
    source: Arc<dyn SnapshotSource>,
    runtime_name: String,
}

impl App {
    /// Create an application backed by the configured runtime tool
    pub fn new(config: Config) -> Self {
        let runtime = CliRuntime::from_config(&config.runtime);
        let runtime_name = runtime.program().to_string();
        Self::with_source(config, Arc::new(runtime), runtime_name)
    }

    /// Create an application over any snapshot source
    pub fn with_source(
        config: Config,
        source: Arc<dyn SnapshotSource>,
        runtime_name: impl Into<String>,
    ) -> Self {
        Self {
            config,
            source,
            runtime_name: runtime_name.into(),
        }
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting main application loop");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let interval = Duration::from_millis(self.config.general.poll_interval_ms);

        let (containers_worker, containers) =
            RefreshWorker::<ContainerRecord>::new(self.source.clone(), interval, events_tx.clone());
        let (images_worker, images) =
            RefreshWorker::<ImageRecord>::new(self.source.clone(), interval, events_tx.clone());
        let workers = vec![containers_worker.spawn(), images_worker.spawn()];

        let dispatcher = CommandDispatcher::new(self.source.clone(), containers, images, events_tx);

        let mut state = AppState::new();
        state.runtime_name = self.runtime_name.clone();
        let mut ui_app = UiApp::new(state);

        let mut terminal = match setup_terminal() {
            Ok(terminal) => terminal,
            Err(e) => {
                shutdown(workers);
                return Err(e);
            }
        };
        let result = self
            .run_event_loop(&mut terminal, &mut ui_app, &dispatcher, events_rx)
            .await;

        shutdown(workers);
        merge_outcomes(result, restore_terminal(&mut terminal))
    }

    /// Render after every input, background event, or tick
    async fn run_event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        ui_app: &mut UiApp,
        dispatcher: &CommandDispatcher,
        mut events_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        let mut input = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(250));
        let ttl = self.config.general.notification_ttl_seconds;

        loop {
            terminal.draw(|f| ui_app.draw(f))?;

            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(event)) => {
                        let action = ui_app.handle_event(event);
                        perform(action, ui_app, dispatcher);
                    }
                    Some(Err(e)) => {
                        error!("Terminal input error: {}", e);
                        return Err(e.into());
                    }
                    None => {
                        warn!("Terminal input closed");
                        break;
                    }
                },
                Some(event) = events_rx.recv() => ui_app.state.apply_event(event),
                _ = tick.tick() => ui_app.state.clear_old_notifications(ttl),
            }

            if ui_app.should_quit {
                info!("Quit signal received, exiting event loop");
                break;
            }
        }

        Ok(())
    }
}

/// Carry out what a key press asked for
fn perform(action: UiAction, ui_app: &mut UiApp, dispatcher: &CommandDispatcher) {
    match action {
        UiAction::None | UiAction::Quit => {}
        UiAction::Refresh(kind) => {
            debug!("Manual refresh of {}", kind);
            dispatcher.refresh(kind);
        }
        UiAction::Dispatch(command) => match dispatcher.dispatch(command) {
            Ok(_) => ui_app.state.form = None,
            // the form stays open so the input can be corrected
            Err(e) => ui_app
                .state
                .add_notification(e.to_string(), NotificationLevel::Error),
        },
    }
}

/// The event loop's error wins; a restore failure is still logged
fn merge_outcomes(event_loop: Result<()>, restore: Result<()>) -> Result<()> {
    match (event_loop, restore) {
        (Err(e), Err(restore_err)) => {
            error!("Could not restore terminal: {:#}", restore_err);
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn shutdown(workers: Vec<JoinHandle<()>>) {
    for worker in workers {
        worker.abort();
    }
    info!("Refresh workers stopped");
}

/// Setup the terminal for TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    info!("Setting up terminal");

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    info!("Terminal setup complete");
    Ok(terminal)
}

/// Restore terminal to original state
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    info!("Restoring terminal");

    terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Terminal restored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Command, RefreshHandle};
    use crate::core::{ContainerStatus, ResourceKind};
    use crate::runtime::MockSnapshotSource;

    fn dispatcher(
        source: MockSnapshotSource,
    ) -> (
        CommandDispatcher,
        mpsc::UnboundedReceiver<()>,
        mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let (containers, containers_rx) = RefreshHandle::channel(ResourceKind::Containers);
        let (images, _images_rx) = RefreshHandle::channel(ResourceKind::Images);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            CommandDispatcher::new(Arc::new(source), containers, images, events_tx),
            containers_rx,
            events_rx,
        )
    }

    fn ui_with_rename_form() -> UiApp {
        let mut state = AppState::default();
        state.form = Some(crate::state::FormState::rename(&ContainerRecord::new(
            "abc123",
            "web",
            ContainerStatus::Running,
        )));
        UiApp::new(state)
    }

    #[test]
    fn test_merge_outcomes_keeps_loop_error() {
        assert!(merge_outcomes(Ok(()), Ok(())).is_ok());

        let restore_only = merge_outcomes(Ok(()), Err(anyhow::anyhow!("restore failed")));
        assert_eq!(restore_only.unwrap_err().to_string(), "restore failed");

        let both = merge_outcomes(
            Err(anyhow::anyhow!("input closed")),
            Err(anyhow::anyhow!("restore failed")),
        );
        assert_eq!(both.unwrap_err().to_string(), "input closed");
    }

    #[tokio::test]
    async fn test_shutdown_stops_workers() {
        let (alive_tx, alive_rx) = tokio::sync::oneshot::channel::<()>();
        let worker = tokio::spawn(async move {
            let _alive = alive_tx;
            std::future::pending::<()>().await;
        });
        shutdown(vec![worker]);

        // the sender is dropped only once the aborted task is torn down
        let stopped = tokio::time::timeout(Duration::from_secs(1), alive_rx).await;
        assert!(matches!(stopped, Ok(Err(_))));
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open() {
        let mut source = MockSnapshotSource::new();
        source.expect_mutate().never();
        let (dispatcher, _containers_rx, _events_rx) = dispatcher(source);
        let mut ui_app = ui_with_rename_form();

        perform(
            UiAction::Dispatch(Command::RenameContainer {
                id: "abc123".into(),
                new_name: String::new(),
            }),
            &mut ui_app,
            &dispatcher,
        );

        assert!(ui_app.state.form.is_some());
        assert_eq!(
            ui_app.state.latest_notification().unwrap().level,
            NotificationLevel::Error
        );
    }

    #[tokio::test]
    async fn test_valid_form_closes_and_refreshes() {
        let mut source = MockSnapshotSource::new();
        source.expect_mutate().times(1).returning(|_| Ok(()));
        let (dispatcher, mut containers_rx, mut events_rx) = dispatcher(source);
        let mut ui_app = ui_with_rename_form();

        perform(
            UiAction::Dispatch(Command::RenameContainer {
                id: "abc123".into(),
                new_name: "api".into(),
            }),
            &mut ui_app,
            &dispatcher,
        );
        assert!(ui_app.state.form.is_none());

        let event = events_rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::MutationFinished { result: Ok(()), .. }));
        assert!(containers_rx.recv().await.is_some());
    }
}
