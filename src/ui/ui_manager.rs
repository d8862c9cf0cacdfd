//! UI task: terminal lifecycle, event application, and input dispatch

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, MouseEventKind};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::session::events::{SessionEvent, UiCommand};

use super::theme;
use super::tui::{Tui, UiAction, handle_key_event};
use super::{AppState, NoticeLevel};

/// Drives the terminal: applies session events to the app state, polls
/// keyboard input, and renders on dirty state or cadence
pub struct UiManager {
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    command_tx: mpsc::UnboundedSender<UiCommand>,
    app: AppState,
    theme_file: Option<PathBuf>,
    tui: Option<Tui>,
    should_redraw: bool,
    refresh_interval: Duration,
    last_render: Instant,
}

impl UiManager {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<SessionEvent>,
        command_tx: mpsc::UnboundedSender<UiCommand>,
        config: Config,
    ) -> Self {
        let theme_file = theme::state_file();
        let active_theme = theme_file
            .as_deref()
            .map(theme::load)
            .unwrap_or_default();

        let refresh_interval = Duration::from_millis(config.ui.refresh_rate_ms.clamp(16, 1000));

        Self {
            event_rx,
            command_tx,
            app: AppState::new(active_theme, config.ui.max_notices),
            theme_file,
            tui: None,
            should_redraw: true,
            refresh_interval,
            last_render: Instant::now(),
        }
    }

    /// Run the UI loop until quit
    pub async fn run(mut self) -> Result<()> {
        info!("Starting UI task (theme: {})", self.app.theme.label());

        // Ctrl+C initiates an orderly shutdown through the session
        let shutdown_tx = self.command_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, initiating shutdown");
                let _ = shutdown_tx.send(UiCommand::Shutdown);
            }
        });

        self.tui =
            Some(Tui::new().map_err(|e| anyhow!("Failed to initialise terminal: {}", e))?);
        self.should_redraw = true;
        self.last_render = Instant::now()
            .checked_sub(self.refresh_interval)
            .unwrap_or_else(Instant::now);

        while !self.app.should_quit {
            self.process_events();
            self.poll_terminal_events()?;

            let now = Instant::now();
            if self.should_redraw || now.duration_since(self.last_render) >= self.refresh_interval
            {
                if let Some(tui) = self.tui.as_mut() {
                    tui.draw(&mut self.app)
                        .map_err(|e| anyhow!("Failed to render frame: {}", e))?;
                }
                self.should_redraw = false;
                self.last_render = now;
            }

            // Prevent busy loop
            tokio::time::sleep(Duration::from_millis(16)).await;
        }

        if let Some(tui) = self.tui.as_mut() {
            tui.restore()
                .map_err(|e| anyhow!("Failed to restore terminal state: {}", e))?;
        }

        info!("UI task stopped");
        Ok(())
    }

    /// Drain pending session events into the app state
    fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            self.should_redraw = true;
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::TableLoaded {
                generation,
                stocks,
                snapshot,
            } => {
                debug!(
                    "Applying table generation {} ({} stocks)",
                    generation,
                    stocks.len()
                );
                self.app.apply_table(generation, stocks, snapshot);
            }
            SessionEvent::PricesPatched { snapshot } => {
                self.app.apply_prices(snapshot);
            }
            SessionEvent::HistoryLoaded {
                generation,
                ticker,
                prices,
            } => {
                self.app.apply_history(generation, &ticker, prices);
            }
            SessionEvent::AddSucceeded { ticker } => {
                self.app.close_add_form();
                self.app
                    .push_notice(NoticeLevel::Info, format!("Stock {} added", ticker));
            }
            SessionEvent::AddFailed { message } => {
                self.app.fail_add(message);
            }
            SessionEvent::DeleteSucceeded { ticker } => {
                self.app
                    .push_notice(NoticeLevel::Info, format!("Stock {} deleted", ticker));
            }
            SessionEvent::DeleteFailed { message } => {
                self.app.push_notice(NoticeLevel::Error, message);
            }
            SessionEvent::StatsUpdated { stats } => {
                self.app.stats = stats;
            }
            SessionEvent::ShutdownRequested => {
                info!("UI received shutdown request");
                self.app.should_quit = true;
            }
        }
    }

    /// Poll for keyboard/terminal events and translate them into commands
    fn poll_terminal_events(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => {
                    let action = handle_key_event(&mut self.app, key_event);
                    self.should_redraw = true;
                    self.dispatch(action);
                }
                Event::Resize(_, _) => {
                    self.should_redraw = true;
                }
                Event::Mouse(mouse_event) => match mouse_event.kind {
                    MouseEventKind::ScrollUp => {
                        self.app.select_previous_row();
                        self.should_redraw = true;
                    }
                    MouseEventKind::ScrollDown => {
                        self.app.select_next_row();
                        self.should_redraw = true;
                    }
                    _ => {}
                },
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, action: UiAction) {
        match action {
            UiAction::None => {}
            UiAction::QuitRequested => {
                let _ = self.command_tx.send(UiCommand::Shutdown);
            }
            UiAction::Reload => {
                let _ = self.command_tx.send(UiCommand::Reload);
            }
            UiAction::SubmitAdd {
                ticker,
                buy_price,
                sell_price,
            } => {
                let _ = self.command_tx.send(UiCommand::AddStock {
                    ticker,
                    buy_price,
                    sell_price,
                });
            }
            UiAction::SubmitDelete { ticker } => {
                let _ = self.command_tx.send(UiCommand::DeleteStock { ticker });
            }
            UiAction::ThemeToggled => {
                if let Some(path) = &self.theme_file {
                    if let Err(e) = theme::save(path, self.app.theme) {
                        warn!("Failed to persist theme: {}", e);
                    }
                }
            }
        }
    }
}
