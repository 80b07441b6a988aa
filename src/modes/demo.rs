//! Autopilot mode
//!
//! The engine runs exactly as in human mode, but an `Autopilot` submits a
//! direction request before every tick instead of the keyboard. A finished
//! game restarts on its own after `RESTART_DELAY`.
//!
//! # Controls
//!
//! - R: Restart now
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use ratatui::Terminal;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::interval;

use super::autopilot::Autopilot;
use super::human::{TerminalEngine, terminal_engine};
use super::terminal::{TerminalBackend, restore_terminal, setup_terminal};
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::scheduler::Tick;

/// Pause on the game over screen before the next game
pub const RESTART_DELAY: Duration = Duration::from_secs(2);

pub struct DemoMode {
    engine: TerminalEngine,
    ticks: Option<UnboundedReceiver<Tick>>,
    autopilot: Autopilot,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    game_over_at: Option<Instant>,
    should_quit: bool,
}

impl DemoMode {
    /// Must be called inside a tokio runtime: the first game starts immediately.
    pub fn new(config: GameConfig) -> Result<Self> {
        let (engine, ticks) = terminal_engine(config)?;

        Ok(Self {
            engine,
            ticks: Some(ticks),
            autopilot: Autopilot::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::with_title("Snake (autopilot)"),
            input_handler: InputHandler::new(),
            game_over_at: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut ticks = self
            .ticks
            .take()
            .context("Demo mode has already been run")?;

        let mut terminal = setup_terminal()?;
        let result = self.run_loop(&mut terminal, &mut ticks).await;
        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<TerminalBackend>,
        ticks: &mut UnboundedReceiver<Tick>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                Some(tick) = ticks.recv() => {
                    if self.engine.scheduler().is_current(tick) {
                        self.step();
                    }
                }

                _ = render_timer.tick() => {
                    self.maybe_restart(Instant::now());
                    self.metrics.update(self.engine.state());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            // Turn keys are ignored, the autopilot steers
            match self.input_handler.handle_key_event(key) {
                KeyAction::Restart => self.restart(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Turn(_) | KeyAction::None => {}
            }
        }
    }

    fn step(&mut self) {
        let direction = self
            .autopilot
            .choose(self.engine.state(), self.engine.grid());
        self.engine.request_direction_change(direction);

        if self.engine.tick().ended_game() {
            self.metrics.on_game_over(self.engine.state());
            self.game_over_at = Some(Instant::now());
            info!(
                "Autopilot finished with score {} (best {})",
                self.engine.state().score,
                self.metrics.best_score
            );
        }
    }

    fn maybe_restart(&mut self, now: Instant) {
        if let Some(ended) = self.game_over_at {
            if now.duration_since(ended) >= RESTART_DELAY {
                self.restart();
            }
        }
    }

    fn restart(&mut self) {
        self.game_over_at = None;
        self.engine.start_game();
        self.metrics.on_game_start();
    }
}
