use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use ratatui::Terminal;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::interval;

use super::terminal::{TerminalBackend, restore_terminal, setup_terminal};
use crate::game::{GameConfig, SnakeEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::scheduler::{IntervalScheduler, Tick};

/// Engine driven by a tokio interval
pub type TerminalEngine = SnakeEngine<IntervalScheduler>;

/// Build an engine whose ticks arrive on the returned channel
pub fn terminal_engine(config: GameConfig) -> Result<(TerminalEngine, UnboundedReceiver<Tick>)> {
    let (scheduler, ticks) = IntervalScheduler::new();
    let engine = SnakeEngine::with_scheduler(config, scheduler)?;
    Ok((engine, ticks))
}

/// Keyboard-controlled game in the terminal
pub struct HumanMode {
    engine: TerminalEngine,
    ticks: Option<UnboundedReceiver<Tick>>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    /// Must be called inside a tokio runtime: the first game starts immediately.
    pub fn new(config: GameConfig) -> Result<Self> {
        let (engine, ticks) = terminal_engine(config)?;

        Ok(Self {
            engine,
            ticks: Some(ticks),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut ticks = self
            .ticks
            .take()
            .context("Human mode has already been run")?;

        let mut terminal = setup_terminal()?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal, &mut ticks).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<TerminalBackend>,
        ticks: &mut UnboundedReceiver<Tick>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
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
                        self.update_game();
                    }
                }

                _ = render_timer.tick() => {
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
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.engine.request_direction_change(direction);
                }
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        if self.engine.tick().ended_game() {
            self.metrics.on_game_over(self.engine.state());
            info!(
                "Final score {} (best {} over {} games)",
                self.engine.state().score,
                self.metrics.best_score,
                self.metrics.games_finished
            );
        }
    }

    fn reset_game(&mut self) {
        self.engine.start_game();
        self.metrics.on_game_start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Direction, GameStatus, Snake};
    use crate::scheduler::TickScheduler;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default().with_seed(1)).unwrap();
        assert!(mode.engine.state().is_running());
        assert_eq!(mode.engine.state().score, 0);
        assert!(mode.engine.scheduler().is_running());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        assert!(HumanMode::new(GameConfig::new(0)).is_err());
    }

    #[tokio::test]
    async fn test_arrow_key_queues_turn() {
        let mut mode = HumanMode::new(GameConfig::default().with_seed(1)).unwrap();

        mode.handle_event(key(KeyCode::Up));
        assert_eq!(mode.engine.pending_direction(), Some(Direction::Up));

        // Reversing the queued turn is dropped by the engine
        mode.handle_event(key(KeyCode::Down));
        assert_eq!(mode.engine.pending_direction(), Some(Direction::Up));
    }

    #[tokio::test]
    async fn test_game_over_recorded_once() {
        let mut mode = HumanMode::new(GameConfig::small().with_seed(1)).unwrap();

        // Drive straight into the right wall
        for _ in 0..20 {
            mode.update_game();
        }

        assert_eq!(mode.engine.state().status, GameStatus::GameOver);
        assert_eq!(mode.metrics.games_finished, 1);
        assert!(!mode.engine.scheduler().is_running());
    }

    #[tokio::test]
    async fn test_game_reset() {
        let mut mode = HumanMode::new(GameConfig::small().with_seed(1)).unwrap();
        for _ in 0..20 {
            mode.update_game();
        }
        assert!(mode.engine.is_game_over());

        mode.handle_event(key(KeyCode::Char('r')));

        assert!(mode.engine.state().is_running());
        assert_eq!(mode.engine.state().score, 0);
        assert_eq!(mode.engine.state().snake, Snake::new(Cell::new(5, 5), Direction::Right, 3));
        assert!(mode.engine.scheduler().is_running());
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut mode = HumanMode::new(GameConfig::default()).unwrap();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
