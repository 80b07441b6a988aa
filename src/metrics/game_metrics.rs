use std::time::{Duration, Instant};

use crate::game::{CollisionType, GameState};

/// Per-process session statistics. Nothing here outlives the process.
pub struct GameMetrics {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub best_score: u32,
    pub games_finished: u32,
    pub last_collision: Option<CollisionType>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            elapsed: Duration::ZERO,
            best_score: 0,
            games_finished: 0,
            last_collision: None,
        }
    }

    /// Refresh the game clock. The clock stops once the game is over.
    pub fn update(&mut self, state: &GameState) {
        if state.is_running() {
            self.elapsed = self.started_at.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.started_at = Instant::now();
        self.elapsed = Duration::ZERO;
    }

    /// Record a finished game. Call once, on the tick that ended it.
    pub fn on_game_over(&mut self, state: &GameState) {
        self.games_finished += 1;
        self.best_score = self.best_score.max(state.score);
        self.last_collision = state.collision;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
