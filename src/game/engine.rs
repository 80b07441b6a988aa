use anyhow::Result;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    action::Direction,
    config::GameConfig,
    grid::Grid,
    state::{Cell, CollisionType, GameState, GameStatus, Snake},
};
use crate::scheduler::{IdleScheduler, TickScheduler};

/// Information about a tick that advanced the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set on the tick that ended the game
    pub collision: Option<CollisionType>,
}

/// Result of calling `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was already over, nothing changed
    Ignored,
    Advanced(StepInfo),
}

impl TickOutcome {
    /// True only for the tick on which the game ended
    pub fn ended_game(&self) -> bool {
        matches!(
            self,
            TickOutcome::Advanced(StepInfo {
                collision: Some(_),
                ..
            })
        )
    }
}

/// Authoritative state machine for one game session.
///
/// All mutation goes through `&mut self`, so `tick` and
/// `request_direction_change` can never interleave.
pub struct SnakeEngine<S = IdleScheduler, R = StdRng> {
    config: GameConfig,
    grid: Grid,
    state: GameState,
    pending_direction: Option<Direction>,
    scheduler: S,
    rng: R,
}

impl SnakeEngine {
    /// Engine with an idle scheduler; the caller invokes `tick` directly
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_scheduler(config, IdleScheduler::new())
    }
}

impl<S: TickScheduler> SnakeEngine<S, StdRng> {
    /// Food placement is seeded from the config when it carries a seed
    pub fn with_scheduler(config: GameConfig, scheduler: S) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_parts(config, scheduler, rng)
    }
}

impl<S: TickScheduler, R: Rng> SnakeEngine<S, R> {
    /// Build an engine around a caller-supplied scheduler and random source,
    /// and start the first game.
    pub fn with_parts(config: GameConfig, scheduler: S, rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid_size);
        let snake = Snake::new(grid.center(), Direction::Right, config.initial_snake_length);
        let state = GameState::new(snake, Direction::Right, grid.center(), grid.size());

        let mut engine = Self {
            config,
            grid,
            state,
            pending_direction: None,
            scheduler,
            rng,
        };
        engine.start_game();
        Ok(engine)
    }

    /// Replace the whole game state with a fresh game and (re)start the scheduler
    pub fn start_game(&mut self) {
        let snake = Snake::new(
            self.grid.center(),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let center = self.grid.center();
        self.state = GameState::new(snake, Direction::Right, center, self.grid.size());
        self.pending_direction = None;
        self.state.food = self.generate_food();

        // `start` drops any earlier registration before creating a new one
        self.scheduler.start(self.config.tick_interval());
        info!(
            "Game started on a {}x{} grid, food at ({}, {})",
            self.grid.size(),
            self.grid.size(),
            self.state.food.x,
            self.state.food.y
        );
    }

    /// Advance the snake by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.status == GameStatus::GameOver {
            return TickOutcome::Ignored;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.state.direction = direction;
        }

        let new_head = self.state.snake.head().moved_in_direction(self.state.direction);
        self.state.snake.push_head(new_head);

        let ate_food = new_head == self.state.food;
        if ate_food {
            self.state.score += 1;
            self.state.food = self.generate_food();
        } else {
            self.state.snake.pop_tail();
        }

        self.state.steps += 1;

        // Checked against the body after growth or tail removal
        let collision = self.check_collision(new_head);
        if let Some(collision_type) = collision {
            self.state.status = GameStatus::GameOver;
            self.state.collision = Some(collision_type);
            self.scheduler.stop();
            info!(
                "Game over ({:?}) at ({}, {}) with score {}",
                collision_type, new_head.x, new_head.y, self.state.score
            );
        } else {
            trace!(
                "Tick {}: head ({}, {}), length {}",
                self.state.steps,
                new_head.x,
                new_head.y,
                self.state.snake.len()
            );
        }

        TickOutcome::Advanced(StepInfo {
            ate_food,
            collision,
        })
    }

    /// Queue a heading for the next tick.
    ///
    /// Returns false when the request was ignored: the game is over, or the
    /// heading reverses the committed direction (the pending one if a turn
    /// is already queued, otherwise the one the snake is moving in).
    pub fn request_direction_change(&mut self, direction: Direction) -> bool {
        if self.state.status == GameStatus::GameOver {
            return false;
        }

        let committed = self.committed_direction();
        if committed.is_opposite(direction) {
            debug!(
                "Rejected turn to {:?} against committed {:?}",
                direction, committed
            );
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    /// Pick a random free cell for the food.
    ///
    /// Loops until a free cell is sampled, so it never returns on a grid the
    /// snake fills completely.
    pub fn generate_food(&mut self) -> Cell {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let cell = self.grid.random_cell(&mut self.rng);
            if !self.state.snake.occupies(cell) {
                debug!(
                    "Placed food at ({}, {}) after {} samples",
                    cell.x, cell.y, attempts
                );
                return cell;
            }
        }
    }

    fn check_collision(&self, head: Cell) -> Option<CollisionType> {
        if !self.grid.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Read-only view for renderers
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Heading the next tick will use
    pub fn committed_direction(&self) -> Direction {
        self.pending_direction.unwrap_or(self.state.direction)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}
