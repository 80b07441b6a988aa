use crate::game::{Cell, Direction, GameState, Grid};

/// Greedy steering toward the food.
///
/// Looks one move ahead only: among the moves that do not end the game on the
/// next tick, take the one closest to the food by Manhattan distance, keeping
/// the current heading on ties.
#[derive(Debug, Default, Clone, Copy)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    pub fn choose(&self, state: &GameState, grid: Grid) -> Direction {
        let current = state.direction;

        let candidates = std::iter::once(current).chain(
            Direction::ALL
                .into_iter()
                .filter(|d| *d != current && !current.is_opposite(*d)),
        );

        candidates
            .filter(|d| self.is_safe(state, grid, *d))
            .min_by_key(|d| {
                state
                    .snake
                    .head()
                    .moved_in_direction(*d)
                    .manhattan_distance(state.food)
            })
            .unwrap_or(current)
    }

    /// Would moving this way survive the next tick?
    pub fn is_safe(&self, state: &GameState, grid: Grid, direction: Direction) -> bool {
        let next = state.snake.head().moved_in_direction(direction);
        if !grid.is_in_bounds(next) {
            return false;
        }

        // The tail moves out of the way unless this move eats
        let body = &state.snake.body;
        let remaining: &[Cell] = if next == state.food {
            body
        } else {
            &body[..body.len() - 1]
        };

        !remaining.contains(&next)
    }
}
