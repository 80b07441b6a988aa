use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighbouring cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// The snake body, head at index 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub body: Vec<Cell>,
}

impl Snake {
    /// Lay out a straight snake with its head at `head`, trailing away from `heading`
    pub fn new(head: Cell, heading: Direction, length: usize) -> Self {
        let (dx, dy) = heading.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(dx * i, dy * i))
            .collect();

        Self { body }
    }

    /// Build a snake from explicit cells, head first
    pub fn from_cells(body: Vec<Cell>) -> Self {
        Self { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Body segments behind the head
    pub fn body_segments(&self) -> &[Cell] {
        &self.body[1..]
    }

    /// Check if a cell is one of the segments behind the head
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.body_segments().contains(&cell)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Push a new head. The caller decides whether the tail goes.
    pub fn push_head(&mut self, cell: Cell) {
        self.body.insert(0, cell);
    }

    pub fn pop_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 {
            self.body.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a snake built through `new`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Whether the session is still advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// What ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Head left the grid
    Wall,
    /// Head landed on its own body
    SelfCollision,
}

/// Snapshot of one game session, owned by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub steps: u32,
    pub status: GameStatus,
    pub collision: Option<CollisionType>,
    pub grid_size: usize,
}

impl GameState {
    pub fn new(snake: Snake, direction: Direction, food: Cell, grid_size: usize) -> Self {
        Self {
            snake,
            direction,
            food,
            score: 0,
            steps: 0,
            status: GameStatus::Running,
            collision: None,
            grid_size,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
