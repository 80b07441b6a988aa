//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end and the autopilot both drive it through the same two
//! entry points, `tick` and `request_direction_change`.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{SnakeEngine, StepInfo, TickOutcome};
pub use grid::Grid;
pub use state::{Cell, CollisionType, GameState, GameStatus, Snake};
