//! Grid Snake - a tick-driven snake simulation
//!
//! This library provides:
//! - Core game logic: grid, snake engine, direction validation (game module)
//! - Tick sources the engine starts and stops (scheduler module)
//! - Keyboard mapping and TUI rendering (input and render modules)
//! - Terminal front ends for keyboard and autopilot play (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scheduler;
