//! candytui engine: an 8×8 match-three board with swap, clear, gravity and cascade phases.
//!
//! [`game::GameState`] is the entry point. A front end calls
//! [`activate_cell`](game::GameState::activate_cell) for player gestures,
//! [`tick`](game::GameState::tick) once per frame, and reads token visuals to draw.

pub mod anim;
pub mod config;
pub mod game;
pub mod gravity;
pub mod grid;
pub mod matcher;

pub use config::{ConfigError, GameConfig};
pub use game::{GameState, Phase, Stats, TokenVisual};
pub use grid::{GRID_SIZE, Position};
