//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per rendered frame, fixed per-frame constants
//! - Seeded RNG only
//! - No rendering, network or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{agent_hits_obstacle, agent_out_of_bounds};
pub use state::{Agent, GameEvent, GamePhase, GameState, Obstacle, Playfield};
pub use tick::{TickInput, tick};
