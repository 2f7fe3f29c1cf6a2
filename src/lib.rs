//! Valentine - a romantic single page with a tiny record backend
//!
//! Core modules:
//! - `sim`: Deterministic Flappy Love simulation (physics, collisions, scoring)
//! - `session`: Session controller (update cycle identity, win/loss display, outcome)
//! - `outcome`: Fire-and-forget outcome reporting
//! - `renderer`: Render boundary between the simulation and a drawing surface
//! - `platform`: Browser host (canvas, input, frame scheduling)
//! - `persistence`: SQLite record store (native only)
//! - `api`: HTTP record API (native only)
//! - `config`: Server configuration (native only)

pub mod outcome;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

#[cfg(not(target_arch = "wasm32"))]
pub mod api;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod persistence;

pub use outcome::{OutcomeRecord, OutcomeReporter};
pub use session::{FrameStep, FrameToken, SessionController, SessionPhase};
pub use sim::{GameState, Playfield};

/// Game configuration constants
///
/// Every value is expressed per rendered frame, the same unit the update
/// cycle advances in.
pub mod consts {
    /// Default playfield dimensions (canvas pixels)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 400.0;

    /// Agent start position and bounding box
    pub const AGENT_START_X: f32 = 60.0;
    pub const AGENT_START_Y: f32 = 200.0;
    pub const AGENT_SIZE: f32 = 40.0;

    /// Downward acceleration added to the agent velocity every frame
    pub const GRAVITY: f32 = 0.6;
    /// Velocity set by a control impulse (negative = upward)
    pub const IMPULSE_VELOCITY: f32 = -8.0;

    /// Obstacle geometry
    pub const OBSTACLE_WIDTH: f32 = 75.0;
    pub const OBSTACLE_GAP: f32 = 170.0;
    /// Top boundary is drawn from [MIN, MIN + SPAN)
    pub const OBSTACLE_TOP_MIN: f32 = 30.0;
    pub const OBSTACLE_TOP_SPAN: f32 = 200.0;
    /// Horizontal distance an obstacle travels per frame
    pub const OBSTACLE_SPEED: f32 = 2.0;
    /// Front obstacle is dequeued once its x drops below this
    pub const DEQUEUE_X: f32 = -50.0;

    /// Score that wins the session
    pub const WIN_SCORE: u32 = 10;

    /// How long the win/loss display lasts before the post-game controls (ms)
    pub const WIN_DISPLAY_MS: f64 = 2000.0;
    pub const LOSS_DISPLAY_MS: f64 = 2000.0;
}
