//! Game state and core simulation types
//!
//! Everything one session owns lives here. A new session always gets a
//! freshly allocated `GameState`; nothing is carried over from the last run.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Outcome phase of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Agent collided or left the playfield
    Lost,
    /// Score reached `WIN_SCORE`
    Won,
}

impl GamePhase {
    /// Terminal phases never transition back to `Running`
    pub fn is_terminal(self) -> bool {
        !matches!(self, GamePhase::Running)
    }
}

/// Things that happened during a tick, drained by the session controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Control impulse applied
    Flapped,
    /// Front obstacle dequeued; carries the new score
    ObstaclePassed { score: u32 },
    /// Loss path entered
    Lost { score: u32 },
    /// Win path entered
    Won { score: u32 },
}

/// Visible surface the simulation runs inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            pos: Vec2::new(AGENT_START_X, AGENT_START_Y),
            vel_y: 0.0,
            width: AGENT_SIZE,
            height: AGENT_SIZE,
        }
    }
}

impl Agent {
    /// Apply gravity, then integrate velocity into position
    pub fn fall(&mut self) {
        self.vel_y += GRAVITY;
        self.pos.y += self.vel_y;
    }

    /// Override the current velocity with the upward impulse
    pub fn apply_impulse(&mut self) {
        self.vel_y = IMPULSE_VELOCITY;
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }
}

/// A top/bottom boundary pair with a gap the agent must pass through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Lower edge of the upper column
    pub top: f32,
    /// Upper edge of the lower column (`top + OBSTACLE_GAP`)
    pub bottom: f32,
    pub width: f32,
}

impl Obstacle {
    /// Obstacle with the fixed gap and width at the given position
    pub fn new(x: f32, top: f32) -> Self {
        Self {
            x,
            top,
            bottom: top + OBSTACLE_GAP,
            width: OBSTACLE_WIDTH,
        }
    }

    /// Spawn at the right edge of the playfield with a random gap position
    pub fn spawn(rng: &mut Pcg32, playfield: &Playfield) -> Self {
        let top = rng.random_range(OBSTACLE_TOP_MIN..OBSTACLE_TOP_MIN + OBSTACLE_TOP_SPAN);
        Self::new(playfield.width, top)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub playfield: Playfield,
    pub agent: Agent,
    /// Front = nearest to the agent
    pub obstacles: VecDeque<Obstacle>,
    pub score: u32,
    pub phase: GamePhase,
    /// Frames simulated so far
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session: agent at its start, one obstacle queued
    pub fn new(seed: u64, playfield: Playfield) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            playfield,
            agent: Agent::default(),
            obstacles: VecDeque::with_capacity(2),
            score: 0,
            phase: GamePhase::Running,
            time_ticks: 0,
            events: Vec::new(),
        };

        state.spawn_obstacle();
        state
    }

    /// Enqueue a freshly generated obstacle at the back of the queue
    pub fn spawn_obstacle(&mut self) {
        let obstacle = Obstacle::spawn(&mut self.rng, &self.playfield);
        self.obstacles.push_back(obstacle);
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Take all buffered events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
