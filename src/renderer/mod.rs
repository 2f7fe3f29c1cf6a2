//! Rendering boundary
//!
//! The simulation never draws. Each frame the host takes a [`FrameView`] from
//! the session controller and hands it to a [`Renderer`]. `shapes` turns a
//! view into plain draw commands so the layout can be checked without a
//! display surface; `canvas` replays them on a 2D canvas in the browser.

use std::collections::VecDeque;

use crate::session::SessionPhase;
use crate::sim::{Agent, Obstacle, Playfield};

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{Color, DrawCommand, build_frame};

/// Read-only snapshot of a session for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub agent: &'a Agent,
    pub obstacles: &'a VecDeque<Obstacle>,
    pub score: u32,
    pub playfield: Playfield,
    pub phase: SessionPhase,
}

/// Per-frame render callback
pub trait Renderer {
    fn draw(&mut self, view: &FrameView<'_>);
}
