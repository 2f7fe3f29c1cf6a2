//! Collision detection for axis-aligned boxes against gap obstacles
//!
//! The agent is a box; an obstacle is two columns sharing an x-span with a
//! gap between `top` and `bottom`. Anything of the box outside the gap while
//! the spans overlap is a hit.

use super::state::{Agent, Obstacle, Playfield};

/// Whether the agent and obstacle overlap on the x axis
pub fn overlaps_horizontally(agent: &Agent, obstacle: &Obstacle) -> bool {
    agent.left() < obstacle.right() && agent.right() > obstacle.x
}

/// Whether any part of the agent is outside the obstacle's gap
pub fn in_forbidden_zone(agent: &Agent, obstacle: &Obstacle) -> bool {
    agent.top() < obstacle.top || agent.bottom() > obstacle.bottom
}

/// Check collision between the agent and one obstacle
pub fn agent_hits_obstacle(agent: &Agent, obstacle: &Obstacle) -> bool {
    overlaps_horizontally(agent, obstacle) && in_forbidden_zone(agent, obstacle)
}

/// Agent vertical position left the visible playfield (above top or below bottom)
pub fn agent_out_of_bounds(agent: &Agent, playfield: &Playfield) -> bool {
    agent.pos.y < 0.0 || agent.pos.y > playfield.height
}
