//! Per-frame simulation tick
//!
//! Advances a session by exactly one rendered frame. The order of the steps
//! is observable (collision is tested before the dequeue, loss before win)
//! and must not be rearranged.

use super::collision::{agent_hits_obstacle, agent_out_of_bounds};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Control impulse (click/tap) received since the previous frame
    pub impulse: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Terminal sessions are frozen until a new one is allocated
    if state.is_terminal() {
        return;
    }

    state.time_ticks += 1;

    if input.impulse {
        state.agent.apply_impulse();
        state.events.push(GameEvent::Flapped);
    }

    state.agent.fall();

    for obstacle in state.obstacles.iter_mut() {
        obstacle.x -= OBSTACLE_SPEED;
    }

    let collided = state
        .obstacles
        .iter()
        .any(|obstacle| agent_hits_obstacle(&state.agent, obstacle));

    // Front obstacle is off-screen: recycle it and award the point
    if state.obstacles.front().is_some_and(|front| front.x < DEQUEUE_X) {
        state.obstacles.pop_front();
        state.spawn_obstacle();
        state.score += 1;
        state.events.push(GameEvent::ObstaclePassed { score: state.score });
    }

    if collided || agent_out_of_bounds(&state.agent, &state.playfield) {
        state.phase = GamePhase::Lost;
        state.events.push(GameEvent::Lost { score: state.score });
        return;
    }

    if state.score == WIN_SCORE {
        state.phase = GamePhase::Won;
        state.events.push(GameEvent::Won { score: state.score });
    }
}
