//! Draw command generation for 2D primitives

use super::FrameView;
use crate::session::SessionPhase;

/// CSS color string
pub type Color = &'static str;

pub const OBSTACLE_COLOR: Color = "#ff4e88";
pub const AGENT_FALLBACK_COLOR: Color = "#e63946";
pub const HUD_COLOR: Color = "#000";
pub const WIN_OVERLAY_COLOR: Color = "rgba(255,78,136,0.9)";
pub const WIN_TEXT_COLOR: Color = "#fff";

pub const HUD_FONT: &str = "20px Poppins";
pub const WIN_FONT: &str = "24px Poppins";

/// One primitive for the drawing surface, in playfield pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface
    Clear { width: f32, height: f32 },
    /// Solid rectangle
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    /// Agent sprite (hosts fall back to a solid box until the image loads)
    Agent { x: f32, y: f32, w: f32, h: f32 },
    /// Left-aligned text at a baseline
    Text {
        text: String,
        x: f32,
        y: f32,
        font: &'static str,
        color: Color,
    },
}

/// Build the full command list for one frame
pub fn build_frame(view: &FrameView<'_>) -> Vec<DrawCommand> {
    let field = view.playfield;
    let mut commands = Vec::with_capacity(4 + view.obstacles.len() * 2);

    commands.push(DrawCommand::Clear {
        width: field.width,
        height: field.height,
    });

    let agent = view.agent;
    commands.push(DrawCommand::Agent {
        x: agent.pos.x,
        y: agent.pos.y,
        w: agent.width,
        h: agent.height,
    });

    for obstacle in view.obstacles {
        // Upper column
        commands.push(DrawCommand::Rect {
            x: obstacle.x,
            y: 0.0,
            w: obstacle.width,
            h: obstacle.top,
            color: OBSTACLE_COLOR,
        });
        // Lower column
        commands.push(DrawCommand::Rect {
            x: obstacle.x,
            y: obstacle.bottom,
            w: obstacle.width,
            h: (field.height - obstacle.bottom).max(0.0),
            color: OBSTACLE_COLOR,
        });
    }

    commands.push(DrawCommand::Text {
        text: format!("Score: {}", view.score),
        x: 10.0,
        y: 25.0,
        font: HUD_FONT,
        color: HUD_COLOR,
    });

    if matches!(view.phase, SessionPhase::WinDisplay { .. }) {
        commands.extend(win_overlay(view));
    }

    commands
}

/// Celebration drawn over the last frame of a won session
fn win_overlay(view: &FrameView<'_>) -> [DrawCommand; 3] {
    [
        DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            w: view.playfield.width,
            h: view.playfield.height,
            color: WIN_OVERLAY_COLOR,
        },
        DrawCommand::Text {
            text: "You Won My Heart 💖".to_string(),
            x: 60.0,
            y: 220.0,
            font: WIN_FONT,
            color: WIN_TEXT_COLOR,
        },
        DrawCommand::Text {
            text: format!("Perfect Score: {}", view.score),
            x: 95.0,
            y: 260.0,
            font: WIN_FONT,
            color: WIN_TEXT_COLOR,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Agent, Obstacle, Playfield};
    use std::collections::VecDeque;

    fn view_with<'a>(
        agent: &'a Agent,
        obstacles: &'a VecDeque<Obstacle>,
        phase: SessionPhase,
    ) -> FrameView<'a> {
        FrameView {
            agent,
            obstacles,
            score: 10,
            playfield: Playfield::new(400.0, 400.0),
            phase,
        }
    }

    #[test]
    fn test_obstacle_becomes_two_columns() {
        let agent = Agent::default();
        let obstacles = VecDeque::from([Obstacle::new(120.0, 50.0)]);
        let commands = build_frame(&view_with(&agent, &obstacles, SessionPhase::Running));

        let rects: Vec<_> = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(
            rects[0],
            &DrawCommand::Rect {
                x: 120.0,
                y: 0.0,
                w: 75.0,
                h: 50.0,
                color: OBSTACLE_COLOR
            }
        );
        assert_eq!(
            rects[1],
            &DrawCommand::Rect {
                x: 120.0,
                y: 220.0,
                w: 75.0,
                h: 180.0,
                color: OBSTACLE_COLOR
            }
        );
    }

    #[test]
    fn test_frame_starts_with_clear_and_shows_score() {
        let agent = Agent::default();
        let obstacles = VecDeque::new();
        let commands = build_frame(&view_with(&agent, &obstacles, SessionPhase::Running));

        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "Score: 10"
        )));
    }

    #[test]
    fn test_win_overlay_only_while_celebrating() {
        let agent = Agent::default();
        let obstacles = VecDeque::new();
        let has_overlay = |phase| {
            build_frame(&view_with(&agent, &obstacles, phase))
                .iter()
                .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "Perfect Score: 10"))
        };

        assert!(has_overlay(SessionPhase::WinDisplay { since_ms: 0.0 }));
        assert!(!has_overlay(SessionPhase::LossDisplay { since_ms: 0.0 }));
        assert!(!has_overlay(SessionPhase::Running));
    }
}
