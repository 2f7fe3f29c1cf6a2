//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (`requestAnimationFrame` on web)
//! - Input events (click/touch → control impulse)
//! - Modal layout per session phase
//! - Session seeding from the host clock

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::session::SessionPhase;

/// Which parts of the game modal are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub canvas: bool,
    pub controls: bool,
    pub end_video: bool,
}

impl Screen {
    /// Layout for a session phase, applied by the host on every phase change
    pub fn for_phase(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::NotStarted | SessionPhase::Running | SessionPhase::WinDisplay { .. } => {
                Self {
                    canvas: true,
                    controls: false,
                    end_video: false,
                }
            }
            SessionPhase::LossDisplay { .. } => Self {
                canvas: false,
                controls: false,
                end_video: true,
            },
            SessionPhase::PostGame => Self {
                canvas: true,
                controls: true,
                end_video: false,
            },
        }
    }
}

/// Derive a session seed from a millisecond clock reading
///
/// Restarts a few milliseconds apart still get well-separated seeds
/// (SplitMix64 finalizer).
pub fn seed_from_clock(epoch_ms: f64) -> u64 {
    let mut z = (epoch_ms * 1000.0) as u64;
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_loss_display_hides_canvas() {
        let phases = [
            SessionPhase::NotStarted,
            SessionPhase::Running,
            SessionPhase::WinDisplay { since_ms: 0.0 },
            SessionPhase::PostGame,
        ];
        for phase in phases {
            let screen = Screen::for_phase(phase);
            assert!(screen.canvas, "{phase:?}");
            assert!(!screen.end_video, "{phase:?}");
        }

        let loss = Screen::for_phase(SessionPhase::LossDisplay { since_ms: 0.0 });
        assert!(!loss.canvas);
        assert!(loss.end_video);
    }

    #[test]
    fn test_restart_from_interrupted_loss_shows_canvas() {
        use crate::outcome::NullReporter;
        use crate::session::{FrameStep, SessionController};
        use crate::sim::Playfield;

        let mut ctl = SessionController::new(NullReporter, Playfield::default());
        let token = ctl.start_session(1);
        while ctl.advance_frame(token, 0.0) == FrameStep::Continue {}
        assert!(!Screen::for_phase(ctl.phase()).canvas);

        // Closed mid-display: the post-game timer never fires
        ctl.stop();
        assert!(Screen::for_phase(ctl.phase()).canvas);

        ctl.start_session(2);
        let screen = Screen::for_phase(ctl.phase());
        assert!(screen.canvas);
        assert!(!screen.controls);
        assert!(!screen.end_video);
    }

    #[test]
    fn test_post_game_shows_controls() {
        let screen = Screen::for_phase(SessionPhase::PostGame);
        assert!(screen.canvas);
        assert!(screen.controls);
    }

    #[test]
    fn test_seed_is_stable_per_reading() {
        assert_eq!(seed_from_clock(1_700_000_000_000.0), seed_from_clock(1_700_000_000_000.0));
    }

    #[test]
    fn test_nearby_readings_diverge() {
        let a = seed_from_clock(1_700_000_000_000.0);
        let b = seed_from_clock(1_700_000_000_001.0);
        assert_ne!(a, b);
        assert!((a ^ b).count_ones() > 8);
    }
}
