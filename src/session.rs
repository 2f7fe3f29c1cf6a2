//! Session controller
//!
//! Owns the single active session and the identity of its update cycle.
//! Hosts call `start_session`, forward input through `apply_control_impulse`,
//! and drive `advance_frame` once per rendering opportunity with the token
//! they were handed. A token from a cancelled cycle is ignored, so a stale
//! frame callback can never touch a newer session.

use crate::consts::*;
use crate::outcome::{OutcomeRecord, OutcomeReporter};
use crate::renderer::FrameView;
use crate::sim::{GameEvent, GameState, Playfield, TickInput, tick};

/// Identity of one update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// Schedule the next frame with the same token
    Continue,
    /// Do not reschedule (terminal, stopped or stale)
    Halt,
}

/// Screen-level state machine
///
/// `NotStarted -> Running -> {WinDisplay, LossDisplay} -> PostGame`, and
/// `PostGame -> Running` only through `start_session`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    /// Celebration shown since the given host time (ms)
    WinDisplay { since_ms: f64 },
    /// Loss visual shown since the given host time (ms)
    LossDisplay { since_ms: f64 },
    /// Restart controls visible
    PostGame,
}

impl SessionPhase {
    /// Display duration before the post-game state, if displaying
    fn display(&self) -> Option<(f64, f64)> {
        match *self {
            SessionPhase::WinDisplay { since_ms } => Some((since_ms, WIN_DISPLAY_MS)),
            SessionPhase::LossDisplay { since_ms } => Some((since_ms, LOSS_DISPLAY_MS)),
            _ => None,
        }
    }
}

/// Controller for the one active game session
pub struct SessionController<R: OutcomeReporter> {
    reporter: R,
    playfield: Playfield,
    state: Option<GameState>,
    phase: SessionPhase,
    /// Impulse received since the last frame
    pending_impulse: bool,
    /// Bumped on every start/stop; identifies the live cycle
    generation: u64,
}

impl<R: OutcomeReporter> SessionController<R> {
    pub fn new(reporter: R, playfield: Playfield) -> Self {
        Self {
            reporter,
            playfield,
            state: None,
            phase: SessionPhase::NotStarted,
            pending_impulse: false,
            generation: 0,
        }
    }

    /// Cancel any running cycle and allocate a fresh session
    pub fn start_session(&mut self, seed: u64) -> FrameToken {
        self.generation += 1;
        self.state = Some(GameState::new(seed, self.playfield));
        self.phase = SessionPhase::Running;
        self.pending_impulse = false;
        log::info!("Session {} started (seed {})", self.generation, seed);
        FrameToken(self.generation)
    }

    /// Cancel the pending frame and discard the session
    pub fn stop(&mut self) {
        self.generation += 1;
        self.state = None;
        self.phase = SessionPhase::NotStarted;
        self.pending_impulse = false;
    }

    /// Queue an upward impulse for the next frame; no-op unless a session
    /// is running
    pub fn apply_control_impulse(&mut self) {
        if self.phase == SessionPhase::Running
            && self.state.as_ref().is_some_and(|s| !s.is_terminal())
        {
            self.pending_impulse = true;
        }
    }

    /// Advance the session by one frame
    ///
    /// `now_ms` is the host clock, used to time the win/loss display.
    pub fn advance_frame(&mut self, token: FrameToken, now_ms: f64) -> FrameStep {
        if !self.is_current(token) || self.phase != SessionPhase::Running {
            return FrameStep::Halt;
        }
        let Some(state) = self.state.as_mut() else {
            return FrameStep::Halt;
        };

        let input = TickInput {
            impulse: std::mem::take(&mut self.pending_impulse),
        };
        tick(state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::Won { score } => {
                    log::info!("Session won with score {}", score);
                    self.reporter.submit(OutcomeRecord { score });
                    self.phase = SessionPhase::WinDisplay { since_ms: now_ms };
                }
                GameEvent::Lost { score } => {
                    log::info!("Session lost with score {}", score);
                    self.phase = SessionPhase::LossDisplay { since_ms: now_ms };
                }
                GameEvent::ObstaclePassed { score } => log::debug!("Score {}", score),
                GameEvent::Flapped => log::trace!("Flap"),
            }
        }

        if self.phase == SessionPhase::Running {
            FrameStep::Continue
        } else {
            FrameStep::Halt
        }
    }

    /// Milliseconds left in the win/loss display, if one is showing
    pub fn display_remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.phase
            .display()
            .map(|(since, duration)| (since + duration - now_ms).max(0.0))
    }

    /// Move from the win/loss display to the post-game state once its delay
    /// has elapsed. Returns true when the transition happened.
    pub fn update_display(&mut self, token: FrameToken, now_ms: f64) -> bool {
        if !self.is_current(token) {
            return false;
        }
        match self.display_remaining_ms(now_ms) {
            Some(remaining) if remaining <= 0.0 => {
                self.phase = SessionPhase::PostGame;
                true
            }
            _ => false,
        }
    }

    pub fn is_current(&self, token: FrameToken) -> bool {
        token.0 == self.generation
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.score)
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Resize the playfield used by the next session
    pub fn set_playfield(&mut self, playfield: Playfield) {
        self.playfield = playfield;
    }

    /// Snapshot for the render callback
    pub fn view(&self) -> Option<FrameView<'_>> {
        self.state.as_ref().map(|state| FrameView {
            agent: &state.agent,
            obstacles: &state.obstacles,
            score: state.score,
            playfield: state.playfield,
            phase: self.phase,
        })
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use std::cell::RefCell;

    /// Records every submission
    #[derive(Default)]
    struct RecordingReporter {
        submitted: RefCell<Vec<OutcomeRecord>>,
    }

    impl OutcomeReporter for RecordingReporter {
        fn submit(&self, record: OutcomeRecord) {
            self.submitted.borrow_mut().push(record);
        }
    }

    /// Simulates a backend that is down
    struct FailingReporter;

    impl OutcomeReporter for FailingReporter {
        fn submit(&self, _record: OutcomeRecord) {
            log::debug!("network unreachable");
        }
    }

    fn controller() -> SessionController<RecordingReporter> {
        SessionController::new(RecordingReporter::default(), Playfield::default())
    }

    /// Put the running session one dequeue away from the winning point
    fn prime_win<R: OutcomeReporter>(ctl: &mut SessionController<R>) {
        let state = ctl.state.as_mut().unwrap();
        state.score = WIN_SCORE - 1;
        state.obstacles[0].x = DEQUEUE_X + 1.0;
    }

    #[test]
    fn test_start_session_allocates_fresh_state() {
        let mut ctl = controller();
        assert_eq!(ctl.phase(), SessionPhase::NotStarted);
        assert!(ctl.view().is_none());

        ctl.start_session(1);

        assert_eq!(ctl.phase(), SessionPhase::Running);
        let state = ctl.state().unwrap();
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_impulse_without_session_is_noop() {
        let mut ctl = controller();
        ctl.apply_control_impulse();
        assert!(ctl.state().is_none());
        assert_eq!(ctl.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_impulse_applies_on_next_frame() {
        let mut ctl = controller();
        let token = ctl.start_session(1);
        ctl.advance_frame(token, 0.0);

        ctl.apply_control_impulse();
        assert_eq!(ctl.state().unwrap().agent.vel_y, GRAVITY);

        ctl.advance_frame(token, 16.0);
        assert_eq!(ctl.state().unwrap().agent.vel_y, IMPULSE_VELOCITY + GRAVITY);

        // Consumed by that frame
        ctl.advance_frame(token, 32.0);
        let vel_y = ctl.state().unwrap().agent.vel_y;
        assert!((vel_y - (IMPULSE_VELOCITY + 2.0 * GRAVITY)).abs() < 1e-5);
    }

    #[test]
    fn test_impulse_before_start_is_dropped() {
        let mut ctl = controller();
        ctl.apply_control_impulse();
        let token = ctl.start_session(1);

        ctl.advance_frame(token, 0.0);

        assert_eq!(ctl.state().unwrap().agent.vel_y, GRAVITY);
    }

    #[test]
    fn test_impulse_pending_across_restart_is_dropped() {
        let mut ctl = controller();
        ctl.start_session(1);
        ctl.apply_control_impulse();
        let token = ctl.start_session(2);

        ctl.advance_frame(token, 0.0);

        assert_eq!(ctl.state().unwrap().agent.vel_y, GRAVITY);
    }

    #[test]
    fn test_steady_play_reaches_win_by_dequeue_scoring() {
        for seed in 0..20 {
            let mut ctl = controller();
            let token = ctl.start_session(seed);
            let mut frames = 0;

            loop {
                let state = ctl.state().unwrap();
                let gap_top = state.obstacles.front().unwrap().top;
                if state.agent.bottom() > gap_top + 100.0 && state.agent.vel_y > -1.0 {
                    ctl.apply_control_impulse();
                }
                frames += 1;
                if ctl.advance_frame(token, frames as f64 * 16.0) == FrameStep::Halt {
                    break;
                }
                assert!(frames < 10_000, "seed {seed} never finished");
            }

            assert!(
                matches!(ctl.phase(), SessionPhase::WinDisplay { .. }),
                "seed {seed} ended in {:?} with score {}",
                ctl.phase(),
                ctl.score()
            );
            assert_eq!(ctl.score(), WIN_SCORE);
            assert_eq!(
                *ctl.reporter().submitted.borrow(),
                vec![OutcomeRecord { score: WIN_SCORE }]
            );
        }
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut ctl = controller();
        let old = ctl.start_session(1);
        let new = ctl.start_session(2);

        assert_eq!(ctl.advance_frame(old, 0.0), FrameStep::Halt);
        assert_eq!(ctl.state().unwrap().time_ticks, 0);

        assert_eq!(ctl.advance_frame(new, 0.0), FrameStep::Continue);
        assert_eq!(ctl.state().unwrap().time_ticks, 1);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut ctl = controller();
        let token = ctl.start_session(1);
        ctl.stop();

        assert_eq!(ctl.advance_frame(token, 0.0), FrameStep::Halt);
        assert_eq!(ctl.phase(), SessionPhase::NotStarted);
        assert!(ctl.state().is_none());
    }

    #[test]
    fn test_free_fall_triggers_loss_once() {
        let mut ctl = controller();
        let token = ctl.start_session(3);
        let mut continued = 0;

        for frame in 0..500 {
            match ctl.advance_frame(token, frame as f64 * 16.0) {
                FrameStep::Continue => continued += 1,
                FrameStep::Halt => break,
            }
        }

        assert!(continued < 500);
        assert!(matches!(ctl.phase(), SessionPhase::LossDisplay { .. }));
        assert!(ctl.state().unwrap().agent.pos.y > 400.0);
        assert!(ctl.reporter().submitted.borrow().is_empty());
        assert_eq!(ctl.advance_frame(token, 9000.0), FrameStep::Halt);
    }

    #[test]
    fn test_win_submits_exactly_once() {
        let mut ctl = controller();
        let token = ctl.start_session(4);
        prime_win(&mut ctl);

        assert_eq!(ctl.advance_frame(token, 100.0), FrameStep::Halt);
        assert_eq!(ctl.phase(), SessionPhase::WinDisplay { since_ms: 100.0 });

        for i in 0..10 {
            ctl.advance_frame(token, 200.0 + i as f64);
            ctl.apply_control_impulse();
        }

        assert_eq!(
            *ctl.reporter().submitted.borrow(),
            vec![OutcomeRecord { score: WIN_SCORE }]
        );
        assert!(matches!(ctl.phase(), SessionPhase::WinDisplay { .. }));
    }

    #[test]
    fn test_display_transitions_to_post_game_after_delay() {
        let mut ctl = controller();
        let token = ctl.start_session(5);
        prime_win(&mut ctl);
        ctl.advance_frame(token, 1000.0);

        assert_eq!(ctl.display_remaining_ms(1500.0), Some(WIN_DISPLAY_MS - 500.0));
        assert!(!ctl.update_display(token, 1500.0));
        assert!(ctl.update_display(token, 1000.0 + WIN_DISPLAY_MS));
        assert_eq!(ctl.phase(), SessionPhase::PostGame);
        assert_eq!(ctl.display_remaining_ms(5000.0), None);

        // PostGame never resumes on its own
        assert_eq!(ctl.advance_frame(token, 5000.0), FrameStep::Halt);
        assert_eq!(ctl.phase(), SessionPhase::PostGame);
    }

    #[test]
    fn test_stale_display_timer_is_ignored() {
        let mut ctl = controller();
        let old = ctl.start_session(6);
        while ctl.advance_frame(old, 0.0) == FrameStep::Continue {}

        ctl.start_session(7);

        assert!(!ctl.update_display(old, 10_000.0));
        assert_eq!(ctl.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_restart_after_loss_resets_session() {
        let mut ctl = controller();
        let token = ctl.start_session(8);
        ctl.state.as_mut().unwrap().score = 4;
        while ctl.advance_frame(token, 0.0) == FrameStep::Continue {}
        ctl.update_display(token, LOSS_DISPLAY_MS);
        assert_eq!(ctl.phase(), SessionPhase::PostGame);

        let token = ctl.start_session(9);

        assert_eq!(ctl.phase(), SessionPhase::Running);
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.state().unwrap().obstacles.len(), 1);
        assert_eq!(ctl.advance_frame(token, 0.0), FrameStep::Continue);
    }

    #[test]
    fn test_reporter_failure_does_not_block_transitions() {
        let mut ctl = SessionController::new(FailingReporter, Playfield::default());
        let token = ctl.start_session(10);
        prime_win(&mut ctl);

        assert_eq!(ctl.advance_frame(token, 0.0), FrameStep::Halt);
        assert!(ctl.update_display(token, WIN_DISPLAY_MS));
        assert_eq!(ctl.phase(), SessionPhase::PostGame);
    }
}
