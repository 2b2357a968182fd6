//! Fixed-step game loop driver
//!
//! The host calls `frame` once per display refresh with the real time since
//! the previous call. Elapsed time is banked in an accumulator and paid out
//! as whole `TICK_MS` ticks, so simulation speed does not depend on the
//! display rate.

use super::collision::CollisionEvent;
use super::session::SessionState;
use super::state::GameState;
use super::tick::tick;
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, TICK_MS};
use crate::input::InputState;

/// What one host frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub ticks: u32,
    pub events: Vec<CollisionEvent>,
    /// Session state after the frame
    pub state: Option<SessionState>,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    accumulator: f64,
    running: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop ticking. Safe to call any number of times; banked time is dropped
    /// so a resume does not replay the gap.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Scheduler stopped");
        }
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn resume(&mut self) {
        if !self.running {
            log::debug!("Scheduler resumed");
        }
        self.running = true;
        self.accumulator = 0.0;
    }

    /// Run as many ticks as `real_dt_ms` pays for.
    ///
    /// Edges are handed to the first tick only; later substeps see held keys.
    /// Frames longer than `MAX_FRAME_MS` are clamped, and at most
    /// `MAX_SUBSTEPS` ticks run per frame.
    pub fn frame(
        &mut self,
        state: &mut GameState,
        input: &mut InputState,
        real_dt_ms: f64,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.running {
            report.state = Some(state.session.state);
            return report;
        }

        self.accumulator += real_dt_ms.clamp(0.0, MAX_FRAME_MS);

        // Menus and pauses still need one tick per frame to see start/pause
        // edges; those ticks never touch the world.
        if state.session.state != SessionState::Running {
            report.events = tick(state, &input.tick_input());
            report.ticks = 1;
            self.accumulator = 0.0;
            report.state = Some(state.session.state);
            return report;
        }

        while self.accumulator >= TICK_MS && report.ticks < MAX_SUBSTEPS {
            let tick_input = input.tick_input();
            report.events.extend(tick(state, &tick_input));
            self.accumulator -= TICK_MS;
            report.ticks += 1;
            if state.session.state != SessionState::Running {
                self.accumulator = 0.0;
                break;
            }
        }
        if report.ticks == MAX_SUBSTEPS {
            // Fell behind; drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(TICK_MS);
        }
        report.state = Some(state.session.state);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games;
    use crate::input::Action;

    fn started(mut config: crate::config::GameConfig) -> (GameState, InputState, Scheduler) {
        config.spawns.clear();
        config.goal = None;
        let mut state = GameState::new(config, 1).unwrap();
        let mut input = InputState::new();
        let mut scheduler = Scheduler::new();
        input.press(Action::Primary);
        scheduler.frame(&mut state, &mut input, TICK_MS);
        input.release(Action::Primary);
        assert_eq!(state.session.state, SessionState::Running);
        (state, input, scheduler)
    }

    #[test]
    fn test_ticks_follow_real_time() {
        let (mut state, mut input, mut scheduler) = started(games::shooter::config());
        let mut ticks = 0;
        // Two seconds of 144 Hz frames
        for _ in 0..288 {
            ticks += scheduler.frame(&mut state, &mut input, 1000.0 / 144.0).ticks;
        }
        assert!((119..=121).contains(&ticks), "got {ticks} ticks");
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let (mut state, mut input, mut scheduler) = started(games::shooter::config());
        let report = scheduler.frame(&mut state, &mut input, 5000.0);
        assert!(report.ticks <= MAX_SUBSTEPS);
        assert!(report.ticks as f64 <= MAX_FRAME_MS / TICK_MS + 1.0);
    }

    #[test]
    fn test_stop_is_idempotent_and_freezes_state() {
        let (mut state, mut input, mut scheduler) = started(games::platformer::config());
        scheduler.frame(&mut state, &mut input, 50.0);
        let before = state.world.entities.as_slice().to_vec();
        let clock = state.session.elapsed_ms;

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        for _ in 0..10 {
            assert_eq!(scheduler.frame(&mut state, &mut input, 16.0).ticks, 0);
        }
        assert_eq!(state.world.entities.as_slice(), &before[..]);
        assert_eq!(state.session.elapsed_ms, clock);

        scheduler.resume();
        assert!(scheduler.frame(&mut state, &mut input, 20.0).ticks >= 1);
    }

    #[test]
    fn test_edge_reaches_only_one_substep() {
        let (mut state, mut input, mut scheduler) = started(games::shooter::config());
        input.press(Action::Primary);
        input.release(Action::Primary);
        // Many substeps in one frame, one tap: one shot
        scheduler.frame(&mut state, &mut input, MAX_FRAME_MS);
        assert_eq!(
            state
                .world
                .entities
                .count_live(crate::sim::entity::EntityClass::Projectile),
            1
        );
    }

    #[test]
    fn test_pause_edge_through_scheduler() {
        let (mut state, mut input, mut scheduler) = started(games::platformer::config());
        input.press(Action::Pause);
        input.release(Action::Pause);
        let report = scheduler.frame(&mut state, &mut input, 40.0);
        assert_eq!(report.state, Some(SessionState::Paused));

        let frame = state.session.frame;
        scheduler.frame(&mut state, &mut input, 40.0);
        assert_eq!(state.session.frame, frame);

        input.press(Action::Pause);
        scheduler.frame(&mut state, &mut input, 40.0);
        assert_eq!(state.session.state, SessionState::Running);
    }
}
