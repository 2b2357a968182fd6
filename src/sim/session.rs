//! Session state machine
//!
//! Owns score, lives, level, the simulated clock and the spawn clocks. World
//! setup on start/advance lives in `GameState`; this type only decides which
//! transitions are legal and folds collision events into the score sheet.

use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::entity::CollectibleEffect;
use super::spawner::{SpawnClock, SpawnRule};
use crate::config::SessionConfig;
use crate::consts::TICK_MS;
use crate::error::TransitionError;

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Initial; entered on load and on explicit reset
    NotStarted,
    /// Scheduler is ticking the world
    Running,
    /// Ticks suspended, nothing mutates
    Paused,
    /// Goal or score threshold reached; waits for an advance
    LevelComplete,
    /// Out of lives; waits for a reset
    GameOver,
}

/// What consuming one tick's events did to the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Player lost at least one life this tick
    pub damaged: bool,
    pub points: u64,
    pub level_complete: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub state: SessionState,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Simulated time since the run started
    pub elapsed_ms: f64,
    /// Ticks since the run started (animation cadence)
    pub frame: u64,
    /// One clock per spawn rule, in rule order
    pub spawn_clocks: Vec<SpawnClock>,
    /// Last time survival points were paid out
    pub last_survival_ms: f64,
    /// Highest score seen, including earlier runs
    pub best_score: u64,
    starting_lives: u32,
    level_score_step: Option<u64>,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            state: SessionState::NotStarted,
            score: 0,
            lives: config.starting_lives,
            level: 1,
            elapsed_ms: 0.0,
            frame: 0,
            spawn_clocks: Vec::new(),
            last_survival_ms: 0.0,
            best_score: 0,
            starting_lives: config.starting_lives,
            level_score_step: config.level_score_step,
        }
    }

    pub fn starting_lives(&self) -> u32 {
        self.starting_lives
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    fn illegal(&self, action: &'static str) -> TransitionError {
        let err = TransitionError {
            from: self.state,
            action,
        };
        log::debug!("Ignored transition: {}", err);
        err
    }

    fn enter(&mut self, next: SessionState) {
        log::info!(
            "Session {:?} -> {:?} (score {}, lives {}, level {})",
            self.state,
            next,
            self.score,
            self.lives,
            self.level
        );
        self.state = next;
    }

    /// Back to `NotStarted` with level-1 values; legal from any state
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.starting_lives;
        self.level = 1;
        self.elapsed_ms = 0.0;
        self.frame = 0;
        self.last_survival_ms = 0.0;
        self.spawn_clocks.clear();
        if self.state != SessionState::NotStarted {
            self.enter(SessionState::NotStarted);
        }
    }

    /// `NotStarted -> Running` with a fresh score sheet
    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.state != SessionState::NotStarted {
            return Err(self.illegal("start"));
        }
        self.score = 0;
        self.lives = self.starting_lives;
        self.level = 1;
        self.elapsed_ms = 0.0;
        self.frame = 0;
        self.last_survival_ms = 0.0;
        self.enter(SessionState::Running);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TransitionError> {
        if self.state != SessionState::Running {
            return Err(self.illegal("pause"));
        }
        self.enter(SessionState::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), TransitionError> {
        if self.state != SessionState::Paused {
            return Err(self.illegal("resume"));
        }
        self.enter(SessionState::Running);
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            _ => Err(self.illegal("toggle pause")),
        }
    }

    pub fn complete_level(&mut self) -> Result<(), TransitionError> {
        if self.state != SessionState::Running {
            return Err(self.illegal("complete level"));
        }
        self.enter(SessionState::LevelComplete);
        Ok(())
    }

    /// `LevelComplete -> Running` on the next level
    pub fn advance_level(&mut self) -> Result<(), TransitionError> {
        if self.state != SessionState::LevelComplete {
            return Err(self.illegal("advance level"));
        }
        self.level += 1;
        self.enter(SessionState::Running);
        Ok(())
    }

    pub fn game_over(&mut self) -> Result<(), TransitionError> {
        if self.state != SessionState::Running {
            return Err(self.illegal("end game"));
        }
        self.lives = 0;
        self.enter(SessionState::GameOver);
        Ok(())
    }

    /// Restart every spawn clock for the current level
    pub fn reset_spawn_clocks(&mut self, rules: &[SpawnRule]) {
        let now = self.elapsed_ms;
        let level = self.level;
        self.spawn_clocks = rules
            .iter()
            .map(|rule| SpawnClock::for_level(rule, level, now))
            .collect();
        for (rule, clock) in rules.iter().zip(&self.spawn_clocks) {
            log::info!(
                "Level {}: rule '{}' spawns every {}ms",
                level,
                rule.name,
                clock.rate_ms
            );
        }
    }

    /// Advance the simulated clock by one tick; returns the new time
    pub fn advance_clock(&mut self) -> f64 {
        self.frame += 1;
        self.elapsed_ms += TICK_MS;
        self.elapsed_ms
    }

    pub fn add_score(&mut self, points: u64) {
        let before = self.score;
        self.score = self.score.saturating_add(points);
        debug_assert!(self.score >= before);
        self.best_score = self.best_score.max(self.score);
    }

    pub fn lose_lives(&mut self, amount: u32) {
        self.lives = self.lives.saturating_sub(amount);
    }

    /// Score needed to finish the current level, if levels end on score
    pub fn level_threshold(&self) -> Option<u64> {
        self.level_score_step
            .map(|step| step.saturating_mul(self.level as u64))
    }

    /// Fold one tick's collision events into the session.
    ///
    /// Runs out of lives first, so a tick that both reaches the goal and
    /// loses the last life ends the game.
    pub fn apply(&mut self, events: &[CollisionEvent]) -> SessionUpdate {
        let mut update = SessionUpdate::default();
        if self.state != SessionState::Running {
            return update;
        }
        let mut goal = false;
        for event in events {
            match *event {
                CollisionEvent::Damaged { amount, .. } => {
                    self.lose_lives(amount);
                    update.damaged = true;
                }
                CollisionEvent::Escaped { .. } => {
                    self.lose_lives(1);
                    update.damaged = true;
                }
                CollisionEvent::FellOut { .. } => {
                    self.lives = 0;
                    update.damaged = true;
                }
                CollisionEvent::Passed { points, .. }
                | CollisionEvent::Destroyed { points, .. }
                | CollisionEvent::Collected {
                    effect: CollectibleEffect::Points(points),
                    ..
                } => {
                    self.add_score(points);
                    update.points += points;
                }
                CollisionEvent::GoalReached { .. } => goal = true,
                CollisionEvent::Landed { .. }
                | CollisionEvent::Deflected { .. }
                | CollisionEvent::Shielded { .. }
                | CollisionEvent::Collected { .. } => {}
            }
        }

        if self.lives == 0 {
            update.game_over = self.game_over().is_ok();
        } else if goal || self.level_threshold().is_some_and(|t| self.score >= t) {
            update.level_complete = self.complete_level().is_ok();
        }
        update
    }

    /// Pay out survival points if the interval has elapsed
    pub fn accrue_survival(&mut self, interval_ms: f64, points: u64) -> bool {
        if self.elapsed_ms - self.last_survival_ms < interval_ms {
            return false;
        }
        self.last_survival_ms = self.elapsed_ms;
        self.add_score(points);
        true
    }
}
