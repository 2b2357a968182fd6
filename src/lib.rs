//! Retro Arcade - one fixed-step engine behind a handful of arcade clones
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, spawning, session)
//! - `input`: Edge-triggered action input
//! - `config`: Per-game configuration and validation
//! - `games`: Built-in game presets (platformer, flyer, racer, shooter)
//! - `renderer`: WebGPU rendering of the read-only snapshot
//! - `best_score`: Best score persistence

pub mod best_score;
pub mod config;
pub mod error;
pub mod games;
pub mod input;
pub mod renderer;
pub mod sim;

pub use best_score::BestScore;
pub use config::GameConfig;
pub use error::{ConfigError, PersistError, TransitionError};
pub use input::{Action, ActionSet, InputState};

/// Engine-wide constants
pub mod consts {
    /// Simulation rate; all preset constants are per tick at this rate
    pub const TICK_RATE: u32 = 60;
    /// Simulated milliseconds per fixed tick
    pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame interval the scheduler will account for (tab switches etc.)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Ticks between player animation frame flips
    pub const ANIMATION_PERIOD_TICKS: u32 = 10;
    /// Margin beyond world bounds before an entity is swept
    pub const OFFSCREEN_MARGIN: f32 = 100.0;
    /// Tolerance for the "was above last tick" landing test
    pub const LANDING_EPSILON: f32 = 0.001;
}
