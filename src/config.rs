//! Per-game configuration
//!
//! One `GameConfig` turns the generic engine into a specific game. Configs are
//! plain serde data so they can ship as JSON next to the game; construction
//! rejects anything invalid instead of clamping it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::rect::Rect;
use crate::sim::spawner::SpawnRule;
use crate::sim::world::{LaneLayout, Surface};

/// How the up/jump/flap action moves the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImpulseMode {
    /// Up does nothing on its own (lane games, shooters)
    #[default]
    None,
    /// One jump per landing
    Jump,
    /// Overwrites vertical velocity on every press
    Flap,
}

/// Throttle-controlled world scrolling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    pub initial_speed: f32,
    pub max_speed: f32,
    /// Speed gained per tick while accelerating
    pub acceleration: f32,
    /// Speed lost per tick while coasting (braking loses twice this)
    pub deceleration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub bounds: Rect,
    /// Downward acceleration per tick
    pub gravity: f32,
    #[serde(default)]
    pub max_fall_speed: Option<f32>,
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    #[serde(default)]
    pub lanes: Option<LaneLayout>,
    #[serde(default)]
    pub scroll: Option<ScrollConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    pub size: Vec2,
    /// Pixels per tick along the firing direction
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub projectile: ProjectileConfig,
    pub cooldown_ms: f64,
    /// Cooldown while a rapid-fire pickup is active
    pub rapid_cooldown_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub spawn: Vec2,
    pub size: Vec2,
    /// Horizontal pixels per tick while walking
    #[serde(default)]
    pub move_speed: f32,
    #[serde(default)]
    pub climb_speed: f32,
    #[serde(default)]
    pub impulse: ImpulseMode,
    /// Vertical velocity set by a jump/flap (negative is up)
    #[serde(default)]
    pub impulse_velocity: f32,
    #[serde(default)]
    pub lane_cooldown_ms: f64,
    /// Invulnerability after taking damage (0 disables)
    #[serde(default)]
    pub invulnerability_ms: f64,
    /// Return to the spawn point after a non-fatal hit
    #[serde(default)]
    pub respawn_on_hit: bool,
    /// Touching the world floor ends the run
    #[serde(default)]
    pub floor_is_lethal: bool,
    /// Sideways push from a deflecting hazard when the world has no lanes
    #[serde(default)]
    pub deflect_distance: f32,
    #[serde(default)]
    pub weapon: Option<WeaponConfig>,
    /// While invulnerable, damaging contacts are destroyed instead of ignored
    #[serde(default)]
    pub shield_clears_hazards: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub starting_lives: u32,
    /// Level completes every time the score crosses a multiple of this
    #[serde(default)]
    pub level_score_step: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            level_score_step: None,
        }
    }
}

/// Passive score accrual tied to scroll speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalScoring {
    pub interval_ms: f64,
    /// Points per interval are `floor(scroll_speed * points_per_speed)`
    pub points_per_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points for getting past a scorable obstacle
    pub pass_points: u64,
    /// An obstacle escaping off the bottom costs a life
    #[serde(default)]
    pub escape_penalty: bool,
    #[serde(default)]
    pub survival: Option<SurvivalScoring>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pass_points: 1,
            escape_penalty: false,
            survival: None,
        }
    }
}

/// Fixed level goal placed at the start of every level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub rect: Rect,
}

/// Complete description of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Short id (also the persistence key suffix)
    pub name: String,
    pub title: String,
    pub world: WorldConfig,
    pub player: PlayerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub spawns: Vec<SpawnRule>,
    #[serde(default)]
    pub goal: Option<GoalConfig>,
    /// Projectiles fired by obstacles with a fire chance
    #[serde(default)]
    pub hostile_projectile: Option<ProjectileConfig>,
}

pub(crate) fn check_rect(field: &str, rect: &Rect) -> Result<(), ConfigError> {
    if rect.is_valid() {
        return Ok(());
    }
    let value = [rect.width, rect.height]
        .into_iter()
        .find(|v| !v.is_finite() || *v < 0.0)
        .unwrap_or(f32::NAN);
    Err(ConfigError::InvalidDimension {
        field: field.to_string(),
        value,
    })
}

pub(crate) fn check_size(field: &str, size: Vec2) -> Result<(), ConfigError> {
    check_non_negative(&format!("{field}.x"), size.x)?;
    check_non_negative(&format!("{field}.y"), size.y)
}

pub(crate) fn check_non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension {
            field: field.to_string(),
            value,
        })
    }
}

pub(crate) fn check_finite(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

/// `min <= max` with a finite span, so a uniform draw between them is defined
pub(crate) fn check_range(field: &str, min: f32, max: f32) -> Result<(), ConfigError> {
    check_finite(&format!("{field}.min"), min)?;
    check_finite(&format!("{field}.max"), max)?;
    if min <= max && (max - min).is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field: field.to_string(),
            min,
            max,
        })
    }
}

fn check_duration(field: &str, value: f64) -> Result<(), ConfigError> {
    check_non_negative(field, value as f32)
}

fn check_projectile(field: &str, projectile: &ProjectileConfig) -> Result<(), ConfigError> {
    check_size(&format!("{field}.size"), projectile.size)?;
    check_non_negative(&format!("{field}.speed"), projectile.speed)
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rect("world.bounds", &self.bounds)?;
        if self.bounds.width <= 0.0 || self.bounds.height <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                field: "world.bounds".into(),
                value: self.bounds.width.min(self.bounds.height),
            });
        }
        check_finite("world.gravity", self.gravity)?;
        if let Some(max) = self.max_fall_speed {
            check_non_negative("world.max_fall_speed", max)?;
        }
        for (i, surface) in self.surfaces.iter().enumerate() {
            check_rect(&format!("world.surfaces[{i}]"), &surface.rect)?;
        }
        if let Some(lanes) = &self.lanes {
            if lanes.count == 0 {
                return Err(ConfigError::ZeroLanes);
            }
            check_finite("world.lanes.origin_x", lanes.origin_x)?;
            check_non_negative("world.lanes.lane_width", lanes.lane_width)?;
            if lanes.lane_width == 0.0 {
                return Err(ConfigError::ZeroLaneWidth);
            }
        }
        if let Some(scroll) = &self.scroll {
            check_non_negative("world.scroll.initial_speed", scroll.initial_speed)?;
            check_non_negative("world.scroll.max_speed", scroll.max_speed)?;
            check_non_negative("world.scroll.acceleration", scroll.acceleration)?;
            check_non_negative("world.scroll.deceleration", scroll.deceleration)?;
        }
        Ok(())
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("player.spawn.x", self.spawn.x)?;
        check_finite("player.spawn.y", self.spawn.y)?;
        check_size("player.size", self.size)?;
        check_non_negative("player.move_speed", self.move_speed)?;
        check_non_negative("player.climb_speed", self.climb_speed)?;
        check_finite("player.impulse_velocity", self.impulse_velocity)?;
        check_duration("player.lane_cooldown_ms", self.lane_cooldown_ms)?;
        check_duration("player.invulnerability_ms", self.invulnerability_ms)?;
        check_non_negative("player.deflect_distance", self.deflect_distance)?;
        if let Some(weapon) = &self.weapon {
            check_projectile("player.weapon.projectile", &weapon.projectile)?;
            check_duration("player.weapon.cooldown_ms", weapon.cooldown_ms)?;
            check_duration("player.weapon.rapid_cooldown_ms", weapon.rapid_cooldown_ms)?;
        }
        Ok(())
    }
}

impl GameConfig {
    /// Check every field; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.player.validate()?;
        if self.session.starting_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        let has_lanes = self.world.lanes.is_some();
        for rule in &self.spawns {
            rule.validate(has_lanes)?;
        }
        if let Some(goal) = &self.goal {
            check_rect("goal.rect", &goal.rect)?;
        }
        if let Some(projectile) = &self.hostile_projectile {
            check_projectile("hostile_projectile", projectile)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        if let Err(err) = config.validate() {
            log::warn!("Rejected config '{}': {}", config.name, err);
            return Err(err);
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Persistence key for this game's best score
    pub fn best_score_key(&self) -> String {
        format!("retro_arcade_best_{}", self.name)
    }
}
