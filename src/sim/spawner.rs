//! Time-gated, population-capped entity spawning
//!
//! Each `SpawnRule` owns one `SpawnClock` in the session. A rule fires only
//! when its interval has elapsed on the simulation clock AND the live count
//! of its class leaves room under the ceiling for everything it would add.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{
    CollectibleAttrs, CollectibleEffect, Entity, EntityClass, EntityId, EntityKind, HazardEffect,
    ObstacleAttrs,
};
use super::world::World;
use crate::config::{check_finite, check_non_negative, check_range, check_size};
use crate::error::ConfigError;

/// Where a spawned entity appears
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    Fixed { x: f32, y: f32 },
    /// Uniform x in `[min_x, max_x]` (left edge)
    RandomX { y: f32, min_x: f32, max_x: f32 },
    /// Uniform lane, centred, plus up to `jitter` px sideways
    RandomLane { y: f32, jitter: f32 },
    /// Top/bottom pair spanning the world height with a gap whose top edge
    /// is uniform in `[min_y, max_y]`
    RandomGap { x: f32, gap: f32, min_y: f32, max_y: f32 },
}

/// Kind-specific part of a template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TemplatePayload {
    Obstacle {
        effect: HazardEffect,
        #[serde(default)]
        scorable: bool,
        #[serde(default)]
        points: u64,
        #[serde(default)]
        fire_chance: f32,
    },
    Collectible {
        effect: CollectibleEffect,
    },
}

impl TemplatePayload {
    pub fn class(&self) -> EntityClass {
        match self {
            TemplatePayload::Obstacle { .. } => EntityClass::Obstacle,
            TemplatePayload::Collectible { .. } => EntityClass::Collectible,
        }
    }
}

/// One weighted entry in a rule's spawn table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTemplate {
    pub name: String,
    pub weight: u32,
    pub size: Vec2,
    /// Velocity is drawn per axis between min and max
    pub velocity_min: Vec2,
    pub velocity_max: Vec2,
    #[serde(default)]
    pub gravity_scale: f32,
    #[serde(default)]
    pub scrolls: bool,
    pub payload: TemplatePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    pub name: String,
    pub class: EntityClass,
    /// Maximum simultaneous live entities of `class`
    pub ceiling: usize,
    /// Spawn interval at level 1
    pub interval_ms: f64,
    /// Interval reduction per level
    #[serde(default)]
    pub interval_step_ms: f64,
    /// Interval never drops below this
    #[serde(default)]
    pub min_interval_ms: f64,
    /// Probability that an open gate actually spawns (rolled every tick)
    #[serde(default = "default_chance")]
    pub chance: f32,
    /// Gate is open immediately when a level starts
    #[serde(default)]
    pub spawn_on_start: bool,
    pub placement: Placement,
    pub templates: Vec<SpawnTemplate>,
}

fn default_chance() -> f32 {
    1.0
}

impl SpawnRule {
    /// Spawn interval for a level, tightening monotonically to the floor
    pub fn interval_for_level(&self, level: u32) -> f64 {
        let steps = level.saturating_sub(1) as f64;
        (self.interval_ms - steps * self.interval_step_ms).max(self.min_interval_ms)
    }

    /// Entities added by one successful spawn
    pub fn entities_per_spawn(&self) -> usize {
        match self.placement {
            Placement::RandomGap { .. } => 2,
            _ => 1,
        }
    }

    pub fn validate(&self, world_has_lanes: bool) -> Result<(), ConfigError> {
        let rule = || self.name.clone();
        if self.ceiling == 0 {
            return Err(ConfigError::ZeroCeiling { rule: rule() });
        }
        if self.templates.is_empty() {
            return Err(ConfigError::EmptySpawnTable { rule: rule() });
        }
        if self.templates.iter().map(|t| t.weight as u64).sum::<u64>() == 0 {
            return Err(ConfigError::ZeroSpawnWeight { rule: rule() });
        }
        check_non_negative(&format!("{}.interval_ms", self.name), self.interval_ms as f32)?;
        check_non_negative(
            &format!("{}.interval_step_ms", self.name),
            self.interval_step_ms as f32,
        )?;
        check_non_negative(
            &format!("{}.min_interval_ms", self.name),
            self.min_interval_ms as f32,
        )?;
        if self.min_interval_ms > self.interval_ms {
            return Err(ConfigError::IntervalBelowFloor {
                rule: rule(),
                interval_ms: self.interval_ms,
                min_interval_ms: self.min_interval_ms,
            });
        }
        if !(self.chance > 0.0 && self.chance <= 1.0) {
            return Err(ConfigError::InvalidChance {
                rule: rule(),
                chance: self.chance,
            });
        }
        if matches!(self.placement, Placement::RandomLane { .. }) && !world_has_lanes {
            return Err(ConfigError::MissingLanes { rule: rule() });
        }
        let placement = format!("{}.placement", self.name);
        match self.placement {
            Placement::Fixed { x, y } => {
                check_finite(&format!("{placement}.x"), x)?;
                check_finite(&format!("{placement}.y"), y)?;
            }
            Placement::RandomX { y, min_x, max_x } => {
                check_finite(&format!("{placement}.y"), y)?;
                check_range(&format!("{placement}.x"), min_x, max_x)?;
            }
            Placement::RandomLane { y, jitter } => {
                check_finite(&format!("{placement}.y"), y)?;
                check_non_negative(&format!("{placement}.jitter"), jitter)?;
                check_range(&format!("{placement}.jitter"), -jitter, jitter)?;
            }
            Placement::RandomGap {
                x,
                gap,
                min_y,
                max_y,
            } => {
                check_finite(&format!("{placement}.x"), x)?;
                check_non_negative(&format!("{placement}.gap"), gap)?;
                check_range(&format!("{placement}.gap_y"), min_y, max_y)?;
            }
        }
        for template in &self.templates {
            let field = format!("{}.{}", self.name, template.name);
            check_size(&format!("{field}.size"), template.size)?;
            check_range(
                &format!("{field}.velocity.x"),
                template.velocity_min.x,
                template.velocity_max.x,
            )?;
            check_range(
                &format!("{field}.velocity.y"),
                template.velocity_min.y,
                template.velocity_max.y,
            )?;
            check_finite(&format!("{field}.gravity_scale"), template.gravity_scale)?;
            if template.payload.class() != self.class {
                return Err(ConfigError::TemplateClassMismatch {
                    rule: rule(),
                    template: template.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Per-rule timing state, owned by the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    /// Current interval (tightens with level)
    pub rate_ms: f64,
    /// `None` means the gate is open
    pub last_spawn_ms: Option<f64>,
}

impl SpawnClock {
    /// Clock for a rule at the start of `level`
    pub fn for_level(rule: &SpawnRule, level: u32, now: f64) -> Self {
        Self {
            rate_ms: rule.interval_for_level(level),
            last_spawn_ms: if rule.spawn_on_start { None } else { Some(now) },
        }
    }

    pub fn gate_open(&self, now: f64) -> bool {
        match self.last_spawn_ms {
            None => true,
            Some(last) => now - last >= self.rate_ms,
        }
    }
}

/// Uniform float in `[min, max]`, tolerating an empty range
fn random_between(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

fn pick_template<'a>(templates: &'a [SpawnTemplate], rng: &mut Pcg32) -> Option<&'a SpawnTemplate> {
    let total: u64 = templates.iter().map(|t| t.weight as u64).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.random_range(0..total);
    for template in templates {
        let weight = template.weight as u64;
        if roll < weight {
            return Some(template);
        }
        roll -= weight;
    }
    None
}

fn build_entity(template: &SpawnTemplate, pos: Vec2, size: Vec2, vel: Vec2) -> Entity {
    let kind = match template.payload {
        TemplatePayload::Obstacle {
            effect,
            scorable,
            points,
            fire_chance,
        } => EntityKind::Obstacle(ObstacleAttrs {
            effect,
            scorable,
            passed: false,
            points,
            fire_chance,
            variant: template.name.clone(),
        }),
        TemplatePayload::Collectible { effect } => EntityKind::Collectible(CollectibleAttrs {
            effect,
            variant: template.name.clone(),
        }),
    };
    Entity::new(kind, pos, size)
        .with_velocity(vel)
        .with_gravity_scale(template.gravity_scale)
        .scrolling(template.scrolls)
}

/// Try to spawn from one rule; returns the primary new entity
pub fn maybe_spawn(
    rule: &SpawnRule,
    clock: &mut SpawnClock,
    world: &mut World,
    rng: &mut Pcg32,
    now: f64,
) -> Option<EntityId> {
    if !clock.gate_open(now) {
        return None;
    }
    let live = world.entities.count_live(rule.class);
    if live + rule.entities_per_spawn() > rule.ceiling {
        return None;
    }
    if rule.chance < 1.0 && rng.random::<f32>() >= rule.chance {
        return None;
    }

    let template = pick_template(&rule.templates, rng)?;
    let vel = Vec2::new(
        random_between(rng, template.velocity_min.x, template.velocity_max.x),
        random_between(rng, template.velocity_min.y, template.velocity_max.y),
    );

    let id = match rule.placement {
        Placement::Fixed { x, y } => world
            .entities
            .insert(build_entity(template, Vec2::new(x, y), template.size, vel)),
        Placement::RandomX { y, min_x, max_x } => {
            let x = random_between(rng, min_x, max_x);
            world
                .entities
                .insert(build_entity(template, Vec2::new(x, y), template.size, vel))
        }
        Placement::RandomLane { y, jitter } => {
            let lanes = world.lanes?;
            let lane = rng.random_range(0..lanes.count);
            let x = lanes.lane_x(lane, template.size.x) + random_between(rng, -jitter, jitter);
            world
                .entities
                .insert(build_entity(template, Vec2::new(x, y), template.size, vel))
        }
        Placement::RandomGap { x, gap, min_y, max_y } => {
            let bounds = world.bounds;
            let gap_top = random_between(rng, min_y, max_y);
            let gap_bottom = gap_top + gap;

            let top_size = Vec2::new(template.size.x, (gap_top - bounds.top()).max(0.0));
            let top = build_entity(template, Vec2::new(x, bounds.top()), top_size, vel);

            // Only the top half scores, so a pair counts once
            let bottom_size = Vec2::new(template.size.x, (bounds.bottom() - gap_bottom).max(0.0));
            let mut bottom = build_entity(template, Vec2::new(x, gap_bottom), bottom_size, vel);
            if let EntityKind::Obstacle(attrs) = &mut bottom.kind {
                attrs.scorable = false;
            }

            let id = world.entities.insert(top);
            world.entities.insert(bottom);
            id
        }
    };

    clock.last_spawn_ms = Some(now);
    log::trace!("Spawned {} #{} from rule '{}'", template.name, id, rule.name);

    debug_assert!(world.entities.count_live(rule.class) <= rule.ceiling);
    Some(id)
}

/// Run every rule once, in declaration order
pub fn spawn_all(
    rules: &[SpawnRule],
    clocks: &mut [SpawnClock],
    world: &mut World,
    rng: &mut Pcg32,
    now: f64,
) -> Vec<EntityId> {
    rules
        .iter()
        .zip(clocks.iter_mut())
        .filter_map(|(rule, clock)| maybe_spawn(rule, clock, world, rng, now))
        .collect()
}
