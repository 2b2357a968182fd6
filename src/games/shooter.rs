//! Vertical space shooter

use glam::Vec2;

use crate::config::{
    GameConfig, ImpulseMode, PlayerConfig, ProjectileConfig, ScoringConfig, SessionConfig,
    WeaponConfig, WorldConfig,
};
use crate::consts::TICK_MS;
use crate::sim::entity::{CollectibleEffect, EntityClass, HazardEffect};
use crate::sim::rect::Rect;
use crate::sim::spawner::{Placement, SpawnRule, SpawnTemplate, TemplatePayload};

pub const NAME: &str = "shooter";
pub const TITLE: &str = "Star Defender";

/// Power-ups last 300 ticks
const POWER_UP_MS: f64 = 300.0 * TICK_MS;

fn power_up(name: &str, effect: CollectibleEffect) -> SpawnTemplate {
    SpawnTemplate {
        name: name.into(),
        weight: 1,
        size: Vec2::splat(20.0),
        velocity_min: Vec2::new(0.0, 2.0),
        velocity_max: Vec2::new(0.0, 2.0),
        gravity_scale: 0.0,
        scrolls: false,
        payload: TemplatePayload::Collectible { effect },
    }
}

pub fn config() -> GameConfig {
    GameConfig {
        name: NAME.into(),
        title: TITLE.into(),
        world: WorldConfig {
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
            gravity: 0.0,
            max_fall_speed: None,
            surfaces: Vec::new(),
            lanes: None,
            scroll: None,
        },
        player: PlayerConfig {
            spawn: Vec2::new(385.0, 550.0),
            size: Vec2::splat(30.0),
            move_speed: 5.0,
            climb_speed: 0.0,
            impulse: ImpulseMode::None,
            impulse_velocity: 0.0,
            lane_cooldown_ms: 0.0,
            invulnerability_ms: 0.0,
            respawn_on_hit: false,
            floor_is_lethal: false,
            deflect_distance: 0.0,
            weapon: Some(WeaponConfig {
                projectile: ProjectileConfig {
                    size: Vec2::new(4.0, 12.0),
                    speed: 10.0,
                },
                cooldown_ms: 250.0,
                rapid_cooldown_ms: 100.0,
            }),
            shield_clears_hazards: true,
        },
        session: SessionConfig {
            starting_lives: 3,
            level_score_step: None,
        },
        scoring: ScoringConfig {
            pass_points: 0,
            escape_penalty: true,
            survival: None,
        },
        spawns: vec![
            SpawnRule {
                name: "enemies".into(),
                class: EntityClass::Obstacle,
                ceiling: 8,
                interval_ms: 0.0,
                interval_step_ms: 0.0,
                min_interval_ms: 0.0,
                chance: 0.01,
                spawn_on_start: true,
                placement: Placement::RandomX {
                    y: -30.0,
                    min_x: 50.0,
                    max_x: 750.0,
                },
                templates: vec![SpawnTemplate {
                    name: "enemy".into(),
                    weight: 1,
                    size: Vec2::splat(30.0),
                    velocity_min: Vec2::new(0.0, 1.5),
                    velocity_max: Vec2::new(0.0, 2.5),
                    gravity_scale: 0.0,
                    scrolls: false,
                    payload: TemplatePayload::Obstacle {
                        effect: HazardEffect::Damage {
                            amount: 1,
                            consumed: true,
                        },
                        scorable: false,
                        points: 10,
                        fire_chance: 0.003,
                    },
                }],
            },
            SpawnRule {
                name: "power-ups".into(),
                class: EntityClass::Collectible,
                ceiling: 2,
                interval_ms: 0.0,
                interval_step_ms: 0.0,
                min_interval_ms: 0.0,
                chance: 0.001,
                spawn_on_start: true,
                placement: Placement::RandomX {
                    y: -20.0,
                    min_x: 50.0,
                    max_x: 750.0,
                },
                templates: vec![
                    power_up(
                        "rapid-fire",
                        CollectibleEffect::RapidFire {
                            duration_ms: POWER_UP_MS,
                        },
                    ),
                    power_up(
                        "shield",
                        CollectibleEffect::Shield {
                            duration_ms: POWER_UP_MS,
                        },
                    ),
                ],
            },
        ],
        goal: None,
        hostile_projectile: Some(ProjectileConfig {
            size: Vec2::new(4.0, 10.0),
            speed: 2.0,
        }),
    }
}
