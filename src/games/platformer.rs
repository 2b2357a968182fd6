//! Barrel-dodging ladder climber

use glam::Vec2;

use crate::config::{
    GameConfig, GoalConfig, ImpulseMode, PlayerConfig, ScoringConfig, SessionConfig, WorldConfig,
};
use crate::sim::entity::{EntityClass, HazardEffect};
use crate::sim::rect::Rect;
use crate::sim::spawner::{Placement, SpawnRule, SpawnTemplate, TemplatePayload};
use crate::sim::world::Surface;

pub const NAME: &str = "platformer";
pub const TITLE: &str = "Barrel Climb";

const PLATFORMS: [Surface; 7] = [
    Surface::platform(0.0, 550.0, 800.0, 20.0),
    Surface::platform(100.0, 450.0, 200.0, 20.0),
    Surface::platform(500.0, 450.0, 200.0, 20.0),
    Surface::platform(0.0, 350.0, 200.0, 20.0),
    Surface::platform(400.0, 350.0, 200.0, 20.0),
    Surface::platform(200.0, 250.0, 200.0, 20.0),
    Surface::platform(600.0, 250.0, 200.0, 20.0),
];

const LADDERS: [Surface; 4] = [
    Surface::ladder(350.0, 350.0, 30.0, 120.0),
    Surface::ladder(250.0, 250.0, 30.0, 120.0),
    Surface::ladder(550.0, 250.0, 30.0, 120.0),
    Surface::ladder(150.0, 150.0, 30.0, 120.0),
];

/// Barrels drop from under the thrower at (100, 100, 60x80)
const BARREL_DROP: Vec2 = Vec2::new(120.0, 180.0);

pub fn config() -> GameConfig {
    GameConfig {
        name: NAME.into(),
        title: TITLE.into(),
        world: WorldConfig {
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
            gravity: 0.5,
            max_fall_speed: None,
            surfaces: PLATFORMS.iter().chain(LADDERS.iter()).copied().collect(),
            lanes: None,
            scroll: None,
        },
        player: PlayerConfig {
            spawn: Vec2::new(100.0, 500.0),
            size: Vec2::new(30.0, 40.0),
            move_speed: 5.0,
            climb_speed: 3.0,
            impulse: ImpulseMode::Jump,
            impulse_velocity: -12.0,
            lane_cooldown_ms: 0.0,
            invulnerability_ms: 0.0,
            respawn_on_hit: true,
            floor_is_lethal: false,
            deflect_distance: 0.0,
            weapon: None,
            shield_clears_hazards: false,
        },
        session: SessionConfig {
            starting_lives: 3,
            level_score_step: None,
        },
        scoring: ScoringConfig::default(),
        spawns: vec![SpawnRule {
            name: "barrels".into(),
            class: EntityClass::Obstacle,
            ceiling: 8,
            interval_ms: 2000.0,
            interval_step_ms: 200.0,
            min_interval_ms: 1000.0,
            chance: 1.0,
            spawn_on_start: true,
            placement: Placement::Fixed {
                x: BARREL_DROP.x,
                y: BARREL_DROP.y,
            },
            templates: vec![SpawnTemplate {
                name: "barrel".into(),
                weight: 1,
                size: Vec2::splat(20.0),
                velocity_min: Vec2::new(2.0, 0.0),
                velocity_max: Vec2::new(2.0, 0.0),
                gravity_scale: 1.0,
                scrolls: false,
                payload: TemplatePayload::Obstacle {
                    effect: HazardEffect::Damage {
                        amount: 1,
                        consumed: true,
                    },
                    scorable: false,
                    points: 0,
                    fire_chance: 0.0,
                },
            }],
        }],
        goal: Some(GoalConfig {
            rect: Rect::new(650.0, 100.0, 30.0, 40.0),
        }),
        hostile_projectile: None,
    }
}
