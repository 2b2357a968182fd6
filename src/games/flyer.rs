//! Tap-to-flap pipe dodger

use glam::Vec2;

use crate::config::{
    GameConfig, ImpulseMode, PlayerConfig, ScoringConfig, SessionConfig, WorldConfig,
};
use crate::sim::entity::{EntityClass, HazardEffect};
use crate::sim::rect::Rect;
use crate::sim::spawner::{Placement, SpawnRule, SpawnTemplate, TemplatePayload};

pub const NAME: &str = "flyer";
pub const TITLE: &str = "Flap";

const WIDTH: f32 = 400.0;
/// Top of the ground strip; touching it ends the run
const GROUND_Y: f32 = 550.0;
const PIPE_WIDTH: f32 = 60.0;
const PIPE_GAP: f32 = 150.0;
const PIPE_SPEED: f32 = 2.0;

pub fn config() -> GameConfig {
    GameConfig {
        name: NAME.into(),
        title: TITLE.into(),
        world: WorldConfig {
            bounds: Rect::new(0.0, 0.0, WIDTH, GROUND_Y),
            gravity: 0.5,
            max_fall_speed: None,
            surfaces: Vec::new(),
            lanes: None,
            scroll: None,
        },
        player: PlayerConfig {
            spawn: Vec2::new(80.0, 300.0),
            size: Vec2::splat(30.0),
            move_speed: 0.0,
            climb_speed: 0.0,
            impulse: ImpulseMode::Flap,
            impulse_velocity: -8.0,
            lane_cooldown_ms: 0.0,
            invulnerability_ms: 0.0,
            respawn_on_hit: false,
            floor_is_lethal: true,
            deflect_distance: 0.0,
            weapon: None,
            shield_clears_hazards: false,
        },
        session: SessionConfig {
            starting_lives: 1,
            level_score_step: None,
        },
        scoring: ScoringConfig {
            pass_points: 1,
            escape_penalty: false,
            survival: None,
        },
        spawns: vec![SpawnRule {
            name: "pipes".into(),
            class: EntityClass::Obstacle,
            // Five pairs on screen at most
            ceiling: 10,
            // A new pair every 200px of travel
            interval_ms: 1650.0,
            interval_step_ms: 0.0,
            min_interval_ms: 0.0,
            chance: 1.0,
            spawn_on_start: true,
            placement: Placement::RandomGap {
                x: WIDTH,
                gap: PIPE_GAP,
                min_y: 100.0,
                max_y: 600.0 - 200.0 - PIPE_GAP + 100.0,
            },
            templates: vec![SpawnTemplate {
                name: "pipe".into(),
                weight: 1,
                size: Vec2::new(PIPE_WIDTH, 0.0),
                velocity_min: Vec2::new(-PIPE_SPEED, 0.0),
                velocity_max: Vec2::new(-PIPE_SPEED, 0.0),
                gravity_scale: 0.0,
                scrolls: false,
                payload: TemplatePayload::Obstacle {
                    effect: HazardEffect::Damage {
                        amount: 1,
                        consumed: false,
                    },
                    scorable: true,
                    points: 0,
                    fire_chance: 0.0,
                },
            }],
        }],
        goal: None,
        hostile_projectile: None,
    }
}
