//! Three-lane road racer

use glam::Vec2;

use crate::config::{
    GameConfig, ImpulseMode, PlayerConfig, ScoringConfig, ScrollConfig, SessionConfig,
    SurvivalScoring, WorldConfig,
};
use crate::sim::entity::{EntityClass, HazardEffect};
use crate::sim::rect::Rect;
use crate::sim::spawner::{Placement, SpawnRule, SpawnTemplate, TemplatePayload};
use crate::sim::world::LaneLayout;

pub const NAME: &str = "racer";
pub const TITLE: &str = "Road Rush";

const WIDTH: f32 = 400.0;
const HEIGHT: f32 = 600.0;
const ROAD_WIDTH: f32 = 300.0;
const LANE_COUNT: usize = 3;

fn vehicle(name: &str, size: Vec2, speed: (f32, f32), effect: HazardEffect) -> SpawnTemplate {
    SpawnTemplate {
        name: name.into(),
        weight: 1,
        size,
        velocity_min: Vec2::new(0.0, speed.0),
        velocity_max: Vec2::new(0.0, speed.1),
        gravity_scale: 0.0,
        scrolls: true,
        payload: TemplatePayload::Obstacle {
            effect,
            scorable: false,
            points: 0,
            fire_chance: 0.0,
        },
    }
}

pub fn config() -> GameConfig {
    let crash = HazardEffect::Damage {
        amount: 1,
        consumed: true,
    };
    GameConfig {
        name: NAME.into(),
        title: TITLE.into(),
        world: WorldConfig {
            bounds: Rect::new(0.0, 0.0, WIDTH, HEIGHT),
            gravity: 0.0,
            max_fall_speed: None,
            surfaces: Vec::new(),
            lanes: Some(LaneLayout {
                origin_x: (WIDTH - ROAD_WIDTH) / 2.0,
                lane_width: ROAD_WIDTH / LANE_COUNT as f32,
                count: LANE_COUNT,
            }),
            scroll: Some(ScrollConfig {
                initial_speed: 0.0,
                max_speed: 5.0,
                acceleration: 0.1,
                deceleration: 0.05,
            }),
        },
        player: PlayerConfig {
            spawn: Vec2::new(185.0, HEIGHT - 120.0),
            size: Vec2::new(30.0, 50.0),
            move_speed: 0.0,
            climb_speed: 0.0,
            impulse: ImpulseMode::None,
            impulse_velocity: 0.0,
            lane_cooldown_ms: 200.0,
            // Seven 200ms blinks
            invulnerability_ms: 1400.0,
            respawn_on_hit: false,
            floor_is_lethal: false,
            deflect_distance: ROAD_WIDTH / LANE_COUNT as f32,
            weapon: None,
            shield_clears_hazards: false,
        },
        session: SessionConfig {
            starting_lives: 3,
            level_score_step: Some(1000),
        },
        scoring: ScoringConfig {
            pass_points: 0,
            escape_penalty: false,
            survival: Some(SurvivalScoring {
                interval_ms: 100.0,
                points_per_speed: 2.0,
            }),
        },
        spawns: vec![SpawnRule {
            name: "traffic".into(),
            class: EntityClass::Obstacle,
            ceiling: 5,
            interval_ms: 2000.0,
            interval_step_ms: 200.0,
            min_interval_ms: 500.0,
            chance: 1.0,
            spawn_on_start: false,
            placement: Placement::RandomLane {
                y: -50.0,
                jitter: 10.0,
            },
            templates: vec![
                vehicle("car", Vec2::new(30.0, 50.0), (1.0, 1.5), crash),
                vehicle("truck", Vec2::new(40.0, 70.0), (0.8, 1.1), crash),
                vehicle("oil", Vec2::splat(35.0), (0.5, 1.0), HazardEffect::Deflect),
            ],
        }],
        goal: None,
        hostile_projectile: None,
    }
}
