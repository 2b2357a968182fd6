//! Per-tick motion: gravity integration and player impulses
//!
//! Velocities are in pixels per tick and gravity in pixels per tick², so one
//! call with `dt_units = 1.0` advances one scheduler tick.

use glam::Vec2;

use super::entity::{Entity, LaneState};
use super::rect::Rect;
use super::world::{LaneLayout, World};
use crate::config::{ImpulseMode, ScrollConfig};
use crate::consts::ANIMATION_PERIOD_TICKS;

/// Advance one entity: `vel.y += g * dt`, then `pos += vel * dt`
pub fn integrate(
    entity: &mut Entity,
    gravity: f32,
    max_fall_speed: Option<f32>,
    scroll_speed: f32,
    dt_units: f32,
) {
    entity.prev_pos = entity.pos;

    let climbing = entity.player_attrs().is_some_and(|p| p.climbing);
    if !climbing {
        entity.vel.y += gravity * entity.gravity_scale * dt_units;
        if let Some(max) = max_fall_speed {
            entity.vel.y = entity.vel.y.min(max);
        }
    }

    let scale = if entity.scrolls { scroll_speed } else { 1.0 };
    entity.pos += entity.vel * scale * dt_units;
}

/// Integrate every live entity in store order
pub fn integrate_world(world: &mut World, dt_units: f32) {
    let gravity = world.gravity;
    let max_fall = world.max_fall_speed;
    let scroll = world.scroll_speed;
    for entity in world.entities.iter_mut().filter(|e| e.alive) {
        integrate(entity, gravity, max_fall, scroll, dt_units);
    }
}

/// Apply the up/jump/flap impulse; `pressed` is the input edge for this tick.
///
/// Jumps need the player grounded; flaps only need a fresh press. Either way
/// velocity is overwritten, not added to.
pub fn apply_impulse(entity: &mut Entity, mode: ImpulseMode, velocity: f32, pressed: bool) -> bool {
    if !pressed {
        return false;
    }
    let Some(attrs) = entity.player_attrs_mut() else {
        return false;
    };
    match mode {
        ImpulseMode::None => false,
        ImpulseMode::Jump => {
            if !attrs.grounded || attrs.climbing {
                return false;
            }
            attrs.grounded = false;
            entity.vel.y = velocity;
            true
        }
        ImpulseMode::Flap => {
            attrs.grounded = false;
            entity.vel.y = velocity;
            true
        }
    }
}

/// Horizontal walking; `direction` is -1, 0 or 1
pub fn walk(entity: &mut Entity, direction: f32, speed: f32) {
    entity.vel.x = direction * speed;
    if direction != 0.0 {
        if let Some(attrs) = entity.player_attrs_mut() {
            attrs.facing = direction.signum();
        }
    }
}

/// Debounced lane change. Returns true if the player moved.
pub fn shift_lane(
    entity: &mut Entity,
    lanes: &LaneLayout,
    direction: i32,
    now: f64,
    cooldown_ms: f64,
) -> bool {
    let width = entity.size.x;
    let current = lanes.lane_at(entity.pos.x + width * 0.5);
    let Some(attrs) = entity.player_attrs_mut() else {
        return false;
    };
    let lane = attrs.lane.get_or_insert(LaneState {
        index: current,
        locked_until: 0.0,
    });
    if now < lane.locked_until {
        return false;
    }
    let target = lane.index as i64 + direction as i64;
    if direction == 0 || target < 0 || target > lanes.last_lane() as i64 {
        return false;
    }
    lane.index = target as usize;
    lane.locked_until = now + cooldown_ms;
    let x = lanes.lane_x(lane.index, width);
    entity.pos.x = x;
    entity.vel.x = 0.0;
    true
}

/// Move the player to a lane immediately, ignoring the input lock
pub fn set_lane(entity: &mut Entity, lanes: &LaneLayout, index: usize) {
    let index = index.min(lanes.last_lane());
    let x = lanes.lane_x(index, entity.size.x);
    entity.pos.x = x;
    entity.prev_pos.x = x;
    if let Some(attrs) = entity.player_attrs_mut() {
        let locked_until = attrs.lane.map(|l| l.locked_until).unwrap_or(0.0);
        attrs.lane = Some(LaneState {
            index,
            locked_until,
        });
    }
}

/// Ladder climbing; `direction` is -1 (up), 0 or 1 (down).
///
/// Returns true while the player is on a ladder and climbing this tick.
pub fn climb<'a>(
    entity: &mut Entity,
    ladders: impl IntoIterator<Item = &'a Rect>,
    direction: f32,
    speed: f32,
) -> bool {
    let bounds = entity.bounds();
    let on_ladder = ladders.into_iter().any(|l| l.overlaps(&bounds));
    let climbing = on_ladder && direction != 0.0;
    if let Some(attrs) = entity.player_attrs_mut() {
        attrs.climbing = climbing;
        if climbing {
            attrs.grounded = false;
        }
    }
    if climbing {
        entity.vel.y = direction * speed;
    }
    climbing
}

/// Which world edges the player was pushed back from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsContact {
    pub floor: bool,
    pub ceiling: bool,
    pub side: bool,
}

/// Keep an entity inside the world; floor contact grounds it
pub fn clamp_to_bounds(entity: &mut Entity, bounds: &Rect) -> BoundsContact {
    let mut contact = BoundsContact::default();
    let max_x = bounds.right() - entity.size.x;
    if entity.pos.x < bounds.left() {
        entity.pos.x = bounds.left();
        contact.side = true;
    } else if entity.pos.x > max_x {
        entity.pos.x = max_x;
        contact.side = true;
    }

    if entity.pos.y < bounds.top() {
        entity.pos.y = bounds.top();
        entity.vel.y = entity.vel.y.max(0.0);
        contact.ceiling = true;
    }
    let max_y = bounds.bottom() - entity.size.y;
    if entity.pos.y >= max_y {
        entity.pos.y = max_y;
        entity.vel.y = entity.vel.y.min(0.0);
        contact.floor = true;
        if let Some(attrs) = entity.player_attrs_mut() {
            attrs.grounded = true;
        }
    }
    contact
}

/// Throttle control for scrolling worlds; returns the new speed
pub fn update_throttle(speed: f32, config: &ScrollConfig, accelerate: bool, brake: bool) -> f32 {
    let next = if accelerate {
        speed + config.acceleration
    } else if brake {
        speed - config.deceleration * 2.0
    } else {
        speed - config.deceleration
    };
    next.clamp(0.0, config.max_speed)
}

/// Flip the animation frame every few ticks
pub fn advance_animation(entity: &mut Entity) {
    if let Some(attrs) = entity.player_attrs_mut() {
        attrs.anim_ticks += 1;
        if attrs.anim_ticks > ANIMATION_PERIOD_TICKS {
            attrs.anim_frame = (attrs.anim_frame + 1) % 2;
            attrs.anim_ticks = 0;
        }
    }
}

/// Unit direction from a pair of opposing inputs
pub fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Spawn point for a projectile leaving `shooter` vertically
pub fn muzzle(shooter: &Rect, projectile_size: Vec2, upward: bool) -> Vec2 {
    let x = shooter.center().x - projectile_size.x * 0.5;
    let y = if upward {
        shooter.top() - projectile_size.y
    } else {
        shooter.bottom()
    };
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Entity {
        Entity::player(Vec2::new(100.0, 500.0), Vec2::new(30.0, 40.0))
    }

    #[test]
    fn test_gravity_then_position() {
        let mut p = player();
        integrate(&mut p, 0.5, None, 1.0, 1.0);
        assert_eq!(p.vel.y, 0.5);
        assert_eq!(p.pos.y, 500.5);
        assert_eq!(p.prev_pos.y, 500.0);

        integrate(&mut p, 0.5, None, 1.0, 1.0);
        assert_eq!(p.vel.y, 1.0);
        assert_eq!(p.pos.y, 501.5);
    }

    #[test]
    fn test_terminal_velocity() {
        let mut p = player();
        p.vel.y = 9.8;
        integrate(&mut p, 0.5, Some(10.0), 1.0, 1.0);
        assert_eq!(p.vel.y, 10.0);
    }

    #[test]
    fn test_scrolling_entities_scale_with_world_speed() {
        let mut e = player().with_gravity_scale(0.0).scrolling(true);
        e.vel = Vec2::new(0.0, 2.0);
        integrate(&mut e, 0.5, None, 3.0, 1.0);
        assert_eq!(e.pos.y, 506.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut p = player();
        assert!(!apply_impulse(&mut p, ImpulseMode::Jump, -12.0, true));

        p.player_attrs_mut().unwrap().grounded = true;
        assert!(apply_impulse(&mut p, ImpulseMode::Jump, -12.0, true));
        assert_eq!(p.vel.y, -12.0);

        // Airborne now: a second press does nothing
        p.vel.y = -5.0;
        assert!(!apply_impulse(&mut p, ImpulseMode::Jump, -12.0, true));
        assert_eq!(p.vel.y, -5.0);
    }

    #[test]
    fn test_flap_needs_fresh_press() {
        let mut p = player();
        p.vel.y = 6.0;
        assert!(!apply_impulse(&mut p, ImpulseMode::Flap, -8.0, false));
        assert_eq!(p.vel.y, 6.0);
        assert!(apply_impulse(&mut p, ImpulseMode::Flap, -8.0, true));
        assert_eq!(p.vel.y, -8.0, "flap overwrites instead of adding");
    }

    #[test]
    fn test_lane_shift_cooldown() {
        let lanes = LaneLayout {
            origin_x: 50.0,
            lane_width: 100.0,
            count: 3,
        };
        let mut p = player();
        set_lane(&mut p, &lanes, 1);

        assert!(shift_lane(&mut p, &lanes, 1, 0.0, 200.0));
        assert_eq!(p.player_attrs().unwrap().lane.unwrap().index, 2);
        assert_eq!(p.pos.x, lanes.lane_x(2, 30.0));

        // Locked for 200ms
        assert!(!shift_lane(&mut p, &lanes, -1, 100.0, 200.0));
        assert_eq!(p.player_attrs().unwrap().lane.unwrap().index, 2);

        // Past the lock, but the right edge stops further moves right
        assert!(!shift_lane(&mut p, &lanes, 1, 250.0, 200.0));
        assert!(shift_lane(&mut p, &lanes, -1, 250.0, 200.0));
        assert_eq!(p.player_attrs().unwrap().lane.unwrap().index, 1);
    }

    #[test]
    fn test_climb_only_on_ladder() {
        let ladder = Rect::new(90.0, 450.0, 30.0, 120.0);
        let far_ladder = Rect::new(600.0, 450.0, 30.0, 120.0);
        let mut p = player();

        assert!(!climb(&mut p, [&far_ladder], -1.0, 3.0));
        assert!(climb(&mut p, [&ladder], -1.0, 3.0));
        assert_eq!(p.vel.y, -3.0);

        // Climbing suspends gravity
        integrate(&mut p, 0.5, None, 1.0, 1.0);
        assert_eq!(p.pos.y, 497.0);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut p = player();
        p.pos = Vec2::new(-10.0, 590.0);
        p.vel.y = 4.0;
        let contact = clamp_to_bounds(&mut p, &bounds);
        assert!(contact.floor && contact.side);
        assert_eq!(p.pos, Vec2::new(0.0, 560.0));
        assert_eq!(p.vel.y, 0.0);
        assert!(p.player_attrs().unwrap().grounded);
    }

    #[test]
    fn test_throttle() {
        let config = ScrollConfig {
            initial_speed: 0.0,
            max_speed: 5.0,
            acceleration: 0.1,
            deceleration: 0.05,
        };
        assert!((update_throttle(1.0, &config, true, false) - 1.1).abs() < 1e-6);
        assert!((update_throttle(1.0, &config, false, true) - 0.9).abs() < 1e-6);
        assert!((update_throttle(1.0, &config, false, false) - 0.95).abs() < 1e-6);
        assert_eq!(update_throttle(5.0, &config, true, false), 5.0);
        assert_eq!(update_throttle(0.02, &config, false, false), 0.0);
    }

    #[test]
    fn test_animation_cadence() {
        let mut p = player();
        for _ in 0..=ANIMATION_PERIOD_TICKS {
            advance_animation(&mut p);
        }
        assert_eq!(p.player_attrs().unwrap().anim_frame, 1);
    }
}
