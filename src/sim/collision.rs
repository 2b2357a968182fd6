//! Collision detection and response for axis-aligned boxes
//!
//! Passes run in a fixed order each tick:
//! 1. surfaces (landing takes precedence over damage), then world bounds
//! 2. player projectiles against obstacles
//! 3. player against hazards, pickups and goals, in insertion order
//! 4. pass-through scoring
//! 5. escapes and off-screen cleanup
//!
//! No pass removes entities. Each one walks a snapshot of ids and clears
//! `alive`; the store is swept once at the end of the tick.

use super::entity::{
    CollectibleEffect, Entity, EntityClass, EntityId, EntityKind, Faction, HazardEffect,
};
use super::physics::{clamp_to_bounds, set_lane};
use super::rect::Rect;
use super::world::{LaneLayout, Surface, SurfaceKind, World};
use crate::config::{PlayerConfig, ScoringConfig};
use crate::consts::{LANDING_EPSILON, OFFSCREEN_MARGIN};

/// Something a collision pass did that the session may care about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// Entity came to rest on surface `surface` (index into `World::surfaces`)
    Landed { entity: EntityId, surface: usize },
    /// Player took damage
    Damaged { hazard: EntityId, amount: u32 },
    /// Player was shoved aside by a non-lethal hazard
    Deflected { hazard: EntityId },
    /// A shielded player destroyed a damaging hazard without losing a life
    Shielded { hazard: EntityId },
    /// Player got past a scorable obstacle (at most once per obstacle)
    Passed { obstacle: EntityId, points: u64 },
    /// Player projectile destroyed an obstacle
    Destroyed {
        target: EntityId,
        projectile: EntityId,
        points: u64,
    },
    Collected {
        item: EntityId,
        effect: CollectibleEffect,
    },
    GoalReached { goal: EntityId },
    /// Obstacle left through the bottom of the world
    Escaped { entity: EntityId },
    /// Player touched a lethal floor
    FellOut { entity: EntityId },
}

/// Snap a falling entity onto the first platform it crossed this tick.
///
/// A landing needs the bottom edge to have been at or above the platform top
/// before integration and at or below it after, with horizontal overlap.
/// Entities moving up pass through platforms from below.
pub fn land_on_platforms(entity: &mut Entity, surfaces: &[Surface]) -> Option<usize> {
    if entity.vel.y < 0.0 || entity.player_attrs().is_some_and(|p| p.climbing) {
        return None;
    }
    let bounds = entity.bounds();
    let prev_bottom = entity.prev_bounds().bottom();

    let (index, top) = surfaces
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind == SurfaceKind::Platform)
        .filter(|(_, s)| {
            let top = s.rect.top();
            prev_bottom <= top + LANDING_EPSILON
                && bounds.bottom() >= top
                && bounds.overlaps_horizontally(&s.rect)
        })
        .map(|(i, s)| (i, s.rect.top()))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    entity.pos.y = top - entity.size.y;
    entity.vel.y = 0.0;
    if let Some(attrs) = entity.player_attrs_mut() {
        attrs.grounded = true;
    }
    Some(index)
}

/// Landing pass for every live gravity-affected entity
///
/// `Landed` is only reported for an actual drop onto a platform, not for an
/// entity that was already resting there.
pub fn resolve_surfaces(world: &mut World) -> Vec<CollisionEvent> {
    let World {
        surfaces, entities, ..
    } = world;
    let mut events = Vec::new();
    for entity in entities.iter_mut() {
        if !entity.alive || entity.gravity_scale == 0.0 {
            continue;
        }
        if let Some(attrs) = entity.player_attrs_mut() {
            attrs.grounded = false;
        }
        if let Some(surface) = land_on_platforms(entity, surfaces) {
            if entity.pos.y != entity.prev_pos.y {
                events.push(CollisionEvent::Landed {
                    entity: entity.id,
                    surface,
                });
            }
        }
    }
    events
}

/// Keep the player inside the world; a lethal floor ends the run
pub fn resolve_bounds(world: &mut World, floor_is_lethal: bool) -> Vec<CollisionEvent> {
    let bounds = world.bounds;
    let Some(player) = world.entities.player_mut() else {
        return Vec::new();
    };
    let contact = clamp_to_bounds(player, &bounds);
    if contact.floor && floor_is_lethal {
        vec![CollisionEvent::FellOut { entity: player.id }]
    } else {
        Vec::new()
    }
}

/// Player projectiles against damaging obstacles.
///
/// Each projectile takes out at most one target, the earliest inserted.
pub fn resolve_projectiles(world: &mut World) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    let projectiles: Vec<(EntityId, Rect)> = world
        .entities
        .live()
        .filter(|e| {
            matches!(&e.kind, EntityKind::Projectile(p) if p.faction == Faction::Player)
        })
        .map(|e| (e.id, e.bounds()))
        .collect();

    for (projectile, shot) in projectiles {
        let target = world.entities.live().find_map(|e| match &e.kind {
            EntityKind::Obstacle(o)
                if matches!(o.effect, HazardEffect::Damage { .. }) && e.bounds().overlaps(&shot) =>
            {
                Some((e.id, o.points))
            }
            _ => None,
        });
        if let Some((target, points)) = target {
            world.entities.kill(projectile);
            world.entities.kill(target);
            events.push(CollisionEvent::Destroyed {
                target,
                projectile,
                points,
            });
        }
    }
    events
}

/// What touching an entity means for the player
enum Contact {
    Hazard(HazardEffect),
    Pickup(CollectibleEffect),
}

fn contact_of(entity: &Entity) -> Option<Contact> {
    match &entity.kind {
        EntityKind::Obstacle(o) => Some(Contact::Hazard(o.effect)),
        EntityKind::Projectile(p) if p.faction == Faction::Hostile => {
            Some(Contact::Hazard(HazardEffect::Damage {
                amount: 1,
                consumed: true,
            }))
        }
        EntityKind::Collectible(c) => Some(Contact::Pickup(c.effect)),
        _ => None,
    }
}

/// Push the player one lane (or `distance` px) away from a hazard
fn deflect(player: &mut Entity, hazard: &Rect, lanes: Option<&LaneLayout>, distance: f32) {
    let away: i64 = if player.bounds().center().x < hazard.center().x {
        -1
    } else {
        1
    };
    match lanes {
        Some(lanes) => {
            let current = player
                .player_attrs()
                .and_then(|p| p.lane)
                .map(|l| l.index)
                .unwrap_or_else(|| lanes.lane_at(player.bounds().center().x));
            let last = lanes.last_lane() as i64;
            let mut target = current as i64 + away;
            if target < 0 || target > last {
                target = current as i64 - away;
            }
            set_lane(player, lanes, target.clamp(0, last) as usize);
        }
        None => {
            player.pos.x += away as f32 * distance;
            player.prev_pos.x = player.pos.x;
        }
    }
}

/// Player against hazards, hostile fire, pickups and goals
pub fn resolve_player(
    world: &mut World,
    player_cfg: &PlayerConfig,
    now: f64,
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    let Some(player_id) = world.entities.player_id() else {
        return events;
    };
    let lanes = world.lanes;
    let candidates: Vec<EntityId> = world
        .entities
        .live()
        .filter(|e| e.id != player_id)
        .map(|e| e.id)
        .collect();

    for id in candidates {
        let Some(player) = world.entities.get(player_id) else {
            break;
        };
        let player_bounds = player.bounds();
        let invulnerable = player
            .player_attrs()
            .is_some_and(|p| p.is_invulnerable(now));

        let Some(other) = world.entities.get(id) else {
            continue;
        };
        if !other.alive || !other.bounds().overlaps(&player_bounds) {
            continue;
        }
        let other_bounds = other.bounds();
        let Some(contact) = contact_of(other) else {
            continue;
        };

        match contact {
            Contact::Hazard(HazardEffect::Inert) => {}
            Contact::Hazard(HazardEffect::Damage { .. })
                if invulnerable && player_cfg.shield_clears_hazards =>
            {
                world.entities.kill(id);
                events.push(CollisionEvent::Shielded { hazard: id });
            }
            Contact::Hazard(_) if invulnerable => {}
            Contact::Hazard(HazardEffect::Damage { amount, consumed }) => {
                if consumed {
                    world.entities.kill(id);
                }
                if player_cfg.invulnerability_ms > 0.0 {
                    if let Some(attrs) = world
                        .entities
                        .get_mut(player_id)
                        .and_then(|p| p.player_attrs_mut())
                    {
                        attrs.invulnerable_until = now + player_cfg.invulnerability_ms;
                    }
                }
                events.push(CollisionEvent::Damaged { hazard: id, amount });
            }
            Contact::Hazard(HazardEffect::Deflect) => {
                if let Some(player) = world.entities.get_mut(player_id) {
                    deflect(
                        player,
                        &other_bounds,
                        lanes.as_ref(),
                        player_cfg.deflect_distance,
                    );
                }
                world.entities.kill(id);
                events.push(CollisionEvent::Deflected { hazard: id });
            }
            Contact::Pickup(CollectibleEffect::Goal) => {
                events.push(CollisionEvent::GoalReached { goal: id });
            }
            Contact::Pickup(effect) => {
                if let Some(attrs) = world
                    .entities
                    .get_mut(player_id)
                    .and_then(|p| p.player_attrs_mut())
                {
                    match effect {
                        CollectibleEffect::Shield { duration_ms } => {
                            attrs.invulnerable_until =
                                attrs.invulnerable_until.max(now + duration_ms);
                        }
                        CollectibleEffect::RapidFire { duration_ms } => {
                            attrs.rapid_fire_until = attrs.rapid_fire_until.max(now + duration_ms);
                        }
                        CollectibleEffect::Points(_) | CollectibleEffect::Goal => {}
                    }
                }
                world.entities.kill(id);
                events.push(CollisionEvent::Collected { item: id, effect });
            }
        }
    }
    events
}

/// Award scorable obstacles once the player's left edge reaches their right edge
pub fn resolve_passes(world: &mut World, points: u64) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    let Some(player_left) = world.entities.player().map(|p| p.bounds().left()) else {
        return events;
    };
    for entity in world.entities.iter_mut() {
        if !entity.alive {
            continue;
        }
        let right = entity.bounds().right();
        let id = entity.id;
        if let EntityKind::Obstacle(attrs) = &mut entity.kind {
            if attrs.scorable && !attrs.passed && player_left >= right {
                attrs.passed = true;
                events.push(CollisionEvent::Passed {
                    obstacle: id,
                    points,
                });
            }
        }
    }
    events
}

/// Remove entities that left the world; obstacles leaving through the bottom
/// report an escape when `escape_penalty` is set
pub fn resolve_offscreen(world: &mut World, escape_penalty: bool) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    let bounds = world.bounds;
    let keep_zone = bounds.expanded(OFFSCREEN_MARGIN);
    for entity in world.entities.iter_mut() {
        if !entity.alive || entity.class() == EntityClass::Player {
            continue;
        }
        let rect = entity.bounds();
        if entity.class() == EntityClass::Obstacle && rect.top() > bounds.bottom() {
            entity.alive = false;
            if escape_penalty {
                events.push(CollisionEvent::Escaped { entity: entity.id });
            }
        } else if !rect.overlaps(&keep_zone) {
            entity.alive = false;
        }
    }
    events
}

/// Run every pass in order
pub fn resolve(
    world: &mut World,
    player_cfg: &PlayerConfig,
    scoring: &ScoringConfig,
    now: f64,
) -> Vec<CollisionEvent> {
    let mut events = resolve_surfaces(world);
    events.extend(resolve_bounds(world, player_cfg.floor_is_lethal));
    events.extend(resolve_projectiles(world));
    events.extend(resolve_player(world, player_cfg, now));
    events.extend(resolve_passes(world, scoring.pass_points));
    events.extend(resolve_offscreen(world, scoring.escape_penalty));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games;
    use crate::sim::entity::{CollectibleAttrs, ObstacleAttrs, ProjectileAttrs};
    use crate::sim::physics::integrate;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn obstacle(x: f32, y: f32, w: f32, h: f32, effect: HazardEffect, scorable: bool) -> Entity {
        Entity::new(
            EntityKind::Obstacle(ObstacleAttrs {
                effect,
                scorable,
                passed: false,
                points: 10,
                fire_chance: 0.0,
                variant: "test".into(),
            }),
            Vec2::new(x, y),
            Vec2::new(w, h),
        )
    }

    fn lethal() -> HazardEffect {
        HazardEffect::Damage {
            amount: 1,
            consumed: true,
        }
    }

    fn platformer_world() -> (World, PlayerConfig) {
        let config = games::platformer::config();
        let mut world = World::from_config(&config.world);
        world.surfaces = vec![Surface::platform(0.0, 550.0, 800.0, 20.0)];
        (world, config.player)
    }

    #[test]
    fn test_falling_entity_lands_exactly() {
        let surfaces = [Surface::platform(0.0, 550.0, 800.0, 20.0)];
        let mut p = Entity::player(Vec2::new(100.0, 500.0), Vec2::new(30.0, 40.0));
        p.prev_pos = Vec2::new(100.0, 505.0);
        p.pos = Vec2::new(100.0, 512.0);
        p.vel.y = 7.0;

        assert_eq!(land_on_platforms(&mut p, &surfaces), Some(0));
        assert_eq!(p.bounds().bottom(), 550.0);
        assert_eq!(p.vel.y, 0.0);
        assert!(p.player_attrs().unwrap().grounded);
    }

    #[test]
    fn test_rising_entity_passes_through() {
        let surfaces = [Surface::platform(0.0, 450.0, 800.0, 20.0)];
        let mut p = Entity::player(Vec2::new(100.0, 430.0), Vec2::new(30.0, 40.0));
        p.prev_pos = Vec2::new(100.0, 442.0);
        p.vel.y = -12.0;
        assert_eq!(land_on_platforms(&mut p, &surfaces), None);
        assert_eq!(p.pos.y, 430.0);
    }

    #[test]
    fn test_entity_below_platform_is_not_caught() {
        // Was already below the top last tick: overlap alone does not land
        let surfaces = [Surface::platform(0.0, 450.0, 800.0, 20.0)];
        let mut p = Entity::player(Vec2::new(100.0, 425.0), Vec2::new(30.0, 40.0));
        p.prev_pos = Vec2::new(100.0, 420.0);
        p.vel.y = 5.0;
        assert_eq!(land_on_platforms(&mut p, &surfaces), None);
    }

    #[test]
    fn test_picks_highest_crossed_platform() {
        let surfaces = [
            Surface::platform(0.0, 560.0, 800.0, 20.0),
            Surface::platform(0.0, 545.0, 800.0, 10.0),
        ];
        let mut p = Entity::player(Vec2::new(100.0, 530.0), Vec2::new(30.0, 40.0));
        p.prev_pos = Vec2::new(100.0, 500.0);
        p.vel.y = 30.0;
        assert_eq!(land_on_platforms(&mut p, &surfaces), Some(1));
        assert_eq!(p.bounds().bottom(), 545.0);
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let surfaces = [Surface::platform(500.0, 550.0, 200.0, 20.0)];
        let mut p = Entity::player(Vec2::new(100.0, 515.0), Vec2::new(30.0, 40.0));
        p.prev_pos = Vec2::new(100.0, 505.0);
        p.vel.y = 10.0;
        assert_eq!(land_on_platforms(&mut p, &surfaces), None);
    }

    #[test]
    fn test_player_settles_on_floor_platform() {
        let surfaces = [Surface::platform(0.0, 550.0, 800.0, 20.0)];
        let mut p = Entity::player(Vec2::new(100.0, 500.0), Vec2::new(30.0, 40.0));
        for _ in 0..200 {
            integrate(&mut p, 0.5, None, 1.0, 1.0);
            land_on_platforms(&mut p, &surfaces);
        }
        assert_eq!(p.pos.y, 510.0);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn test_hazard_damages_and_is_consumed() {
        let (mut world, cfg) = platformer_world();
        world
            .entities
            .insert(Entity::player(Vec2::new(100.0, 510.0), Vec2::new(30.0, 40.0)));
        let hazard = world
            .entities
            .insert(obstacle(110.0, 520.0, 20.0, 20.0, lethal(), false));

        let events = resolve_player(&mut world, &cfg, 0.0);
        assert_eq!(events, vec![CollisionEvent::Damaged { hazard, amount: 1 }]);
        assert!(!world.entities.get(hazard).unwrap().alive);
    }

    #[test]
    fn test_invulnerability_window_blocks_second_hit() {
        let (mut world, mut cfg) = platformer_world();
        cfg.invulnerability_ms = 1400.0;
        world
            .entities
            .insert(Entity::player(Vec2::new(100.0, 510.0), Vec2::new(30.0, 40.0)));
        let first = world
            .entities
            .insert(obstacle(110.0, 520.0, 20.0, 20.0, lethal(), false));
        let second = world.entities.insert(obstacle(
            105.0,
            515.0,
            20.0,
            20.0,
            HazardEffect::Damage {
                amount: 1,
                consumed: false,
            },
            false,
        ));

        let events = resolve_player(&mut world, &cfg, 1000.0);
        assert_eq!(
            events,
            vec![CollisionEvent::Damaged {
                hazard: first,
                amount: 1
            }]
        );
        // Still overlapping a few ticks later: ignored
        assert!(resolve_player(&mut world, &cfg, 1100.0).is_empty());
        assert!(world.entities.get(second).unwrap().alive);
        // Window over
        assert_eq!(
            resolve_player(&mut world, &cfg, 2400.0),
            vec![CollisionEvent::Damaged {
                hazard: second,
                amount: 1
            }]
        );
    }

    #[test]
    fn test_shield_clears_damaging_contacts() {
        let (mut world, mut cfg) = platformer_world();
        cfg.shield_clears_hazards = true;
        world
            .entities
            .insert(Entity::player(Vec2::new(100.0, 510.0), Vec2::new(30.0, 40.0)));
        world
            .entities
            .player_mut()
            .and_then(|p| p.player_attrs_mut())
            .unwrap()
            .invulnerable_until = 5000.0;
        let enemy = world.entities.insert(obstacle(
            110.0,
            520.0,
            20.0,
            20.0,
            HazardEffect::Damage {
                amount: 1,
                consumed: false,
            },
            false,
        ));
        let oil = world
            .entities
            .insert(obstacle(100.0, 515.0, 20.0, 20.0, HazardEffect::Deflect, false));

        let events = resolve_player(&mut world, &cfg, 1000.0);
        assert_eq!(events, vec![CollisionEvent::Shielded { hazard: enemy }]);
        assert!(!world.entities.get(enemy).unwrap().alive);
        // Non-damaging hazards are still ignored while shielded
        assert!(world.entities.get(oil).unwrap().alive);
    }

    #[test]
    fn test_deflect_moves_player_one_lane_away() {
        let config = games::racer::config();
        let mut world = World::from_config(&config.world);
        let lanes = world.lanes.unwrap();
        let mut player = Entity::player(Vec2::ZERO, config.player.size).with_gravity_scale(0.0);
        set_lane(&mut player, &lanes, 1);
        player.pos.y = 480.0;
        let px = player.pos.x;
        world.entities.insert(player);

        // Oil slightly right of the player's centre pushes left
        let oil = world.entities.insert(obstacle(
            px + 5.0,
            490.0,
            35.0,
            35.0,
            HazardEffect::Deflect,
            false,
        ));
        let events = resolve_player(&mut world, &config.player, 0.0);
        assert_eq!(events, vec![CollisionEvent::Deflected { hazard: oil }]);
        let player = world.entities.player().unwrap();
        assert_eq!(player.player_attrs().unwrap().lane.unwrap().index, 0);
        assert_eq!(player.pos.x, lanes.lane_x(0, player.size.x));
    }

    #[test]
    fn test_pickups_apply_effects() {
        let (mut world, cfg) = platformer_world();
        world
            .entities
            .insert(Entity::player(Vec2::new(100.0, 510.0), Vec2::new(30.0, 40.0)));
        let shield = world.entities.insert(Entity::new(
            EntityKind::Collectible(CollectibleAttrs {
                effect: CollectibleEffect::Shield { duration_ms: 5000.0 },
                variant: "shield".into(),
            }),
            Vec2::new(100.0, 510.0),
            Vec2::splat(20.0),
        ));
        let events = resolve_player(&mut world, &cfg, 100.0);
        assert!(matches!(events[0], CollisionEvent::Collected { item, .. } if item == shield));
        let attrs = world.entities.player().unwrap().player_attrs().unwrap().clone();
        assert!(attrs.is_invulnerable(5000.0));
        assert!(!attrs.is_invulnerable(5100.0));
    }

    #[test]
    fn test_goal_contact() {
        let (mut world, cfg) = platformer_world();
        world
            .entities
            .insert(Entity::player(Vec2::new(650.0, 100.0), Vec2::new(30.0, 40.0)));
        let goal = world.entities.insert(Entity::new(
            EntityKind::Collectible(CollectibleAttrs {
                effect: CollectibleEffect::Goal,
                variant: "goal".into(),
            }),
            Vec2::new(650.0, 100.0),
            Vec2::new(30.0, 40.0),
        ));
        assert_eq!(
            resolve_player(&mut world, &cfg, 0.0),
            vec![CollisionEvent::GoalReached { goal }]
        );
    }

    #[test]
    fn test_pass_scores_once_at_trailing_edge() {
        let (mut world, _) = platformer_world();
        world.surfaces.clear();
        world
            .entities
            .insert(Entity::player(Vec2::new(150.0, 300.0), Vec2::new(30.0, 40.0)));
        let pipe = world
            .entities
            .insert(obstacle(200.0, 0.0, 60.0, 200.0, HazardEffect::Inert, true));

        let mut total = 0;
        for step in 0..40 {
            let x = 150.0 + step as f32 * 5.0;
            world.entities.player_mut().unwrap().pos.x = x;
            let events = resolve_passes(&mut world, 1);
            if x < 260.0 {
                assert!(events.is_empty(), "scored early at x={x}");
            }
            total += events.len();
        }
        assert_eq!(total, 1);
        match &world.entities.get(pipe).unwrap().kind {
            EntityKind::Obstacle(o) => assert!(o.passed),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_projectile_destroys_one_target() {
        let (mut world, _) = platformer_world();
        let a = world
            .entities
            .insert(obstacle(100.0, 100.0, 30.0, 30.0, lethal(), false));
        let b = world
            .entities
            .insert(obstacle(100.0, 100.0, 30.0, 30.0, lethal(), false));
        let shot = world.entities.insert(Entity::new(
            EntityKind::Projectile(ProjectileAttrs {
                faction: Faction::Player,
            }),
            Vec2::new(110.0, 110.0),
            Vec2::new(4.0, 10.0),
        ));

        let events = resolve_projectiles(&mut world);
        assert_eq!(
            events,
            vec![CollisionEvent::Destroyed {
                target: a,
                projectile: shot,
                points: 10
            }]
        );
        assert!(world.entities.get(b).unwrap().alive);
    }

    #[test]
    fn test_hostile_projectile_hurts_player() {
        let (mut world, cfg) = platformer_world();
        world
            .entities
            .insert(Entity::player(Vec2::new(100.0, 510.0), Vec2::new(30.0, 40.0)));
        let shot = world.entities.insert(Entity::new(
            EntityKind::Projectile(ProjectileAttrs {
                faction: Faction::Hostile,
            }),
            Vec2::new(110.0, 520.0),
            Vec2::new(4.0, 10.0),
        ));
        assert_eq!(
            resolve_player(&mut world, &cfg, 0.0),
            vec![CollisionEvent::Damaged {
                hazard: shot,
                amount: 1
            }]
        );
    }

    #[test]
    fn test_escape_and_offscreen_cleanup() {
        let (mut world, _) = platformer_world();
        let escaped = world
            .entities
            .insert(obstacle(100.0, 601.0, 30.0, 30.0, lethal(), false));
        let gone = world.entities.insert(obstacle(-500.0, 100.0, 30.0, 30.0, lethal(), false));
        let entering = world
            .entities
            .insert(obstacle(100.0, -50.0, 30.0, 30.0, lethal(), false));

        let events = resolve_offscreen(&mut world, true);
        assert_eq!(events, vec![CollisionEvent::Escaped { entity: escaped }]);
        assert!(!world.entities.get(gone).unwrap().alive);
        assert!(world.entities.get(entering).unwrap().alive);
    }

    proptest! {
        #[test]
        fn pass_scoring_is_at_most_once_per_obstacle(
            xs in prop::collection::vec(0.0f32..500.0, 1..80),
            obstacle_xs in prop::collection::vec(50.0f32..400.0, 1..5),
        ) {
            let (mut world, _) = platformer_world();
            world.surfaces.clear();
            world
                .entities
                .insert(Entity::player(Vec2::new(0.0, 300.0), Vec2::new(30.0, 40.0)));
            let obstacles: Vec<(EntityId, f32)> = obstacle_xs
                .iter()
                .map(|&x| {
                    let id = world
                        .entities
                        .insert(obstacle(x, 280.0, 60.0, 80.0, HazardEffect::Inert, true));
                    (id, x + 60.0)
                })
                .collect();

            let mut passes: HashMap<EntityId, usize> = HashMap::new();
            for &x in &xs {
                world.entities.player_mut().unwrap().pos.x = x;
                for event in resolve_passes(&mut world, 1) {
                    if let CollisionEvent::Passed { obstacle, .. } = event {
                        *passes.entry(obstacle).or_default() += 1;
                    }
                }
            }

            let furthest = xs.iter().cloned().fold(f32::MIN, f32::max);
            for (id, right) in obstacles {
                let count = passes.get(&id).copied().unwrap_or(0);
                prop_assert!(count <= 1);
                prop_assert_eq!(count == 1, furthest >= right);
            }
        }
    }
}
