//! Shape generation for 2D primitives
//!
//! Everything on screen is an axis-aligned box, so the renderer only ever
//! needs colored quads in world coordinates.

use super::vertex::{Vertex, colors};
use crate::sim::entity::{CollectibleEffect, Entity, EntityKind, Faction, HazardEffect};
use crate::sim::rect::Rect;
use crate::sim::state::Snapshot;
use crate::sim::world::SurfaceKind;

/// Ticks per half blink of an invulnerable player (12 ticks ≈ 200ms)
const BLINK_TICKS: u64 = 12;

/// Two triangles covering `rect`
pub fn rect(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (l, r, t, b) = (rect.left(), rect.right(), rect.top(), rect.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
    ]
}

fn entity_color(entity: &Entity) -> [f32; 4] {
    match &entity.kind {
        EntityKind::Player(_) => colors::PLAYER,
        EntityKind::Obstacle(o) => match (o.effect, o.variant.as_str()) {
            (HazardEffect::Deflect, _) => colors::OIL,
            (_, "barrel") => colors::BARREL,
            (_, "pipe") => colors::PIPE,
            (_, "truck") => colors::TRUCK,
            _ => colors::HAZARD,
        },
        EntityKind::Collectible(c) => match c.effect {
            CollectibleEffect::Goal => colors::GOAL,
            CollectibleEffect::RapidFire { .. } => colors::RAPID_FIRE,
            CollectibleEffect::Shield { .. } => colors::SHIELD,
            CollectibleEffect::Points(_) => colors::POINTS,
        },
        EntityKind::Projectile(p) => match p.faction {
            Faction::Player => colors::PLAYER_SHOT,
            Faction::Hostile => colors::HOSTILE_SHOT,
        },
    }
}

/// Hidden on alternate blink phases while invulnerable
fn blinked_out(entity: &Entity, now_ms: f64, frame: u64) -> bool {
    entity
        .player_attrs()
        .is_some_and(|p| p.is_invulnerable(now_ms) && (frame / BLINK_TICKS) % 2 == 1)
}

/// Build the frame's vertices: surfaces first, then live entities in id order
pub fn snapshot_vertices(snapshot: &Snapshot<'_>) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((snapshot.surfaces.len() + snapshot.entities.len()) * 6);

    for surface in snapshot.surfaces {
        let color = match surface.kind {
            SurfaceKind::Platform => colors::PLATFORM,
            SurfaceKind::Ladder => colors::LADDER,
        };
        vertices.extend(rect(&surface.rect, color));
    }

    let now = snapshot.session.elapsed_ms;
    let frame = snapshot.session.frame;
    for entity in snapshot.entities.iter().filter(|e| e.alive) {
        if blinked_out(entity, now, frame) {
            continue;
        }
        vertices.extend(rect(&entity.bounds(), entity_color(entity)));
    }
    vertices
}
