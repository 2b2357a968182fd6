//! Entities and their kind-specific payloads

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Stable entity identity (allocated in increasing order, never reused)
pub type EntityId = u32;

/// Payload-free kind tag, used for spawn ceilings and population counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    Player,
    Obstacle,
    Collectible,
    Projectile,
}

/// Which side a projectile was fired by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
}

/// What touching an obstacle does to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardEffect {
    /// Costs `amount` lives; the obstacle is removed on contact when `consumed`
    Damage { amount: u32, consumed: bool },
    /// Pushes the player aside without damage (oil slick); always consumed
    Deflect,
    /// Decoration or pass-only marker; never collides
    Inert,
}

/// What picking up a collectible does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollectibleEffect {
    Points(u64),
    /// Opens an invulnerability window
    Shield { duration_ms: f64 },
    /// Shortens the fire cooldown for a while
    RapidFire { duration_ms: f64 },
    /// Completes the level
    Goal,
}

/// Discrete lane position with its input lock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneState {
    pub index: usize,
    /// Lane changes are ignored until the clock reaches this time
    pub locked_until: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttrs {
    pub grounded: bool,
    pub climbing: bool,
    pub lane: Option<LaneState>,
    /// Hazard contacts are ignored while the clock is below this
    pub invulnerable_until: f64,
    pub rapid_fire_until: f64,
    pub last_fire_ms: Option<f64>,
    /// -1.0 facing left, 1.0 facing right
    pub facing: f32,
    pub anim_frame: u8,
    pub anim_ticks: u32,
}

impl Default for PlayerAttrs {
    fn default() -> Self {
        Self {
            grounded: false,
            climbing: false,
            lane: None,
            invulnerable_until: 0.0,
            rapid_fire_until: 0.0,
            last_fire_ms: None,
            facing: 1.0,
            anim_frame: 0,
            anim_ticks: 0,
        }
    }
}

impl PlayerAttrs {
    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invulnerable_until
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleAttrs {
    pub effect: HazardEffect,
    /// Awards pass points once the player gets past it
    pub scorable: bool,
    /// Set the first time the player gets past; never cleared
    pub passed: bool,
    /// Points for destroying it with a projectile
    pub points: u64,
    /// Per-tick chance of firing a hostile projectile
    pub fire_chance: f32,
    /// Template name (cosmetic)
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleAttrs {
    pub effect: CollectibleEffect,
    pub variant: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileAttrs {
    pub faction: Faction,
}

/// Tagged entity kind with its attribute payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player(PlayerAttrs),
    Obstacle(ObstacleAttrs),
    Collectible(CollectibleAttrs),
    Projectile(ProjectileAttrs),
}

impl EntityKind {
    pub fn class(&self) -> EntityClass {
        match self {
            EntityKind::Player(_) => EntityClass::Player,
            EntityKind::Obstacle(_) => EntityClass::Obstacle,
            EntityKind::Collectible(_) => EntityClass::Collectible,
            EntityKind::Projectile(_) => EntityClass::Projectile,
        }
    }
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Position before the last integration step (for crossing tests)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Multiplier on world gravity (0 for scrollers and projectiles)
    pub gravity_scale: f32,
    /// Displacement is scaled by the world scroll speed
    pub scrolls: bool,
    pub alive: bool,
}

impl Entity {
    /// Build an entity; the store assigns the id on insertion
    pub fn new(kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id: 0,
            kind,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            size,
            gravity_scale: 0.0,
            scrolls: false,
            alive: true,
        }
    }

    pub fn player(pos: Vec2, size: Vec2) -> Self {
        let mut entity = Self::new(EntityKind::Player(PlayerAttrs::default()), pos, size);
        entity.gravity_scale = 1.0;
        entity
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn scrolling(mut self, scrolls: bool) -> Self {
        self.scrolls = scrolls;
        self
    }

    pub fn class(&self) -> EntityClass {
        self.kind.class()
    }

    /// Current bounding box
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Bounding box before the last integration step
    pub fn prev_bounds(&self) -> Rect {
        Rect::from_pos_size(self.prev_pos, self.size)
    }

    pub fn player_attrs(&self) -> Option<&PlayerAttrs> {
        match &self.kind {
            EntityKind::Player(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn player_attrs_mut(&mut self) -> Option<&mut PlayerAttrs> {
        match &mut self.kind {
            EntityKind::Player(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Place the entity without leaving a crossing trail
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev_pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults() {
        let player = Entity::player(Vec2::new(100.0, 500.0), Vec2::new(30.0, 40.0));
        assert_eq!(player.class(), EntityClass::Player);
        assert_eq!(player.gravity_scale, 1.0);
        assert!(player.alive);
        assert_eq!(player.bounds(), Rect::new(100.0, 500.0, 30.0, 40.0));
        assert!(!player.player_attrs().unwrap().is_invulnerable(0.0));
    }

    #[test]
    fn test_teleport_resets_previous_position() {
        let mut entity = Entity::player(Vec2::ZERO, Vec2::splat(10.0));
        entity.pos = Vec2::new(5.0, 5.0);
        entity.teleport(Vec2::new(50.0, 60.0));
        assert_eq!(entity.prev_pos, entity.pos);
    }
}
