//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod physics;
pub mod rect;
pub mod scheduler;
pub mod session;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;
pub mod world;

pub use collision::CollisionEvent;
pub use entity::{Entity, EntityClass, EntityId, EntityKind};
pub use rect::Rect;
pub use scheduler::{FrameReport, Scheduler};
pub use session::{Session, SessionState};
pub use spawner::{SpawnRule, maybe_spawn};
pub use state::{GameState, Snapshot};
pub use store::EntityStore;
pub use tick::{TickInput, tick};
pub use world::World;
