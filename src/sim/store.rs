//! Ordered entity storage
//!
//! Entities live in a Vec kept in id order, which is also insertion order.
//! Nothing is removed while a pass is iterating: passes clear `alive`, and
//! `sweep` drops the dead in one go at the end of the tick.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityClass, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Insert an entity, assigning it a fresh id
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        // Ids are strictly increasing along the Vec
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// All entities, dead ones included, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Live entities in insertion order
    pub fn live(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Ids of live entities of one class, captured up front so callers can
    /// mutate the store while walking them
    pub fn live_ids(&self, class: EntityClass) -> Vec<EntityId> {
        self.live()
            .filter(|e| e.class() == class)
            .map(|e| e.id)
            .collect()
    }

    /// Number of live entities of a class
    pub fn count_live(&self, class: EntityClass) -> usize {
        self.live().filter(|e| e.class() == class).count()
    }

    /// The first live player entity
    pub fn player(&self) -> Option<&Entity> {
        self.live().find(|e| e.class() == EntityClass::Player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.alive && e.class() == EntityClass::Player)
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player().map(|e| e.id)
    }

    /// Mark an entity dead; returns false if it was already dead or missing
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.alive => {
                entity.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Remove every dead entity, returning how many were dropped
    pub fn sweep(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.alive);
        before - self.entities.len()
    }

    /// Remove all entities (ids keep increasing)
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
