//! Game state: configuration, session, world and RNG for one game
//!
//! Everything a tick reads or writes hangs off `GameState`, and two states
//! built from the same config and seed stay identical under identical input.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{CollectibleAttrs, CollectibleEffect, Entity, EntityId, EntityKind};
use super::physics::set_lane;
use super::rect::Rect;
use super::session::{Session, SessionState};
use super::spawner::spawn_all;
use super::world::{Surface, World};
use crate::config::GameConfig;
use crate::error::{ConfigError, TransitionError};

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub session: Session,
    pub world: World,
    rng: Pcg32,
}

/// Read-only view handed to the renderer once per frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub bounds: Rect,
    pub surfaces: &'a [Surface],
    pub entities: &'a [Entity],
    pub session: &'a Session,
    pub scroll_speed: f32,
}

impl GameState {
    /// Build a game from a config; invalid configs are refused
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config
            .validate()
            .inspect_err(|err| log::warn!("Rejected config '{}': {}", config.name, err))?;
        let mut state = Self {
            seed,
            session: Session::new(&config.session),
            world: World::from_config(&config.world),
            rng: Pcg32::seed_from_u64(seed),
            config,
        };
        state.setup_level();
        log::info!("Created '{}' (seed {})", state.config.name, seed);
        Ok(state)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Run every spawn rule against the session clock
    pub(crate) fn run_spawners(&mut self, now: f64) -> Vec<EntityId> {
        spawn_all(
            &self.config.spawns,
            &mut self.session.spawn_clocks,
            &mut self.world,
            &mut self.rng,
            now,
        )
    }

    /// Clear the world and place the player (and goal) for the current level
    fn setup_level(&mut self) {
        self.world.entities.clear();
        self.world.surfaces = self.config.world.surfaces.clone();
        self.world.scroll_speed = self
            .config
            .world
            .scroll
            .map(|s| s.initial_speed)
            .unwrap_or(1.0);

        let player = self.spawn_player_entity();
        self.world.entities.insert(player);

        if let Some(goal) = &self.config.goal {
            self.world.entities.insert(Entity::new(
                EntityKind::Collectible(CollectibleAttrs {
                    effect: CollectibleEffect::Goal,
                    variant: "goal".into(),
                }),
                goal.rect.position(),
                goal.rect.size(),
            ));
        }
        self.session.reset_spawn_clocks(&self.config.spawns);
    }

    fn spawn_player_entity(&self) -> Entity {
        let cfg = &self.config.player;
        let mut player = Entity::player(cfg.spawn, cfg.size);
        if let Some(lanes) = &self.world.lanes {
            set_lane(&mut player, lanes, lanes.count / 2);
        }
        player
    }

    /// Start a fresh run from `NotStarted` or `GameOver`
    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.session.state == SessionState::GameOver {
            self.session.reset();
        }
        self.session.start()?;
        self.setup_level();
        Ok(())
    }

    /// Move from `LevelComplete` to the next level
    pub fn advance_level(&mut self) -> Result<(), TransitionError> {
        self.session.advance_level()?;
        self.setup_level();
        Ok(())
    }

    /// Explicit reset back to `NotStarted` with level-1 defaults
    pub fn reset(&mut self) {
        self.session.reset();
        self.setup_level();
    }

    /// Put the player back on its spawn point after a non-fatal hit
    pub fn respawn_player(&mut self) {
        let fresh = self.spawn_player_entity();
        if let Some(player) = self.world.entities.player_mut() {
            player.teleport(fresh.pos);
            player.vel = Vec2::ZERO;
            if let (Some(attrs), Some(fresh_attrs)) =
                (player.player_attrs_mut(), fresh.player_attrs())
            {
                attrs.grounded = false;
                attrs.climbing = false;
                if fresh_attrs.lane.is_some() {
                    attrs.lane = fresh_attrs.lane;
                }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            bounds: self.world.bounds,
            surfaces: &self.world.surfaces,
            entities: self.world.entities.as_slice(),
            session: &self.session,
            scroll_speed: self.world.scroll_speed,
        }
    }
}
