//! The playfield: bounds, static surfaces, lanes and the entity store

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::store::EntityStore;
use crate::config::WorldConfig;

/// Static surface type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Solid from above; entities falling onto it land
    Platform,
    /// Climbable while overlapped; never blocks
    Ladder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub rect: Rect,
    pub kind: SurfaceKind,
}

impl Surface {
    pub const fn platform(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            kind: SurfaceKind::Platform,
        }
    }

    pub const fn ladder(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            kind: SurfaceKind::Ladder,
        }
    }
}

/// Evenly spaced vertical lanes (racer road)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    /// Left edge of lane 0
    pub origin_x: f32,
    pub lane_width: f32,
    pub count: usize,
}

impl LaneLayout {
    /// Left x that centres an entity of `width` in `lane`
    pub fn lane_x(&self, lane: usize, width: f32) -> f32 {
        self.origin_x + lane as f32 * self.lane_width + (self.lane_width - width) * 0.5
    }

    /// Lane containing the given x (clamped to the road)
    pub fn lane_at(&self, x: f32) -> usize {
        let raw = ((x - self.origin_x) / self.lane_width).floor();
        (raw.max(0.0) as usize).min(self.count.saturating_sub(1))
    }

    pub fn last_lane(&self) -> usize {
        self.count.saturating_sub(1)
    }
}

/// World state owned by a running game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub bounds: Rect,
    /// Immutable for the duration of a level
    pub surfaces: Vec<Surface>,
    pub gravity: f32,
    pub max_fall_speed: Option<f32>,
    pub lanes: Option<LaneLayout>,
    /// Multiplier on the displacement of scrolling entities
    pub scroll_speed: f32,
    pub entities: EntityStore,
}

impl World {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            bounds: config.bounds,
            surfaces: config.surfaces.clone(),
            gravity: config.gravity,
            max_fall_speed: config.max_fall_speed,
            lanes: config.lanes,
            scroll_speed: config.scroll.map(|s| s.initial_speed).unwrap_or(1.0),
            entities: EntityStore::new(),
        }
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces
            .iter()
            .filter(|s| s.kind == SurfaceKind::Platform)
    }

    pub fn ladders(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter().filter(|s| s.kind == SurfaceKind::Ladder)
    }
}
