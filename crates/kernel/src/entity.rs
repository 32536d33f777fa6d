use glam::Vec2;
use serde::{Deserialize, Serialize};
use tileworld_common::{Aabb, EntityId, PhysicsConfig, PlayerIntent, ResourceDescriptor};

use crate::collision;
use crate::grid::TileGrid;

/// Size of a dropped item in world pixels.
pub const DROP_SIZE: Vec2 = Vec2::new(1.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Drop,
}

/// Whether an entity survives the step it just took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Alive,
    Terminal,
}

/// A free-moving body with position and velocity in world pixels.
///
/// The id is assigned by the world when the entity is added; before that it
/// is `EntityId(0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner.
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub grounded_ticks: u32,
    pub age: u32,
    /// The item a drop carries. Always `None` for players.
    pub carried: Option<ResourceDescriptor>,
}

impl Entity {
    pub fn player(position: Vec2, size: Vec2) -> Self {
        Self {
            id: EntityId(0),
            kind: EntityKind::Player,
            position,
            velocity: Vec2::ZERO,
            size,
            grounded_ticks: 0,
            age: 0,
            carried: None,
        }
    }

    pub fn drop(position: Vec2, velocity: Vec2, resource: ResourceDescriptor) -> Self {
        Self {
            id: EntityId(0),
            kind: EntityKind::Drop,
            position,
            velocity,
            size: DROP_SIZE,
            grounded_ticks: 0,
            age: 0,
            carried: Some(resource),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded_ticks > 0
    }

    /// Player control hook, run before the physics step.
    pub fn apply_intent(&mut self, intent: &PlayerIntent, physics: &PhysicsConfig) {
        let accel = if self.is_grounded() {
            physics.ground_accel
        } else {
            physics.air_accel
        };
        if intent.move_left {
            self.velocity.x -= accel;
        }
        if intent.move_right {
            self.velocity.x += accel;
        }
        if intent.jump && self.is_grounded() {
            self.velocity.y -= physics.jump_impulse;
        }
    }

    /// Advance one step against `grid`.
    pub fn step(&mut self, grid: &TileGrid, physics: &PhysicsConfig) -> StepOutcome {
        collision::resolve(self, grid, physics);
        self.age = self.age.saturating_add(1);
        match (self.kind, physics.max_drop_age) {
            (EntityKind::Drop, Some(max)) if self.age >= max => StepOutcome::Terminal,
            _ => StepOutcome::Alive,
        }
    }
}
