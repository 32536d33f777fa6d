//! Tile collision detection and resolution for a single moving box.
//!
//! Detection scans a window of tiles around the entity and tests three
//! shifted copies of its box against every solid tile: horizontal velocity
//! only, vertical velocity only, and full velocity. When several tiles
//! collide on the same axis the last one in scan order (ascending x, then
//! ascending y) is the contact, not the nearest.

use glam::Vec2;
use tileworld_common::{Aabb, PhysicsConfig, TILE_HEIGHT, TILE_WIDTH, TileRect, tile_of};

use crate::entity::Entity;
use crate::grid::TileGrid;

/// Steps an entity stays grounded after its last downward contact.
pub const GROUNDED_RECOVERY_TICKS: u32 = 3;
/// Horizontal velocity multiplier per step while grounded.
pub const GROUND_FRICTION: f32 = 0.8;
/// Horizontal velocity multiplier per step while airborne.
pub const AIR_DRAG: f32 = 0.97;

/// Result of one detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contacts {
    /// Last tile hit by the horizontally shifted box.
    pub horizontal: Option<Aabb>,
    /// Last tile hit by the vertically shifted box.
    pub vertical: Option<Aabb>,
    /// The fully shifted box hit at least one tile.
    pub any: bool,
}

/// Tiles examined for an entity box at `position` with `size`.
pub fn scan_window(position: Vec2, size: Vec2, expanse: f32, grid: &TileGrid) -> TileRect {
    let reach_x = ((size.x * expanse / TILE_WIDTH as f32).ceil() as i32).max(1);
    let reach_y = ((size.y * expanse / TILE_HEIGHT as f32).ceil() as i32).max(1);
    TileRect::spanning(tile_of(position), (reach_x, reach_y)).clamp_to(grid.width(), grid.height())
}

pub fn detect(bounds: Aabb, velocity: Vec2, grid: &TileGrid, physics: &PhysicsConfig) -> Contacts {
    let window = scan_window(bounds.min, bounds.size, physics.collision_expanse, grid);
    let horizontal = bounds.translated(Vec2::new(velocity.x, 0.0));
    let vertical = bounds.translated(Vec2::new(0.0, velocity.y));
    let full = bounds.translated(velocity);
    let hits = |a: &Aabb, tile: &Aabb| {
        if physics.inclusive_contact {
            tile.intersects_closed(a)
        } else {
            tile.intersects_open(a)
        }
    };

    let mut contacts = Contacts::default();
    for (x, y, tile) in grid.iter_window(window) {
        if !tile.is_solid() {
            continue;
        }
        let rect = Aabb::tile(x, y);
        if hits(&horizontal, &rect) {
            contacts.horizontal = Some(rect);
        }
        if hits(&vertical, &rect) {
            contacts.vertical = Some(rect);
        }
        if hits(&full, &rect) {
            contacts.any = true;
        }
    }
    contacts
}

/// Detect, snap, integrate and damp. Everything in one entity step except
/// the age bookkeeping.
pub fn resolve(entity: &mut Entity, grid: &TileGrid, physics: &PhysicsConfig) -> Contacts {
    let contacts = detect(entity.bounds(), entity.velocity, grid, physics);

    entity.grounded_ticks = entity.grounded_ticks.saturating_sub(1);

    if contacts.any {
        if let Some(tile) = contacts.horizontal {
            if entity.velocity.x < 0.0 {
                entity.position.x = tile.right();
            } else if entity.velocity.x > 0.0 {
                entity.position.x = tile.left() - entity.size.x;
            }
            entity.velocity.x = 0.0;
        }
        if let Some(tile) = contacts.vertical {
            if entity.velocity.y < 0.0 {
                entity.position.y = tile.bottom();
            } else if entity.velocity.y > 0.0 {
                entity.position.y = tile.top() - entity.size.y;
                entity.grounded_ticks = GROUNDED_RECOVERY_TICKS;
            }
            entity.velocity.y = 0.0;
        }
    }

    entity.position += entity.velocity;
    entity.velocity.y += physics.gravity;
    entity.velocity.x *= if entity.grounded_ticks > 0 {
        GROUND_FRICTION
    } else {
        AIR_DRAG
    };
    contacts
}
