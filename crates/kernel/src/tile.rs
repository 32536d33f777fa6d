//! Materials and their behaviour table.
//!
//! Each [`Material`] maps to one static [`Behavior`] record. Behaviour
//! functions never touch the world directly: `update` returns a replacement
//! tile and `remove` returns the drop to spawn, and the world applies both.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tileworld_assets::ids;
use tileworld_common::{MaterialClass, ResourceId, RngExt, WorldRng, tile_center};

use crate::grid::TileGrid;

/// Chance denominator for grass dying under a solid tile, per update call.
pub const GRASS_DEATH_CHANCE: i32 = 500;
/// Chance denominator for dirt growing grass under open air, per update call.
pub const GRASS_GROWTH_CHANCE: i32 = 1500;

/// Closed set of materials a cell can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Empty,
    Dirt,
    Grass,
    Stone,
    WoodPlanks,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Empty,
        Material::Dirt,
        Material::Grass,
        Material::Stone,
        Material::WoodPlanks,
    ];

    /// Numeric material id. 0 is always empty.
    pub const fn id(self) -> u8 {
        match self {
            Material::Empty => 0,
            Material::Dirt => 1,
            Material::Grass => 2,
            Material::Stone => 3,
            Material::WoodPlanks => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Material> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Material::Empty => "Air",
            Material::Dirt => "Dirt",
            Material::Grass => "Grass",
            Material::Stone => "Stone",
            Material::WoodPlanks => "Wood Planks",
        }
    }

    pub fn behavior(self) -> &'static Behavior {
        match self {
            Material::Empty => &EMPTY,
            Material::Dirt => &DIRT,
            Material::Grass => &GRASS,
            Material::Stone => &STONE,
            Material::WoodPlanks => &WOOD_PLANKS,
        }
    }
}

/// Periodic self-update. Returns the tile that should replace `(x, y)`, if any.
pub type UpdateFn = fn(grid: &TileGrid, rng: &mut WorldRng, x: i32, y: i32) -> Option<Tile>;

/// Removal effect. Returns the drop to spawn for the tile at `(x, y)`, if any.
pub type RemoveFn = fn(rng: &mut WorldRng, x: i32, y: i32) -> Option<DropSpec>;

/// Per-material constants and behaviour functions.
pub struct Behavior {
    pub solid: bool,
    pub health: i32,
    pub class: MaterialClass,
    pub update: UpdateFn,
    pub remove: RemoveFn,
}

static EMPTY: Behavior = Behavior {
    solid: false,
    health: 1,
    class: MaterialClass::None,
    update: inert,
    remove: no_drop,
};

static DIRT: Behavior = Behavior {
    solid: true,
    health: 12,
    class: MaterialClass::Soft,
    update: dirt_update,
    remove: drop_dirt,
};

static GRASS: Behavior = Behavior {
    solid: true,
    health: 15,
    class: MaterialClass::Soft,
    update: grass_update,
    remove: drop_dirt,
};

static STONE: Behavior = Behavior {
    solid: true,
    health: 30,
    class: MaterialClass::Hard,
    update: inert,
    remove: drop_rock_shards,
};

static WOOD_PLANKS: Behavior = Behavior {
    solid: true,
    health: 25,
    class: MaterialClass::Wood,
    update: inert,
    remove: drop_wood_plank,
};

/// One grid cell. Tiles have no identity beyond their position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub material: Material,
    pub health: i32,
    /// Auxiliary per-tile payload (growth state and similar).
    pub data: i32,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        material: Material::Empty,
        health: 1,
        data: 0,
    };

    /// A fresh tile of `material` at full health.
    pub fn new(material: Material) -> Self {
        Self {
            material,
            health: material.behavior().health,
            data: 0,
        }
    }

    pub fn with_data(self, data: i32) -> Self {
        Self { data, ..self }
    }

    pub fn id(&self) -> u8 {
        self.material.id()
    }

    pub fn is_empty(&self) -> bool {
        self.id() == 0
    }

    pub fn is_solid(&self) -> bool {
        self.material.behavior().solid
    }

    pub fn class(&self) -> MaterialClass {
        self.material.behavior().class
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A drop to be spawned by the world after a removal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropSpec {
    pub position: Vec2,
    pub velocity: Vec2,
    pub resource: ResourceId,
}

fn inert(_grid: &TileGrid, _rng: &mut WorldRng, _x: i32, _y: i32) -> Option<Tile> {
    None
}

/// Grass dies back to dirt once something solid covers it.
fn grass_update(grid: &TileGrid, rng: &mut WorldRng, x: i32, y: i32) -> Option<Tile> {
    if grid.get(x, y - 1).is_solid() && rng.one_in(GRASS_DEATH_CHANCE) {
        Some(Tile::new(Material::Dirt))
    } else {
        None
    }
}

/// Dirt under open air occasionally grows grass.
fn dirt_update(grid: &TileGrid, rng: &mut WorldRng, x: i32, y: i32) -> Option<Tile> {
    if rng.one_in(GRASS_GROWTH_CHANCE) && !grid.get(x, y - 1).is_solid() {
        Some(Tile::new(Material::Grass))
    } else {
        None
    }
}

fn no_drop(_rng: &mut WorldRng, _x: i32, _y: i32) -> Option<DropSpec> {
    None
}

fn drop_dirt(rng: &mut WorldRng, x: i32, y: i32) -> Option<DropSpec> {
    Some(scatter(ids::DIRT, rng, x, y))
}

fn drop_rock_shards(rng: &mut WorldRng, x: i32, y: i32) -> Option<DropSpec> {
    Some(scatter(ids::ROCK_SHARDS, rng, x, y))
}

fn drop_wood_plank(rng: &mut WorldRng, x: i32, y: i32) -> Option<DropSpec> {
    Some(scatter(ids::WOOD_PLANK, rng, x, y))
}

/// Drop at the tile centre with a small symmetric random impulse in `[-1.8, 1.8]` per axis.
fn scatter(resource: ResourceId, rng: &mut WorldRng, x: i32, y: i32) -> DropSpec {
    let vx = (rng.below(10) - rng.below(10)) as f32 / 5.0;
    let vy = (rng.below(10) - rng.below(10)) as f32 / 5.0;
    DropSpec {
        position: tile_center(x, y),
        velocity: Vec2::new(vx, vy),
        resource,
    }
}
