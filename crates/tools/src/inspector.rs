use glam::Vec2;
use serde::Serialize;
use tileworld_common::EntityId;
use tileworld_kernel::{EntityKind, World};

/// World inspector for developer tooling.
///
/// Read-only queries against the world state for debugging and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let drops = world
            .entities()
            .iter()
            .filter(|e| e.kind == EntityKind::Drop)
            .count();
        WorldSummary {
            tick: world.tick(),
            width: world.grid().width(),
            height: world.grid().height(),
            solid_tiles: world.grid().solid_count(),
            entity_count: world.entity_count(),
            drops,
            player: world.player().map(|p| p.position),
            pending_events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }

    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.entity(id).map(|e| EntityInfo {
            id,
            kind: e.kind,
            position: e.position,
            velocity: e.velocity,
            grounded_ticks: e.grounded_ticks,
            age: e.age,
            carrying: e.carried.as_ref().map(|r| r.name.clone()),
        })
    }

    /// All entity ids in step order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().iter().map(|e| e.id()).collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub width: i32,
    pub height: i32,
    pub solid_tiles: usize,
    pub entity_count: usize,
    pub drops: usize,
    pub player: Option<Vec2>,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl WorldSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} size={}x{} solid={} entities={} drops={} pending_events={} hash={:#018x}",
            self.tick,
            self.width,
            self.height,
            self.solid_tiles,
            self.entity_count,
            self.drops,
            self.pending_events,
            self.state_hash
        )?;
        if let Some(p) = self.player {
            write!(f, " player=({:.2}, {:.2})", p.x, p.y)?;
        }
        Ok(())
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded_ticks: u32,
    pub age: u32,
    pub carrying: Option<String>,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity {} {:?} pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) grounded={} age={}",
            self.id,
            self.kind,
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.grounded_ticks,
            self.age,
        )?;
        if let Some(name) = &self.carrying {
            write!(f, " carrying={name}")?;
        }
        Ok(())
    }
}
