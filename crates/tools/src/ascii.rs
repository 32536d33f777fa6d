use tileworld_common::{TileRect, tile_of};
use tileworld_kernel::{EntityKind, Material, World};

/// Map glyph for a material.
pub fn glyph(material: Material) -> char {
    match material {
        Material::Empty => '.',
        Material::Dirt => 'd',
        Material::Grass => 'g',
        Material::Stone => '#',
        Material::WoodPlanks => '=',
    }
}

/// Render the tiles of `rect` (clipped to the world) as text, one line per row.
///
/// Entities are drawn over the tile holding their top-left corner: `@` for
/// the player and `o` for drops.
pub fn render_window(world: &World, rect: TileRect) -> String {
    let grid = world.grid();
    let rect = rect.clamp_to(grid.width(), grid.height());
    let mut rows: Vec<Vec<char>> = (rect.y..rect.y_end())
        .map(|y| {
            (rect.x..rect.x_end())
                .map(|x| glyph(grid.get(x, y).material))
                .collect()
        })
        .collect();

    for entity in world.entities() {
        let (x, y) = tile_of(entity.position);
        if !rect.contains(x, y) {
            continue;
        }
        let mark = match entity.kind {
            EntityKind::Player => '@',
            EntityKind::Drop => 'o',
        };
        let cell = &mut rows[(y - rect.y) as usize][(x - rect.x) as usize];
        // the player wins over drops sharing its tile
        if *cell != '@' {
            *cell = mark;
        }
    }

    let mut out = String::with_capacity(rect.area() + rows.len());
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use tileworld_assets::{ResourceRegistry, ids};
    use tileworld_common::PhysicsConfig;
    use tileworld_kernel::{Tile, TileGrid};

    #[test]
    fn renders_tiles_and_entities() {
        let mut w = World::new(
            TileGrid::new(4, 3),
            PhysicsConfig::default(),
            ResourceRegistry::builtin(),
            0,
        );
        for x in 0..4 {
            w.set_tile(x, 2, Tile::new(Material::Stone));
        }
        w.set_tile(0, 1, Tile::new(Material::Grass));
        w.spawn_player(Vec2::new(50.0, 10.0), Vec2::new(36.0, 64.0));
        w.spawn_drop(Vec2::new(150.0, 60.0), Vec2::ZERO, w.registry().resolve(ids::DIRT));

        let map = render_window(&w, w.grid().bounds());
        assert_eq!(map, ".@..\ng..o\n####\n");
    }

    #[test]
    fn window_is_clipped() {
        let w = World::new(
            TileGrid::new(2, 2),
            PhysicsConfig::default(),
            ResourceRegistry::new(),
            0,
        );
        assert_eq!(render_window(&w, TileRect::new(-3, -3, 10, 10)), "..\n..\n");
    }
}
