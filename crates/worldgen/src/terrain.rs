use tileworld_common::{RngExt, WorldRng};
use tileworld_kernel::{Material, Tile, TileGrid};

use crate::GenerationError;

/// Chance denominator for a small surface step after each column.
const STEP_CHANCE: i32 = 2;
/// Chance denominator for a cliff after each column.
const CLIFF_CHANCE: i32 = 20;
/// Minimum dirt depth below the grass row.
const DIRT_DEPTH: i32 = 4;

/// A generated grid plus the surface row used for each column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLevel {
    pub grid: TileGrid,
    pub surface: Vec<i32>,
}

/// Fill a `width` x `height` grid column by column.
///
/// The surface starts at half height and random-walks between columns.
/// Each column is grass at the surface, a few rows of dirt beneath, then
/// stone; everything above the surface is empty.
pub fn generate(width: i32, height: i32, rng: &mut WorldRng) -> Result<GeneratedLevel, GenerationError> {
    if width <= 0 || height <= 0 {
        return Err(GenerationError::InvalidDimensions { width, height });
    }

    let mut grid = TileGrid::new(width, height);
    let mut surface_rows = Vec::with_capacity(width as usize);
    let mut surface = height / 2;

    for x in 0..width {
        surface_rows.push(surface);
        for y in 0..height {
            let material = if y == surface {
                Material::Grass
            } else if y > surface {
                if y < surface + DIRT_DEPTH + rng.below(3) {
                    Material::Dirt
                } else {
                    Material::Stone
                }
            } else {
                Material::Empty
            };
            grid.set(x, y, Tile::new(material));
        }

        if rng.one_in(STEP_CHANCE) {
            surface += rng.below(2) - rng.below(2);
        }
        if rng.one_in(CLIFF_CHANCE) {
            surface += rng.below(8) - rng.below(8);
        }
        surface = surface.clamp(0, height - 1);
    }

    tracing::debug!(width, height, "terrain generated");
    Ok(GeneratedLevel {
        grid,
        surface: surface_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_common::seeded_rng;

    #[test]
    fn columns_follow_the_layering() {
        let level = generate(200, 64, &mut seeded_rng(3)).unwrap();
        for (x, &s) in level.surface.iter().enumerate() {
            let x = x as i32;
            assert!((0..64).contains(&s));
            for y in 0..s {
                assert_eq!(level.grid.get(x, y).material, Material::Empty);
            }
            assert_eq!(level.grid.get(x, s).material, Material::Grass);
            // at least three dirt rows, then no dirt below surface + 6
            for y in (s + 1)..(s + 4).min(64) {
                assert_eq!(level.grid.get(x, y).material, Material::Dirt);
            }
            for y in (s + 6).min(64)..64 {
                assert_eq!(level.grid.get(x, y).material, Material::Stone);
            }
        }
    }

    #[test]
    fn first_column_starts_at_half_height() {
        let level = generate(10, 50, &mut seeded_rng(1)).unwrap();
        assert_eq!(level.surface[0], 25);
        assert_eq!(level.surface.len(), 10);
    }

    #[test]
    fn same_seed_same_terrain() {
        let a = generate(128, 64, &mut seeded_rng(77)).unwrap();
        let b = generate(128, 64, &mut seeded_rng(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_row_world_stays_in_bounds() {
        let level = generate(50, 1, &mut seeded_rng(8)).unwrap();
        assert!(level.surface.iter().all(|&s| s == 0));
        assert!((0..50).all(|x| level.grid.get(x, 0).material == Material::Grass));
    }

    #[test]
    fn rejects_empty_dimensions() {
        let err = generate(0, 10, &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidDimensions { width: 0, height: 10 }));
    }
}
