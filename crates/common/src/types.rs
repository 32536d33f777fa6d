use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width of one tile in world pixels.
pub const TILE_WIDTH: i32 = 48;
/// Height of one tile in world pixels.
pub const TILE_HEIGHT: i32 = 48;

/// Unique identifier for an entity in the world.
///
/// Ids are handed out sequentially by the owning world so that two runs with
/// the same seed and inputs produce identical ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad material family, matched against a resource's `effective_against`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialClass {
    Soft,
    Hard,
    Wood,
    Living,
    #[default]
    None,
}

/// Axis-aligned box in world pixels. `min` is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Pixel-space box covered by tile `(x, y)`.
    pub fn tile(x: i32, y: i32) -> Self {
        Self {
            min: Vec2::new((x * TILE_WIDTH) as f32, (y * TILE_HEIGHT) as f32),
            size: Vec2::new(TILE_WIDTH as f32, TILE_HEIGHT as f32),
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// The same box moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            size: self.size,
        }
    }

    /// Closed-interval overlap: boxes that merely touch along an edge intersect.
    pub fn intersects_closed(&self, other: &Aabb) -> bool {
        !(other.left() > self.right()
            || other.right() < self.left()
            || other.top() > self.bottom()
            || other.bottom() < self.top())
    }

    /// Open-interval overlap: touching edges do not count.
    pub fn intersects_open(&self, other: &Aabb) -> bool {
        other.left() < self.right()
            && other.right() > self.left()
            && other.top() < self.bottom()
            && other.bottom() > self.top()
    }
}

/// Half-open rectangle of tile coordinates: `x..x + width`, `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TileRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Rectangle from corner bounds, `x0..x1` and `y0..y1`. Inverted bounds give an empty rect.
    /// Extents saturate at `i32::MAX`.
    pub fn from_bounds(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Window of tiles centred on a pixel-space focus point.
    ///
    /// The half extent is in pixels and is converted to whole tiles by
    /// truncating division. The lower bound is clamped to zero while the
    /// upper bound keeps its unclamped position.
    pub fn around(focus: Vec2, half_extent: Vec2) -> Self {
        let (cx, cy) = tile_of(focus);
        let hx = half_extent.x.max(0.0) as i32 / TILE_WIDTH;
        let hy = half_extent.y.max(0.0) as i32 / TILE_HEIGHT;
        let x0 = cx.saturating_sub(hx);
        let y0 = cy.saturating_sub(hy);
        Self::from_bounds(
            x0.max(0),
            y0.max(0),
            x0.saturating_add(hx * 2),
            y0.saturating_add(hy * 2),
        )
    }

    /// Tiles within `radius` tiles of `center` on each axis, inclusive on both sides.
    pub fn spanning(center: (i32, i32), radius: (i32, i32)) -> Self {
        Self::from_bounds(
            center.0.saturating_sub(radius.0),
            center.1.saturating_sub(radius.1),
            center.0.saturating_add(radius.0).saturating_add(1),
            center.1.saturating_add(radius.1).saturating_add(1),
        )
    }

    pub fn x_end(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn y_end(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x_end() && y >= self.y && y < self.y_end()
    }

    /// Intersection with a `width` x `height` grid anchored at the origin.
    pub fn clamp_to(&self, width: i32, height: i32) -> Self {
        Self::from_bounds(
            self.x.clamp(0, width),
            self.y.clamp(0, height),
            self.x_end().clamp(0, width),
            self.y_end().clamp(0, height),
        )
    }

    /// Coordinates in scan order: ascending x, then ascending y within each column.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (y0, y1) = (self.y, self.y_end());
        (self.x..self.x_end()).flat_map(move |x| (y0..y1).map(move |y| (x, y)))
    }
}

/// Tile containing the pixel-space point.
pub fn tile_of(position: Vec2) -> (i32, i32) {
    (
        (position.x / TILE_WIDTH as f32).floor() as i32,
        (position.y / TILE_HEIGHT as f32).floor() as i32,
    )
}

/// Pixel-space centre of tile `(x, y)`.
pub fn tile_center(x: i32, y: i32) -> Vec2 {
    Vec2::new(
        (x * TILE_WIDTH + TILE_WIDTH / 2) as f32,
        (y * TILE_HEIGHT + TILE_HEIGHT / 2) as f32,
    )
}

/// Per-step player control, already reduced to edges by the input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub move_left: bool,
    pub move_right: bool,
    /// True only on the step the jump control went from released to pressed.
    pub jump: bool,
}

impl PlayerIntent {
    pub const IDLE: PlayerIntent = PlayerIntent {
        move_left: false,
        move_right: false,
        jump: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_box_matches_tile_size() {
        let b = Aabb::tile(2, 3);
        assert_eq!(b.left(), 96.0);
        assert_eq!(b.top(), 144.0);
        assert_eq!(b.right(), 144.0);
        assert_eq!(b.bottom(), 192.0);
    }

    #[test]
    fn touching_edges_count_only_when_closed() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(48.0, 48.0));
        let b = Aabb::new(Vec2::new(48.0, 0.0), Vec2::new(48.0, 48.0));
        assert!(a.intersects_closed(&b));
        assert!(!a.intersects_open(&b));

        let far = Aabb::new(Vec2::new(48.5, 0.0), Vec2::new(1.0, 1.0));
        assert!(!a.intersects_closed(&far));
    }

    #[test]
    fn tile_center_is_mid_tile() {
        assert_eq!(tile_center(5, 5), Vec2::new(264.0, 264.0));
    }

    #[test]
    fn tile_of_floors_negative_positions() {
        assert_eq!(tile_of(Vec2::new(-1.0, 47.9)), (-1, 0));
        assert_eq!(tile_of(Vec2::new(96.0, 48.0)), (2, 1));
    }

    #[test]
    fn window_around_focus() {
        // 320 / 48 = 6 tiles each way, 192 / 48 = 4.
        let w = TileRect::around(Vec2::new(48.0 * 20.0, 48.0 * 10.0), Vec2::new(320.0, 192.0));
        assert_eq!(w, TileRect::new(14, 6, 12, 8));
    }

    #[test]
    fn window_lower_bound_clamps_to_zero() {
        let w = TileRect::around(Vec2::new(48.0, 48.0), Vec2::new(320.0, 192.0));
        assert_eq!(w.x, 0);
        assert_eq!(w.y, 0);
        assert_eq!(w.x_end(), 1 - 6 + 12);
        assert_eq!(w.y_end(), 1 - 4 + 8);
    }

    #[test]
    fn clamp_to_grid() {
        let r = TileRect::new(-3, 8, 10, 10).clamp_to(5, 12);
        assert_eq!(r, TileRect::new(0, 8, 5, 4));
        assert!(TileRect::new(20, 20, 4, 4).clamp_to(5, 5).is_empty());
    }

    #[test]
    fn iteration_is_column_major() {
        let coords: Vec<_> = TileRect::new(1, 1, 2, 2).iter().collect();
        assert_eq!(coords, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn rects_near_the_coordinate_limit_saturate() {
        let far = tile_of(Vec2::new(100.0, 1.0e12));
        assert_eq!(far.1, i32::MAX);
        let r = TileRect::spanning(far, (2, 3));
        assert_eq!(r.y, i32::MAX - 3);
        assert_eq!(r.y_end(), i32::MAX);
        assert!(r.clamp_to(64, 64).is_empty());

        let low = TileRect::spanning((i32::MIN, 0), (2, 0));
        assert_eq!(low.x, i32::MIN);
        assert_eq!(low.width, 3);

        let w = TileRect::around(Vec2::new(1.0e12, 1.0e12), Vec2::new(320.0, 192.0));
        assert_eq!(w.x_end(), i32::MAX);
        assert!(w.clamp_to(64, 64).is_empty());
    }

    #[test]
    fn spanning_is_inclusive() {
        let r = TileRect::spanning((5, 5), (1, 2));
        assert_eq!(r, TileRect::new(4, 3, 3, 5));
        assert!(r.contains(6, 7));
        assert!(!r.contains(7, 7));
    }
}
