use super::geom::Aabb;
use crate::sprite_keys;

/// Side length of one terrain tile in pixels.
pub const TILE_SIZE_PX: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Grass,
    Dirt,
    Platform,
}

impl TileKind {
    pub fn sprite_key(self) -> &'static str {
        match self {
            TileKind::Grass => sprite_keys::TILE_GRASS,
            TileKind::Dirt => sprite_keys::TILE_DIRT,
            TileKind::Platform => sprite_keys::TILE_PLATFORM,
        }
    }
}

/// One terrain tile. Tiles scroll with the world and are discarded once they
/// leave the screen on the left; they never come back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    pub rect: Aabb,
    pub solid: bool,
}

impl Tile {
    /// Tile at grid cell `(col, row)`, measured from the top-left of the
    /// world in tile units.
    pub fn at_cell(kind: TileKind, col: u32, row: u32, solid: bool) -> Self {
        Self {
            kind,
            rect: Aabb::new(
                col as f32 * TILE_SIZE_PX,
                row as f32 * TILE_SIZE_PX,
                TILE_SIZE_PX,
                TILE_SIZE_PX,
            ),
            solid,
        }
    }
}
