//! Axis-separated collision resolution against terrain tiles.
//!
//! Both resolvers test the x and y components of a proposed move
//! independently: the x test slides the box horizontally only, the y test
//! vertically only. A horizontal hit cancels (or, for grenades, reflects)
//! the horizontal component; a vertical hit snaps the box flush against the
//! tile face it was moving towards.
//!
//! Roles only collide with solid tiles. Grenades bounce off every tile,
//! decorative or not, and a grenade that lands on top of a tile loses its
//! horizontal motion for that tick.

use super::geom::{Aabb, Vec2};
use super::tile::Tile;

/// Resolves a role's proposed per-tick delta against the tile list.
///
/// Every tile is tested against the original proposed delta; the returned
/// delta carries the last adjustment written per axis. Horizontal hits zero
/// the x component. Vertical hits snap: moving down lands on the tile top,
/// moving up bumps against the tile bottom.
pub fn resolve_role_delta(rect: &Aabb, proposed: Vec2, tiles: &[Tile]) -> Vec2 {
    let mut resolved = proposed;
    for tile in tiles {
        if !tile.solid {
            continue;
        }
        if tile.rect.overlaps(&rect.translated(proposed.x, 0.0)) {
            resolved.x = 0.0;
        }
        if tile.rect.overlaps(&rect.translated(0.0, proposed.y)) {
            if proposed.y > 0.0 {
                resolved.y = tile.rect.top() - rect.bottom();
            } else if proposed.y < 0.0 {
                resolved.y = tile.rect.bottom() - rect.top();
            }
        }
    }
    resolved
}

/// Outcome of a grenade collision pass: the adjusted delta plus the travel
/// direction after any wall bounces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrenadeResolution {
    pub delta: Vec2,
    pub direction: i32,
}

/// Resolves a grenade's proposed per-tick delta against the tile list.
///
/// Unlike roles, the adjustments feed back into the tests for later tiles:
/// a wall bounce reflects the x component and flips the travel direction,
/// and subsequent tiles see the reflected motion. Landing on a tile snaps
/// the y component and kills the horizontal motion without turning the
/// grenade around.
pub fn resolve_grenade_delta(
    rect: &Aabb,
    proposed: Vec2,
    direction: i32,
    tiles: &[Tile],
) -> GrenadeResolution {
    let mut delta = proposed;
    let mut direction = direction;
    for tile in tiles {
        if tile.rect.overlaps(&rect.translated(delta.x, 0.0)) {
            delta.x = -delta.x;
            direction = -direction;
        }
        if tile.rect.overlaps(&rect.translated(0.0, delta.y)) {
            if delta.y < 0.0 {
                delta.y = tile.rect.bottom() - rect.top();
            } else {
                delta.x = 0.0;
                delta.y = tile.rect.top() - rect.bottom();
            }
        }
    }
    GrenadeResolution { delta, direction }
}
