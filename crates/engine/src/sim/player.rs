//! Player-specific per-tick behavior: border clamping, camera scroll and the
//! fall-off-screen check.

use super::combat::apply_hazard_damage;
use super::context::FrameContext;
use super::geom::Vec2;
use super::hazard::Hazard;
use super::role::{ControllerKind, RoleEntity, RoleIntent};
use super::tile::Tile;
use super::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const PLAYER_MAX_HEALTH: i32 = 100;
/// Ticks between bullets while the shoot intent is held.
pub const PLAYER_ATTACK_INTERVAL_TICKS: u32 = 20;
/// Grenades the player starts with.
pub const PLAYER_GRENADE_INVENTORY: u32 = 5;

/// Player-side controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub grenades_left: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            grenades_left: PLAYER_GRENADE_INVENTORY,
        }
    }
}

/// One full player tick, in the fixed order: raise game over if dead, move
/// (publishing the scroll delta), select the action, animate, take damage,
/// and finally check for a fall off the bottom of the screen.
///
/// A dead player still runs the rest of its tick so the death action commits
/// and starts animating; the scene decides what game over means.
pub fn update_player(
    player: &mut RoleEntity,
    intent: &RoleIntent,
    ctx: &mut FrameContext,
    tiles: &[Tile],
    hazards: &mut [Hazard],
    pending: &mut Vec<Hazard>,
) {
    if player.is_dead() {
        ctx.game_over = true;
    }
    move_player(player, intent, ctx, tiles);
    player.select_action(intent, hazards, pending);
    player.advance_animation();
    apply_hazard_damage(player, hazards);
    fall_off_screen_check(player);
}

/// Moves the player and computes the world scroll for this tick.
///
/// The player may never leave the screen on the left or run past the world's
/// right edge. While the world's right edge is beyond the screen, any
/// position right of the screen midpoint is converted into scroll: the
/// player is pinned at the midpoint and the overshoot becomes a negative
/// scroll delta that moves the world left underneath it.
fn move_player(
    player: &mut RoleEntity,
    intent: &RoleIntent,
    ctx: &mut FrameContext,
    tiles: &[Tile],
) {
    let border_left = player.rect.x <= 0.0;
    let right_border = ctx.world_right_edge_x;
    let border_right = player.rect.right() >= right_border;

    let delta = player.movement_delta(intent, tiles, border_left, border_right);
    player.rect.x += delta.x;
    player.rect.y += delta.y;

    if right_border <= SCREEN_WIDTH {
        ctx.scroll_dx = 0.0;
        return;
    }
    if player.rect.x < SCREEN_WIDTH / 2.0 {
        ctx.scroll_dx = 0.0;
        return;
    }
    let forward = SCREEN_WIDTH / 2.0 - player.rect.x;
    player.rect.x = SCREEN_WIDTH / 2.0;
    ctx.scroll_dx = forward;
}

/// Falling below the bottom of the screen is lethal.
fn fall_off_screen_check(player: &mut RoleEntity) {
    if player.rect.top() >= SCREEN_HEIGHT {
        player.health = 0;
    }
}

/// Grenades the player has left, for the HUD.
pub fn grenades_left(player: &RoleEntity) -> u32 {
    match &player.controller {
        ControllerKind::Player(state) => state.grenades_left,
        ControllerKind::Enemy(_) => 0,
    }
}

/// Health as a 0..=1 fraction of maximum, for the HUD bar.
pub fn health_ratio(player: &RoleEntity) -> f32 {
    if player.max_health <= 0 {
        return 0.0;
    }
    (player.health.max(0) as f32 / player.max_health as f32).min(1.0)
}

/// New player role standing at `top_left`.
pub fn spawn_player(
    id: super::world::EntityId,
    top_left: Vec2,
    clips: super::role::ClipSet,
    explosion_clip: super::animation::ActionClip,
) -> RoleEntity {
    RoleEntity::new(
        id,
        super::Team::Player,
        top_left,
        PLAYER_MAX_HEALTH,
        PLAYER_ATTACK_INTERVAL_TICKS,
        clips,
        explosion_clip,
        ControllerKind::Player(PlayerState::default()),
    )
}

#[cfg(test)]
mod tests {
    use super::super::animation::ActionClip;
    use super::super::geom::Aabb;
    use super::super::role::{ActionKind, ClipSet};
    use super::super::tile::TileKind;
    use super::super::world::EntityId;
    use super::super::MOVE_SPEED;
    use super::*;

    fn clip(sheet: &str, looped: bool) -> ActionClip {
        ActionClip {
            sheet: sheet.to_string(),
            frame_width: 60,
            frame_height: 80,
            frame_count: 4,
            cadence: 6,
            looped,
        }
    }

    fn clip_set() -> ClipSet {
        ClipSet {
            idle: clip("soldier_idle", true),
            run: clip("soldier_run", true),
            jump: clip("soldier_jump", true),
            death: clip("soldier_death", false),
            idle_hit: Some(clip("soldier_idle_hit", true)),
            run_hit: Some(clip("soldier_run_hit", true)),
        }
    }

    fn player_at(x: f32, y: f32) -> RoleEntity {
        spawn_player(
            EntityId(0),
            Vec2::new(x, y),
            clip_set(),
            clip("explosion", false),
        )
    }

    fn ground_row(y: f32, cols: u32) -> Vec<Tile> {
        (0..cols)
            .map(|col| Tile {
                kind: TileKind::Dirt,
                rect: Aabb::new(col as f32 * 40.0, y, 40.0, 40.0),
                solid: true,
            })
            .collect()
    }

    fn wide_ctx() -> FrameContext {
        FrameContext::for_tick(1.0 / 60.0, 3200.0)
    }

    #[test]
    fn spawned_player_has_full_health_and_grenades() {
        let player = player_at(100.0, 100.0);
        assert_eq!(player.health, PLAYER_MAX_HEALTH);
        assert_eq!(grenades_left(&player), PLAYER_GRENADE_INVENTORY);
        assert_eq!(health_ratio(&player), 1.0);
    }

    #[test]
    fn running_left_of_the_midpoint_moves_without_scroll() {
        let mut player = player_at(100.0, 464.0);
        let tiles = ground_row(544.0, 80);
        let mut ctx = wide_ctx();
        let intent = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        update_player(&mut player, &intent, &mut ctx, &tiles, &mut [], &mut Vec::new());

        assert_eq!(player.rect.x, 100.0 + MOVE_SPEED);
        assert_eq!(ctx.scroll_dx, 0.0);
    }

    #[test]
    fn crossing_the_midpoint_pins_the_player_and_scrolls_the_world() {
        let mut player = player_at(398.0, 464.0);
        let tiles = ground_row(544.0, 80);
        let mut ctx = wide_ctx();
        let intent = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        update_player(&mut player, &intent, &mut ctx, &tiles, &mut [], &mut Vec::new());

        // Would have landed at 403: pinned to 400, 3 pixels become scroll.
        assert_eq!(player.rect.x, SCREEN_WIDTH / 2.0);
        assert_eq!(ctx.scroll_dx, -3.0);
    }

    #[test]
    fn no_scroll_when_the_world_fits_on_screen() {
        let mut player = player_at(500.0, 464.0);
        let tiles = ground_row(544.0, 20);
        let mut ctx = FrameContext::for_tick(1.0 / 60.0, SCREEN_WIDTH);
        let intent = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        update_player(&mut player, &intent, &mut ctx, &tiles, &mut [], &mut Vec::new());

        assert_eq!(ctx.scroll_dx, 0.0);
        assert_eq!(player.rect.x, 505.0);
    }

    #[test]
    fn left_screen_edge_blocks_leftward_movement() {
        let mut player = player_at(0.0, 464.0);
        let tiles = ground_row(544.0, 80);
        let mut ctx = wide_ctx();
        let intent = RoleIntent {
            run_left: true,
            ..RoleIntent::default()
        };
        update_player(&mut player, &intent, &mut ctx, &tiles, &mut [], &mut Vec::new());

        assert_eq!(player.rect.x, 0.0);
    }

    #[test]
    fn world_right_edge_blocks_rightward_movement() {
        // A short world that fits on screen: the right border is the only
        // thing stopping the player.
        let mut player = player_at(640.0, 464.0);
        let tiles = ground_row(544.0, 20);
        let mut ctx = FrameContext::for_tick(1.0 / 60.0, 700.0);
        let intent = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        update_player(&mut player, &intent, &mut ctx, &tiles, &mut [], &mut Vec::new());

        assert_eq!(player.rect.x, 640.0);
        assert_eq!(ctx.scroll_dx, 0.0);
    }

    #[test]
    fn falling_off_the_screen_bottom_is_lethal() {
        let mut player = player_at(100.0, SCREEN_HEIGHT + 10.0);
        let mut ctx = wide_ctx();
        update_player(
            &mut player,
            &RoleIntent::default(),
            &mut ctx,
            &[],
            &mut [],
            &mut Vec::new(),
        );
        assert_eq!(player.health, 0);
        // Game over is raised on the next tick, once the death is visible.
        assert!(!ctx.game_over);
    }

    #[test]
    fn dead_player_raises_game_over_and_commits_death_action() {
        let mut player = player_at(100.0, 464.0);
        player.health = 0;
        let tiles = ground_row(544.0, 80);
        let mut ctx = wide_ctx();
        update_player(
            &mut player,
            &RoleIntent::default(),
            &mut ctx,
            &tiles,
            &mut [],
            &mut Vec::new(),
        );
        assert!(ctx.game_over);
        assert_eq!(player.action, ActionKind::Death);
    }

    #[test]
    fn health_ratio_clamps_below_zero_health() {
        let mut player = player_at(0.0, 0.0);
        player.health = -30;
        assert_eq!(health_ratio(&player), 0.0);
    }
}
