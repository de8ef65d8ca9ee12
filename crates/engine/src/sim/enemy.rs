//! Enemy per-tick behavior: wake delay, wander patrol, player detection and
//! the out-of-world cull.

use super::animation::ActionClip;
use super::combat::apply_hazard_damage;
use super::context::FrameContext;
use super::countdown::Countdown;
use super::geom::{Aabb, Vec2};
use super::hazard::Hazard;
use super::role::{ActionKind, ClipSet, ControllerKind, RoleEntity, RoleIntent};
use super::tile::Tile;
use super::world::EntityId;
use super::{Team, MOVE_SPEED, SCREEN_HEIGHT, TICK_RATE};

pub const ENEMY_MAX_HEALTH: i32 = 40;
/// Ticks between bullets while an enemy keeps shooting.
pub const ENEMY_ATTACK_INTERVAL_TICKS: u32 = 2 * TICK_RATE;

/// Detection box extending from the enemy in its facing direction.
pub const VISION_WIDTH: f32 = 300.0;
pub const VISION_HEIGHT: f32 = 40.0;

/// How far an enemy patrols away from its anchor before turning back.
pub const WANDER_DISTANCE: f32 = MOVE_SPEED * 35.0;
/// Ticks of standing still between patrol legs.
pub const WANDER_IDLE_INTERVAL_TICKS: u32 = 3 * TICK_RATE;
/// Ticks an enemy stays engaged after the player leaves its vision box.
pub const DETECT_GRACE_TICKS: u32 = 2 * TICK_RATE;

/// How far past the left screen edge an enemy may drift before it is culled.
const OFF_WORLD_MARGIN: f32 = 50.0;

/// Enemy-side controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyAi {
    /// Ticks before the AI starts thinking at all.
    pub wake: Countdown,
    /// Awake-tick counter driving the patrol rhythm.
    pub counter: u32,
    /// Net own movement since spawn, excluding world scroll. Zero means the
    /// enemy is at its patrol anchor.
    pub wander_offset_x: f32,
    /// Persistent intent; the wander logic edits it in place.
    pub intent: RoleIntent,
    /// Runs while the player is out of sight but recently seen.
    pub detect_grace: Countdown,
    /// True while this enemy is locked onto the player. Drawn as the alert
    /// marker over its head.
    pub engaged: bool,
}

impl EnemyAi {
    pub fn with_wake_delay(wake_ticks: u32) -> Self {
        Self {
            wake: Countdown::new(wake_ticks),
            counter: 0,
            wander_offset_x: 0.0,
            intent: RoleIntent::default(),
            detect_grace: Countdown::idle(),
            engaged: false,
        }
    }
}

/// One full enemy tick, in the fixed order: think, cull if out of the
/// world, move, act, take damage, animate, disappear if the death animation
/// finished.
pub fn update_enemy(
    enemy: &mut RoleEntity,
    player: &RoleEntity,
    ctx: &mut FrameContext,
    tiles: &[Tile],
    hazards: &mut [Hazard],
    pending: &mut Vec<Hazard>,
) {
    ai_think(enemy, player);
    flag_out_of_world(enemy);
    move_enemy(enemy, ctx, tiles);
    let intent = current_intent(enemy);
    enemy.select_action(&intent, hazards, pending);
    apply_hazard_damage(enemy, hazards);
    enemy.advance_animation();
    flag_death_finished(enemy);
}

/// The vision box sits at the enemy's feet line raised by a third of its
/// height, extending in the facing direction.
pub fn vision_rect(rect: &Aabb, flip: bool) -> Aabb {
    let mut x = rect.x;
    if flip {
        x -= VISION_WIDTH - rect.width;
    }
    Aabb::new(
        x,
        rect.y - rect.height * 0.3,
        VISION_WIDTH,
        VISION_HEIGHT,
    )
}

/// Decides this tick's intent.
///
/// Asleep or dead enemies do not think. An awake enemy first checks for the
/// player: a live player inside the vision box arms the detection grace and
/// locks the enemy into shooting; the lock holds for the grace period after
/// sight is lost. Otherwise the enemy patrols: every idle interval it walks
/// away from its anchor, [`WANDER_DISTANCE`] out, then back, then waits.
fn ai_think(enemy: &mut RoleEntity, player: &RoleEntity) {
    if enemy.is_dead() {
        return;
    }
    let vision = vision_rect(&enemy.rect, enemy.flip);
    let player_in_sight = !player.is_dead() && !player.removed && player.rect.overlaps(&vision);

    let Some(ai) = enemy.controller.as_enemy_mut() else {
        return;
    };
    if ai.wake.tick() {
        return;
    }
    ai.counter += 1;

    ai.engaged = if player_in_sight {
        ai.detect_grace.arm(DETECT_GRACE_TICKS);
        true
    } else {
        ai.detect_grace.tick()
    };
    if ai.engaged {
        ai.intent = RoleIntent {
            shoot: true,
            ..RoleIntent::default()
        };
        return;
    }

    ai.intent.shoot = false;
    if ai.counter % WANDER_IDLE_INTERVAL_TICKS == 0 {
        if ai.wander_offset_x == 0.0 {
            ai.intent.run_left = true;
        } else {
            ai.intent.run_right = true;
        }
    }
    if ai.intent.run_left {
        if -ai.wander_offset_x >= WANDER_DISTANCE {
            ai.intent.run_left = false;
        }
    } else if ai.intent.run_right && ai.wander_offset_x >= 0.0 {
        ai.intent.run_right = false;
    }
}

fn current_intent(enemy: &RoleEntity) -> RoleIntent {
    enemy
        .controller
        .as_enemy()
        .map(|ai| ai.intent)
        .unwrap_or_default()
}

fn move_enemy(enemy: &mut RoleEntity, ctx: &FrameContext, tiles: &[Tile]) {
    enemy.rect.x += ctx.scroll_dx;
    let intent = current_intent(enemy);
    let delta = enemy.movement_delta(&intent, tiles, false, false);
    enemy.rect.x += delta.x;
    enemy.rect.y += delta.y;
    if let Some(ai) = enemy.controller.as_enemy_mut() {
        ai.wander_offset_x += delta.x;
    }
}

/// Enemies scrolled off the left (with margin) or fallen below the screen
/// are gone for good.
fn flag_out_of_world(enemy: &mut RoleEntity) {
    if enemy.rect.right() < -OFF_WORLD_MARGIN || enemy.rect.top() > SCREEN_HEIGHT {
        enemy.removed = true;
    }
}

fn flag_death_finished(enemy: &mut RoleEntity) {
    if enemy.action == ActionKind::Death && !enemy.animation_playing {
        enemy.removed = true;
    }
}

/// New enemy role standing at `top_left`. The wake delay is staggered
/// per-entity so a raided camp does not move in lockstep.
pub fn spawn_enemy(
    id: EntityId,
    top_left: Vec2,
    clips: ClipSet,
    explosion_clip: ActionClip,
) -> RoleEntity {
    let wake_ticks = TICK_RATE * (id.0 % 3) as u32 / 2;
    RoleEntity::new(
        id,
        Team::Enemy,
        top_left,
        ENEMY_MAX_HEALTH,
        ENEMY_ATTACK_INTERVAL_TICKS,
        clips,
        explosion_clip,
        ControllerKind::Enemy(EnemyAi::with_wake_delay(wake_ticks)),
    )
}
