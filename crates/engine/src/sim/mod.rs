//! Fixed-timestep side-scroller combat simulation.
//!
//! Everything in this module advances in whole ticks and works in screen-space
//! pixels. The player is kept near the horizontal middle of the screen and the
//! world is scrolled underneath it, so "world" x coordinates drift every tick
//! by the scroll delta the player update publishes into [`FrameContext`].

pub mod animation;
pub mod collision;
pub mod combat;
pub mod context;
pub mod countdown;
pub mod enemy;
pub mod geom;
pub mod hazard;
pub mod player;
pub mod role;
pub mod tile;
pub mod world;

pub use animation::{ActionClip, AnimationController, ANIM_CADENCE_DEFAULT};
pub use collision::{resolve_grenade_delta, resolve_role_delta, GrenadeResolution};
pub use combat::{
    apply_hazard_damage, ENEMY_BULLET_DAMAGE, EXPLOSION_DAMAGE, HIT_STUN_TICKS,
    PLAYER_BULLET_DAMAGE,
};
pub use context::FrameContext;
pub use countdown::Countdown;
pub use enemy::{
    spawn_enemy, update_enemy, EnemyAi, ENEMY_ATTACK_INTERVAL_TICKS, ENEMY_MAX_HEALTH,
};
pub use geom::{Aabb, Vec2};
pub use hazard::{Bullet, Explosion, Grenade, Hazard};
pub use player::{
    spawn_player, update_player, PlayerState, PLAYER_ATTACK_INTERVAL_TICKS,
    PLAYER_GRENADE_INVENTORY, PLAYER_MAX_HEALTH,
};
pub use role::{ActionKind, ClipSet, ControllerKind, RoleEntity, RoleIntent};
pub use tile::{Tile, TileKind, TILE_SIZE_PX};
pub use world::{CombatWorld, EntityId, EntityIdAllocator, ScreenShake};

/// Logical screen width in pixels. The render surface and all gameplay
/// coordinates use this fixed size regardless of the OS window size.
pub const SCREEN_WIDTH: f32 = 800.0;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: f32 = 640.0;

/// Simulation ticks per second. Timing constants below are per tick.
pub const TICK_RATE: u32 = 60;

/// Downward acceleration added to a falling body every tick.
pub const GRAVITY_PER_TICK: f32 = 0.8;
/// Terminal fall speed in pixels per tick. Gravity accumulation saturates here.
pub const MAX_FALL_SPEED: f32 = 20.0;

/// Horizontal run speed for every role, in pixels per tick.
pub const MOVE_SPEED: f32 = 5.0;
/// Initial vertical velocity applied when a jump starts. Negative is up.
pub const JUMP_IMPULSE: f32 = -11.0;

/// Side a role or hazard fights for. Damage is only ever applied across teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub fn opposes(self, other: Team) -> bool {
        self != other
    }
}
