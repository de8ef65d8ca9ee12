//! The combat world: every entity alive in a battle plus the end-of-tick
//! sweep that applies world scroll and drops the dead.

use super::context::FrameContext;
use super::countdown::Countdown;
use super::hazard::Hazard;
use super::role::RoleEntity;
use super::tile::Tile;

/// Stable identity for a role. Hazards remember throwers and victims by id,
/// never by index into a list that sweeps compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Ticks of camera shake after a grenade detonation.
pub const SHAKE_TICKS: u32 = 10;

/// Fixed offset cycle standing in for per-frame jitter. Replays render the
/// same shake every time.
const SHAKE_PATTERN: [(i32, i32); 5] = [(4, 2), (-3, -4), (2, -3), (-4, 3), (3, -2)];

/// Camera shake driven by detonations. The sim only arms and ticks it; the
/// renderer reads [`ScreenShake::offset`] when drawing the tile layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenShake {
    remaining: Countdown,
}

impl ScreenShake {
    pub fn arm(&mut self) {
        self.remaining.arm(SHAKE_TICKS);
    }

    pub fn tick(&mut self) {
        self.remaining.tick();
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_active()
    }

    pub fn offset(&self) -> (i32, i32) {
        if !self.remaining.is_active() {
            return (0, 0);
        }
        SHAKE_PATTERN[(self.remaining.remaining() % SHAKE_PATTERN.len() as u32) as usize]
    }
}

/// All battle state for one level.
///
/// Per-entity update functions run against slices borrowed out of this
/// struct; new hazards land in `pending_hazards` so those updates never
/// mutate the list they are iterating. [`CombatWorld::apply_pending_hazards`]
/// merges them between update passes and [`CombatWorld::sweep`] closes the
/// tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatWorld {
    pub player: RoleEntity,
    pub enemies: Vec<RoleEntity>,
    pub hazards: Vec<Hazard>,
    pub pending_hazards: Vec<Hazard>,
    pub tiles: Vec<Tile>,
    /// World-space x of the level's right edge. Scrolls with the tiles.
    pub world_right_edge_x: f32,
    pub shake: ScreenShake,
    pub game_over: bool,
    pub tick_counter: u64,
}

impl CombatWorld {
    pub fn new(
        player: RoleEntity,
        enemies: Vec<RoleEntity>,
        tiles: Vec<Tile>,
        world_right_edge_x: f32,
    ) -> Self {
        Self {
            player,
            enemies,
            hazards: Vec::new(),
            pending_hazards: Vec::new(),
            tiles,
            world_right_edge_x,
            shake: ScreenShake::default(),
            game_over: false,
            tick_counter: 0,
        }
    }

    /// Moves hazards spawned during the current pass into the live list,
    /// preserving spawn order.
    pub fn apply_pending_hazards(&mut self) {
        self.hazards.append(&mut self.pending_hazards);
    }

    /// Enemies still standing, for the window title and the win check.
    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|enemy| !enemy.is_dead()).count()
    }

    /// End-of-tick bookkeeping: scroll the tile layer and the world edge by
    /// this tick's camera motion, purge tiles that scrolled off the left
    /// edge, drop removed entities, advance the shake and latch game over.
    pub fn sweep(&mut self, ctx: &FrameContext) {
        for tile in &mut self.tiles {
            tile.rect.x += ctx.scroll_dx;
        }
        self.tiles.retain(|tile| tile.rect.right() >= 0.0);
        self.world_right_edge_x += ctx.scroll_dx;

        self.enemies.retain(|enemy| !enemy.removed);
        self.hazards.retain(|hazard| !hazard.removed());

        self.shake.tick();
        if ctx.shake_requested {
            self.shake.arm();
        }
        if ctx.game_over {
            self.game_over = true;
        }
        self.tick_counter += 1;
    }
}
