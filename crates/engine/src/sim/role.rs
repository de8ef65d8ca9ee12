//! Shared behavior for the player and enemy soldiers.
//!
//! A [`RoleEntity`] is the composition of the common soldier body (movement,
//! action selection, animation, health) with a [`ControllerKind`] that says
//! who steers it. The per-tick ordering of these pieces differs between the
//! player and enemies and lives in `player` and `enemy` respectively.

use serde::{Deserialize, Serialize};

use super::animation::{ActionClip, AnimationController};
use super::collision::resolve_role_delta;
use super::countdown::Countdown;
use super::enemy::EnemyAi;
use super::geom::{Aabb, Vec2};
use super::hazard::{Bullet, Grenade, Hazard};
use super::player::PlayerState;
use super::tile::Tile;
use super::world::EntityId;
use super::{Team, GRAVITY_PER_TICK, JUMP_IMPULSE, MAX_FALL_SPEED, MOVE_SPEED};

/// Animation action a role can be committed to. The hit variants are
/// distinct actions: entering or leaving hit stun restarts the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Idle,
    Run,
    Jump,
    Death,
    IdleHit,
    RunHit,
}

impl ActionKind {
    /// Stunned flavor of this action, for the actions that have one.
    pub fn hit_variant(self) -> Option<ActionKind> {
        match self {
            ActionKind::Idle => Some(ActionKind::IdleHit),
            ActionKind::Run => Some(ActionKind::RunHit),
            _ => None,
        }
    }
}

/// The animation clips a role was defined with. `idle`, `run`, `jump` and
/// `death` are always present; the hit variants are optional and the action
/// machine falls back to the base action when one is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSet {
    pub idle: ActionClip,
    pub run: ActionClip,
    pub jump: ActionClip,
    pub death: ActionClip,
    pub idle_hit: Option<ActionClip>,
    pub run_hit: Option<ActionClip>,
}

impl ClipSet {
    pub fn clip(&self, action: ActionKind) -> Option<&ActionClip> {
        match action {
            ActionKind::Idle => Some(&self.idle),
            ActionKind::Run => Some(&self.run),
            ActionKind::Jump => Some(&self.jump),
            ActionKind::Death => Some(&self.death),
            ActionKind::IdleHit => self.idle_hit.as_ref(),
            ActionKind::RunHit => self.run_hit.as_ref(),
        }
    }
}

/// What a role wants to do this tick. For the player this comes from the
/// keyboard snapshot; for enemies the AI fills one in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleIntent {
    pub run_left: bool,
    pub run_right: bool,
    pub jump: bool,
    pub shoot: bool,
    pub throw_grenade: bool,
}

/// Who steers a role, plus the steering-specific state.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerKind {
    Player(PlayerState),
    Enemy(EnemyAi),
}

impl ControllerKind {
    pub fn grenades_left(&self) -> u32 {
        match self {
            ControllerKind::Player(state) => state.grenades_left,
            ControllerKind::Enemy(_) => 0,
        }
    }

    /// Consumes one grenade from the inventory. Only the player carries any.
    fn take_grenade(&mut self) -> bool {
        match self {
            ControllerKind::Player(state) if state.grenades_left > 0 => {
                state.grenades_left -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyAi> {
        match self {
            ControllerKind::Enemy(ai) => Some(ai),
            ControllerKind::Player(_) => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyAi> {
        match self {
            ControllerKind::Enemy(ai) => Some(ai),
            ControllerKind::Player(_) => None,
        }
    }
}

/// A soldier on the battlefield.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleEntity {
    pub id: EntityId,
    pub team: Team,
    pub rect: Aabb,
    /// Facing left when true. Sprites are authored facing right.
    pub flip: bool,
    /// Vertical velocity in pixels per tick. Keeps accumulating gravity even
    /// while grounded; the collision snap cancels it every tick.
    pub vy: f32,
    /// True from the moment a jump starts until a landing resolves the
    /// vertical motion to zero.
    pub falling: bool,
    pub action: ActionKind,
    pub anim: AnimationController,
    /// Result of the most recent animation advance. Only meaningful for
    /// non-looping clips; used to detect a finished death animation.
    pub animation_playing: bool,
    pub health: i32,
    pub max_health: i32,
    pub hit_stun: Countdown,
    /// Ticks the shoot intent has been held. Bullet number `n` fires when
    /// this is zero or a multiple of the attack interval.
    pub attack_counter: u32,
    pub attack_interval_ticks: u32,
    pub clips: ClipSet,
    /// Clip handed to grenades this role throws, for their explosion.
    pub explosion_clip: ActionClip,
    /// Marked by the sweep candidates (death finished, left the world) and
    /// purged at end of tick.
    pub removed: bool,
    pub controller: ControllerKind,
}

impl RoleEntity {
    /// New role at `top_left`, sized and animated from the idle clip.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        team: Team,
        top_left: Vec2,
        max_health: i32,
        attack_interval_ticks: u32,
        clips: ClipSet,
        explosion_clip: ActionClip,
        controller: ControllerKind,
    ) -> Self {
        let rect = Aabb::new(
            top_left.x,
            top_left.y,
            clips.idle.frame_width as f32,
            clips.idle.frame_height as f32,
        );
        let anim = AnimationController::start(&clips.idle);
        Self {
            id,
            team,
            rect,
            flip: false,
            vy: 0.0,
            falling: false,
            action: ActionKind::Idle,
            anim,
            animation_playing: true,
            health: max_health,
            max_health,
            hit_stun: Countdown::idle(),
            attack_counter: 0,
            attack_interval_ticks,
            clips,
            explosion_clip,
            removed: false,
            controller,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Computes this tick's movement delta from the intent, applying jump
    /// start, gravity accumulation and tile collision. A dead role does not
    /// move. `block_left`/`block_right` cancel motion into a world border.
    pub fn movement_delta(
        &mut self,
        intent: &RoleIntent,
        tiles: &[Tile],
        block_left: bool,
        block_right: bool,
    ) -> Vec2 {
        if self.is_dead() {
            return Vec2::default();
        }
        if intent.jump && !self.falling {
            self.vy = JUMP_IMPULSE;
            self.falling = true;
        }
        self.vy += GRAVITY_PER_TICK;
        if self.vy >= MAX_FALL_SPEED {
            self.vy = MAX_FALL_SPEED;
        }
        let mut dx = 0.0;
        if intent.run_left {
            dx -= MOVE_SPEED;
        } else if intent.run_right {
            dx += MOVE_SPEED;
        }
        let mut resolved = resolve_role_delta(&self.rect, Vec2::new(dx, self.vy), tiles);
        if resolved.y == 0.0 {
            self.falling = false;
        }
        if block_left && resolved.x < 0.0 {
            resolved.x = 0.0;
        }
        if block_right && resolved.x > 0.0 {
            resolved.x = 0.0;
        }
        resolved
    }

    /// Picks and commits this tick's action. Firing and throwing happen here
    /// as part of action selection; spawned hazards go into `pending`.
    pub fn select_action(
        &mut self,
        intent: &RoleIntent,
        hazards: &[Hazard],
        pending: &mut Vec<Hazard>,
    ) {
        let mut action = ActionKind::Idle;
        if self.is_dead() {
            action = ActionKind::Death;
        } else {
            if intent.run_left {
                self.flip = true;
                action = ActionKind::Run;
            }
            if intent.run_right {
                self.flip = false;
                action = ActionKind::Run;
            }
            if intent.jump || self.falling {
                action = ActionKind::Jump;
            }
            if intent.shoot {
                let due = self.attack_counter == 0
                    || self.attack_counter % self.attack_interval_ticks == 0;
                if due {
                    pending.push(Hazard::Bullet(self.spawn_bullet()));
                }
                self.attack_counter += 1;
            } else {
                self.attack_counter = 0;
            }
            if intent.throw_grenade
                && self.controller.grenades_left() > 0
                && !self.has_live_grenade(hazards, pending)
                && self.controller.take_grenade()
            {
                pending.push(Hazard::Grenade(self.spawn_grenade()));
            }
        }
        if self.hit_stun.tick() {
            if let Some(hit) = action.hit_variant() {
                if self.clips.clip(hit).is_some() {
                    action = hit;
                }
            }
        }
        if action != self.action {
            self.commit_action(action);
        }
    }

    /// Advances the current clip by one tick and records whether it is still
    /// playing.
    pub fn advance_animation(&mut self) {
        self.animation_playing = self.anim.advance();
    }

    fn has_live_grenade(&self, hazards: &[Hazard], pending: &[Hazard]) -> bool {
        hazards
            .iter()
            .chain(pending.iter())
            .any(|hazard| match hazard {
                Hazard::Grenade(grenade) => grenade.thrower == self.id,
                _ => false,
            })
    }

    fn commit_action(&mut self, action: ActionKind) {
        self.action = action;
        if let Some(clip) = self.clips.clip(action) {
            self.anim = AnimationController::start(clip);
            self.animation_playing = true;
            self.rect.width = clip.frame_width as f32;
            self.rect.height = clip.frame_height as f32;
        }
    }

    /// Bullet leaving the muzzle: at the facing edge of the role, slightly
    /// above mid-height.
    fn spawn_bullet(&self) -> Bullet {
        let x = if self.flip {
            self.rect.left()
        } else {
            self.rect.right()
        };
        let y = self.rect.bottom() - self.rect.height / 2.0 - 5.0;
        let direction = if self.flip { -1.0 } else { 1.0 };
        Bullet::spawn(self.team, Vec2::new(x, y), direction)
    }

    fn spawn_grenade(&self) -> Grenade {
        let direction = if self.flip { -1 } else { 1 };
        Grenade::spawn(
            self.team,
            self.id,
            self.rect.top_left(),
            direction,
            self.explosion_clip.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::tile::TileKind;
    use super::*;

    fn clip(sheet: &str, frame_count: u32, looped: bool) -> ActionClip {
        ActionClip {
            sheet: sheet.to_string(),
            frame_width: 60,
            frame_height: 80,
            frame_count,
            cadence: 6,
            looped,
        }
    }

    fn clip_set() -> ClipSet {
        ClipSet {
            idle: clip("soldier_idle", 4, true),
            run: clip("soldier_run", 6, true),
            jump: clip("soldier_jump", 1, true),
            death: clip("soldier_death", 5, false),
            idle_hit: Some(clip("soldier_idle_hit", 4, true)),
            run_hit: Some(clip("soldier_run_hit", 6, true)),
        }
    }

    fn test_role(team: Team) -> RoleEntity {
        RoleEntity::new(
            EntityId(7),
            team,
            Vec2::new(100.0, 100.0),
            100,
            20,
            clip_set(),
            clip("explosion", 6, false),
            ControllerKind::Player(PlayerState { grenades_left: 5 }),
        )
    }

    fn floor_under(role: &RoleEntity) -> Vec<Tile> {
        let mut tiles = Vec::new();
        let row_y = role.rect.bottom();
        for col in 0..8 {
            tiles.push(Tile {
                kind: TileKind::Dirt,
                rect: Aabb::new(col as f32 * 40.0, row_y, 40.0, 40.0),
                solid: true,
            });
        }
        tiles
    }

    #[test]
    fn new_role_takes_size_from_idle_clip() {
        let role = test_role(Team::Player);
        assert_eq!(role.rect, Aabb::new(100.0, 100.0, 60.0, 80.0));
        assert_eq!(role.action, ActionKind::Idle);
        assert!(!role.is_dead());
    }

    #[test]
    fn running_right_moves_by_move_speed_on_flat_ground() {
        let mut role = test_role(Team::Player);
        let tiles = floor_under(&role);
        let intent = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        let delta = role.movement_delta(&intent, &tiles, false, false);
        assert_eq!(delta, Vec2::new(MOVE_SPEED, 0.0));
        assert!(!role.falling);
    }

    #[test]
    fn jump_applies_impulse_once_and_holds_until_landing() {
        let mut role = test_role(Team::Player);
        let tiles = floor_under(&role);
        let intent = RoleIntent {
            jump: true,
            ..RoleIntent::default()
        };
        let first = role.movement_delta(&intent, &tiles, false, false);
        assert_eq!(first.y, JUMP_IMPULSE + GRAVITY_PER_TICK);
        assert!(role.falling);

        // Holding jump mid-air must not re-apply the impulse.
        role.rect.y += first.y;
        let second = role.movement_delta(&intent, &tiles, false, false);
        assert_eq!(second.y, first.y + GRAVITY_PER_TICK);
    }

    #[test]
    fn gravity_saturates_at_terminal_fall_speed() {
        let mut role = test_role(Team::Player);
        let intent = RoleIntent::default();
        for _ in 0..100 {
            let _ = role.movement_delta(&intent, &[], false, false);
        }
        assert_eq!(role.vy, MAX_FALL_SPEED);
        let delta = role.movement_delta(&intent, &[], false, false);
        assert_eq!(delta.y, MAX_FALL_SPEED);
    }

    #[test]
    fn dead_role_does_not_move() {
        let mut role = test_role(Team::Player);
        role.health = 0;
        let intent = RoleIntent {
            run_left: true,
            jump: true,
            ..RoleIntent::default()
        };
        let delta = role.movement_delta(&intent, &[], false, false);
        assert_eq!(delta, Vec2::default());
    }

    #[test]
    fn border_blocks_cancel_motion_into_the_border_only() {
        let mut role = test_role(Team::Player);
        let tiles = floor_under(&role);
        let left = RoleIntent {
            run_left: true,
            ..RoleIntent::default()
        };
        let blocked = role.movement_delta(&left, &tiles, true, false);
        assert_eq!(blocked.x, 0.0);

        let right = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        let allowed = role.movement_delta(&right, &tiles, true, false);
        assert_eq!(allowed.x, MOVE_SPEED);
    }

    #[test]
    fn action_priority_runs_then_jumps_then_death() {
        let mut role = test_role(Team::Player);
        let mut pending = Vec::new();

        let run = RoleIntent {
            run_left: true,
            ..RoleIntent::default()
        };
        role.select_action(&run, &[], &mut pending);
        assert_eq!(role.action, ActionKind::Run);
        assert!(role.flip);

        role.falling = true;
        role.select_action(&run, &[], &mut pending);
        assert_eq!(role.action, ActionKind::Jump);

        role.health = 0;
        role.select_action(&run, &[], &mut pending);
        assert_eq!(role.action, ActionKind::Death);
        assert!(pending.is_empty());
    }

    #[test]
    fn committing_a_new_action_restarts_the_clip_and_resizes() {
        let mut role = test_role(Team::Player);
        let mut clips = clip_set();
        clips.run.frame_width = 70;
        role.clips = clips;
        for _ in 0..7 {
            role.advance_animation();
        }
        assert_eq!(role.anim.frame(), 1);

        let run = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        role.select_action(&run, &[], &mut Vec::new());
        assert_eq!(role.anim.frame(), 0);
        assert_eq!(role.rect.width, 70.0);
    }

    #[test]
    fn repeating_the_same_action_does_not_restart_the_clip() {
        let mut role = test_role(Team::Player);
        let run = RoleIntent {
            run_right: true,
            ..RoleIntent::default()
        };
        role.select_action(&run, &[], &mut Vec::new());
        for _ in 0..7 {
            role.advance_animation();
        }
        let frame_before = role.anim.frame();
        role.select_action(&run, &[], &mut Vec::new());
        assert_eq!(role.anim.frame(), frame_before);
    }

    #[test]
    fn held_shoot_fires_on_interval_boundaries_and_resets_on_release() {
        let mut role = test_role(Team::Player);
        let shoot = RoleIntent {
            shoot: true,
            ..RoleIntent::default()
        };
        let mut pending = Vec::new();
        for _ in 0..41 {
            role.select_action(&shoot, &[], &mut pending);
        }
        // Fires at counter 0, 20 and 40.
        assert_eq!(pending.len(), 3);

        role.select_action(&RoleIntent::default(), &[], &mut pending);
        assert_eq!(role.attack_counter, 0);
        role.select_action(&shoot, &[], &mut pending);
        assert_eq!(pending.len(), 4);
    }

    #[test]
    fn bullets_spawn_at_the_facing_edge() {
        let mut role = test_role(Team::Player);
        let shoot = RoleIntent {
            shoot: true,
            ..RoleIntent::default()
        };
        let mut pending = Vec::new();
        role.select_action(&shoot, &[], &mut pending);
        let Some(Hazard::Bullet(bullet)) = pending.first() else {
            panic!("expected a bullet");
        };
        assert_eq!(bullet.rect.x, role.rect.right());
        assert_eq!(bullet.rect.y, role.rect.bottom() - role.rect.height / 2.0 - 5.0);
    }

    #[test]
    fn at_most_one_live_grenade_per_thrower() {
        let mut role = test_role(Team::Player);
        let throw = RoleIntent {
            throw_grenade: true,
            ..RoleIntent::default()
        };
        let mut pending = Vec::new();
        role.select_action(&throw, &[], &mut pending);
        assert_eq!(pending.len(), 1);
        assert_eq!(role.controller.grenades_left(), 4);

        // Still pending from this tick: no second grenade.
        role.select_action(&throw, &[], &mut pending);
        assert_eq!(pending.len(), 1);
        assert_eq!(role.controller.grenades_left(), 4);

        // Same, once the grenade made it into the live hazard list.
        let hazards: Vec<Hazard> = pending.drain(..).collect();
        role.select_action(&throw, &hazards, &mut pending);
        assert!(pending.is_empty());
        assert_eq!(role.controller.grenades_left(), 4);
    }

    #[test]
    fn grenade_throws_stop_when_inventory_is_empty() {
        let mut role = test_role(Team::Player);
        let throw = RoleIntent {
            throw_grenade: true,
            ..RoleIntent::default()
        };
        let mut thrown = 0;
        // Each round starts with an empty hazard list, as if the previous
        // grenade already detonated.
        for _ in 0..(5 + 2) {
            let mut pending = Vec::new();
            role.select_action(&throw, &[], &mut pending);
            thrown += pending.len();
        }
        assert_eq!(thrown, 5);
        assert_eq!(role.controller.grenades_left(), 0);
    }

    #[test]
    fn hit_stun_selects_hit_variant_while_active() {
        let mut role = test_role(Team::Player);
        role.hit_stun.arm(2);
        role.select_action(&RoleIntent::default(), &[], &mut Vec::new());
        assert_eq!(role.action, ActionKind::IdleHit);
        role.select_action(&RoleIntent::default(), &[], &mut Vec::new());
        assert_eq!(role.action, ActionKind::IdleHit);
        role.select_action(&RoleIntent::default(), &[], &mut Vec::new());
        assert_eq!(role.action, ActionKind::Idle);
    }

    #[test]
    fn hit_variant_falls_back_to_base_action_when_clip_is_missing() {
        let mut role = test_role(Team::Player);
        role.clips.idle_hit = None;
        role.hit_stun.arm(3);
        role.select_action(&RoleIntent::default(), &[], &mut Vec::new());
        assert_eq!(role.action, ActionKind::Idle);
    }

    #[test]
    fn jump_has_no_hit_variant() {
        let mut role = test_role(Team::Player);
        role.falling = true;
        role.hit_stun.arm(3);
        role.select_action(&RoleIntent::default(), &[], &mut Vec::new());
        assert_eq!(role.action, ActionKind::Jump);
    }
}
