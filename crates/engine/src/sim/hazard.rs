//! Projectiles, grenades and explosions.
//!
//! Hazards are the transient combatants of the world: they carry a team,
//! occupy a box, and either expire on their own or convert into another
//! hazard. The tagged enum keeps the heterogeneous hazard list explicit;
//! damage application pattern-matches instead of probing fields.

use std::collections::HashSet;

use super::animation::{ActionClip, AnimationController};
use super::collision::resolve_grenade_delta;
use super::context::FrameContext;
use super::countdown::Countdown;
use super::geom::{Aabb, Vec2};
use super::tile::Tile;
use super::world::EntityId;
use super::{Team, GRAVITY_PER_TICK, MAX_FALL_SPEED, SCREEN_WIDTH};

/// Bullet muzzle speed in pixels per second, before the team multiplier.
pub const BULLET_SPEED_PX_PER_SEC: f32 = 500.0;
/// Base bullet lifetime in ticks, before the team multiplier.
pub const BULLET_LIFE_TICKS: u32 = 90;
pub const BULLET_WIDTH: f32 = 16.0;
pub const BULLET_HEIGHT: f32 = 8.0;

/// How far past the screen edges a hazard may travel before it is culled.
pub const OFF_WORLD_MARGIN: f32 = 50.0;

/// Horizontal launch speed of a thrown grenade in pixels per tick.
pub const GRENADE_THROW_SPEED: f32 = 7.0;
/// Initial vertical velocity of a thrown grenade. Negative is up.
pub const GRENADE_LAUNCH_VY: f32 = -11.0;
/// Ticks from throw to detonation. Impact never detonates a grenade; it
/// bounces until the fuse runs out.
pub const GRENADE_FUSE_TICKS: u32 = 120;
pub const GRENADE_SIZE: f32 = 16.0;

/// Enemy bullets fly at half speed and live twice as long, covering the
/// same distance.
fn team_speed_multiplier(team: Team) -> f32 {
    match team {
        Team::Player => 1.0,
        Team::Enemy => 0.5,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Hazard {
    Bullet(Bullet),
    Grenade(Grenade),
    Explosion(Explosion),
}

impl Hazard {
    pub fn team(&self) -> Team {
        match self {
            Hazard::Bullet(bullet) => bullet.team,
            Hazard::Grenade(grenade) => grenade.team,
            Hazard::Explosion(explosion) => explosion.team,
        }
    }

    pub fn rect(&self) -> Aabb {
        match self {
            Hazard::Bullet(bullet) => bullet.rect,
            Hazard::Grenade(grenade) => grenade.rect,
            Hazard::Explosion(explosion) => explosion.rect,
        }
    }

    pub fn removed(&self) -> bool {
        match self {
            Hazard::Bullet(bullet) => bullet.removed,
            Hazard::Grenade(grenade) => grenade.removed,
            Hazard::Explosion(explosion) => explosion.removed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub team: Team,
    pub rect: Aabb,
    /// Facing sign: 1.0 flies right, -1.0 flies left.
    pub direction: f32,
    pub speed_px_per_sec: f32,
    pub age_ticks: u32,
    pub life_ticks: u32,
    pub removed: bool,
}

impl Bullet {
    pub fn spawn(team: Team, top_left: Vec2, direction: f32) -> Self {
        let multiplier = team_speed_multiplier(team);
        Self {
            team,
            rect: Aabb::new(top_left.x, top_left.y, BULLET_WIDTH, BULLET_HEIGHT),
            direction,
            speed_px_per_sec: BULLET_SPEED_PX_PER_SEC * multiplier,
            age_ticks: 0,
            life_ticks: (BULLET_LIFE_TICKS as f32 * (1.0 / multiplier)) as u32,
            removed: false,
        }
    }

    /// Flies one tick, then culls: off the screen on either side (with
    /// margin), past its lifetime, or into any tile.
    pub fn update(&mut self, ctx: &FrameContext, tiles: &[Tile]) {
        self.age_ticks += 1;
        self.rect.x += ctx.scroll_dx;
        self.rect.x += ctx.fixed_dt_seconds * self.speed_px_per_sec * self.direction;
        if self.rect.right() < -OFF_WORLD_MARGIN
            || self.rect.left() > SCREEN_WIDTH + OFF_WORLD_MARGIN
            || self.age_ticks > self.life_ticks
        {
            self.removed = true;
            return;
        }
        for tile in tiles {
            if tile.rect.overlaps(&self.rect) {
                self.removed = true;
                return;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grenade {
    pub team: Team,
    /// Role that threw this grenade. At most one live grenade per thrower.
    pub thrower: EntityId,
    pub rect: Aabb,
    /// Travel sign, flipped on every wall bounce.
    pub direction: i32,
    pub vy: f32,
    pub fuse: Countdown,
    pub explosion_clip: ActionClip,
    pub removed: bool,
}

impl Grenade {
    pub fn spawn(
        team: Team,
        thrower: EntityId,
        top_left: Vec2,
        direction: i32,
        explosion_clip: ActionClip,
    ) -> Self {
        Self {
            team,
            thrower,
            rect: Aabb::new(top_left.x, top_left.y, GRENADE_SIZE, GRENADE_SIZE),
            direction,
            vy: GRENADE_LAUNCH_VY,
            fuse: Countdown::new(GRENADE_FUSE_TICKS),
            explosion_clip,
            removed: false,
        }
    }

    /// One tick of parabolic flight. On fuse expiry the grenade removes
    /// itself, requests a screen shake and returns the explosion to spawn
    /// at its current center.
    pub fn update(&mut self, ctx: &mut FrameContext, tiles: &[Tile]) -> Option<Explosion> {
        self.rect.x += ctx.scroll_dx;
        let proposed = Vec2::new(GRENADE_THROW_SPEED * self.direction as f32, self.vy);
        self.vy += GRAVITY_PER_TICK;
        if self.vy >= MAX_FALL_SPEED {
            self.vy = MAX_FALL_SPEED;
        }
        let resolution = resolve_grenade_delta(&self.rect, proposed, self.direction, tiles);
        self.direction = resolution.direction;
        self.rect.x += resolution.delta.x;
        self.rect.y += resolution.delta.y;

        self.fuse.tick();
        if self.fuse.is_active() {
            return None;
        }
        self.removed = true;
        ctx.shake_requested = true;
        Some(Explosion::at_center(
            self.team,
            Vec2::new(self.rect.center_x(), self.rect.center_y()),
            &self.explosion_clip,
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub team: Team,
    pub rect: Aabb,
    /// Roles already damaged by this explosion. Each identity is damaged at
    /// most once over the explosion's lifetime.
    pub damaged: HashSet<EntityId>,
    pub clip: ActionClip,
    pub anim: AnimationController,
    pub removed: bool,
}

impl Explosion {
    pub fn at_center(team: Team, center: Vec2, clip: &ActionClip) -> Self {
        Self {
            team,
            rect: Aabb::centered_at(
                center.x,
                center.y,
                clip.frame_width as f32,
                clip.frame_height as f32,
            ),
            damaged: HashSet::new(),
            clip: clip.clone(),
            anim: AnimationController::start(clip),
            removed: false,
        }
    }

    /// Plays the blast clip once, then removes itself. Explosions do not
    /// scroll with the world; they stay where they detonated on screen.
    pub fn update(&mut self) {
        if !self.anim.advance() {
            self.removed = true;
        }
    }
}
