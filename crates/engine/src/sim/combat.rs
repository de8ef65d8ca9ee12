//! Damage application between hazards and roles.

use super::hazard::Hazard;
use super::role::RoleEntity;
use super::Team;

/// Damage one player bullet deals to an enemy.
pub const PLAYER_BULLET_DAMAGE: i32 = 20;
/// Damage one enemy bullet deals to the player.
pub const ENEMY_BULLET_DAMAGE: i32 = 20;
/// Damage an explosion deals to each role caught in it, once per role.
pub const EXPLOSION_DAMAGE: i32 = 50;
/// Ticks of hit stun a player bullet inflicts. Enemy bullets never stun.
pub const HIT_STUN_TICKS: u32 = 6;

/// Applies this tick's hazard damage to one role.
///
/// Bullets damage only the opposing team and are consumed by the first hit.
/// Explosions damage each opposing role at most once over their lifetime,
/// tracked in the explosion's damaged-set. A role that drops to zero health
/// mid-pass takes no further damage this tick, and a dead role takes none
/// at all.
pub fn apply_hazard_damage(role: &mut RoleEntity, hazards: &mut [Hazard]) {
    for hazard in hazards.iter_mut() {
        if role.is_dead() {
            return;
        }
        match hazard {
            Hazard::Bullet(bullet) => {
                if bullet.removed || !bullet.team.opposes(role.team) {
                    continue;
                }
                if bullet.rect.overlaps(&role.rect) {
                    if bullet.team == Team::Player {
                        role.hit_stun.arm(HIT_STUN_TICKS);
                        role.health -= PLAYER_BULLET_DAMAGE;
                    } else {
                        role.health -= ENEMY_BULLET_DAMAGE;
                    }
                    bullet.removed = true;
                }
            }
            Hazard::Explosion(explosion) => {
                if !explosion.team.opposes(role.team) || explosion.damaged.contains(&role.id) {
                    continue;
                }
                if explosion.rect.overlaps(&role.rect) {
                    role.health -= EXPLOSION_DAMAGE;
                    explosion.damaged.insert(role.id);
                }
            }
            Hazard::Grenade(_) => {}
        }
    }
}
