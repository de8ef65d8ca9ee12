#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BattleSystemId {
    PlayerUpdate,
    EnemyUpdate,
    BulletUpdate,
    GrenadeUpdate,
    ExplosionUpdate,
    WorldSweep,
}

impl BattleSystemId {
    #[cfg(test)]
    fn name(self) -> &'static str {
        match self {
            Self::PlayerUpdate => "PlayerUpdate",
            Self::EnemyUpdate => "EnemyUpdate",
            Self::BulletUpdate => "BulletUpdate",
            Self::GrenadeUpdate => "GrenadeUpdate",
            Self::ExplosionUpdate => "ExplosionUpdate",
            Self::WorldSweep => "WorldSweep",
        }
    }
}

const BATTLE_SYSTEM_ORDER: [BattleSystemId; 6] = [
    BattleSystemId::PlayerUpdate,
    BattleSystemId::EnemyUpdate,
    BattleSystemId::BulletUpdate,
    BattleSystemId::GrenadeUpdate,
    BattleSystemId::ExplosionUpdate,
    BattleSystemId::WorldSweep,
];

struct BattleSystemContext<'a> {
    frame: &'a mut FrameContext,
    combat: &'a mut CombatWorld,
    player_intent: &'a RoleIntent,
}

#[derive(Default)]
struct BattleSystemsHost {
    last_tick_order: Vec<BattleSystemId>,
}

impl BattleSystemsHost {
    fn run_once_per_tick(
        &mut self,
        frame: &mut FrameContext,
        combat: &mut CombatWorld,
        player_intent: &RoleIntent,
    ) {
        self.last_tick_order.clear();
        for system_id in BATTLE_SYSTEM_ORDER {
            self.last_tick_order.push(system_id);
            let mut context = BattleSystemContext {
                frame,
                combat,
                player_intent,
            };
            self.run_system(system_id, &mut context);
        }
    }

    fn run_player_system(&self, context: &mut BattleSystemContext<'_>) {
        let CombatWorld {
            player,
            hazards,
            pending_hazards,
            tiles,
            ..
        } = context.combat;
        update_player(
            player,
            context.player_intent,
            context.frame,
            tiles,
            hazards,
            pending_hazards,
        );
    }

    fn run_enemy_system(&self, context: &mut BattleSystemContext<'_>) {
        let CombatWorld {
            player,
            enemies,
            hazards,
            pending_hazards,
            tiles,
            ..
        } = context.combat;
        for enemy in enemies.iter_mut() {
            update_enemy(enemy, player, context.frame, tiles, hazards, pending_hazards);
        }
    }

    fn run_bullet_system(&self, context: &mut BattleSystemContext<'_>) {
        let CombatWorld { hazards, tiles, .. } = context.combat;
        for hazard in hazards.iter_mut() {
            if let Hazard::Bullet(bullet) = hazard {
                bullet.update(context.frame, tiles);
            }
        }
    }

    fn run_grenade_system(&self, context: &mut BattleSystemContext<'_>) {
        let CombatWorld {
            hazards,
            pending_hazards,
            tiles,
            ..
        } = context.combat;
        for hazard in hazards.iter_mut() {
            if let Hazard::Grenade(grenade) = hazard {
                if let Some(explosion) = grenade.update(context.frame, tiles) {
                    pending_hazards.push(Hazard::Explosion(explosion));
                }
            }
        }
    }

    fn run_explosion_system(&self, context: &mut BattleSystemContext<'_>) {
        for hazard in context.combat.hazards.iter_mut() {
            if let Hazard::Explosion(explosion) = hazard {
                explosion.update();
            }
        }
    }

    fn run_system(&self, system_id: BattleSystemId, context: &mut BattleSystemContext<'_>) {
        match system_id {
            BattleSystemId::PlayerUpdate => {
                self.run_player_system(context);
            }
            BattleSystemId::EnemyUpdate => {
                self.run_enemy_system(context);
                // Shots and throws from this tick's roles join the live
                // hazard list before any hazard moves.
                context.combat.apply_pending_hazards();
            }
            BattleSystemId::BulletUpdate => {
                self.run_bullet_system(context);
            }
            BattleSystemId::GrenadeUpdate => {
                self.run_grenade_system(context);
                // Fresh explosions must be live before the explosion pass.
                context.combat.apply_pending_hazards();
            }
            BattleSystemId::ExplosionUpdate => {
                self.run_explosion_system(context);
            }
            BattleSystemId::WorldSweep => {
                context.combat.sweep(context.frame);
            }
        }
    }
}
