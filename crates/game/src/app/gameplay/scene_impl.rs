impl Scene for BattleScene {
    fn load(&mut self, world: &mut SceneWorld) {
        let library = resolve_role_library(world);
        let level = self.load_level_or_fallback();
        let combat = self
            .build_combat_world(&level, library)
            .unwrap_or_else(|error| panic!("{error}"));
        info!(
            scene = self.scene_name,
            level = %level.name,
            tile_count = combat.tiles.len(),
            enemy_count = combat.enemies.len(),
            "scene_loaded"
        );
        world.set_combat(combat);
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        let Some(combat) = world.combat_mut() else {
            return SceneCommand::None;
        };

        if combat.game_over {
            if input.restart_pressed() {
                info!(scene = self.scene_name, "battle_restart");
                return SceneCommand::HardResetTo(self.reset_target);
            }
            return SceneCommand::None;
        }

        self.run_battle_tick(fixed_dt_seconds, input, combat);

        if combat.game_over {
            info!(
                scene = self.scene_name,
                tick = combat.tick_counter,
                enemies_left = combat.live_enemy_count(),
                "battle_over"
            );
        }

        SceneCommand::None
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        info!(
            scene = self.scene_name,
            tick = world.combat().map(|combat| combat.tick_counter).unwrap_or(0),
            "scene_unload"
        );
        self.systems_host = BattleSystemsHost::default();
    }

    fn debug_title(&self, world: &SceneWorld) -> Option<String> {
        let combat = world.combat()?;
        Some(format!(
            "Tin Soldier | Scene {} | HP {}/{} | Grenades {} | Enemies {} | Tick {}",
            self.scene_name,
            combat.player.health,
            combat.player.max_health,
            grenades_left(&combat.player),
            combat.live_enemy_count(),
            combat.tick_counter
        ))
    }
}
