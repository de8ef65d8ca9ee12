struct BattleScene {
    scene_name: &'static str,
    reset_target: SceneKey,
    level_file_name: &'static str,
    systems_host: BattleSystemsHost,
}

impl BattleScene {
    fn new(
        scene_name: &'static str,
        reset_target: SceneKey,
        level_file_name: &'static str,
    ) -> Self {
        Self {
            scene_name,
            reset_target,
            level_file_name,
            systems_host: BattleSystemsHost::default(),
        }
    }

    fn level_file_path(&self) -> LevelLoadResult<PathBuf> {
        let app_paths =
            resolve_app_paths().map_err(|error| format!("resolve app paths: {error}"))?;
        Ok(app_paths.assets_dir.join("levels").join(self.level_file_name))
    }

    fn load_level_from_disk(&self) -> LevelLoadResult<LevelFile> {
        let path = self.level_file_path()?;
        Self::read_level_file(&path)
    }

    fn read_level_file(path: &Path) -> LevelLoadResult<LevelFile> {
        let raw = fs::read_to_string(path)
            .map_err(|error| format!("read level '{}': {error}", path.display()))?;
        let level = Self::parse_level_json(&raw)?;
        Self::validate_level(&level)?;
        Ok(level)
    }

    fn parse_level_json(raw: &str) -> LevelLoadResult<LevelFile> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        match serde_path_to_error::deserialize::<_, LevelFile>(&mut deserializer) {
            Ok(level) => Ok(level),
            Err(error) => {
                let path = error.path().to_string();
                let source = error.into_inner();
                if path.is_empty() || path == "." {
                    Err(format!("parse level json: {source}"))
                } else {
                    Err(format!("parse level json at {path}: {source}"))
                }
            }
        }
    }

    fn validation_err(path: &str, message: impl Into<String>) -> String {
        format!("validation failed at {path}: {}", message.into())
    }

    fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> String {
        Self::validation_err(path, format!("expected {expected}, got {actual}"))
    }

    fn validate_level(level: &LevelFile) -> LevelLoadResult<()> {
        if level.format_version != LEVEL_FORMAT_VERSION {
            return Err(Self::expected_actual(
                "format_version",
                LEVEL_FORMAT_VERSION,
                level.format_version,
            ));
        }
        if level.tile_size != TILE_SIZE_PX as u32 {
            return Err(Self::expected_actual(
                "tile_size",
                TILE_SIZE_PX as u32,
                level.tile_size,
            ));
        }
        if level.tiles.is_empty() {
            return Err(Self::validation_err("tiles", "expected at least one tile"));
        }

        let mut seen_cells = HashSet::with_capacity(level.tiles.len());
        for (index, tile) in level.tiles.iter().enumerate() {
            if !seen_cells.insert((tile.col, tile.row)) {
                let path = format!("tiles[{index}]");
                return Err(Self::validation_err(
                    &path,
                    format!("duplicate cell ({}, {})", tile.col, tile.row),
                ));
            }
        }
        Ok(())
    }

    fn load_level_or_fallback(&self) -> LevelFile {
        match self.load_level_from_disk() {
            Ok(level) => level,
            Err(error) => {
                warn!(
                    scene = self.scene_name,
                    file = self.level_file_name,
                    error = %error,
                    "level_load_failed"
                );
                fallback_level()
            }
        }
    }

    fn build_combat_world(
        &self,
        level: &LevelFile,
        library: &RoleLibrary,
    ) -> LevelLoadResult<CombatWorld> {
        let mut ids = EntityIdAllocator::default();

        let player_def = try_resolve_role_def(library, &level.player_spawn.role)?;
        let player = spawn_player(
            ids.allocate(),
            level.player_spawn.top_left(),
            player_def.clips.clone(),
            library.explosion_clip().clone(),
        );

        let mut enemies = Vec::with_capacity(level.enemy_spawns.len());
        for spawn in &level.enemy_spawns {
            let def = match try_resolve_role_def(library, &spawn.role) {
                Ok(def) => def,
                Err(error) => {
                    warn!(
                        scene = self.scene_name,
                        role = %spawn.role,
                        error = %error,
                        "level_enemy_role_unknown"
                    );
                    continue;
                }
            };
            enemies.push(spawn_enemy(
                ids.allocate(),
                spawn.top_left(),
                def.clips.clone(),
                library.explosion_clip().clone(),
            ));
        }

        let tiles: Vec<Tile> = level
            .tiles
            .iter()
            .map(|record| {
                Tile::at_cell(
                    record.kind.to_tile_kind(),
                    record.col,
                    record.row,
                    record.solid,
                )
            })
            .collect();
        let world_right_edge_x = tiles
            .iter()
            .map(|tile| tile.rect.right())
            .fold(0.0f32, f32::max);

        Ok(CombatWorld::new(player, enemies, tiles, world_right_edge_x))
    }

    fn run_battle_tick(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        combat: &mut CombatWorld,
    ) {
        let intent = player_intent_from_input(input);
        let mut frame = FrameContext::for_tick(fixed_dt_seconds, combat.world_right_edge_x);
        self.systems_host
            .run_once_per_tick(&mut frame, combat, &intent);
    }
}
