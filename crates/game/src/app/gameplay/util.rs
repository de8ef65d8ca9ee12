fn player_intent_from_input(input: &InputSnapshot) -> RoleIntent {
    RoleIntent {
        run_left: input.is_down(InputAction::RunLeft),
        run_right: input.is_down(InputAction::RunRight),
        jump: input.is_down(InputAction::Jump),
        shoot: input.is_down(InputAction::Shoot),
        throw_grenade: input.is_down(InputAction::ThrowGrenade),
    }
}

fn resolve_role_library(world: &SceneWorld) -> &RoleLibrary {
    try_resolve_role_library(world).unwrap_or_else(|error| panic!("{error}"))
}

fn try_resolve_role_library(world: &SceneWorld) -> LevelLoadResult<&RoleLibrary> {
    world
        .role_library()
        .ok_or_else(|| "RoleLibrary not set on SceneWorld before scene load".to_string())
}

fn try_resolve_role_def<'a>(
    library: &'a RoleLibrary,
    role_name: &str,
) -> LevelLoadResult<&'a RoleDef> {
    let def_id = library.role_def_id_by_name(role_name).ok_or_else(|| {
        format!(
            "unknown role def '{role_name}'; add it to assets/defs/roles.xml and fix XML compile errors"
        )
    })?;
    library
        .role_def(def_id)
        .ok_or_else(|| format!("RoleDef id for '{role_name}' is missing from RoleLibrary"))
}

/// Built-in two-screen flat strip used when the shipped level file cannot
/// be loaded.
fn fallback_level() -> LevelFile {
    let mut tiles = Vec::new();
    for col in 0..40 {
        tiles.push(LevelTileRecord {
            kind: LevelTileKind::Grass,
            col,
            row: 14,
            solid: true,
        });
        tiles.push(LevelTileRecord {
            kind: LevelTileKind::Dirt,
            col,
            row: 15,
            solid: true,
        });
    }

    LevelFile {
        format_version: LEVEL_FORMAT_VERSION,
        name: "fallback".to_string(),
        tile_size: TILE_SIZE_PX as u32,
        tiles,
        player_spawn: LevelSpawnRecord {
            role: "soldier".to_string(),
            col: 2,
            row: 12,
        },
        enemy_spawns: vec![LevelSpawnRecord {
            role: "raider".to_string(),
            col: 16,
            row: 12,
        }],
    }
}
