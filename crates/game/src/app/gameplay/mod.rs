use std::collections::HashSet;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use engine::sim::player::grenades_left;
use engine::sim::{
    spawn_enemy, spawn_player, update_enemy, update_player, CombatWorld, EntityIdAllocator,
    FrameContext, Hazard, RoleIntent, Tile, TileKind, Vec2, TILE_SIZE_PX,
};
use engine::{
    resolve_app_paths, InputAction, InputSnapshot, RoleDef, RoleLibrary, Scene, SceneCommand,
    SceneKey, SceneWorld,
};
use serde::Deserialize;
use tracing::{info, warn};

const LEVEL_FORMAT_VERSION: u32 = 1;
const LEVEL_FILE: &str = "level_01.json";

include!("types.rs");
include!("systems.rs");
include!("scene_state.rs");
include!("scene_impl.rs");
include!("util.rs");

pub(crate) fn build_scene_pair() -> (Box<dyn Scene>, Box<dyn Scene>) {
    let scene_a = BattleScene::new("A", SceneKey::B, LEVEL_FILE);
    let scene_b = BattleScene::new("B", SceneKey::A, LEVEL_FILE);
    (Box::new(scene_a), Box::new(scene_b))
}
