type LevelLoadResult<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct LevelFile {
    format_version: u32,
    name: String,
    tile_size: u32,
    tiles: Vec<LevelTileRecord>,
    player_spawn: LevelSpawnRecord,
    enemy_spawns: Vec<LevelSpawnRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
struct LevelTileRecord {
    kind: LevelTileKind,
    col: u32,
    row: u32,
    solid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum LevelTileKind {
    Grass,
    Dirt,
    Platform,
}

impl LevelTileKind {
    fn to_tile_kind(self) -> TileKind {
        match self {
            LevelTileKind::Grass => TileKind::Grass,
            LevelTileKind::Dirt => TileKind::Dirt,
            LevelTileKind::Platform => TileKind::Platform,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct LevelSpawnRecord {
    role: String,
    col: u32,
    row: u32,
}

impl LevelSpawnRecord {
    /// World position of the spawn cell's top-left corner.
    fn top_left(&self) -> Vec2 {
        Vec2::new(
            self.col as f32 * TILE_SIZE_PX,
            self.row as f32 * TILE_SIZE_PX,
        )
    }
}
