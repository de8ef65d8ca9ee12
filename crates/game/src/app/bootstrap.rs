use engine::{LibraryBuildRequest, LoopConfig, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay;

const REBUILD_CONTENT_ENV_VAR: &str = "TINSOLDIER_REBUILD_CONTENT";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene_a: Box<dyn Scene>,
    pub(crate) scene_b: Box<dyn Scene>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Tin Soldier Startup ===");

    let (scene_a, scene_b) = gameplay::build_scene_pair();
    let config = LoopConfig {
        library_build_request: LibraryBuildRequest {
            force_rebuild: parse_force_rebuild_from_env(),
            compiler_version: env!("CARGO_PKG_VERSION").to_string(),
            game_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        ..LoopConfig::default()
    };

    AppWiring {
        config,
        scene_a,
        scene_b,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_force_rebuild_from_env() -> bool {
    std::env::var(REBUILD_CONTENT_ENV_VAR)
        .map(|raw| {
            let trimmed = raw.trim();
            !trimmed.is_empty() && trimmed != "0"
        })
        .unwrap_or(false)
}
