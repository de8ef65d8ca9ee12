use std::path::PathBuf;

use thiserror::Error;

/// Inputs the caller pins the cache to. A pack compiled under a different
/// compiler or game version is never reused.
#[derive(Debug, Clone)]
pub struct LibraryBuildRequest {
    pub force_rebuild: bool,
    pub compiler_version: String,
    pub game_version: String,
}

impl Default for LibraryBuildRequest {
    fn default() -> Self {
        Self {
            force_rebuild: false,
            compiler_version: "dev".to_string(),
            game_version: "dev".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildAction {
    UseCache,
    Compile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    CacheValid,
    Forced,
    CacheMissing,
    CacheUnreadable,
    FormatVersionMismatch,
    CompilerVersionMismatch,
    GameVersionMismatch,
    InputHashMismatch,
}

/// Outcome of planning one library build: the def sources that were found,
/// their combined hash, and whether the cached pack can stand in for a
/// recompile.
#[derive(Debug, Clone)]
pub struct LibraryBuildDecision {
    pub defs_dir: PathBuf,
    pub xml_files: Vec<PathBuf>,
    pub input_hash_sha256_hex: String,
    pub pack_path: PathBuf,
    pub action: BuildAction,
    pub reason: RebuildReason,
}

#[derive(Debug, Error)]
pub enum LibraryPlanError {
    #[error("defs directory not found at {path}")]
    DefsDirMissing { path: PathBuf },
    #[error("no def XML files found under {path}")]
    NoDefsFound { path: PathBuf },
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create cache layout at {path}: {source}")]
    CreateCacheLayout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
