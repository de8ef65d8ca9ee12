use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::AppPaths;

use super::defs::{compile_role_library, DefCompileError};
use super::hashing::hash_defs_inputs;
use super::library::RoleLibrary;
use super::pack::{
    library_from_pack, read_library_pack, write_library_pack, LibraryPackError, LibraryPackMeta,
    PackReadState, LIBRARY_PACK_FORMAT_VERSION,
};
use super::types::{
    BuildAction, LibraryBuildDecision, LibraryBuildRequest, LibraryPlanError, RebuildReason,
};

#[derive(Debug, Error)]
pub enum RoleLibraryError {
    #[error(transparent)]
    Plan(#[from] LibraryPlanError),
    #[error(transparent)]
    Compile(#[from] DefCompileError),
    #[error(transparent)]
    Pack(#[from] LibraryPackError),
}

/// Loads the role library from the cached pack when it is still valid for
/// the current def sources and versions, otherwise recompiles from XML and
/// rewrites the cache. Compile errors are fatal; cache problems only ever
/// cost a rebuild.
pub fn build_or_load_role_library(
    app_paths: &AppPaths,
    request: &LibraryBuildRequest,
) -> Result<RoleLibrary, RoleLibraryError> {
    let decision = plan_library_build(app_paths, request)?;
    info!(
        defs_dir = %decision.defs_dir.display(),
        xml_file_count = decision.xml_files.len(),
        action = ?decision.action,
        reason = ?decision.reason,
        input_hash = %decision.input_hash_sha256_hex,
        pack_path = %decision.pack_path.display(),
        "library_build_decision"
    );

    match decision.action {
        BuildAction::Compile => compile_and_write_pack(&decision, request),
        BuildAction::UseCache => match try_load_cached_library(&decision, request) {
            Ok(library) => {
                info!(
                    pack_path = %decision.pack_path.display(),
                    input_hash = %decision.input_hash_sha256_hex,
                    role_def_count = library.role_defs().len(),
                    "content_cache_hit"
                );
                Ok(library)
            }
            Err(reason) => {
                warn!(reason = %reason, "content_cache_invalid_rebuilding");
                compile_and_write_pack(&decision, request)
            }
        },
    }
}

/// Decides whether the cached pack can be reused. Forced rebuilds skip the
/// cache read entirely.
pub fn plan_library_build(
    app_paths: &AppPaths,
    request: &LibraryBuildRequest,
) -> Result<LibraryBuildDecision, LibraryPlanError> {
    let defs_dir = app_paths.assets_dir.join("defs");
    if !defs_dir.is_dir() {
        return Err(LibraryPlanError::DefsDirMissing { path: defs_dir });
    }
    let input = hash_defs_inputs(&defs_dir)?;
    if input.xml_files.is_empty() {
        return Err(LibraryPlanError::NoDefsFound { path: defs_dir });
    }

    let pack_dir = library_cache_dir(&app_paths.cache_dir);
    fs::create_dir_all(&pack_dir).map_err(|source| LibraryPlanError::CreateCacheLayout {
        path: pack_dir.clone(),
        source,
    })?;
    let pack_path = library_pack_path(&app_paths.cache_dir);

    let (action, reason) = evaluate_cache_validity(&pack_path, request, &input.hash_hex)?;
    Ok(LibraryBuildDecision {
        defs_dir,
        xml_files: input.xml_files,
        input_hash_sha256_hex: input.hash_hex,
        pack_path,
        action,
        reason,
    })
}

fn evaluate_cache_validity(
    pack_path: &Path,
    request: &LibraryBuildRequest,
    input_hash_sha256_hex: &str,
) -> Result<(BuildAction, RebuildReason), LibraryPlanError> {
    if request.force_rebuild {
        return Ok((BuildAction::Compile, RebuildReason::Forced));
    }

    let pack = match read_library_pack(pack_path) {
        Ok(PackReadState::Missing) => {
            return Ok((BuildAction::Compile, RebuildReason::CacheMissing))
        }
        Ok(PackReadState::Unreadable) => {
            return Ok((BuildAction::Compile, RebuildReason::CacheUnreadable))
        }
        Ok(PackReadState::Present(pack)) => pack,
        Err(LibraryPackError::Io { path, source }) => {
            return Err(LibraryPlanError::ReadFile { path, source })
        }
        Err(LibraryPackError::InvalidFormat { .. }) => {
            return Ok((BuildAction::Compile, RebuildReason::CacheUnreadable))
        }
    };

    if pack.meta.pack_format_version != LIBRARY_PACK_FORMAT_VERSION {
        return Ok((BuildAction::Compile, RebuildReason::FormatVersionMismatch));
    }
    if pack.meta.compiler_version != request.compiler_version {
        return Ok((BuildAction::Compile, RebuildReason::CompilerVersionMismatch));
    }
    if pack.meta.game_version != request.game_version {
        return Ok((BuildAction::Compile, RebuildReason::GameVersionMismatch));
    }
    if pack.meta.input_hash_sha256_hex != input_hash_sha256_hex {
        return Ok((BuildAction::Compile, RebuildReason::InputHashMismatch));
    }
    Ok((BuildAction::UseCache, RebuildReason::CacheValid))
}

fn compile_and_write_pack(
    decision: &LibraryBuildDecision,
    request: &LibraryBuildRequest,
) -> Result<RoleLibrary, RoleLibraryError> {
    let library = compile_role_library(&decision.xml_files)?;
    let meta = expected_meta(decision, request);
    write_library_pack(&decision.pack_path, &meta, &library)?;
    info!(
        pack_path = %decision.pack_path.display(),
        role_def_count = library.role_defs().len(),
        "library_compiled_and_cached"
    );
    Ok(library)
}

fn try_load_cached_library(
    decision: &LibraryBuildDecision,
    request: &LibraryBuildRequest,
) -> Result<RoleLibrary, String> {
    let pack = match read_library_pack(&decision.pack_path) {
        Ok(PackReadState::Present(pack)) => pack,
        Ok(PackReadState::Missing) => return Err("pack missing".to_string()),
        Ok(PackReadState::Unreadable) => return Err("pack unreadable".to_string()),
        Err(error) => return Err(format!("failed to read pack: {error}")),
    };

    let expected = expected_meta(decision, request);
    if pack.meta != expected {
        return Err("pack meta does not match current inputs".to_string());
    }
    Ok(library_from_pack(pack))
}

fn expected_meta(
    decision: &LibraryBuildDecision,
    request: &LibraryBuildRequest,
) -> LibraryPackMeta {
    LibraryPackMeta {
        pack_format_version: LIBRARY_PACK_FORMAT_VERSION,
        compiler_version: request.compiler_version.clone(),
        game_version: request.game_version.clone(),
        input_hash_sha256_hex: decision.input_hash_sha256_hex.clone(),
    }
}

pub(crate) fn library_cache_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join("content")
}

pub(crate) fn library_pack_path(cache_dir: &Path) -> PathBuf {
    library_cache_dir(cache_dir).join("role_library.json")
}
