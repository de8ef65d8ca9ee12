use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{ActionClip, ClipSet};

use super::atomic_io::write_text_atomic;
use super::library::{RoleDef, RoleDefId, RoleLibrary};

pub(crate) const LIBRARY_PACK_FORMAT_VERSION: u16 = 1;

/// Provenance header stored inside the pack. The planner compares it against
/// the current request and def sources before trusting the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LibraryPackMeta {
    pub pack_format_version: u16,
    pub compiler_version: String,
    pub game_version: String,
    pub input_hash_sha256_hex: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PackedRoleDef {
    pub def_name: String,
    pub label: String,
    pub clips: ClipSet,
}

/// On-disk cache of a compiled [`RoleLibrary`]. Role ids are not stored;
/// they are reassigned positionally on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LibraryPackV1 {
    pub meta: LibraryPackMeta,
    pub role_defs: Vec<PackedRoleDef>,
    pub explosion_clip: ActionClip,
}

#[derive(Debug, Error)]
pub enum LibraryPackError {
    #[error("failed to read/write file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("pack at {path} has invalid format: {message}")]
    InvalidFormat { path: PathBuf, message: String },
}

#[derive(Debug, Clone)]
pub(crate) enum PackReadState {
    Missing,
    Unreadable,
    Present(LibraryPackV1),
}

pub(crate) fn write_library_pack(
    path: &Path,
    meta: &LibraryPackMeta,
    library: &RoleLibrary,
) -> Result<(), LibraryPackError> {
    let pack = LibraryPackV1 {
        meta: meta.clone(),
        role_defs: library
            .role_defs()
            .iter()
            .map(|def| PackedRoleDef {
                def_name: def.def_name.clone(),
                label: def.label.clone(),
                clips: def.clips.clone(),
            })
            .collect(),
        explosion_clip: library.explosion_clip().clone(),
    };
    let text =
        serde_json::to_string_pretty(&pack).map_err(|error| LibraryPackError::InvalidFormat {
            path: path.to_path_buf(),
            message: format!("failed to encode pack json: {error}"),
        })?;
    write_text_atomic(path, &text).map_err(|source| LibraryPackError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a cached pack. A missing file and a file that fails to parse are
/// both read states rather than errors; the pipeline rebuilds in either
/// case. Only an I/O failure on an existing file is an error.
pub(crate) fn read_library_pack(path: &Path) -> Result<PackReadState, LibraryPackError> {
    if !path.exists() {
        return Ok(PackReadState::Missing);
    }

    let raw = fs::read_to_string(path).map_err(|source| LibraryPackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match serde_json::from_str::<LibraryPackV1>(&raw) {
        Ok(pack) => Ok(PackReadState::Present(pack)),
        Err(_) => Ok(PackReadState::Unreadable),
    }
}

pub(crate) fn library_from_pack(pack: LibraryPackV1) -> RoleLibrary {
    let role_defs = pack
        .role_defs
        .into_iter()
        .map(|packed| RoleDef {
            id: RoleDefId(0),
            def_name: packed.def_name,
            label: packed.label,
            clips: packed.clips,
        })
        .collect();
    RoleLibrary::from_parts(role_defs, pack.explosion_clip)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn clip(sheet: &str) -> ActionClip {
        ActionClip {
            sheet: sheet.to_string(),
            frame_width: 60,
            frame_height: 80,
            frame_count: 4,
            cadence: 6,
            looped: true,
        }
    }

    fn sample_library() -> RoleLibrary {
        let clips = ClipSet {
            idle: clip("soldier_idle"),
            run: clip("soldier_run"),
            jump: clip("soldier_jump"),
            death: clip("soldier_death"),
            idle_hit: None,
            run_hit: None,
        };
        RoleLibrary::from_parts(
            vec![RoleDef {
                id: RoleDefId(0),
                def_name: "soldier".to_string(),
                label: "Soldier".to_string(),
                clips,
            }],
            clip("explosion"),
        )
    }

    fn sample_meta() -> LibraryPackMeta {
        LibraryPackMeta {
            pack_format_version: LIBRARY_PACK_FORMAT_VERSION,
            compiler_version: "1".to_string(),
            game_version: "1".to_string(),
            input_hash_sha256_hex: "00".repeat(32),
        }
    }

    #[test]
    fn pack_roundtrip_preserves_defs_and_meta() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("role_library.json");
        write_library_pack(&path, &sample_meta(), &sample_library()).expect("write");

        let PackReadState::Present(pack) = read_library_pack(&path).expect("read") else {
            panic!("expected a readable pack");
        };
        assert_eq!(pack.meta, sample_meta());
        assert_eq!(pack.role_defs.len(), 1);
        assert_eq!(pack.role_defs[0].def_name, "soldier");
        assert_eq!(pack.explosion_clip.sheet, "explosion");

        let library = library_from_pack(pack);
        let id = library.role_def_id_by_name("soldier").expect("soldier");
        assert_eq!(id, RoleDefId(0));
        assert_eq!(library.role_def(id).expect("def").label, "Soldier");
    }

    #[test]
    fn missing_pack_reads_as_missing() {
        let temp = TempDir::new().expect("temp");
        let state = read_library_pack(&temp.path().join("absent.json")).expect("read");
        assert!(matches!(state, PackReadState::Missing));
    }

    #[test]
    fn corrupt_pack_reads_as_unreadable() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("role_library.json");
        std::fs::write(&path, "not json at all").expect("write");
        let state = read_library_pack(&path).expect("read");
        assert!(matches!(state, PackReadState::Unreadable));
    }

    #[test]
    fn writing_twice_replaces_the_pack_in_place() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("role_library.json");
        write_library_pack(&path, &sample_meta(), &sample_library()).expect("first write");

        let mut meta = sample_meta();
        meta.input_hash_sha256_hex = "11".repeat(32);
        write_library_pack(&path, &meta, &sample_library()).expect("second write");

        let PackReadState::Present(pack) = read_library_pack(&path).expect("read") else {
            panic!("expected a readable pack");
        };
        assert_eq!(pack.meta.input_hash_sha256_hex, "11".repeat(32));
        assert!(!path.with_file_name("role_library.json.tmp").exists());
    }
}
