mod atomic_io;
mod defs;
mod hashing;
mod library;
mod pack;
mod pipeline;
mod types;

pub use defs::{compile_role_library, DefCompileError, DefErrorCode, SourceLocation};
pub use library::{RoleDef, RoleDefId, RoleLibrary};
pub use pack::LibraryPackError;
pub use pipeline::{build_or_load_role_library, plan_library_build, RoleLibraryError};
pub use types::{
    BuildAction, LibraryBuildDecision, LibraryBuildRequest, LibraryPlanError, RebuildReason,
};
