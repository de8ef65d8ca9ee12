use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::types::LibraryPlanError;

#[derive(Debug, Clone)]
pub(crate) struct DefsInputHash {
    /// Absolute paths of every def XML file, in normalized relative-path
    /// order. This is also the order the compiler parses them in.
    pub xml_files: Vec<PathBuf>,
    pub hash_hex: String,
}

/// Hashes every def XML under `defs_dir`, relative path and content both.
/// Edits, renames, additions and removals all change the hash; non-XML
/// files do not participate.
pub(crate) fn hash_defs_inputs(defs_dir: &Path) -> Result<DefsInputHash, LibraryPlanError> {
    let collected = collect_xml_files_sorted(defs_dir)?;
    let mut hasher = Sha256::new();
    let mut xml_files = Vec::<PathBuf>::with_capacity(collected.len());
    for (normalized_rel, abs_path) in collected {
        let bytes = fs::read(&abs_path).map_err(|source| LibraryPlanError::ReadFile {
            path: abs_path.clone(),
            source,
        })?;
        hasher.update(normalized_rel.as_bytes());
        hasher.update([0u8]);
        hasher.update(&bytes);
        xml_files.push(abs_path);
    }

    Ok(DefsInputHash {
        xml_files,
        hash_hex: to_hex_lower(&hasher.finalize()),
    })
}

fn collect_xml_files_sorted(defs_dir: &Path) -> Result<Vec<(String, PathBuf)>, LibraryPlanError> {
    let mut files = Vec::<(String, PathBuf)>::new();
    collect_recursive(defs_dir, defs_dir, &mut files)?;
    files.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(files)
}

fn collect_recursive(
    root: &Path,
    current: &Path,
    files: &mut Vec<(String, PathBuf)>,
) -> Result<(), LibraryPlanError> {
    let entries = fs::read_dir(current).map_err(|source| LibraryPlanError::ReadDir {
        path: current.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| LibraryPlanError::ReadDir {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_recursive(root, &path, files)?;
            continue;
        }
        if !is_xml_file(&path) {
            continue;
        }
        let rel = match path.strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        files.push((normalize_rel_path(rel), path));
    }
    Ok(())
}

fn is_xml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

fn normalize_rel_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn hash_ignores_non_xml_and_changes_on_edit_or_add() {
        let temp = TempDir::new().expect("tempdir");
        let dir = temp.path();
        fs::create_dir_all(dir.join("nested")).expect("mkdir");
        fs::write(dir.join("nested").join("roles.xml"), "<Defs/>").expect("write defs");
        fs::write(dir.join("notes.txt"), "ignore me").expect("write txt");

        let first = hash_defs_inputs(dir).expect("hash");
        assert_eq!(first.xml_files.len(), 1);

        fs::write(dir.join("nested").join("roles.xml"), "<Defs><A/></Defs>").expect("edit");
        let second = hash_defs_inputs(dir).expect("hash");
        assert_ne!(first.hash_hex, second.hash_hex);

        fs::write(dir.join("extra.xml"), "<Defs><B/></Defs>").expect("add xml");
        let third = hash_defs_inputs(dir).expect("hash");
        assert_eq!(third.xml_files.len(), 2);
        assert_ne!(second.hash_hex, third.hash_hex);
    }

    #[test]
    fn renaming_a_file_changes_the_hash() {
        let temp = TempDir::new().expect("tempdir");
        let dir = temp.path();
        fs::write(dir.join("a.xml"), "<Defs/>").expect("write");
        let before = hash_defs_inputs(dir).expect("hash");

        fs::rename(dir.join("a.xml"), dir.join("b.xml")).expect("rename");
        let after = hash_defs_inputs(dir).expect("hash");
        assert_ne!(before.hash_hex, after.hash_hex);
    }

    #[test]
    fn files_come_back_in_stable_sorted_order() {
        let temp = TempDir::new().expect("tempdir");
        let dir = temp.path();
        fs::write(dir.join("zz.xml"), "<Defs/>").expect("write");
        fs::write(dir.join("aa.xml"), "<Defs/>").expect("write");

        let input = hash_defs_inputs(dir).expect("hash");
        assert_eq!(input.xml_files[0], dir.join("aa.xml"));
        assert_eq!(input.xml_files[1], dir.join("zz.xml"));
    }

    #[test]
    fn empty_directory_hashes_to_zero_files() {
        let temp = TempDir::new().expect("tempdir");
        let input = hash_defs_inputs(temp.path()).expect("hash");
        assert!(input.xml_files.is_empty());
    }
}
