use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{GenerateError, Result};

/// Suffix marking files owned by the generator.
pub const GENERATED_SUFFIX: &str = ".g.cs";

// Build output directories of the consuming project.
const SKIPPED_DIRS: [&str; 2] = ["bin", "obj"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_generated_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(GENERATED_SUFFIX))
}

/// List previously generated files under `dir`, sorted, skipping `bin/` and `obj/`.
///
/// A missing directory yields an empty list.
pub fn find_generated_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            GenerateError::io(path, e.into())
        })?;
        if is_generated_file(&entry) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Delete previously generated files under `dir` and return their paths.
pub fn clean_generated_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let stale = find_generated_files(dir)?;
    for path in &stale {
        std::fs::remove_file(path).map_err(|e| GenerateError::io(path, e))?;
        tracing::debug!(path = %path.display(), "removed stale generated file");
    }
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// stale").unwrap();
    }

    #[test]
    fn test_clean_skips_bin_and_obj() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "Models/Pet.g.cs");
        touch(root, "PetsClient.g.cs");
        touch(root, "Custom.cs");
        touch(root, "bin/Debug/Cached.g.cs");
        touch(root, "obj/Generated.g.cs");

        let removed = clean_generated_files(root).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!root.join("Models/Pet.g.cs").exists());
        assert!(!root.join("PetsClient.g.cs").exists());
        assert!(root.join("Custom.cs").exists());
        assert!(root.join("bin/Debug/Cached.g.cs").exists());
        assert!(root.join("obj/Generated.g.cs").exists());
    }

    #[test]
    fn test_find_in_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(find_generated_files(&missing).unwrap().is_empty());
    }
}
