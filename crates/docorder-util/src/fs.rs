use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::DocorderError;

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Compile a list of glob patterns into a matcher.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet, DocorderError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| DocorderError::Config {
            message: format!("invalid exclude pattern '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| DocorderError::Config {
        message: format!("failed to build exclude patterns: {e}"),
    })
}

/// Recursively collect every file under `root` whose extension is one of
/// `extensions`, skipping anything whose root-relative path matches `exclude`.
///
/// The result is sorted so repeated runs see files in the same order.
pub fn collect_source_files(root: &Path, extensions: &[String], exclude: &GlobSet) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files_recursive(root, root, extensions, exclude, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(
    root: &Path,
    dir: &Path,
    extensions: &[String],
    exclude: &GlobSet,
    out: &mut Vec<PathBuf>,
) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::debug!("skipping unreadable directory {}", dir.display());
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if exclude.is_match(relative) {
            continue;
        }
        if path.is_dir() {
            collect_files_recursive(root, &path, extensions, exclude, out);
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e == ext))
        {
            out.push(path);
        }
    }
}

/// Turn a directory name into a string safe for use in a file name:
/// every non-alphanumeric character becomes `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
