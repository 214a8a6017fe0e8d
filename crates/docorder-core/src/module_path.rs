//! Conversion between repository-relative file paths and dotted module paths.

use std::path::{Component as PathComponent, Path, PathBuf};

/// Derive the dotted module path of a repository-relative file:
/// `pkg/sub/mod.py` becomes `pkg.sub.mod`.
///
/// Only the final extension is stripped; separators become `.` regardless of
/// the host platform.
pub fn module_path_of(relative: &Path) -> String {
    let stem = relative.with_extension("");
    stem.components()
        .filter_map(|c| match c {
            PathComponent::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Derive the repository-relative file path a module path is expected to live
/// at, using the given source extension.
pub fn file_path_of(module: &str, extension: &str) -> PathBuf {
    let mut path: PathBuf = module.split('.').collect();
    path.set_extension(extension);
    path
}

/// The first dotted segment of a name.
pub fn leading_segment(name: &str) -> &str {
    name.split_once('.').map_or(name, |(head, _)| head)
}
