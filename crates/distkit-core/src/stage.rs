use crate::config::LayoutConfig;
use crate::error::{DistkitError, Result};
use crate::paths;
use std::path::Path;
use walkdir::WalkDir;

/// Make `path` an existing, empty directory.
///
/// The directory itself is kept; only its entries are removed.
pub fn empty_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return std::fs::create_dir_all(path).map_err(|e| DistkitError::fs("create dir", path, e));
    }
    let entries = std::fs::read_dir(path).map_err(|e| DistkitError::fs("read dir", path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| DistkitError::fs("read dir", path, e))?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| DistkitError::fs("stat", &entry_path, e))?;
        if file_type.is_dir() {
            std::fs::remove_dir_all(&entry_path)
                .map_err(|e| DistkitError::fs("remove dir", &entry_path, e))?;
        } else {
            std::fs::remove_file(&entry_path)
                .map_err(|e| DistkitError::fs("remove file", &entry_path, e))?;
        }
    }
    Ok(())
}

/// Copy a single file, creating parent directories. Symlinks are followed.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DistkitError::fs("create dir", parent, e))?;
    }
    std::fs::copy(src, dst).map_err(|e| DistkitError::fs("copy", src, e))?;
    Ok(())
}

/// Recursively copy the contents of `src` into `dst`, dereferencing symlinks.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    let meta = std::fs::metadata(src).map_err(|e| DistkitError::fs("copy", src, e))?;
    if !meta.is_dir() {
        return copy_file(src, dst);
    }

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            DistkitError::fs("walk", path, e.into())
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| DistkitError::fs("walk", entry.path(), std::io::Error::other(e)))?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| DistkitError::fs("create dir", &target, e))?;
        } else {
            std::fs::copy(entry.path(), &target)
                .map_err(|e| DistkitError::fs("copy", entry.path(), e))?;
        }
    }
    Ok(())
}

/// Remove a directory tree. A directory that is already gone is fine.
pub fn remove_dir(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DistkitError::fs("remove dir", path, e)),
    }
}

/// Stage build output into the distribution directory.
///
/// `<dist>/lib` receives the compiled sources, `<dist>` receives the manifest
/// and the raw source tree, and the intermediate output directory is removed.
pub fn distribute(root: &Path, layout: &LayoutConfig) -> Result<()> {
    let dist = root.join(&layout.dist);
    let lib = dist.join(paths::LIB_SUBDIR);

    std::fs::create_dir_all(&lib).map_err(|e| DistkitError::fs("create dir", &lib, e))?;
    copy_tree(&root.join(&layout.compiled), &lib)?;

    let manifest = root.join(&layout.manifest);
    copy_file(&manifest, &dist.join(file_name(&layout.manifest)))?;

    let source = root.join(&layout.source);
    copy_tree(&source, &dist.join(file_name(&layout.source)))?;

    remove_dir(&root.join(&layout.output))?;
    tracing::debug!(dist = %dist.display(), "distribution staged");
    Ok(())
}

fn file_name(path: &Path) -> &std::ffi::OsStr {
    path.file_name().unwrap_or(path.as_os_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
