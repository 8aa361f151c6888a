use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "distkit.yaml";
pub const MANIFEST_FILE: &str = "package.json";

pub const BUILD_DIR: &str = "build";
pub const OUTPUT_DIR: &str = "build/out";
pub const COMPILED_DIR: &str = "build/out/src";
pub const DIST_DIR: &str = "build/dist";
pub const SOURCE_DIR: &str = "src";

/// Subdirectory of the distribution root holding compiled artifacts.
pub const LIB_SUBDIR: &str = "lib";

/// Project-local tool binaries, searched ahead of `PATH`.
pub const LOCAL_BIN_DIR: &str = "node_modules/.bin";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn local_bin_dir(root: &Path) -> PathBuf {
    root.join(LOCAL_BIN_DIR)
}

/// True when `path` is relative and never climbs above its starting point.
pub fn is_contained(path: &Path) -> bool {
    let mut depth: usize = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Lexically normalize a relative path: drop `.` and fold `..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when `child` lies strictly below `parent` (both taken lexically).
pub fn is_strictly_inside(child: &Path, parent: &Path) -> bool {
    let child = normalize(child);
    let parent = normalize(parent);
    child != parent && child.starts_with(&parent)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(config_path(root), PathBuf::from("/tmp/proj/distkit.yaml"));
        assert_eq!(
            local_bin_dir(root),
            PathBuf::from("/tmp/proj/node_modules/.bin")
        );
    }

    #[test]
    fn contained_paths() {
        for p in ["build", "build/out", "./build", "a/../b"] {
            assert!(is_contained(Path::new(p)), "expected contained: {p}");
        }
    }

    #[test]
    fn escaping_paths() {
        for p in ["..", "../build", "a/../../b", "/abs/build"] {
            assert!(!is_contained(Path::new(p)), "expected escaping: {p}");
        }
    }

    #[test]
    fn strictly_inside() {
        assert!(is_strictly_inside(Path::new("build/out"), Path::new("build")));
        assert!(is_strictly_inside(
            Path::new("./build/dist"),
            Path::new("build")
        ));
        assert!(!is_strictly_inside(Path::new("build"), Path::new("build")));
        assert!(!is_strictly_inside(Path::new("buildx/out"), Path::new("build")));
        assert!(!is_strictly_inside(Path::new("dist"), Path::new("build")));
    }

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(normalize(Path::new("./a/b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new(".")), PathBuf::new());
    }
}
