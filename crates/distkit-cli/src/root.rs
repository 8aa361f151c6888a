use distkit_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `DISTKIT_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `distkit.yaml`
/// 3. Walk upward from `cwd` looking for `package.json`
/// 4. Walk upward from `cwd` looking for `.git/`
/// 5. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd)
}

fn find_root_from(start: &Path) -> PathBuf {
    let markers: [fn(&Path) -> bool; 3] = [
        |d| d.join(paths::CONFIG_FILE).is_file(),
        |d| d.join(paths::MANIFEST_FILE).is_file(),
        |d| d.join(".git").is_dir(),
    ];

    for marker in markers {
        if let Some(found) = start.ancestors().find(|d| marker(d)) {
            return found.to_path_buf();
        }
    }

    start.to_path_buf()
}
