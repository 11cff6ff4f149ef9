//! Locating the runtime data directory.
use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const DATA_DIR: &str = "chronicle_engine/data";

/// Cached path to the directory holding catalogs and `settings.toml`.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// The resolved data root.
pub fn data_root() -> &'static Path {
    DATA_ROOT.as_path()
}

/// Resolve the most likely location of the data directory.
///
/// `CHRONICLE_DATA` wins if set; otherwise the workspace layout and a
/// flattened `data/` are tried from the working directory and from the
/// executable's location.
fn detect_data_root() -> PathBuf {
    if let Some(dir) = env::var_os("CHRONICLE_DATA") {
        return PathBuf::from(dir);
    }

    let mut candidates = vec![PathBuf::from(DATA_DIR), PathBuf::from("data")];
    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join(DATA_DIR));
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join(DATA_DIR));
            candidates.push(parent.join("data"));
        }
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from(DATA_DIR))
}
