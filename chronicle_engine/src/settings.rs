//! Game settings and loader.
//!
//! Settings live in `settings.toml` in the data directory. Every field is
//! optional; a missing or unreadable file means the defaults are used.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::character::STARTING_GOLD;
use crate::save_files::SAVE_DIR;

pub const DEFAULT_REVIVE_COST: u32 = 50;

/// Tunable values for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding `{name}_save.txt` files, relative to the working directory
    pub save_dir: PathBuf,
    /// Quest catalog file, relative to the data directory
    pub quests_file: PathBuf,
    /// Item catalog file, relative to the data directory
    pub items_file: PathBuf,
    /// Gold charged to bring a fallen character back
    pub revive_cost: u32,
    /// Gold a new character starts with
    pub starting_gold: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            save_dir: PathBuf::from(SAVE_DIR),
            quests_file: PathBuf::from("quests.txt"),
            items_file: PathBuf::from("items.txt"),
            revive_cost: DEFAULT_REVIVE_COST,
            starting_gold: STARTING_GOLD,
        }
    }
}

/// Load settings from a TOML file, falling back to defaults on error.
///
/// # Logging
/// - `info!` on successful load
/// - `warn!` if the file cannot be read or parsed
pub fn load_settings(toml_path: &Path) -> Settings {
    match try_load_settings(toml_path) {
        Ok(settings) => {
            info!("settings loaded from '{}'", toml_path.display());
            settings
        },
        Err(e) => {
            warn!(
                "Could not load settings from '{}': {e:#}. Using defaults.",
                toml_path.display()
            );
            Settings::default()
        },
    }
}

/// Read and parse a settings file.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or names an empty path.
pub fn try_load_settings(toml_path: &Path) -> Result<Settings> {
    let raw = fs::read_to_string(toml_path)
        .with_context(|| format!("reading settings from '{}'", toml_path.display()))?;
    let settings: Settings =
        toml::from_str(&raw).with_context(|| format!("parsing settings from '{}'", toml_path.display()))?;
    for (field, path) in [
        ("save_dir", &settings.save_dir),
        ("quests_file", &settings.quests_file),
        ("items_file", &settings.items_file),
    ] {
        if path.as_os_str().is_empty() {
            bail!("{field} must not be empty");
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.toml");
        fs::write(&path, "revive_cost = 75\nsave_dir = \"slots\"\n")?;
        let settings = load_settings(&path);
        assert_eq!(settings.revive_cost, 75);
        assert_eq!(settings.save_dir, PathBuf::from("slots"));
        assert_eq!(settings.starting_gold, STARTING_GOLD);
        assert_eq!(settings.quests_file, PathBuf::from("quests.txt"));
        Ok(())
    }

    #[test]
    fn missing_or_bad_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(load_settings(&dir.path().join("absent.toml")), Settings::default());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "revive_cost = \"lots\"")?;
        assert!(try_load_settings(&bad).is_err());
        assert_eq!(load_settings(&bad), Settings::default());

        let unknown = dir.path().join("unknown.toml");
        fs::write(&unknown, "difficulty = 3")?;
        assert!(try_load_settings(&unknown).is_err());
        Ok(())
    }

    #[test]
    fn empty_paths_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.toml");
        fs::write(&path, "items_file = \"\"")?;
        assert!(try_load_settings(&path).is_err());
        Ok(())
    }
}
