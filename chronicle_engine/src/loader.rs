//! Loader utilities for building the game's catalogs and settings from the data directory.
//!
//! Missing catalog files are recreated from the built-in defaults so a fresh
//! checkout is playable; files that exist but are malformed stop the load.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chronicle_data::{Catalog, ItemCatalog, QuestCatalog};
use log::{info, warn};

use crate::data_paths::data_root;
use crate::settings::{Settings, load_settings};

pub const DEFAULT_QUESTS: &str = include_str!("../data/quests.txt");
pub const DEFAULT_ITEMS: &str = include_str!("../data/items.txt");

/// Everything a session needs besides the character.
#[derive(Debug, Clone)]
pub struct GameData {
    pub catalog: Catalog,
    pub settings: Settings,
}

/// Load settings and catalogs from the resolved data directory.
///
/// # Errors
/// Errors bubble up from file IO, parsing, or catalog validation.
pub fn load_game_data() -> Result<GameData> {
    load_game_data_from(data_root())
}

/// Load settings and catalogs from `dir`.
///
/// # Errors
/// Errors bubble up from file IO, parsing, or catalog validation.
pub fn load_game_data_from(dir: &Path) -> Result<GameData> {
    let settings = load_settings(&dir.join("settings.toml"));
    let quests_path = dir.join(&settings.quests_file);
    let items_path = dir.join(&settings.items_file);
    ensure_file(&quests_path, DEFAULT_QUESTS)?;
    ensure_file(&items_path, DEFAULT_ITEMS)?;

    let catalog = Catalog {
        quests: load_quests(&quests_path).context("while loading quest catalog")?,
        items: load_items(&items_path).context("while loading item catalog")?,
    };
    validate(&catalog)?;
    info!("{} quests loaded", catalog.quests.len());
    info!("{} items loaded", catalog.items.len());
    Ok(GameData { catalog, settings })
}

/// Parse a quest catalog file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or repeats an id.
pub fn load_quests(path: &Path) -> Result<QuestCatalog> {
    let text = fs::read_to_string(path).with_context(|| format!("reading quests from '{}'", path.display()))?;
    let quests = chronicle_data::parse_quests(&text).with_context(|| format!("parsing '{}'", path.display()))?;
    chronicle_data::build_quest_catalog(quests).with_context(|| format!("indexing '{}'", path.display()))
}

/// Parse an item catalog file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or repeats an id.
pub fn load_items(path: &Path) -> Result<ItemCatalog> {
    let text = fs::read_to_string(path).with_context(|| format!("reading items from '{}'", path.display()))?;
    let items = chronicle_data::parse_items(&text).with_context(|| format!("parsing '{}'", path.display()))?;
    chronicle_data::build_item_catalog(items).with_context(|| format!("indexing '{}'", path.display()))
}

/// Write `contents` to `path` if nothing is there yet.
fn ensure_file(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    warn!("'{}' not found; writing default data", path.display());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating '{}'", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing default data to '{}'", path.display()))
}

/// Validate cross-references and return a single aggregated error.
fn validate(catalog: &Catalog) -> Result<()> {
    let errors = chronicle_data::validate_catalog(catalog);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("catalog validation failed:\n{details}");
}
