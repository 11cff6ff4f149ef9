//! Save-game discovery and serialization helpers.
//!
//! Each character lives in its own `{name}_save.txt` file: one `KEY:value`
//! line per field, list fields comma-joined. Files are replaced atomically
//! and never coerced into shape on load; anything malformed is an error.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chronicle_data::Id;
use log::{info, warn};

use crate::character::{Character, CharacterClass, validate_name};
use crate::error::{GameError, GameResult};

pub const SAVE_DIR: &str = "save_games";
pub const SAVE_SUFFIX: &str = "_save.txt";

const REQUIRED_KEYS: [&str; 12] = [
    "NAME",
    "CLASS",
    "LEVEL",
    "HEALTH",
    "MAX_HEALTH",
    "STRENGTH",
    "MAGIC",
    "EXPERIENCE",
    "GOLD",
    "INVENTORY",
    "ACTIVE_QUESTS",
    "COMPLETED_QUESTS",
];
const OPTIONAL_KEYS: [&str; 2] = ["EQUIPPED_WEAPON", "EQUIPPED_ARMOR"];

/// Whether a save file could be loaded, with a short summary if so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Ready { class: CharacterClass, level: u32 },
    Corrupted { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    pub name: String,
    pub path: PathBuf,
    pub status: SaveStatus,
}

/// Path of the save file for `name` within `dir`.
pub fn save_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}{SAVE_SUFFIX}", name.trim()))
}

pub fn save_exists(dir: &Path, name: &str) -> bool {
    checked_save_path(dir, name).is_ok_and(|path| path.is_file())
}

/// [`save_path`] for a name that must be usable as a character name.
fn checked_save_path(dir: &Path, name: &str) -> GameResult<PathBuf> {
    let name = validate_name(name)?;
    Ok(save_path(dir, &name))
}

/// Render a character in the flat save layout.
pub fn format_save(character: &Character) -> String {
    let lines = [
        ("NAME", character.name.clone()),
        ("CLASS", character.class.to_string()),
        ("LEVEL", character.level.to_string()),
        ("HEALTH", character.health.to_string()),
        ("MAX_HEALTH", character.max_health.to_string()),
        ("STRENGTH", character.strength.to_string()),
        ("MAGIC", character.magic.to_string()),
        ("EXPERIENCE", character.experience.to_string()),
        ("GOLD", character.gold.to_string()),
        ("INVENTORY", character.inventory.join(",")),
        ("ACTIVE_QUESTS", join_set(&character.active_quests)),
        ("COMPLETED_QUESTS", join_set(&character.completed_quests)),
        ("EQUIPPED_WEAPON", character.equipped_weapon.clone().unwrap_or_default()),
        ("EQUIPPED_ARMOR", character.equipped_armor.clone().unwrap_or_default()),
    ];
    lines.iter().map(|(key, value)| format!("{key}:{value}\n")).collect()
}

fn join_set(set: &BTreeSet<Id>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Parse the flat save layout back into a validated character.
///
/// # Errors
/// - `InvalidSaveData` for malformed lines, unknown/duplicate/missing keys,
///   bad numbers or class names, or a record that breaks character invariants
pub fn parse_save(text: &str) -> GameResult<Character> {
    let invalid = |msg: String| GameError::InvalidSaveData(msg);
    let mut fields: HashMap<&str, &str> = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| invalid(format!("line {}: expected KEY:value, found '{line}'", idx + 1)))?;
        let key = key.trim();
        if !REQUIRED_KEYS.contains(&key) && !OPTIONAL_KEYS.contains(&key) {
            return Err(invalid(format!("line {}: unknown key '{key}'", idx + 1)));
        }
        if fields.insert(key, value.trim()).is_some() {
            return Err(invalid(format!("line {}: duplicate key '{key}'", idx + 1)));
        }
    }
    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !fields.contains_key(*key)) {
        return Err(invalid(format!("missing field {missing}")));
    }

    let field = |key: &str| fields.get(key).copied().unwrap_or_default();
    let number = |key: &'static str| -> GameResult<u32> {
        field(key)
            .parse::<u32>()
            .map_err(|_| invalid(format!("{key} '{}' is not a non-negative integer", field(key))))
    };
    let slot = |key: &str| Some(field(key)).filter(|id| !id.is_empty()).map(str::to_string);

    let class = field("CLASS")
        .parse::<CharacterClass>()
        .map_err(|e| invalid(e.to_string()))?;
    let character = Character {
        name: field("NAME").to_string(),
        class,
        level: number("LEVEL")?,
        experience: number("EXPERIENCE")?,
        gold: number("GOLD")?,
        health: number("HEALTH")?,
        max_health: number("MAX_HEALTH")?,
        strength: number("STRENGTH")?,
        magic: number("MAGIC")?,
        inventory: split_list("INVENTORY", field("INVENTORY"))?,
        active_quests: split_set("ACTIVE_QUESTS", field("ACTIVE_QUESTS"))?,
        completed_quests: split_set("COMPLETED_QUESTS", field("COMPLETED_QUESTS"))?,
        equipped_weapon: slot("EQUIPPED_WEAPON"),
        equipped_armor: slot("EQUIPPED_ARMOR"),
        ability_on_cooldown: false,
    };
    character.validate()?;
    Ok(character)
}

/// Comma-joined ids; an empty string is an empty list, an empty entry is an error.
fn split_list(key: &str, value: &str) -> GameResult<Vec<Id>> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|id| {
            let id = id.trim();
            if id.is_empty() {
                Err(GameError::InvalidSaveData(format!("{key} has an empty entry")))
            } else {
                Ok(id.to_string())
            }
        })
        .collect()
}

fn split_set(key: &str, value: &str) -> GameResult<BTreeSet<Id>> {
    let mut set = BTreeSet::new();
    for id in split_list(key, value)? {
        if !set.insert(id.clone()) {
            return Err(GameError::InvalidSaveData(format!("{key} lists '{id}' twice")));
        }
    }
    Ok(set)
}

/// Write a character's save file, replacing any previous one in a single rename.
///
/// # Errors
/// - `InvalidCharacterName` if the name could not name a save file
/// - `Io` if the directory or file cannot be written
pub fn save_character(dir: &Path, character: &Character) -> GameResult<PathBuf> {
    let path = checked_save_path(dir, &character.name)?;
    fs::create_dir_all(dir)?;
    let tmp = dir.join(format!(".{}{SAVE_SUFFIX}.tmp", character.name));
    fs::write(&tmp, format_save(character))?;
    if let Err(err) = fs::rename(&tmp, &path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    info!("saved '{}' to {}", character.name, path.display());
    Ok(path)
}

/// Load a character by name.
///
/// # Errors
/// - `InvalidCharacterName` if `name` could not name a save file
/// - `CharacterNotFound` if there is no save file
/// - `SaveFileCorrupted` if the file exists but cannot be read as text
/// - `InvalidSaveData` if its contents are malformed or belong to another name
pub fn load_character(dir: &Path, name: &str) -> GameResult<Character> {
    let path = checked_save_path(dir, name)?;
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(GameError::CharacterNotFound(name.trim().to_string()));
        },
        Err(err) => {
            warn!("failed to read save '{}': {err}", path.display());
            return Err(GameError::SaveFileCorrupted(name.trim().to_string()));
        },
    };
    let character = parse_save(&raw)?;
    if character.name != name.trim() {
        return Err(GameError::InvalidSaveData(format!(
            "file for '{}' holds character '{}'",
            name.trim(),
            character.name
        )));
    }
    info!("loaded '{}' from {}", character.name, path.display());
    Ok(character)
}

/// Names with a save file in `dir`, sorted. A missing directory has no saves.
///
/// # Errors
/// - `Io` if the directory exists but cannot be listed
pub fn list_saved_characters(dir: &Path) -> GameResult<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path
            .file_name()
            .and_then(|file| file.to_str())
            .and_then(|file| file.strip_suffix(SAVE_SUFFIX))
            && !name.is_empty()
            && !name.starts_with('.')
        {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Describe every save in `dir`, flagging the ones that fail to load.
///
/// # Errors
/// - `Io` if the directory exists but cannot be listed
pub fn build_save_entries(dir: &Path) -> GameResult<Vec<SaveEntry>> {
    let entries = list_saved_characters(dir)?
        .into_iter()
        .map(|name| {
            let status = match load_character(dir, &name) {
                Ok(character) => SaveStatus::Ready {
                    class: character.class,
                    level: character.level,
                },
                Err(err) => {
                    warn!("save for '{name}' is unusable: {err}");
                    SaveStatus::Corrupted {
                        message: err.to_string(),
                    }
                },
            };
            SaveEntry {
                path: save_path(dir, &name),
                name,
                status,
            }
        })
        .collect();
    Ok(entries)
}

/// Remove a character's save file.
///
/// # Errors
/// - `InvalidCharacterName` if `name` could not name a save file
/// - `CharacterNotFound` if there is no save file
/// - `Io` if it cannot be removed
pub fn delete_character(dir: &Path, name: &str) -> GameResult<()> {
    let path = checked_save_path(dir, name)?;
    match fs::remove_file(&path) {
        Ok(()) => {
            info!("deleted save {}", path.display());
            Ok(())
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(GameError::CharacterNotFound(name.trim().to_string())),
        Err(err) => Err(err.into()),
    }
}
