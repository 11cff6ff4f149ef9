//! Character -- the player-controlled record every engine operates on.
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chronicle_data::Id;
use log::info;

use crate::error::{GameError, GameResult};

/// Maximum number of entries (duplicates included) an inventory may hold.
pub const MAX_INVENTORY_SIZE: usize = 20;

/// Gold a new character starts with unless settings say otherwise.
pub const STARTING_GOLD: u32 = 100;

/// Characters that would break the flat save layout or the save file name.
const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', ',', '\n', '\r'];

/// The fixed set of playable classes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Starting health, strength and magic for a class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BaseStats {
    pub health: u32,
    pub strength: u32,
    pub magic: u32,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Cleric,
    ];

    pub fn base_stats(self) -> BaseStats {
        match self {
            CharacterClass::Warrior => BaseStats {
                health: 120,
                strength: 15,
                magic: 5,
            },
            CharacterClass::Mage => BaseStats {
                health: 80,
                strength: 8,
                magic: 20,
            },
            CharacterClass::Rogue => BaseStats {
                health: 90,
                strength: 12,
                magic: 10,
            },
            CharacterClass::Cleric => BaseStats {
                health: 100,
                strength: 10,
                magic: 15,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
        }
    }
}
impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidCharacterClass(s.trim().to_string()))
    }
}

/// A player character: stats, purse, inventory, equipment and quest log.
///
/// Fields are public so front ends can display them, but all mutation should
/// go through the engine operations, which keep the record's invariants:
/// `health <= max_health`, `max_health > 0`, `level >= 1`, disjoint quest sets,
/// and an inventory no longer than [`MAX_INVENTORY_SIZE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub gold: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub inventory: Vec<Id>,
    pub active_quests: BTreeSet<Id>,
    pub completed_quests: BTreeSet<Id>,
    pub equipped_weapon: Option<Id>,
    pub equipped_armor: Option<Id>,
    /// Set by the front end while the class ability is recharging; never persisted.
    pub ability_on_cooldown: bool,
}

impl Character {
    /// Create a level 1 character of `class` with [`STARTING_GOLD`].
    ///
    /// # Errors
    /// - if the name is empty or contains characters unusable in a save file
    pub fn new(name: &str, class: CharacterClass) -> GameResult<Character> {
        Character::with_gold(name, class, STARTING_GOLD)
    }

    /// Create a level 1 character with a specific amount of starting gold.
    ///
    /// # Errors
    /// - if the name is empty or contains characters unusable in a save file
    pub fn with_gold(name: &str, class: CharacterClass, gold: u32) -> GameResult<Character> {
        let name = validate_name(name)?;
        let base = class.base_stats();
        info!("created {class} '{name}' ({} hp, {} str, {} mag)", base.health, base.strength, base.magic);
        Ok(Character {
            name,
            class,
            level: 1,
            experience: 0,
            gold,
            health: base.health,
            max_health: base.health,
            strength: base.strength,
            magic: base.magic,
            inventory: Vec::new(),
            active_quests: BTreeSet::new(),
            completed_quests: BTreeSet::new(),
            equipped_weapon: None,
            equipped_armor: None,
            ability_on_cooldown: false,
        })
    }

    /// Check the record's structural invariants, e.g. after loading it from disk.
    ///
    /// # Errors
    /// - `InvalidSaveData` naming the first violated invariant
    pub fn validate(&self) -> GameResult<()> {
        let invalid = |msg: String| GameError::InvalidSaveData(msg);
        if validate_name(&self.name).is_err() {
            return Err(invalid(format!("invalid name '{}'", self.name)));
        }
        if self.level == 0 {
            return Err(invalid("level must be at least 1".to_string()));
        }
        if self.max_health == 0 {
            return Err(invalid("max health must be positive".to_string()));
        }
        if self.health > self.max_health {
            return Err(invalid(format!(
                "health {} exceeds max health {}",
                self.health, self.max_health
            )));
        }
        if self.inventory.len() > MAX_INVENTORY_SIZE {
            return Err(invalid(format!(
                "inventory holds {} items (limit {MAX_INVENTORY_SIZE})",
                self.inventory.len()
            )));
        }
        if let Some(quest) = self.active_quests.intersection(&self.completed_quests).next() {
            return Err(invalid(format!("quest '{quest}' is both active and completed")));
        }
        Ok(())
    }

    /// Number of additional items the inventory can hold.
    pub fn space_remaining(&self) -> usize {
        MAX_INVENTORY_SIZE.saturating_sub(self.inventory.len())
    }
}

/// Trim a character name, rejecting anything that cannot name a save file
/// inside the save directory. Leading dots are refused so saves never hide.
pub(crate) fn validate_name(name: &str) -> GameResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains(FORBIDDEN_NAME_CHARS) || trimmed.starts_with('.') {
        return Err(GameError::InvalidCharacterName(name.to_string()));
    }
    Ok(trimmed.to_string())
}
