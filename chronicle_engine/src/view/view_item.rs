//! ViewItem module
//!
//! A `ViewItem` is an enum variant sent to the `View`, which aggregates them, styles them,
//! organizes them, and displays them before the next prompt.

use variantly::Variantly;

use crate::character::Character;
use crate::combat::BattleState;
use crate::save_files::SaveEntry;
use crate::stats::{Rewards, xp_to_next_level};

/// Output sections, displayed in declaration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Status,
    Combat,
    DirectResult,
    System,
}

/// Snapshot of a character for the stats screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSheet {
    pub name: String,
    pub class: String,
    pub level: u32,
    pub experience: u32,
    pub next_level: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub gold: u32,
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub active_quests: usize,
    pub completed_quests: usize,
}
impl CharacterSheet {
    pub fn from_character(character: &Character) -> CharacterSheet {
        CharacterSheet {
            name: character.name.clone(),
            class: character.class.to_string(),
            level: character.level,
            experience: character.experience,
            next_level: xp_to_next_level(character.level),
            health: character.health,
            max_health: character.max_health,
            strength: character.strength,
            magic: character.magic,
            gold: character.gold,
            weapon: character.equipped_weapon.clone(),
            armor: character.equipped_armor.clone(),
            active_quests: character.active_quests.len(),
            completed_quests: character.completed_quests.len(),
        }
    }
}

/// One stack of identical items in the inventory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLine {
    pub item_id: String,
    pub name: String,
    pub kind: String,
    pub effect: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopLine {
    pub item_id: String,
    pub name: String,
    pub kind: String,
    pub effect: String,
    pub cost: u32,
    pub affordable: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuestMark {
    Available,
    Active,
    Completed,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLine {
    pub quest_id: String,
    pub title: String,
    pub description: String,
    pub required_level: u32,
    pub rewards: Rewards,
    pub mark: QuestMark,
}

/// How a combat line should be colored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CombatTone {
    PlayerHit,
    PlayerHarmed,
    Healed,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpLine {
    pub command: &'static str,
    pub description: &'static str,
}

/// `ViewItems` are each of the various types of information / messages that may be displayed to the player.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum ViewItem {
    ActionFailure(String),
    ActionSuccess(String),
    BattleEnded {
        enemy: String,
        state: BattleState,
        turns: u32,
    },
    BattleStarted {
        enemy: String,
        health: u32,
        strength: u32,
    },
    BattleStatus {
        character_health: u32,
        character_max: u32,
        enemy: String,
        enemy_health: u32,
        enemy_max: u32,
    },
    CharacterDeath {
        name: String,
        revive_cost: u32,
    },
    CharacterSheet(CharacterSheet),
    CombatEvent {
        text: String,
        tone: CombatTone,
    },
    EngineMessage(String),
    Error(String),
    GameLoaded {
        name: String,
        file: String,
    },
    GameSaved {
        name: String,
        file: String,
    },
    Help(Vec<HelpLine>),
    Inventory {
        lines: Vec<InventoryLine>,
        used: usize,
        capacity: usize,
    },
    LevelUp {
        name: String,
        level: u32,
    },
    QuestChain(Vec<String>),
    QuestList {
        heading: String,
        quests: Vec<QuestLine>,
    },
    QuestProgress {
        completed: usize,
        total: usize,
        percent: f64,
        rewards: Rewards,
    },
    QuitSummary {
        name: String,
        level: u32,
        completed: usize,
        total: usize,
    },
    RewardsGranted {
        source: String,
        rewards: Rewards,
    },
    SavedGamesList {
        directory: String,
        entries: Vec<SaveEntry>,
    },
    ShopListing {
        gold: Option<u32>,
        lines: Vec<ShopLine>,
    },
}
impl ViewItem {
    /// Classify a view item into a top-level output section.
    pub fn section(&self) -> Section {
        match self {
            ViewItem::CharacterSheet(_)
            | ViewItem::Inventory { .. }
            | ViewItem::ShopListing { .. }
            | ViewItem::QuestList { .. }
            | ViewItem::QuestChain(_)
            | ViewItem::QuestProgress { .. } => Section::Status,
            ViewItem::BattleStarted { .. }
            | ViewItem::CombatEvent { .. }
            | ViewItem::BattleStatus { .. }
            | ViewItem::BattleEnded { .. }
            | ViewItem::CharacterDeath { .. } => Section::Combat,
            ViewItem::ActionSuccess(_)
            | ViewItem::ActionFailure(_)
            | ViewItem::Error(_)
            | ViewItem::RewardsGranted { .. }
            | ViewItem::LevelUp { .. } => Section::DirectResult,
            ViewItem::EngineMessage(_)
            | ViewItem::Help(_)
            | ViewItem::GameLoaded { .. }
            | ViewItem::GameSaved { .. }
            | ViewItem::SavedGamesList { .. }
            | ViewItem::QuitSummary { .. } => Section::System,
        }
    }
}
