//! Error Module
//!
//! Every rule violation inside the engines is reported to the caller as a
//! [`GameError`]. Front ends match on [`GameError::kind`] to decide how to
//! present a failure; nothing is swallowed or retried inside the engines.

use chronicle_data::{DataError, Effect, EffectError, ItemKind};
use thiserror::Error;

/// Shorthand for engine results.
pub type GameResult<T> = Result<T, GameError>;

/// Broad categories of failure, used by front ends for messaging.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// character, quest, item, or save is absent
    NotFound,
    /// already exists / already active / already completed
    Conflict,
    /// level or prerequisite gate failed
    RequirementsNotMet,
    /// not enough gold or no inventory space
    ResourceExhausted,
    /// dead character acting, combat inactive, ability on cooldown
    InvalidState,
    /// save or catalog data fails structural or type validation
    Corrupted,
    /// bad amount, bad name, malformed effect, wrong item type
    InvalidArgument,
    /// filesystem failure outside the data itself
    Io,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no saved character named '{0}'")]
    CharacterNotFound(String),
    #[error("a character named '{0}' already exists")]
    CharacterAlreadyExists(String),
    #[error("'{0}' is not a character class (choose Warrior, Mage, Rogue, or Cleric)")]
    InvalidCharacterClass(String),
    #[error("invalid character name '{0}'")]
    InvalidCharacterName(String),
    #[error("{0} is dead")]
    CharacterDead(String),

    #[error("quest '{0}' does not exist")]
    QuestNotFound(String),
    #[error("quest '{quest_id}' requires level {required} (you are level {current})")]
    InsufficientLevel { quest_id: String, required: u32, current: u32 },
    #[error("quest '{quest_id}' requires '{prerequisite}' to be completed first")]
    QuestRequirementsNotMet { quest_id: String, prerequisite: String },
    #[error("quest '{0}' is already completed")]
    QuestAlreadyCompleted(String),
    #[error("quest '{0}' is already active")]
    QuestAlreadyActive(String),
    #[error("quest '{0}' is not active")]
    QuestNotActive(String),
    #[error("quest '{quest_id}' has an invalid prerequisite '{prerequisite}'")]
    PrerequisiteNotFound { quest_id: String, prerequisite: String },
    #[error("quest '{0}' is part of a prerequisite cycle")]
    PrerequisiteCycle(String),

    #[error("'{0}' is not in the inventory")]
    ItemNotFound(String),
    #[error("'{0}' is not in the item catalog")]
    UnknownItem(String),
    #[error("'{item_id}' is a {found}, not a {expected}")]
    InvalidItemType { item_id: String, expected: ItemKind, found: ItemKind },
    #[error("inventory is full ({capacity} items)")]
    InventoryFull { capacity: usize },
    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientResources { needed: u32, available: u32 },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("'{item_id}' ({effect}) would push a stat past its limit")]
    EffectOutOfRange { item_id: String, effect: Effect },
    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error("'{0}' is not a known enemy")]
    InvalidTarget(String),
    #[error("combat is not active")]
    CombatNotActive,
    #[error("{0}'s special ability is on cooldown")]
    AbilityOnCooldown(String),

    #[error("save file for '{0}' could not be read")]
    SaveFileCorrupted(String),
    #[error("invalid save data: {0}")]
    InvalidSaveData(String),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// The taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CharacterNotFound(_)
            | Self::QuestNotFound(_)
            | Self::PrerequisiteNotFound { .. }
            | Self::ItemNotFound(_)
            | Self::UnknownItem(_) => ErrorKind::NotFound,
            Self::CharacterAlreadyExists(_) | Self::QuestAlreadyActive(_) | Self::QuestAlreadyCompleted(_) => {
                ErrorKind::Conflict
            },
            Self::InsufficientLevel { .. } | Self::QuestRequirementsNotMet { .. } => ErrorKind::RequirementsNotMet,
            Self::InventoryFull { .. } | Self::InsufficientResources { .. } => ErrorKind::ResourceExhausted,
            Self::CharacterDead(_) | Self::CombatNotActive | Self::AbilityOnCooldown(_) | Self::QuestNotActive(_) => {
                ErrorKind::InvalidState
            },
            Self::SaveFileCorrupted(_) | Self::InvalidSaveData(_) | Self::PrerequisiteCycle(_) | Self::Data(_) => {
                ErrorKind::Corrupted
            },
            Self::Effect(_)
            | Self::EffectOutOfRange { .. }
            | Self::InvalidAmount(_)
            | Self::InvalidCharacterClass(_)
            | Self::InvalidCharacterName(_)
            | Self::InvalidItemType { .. }
            | Self::InvalidTarget(_) => ErrorKind::InvalidArgument,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
