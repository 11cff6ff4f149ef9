#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const CHRONICLE_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod character;
pub mod combat;
pub mod command;
pub mod data_paths;
pub mod equipment;
pub mod error;
pub mod inventory;
pub mod loader;
pub mod quest;
pub mod repl;
pub mod save_files;
pub mod settings;
pub mod shop;
pub mod stats;
pub mod style;
pub mod view;

// Re-exports for convenience
pub use character::{Character, CharacterClass};
pub use combat::{Battle, BattleState, Enemy, EnemyKind};
pub use equipment::EquipSlot;
pub use error::{ErrorKind, GameError, GameResult};
pub use inventory::ItemHolder;
pub use loader::{GameData, load_game_data};
pub use repl::{GameSession, run_repl};
pub use stats::Rewards;
pub use view::{View, ViewItem};
