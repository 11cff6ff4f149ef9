//! Command module
//!
//! Describes possible commands used during gameplay.
use variantly::Variantly;

use crate::equipment::EquipSlot;

/// Commands that can be executed by the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum Command {
    Abandon(String),
    Accept(String),
    Attack,
    AutoBattle,
    Available,
    Buy(String),
    Chain(String),
    Complete(String),
    Delete(String),
    Drop(String),
    Equip(String),
    Explore,
    Fight(String),
    Flee,
    Help,
    Inventory,
    ListSaves,
    Load(String),
    New { name: String, class: String },
    Progress,
    Quests,
    Quit,
    Revive,
    Save,
    Sell(String),
    Shop,
    SpecialAbility,
    Stats,
    Unequip(EquipSlot),
    Unknown,
    UseItem(String),
}

/// Parses an input string and returns a corresponding `Command` if recognized.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    match words.as_slice() {
        // class is the last word so names may contain spaces
        ["new", name @ .., class] if !name.is_empty() => Command::New {
            name: original_words(input, 1, name.len()),
            class: (*class).to_string(),
        },
        ["load", name @ ..] if !name.is_empty() => Command::Load(original_words(input, 1, name.len())),
        ["delete", name @ ..] if !name.is_empty() => Command::Delete(original_words(input, 1, name.len())),
        ["saves"] | ["list", "saves"] => Command::ListSaves,
        ["stats" | "status" | "character"] => Command::Stats,
        ["inventory" | "inv" | "i"] => Command::Inventory,
        ["use" | "drink", item] => Command::UseItem((*item).to_string()),
        ["equip" | "wield" | "wear", item] => Command::Equip((*item).to_string()),
        ["unequip" | "remove", slot] => slot.parse().map_or(Command::Unknown, Command::Unequip),
        ["drop", item] => Command::Drop((*item).to_string()),
        ["shop" | "store"] => Command::Shop,
        ["buy", item] => Command::Buy((*item).to_string()),
        ["sell", item] => Command::Sell((*item).to_string()),
        ["quests" | "journal"] => Command::Quests,
        ["available"] | ["quests", "available"] => Command::Available,
        ["accept", quest] => Command::Accept((*quest).to_string()),
        ["complete" | "finish", quest] => Command::Complete((*quest).to_string()),
        ["abandon", quest] => Command::Abandon((*quest).to_string()),
        ["chain", quest] => Command::Chain((*quest).to_string()),
        ["progress"] => Command::Progress,
        ["explore"] => Command::Explore,
        ["fight", enemy] => Command::Fight((*enemy).to_string()),
        ["auto"] => Command::AutoBattle,
        ["attack" | "hit"] => Command::Attack,
        ["ability" | "special"] => Command::SpecialAbility,
        ["flee" | "run"] => Command::Flee,
        ["revive"] => Command::Revive,
        ["save"] => Command::Save,
        ["help" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        _ => Command::Unknown,
    }
}

/// Recover `count` words starting at `start` with their original capitalization.
fn original_words(input: &str, start: usize, count: usize) -> String {
    input.split_whitespace().skip(start).take(count).collect::<Vec<_>>().join(" ")
}
