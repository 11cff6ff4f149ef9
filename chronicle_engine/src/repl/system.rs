//! `repl::system` module
//!
//! Contains repl loop handlers for help and leaving the game.

use log::info;

use super::{GameSession, ReplControl, refuse_in_battle, report_error};
use crate::quest::completed_quests;
use crate::save_files::save_character;
use crate::view::{HelpLine, View, ViewItem};

const HELP: &[(&str, &str)] = &[
    ("new <name> <class>", "create a Warrior, Mage, Rogue, or Cleric"),
    ("load <name>", "continue a saved character"),
    ("saves", "list saved characters"),
    ("delete <name>", "remove a saved character"),
    ("stats", "show the character sheet"),
    ("inventory", "list carried items"),
    ("use <item>", "drink or use a consumable"),
    ("equip <item>", "wield a weapon or wear armor"),
    ("unequip weapon|armor", "take off equipment"),
    ("drop <item>", "throw an item away"),
    ("shop", "see what is for sale"),
    ("buy <item> / sell <item>", "trade with the shopkeeper"),
    ("quests / available", "your journal / quests you can take"),
    ("accept|complete|abandon <quest>", "manage a quest"),
    ("chain <quest>", "show what leads up to a quest"),
    ("progress", "quest completion and total rewards"),
    ("explore / fight <enemy>", "find trouble (goblin, orc, dragon)"),
    ("attack / ability / flee", "act during a battle"),
    ("auto", "let the current battle play out"),
    ("revive", "return from the dead for a fee"),
    ("save", "save the current character"),
    ("quit", "save and leave"),
];

/// Show available commands.
pub fn help_handler(view: &mut View) {
    view.push(ViewItem::Help(
        HELP.iter()
            .map(|&(command, description)| HelpLine { command, description })
            .collect(),
    ));
}

/// Save the current character (if any) and leave. Refused mid-battle.
pub fn quit_handler(session: &GameSession, view: &mut View) -> ReplControl {
    if refuse_in_battle(session, view, "quit") {
        return ReplControl::Continue;
    }
    if let Some(character) = session.character.as_ref() {
        if let Err(err) = save_character(&session.data.settings.save_dir, character) {
            report_error(view, &err);
        }
        let catalog = &session.data.catalog.quests;
        info!(
            "{} quit at level {} with {} gold",
            character.name, character.level, character.gold
        );
        view.push(ViewItem::QuitSummary {
            name: character.name.clone(),
            level: character.level,
            completed: completed_quests(character, catalog).len(),
            total: catalog.len(),
        });
    } else {
        view.push(ViewItem::EngineMessage("Farewell.".to_string()));
    }
    ReplControl::Quit
}
