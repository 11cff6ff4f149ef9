//! `repl::character` module
//!
//! Handlers for creating, loading, saving and reviving characters.

use log::info;

use super::{GameSession, autosave, refuse_in_battle, report_error, require_character};
use crate::character::{Character, CharacterClass};
use crate::error::GameError;
use crate::save_files::{build_save_entries, delete_character, load_character, save_character, save_exists, save_path};
use crate::view::{CharacterSheet, View, ViewItem};

/// Create a new character and write its first save.
pub fn new_character_handler(session: &mut GameSession, view: &mut View, name: &str, class: &str) {
    if refuse_in_battle(session, view, "start a new character") {
        return;
    }
    let class = match class.parse::<CharacterClass>() {
        Ok(class) => class,
        Err(err) => return report_error(view, &err),
    };
    let save_dir = &session.data.settings.save_dir;
    if save_exists(save_dir, name) {
        return report_error(view, &GameError::CharacterAlreadyExists(name.trim().to_string()));
    }
    let character = match Character::with_gold(name, class, session.data.settings.starting_gold) {
        Ok(character) => character,
        Err(err) => return report_error(view, &err),
    };
    match save_character(save_dir, &character) {
        Ok(path) => view.push(ViewItem::GameSaved {
            name: character.name.clone(),
            file: path.display().to_string(),
        }),
        Err(err) => return report_error(view, &err),
    }
    view.push(ViewItem::ActionSuccess(format!(
        "{} the {class} begins their chronicle.",
        character.name
    )));
    view.push(ViewItem::CharacterSheet(CharacterSheet::from_character(&character)));
    session.battle = None;
    session.character = Some(character);
}

/// Load a saved character, replacing the current one.
pub fn load_handler(session: &mut GameSession, view: &mut View, name: &str) {
    if refuse_in_battle(session, view, "load a character") {
        return;
    }
    let save_dir = &session.data.settings.save_dir;
    match load_character(save_dir, name) {
        Ok(character) => {
            view.push(ViewItem::GameLoaded {
                name: character.name.clone(),
                file: save_path(save_dir, name).display().to_string(),
            });
            view.push(ViewItem::CharacterSheet(CharacterSheet::from_character(&character)));
            if character.is_dead() {
                view.push(ViewItem::CharacterDeath {
                    name: character.name.clone(),
                    revive_cost: session.data.settings.revive_cost,
                });
            }
            session.battle = None;
            session.character = Some(character);
        },
        Err(err) => report_error(view, &err),
    }
}

/// List saved characters and whether each one loads.
pub fn list_saves_handler(session: &GameSession, view: &mut View) {
    let save_dir = &session.data.settings.save_dir;
    match build_save_entries(save_dir) {
        Ok(entries) => view.push(ViewItem::SavedGamesList {
            directory: save_dir.display().to_string(),
            entries,
        }),
        Err(err) => report_error(view, &err),
    }
}

/// Delete a saved character. The loaded character cannot be deleted.
pub fn delete_handler(session: &mut GameSession, view: &mut View, name: &str) {
    if session
        .character
        .as_ref()
        .is_some_and(|current| current.name == name.trim())
    {
        view.push(ViewItem::ActionFailure(format!(
            "{} is your current character and can't be deleted.",
            name.trim()
        )));
        return;
    }
    match delete_character(&session.data.settings.save_dir, name) {
        Ok(()) => view.push(ViewItem::ActionSuccess(format!("Deleted {}.", name.trim()))),
        Err(err) => report_error(view, &err),
    }
}

pub fn stats_handler(session: &mut GameSession, view: &mut View) {
    if let Some(character) = require_character(&mut session.character, view) {
        view.push(ViewItem::CharacterSheet(CharacterSheet::from_character(character)));
    }
}

pub fn save_handler(session: &mut GameSession, view: &mut View) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    match save_character(&session.data.settings.save_dir, character) {
        Ok(path) => view.push(ViewItem::GameSaved {
            name: character.name.clone(),
            file: path.display().to_string(),
        }),
        Err(err) => report_error(view, &err),
    }
}

/// Pay the temple to bring a fallen character back at half health.
pub fn revive_handler(session: &mut GameSession, view: &mut View) {
    let cost = session.data.settings.revive_cost;
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    if !character.is_dead() {
        view.push(ViewItem::ActionFailure(format!("{} is alive and well.", character.name)));
        return;
    }
    if character.gold < cost {
        return report_error(
            view,
            &GameError::InsufficientResources {
                needed: cost,
                available: character.gold,
            },
        );
    }
    if let Err(err) = character.add_gold(-i64::from(cost)) {
        return report_error(view, &err);
    }
    character.revive();
    info!("{} paid {cost} gold to revive", character.name);
    view.push(ViewItem::ActionSuccess(format!(
        "The temple priests restore {} to {}/{} health for {cost} gold.",
        character.name, character.health, character.max_health
    )));
    autosave(session, view);
}
