//! REPL and command handling utilities.
//!
//! The game runs in a read-eval-print loop. This module and its submodules
//! implement the command handlers that drive a [`GameSession`].

pub mod character;
pub mod combat;
mod input;
pub mod inventory;
pub mod quest;
pub mod system;

pub use character::*;
pub use combat::*;
pub use inventory::*;
pub use quest::*;
pub use system::*;

use anyhow::Result;
use log::{error, info, warn};
use rand::rngs::ThreadRng;

use crate::character::Character;
use crate::combat::Battle;
use crate::command::{Command, parse_command};
use crate::error::{ErrorKind, GameError};
use crate::loader::GameData;
use crate::save_files::save_character;
use crate::style::GameStyle;
use crate::view::{View, ViewItem};

use input::{InputEvent, InputManager};

/// Control flow signal used by handlers to exit the REPL.
pub enum ReplControl {
    Continue,
    Quit,
}

/// Everything a running game needs: loaded data, the current character and battle.
pub struct GameSession {
    pub data: GameData,
    pub character: Option<Character>,
    pub battle: Option<Battle>,
    pub rng: ThreadRng,
}

impl GameSession {
    pub fn new(data: GameData) -> GameSession {
        GameSession {
            data,
            character: None,
            battle: None,
            rng: rand::rng(),
        }
    }

    /// True while a started battle has not yet ended.
    pub fn in_battle(&self) -> bool {
        self.battle.as_ref().is_some_and(|battle| !battle.state().is_over())
    }
}

/// Run the main read–eval–print loop until the user quits.
///
/// # Errors
/// - if the terminal cannot be read at all
pub fn run_repl(session: &mut GameSession) -> Result<()> {
    #[allow(clippy::enum_glob_use)]
    use Command::*;
    let mut view = View::new();
    let mut input_manager = InputManager::new(&session.data.settings.save_dir);
    help_handler(&mut view);
    view.flush();

    loop {
        let prompt = prompt_text(session);
        let input_event = match input_manager.read_line(&prompt) {
            Ok(event) => event,
            Err(err) => {
                error!("input failed: {err}");
                return Err(err.into());
            },
        };
        let input = match input_event {
            InputEvent::Line(line) => line,
            InputEvent::Eof => {
                // no more input: an unfinished battle is abandoned
                session.battle = None;
                "quit".to_string()
            },
            InputEvent::Interrupted => {
                view.push(ViewItem::EngineMessage("Command canceled.".to_string()));
                view.flush();
                continue;
            },
        };
        if input.trim().is_empty() {
            continue;
        }

        let command = parse_command(&input);
        info!("command: {command:?}");
        match command {
            New { name, class } => new_character_handler(session, &mut view, &name, &class),
            Load(name) => load_handler(session, &mut view, &name),
            ListSaves => list_saves_handler(session, &mut view),
            Delete(name) => delete_handler(session, &mut view, &name),
            Stats => stats_handler(session, &mut view),
            Save => save_handler(session, &mut view),
            Revive => revive_handler(session, &mut view),
            Inventory => inventory_handler(session, &mut view),
            UseItem(item) => use_handler(session, &mut view, &item),
            Equip(item) => equip_handler(session, &mut view, &item),
            Unequip(slot) => unequip_handler(session, &mut view, slot),
            Drop(item) => drop_handler(session, &mut view, &item),
            Shop => shop_handler(session, &mut view),
            Buy(item) => buy_handler(session, &mut view, &item),
            Sell(item) => sell_handler(session, &mut view, &item),
            Quests => quests_handler(session, &mut view),
            Available => available_handler(session, &mut view),
            Accept(quest) => accept_handler(session, &mut view, &quest),
            Complete(quest) => complete_handler(session, &mut view, &quest),
            Abandon(quest) => abandon_handler(session, &mut view, &quest),
            Chain(quest) => chain_handler(session, &mut view, &quest),
            Progress => progress_handler(session, &mut view),
            Explore => explore_handler(session, &mut view),
            Fight(enemy) => fight_handler(session, &mut view, &enemy),
            AutoBattle => auto_battle_handler(session, &mut view),
            Attack => attack_handler(session, &mut view),
            SpecialAbility => ability_handler(session, &mut view),
            Flee => flee_handler(session, &mut view),
            Help => help_handler(&mut view),
            Quit => {
                if let ReplControl::Quit = quit_handler(session, &mut view) {
                    view.flush();
                    break;
                }
            },
            Unknown => view.push(ViewItem::Error(
                "Didn't quite catch that. Type `help` for commands.".to_string(),
            )),
        }
        view.flush();
    }
    Ok(())
}

fn prompt_text(session: &GameSession) -> String {
    let status = match (&session.character, &session.battle) {
        (Some(character), Some(battle)) if !battle.state().is_over() => format!(
            "{} {}/{} hp vs {} {}/{} hp",
            character.name,
            character.health,
            character.max_health,
            battle.enemy().name,
            battle.enemy().health,
            battle.enemy().max_health
        ),
        (Some(character), _) => format!(
            "{} L{} | {}/{} hp | {} gold",
            character.name, character.level, character.health, character.max_health, character.gold
        ),
        (None, _) => "no character".to_string(),
    };
    format!("\n[{status}]>> ").prompt_style().to_string()
}

/// The active character, or a failure message pointing the player at `new`/`load`.
pub(crate) fn require_character<'a>(character: &'a mut Option<Character>, view: &mut View) -> Option<&'a mut Character> {
    if character.is_none() {
        view.push(ViewItem::ActionFailure(
            "No character loaded. Use `new <name> <class>` or `load <name>`.".to_string(),
        ));
    }
    character.as_mut()
}

/// Show an engine error to the player. Rule violations are refusals; data and
/// file problems are errors.
pub(crate) fn report_error(view: &mut View, err: &GameError) {
    match err.kind() {
        ErrorKind::Corrupted | ErrorKind::Io => {
            warn!("{err}");
            view.push(ViewItem::Error(capitalize(&err.to_string())));
        },
        _ => {
            info!("refused: {err}");
            view.push(ViewItem::ActionFailure(capitalize(&err.to_string())));
        },
    }
}

/// Refuse a command that cannot run during a battle. Returns true if refused.
pub(crate) fn refuse_in_battle(session: &GameSession, view: &mut View, what: &str) -> bool {
    if session.in_battle() {
        view.push(ViewItem::ActionFailure(format!("You can't {what} in the middle of a fight.")));
        return true;
    }
    false
}

/// Write the current character to disk after progress worth keeping.
pub(crate) fn autosave(session: &GameSession, view: &mut View) {
    if let Some(character) = session.character.as_ref() {
        match save_character(&session.data.settings.save_dir, character) {
            Ok(_) => info!("autosaved '{}'", character.name),
            Err(err) => report_error(view, &err),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
