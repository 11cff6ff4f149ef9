//! `repl::quest` module
//!
//! Handlers for the quest journal.

use chronicle_data::{QuestCatalog, QuestDef};

use super::{GameSession, autosave, report_error, require_character};
use crate::character::Character;
use crate::quest::{
    QuestStatus, abandon_quest, accept_quest, active_quests, available_quests, complete_quest, completed_quests,
    completion_percentage, prerequisite_chain, quest_def, quest_status, quests_by_level, total_rewards,
};
use crate::stats::Rewards;
use crate::view::{QuestLine, QuestMark, View, ViewItem};

/// Locked quests within this many levels of the character are previewed in the journal.
const PREVIEW_LEVELS: u32 = 2;

fn quest_line(character: &Character, quest: &QuestDef) -> QuestLine {
    let mark = match quest_status(character, quest) {
        QuestStatus::Locked => QuestMark::Locked,
        QuestStatus::Available => QuestMark::Available,
        QuestStatus::Active => QuestMark::Active,
        QuestStatus::Completed => QuestMark::Completed,
    };
    QuestLine {
        quest_id: quest.id.clone(),
        title: quest.title.clone(),
        description: quest.description.clone(),
        required_level: quest.required_level,
        rewards: Rewards::new(quest.reward_xp, quest.reward_gold),
        mark,
    }
}

fn quest_list(character: &Character, heading: &str, quests: Vec<&QuestDef>) -> ViewItem {
    ViewItem::QuestList {
        heading: heading.to_string(),
        quests: quests.into_iter().map(|quest| quest_line(character, quest)).collect(),
    }
}

/// Active and completed quests, plus locked ones coming up soon.
pub fn quests_handler(session: &mut GameSession, view: &mut View) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let catalog = &session.data.catalog.quests;
    view.push(quest_list(character, "Active quests", active_quests(character, catalog)));
    view.push(quest_list(character, "Completed quests", completed_quests(character, catalog)));
    let upcoming = quests_by_level(catalog, 1, character.level.saturating_add(PREVIEW_LEVELS))
        .into_iter()
        .filter(|quest| quest_status(character, quest) == QuestStatus::Locked)
        .collect();
    view.push(quest_list(character, "Locked quests", upcoming));
}

pub fn available_handler(session: &mut GameSession, view: &mut View) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let quests = available_quests(character, &session.data.catalog.quests);
    view.push(quest_list(character, "Available quests", quests));
}

pub fn accept_handler(session: &mut GameSession, view: &mut View, quest_id: &str) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let catalog = &session.data.catalog.quests;
    match accept_quest(character, quest_id, catalog) {
        Ok(()) => {
            let title = quest_title(catalog, quest_id);
            view.push(ViewItem::ActionSuccess(format!("Quest accepted: {title}.")));
            autosave(session, view);
        },
        Err(err) => report_error(view, &err),
    }
}

/// Complete an active quest, granting its rewards and saving.
pub fn complete_handler(session: &mut GameSession, view: &mut View, quest_id: &str) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let catalog = &session.data.catalog.quests;
    let level_before = character.level;
    match complete_quest(character, quest_id, catalog) {
        Ok(rewards) => {
            let title = quest_title(catalog, quest_id);
            view.push(ViewItem::ActionSuccess(format!("Quest complete: {title}!")));
            view.push(ViewItem::RewardsGranted { source: title, rewards });
            if character.level > level_before {
                view.push(ViewItem::LevelUp {
                    name: character.name.clone(),
                    level: character.level,
                });
            }
            autosave(session, view);
        },
        Err(err) => report_error(view, &err),
    }
}

pub fn abandon_handler(session: &mut GameSession, view: &mut View, quest_id: &str) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    match abandon_quest(character, quest_id) {
        Ok(()) => {
            let title = quest_title(&session.data.catalog.quests, quest_id);
            view.push(ViewItem::ActionSuccess(format!("Quest abandoned: {title}.")));
        },
        Err(err) => report_error(view, &err),
    }
}

/// Show the prerequisite chain leading to a quest.
pub fn chain_handler(session: &GameSession, view: &mut View, quest_id: &str) {
    let catalog = &session.data.catalog.quests;
    match prerequisite_chain(quest_id, catalog) {
        Ok(chain) => view.push(ViewItem::QuestChain(
            chain.iter().map(|id| quest_title(catalog, id)).collect(),
        )),
        Err(err) => report_error(view, &err),
    }
}

pub fn progress_handler(session: &mut GameSession, view: &mut View) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let catalog = &session.data.catalog.quests;
    view.push(ViewItem::QuestProgress {
        completed: completed_quests(character, catalog).len(),
        total: catalog.len(),
        percent: completion_percentage(character, catalog),
        rewards: total_rewards(character, catalog),
    });
}

fn quest_title(catalog: &QuestCatalog, quest_id: &str) -> String {
    quest_def(catalog, quest_id).map_or_else(|_| quest_id.to_string(), |quest| quest.title.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::repl::tests::session_with;
    use crate::save_files::load_character;
    use tempfile::tempdir;

    #[test]
    fn accept_then_complete_grants_rewards_and_saves() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Rogue);
        let mut view = View::new();
        accept_handler(&mut session, &mut view, "first_steps");
        complete_handler(&mut session, &mut view, "first_steps");

        let character = session.character.as_ref().unwrap();
        assert!(character.completed_quests.contains("first_steps"));
        assert_eq!((character.experience, character.gold), (50, 120));
        assert!(view.items.iter().any(ViewItem::is_rewards_granted));
        let saved = load_character(&session.data.settings.save_dir, "Tess").unwrap();
        assert_eq!(saved.gold, 120);
    }

    #[test]
    fn locked_quest_is_refused() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Warrior);
        let mut view = View::new();
        accept_handler(&mut session, &mut view, "cellar_rats");
        assert!(view.items[0].is_action_failure());
        assert!(session.character.as_ref().unwrap().active_quests.is_empty());
    }

    #[test]
    fn chain_lists_titles_from_the_root() {
        let dir = tempdir().unwrap();
        let session = session_with(&dir, CharacterClass::Mage);
        let mut view = View::new();
        chain_handler(&session, &mut view, "goblin_road");
        let ViewItem::QuestChain(titles) = &view.items[0] else {
            panic!("expected a quest chain");
        };
        assert_eq!(titles.len(), 3);
        assert_eq!(titles[2], session.data.catalog.quests["goblin_road"].title);
    }

    #[test]
    fn journal_previews_locked_quests_near_level() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Cleric);
        let mut view = View::new();
        quests_handler(&mut session, &mut view);
        let ViewItem::QuestList { quests, .. } = &view.items[2] else {
            panic!("expected the locked list");
        };
        let ids: Vec<&str> = quests.iter().map(|quest| quest.quest_id.as_str()).collect();
        assert_eq!(ids, ["cellar_rats", "goblin_road", "orc_camp"]);
    }
}
