//! Quest Module
//!
//! Accepting, completing and abandoning quests, eligibility queries, and
//! traversal of the prerequisite graph. Quest definitions are read-only;
//! only the character's `active_quests` / `completed_quests` sets change.
use std::collections::BTreeSet;

use chronicle_data::{Id, Prerequisite, QuestCatalog, QuestDef};
use log::{info, warn};

use crate::character::Character;
use crate::error::{GameError, GameResult};
use crate::stats::Rewards;

/// Where a quest stands for a particular character.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuestStatus {
    Locked,
    Available,
    Active,
    Completed,
}

/// Look up a quest definition or fail with `QuestNotFound`.
pub fn quest_def<'a>(catalog: &'a QuestCatalog, quest_id: &str) -> GameResult<&'a QuestDef> {
    catalog
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))
}

/// Add a quest to the character's active set.
///
/// Checks run in a fixed order so the first failing rule is the one reported:
/// existence, level, prerequisite, already completed, already active.
///
/// # Errors
/// - `QuestNotFound`, `InsufficientLevel`, `QuestRequirementsNotMet`,
///   `QuestAlreadyCompleted`, `QuestAlreadyActive`
pub fn accept_quest(character: &mut Character, quest_id: &str, catalog: &QuestCatalog) -> GameResult<()> {
    let quest = quest_def(catalog, quest_id)?;
    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            quest_id: quest_id.to_string(),
            required: quest.required_level,
            current: character.level,
        });
    }
    if let Prerequisite::Quest(prereq) = &quest.prerequisite
        && !character.completed_quests.contains(prereq)
    {
        return Err(GameError::QuestRequirementsNotMet {
            quest_id: quest_id.to_string(),
            prerequisite: prereq.clone(),
        });
    }
    if character.completed_quests.contains(quest_id) {
        return Err(GameError::QuestAlreadyCompleted(quest_id.to_string()));
    }
    if character.active_quests.contains(quest_id) {
        return Err(GameError::QuestAlreadyActive(quest_id.to_string()));
    }
    character.active_quests.insert(quest_id.to_string());
    info!("{} accepted quest '{quest_id}'", character.name);
    Ok(())
}

/// Move an active quest to the completed set and grant its rewards.
///
/// Experience goes through [`Character::gain_experience`], so completing a
/// quest can level the character up.
///
/// # Errors
/// - `QuestNotFound` if the id is not in the catalog
/// - `QuestNotActive` if the character has not accepted it
/// - `CharacterDead` if the character is dead (nothing changes)
pub fn complete_quest(character: &mut Character, quest_id: &str, catalog: &QuestCatalog) -> GameResult<Rewards> {
    let quest = quest_def(catalog, quest_id)?;
    if !character.active_quests.contains(quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    if character.is_dead() {
        return Err(GameError::CharacterDead(character.name.clone()));
    }
    character.active_quests.remove(quest_id);
    character.completed_quests.insert(quest_id.to_string());
    let rewards = Rewards::new(quest.reward_xp, quest.reward_gold);
    character.grant(rewards)?;
    info!(
        "{} completed quest '{quest_id}' (+{} xp, +{} gold)",
        character.name, rewards.xp, rewards.gold
    );
    Ok(rewards)
}

/// Drop an active quest without rewards.
///
/// # Errors
/// - `QuestNotActive` if the quest is not in the active set
pub fn abandon_quest(character: &mut Character, quest_id: &str) -> GameResult<()> {
    if !character.active_quests.remove(quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    info!("{} abandoned quest '{quest_id}'", character.name);
    Ok(())
}

/// True if the character could accept `quest_id` right now. Never fails.
pub fn can_accept_quest(character: &Character, quest_id: &str, catalog: &QuestCatalog) -> bool {
    catalog.get(quest_id).is_some_and(|quest| is_available(character, quest))
}

fn is_available(character: &Character, quest: &QuestDef) -> bool {
    !character.completed_quests.contains(&quest.id)
        && !character.active_quests.contains(&quest.id)
        && quest.required_level <= character.level
        && quest
            .prerequisite
            .quest_id()
            .is_none_or(|prereq| character.completed_quests.contains(prereq))
}

/// All quests the character could accept now, in id order.
pub fn available_quests<'a>(character: &Character, catalog: &'a QuestCatalog) -> Vec<&'a QuestDef> {
    catalog.values().filter(|quest| is_available(character, quest)).collect()
}

/// Classify a quest for display.
pub fn quest_status(character: &Character, quest: &QuestDef) -> QuestStatus {
    if character.completed_quests.contains(&quest.id) {
        QuestStatus::Completed
    } else if character.active_quests.contains(&quest.id) {
        QuestStatus::Active
    } else if is_available(character, quest) {
        QuestStatus::Available
    } else {
        QuestStatus::Locked
    }
}

/// Walk prerequisite links backward from `quest_id`.
///
/// Returns `[earliest ancestor, ..., quest_id]`.
///
/// # Errors
/// - `QuestNotFound` if `quest_id` or any ancestor is missing from the catalog
/// - `PrerequisiteCycle` if the walk revisits a quest
pub fn prerequisite_chain(quest_id: &str, catalog: &QuestCatalog) -> GameResult<Vec<Id>> {
    let mut chain = Vec::new();
    let mut visited = BTreeSet::new();
    let mut current = Some(quest_id);
    while let Some(id) = current {
        if !visited.insert(id) {
            warn!("prerequisite cycle through '{id}' while tracing '{quest_id}'");
            return Err(GameError::PrerequisiteCycle(id.to_string()));
        }
        let quest = quest_def(catalog, id)?;
        chain.push(id.to_string());
        current = quest.prerequisite.quest_id();
    }
    chain.reverse();
    Ok(chain)
}

/// Check that every prerequisite names a quest in the catalog.
///
/// # Errors
/// - `PrerequisiteNotFound` naming the first quest, in id order, whose
///   prerequisite is missing
pub fn validate_prerequisites(catalog: &QuestCatalog) -> GameResult<()> {
    for quest in catalog.values() {
        if let Some(prereq) = quest.prerequisite.quest_id()
            && !catalog.contains_key(prereq)
        {
            return Err(GameError::PrerequisiteNotFound {
                quest_id: quest.id.clone(),
                prerequisite: prereq.to_string(),
            });
        }
    }
    Ok(())
}

/// Active quests that still exist in the catalog, in id order.
pub fn active_quests<'a>(character: &Character, catalog: &'a QuestCatalog) -> Vec<&'a QuestDef> {
    character.active_quests.iter().filter_map(|id| catalog.get(id)).collect()
}

/// Completed quests that still exist in the catalog, in id order.
pub fn completed_quests<'a>(character: &Character, catalog: &'a QuestCatalog) -> Vec<&'a QuestDef> {
    character.completed_quests.iter().filter_map(|id| catalog.get(id)).collect()
}

/// Quests whose required level falls within `min..=max`.
pub fn quests_by_level(catalog: &QuestCatalog, min: u32, max: u32) -> Vec<&QuestDef> {
    catalog
        .values()
        .filter(|quest| (min..=max).contains(&quest.required_level))
        .collect()
}

pub fn is_quest_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.contains(quest_id)
}

pub fn is_quest_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.contains(quest_id)
}

/// Percentage of the catalog the character has completed. 0 for an empty catalog.
#[allow(clippy::cast_precision_loss)]
pub fn completion_percentage(character: &Character, catalog: &QuestCatalog) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }
    100.0 * character.completed_quests.len() as f64 / catalog.len() as f64
}

/// Sum of rewards over completed quests still present in the catalog.
pub fn total_rewards(character: &Character, catalog: &QuestCatalog) -> Rewards {
    completed_quests(character, catalog)
        .into_iter()
        .fold(Rewards::default(), |acc, quest| Rewards {
            xp: acc.xp.saturating_add(quest.reward_xp),
            gold: acc.gold.saturating_add(quest.reward_gold),
        })
}
