//! `repl::combat` module
//!
//! Handlers that start, play out, and settle battles.

use log::info;

use super::{GameSession, autosave, refuse_in_battle, report_error, require_character};
use crate::combat::{
    AbilityOutcome, Battle, BattleState, Enemy, PlayerAction, TurnEvent, award_victory, create_enemy,
    enemy_for_level,
};
use crate::error::GameError;
use crate::view::{CombatTone, View, ViewItem};

/// Meet whatever roams at the character's level.
pub fn explore_handler(session: &mut GameSession, view: &mut View) {
    let Some(level) = session.character.as_ref().map(|character| character.level) else {
        require_character(&mut session.character, view);
        return;
    };
    begin_battle(session, view, enemy_for_level(level));
}

/// Pick a fight with a named enemy.
pub fn fight_handler(session: &mut GameSession, view: &mut View, enemy: &str) {
    match create_enemy(enemy) {
        Ok(enemy) => begin_battle(session, view, enemy),
        Err(err) => report_error(view, &err),
    }
}

fn begin_battle(session: &mut GameSession, view: &mut View, enemy: Enemy) {
    if refuse_in_battle(session, view, "start another fight") {
        return;
    }
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let mut battle = Battle::new(enemy);
    if let Err(err) = battle.start(character) {
        return report_error(view, &err);
    }
    character.ability_on_cooldown = false;
    let enemy = battle.enemy();
    view.push(ViewItem::BattleStarted {
        enemy: enemy.name.clone(),
        health: enemy.health,
        strength: enemy.strength,
    });
    view.push(ViewItem::EngineMessage(
        "Choose `attack`, `ability`, `flee`, or `auto` to fight it out.".to_string(),
    ));
    session.battle = Some(battle);
}

pub fn attack_handler(session: &mut GameSession, view: &mut View) {
    battle_round(session, view, PlayerAction::Attack);
}

pub fn ability_handler(session: &mut GameSession, view: &mut View) {
    battle_round(session, view, PlayerAction::SpecialAbility);
}

pub fn flee_handler(session: &mut GameSession, view: &mut View) {
    battle_round(session, view, PlayerAction::Flee);
}

/// Resolve the current battle without further input.
pub fn auto_battle_handler(session: &mut GameSession, view: &mut View) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let Some(battle) = session.battle.as_mut() else {
        view.push(ViewItem::ActionFailure(
            "You are not fighting anything. Try `explore` or `fight <enemy>`.".to_string(),
        ));
        return;
    };
    if let Err(err) = battle.resolve_auto(character) {
        return report_error(view, &err);
    }
    finish_battle(session, view);
}

/// One round: the player's action, then (if the fight goes on) the enemy's reply.
fn battle_round(session: &mut GameSession, view: &mut View, action: PlayerAction) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    let Some(battle) = session.battle.as_mut() else {
        view.push(ViewItem::ActionFailure(
            "You are not fighting anything. Try `explore` or `fight <enemy>`.".to_string(),
        ));
        return;
    };
    let enemy_name = battle.enemy().name.clone();

    let report = match battle.player_turn(character, action, &mut session.rng) {
        Ok(report) => report,
        Err(err) => return report_error(view, &err),
    };
    view.push(describe(&report.event, &enemy_name));

    if !report.state.is_over() {
        let before = character.health;
        match battle.enemy_turn(character) {
            Ok(reply) => view.push(describe(&reply.event, &enemy_name)),
            Err(GameError::CharacterDead(_)) => view.push(describe(
                &TurnEvent::EnemyAttack {
                    damage: before - character.health,
                },
                &enemy_name,
            )),
            Err(err) => return report_error(view, &err),
        }
        // the ability recharges over one full round
        character.ability_on_cooldown = action == PlayerAction::SpecialAbility;
    }

    if battle.state().is_over() {
        finish_battle(session, view);
    } else {
        let enemy = battle.enemy();
        view.push(ViewItem::BattleStatus {
            character_health: character.health,
            character_max: character.max_health,
            enemy: enemy.name.clone(),
            enemy_health: enemy.health,
            enemy_max: enemy.max_health,
        });
    }
}

fn describe(event: &TurnEvent, enemy: &str) -> ViewItem {
    let (text, tone) = match event {
        TurnEvent::Attack { damage } => (
            format!("You strike the {enemy} for {damage} damage."),
            CombatTone::PlayerHit,
        ),
        TurnEvent::Ability(AbilityOutcome::Damage {
            ability,
            amount,
            critical,
        }) => (
            format!(
                "{ability}{} The {enemy} takes {amount} damage.",
                if *critical { " lands a critical hit!" } else { "!" }
            ),
            CombatTone::PlayerHit,
        ),
        TurnEvent::Ability(AbilityOutcome::Heal { ability, amount }) => {
            (format!("{ability} restores {amount} health."), CombatTone::Healed)
        },
        TurnEvent::Escaped => (format!("You slip away from the {enemy}."), CombatTone::Neutral),
        TurnEvent::EscapeFailed => (
            format!("You try to run, but the {enemy} cuts you off."),
            CombatTone::Neutral,
        ),
        TurnEvent::EnemyAttack { damage } => (
            format!("The {enemy} hits you for {damage} damage."),
            CombatTone::PlayerHarmed,
        ),
    };
    ViewItem::CombatEvent { text, tone }
}

/// Settle a finished battle: rewards on victory, the death notice on defeat, then save.
fn finish_battle(session: &mut GameSession, view: &mut View) {
    let Some(battle) = session.battle.take() else {
        return;
    };
    let Some(character) = session.character.as_mut() else {
        return;
    };
    let outcome = battle.outcome();
    character.ability_on_cooldown = false;
    view.push(ViewItem::BattleEnded {
        enemy: battle.enemy().name.clone(),
        state: outcome.state,
        turns: outcome.turns,
    });
    match outcome.state {
        BattleState::PlayerWon => match award_victory(character, outcome.rewards) {
            Ok(leveled_up) => {
                view.push(ViewItem::RewardsGranted {
                    source: format!("Defeated {}", battle.enemy().name),
                    rewards: outcome.rewards,
                });
                if leveled_up {
                    view.push(ViewItem::LevelUp {
                        name: character.name.clone(),
                        level: character.level,
                    });
                }
            },
            Err(err) => report_error(view, &err),
        },
        BattleState::EnemyWon => view.push(ViewItem::CharacterDeath {
            name: character.name.clone(),
            revive_cost: session.data.settings.revive_cost,
        }),
        BattleState::Escaped | BattleState::NotStarted | BattleState::Active => {},
    }
    info!(
        "{} battle vs {} settled: {:?} in {} rounds",
        character.name,
        battle.enemy().name,
        outcome.state,
        outcome.turns
    );
    autosave(session, view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::repl::tests::session_with;
    use tempfile::tempdir;

    #[test]
    fn auto_battle_against_goblin_pays_out() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Warrior);
        let mut view = View::new();
        fight_handler(&mut session, &mut view, "goblin");
        assert!(session.in_battle());
        auto_battle_handler(&mut session, &mut view);

        assert!(session.battle.is_none());
        let character = session.character.as_ref().unwrap();
        assert_eq!((character.health, character.experience, character.gold), (96, 25, 110));
        assert!(view.items.contains(&ViewItem::BattleEnded {
            enemy: "Goblin".into(),
            state: BattleState::PlayerWon,
            turns: 3,
        }));
    }

    #[test]
    fn ability_recharges_after_one_round() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Warrior);
        let mut view = View::new();
        fight_handler(&mut session, &mut view, "goblin");

        ability_handler(&mut session, &mut view);
        assert!(session.character.as_ref().unwrap().ability_on_cooldown);
        assert_eq!(session.character.as_ref().unwrap().health, 115);

        let mut view = View::new();
        ability_handler(&mut session, &mut view);
        assert!(view.items[0].is_action_failure());
        assert_eq!(session.character.as_ref().unwrap().health, 115);

        attack_handler(&mut session, &mut view);
        assert!(!session.character.as_ref().unwrap().ability_on_cooldown);
        assert_eq!(session.battle.as_ref().unwrap().enemy().health, 7);

        ability_handler(&mut session, &mut view);
        assert!(session.battle.is_none());
        assert_eq!(session.character.as_ref().unwrap().experience, 25);
    }

    #[test]
    fn second_fight_is_refused_while_one_is_running() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Mage);
        let mut view = View::new();
        explore_handler(&mut session, &mut view);
        let mut view = View::new();
        fight_handler(&mut session, &mut view, "orc");
        assert!(view.items[0].is_action_failure());
        assert_eq!(session.battle.as_ref().unwrap().enemy().name, "Goblin");
    }

    #[test]
    fn losing_leaves_the_character_down_until_revived() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Mage);
        session.character.as_mut().unwrap().health = 5;
        let mut view = View::new();
        fight_handler(&mut session, &mut view, "dragon");
        attack_handler(&mut session, &mut view);

        assert!(session.character.as_ref().unwrap().is_dead());
        assert!(session.battle.is_none());
        assert!(view.items.iter().any(ViewItem::is_character_death));

        let mut view = View::new();
        explore_handler(&mut session, &mut view);
        assert!(view.items[0].is_action_failure());
    }

    #[test]
    fn unknown_enemy_and_idle_actions_are_refused() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Rogue);
        let mut view = View::new();
        fight_handler(&mut session, &mut view, "kraken");
        attack_handler(&mut session, &mut view);
        assert!(view.items.iter().all(ViewItem::is_action_failure));
    }
}
