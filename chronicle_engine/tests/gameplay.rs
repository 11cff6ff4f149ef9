use std::collections::BTreeMap;

use chronicle_data::{Effect, ItemCatalog, ItemDef, ItemKind, Prerequisite, QuestCatalog, QuestDef, Stat};
use chronicle_engine as ce;
use ce::combat::{
    Battle, BattleState, PlayerAction, TurnEvent, calculate_damage, create_enemy, start_battle, victory_rewards,
};
use ce::equipment::{equip_weapon, unequip_weapon};
use ce::quest::{accept_quest, complete_quest, completion_percentage};
use ce::save_files::{load_character, save_character};
use ce::shop::purchase_item;
use ce::*;
use rand::RngCore;
use tempfile::tempdir;

/// Deterministic coin: `heads()` makes every `random_bool(0.5)` true.
struct FixedRng(u64);

impl FixedRng {
    fn heads() -> FixedRng {
        FixedRng(0)
    }
    fn tails() -> FixedRng {
        FixedRng(u64::MAX)
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let value = self.0 as u32;
        value
    }
    fn next_u64(&mut self) -> u64 {
        self.0
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0.to_le_bytes()[0]);
    }
}

fn hero(class: CharacterClass) -> Character {
    Character::new("Aldous", class).unwrap()
}

fn item(id: &str, kind: ItemKind, effect: Effect, cost: u32) -> (String, ItemDef) {
    (
        id.to_string(),
        ItemDef {
            id: id.to_string(),
            name: id.replace('_', " "),
            kind,
            effect,
            cost,
            description: String::new(),
        },
    )
}

fn items() -> ItemCatalog {
    BTreeMap::from([
        item("sword", ItemKind::Weapon, Effect::new(Stat::Strength, 5), 60),
        item("plate", ItemKind::Armor, Effect::new(Stat::MaxHealth, 20), 150),
        item("potion", ItemKind::Consumable, Effect::new(Stat::Health, 30), 20),
    ])
}

fn quests() -> QuestCatalog {
    let quest = |id: &str, level: u32, prerequisite: Prerequisite, xp: u32| {
        (
            id.to_string(),
            QuestDef {
                id: id.to_string(),
                title: id.to_uppercase(),
                description: String::new(),
                reward_xp: xp,
                reward_gold: 10,
                required_level: level,
                prerequisite,
            },
        )
    };
    BTreeMap::from([
        quest("scout", 1, Prerequisite::None, 120),
        quest("siege", 3, Prerequisite::Quest("scout".into()), 300),
    ])
}

#[test]
fn goblin_falls_after_four_blows() {
    let mut warrior = hero(CharacterClass::Warrior);
    let outcome = start_battle(&mut warrior, create_enemy("goblin").unwrap()).unwrap();
    assert_eq!(outcome.state, BattleState::PlayerWon);
    assert_eq!(outcome.rewards, Rewards::new(25, 10));
    assert_eq!(warrior.health, 96);

    let leveled = ce::combat::award_victory(&mut warrior, outcome.rewards).unwrap();
    assert!(!leveled);
    assert_eq!((warrior.experience, warrior.gold), (25, 110));
}

#[test]
fn purchase_beyond_means_changes_nothing() {
    let mut mage = hero(CharacterClass::Mage);
    let err = purchase_item(&mut mage, "plate", &items()).unwrap_err();
    assert!(matches!(err, GameError::InsufficientResources { needed: 150, available: 100 }));
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    assert_eq!(mage.gold, 100);
    assert!(mage.inventory.is_empty());
}

#[test]
fn quest_above_level_is_gated() {
    let mut rogue = hero(CharacterClass::Rogue);
    let catalog = quests();
    rogue.completed_quests.insert("scout".into());
    let err = accept_quest(&mut rogue, "siege", &catalog).unwrap_err();
    assert!(matches!(err, GameError::InsufficientLevel { required: 3, current: 1, .. }));
    assert!(rogue.active_quests.is_empty());
}

#[test]
fn quest_rewards_route_through_leveling() {
    let mut cleric = hero(CharacterClass::Cleric);
    let catalog = quests();
    accept_quest(&mut cleric, "scout", &catalog).unwrap();
    let rewards = complete_quest(&mut cleric, "scout", &catalog).unwrap();
    assert_eq!(rewards, Rewards::new(120, 10));
    assert_eq!((cleric.level, cleric.experience), (2, 20));
    assert_eq!(cleric.max_health, 110);
    assert!(!cleric.active_quests.contains("scout"));
    assert!((completion_percentage(&cleric, &catalog) - 50.0).abs() < f64::EPSILON);
}

#[test]
fn experience_in_one_grant_matches_several() {
    let mut lump = hero(CharacterClass::Warrior);
    let mut steps = lump.clone();
    lump.gain_experience(250).unwrap();
    for amount in [100, 100, 50] {
        steps.gain_experience(amount).unwrap();
    }
    assert_eq!(lump, steps);
    assert_eq!((lump.level, lump.experience), (2, 150));
}

#[test]
fn equip_round_trip_restores_strength() {
    let mut warrior = hero(CharacterClass::Warrior);
    let catalog = items();
    warrior.add_item("sword").unwrap();
    equip_weapon(&mut warrior, "sword", &catalog).unwrap();
    assert_eq!(warrior.strength, 20);
    assert!(warrior.inventory.is_empty());

    assert_eq!(unequip_weapon(&mut warrior, &catalog).unwrap().as_deref(), Some("sword"));
    assert_eq!(warrior.strength, 15);
    assert_eq!(warrior.inventory, ["sword"]);
    assert!(warrior.equipped_weapon.is_none());
}

#[test]
fn damage_never_drops_below_one() {
    let mage = hero(CharacterClass::Mage);
    let mut dragon = create_enemy("dragon").unwrap();
    dragon.strength = 1_000;
    assert_eq!(calculate_damage(&mage, &dragon), 1);
    assert_eq!(victory_rewards(None), Rewards::default());
}

#[test]
fn interactive_battle_with_a_lucky_escape() {
    let mut rogue = hero(CharacterClass::Rogue);
    let mut battle = Battle::new(create_enemy("orc").unwrap());
    battle.start(&rogue).unwrap();

    let report = battle
        .player_turn(&mut rogue, PlayerAction::Flee, &mut FixedRng::tails())
        .unwrap();
    assert_eq!(report.event, TurnEvent::EscapeFailed);
    let reply = battle.enemy_turn(&mut rogue).unwrap();
    // 12 - 12 / 4
    assert_eq!(reply.event, TurnEvent::EnemyAttack { damage: 9 });

    let report = battle
        .player_turn(&mut rogue, PlayerAction::Flee, &mut FixedRng::heads())
        .unwrap();
    assert_eq!(report.state, BattleState::Escaped);
    assert_eq!(battle.outcome().rewards, Rewards::default());
    assert!(matches!(battle.enemy_turn(&mut rogue), Err(GameError::CombatNotActive)));
}

#[test]
fn saved_character_loads_back_identically() {
    let dir = tempdir().unwrap();
    let mut veteran = hero(CharacterClass::Warrior);
    let catalog = items();
    veteran.add_item("sword").unwrap();
    veteran.add_item("potion").unwrap();
    equip_weapon(&mut veteran, "sword", &catalog).unwrap();
    veteran.active_quests.insert("scout".into());
    veteran.gain_experience(130).unwrap();

    save_character(dir.path(), &veteran).unwrap();
    let loaded = load_character(dir.path(), "Aldous").unwrap();
    assert_eq!(loaded, veteran);
}

#[test]
fn dead_characters_cannot_fight_or_learn() {
    let mut fallen = hero(CharacterClass::Mage);
    fallen.damage(500);
    assert!(fallen.is_dead());
    assert!(!ce::combat::can_character_fight(&fallen));
    assert!(matches!(
        start_battle(&mut fallen, create_enemy("goblin").unwrap()),
        Err(GameError::CharacterDead(_))
    ));
    assert!(fallen.revive());
    assert_eq!(fallen.health, 40);
}
