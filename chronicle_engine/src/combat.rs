//! Combat Module
//!
//! Turn-based battles between a character and a single enemy. A [`Battle`]
//! holds the enemy and the state machine; the character is passed into each
//! call so the caller keeps ownership of it between turns.
//!
//! Two ways to fight:
//! - [`start_battle`] / [`Battle::resolve_auto`] trade raw-strength blows
//!   until one side drops.
//! - [`Battle::player_turn`] and [`Battle::enemy_turn`] let a front end
//!   present a choice each turn, using the mitigated damage formula.
use std::cmp;

use log::{debug, info, warn};
use rand::Rng;
use variantly::Variantly;

use crate::character::Character;
use crate::error::{GameError, GameResult};
use crate::stats::Rewards;

pub mod ability;
pub mod enemy;

pub use ability::{AbilityOutcome, SpecialAbility, use_special_ability};
pub use enemy::{Enemy, EnemyKind, create_enemy, enemy_for_level};

/// Chance that an escape attempt succeeds.
pub const ESCAPE_CHANCE: f64 = 0.5;

/// Anything that can trade blows in a battle.
pub trait Combatant {
    fn name(&self) -> &str;
    fn health(&self) -> u32;
    fn max_health(&self) -> u32;
    fn strength(&self) -> u32;
    fn magic(&self) -> u32;
    /// Reduce health, saturating at zero.
    fn take_damage(&mut self, amount: u32);

    fn is_defeated(&self) -> bool {
        self.health() == 0
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }
    fn health(&self) -> u32 {
        self.health
    }
    fn max_health(&self) -> u32 {
        self.max_health
    }
    fn strength(&self) -> u32 {
        self.strength
    }
    fn magic(&self) -> u32 {
        self.magic
    }
    fn take_damage(&mut self, amount: u32) {
        self.damage(amount);
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }
    fn health(&self) -> u32 {
        self.health
    }
    fn max_health(&self) -> u32 {
        self.max_health
    }
    fn strength(&self) -> u32 {
        self.strength
    }
    fn magic(&self) -> u32 {
        self.magic
    }
    fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// `power` reduced by a quarter of `defense`, never less than 1.
pub(crate) fn mitigated(power: u32, defense: u32) -> u32 {
    cmp::max(1, power.saturating_sub(defense / 4))
}

/// Damage dealt by a regular attack: attacker strength less a quarter of the
/// defender's strength, with a floor of 1.
pub fn calculate_damage(attacker: &impl Combatant, defender: &impl Combatant) -> u32 {
    mitigated(attacker.strength(), defender.strength())
}

/// Flip the escape coin.
pub fn attempt_escape<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random_bool(ESCAPE_CHANCE)
}

/// Where a battle stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Variantly)]
pub enum BattleState {
    NotStarted,
    Active,
    PlayerWon,
    EnemyWon,
    Escaped,
}

impl BattleState {
    pub fn is_over(self) -> bool {
        matches!(self, BattleState::PlayerWon | BattleState::EnemyWon | BattleState::Escaped)
    }
}

/// A choice the player makes on their turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    SpecialAbility,
    Flee,
}

/// What happened during a single turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// A basic attack by the player.
    Attack { damage: u32 },
    Ability(AbilityOutcome),
    Escaped,
    EscapeFailed,
    /// The enemy's counterattack.
    EnemyAttack { damage: u32 },
}

/// A turn's event plus the battle state after it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub event: TurnEvent,
    pub state: BattleState,
}

/// Final result of a battle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub state: BattleState,
    pub rewards: Rewards,
    pub turns: u32,
}

/// One character-versus-enemy encounter.
#[derive(Debug, Clone)]
pub struct Battle {
    enemy: Enemy,
    state: BattleState,
    turns: u32,
}

impl Battle {
    /// A battle that has not started yet.
    pub fn new(enemy: Enemy) -> Battle {
        Battle {
            enemy,
            state: BattleState::NotStarted,
            turns: 0,
        }
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Completed rounds (a player action followed by an enemy attack).
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Activate the battle.
    ///
    /// # Errors
    /// - `CharacterDead` if the character has no health left
    /// - `CombatNotActive` if the battle was already started
    pub fn start(&mut self, character: &Character) -> GameResult<()> {
        if character.is_dead() {
            return Err(GameError::CharacterDead(character.name.clone()));
        }
        if self.state != BattleState::NotStarted {
            return Err(GameError::CombatNotActive);
        }
        self.state = BattleState::Active;
        info!("{} engages {} ({} hp)", character.name, self.enemy.name, self.enemy.health);
        Ok(())
    }

    fn require_active(&self) -> GameResult<()> {
        if self.state.is_active() { Ok(()) } else { Err(GameError::CombatNotActive) }
    }

    /// Fight to the finish without player input.
    ///
    /// Each round the character hits for its full strength; if the enemy
    /// survives it hits back for its full strength. A round counts once the
    /// enemy has struck back.
    ///
    /// # Errors
    /// - `CombatNotActive` if the battle is not active
    pub fn resolve_auto(&mut self, character: &mut Character) -> GameResult<BattleOutcome> {
        self.require_active()?;
        if character.strength == 0 && self.enemy.strength == 0 {
            warn!("neither {} nor {} can deal damage; ending battle", character.name, self.enemy.name);
            self.state = BattleState::Escaped;
            return Ok(self.outcome());
        }
        loop {
            self.enemy.take_damage(character.strength);
            if self.enemy.is_defeated() {
                self.state = BattleState::PlayerWon;
                break;
            }
            character.take_damage(self.enemy.strength);
            self.turns += 1;
            debug!(
                "round {}: {} at {} hp, {} at {} hp",
                self.turns, character.name, character.health, self.enemy.name, self.enemy.health
            );
            if character.is_dead() {
                self.state = BattleState::EnemyWon;
                break;
            }
        }
        let outcome = self.outcome();
        info!("battle with {} ended {:?} after {} rounds", self.enemy.name, outcome.state, outcome.turns);
        Ok(outcome)
    }

    /// Carry out the player's chosen action.
    ///
    /// A basic attack hits for the character's strength. Fleeing succeeds
    /// half the time; on failure the battle stays active.
    ///
    /// # Errors
    /// - `CombatNotActive` if the battle is not active
    /// - `AbilityOnCooldown` if the ability was chosen while recharging
    pub fn player_turn<R: Rng + ?Sized>(
        &mut self,
        character: &mut Character,
        action: PlayerAction,
        rng: &mut R,
    ) -> GameResult<TurnReport> {
        self.require_active()?;
        let event = match action {
            PlayerAction::Attack => {
                let damage = character.strength;
                self.enemy.take_damage(damage);
                TurnEvent::Attack { damage }
            },
            PlayerAction::SpecialAbility => {
                TurnEvent::Ability(use_special_ability(character, &mut self.enemy, rng)?)
            },
            PlayerAction::Flee => {
                if attempt_escape(rng) {
                    self.state = BattleState::Escaped;
                    info!("{} escaped from {}", character.name, self.enemy.name);
                    TurnEvent::Escaped
                } else {
                    TurnEvent::EscapeFailed
                }
            },
        };
        if self.enemy.is_defeated() {
            self.state = BattleState::PlayerWon;
            info!("{} defeated {}", character.name, self.enemy.name);
        }
        Ok(TurnReport {
            event,
            state: self.state,
        })
    }

    /// The enemy strikes back using the mitigated damage formula.
    ///
    /// # Errors
    /// - `CombatNotActive` if the battle is not active
    /// - `CharacterDead` if this blow drops the character; the battle is lost
    pub fn enemy_turn(&mut self, character: &mut Character) -> GameResult<TurnReport> {
        self.require_active()?;
        let damage = calculate_damage(&self.enemy, character);
        character.take_damage(damage);
        self.turns += 1;
        if character.is_dead() {
            self.state = BattleState::EnemyWon;
            info!("{} was slain by {}", character.name, self.enemy.name);
            return Err(GameError::CharacterDead(character.name.clone()));
        }
        Ok(TurnReport {
            event: TurnEvent::EnemyAttack { damage },
            state: self.state,
        })
    }

    /// Result so far; rewards are non-zero only once the player has won.
    pub fn outcome(&self) -> BattleOutcome {
        let rewards = if self.state.is_player_won() {
            victory_rewards(Some(&self.enemy))
        } else {
            Rewards::default()
        };
        BattleOutcome {
            state: self.state,
            rewards,
            turns: self.turns,
        }
    }
}

/// Start a battle and resolve it automatically.
///
/// # Errors
/// - `CharacterDead` if the character is already dead
pub fn start_battle(character: &mut Character, enemy: Enemy) -> GameResult<BattleOutcome> {
    let mut battle = Battle::new(enemy);
    battle.start(character)?;
    battle.resolve_auto(character)
}

/// Experience and gold for defeating `enemy`; zero when there is none.
pub fn victory_rewards(enemy: Option<&Enemy>) -> Rewards {
    enemy.map_or_else(Rewards::default, |enemy| Rewards::new(enemy.xp_reward, enemy.gold_reward))
}

/// Credit battle rewards to the character. Returns whether they leveled up.
///
/// # Errors
/// - `CharacterDead` if the character is dead
pub fn award_victory(character: &mut Character, rewards: Rewards) -> GameResult<bool> {
    character.grant(rewards)
}

pub fn can_character_fight(character: &Character) -> bool {
    !character.is_dead()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use rand::RngCore;

    /// Deterministic coin: `heads()` makes every `random_bool(0.5)` true.
    pub(crate) struct FixedRng(u64);

    impl FixedRng {
        pub(crate) fn heads() -> FixedRng {
            FixedRng(0)
        }
        pub(crate) fn tails() -> FixedRng {
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

    fn warrior() -> Character {
        Character::new("Brom", CharacterClass::Warrior).unwrap()
    }

    #[test]
    fn auto_battle_against_goblin() {
        let mut hero = warrior();
        let outcome = start_battle(&mut hero, create_enemy("goblin").unwrap()).unwrap();
        assert_eq!(outcome.state, BattleState::PlayerWon);
        assert_eq!(outcome.rewards, Rewards::new(25, 10));
        assert_eq!(outcome.turns, 3);
        assert_eq!(hero.health, 96);
    }

    #[test]
    fn auto_battle_can_be_lost() {
        let mut hero = warrior();
        hero.health = 30;
        let outcome = start_battle(&mut hero, create_enemy("dragon").unwrap()).unwrap();
        assert_eq!(outcome.state, BattleState::EnemyWon);
        assert_eq!(outcome.rewards, Rewards::default());
        assert_eq!(hero.health, 0);
    }

    #[test]
    fn dead_characters_cannot_start() {
        let mut hero = warrior();
        hero.damage(hero.max_health);
        assert!(!can_character_fight(&hero));
        assert!(matches!(
            start_battle(&mut hero, create_enemy("orc").unwrap()),
            Err(GameError::CharacterDead(_))
        ));
    }

    #[test]
    fn damage_never_drops_below_one() {
        let hero = warrior();
        let mut dragon = create_enemy("dragon").unwrap();
        dragon.strength = 10_000;
        assert_eq!(calculate_damage(&hero, &dragon), 1);
        assert_eq!(calculate_damage(&dragon, &hero), 10_000 - 3);
    }

    #[test]
    fn turns_require_active_battle() {
        let mut hero = warrior();
        let mut battle = Battle::new(create_enemy("goblin").unwrap());
        assert!(matches!(
            battle.player_turn(&mut hero, PlayerAction::Attack, &mut FixedRng::heads()),
            Err(GameError::CombatNotActive)
        ));
        assert!(matches!(battle.enemy_turn(&mut hero), Err(GameError::CombatNotActive)));
    }

    #[test]
    fn interactive_battle_runs_to_victory() {
        let mut hero = warrior();
        let mut battle = Battle::new(create_enemy("goblin").unwrap());
        battle.start(&hero).unwrap();
        let mut rng = FixedRng::heads();
        for _ in 0..3 {
            let report = battle.player_turn(&mut hero, PlayerAction::Attack, &mut rng).unwrap();
            assert_eq!(report.event, TurnEvent::Attack { damage: 15 });
            let report = battle.enemy_turn(&mut hero).unwrap();
            // 8 - 15 / 4
            assert_eq!(report.event, TurnEvent::EnemyAttack { damage: 5 });
        }
        let report = battle.player_turn(&mut hero, PlayerAction::Attack, &mut rng).unwrap();
        assert_eq!(report.state, BattleState::PlayerWon);
        assert_eq!(hero.health, 105);
        assert_eq!(battle.outcome().rewards, Rewards::new(25, 10));
        assert!(matches!(battle.enemy_turn(&mut hero), Err(GameError::CombatNotActive)));
    }

    #[test]
    fn fleeing_follows_the_coin() {
        let mut hero = warrior();
        let mut battle = Battle::new(create_enemy("orc").unwrap());
        battle.start(&hero).unwrap();
        let failed = battle.player_turn(&mut hero, PlayerAction::Flee, &mut FixedRng::tails()).unwrap();
        assert_eq!((failed.event, failed.state), (TurnEvent::EscapeFailed, BattleState::Active));
        let fled = battle.player_turn(&mut hero, PlayerAction::Flee, &mut FixedRng::heads()).unwrap();
        assert_eq!((fled.event, fled.state), (TurnEvent::Escaped, BattleState::Escaped));
        assert_eq!(battle.outcome().rewards, Rewards::default());
    }

    #[test]
    fn lethal_enemy_turn_ends_battle() {
        let mut hero = warrior();
        hero.health = 5;
        let mut battle = Battle::new(create_enemy("orc").unwrap());
        battle.start(&hero).unwrap();
        assert!(matches!(battle.enemy_turn(&mut hero), Err(GameError::CharacterDead(_))));
        assert_eq!(battle.state(), BattleState::EnemyWon);
        assert_eq!(hero.health, 0);
    }

    #[test]
    fn victory_rewards_handle_missing_enemy() {
        assert_eq!(victory_rewards(None), Rewards::default());
        let orc = create_enemy("orc").unwrap();
        assert_eq!(victory_rewards(Some(&orc)), Rewards::new(50, 25));

        let mut hero = warrior();
        assert!(!award_victory(&mut hero, victory_rewards(Some(&orc))).unwrap());
        assert_eq!((hero.experience, hero.gold), (50, 125));
    }
}
