//! Class special abilities.
use std::cmp;
use std::fmt;

use log::debug;
use rand::Rng;

use super::{Combatant, Enemy, mitigated};
use crate::character::{Character, CharacterClass};
use crate::error::{GameError, GameResult};

/// Most health a single Heal can restore.
pub const HEAL_AMOUNT: u32 = 30;

/// Chance that a rogue's Critical Strike lands for triple damage.
pub const CRITICAL_CHANCE: f64 = 0.5;

/// The one special ability each class has.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpecialAbility {
    PowerStrike,
    Fireball,
    CriticalStrike,
    Heal,
}

impl SpecialAbility {
    pub fn for_class(class: CharacterClass) -> SpecialAbility {
        match class {
            CharacterClass::Warrior => SpecialAbility::PowerStrike,
            CharacterClass::Mage => SpecialAbility::Fireball,
            CharacterClass::Rogue => SpecialAbility::CriticalStrike,
            CharacterClass::Cleric => SpecialAbility::Heal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialAbility::PowerStrike => "Power Strike",
            SpecialAbility::Fireball => "Fireball",
            SpecialAbility::CriticalStrike => "Critical Strike",
            SpecialAbility::Heal => "Heal",
        }
    }
}
impl fmt::Display for SpecialAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a special ability did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AbilityOutcome {
    Damage {
        ability: SpecialAbility,
        amount: u32,
        critical: bool,
    },
    Heal {
        ability: SpecialAbility,
        amount: u32,
    },
}

/// Use the character's class ability against `enemy`.
///
/// Power Strike: `2 * strength` against a quarter of the enemy's strength.
/// Fireball: `2 * magic` against a quarter of the enemy's magic.
/// Critical Strike: a coin flip between `3 * strength` and `strength`.
/// Heal: restores up to 30 health to the character.
/// Damage is never below 1.
///
/// # Errors
/// - `AbilityOnCooldown` if the character's cooldown flag is set
pub fn use_special_ability<R: Rng + ?Sized>(
    character: &mut Character,
    enemy: &mut Enemy,
    rng: &mut R,
) -> GameResult<AbilityOutcome> {
    if character.ability_on_cooldown {
        return Err(GameError::AbilityOnCooldown(character.name.clone()));
    }
    let ability = SpecialAbility::for_class(character.class);
    let strength = character.strength;
    let (amount, critical) = match ability {
        SpecialAbility::PowerStrike => (mitigated(strength.saturating_mul(2), enemy.strength), false),
        SpecialAbility::Fireball => (mitigated(character.magic.saturating_mul(2), enemy.magic), false),
        SpecialAbility::CriticalStrike => {
            if rng.random_bool(CRITICAL_CHANCE) {
                (mitigated(strength.saturating_mul(3), enemy.strength), true)
            } else {
                (mitigated(strength, enemy.strength), false)
            }
        },
        SpecialAbility::Heal => {
            let amount = cmp::min(HEAL_AMOUNT, character.max_health - character.health);
            character.health += amount;
            debug!("{} cast {ability} for {amount} hp", character.name);
            return Ok(AbilityOutcome::Heal { ability, amount });
        },
    };
    enemy.take_damage(amount);
    debug!("{} used {ability} on {} for {amount}", character.name, enemy.name);
    Ok(AbilityOutcome::Damage {
        ability,
        amount,
        critical,
    })
}
