//! Stats Module
//!
//! Leveling, gold, healing, damage and death for a [`Character`]. These are
//! the primitives the quest, inventory and combat engines mutate stats through.
use std::cmp;

use chronicle_data::{Effect, Stat};
use log::info;

use crate::character::Character;
use crate::error::{GameError, GameResult};

/// Stat increases applied on every level-up.
pub const LEVEL_UP_MAX_HEALTH: u32 = 10;
pub const LEVEL_UP_STRENGTH: u32 = 2;
pub const LEVEL_UP_MAGIC: u32 = 2;

/// Experience needed to advance from `level` to the next one.
pub fn xp_to_next_level(level: u32) -> u32 {
    level.saturating_mul(100)
}

/// Experience and gold granted for completing a quest or winning a battle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Rewards {
    pub xp: u32,
    pub gold: u32,
}

impl Rewards {
    pub fn new(xp: u32, gold: u32) -> Rewards {
        Rewards { xp, gold }
    }
}

/// Whether a character can still act.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dead,
}

impl Character {
    /// Return whether this character is alive or dead.
    pub fn life_state(&self) -> LifeState {
        if self.health > 0 { LifeState::Alive } else { LifeState::Dead }
    }

    /// True iff health has reached zero.
    pub fn is_dead(&self) -> bool {
        self.life_state() == LifeState::Dead
    }

    /// Add experience and apply every level-up it pays for.
    ///
    /// Each level-up costs `level * 100` experience and grants +10 max health,
    /// +2 strength, +2 magic, and a full heal. Returns whether at least one
    /// level-up occurred.
    ///
    /// # Errors
    /// - `CharacterDead` if health is zero
    pub fn gain_experience(&mut self, amount: u32) -> GameResult<bool> {
        if self.is_dead() {
            return Err(GameError::CharacterDead(self.name.clone()));
        }
        self.experience = self.experience.saturating_add(amount);
        let mut leveled_up = false;
        while self.experience >= xp_to_next_level(self.level) {
            self.experience -= xp_to_next_level(self.level);
            self.level += 1;
            self.max_health = self.max_health.saturating_add(LEVEL_UP_MAX_HEALTH);
            self.strength = self.strength.saturating_add(LEVEL_UP_STRENGTH);
            self.magic = self.magic.saturating_add(LEVEL_UP_MAGIC);
            self.health = self.max_health;
            leveled_up = true;
            info!("{} reached level {}", self.name, self.level);
        }
        Ok(leveled_up)
    }

    /// Grant rewards through the leveling rule, then credit the gold.
    /// Returns whether the experience caused a level-up.
    ///
    /// # Errors
    /// - `CharacterDead` if health is zero; nothing is granted
    pub fn grant(&mut self, rewards: Rewards) -> GameResult<bool> {
        let leveled_up = self.gain_experience(rewards.xp)?;
        self.add_gold(i64::from(rewards.gold))?;
        Ok(leveled_up)
    }

    /// Add (or, with a negative amount, spend) gold. Returns the new total.
    ///
    /// # Errors
    /// - `InvalidAmount` if the purse would go negative; gold is left unchanged
    pub fn add_gold(&mut self, amount: i64) -> GameResult<u32> {
        let total = i64::from(self.gold) + amount;
        let new_gold = u32::try_from(total).map_err(|_| {
            GameError::InvalidAmount(format!("{amount} gold would leave {} with {total}", self.name))
        })?;
        self.gold = new_gold;
        Ok(new_gold)
    }

    /// Heal up to `amount`, saturating at max health. Returns the amount actually healed.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is negative
    pub fn heal(&mut self, amount: i64) -> GameResult<u32> {
        if amount < 0 {
            return Err(GameError::InvalidAmount(format!("cannot heal by {amount}")));
        }
        let amount = u32::try_from(amount).unwrap_or(u32::MAX);
        let healed = cmp::min(amount, self.max_health - self.health);
        self.health += healed;
        Ok(healed)
    }

    /// Do damage to health. Saturates at zero.
    pub fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Bring a dead character back at half max health (at least 1).
    /// Returns false, changing nothing, if the character is alive.
    pub fn revive(&mut self) -> bool {
        if !self.is_dead() {
            return false;
        }
        self.health = cmp::max(1, self.max_health / 2);
        info!("{} revived with {} hp", self.name, self.health);
        true
    }

    /// Apply a stat modification.
    ///
    /// Health stays within `0..=max_health`; max health never drops below 1,
    /// and lowering it pulls health down with it.
    pub fn apply_effect(&mut self, effect: Effect) {
        let Effect { stat, value } = effect;
        match stat {
            Stat::Health => {
                self.health = cmp::min(self.health.saturating_add_signed(value), self.max_health);
            },
            Stat::MaxHealth => {
                self.max_health = cmp::max(1, self.max_health.saturating_add_signed(value));
                self.health = cmp::min(self.health, self.max_health);
            },
            Stat::Strength => self.strength = self.strength.saturating_add_signed(value),
            Stat::Magic => self.magic = self.magic.saturating_add_signed(value),
        }
    }

    /// True if `effects`, applied in order, keep strength and magic at or
    /// above 0 and max health at or above 1. Effects that pass can be
    /// reversed exactly later. Health is left to the usual clamping.
    pub fn fits_without_clamping(&self, effects: &[Effect]) -> bool {
        let mut max_health = i64::from(self.max_health);
        let mut strength = i64::from(self.strength);
        let mut magic = i64::from(self.magic);
        for effect in effects {
            let (stat, floor) = match effect.stat {
                Stat::Health => continue,
                Stat::MaxHealth => (&mut max_health, 1),
                Stat::Strength => (&mut strength, 0),
                Stat::Magic => (&mut magic, 0),
            };
            *stat += i64::from(effect.value);
            if *stat < floor || *stat > i64::from(u32::MAX) {
                return false;
            }
        }
        true
    }

    /// Current value of a stat.
    pub fn stat(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Health => self.health,
            Stat::MaxHealth => self.max_health,
            Stat::Strength => self.strength,
            Stat::Magic => self.magic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn warrior() -> Character {
        Character::new("Brom", CharacterClass::Warrior).unwrap()
    }

    #[test]
    fn single_grant_equals_split_grants() {
        let mut once = warrior();
        assert!(once.gain_experience(250).unwrap());

        let mut split = warrior();
        split.gain_experience(100).unwrap();
        split.gain_experience(100).unwrap();
        split.gain_experience(50).unwrap();

        assert_eq!(once, split);
        // 250 -> level 2 (-100) -> 150 short of 200
        assert_eq!((once.level, once.experience), (2, 150));
        assert_eq!((once.max_health, once.strength, once.magic), (130, 17, 7));
        assert_eq!(once.health, 130);
    }

    #[test]
    fn large_grant_applies_every_level_up() {
        let mut hero = warrior();
        hero.damage(50);
        // 100 + 200 + 300 = 600 buys three levels
        assert!(hero.gain_experience(650).unwrap());
        assert_eq!((hero.level, hero.experience), (4, 50));
        assert_eq!(hero.max_health, 150);
        assert_eq!(hero.health, hero.max_health);
    }

    #[test]
    fn dead_characters_cannot_gain_experience() {
        let mut hero = warrior();
        hero.damage(500);
        assert!(matches!(hero.gain_experience(10), Err(GameError::CharacterDead(_))));
        assert_eq!(hero.experience, 0);
    }

    #[test]
    fn gold_never_goes_negative() {
        let mut hero = warrior();
        assert_eq!(hero.add_gold(-40).unwrap(), 60);
        assert!(matches!(hero.add_gold(-61), Err(GameError::InvalidAmount(_))));
        assert_eq!(hero.gold, 60);
        assert_eq!(hero.add_gold(15).unwrap(), 75);
    }

    #[test]
    fn heal_saturates_at_max_health() {
        let mut hero = warrior();
        hero.damage(30);
        assert_eq!(hero.heal(20).unwrap(), 20);
        assert_eq!(hero.heal(50).unwrap(), 10);
        assert_eq!(hero.health, hero.max_health);
        assert!(matches!(hero.heal(-1), Err(GameError::InvalidAmount(_))));
    }

    #[test]
    fn revive_only_affects_the_dead() {
        let mut hero = warrior();
        assert!(!hero.revive());
        hero.damage(hero.max_health);
        assert!(hero.is_dead());
        assert!(hero.revive());
        assert_eq!(hero.health, 60);

        let mut frail = warrior();
        frail.max_health = 1;
        frail.health = 0;
        assert!(frail.revive());
        assert_eq!(frail.health, 1);
    }

    #[test]
    fn effects_respect_health_bounds() {
        let mut hero = warrior();
        hero.damage(10);
        hero.apply_effect(Effect::new(Stat::Health, 50));
        assert_eq!(hero.health, 120);

        hero.apply_effect(Effect::new(Stat::MaxHealth, -30));
        assert_eq!((hero.health, hero.max_health), (90, 90));

        hero.apply_effect(Effect::new(Stat::MaxHealth, -500));
        assert_eq!((hero.health, hero.max_health), (1, 1));

        hero.apply_effect(Effect::new(Stat::Strength, -100));
        assert_eq!(hero.strength, 0);
    }

    #[test]
    fn clamping_effects_are_detected_before_applying() {
        let hero = warrior();
        assert!(hero.fits_without_clamping(&[Effect::new(Stat::Strength, -15)]));
        assert!(!hero.fits_without_clamping(&[Effect::new(Stat::Strength, -20)]));
        assert!(!hero.fits_without_clamping(&[Effect::new(Stat::MaxHealth, -120)]));
        assert!(hero.fits_without_clamping(&[Effect::new(Stat::Health, -500)]));
        // removing a +5 bonus first leaves room for only -10 more
        assert!(!hero.fits_without_clamping(&[Effect::new(Stat::Strength, -5), Effect::new(Stat::Strength, -11)]));
    }
}
