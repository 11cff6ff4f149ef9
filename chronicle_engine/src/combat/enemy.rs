//! Enemy templates and construction.
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// The fixed catalog of enemy types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon];

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Goblin => "goblin",
            EnemyKind::Orc => "orc",
            EnemyKind::Dragon => "dragon",
        }
    }

    /// A fresh enemy of this kind at full health.
    pub fn spawn(self) -> Enemy {
        // (display name, health, strength, magic, xp, gold)
        let (name, health, strength, magic, xp_reward, gold_reward) = match self {
            EnemyKind::Goblin => ("Goblin", 50, 8, 2, 25, 10),
            EnemyKind::Orc => ("Orc", 80, 12, 5, 50, 25),
            EnemyKind::Dragon => ("Dragon", 200, 25, 15, 200, 100),
        };
        Enemy {
            kind: self,
            name: name.to_string(),
            health,
            max_health: health,
            strength,
            magic,
            xp_reward,
            gold_reward,
        }
    }
}
impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidTarget(s.trim().to_string()))
    }
}

/// An opponent for one encounter. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

/// Create an enemy by type name (case-insensitive).
///
/// # Errors
/// - `InvalidTarget` if the name is not goblin, orc, or dragon
pub fn create_enemy(kind: &str) -> Result<Enemy, GameError> {
    kind.parse::<EnemyKind>().map(EnemyKind::spawn)
}

/// The enemy a character of `level` meets while exploring.
pub fn enemy_for_level(level: u32) -> Enemy {
    match level {
        0..=2 => EnemyKind::Goblin,
        3..=5 => EnemyKind::Orc,
        _ => EnemyKind::Dragon,
    }
    .spawn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_match_catalog() {
        let goblin = create_enemy("goblin").unwrap();
        assert_eq!(
            (goblin.health, goblin.max_health, goblin.strength, goblin.magic),
            (50, 50, 8, 2)
        );
        assert_eq!((goblin.xp_reward, goblin.gold_reward), (25, 10));

        let dragon = create_enemy("DRAGON").unwrap();
        assert_eq!((dragon.health, dragon.strength, dragon.xp_reward), (200, 25, 200));
    }

    #[test]
    fn unknown_enemy_is_invalid_target() {
        assert!(matches!(create_enemy("kraken"), Err(GameError::InvalidTarget(name)) if name == "kraken"));
    }

    #[test]
    fn level_picks_enemy_tier() {
        assert_eq!(enemy_for_level(1).kind, EnemyKind::Goblin);
        assert_eq!(enemy_for_level(2).kind, EnemyKind::Goblin);
        assert_eq!(enemy_for_level(3).kind, EnemyKind::Orc);
        assert_eq!(enemy_for_level(5).kind, EnemyKind::Orc);
        assert_eq!(enemy_for_level(6).kind, EnemyKind::Dragon);
    }
}
