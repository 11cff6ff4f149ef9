use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EffectError;

/// Stable identifier used for quests and items.
pub type Id = String;

/// Quest catalog keyed by quest id.
pub type QuestCatalog = BTreeMap<Id, QuestDef>;

/// Item catalog keyed by item id.
pub type ItemCatalog = BTreeMap<Id, ItemDef>;

/// Both catalogs, as handed to the engine after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub quests: QuestCatalog,
    pub items: ItemCatalog,
}

/// Sentinel written in data files for a quest without a prerequisite.
pub const NO_PREREQUISITE: &str = "NONE";

/// A quest as loaded from the catalog. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    pub reward_gold: u32,
    pub required_level: u32,
    #[serde(default)]
    pub prerequisite: Prerequisite,
}

/// Single-parent link to the quest that must be completed first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prerequisite {
    #[default]
    None,
    Quest(Id),
}
impl Prerequisite {
    /// Parse the data-file form: `NONE` or a quest id.
    pub fn parse(raw: &str) -> Prerequisite {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == NO_PREREQUISITE {
            Prerequisite::None
        } else {
            Prerequisite::Quest(trimmed.to_string())
        }
    }

    /// The required quest id, if any.
    pub fn quest_id(&self) -> Option<&str> {
        match self {
            Prerequisite::None => None,
            Prerequisite::Quest(id) => Some(id.as_str()),
        }
    }
}
impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::None => f.write_str(NO_PREREQUISITE),
            Prerequisite::Quest(id) => f.write_str(id),
        }
    }
}

/// What slot (if any) an item occupies, or whether it is used up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
}
impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Consumable => "consumable",
        }
    }
}
impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" => Ok(ItemKind::Weapon),
            "armor" => Ok(ItemKind::Armor),
            "consumable" => Ok(ItemKind::Consumable),
            other => Err(other.to_string()),
        }
    }
}

/// The character stats an item effect is allowed to modify.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}
impl Stat {
    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        }
    }
}
impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for Stat {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "health" => Ok(Stat::Health),
            "max_health" => Ok(Stat::MaxHealth),
            "strength" => Ok(Stat::Strength),
            "magic" => Ok(Stat::Magic),
            other => Err(EffectError::UnknownStat(other.to_string())),
        }
    }
}

/// A stat modification, written `stat:value` in data files (e.g. `strength:5`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub stat: Stat,
    pub value: i32,
}
impl Effect {
    pub fn new(stat: Stat, value: i32) -> Effect {
        Effect { stat, value }
    }

    /// The effect that undoes this one.
    pub fn reversed(self) -> Effect {
        Effect {
            stat: self.stat,
            value: self.value.saturating_neg(),
        }
    }
}
impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat, self.value)
    }
}
impl FromStr for Effect {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stat, value) = s
            .split_once(':')
            .ok_or_else(|| EffectError::MissingSeparator(s.to_string()))?;
        let value = value
            .trim()
            .parse::<i32>()
            .map_err(|_| EffectError::InvalidValue(value.trim().to_string()))?;
        Ok(Effect {
            stat: stat.parse()?,
            value,
        })
    }
}

/// An item as loaded from the catalog. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub name: String,
    pub kind: ItemKind,
    pub effect: Effect,
    pub cost: u32,
    pub description: String,
}
impl ItemDef {
    /// Gold received when the item is sold back (half the cost, rounded down).
    pub fn sell_price(&self) -> u32 {
        self.cost / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_parses_stat_and_signed_value() {
        let effect: Effect = "strength:5".parse().unwrap();
        assert_eq!(effect, Effect::new(Stat::Strength, 5));

        let effect: Effect = "max_health: -10".parse().unwrap();
        assert_eq!(effect, Effect::new(Stat::MaxHealth, -10));
        assert_eq!(effect.to_string(), "max_health:-10");
    }

    #[test]
    fn effect_rejects_malformed_strings() {
        assert!(matches!("strength5".parse::<Effect>(), Err(EffectError::MissingSeparator(_))));
        assert!(matches!("strength:five".parse::<Effect>(), Err(EffectError::InvalidValue(_))));
        assert!(matches!("luck:3".parse::<Effect>(), Err(EffectError::UnknownStat(s)) if s == "luck"));
    }

    #[test]
    fn prerequisite_sentinel_round_trips() {
        assert_eq!(Prerequisite::parse("NONE"), Prerequisite::None);
        assert_eq!(Prerequisite::parse(" first_steps "), Prerequisite::Quest("first_steps".into()));
        assert_eq!(Prerequisite::None.to_string(), "NONE");
    }

    #[test]
    fn sell_price_rounds_down() {
        let item = ItemDef {
            id: "dagger".into(),
            name: "Dagger".into(),
            kind: ItemKind::Weapon,
            effect: Effect::new(Stat::Strength, 2),
            cost: 25,
            description: String::new(),
        };
        assert_eq!(item.sell_price(), 12);
    }
}
