//! Equipment Module
//!
//! Weapon and armor slots. An equipped item's effect is applied to the
//! character while it sits in the slot and reversed when it leaves; the
//! effect is always read from the item catalog.
use std::fmt;
use std::str::FromStr;

use chronicle_data::{Effect, Id, ItemCatalog, ItemDef, ItemKind};
use log::info;

use crate::character::{Character, MAX_INVENTORY_SIZE};
use crate::error::{GameError, GameResult};
use crate::inventory::{ItemHolder, item_def};

/// An equipment attachment point holding at most one item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

impl EquipSlot {
    /// The item kind this slot accepts.
    pub fn accepts(self) -> ItemKind {
        match self {
            EquipSlot::Weapon => ItemKind::Weapon,
            EquipSlot::Armor => ItemKind::Armor,
        }
    }

    /// The slot an item kind goes into, if any.
    pub fn for_kind(kind: ItemKind) -> Option<EquipSlot> {
        match kind {
            ItemKind::Weapon => Some(EquipSlot::Weapon),
            ItemKind::Armor => Some(EquipSlot::Armor),
            ItemKind::Consumable => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
        }
    }
}
impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for EquipSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" => Ok(EquipSlot::Weapon),
            "armor" | "armour" => Ok(EquipSlot::Armor),
            other => Err(format!("'{other}' is not an equipment slot (weapon or armor)")),
        }
    }
}

impl Character {
    /// The item currently in `slot`.
    pub fn equipped(&self, slot: EquipSlot) -> Option<&Id> {
        match slot {
            EquipSlot::Weapon => self.equipped_weapon.as_ref(),
            EquipSlot::Armor => self.equipped_armor.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Id> {
        match slot {
            EquipSlot::Weapon => &mut self.equipped_weapon,
            EquipSlot::Armor => &mut self.equipped_armor,
        }
    }
}

/// Move an item from the inventory into `slot`, swapping out whatever was there.
///
/// Returns a summary of the unequip (if any) and the equip.
///
/// # Errors
/// - `ItemNotFound` if the item is not in the inventory
/// - `UnknownItem` if it (or the item being replaced) is missing from the catalog
/// - `InvalidItemType` if the item does not fit the slot
/// - `InventoryFull` if the replaced item has nowhere to go; nothing changes
pub fn equip(character: &mut Character, slot: EquipSlot, item_id: &str, items: &ItemCatalog) -> GameResult<String> {
    if !character.contains_item(item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let item = item_def(items, item_id)?;
    if item.kind != slot.accepts() {
        return Err(GameError::InvalidItemType {
            item_id: item_id.to_string(),
            expected: slot.accepts(),
            found: item.kind,
        });
    }

    let mut summary = String::new();
    match character.equipped(slot).cloned() {
        Some(current) if current == item_id => {
            return Ok(format!("{} is already equipped.", item.name));
        },
        Some(current) => {
            let old = item_def(items, &current)?;
            if character.space_remaining() == 0 {
                return Err(GameError::InventoryFull {
                    capacity: MAX_INVENTORY_SIZE,
                });
            }
            require_exact(character, item, &[old.effect.reversed(), item.effect])?;
            character.apply_effect(old.effect.reversed());
            character.add_item(&current)?;
            summary.push_str(&format!("Unequipped {}. ", old.name));
            info!("{} unequipped {slot} '{current}'", character.name);
        },
        None => require_exact(character, item, &[item.effect])?,
    }

    character.apply_effect(item.effect);
    *character.slot_mut(slot) = Some(item_id.to_string());
    character.remove_item(item_id)?;
    info!("{} equipped {slot} '{item_id}' ({})", character.name, item.effect);
    summary.push_str(&format!("Equipped {} ({}).", item.name, item.effect));
    Ok(summary)
}

pub fn equip_weapon(character: &mut Character, item_id: &str, items: &ItemCatalog) -> GameResult<String> {
    equip(character, EquipSlot::Weapon, item_id, items)
}

pub fn equip_armor(character: &mut Character, item_id: &str, items: &ItemCatalog) -> GameResult<String> {
    equip(character, EquipSlot::Armor, item_id, items)
}

/// Equip an item into whichever slot its kind belongs to.
///
/// # Errors
/// - as [`equip`]; consumables are `InvalidItemType`
pub fn equip_item(character: &mut Character, item_id: &str, items: &ItemCatalog) -> GameResult<String> {
    if !character.contains_item(item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let kind = item_def(items, item_id)?.kind;
    let slot = EquipSlot::for_kind(kind).ok_or_else(|| GameError::InvalidItemType {
        item_id: item_id.to_string(),
        expected: ItemKind::Weapon,
        found: kind,
    })?;
    equip(character, slot, item_id, items)
}

/// Empty `slot`, reversing the item's effect and returning it to the inventory.
///
/// Returns the id of the removed item, or `None` if the slot was empty.
///
/// # Errors
/// - `InventoryFull` if there is no room for the item
/// - `UnknownItem` if the equipped item is missing from the catalog
pub fn unequip(character: &mut Character, slot: EquipSlot, items: &ItemCatalog) -> GameResult<Option<Id>> {
    let Some(current) = character.equipped(slot).cloned() else {
        return Ok(None);
    };
    if character.space_remaining() == 0 {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }
    let item = item_def(items, &current)?;
    require_exact(character, item, &[item.effect.reversed()])?;
    character.apply_effect(item.effect.reversed());
    character.add_item(&current)?;
    *character.slot_mut(slot) = None;
    info!("{} unequipped {slot} '{current}'", character.name);
    Ok(Some(current))
}

/// Refuse effects that would clamp a stat, since clamped bonuses cannot be
/// taken back off exactly.
fn require_exact(character: &Character, item: &ItemDef, effects: &[Effect]) -> GameResult<()> {
    if character.fits_without_clamping(effects) {
        return Ok(());
    }
    Err(GameError::EffectOutOfRange {
        item_id: item.id.clone(),
        effect: item.effect,
    })
}

pub fn unequip_weapon(character: &mut Character, items: &ItemCatalog) -> GameResult<Option<Id>> {
    unequip(character, EquipSlot::Weapon, items)
}

pub fn unequip_armor(character: &mut Character, items: &ItemCatalog) -> GameResult<Option<Id>> {
    unequip(character, EquipSlot::Armor, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use chronicle_data::Stat;

    fn item(id: &str, kind: ItemKind, effect: Effect) -> ItemDef {
        ItemDef {
            id: id.into(),
            name: id.to_uppercase(),
            kind,
            effect,
            cost: 40,
            description: String::new(),
        }
    }

    fn items() -> ItemCatalog {
        [
            item("sword", ItemKind::Weapon, Effect::new(Stat::Strength, 5)),
            item("axe", ItemKind::Weapon, Effect::new(Stat::Strength, 8)),
            item("mail", ItemKind::Armor, Effect::new(Stat::MaxHealth, 20)),
            item("potion", ItemKind::Consumable, Effect::new(Stat::Health, 10)),
            item("cursed_blade", ItemKind::Weapon, Effect::new(Stat::Strength, -20)),
            item("dull_blade", ItemKind::Weapon, Effect::new(Stat::Strength, -4)),
        ]
        .into_iter()
        .map(|i| (i.id.clone(), i))
        .collect()
    }

    fn hero() -> Character {
        Character::new("Edda", CharacterClass::Warrior).unwrap()
    }

    #[test]
    fn equip_then_unequip_restores_stats() {
        let mut hero = hero();
        hero.add_item("sword").unwrap();
        equip_weapon(&mut hero, "sword", &items()).unwrap();
        assert_eq!(hero.strength, 20);
        assert_eq!(hero.equipped_weapon.as_deref(), Some("sword"));
        assert!(!hero.contains_item("sword"));

        assert_eq!(unequip_weapon(&mut hero, &items()).unwrap().as_deref(), Some("sword"));
        assert_eq!(hero.strength, 15);
        assert_eq!(hero.inventory, ["sword"]);
        assert!(hero.equipped_weapon.is_none());
        assert_eq!(unequip_weapon(&mut hero, &items()).unwrap(), None);
    }

    #[test]
    fn swapping_returns_old_item_and_adjusts_bonus() {
        let mut hero = hero();
        hero.add_item("sword").unwrap();
        hero.add_item("axe").unwrap();
        equip_weapon(&mut hero, "sword", &items()).unwrap();
        let summary = equip_weapon(&mut hero, "axe", &items()).unwrap();
        assert_eq!(summary, "Unequipped SWORD. Equipped AXE (strength:8).");
        assert_eq!(hero.strength, 23);
        assert_eq!(hero.inventory, ["sword"]);
    }

    #[test]
    fn swap_with_full_inventory_changes_nothing() {
        let mut hero = hero();
        hero.add_item("sword").unwrap();
        equip_weapon(&mut hero, "sword", &items()).unwrap();
        hero.add_item("axe").unwrap();
        while hero.space_remaining() > 0 {
            hero.add_item("potion").unwrap();
        }
        let before = hero.clone();
        assert!(matches!(equip_weapon(&mut hero, "axe", &items()), Err(GameError::InventoryFull { .. })));
        assert_eq!(hero, before);
        assert!(matches!(unequip_weapon(&mut hero, &items()), Err(GameError::InventoryFull { .. })));
    }

    #[test]
    fn slot_and_type_must_match() {
        let mut hero = hero();
        assert!(matches!(equip_weapon(&mut hero, "sword", &items()), Err(GameError::ItemNotFound(_))));
        hero.add_item("mail").unwrap();
        assert!(matches!(
            equip_weapon(&mut hero, "mail", &items()),
            Err(GameError::InvalidItemType { expected: ItemKind::Weapon, found: ItemKind::Armor, .. })
        ));
        equip_item(&mut hero, "mail", &items()).unwrap();
        assert_eq!((hero.health, hero.max_health), (120, 140));

        hero.add_item("potion").unwrap();
        assert!(matches!(equip_item(&mut hero, "potion", &items()), Err(GameError::InvalidItemType { .. })));
    }

    #[test]
    fn equipping_the_same_item_again_is_a_no_op() {
        let mut hero = hero();
        hero.add_item("sword").unwrap();
        hero.add_item("sword").unwrap();
        equip_weapon(&mut hero, "sword", &items()).unwrap();
        let summary = equip_weapon(&mut hero, "sword", &items()).unwrap();
        assert_eq!(summary, "SWORD is already equipped.");
        assert_eq!((hero.strength, hero.count_item("sword")), (20, 1));
    }

    #[test]
    fn penalty_beyond_the_stat_floor_is_refused() {
        let mut hero = hero();
        hero.add_item("cursed_blade").unwrap();
        let before = hero.clone();
        let err = equip_weapon(&mut hero, "cursed_blade", &items()).unwrap_err();
        assert!(matches!(err, GameError::EffectOutOfRange { ref item_id, .. } if item_id == "cursed_blade"));
        assert_eq!(hero, before);
        assert_eq!(hero.strength, 15);
    }

    #[test]
    fn negative_bonus_round_trip_is_exact() {
        let mut hero = hero();
        hero.add_item("dull_blade").unwrap();
        equip_weapon(&mut hero, "dull_blade", &items()).unwrap();
        assert_eq!(hero.strength, 11);
        unequip_weapon(&mut hero, &items()).unwrap();
        assert_eq!(hero.strength, 15);

        // swapping from a bonus to a penalty checks the combined change
        hero.add_item("sword").unwrap();
        hero.add_item("cursed_blade").unwrap();
        equip_weapon(&mut hero, "sword", &items()).unwrap();
        assert!(matches!(
            equip_weapon(&mut hero, "cursed_blade", &items()),
            Err(GameError::EffectOutOfRange { .. })
        ));
        assert_eq!((hero.strength, hero.equipped_weapon.as_deref()), (20, Some("sword")));
    }
}
