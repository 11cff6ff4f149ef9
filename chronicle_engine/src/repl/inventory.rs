//! `repl::inventory` module
//!
//! Handlers for the inventory, equipment, and the shop.

use chronicle_data::ItemCatalog;

use super::{GameSession, autosave, refuse_in_battle, report_error, require_character};
use crate::character::{Character, MAX_INVENTORY_SIZE};
use crate::equipment::{EquipSlot, equip_item, unequip};
use crate::inventory::{drop_item, use_item};
use crate::shop::{purchase_item, sell_item, shop_listing};
use crate::view::{InventoryLine, ShopLine, View, ViewItem};

/// Stack identical items, in the order they were first picked up.
pub fn inventory_lines(character: &Character, items: &ItemCatalog) -> Vec<InventoryLine> {
    let mut lines: Vec<InventoryLine> = Vec::new();
    for item_id in &character.inventory {
        if let Some(line) = lines.iter_mut().find(|line| &line.item_id == item_id) {
            line.count += 1;
            continue;
        }
        let line = match items.get(item_id) {
            Some(item) => InventoryLine {
                item_id: item_id.clone(),
                name: item.name.clone(),
                kind: item.kind.to_string(),
                effect: item.effect.to_string(),
                count: 1,
            },
            None => InventoryLine {
                item_id: item_id.clone(),
                name: item_id.clone(),
                kind: "unknown".to_string(),
                effect: String::new(),
                count: 1,
            },
        };
        lines.push(line);
    }
    lines
}

pub fn inventory_handler(session: &mut GameSession, view: &mut View) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    view.push(ViewItem::Inventory {
        lines: inventory_lines(character, &session.data.catalog.items),
        used: character.inventory.len(),
        capacity: MAX_INVENTORY_SIZE,
    });
}

/// Use a consumable. Allowed mid-battle; it does not cost a turn.
pub fn use_handler(session: &mut GameSession, view: &mut View, item_id: &str) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    if character.is_dead() {
        view.push(ViewItem::ActionFailure(format!("{} is in no state to do that.", character.name)));
        return;
    }
    match use_item(character, item_id, &session.data.catalog.items) {
        Ok(summary) => view.push(ViewItem::ActionSuccess(summary)),
        Err(err) => report_error(view, &err),
    }
}

pub fn equip_handler(session: &mut GameSession, view: &mut View, item_id: &str) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    match equip_item(character, item_id, &session.data.catalog.items) {
        Ok(summary) => view.push(ViewItem::ActionSuccess(summary)),
        Err(err) => report_error(view, &err),
    }
}

pub fn unequip_handler(session: &mut GameSession, view: &mut View, slot: EquipSlot) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    match unequip(character, slot, &session.data.catalog.items) {
        Ok(Some(item_id)) => {
            let name = session
                .data
                .catalog
                .items
                .get(&item_id)
                .map_or(item_id.as_str(), |item| item.name.as_str());
            view.push(ViewItem::ActionSuccess(format!("Unequipped {name}.")));
        },
        Ok(None) => view.push(ViewItem::ActionFailure(format!("Nothing is equipped as your {slot}."))),
        Err(err) => report_error(view, &err),
    }
}

pub fn drop_handler(session: &mut GameSession, view: &mut View, item_id: &str) {
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    match drop_item(character, item_id) {
        Ok(()) => view.push(ViewItem::ActionSuccess(format!("Dropped {item_id}."))),
        Err(err) => report_error(view, &err),
    }
}

/// Show the shop's stock, marking what the character can afford.
pub fn shop_handler(session: &GameSession, view: &mut View) {
    let gold = session.character.as_ref().map(|character| character.gold);
    let lines = shop_listing(&session.data.catalog.items)
        .into_iter()
        .map(|item| ShopLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            kind: item.kind.to_string(),
            effect: item.effect.to_string(),
            cost: item.cost,
            affordable: gold.is_some_and(|gold| gold >= item.cost),
        })
        .collect();
    view.push(ViewItem::ShopListing { gold, lines });
}

pub fn buy_handler(session: &mut GameSession, view: &mut View, item_id: &str) {
    if refuse_in_battle(session, view, "go shopping") {
        return;
    }
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    match purchase_item(character, item_id, &session.data.catalog.items) {
        Ok(remaining) => {
            let name = session
                .data
                .catalog
                .items
                .get(item_id)
                .map_or(item_id, |item| item.name.as_str());
            view.push(ViewItem::ActionSuccess(format!(
                "Bought {name}. You have {remaining} gold left."
            )));
            autosave(session, view);
        },
        Err(err) => report_error(view, &err),
    }
}

pub fn sell_handler(session: &mut GameSession, view: &mut View, item_id: &str) {
    if refuse_in_battle(session, view, "go shopping") {
        return;
    }
    let Some(character) = require_character(&mut session.character, view) else {
        return;
    };
    match sell_item(character, item_id, &session.data.catalog.items) {
        Ok(price) => {
            view.push(ViewItem::ActionSuccess(format!(
                "Sold {item_id} for {price} gold. You have {} gold.",
                character.gold
            )));
            autosave(session, view);
        },
        Err(err) => report_error(view, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::inventory::ItemHolder;
    use crate::repl::tests::session_with;
    use tempfile::tempdir;

    #[test]
    fn inventory_stacks_duplicates_in_pickup_order() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Rogue);
        let character = session.character.as_mut().unwrap();
        for id in ["health_potion", "iron_sword", "health_potion", "mystery_box"] {
            character.add_item(id).unwrap();
        }
        let lines = inventory_lines(character, &session.data.catalog.items);
        let summary: Vec<(&str, usize)> = lines.iter().map(|line| (line.item_id.as_str(), line.count)).collect();
        assert_eq!(summary, [("health_potion", 2), ("iron_sword", 1), ("mystery_box", 1)]);
        assert_eq!(lines[2].kind, "unknown");
    }

    #[test]
    fn buying_then_equipping_a_sword() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Warrior);
        let mut view = View::new();
        buy_handler(&mut session, &mut view, "iron_sword");
        equip_handler(&mut session, &mut view, "iron_sword");
        let character = session.character.as_ref().unwrap();
        assert_eq!(character.gold, 0);
        assert_eq!(character.strength, 20);
        assert_eq!(character.equipped_weapon.as_deref(), Some("iron_sword"));
        assert!(view.items.iter().all(ViewItem::is_action_success));
    }

    #[test]
    fn unaffordable_purchase_is_refused() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Mage);
        let mut view = View::new();
        buy_handler(&mut session, &mut view, "war_axe");
        assert!(view.items[0].is_action_failure());
        assert_eq!(session.character.as_ref().unwrap().gold, 100);
    }

    #[test]
    fn shop_marks_affordable_items() {
        let dir = tempdir().unwrap();
        let session = session_with(&dir, CharacterClass::Mage);
        let mut view = View::new();
        shop_handler(&session, &mut view);
        let ViewItem::ShopListing { gold, lines } = &view.items[0] else {
            panic!("expected a shop listing");
        };
        assert_eq!(*gold, Some(100));
        assert!(lines.windows(2).all(|pair| pair[0].cost <= pair[1].cost));
        assert!(lines.iter().find(|line| line.item_id == "war_axe").is_some_and(|line| !line.affordable));
        assert!(lines.iter().find(|line| line.item_id == "health_potion").is_some_and(|line| line.affordable));
    }

    #[test]
    fn unequip_with_empty_slot_is_refused() {
        let dir = tempdir().unwrap();
        let mut session = session_with(&dir, CharacterClass::Cleric);
        let mut view = View::new();
        unequip_handler(&mut session, &mut view, EquipSlot::Armor);
        assert!(view.items[0].is_action_failure());
    }
}
