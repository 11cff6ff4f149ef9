//! Shop Module
//!
//! Buying items from the catalog and selling them back at half price.
use chronicle_data::{ItemCatalog, ItemDef};
use log::info;

use crate::character::{Character, MAX_INVENTORY_SIZE};
use crate::error::{GameError, GameResult};
use crate::inventory::{ItemHolder, item_def};

/// Everything for sale, cheapest first (ties broken by id).
pub fn shop_listing(items: &ItemCatalog) -> Vec<&ItemDef> {
    let mut listing: Vec<&ItemDef> = items.values().collect();
    listing.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.id.cmp(&b.id)));
    listing
}

/// Buy one copy of an item. Returns the character's remaining gold.
///
/// # Errors
/// - `UnknownItem` if the catalog has no such item
/// - `InsufficientResources` if the character cannot afford it
/// - `InventoryFull` if there is no room for it
pub fn purchase_item(character: &mut Character, item_id: &str, items: &ItemCatalog) -> GameResult<u32> {
    let item = item_def(items, item_id)?;
    if character.gold < item.cost {
        return Err(GameError::InsufficientResources {
            needed: item.cost,
            available: character.gold,
        });
    }
    if character.space_remaining() == 0 {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }
    let remaining = character.add_gold(-i64::from(item.cost))?;
    character.add_item(item_id)?;
    info!("{} bought '{item_id}' for {} gold", character.name, item.cost);
    Ok(remaining)
}

/// Sell one copy of a held item for half its cost. Returns the gold received.
///
/// # Errors
/// - `ItemNotFound` if the item is not held
/// - `UnknownItem` if the catalog has no such item
pub fn sell_item(character: &mut Character, item_id: &str, items: &ItemCatalog) -> GameResult<u32> {
    if !character.contains_item(item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let price = item_def(items, item_id)?.sell_price();
    character.remove_item(item_id)?;
    character.add_gold(i64::from(price))?;
    info!("{} sold '{item_id}' for {price} gold", character.name);
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use chronicle_data::{Effect, ItemKind, Stat};

    fn items() -> ItemCatalog {
        [("plate", 150), ("dagger", 25), ("potion", 15)]
            .into_iter()
            .map(|(id, cost)| {
                let item = ItemDef {
                    id: id.into(),
                    name: id.into(),
                    kind: ItemKind::Weapon,
                    effect: Effect::new(Stat::Strength, 1),
                    cost,
                    description: String::new(),
                };
                (item.id.clone(), item)
            })
            .collect()
    }

    fn hero() -> Character {
        Character::new("Pell", CharacterClass::Mage).unwrap()
    }

    #[test]
    fn cannot_buy_what_you_cannot_afford() {
        let mut hero = hero();
        assert!(matches!(
            purchase_item(&mut hero, "plate", &items()),
            Err(GameError::InsufficientResources { needed: 150, available: 100 })
        ));
        assert_eq!(hero.gold, 100);
        assert!(hero.inventory.is_empty());
    }

    #[test]
    fn buying_and_selling_moves_gold() {
        let mut hero = hero();
        assert_eq!(purchase_item(&mut hero, "dagger", &items()).unwrap(), 75);
        assert_eq!(hero.inventory, ["dagger"]);
        assert_eq!(sell_item(&mut hero, "dagger", &items()).unwrap(), 12);
        assert_eq!(hero.gold, 87);
        assert!(matches!(sell_item(&mut hero, "dagger", &items()), Err(GameError::ItemNotFound(_))));
    }

    #[test]
    fn purchase_checks_gold_before_space() {
        let mut hero = hero();
        hero.inventory = vec!["potion".to_string(); MAX_INVENTORY_SIZE];
        assert!(matches!(purchase_item(&mut hero, "plate", &items()), Err(GameError::InsufficientResources { .. })));
        assert!(matches!(purchase_item(&mut hero, "potion", &items()), Err(GameError::InventoryFull { .. })));
        assert_eq!(hero.gold, 100);
        assert!(matches!(purchase_item(&mut hero, "relic", &items()), Err(GameError::UnknownItem(_))));
    }

    #[test]
    fn listing_is_sorted_by_cost() {
        let items = items();
        let ids: Vec<&str> = shop_listing(&items).iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["potion", "dagger", "plate"]);
    }
}
